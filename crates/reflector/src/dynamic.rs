//! Dynamic class construction
//!
//! Builds a new class at runtime together with its descriptor. The class is
//! a regular host class: it can be instantiated, its methods invoked, and
//! decorators applied through the builder behave exactly as on a declared
//! class. The descriptor comes out already built; there is nothing to
//! introspect.
//!
//! ```rust,ignore
//! let cd = Dynamic::create_class(&reflector, "Greeter", None, |dc| {
//!     dc.add_method_with("greet", |dm| {
//!         dm.add_parameter().add_body(|_, args| Value::from(format!("Hello {}", args[0])));
//!     });
//! })?;
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::decorator::{Decorator, DecoratorArg};
use crate::descriptor::{ClassDescriptor, MethodDescriptor, MethodKind, ParameterDescriptor, PropertyDescriptor, PropertyKind};
use crate::error::ReflectResult;
use crate::host::{Body, Class, Function, Instance, SlotDescriptor, Target, Value};
use crate::registry::Reflector;
use crate::types::TypeRef;

/// Entry point for dynamic class construction
#[derive(Debug, Clone, Copy, Default)]
pub struct Dynamic;

impl Dynamic {
    /// Create a class named `name`, optionally extending `base`, and let
    /// `build` populate it.
    ///
    /// Fails with [`ReflectError::DuplicateClass`](crate::ReflectError::DuplicateClass)
    /// when a dynamic class of that name was already created on this
    /// reflector.
    pub fn create_class(
        reflector: &Reflector,
        name: &str,
        base: Option<&Arc<Class>>,
        build: impl FnOnce(&mut DynamicClass<'_>),
    ) -> ReflectResult<Arc<ClassDescriptor>> {
        reflector.claim_dynamic_name(name)?;

        let class = Class::new(name, base.cloned());
        let descriptor = reflector.get_or_create(&class);
        debug!(class = name, base = base.map(|b| b.name()), "creating dynamic class");

        let mut builder = DynamicClass {
            reflector,
            class,
            descriptor: Arc::clone(&descriptor),
        };
        build(&mut builder);

        descriptor.mark_built();
        Ok(descriptor)
    }
}

/// Builder handle for a dynamic class
pub struct DynamicClass<'r> {
    reflector: &'r Reflector,
    class: Arc<Class>,
    descriptor: Arc<ClassDescriptor>,
}

impl<'r> DynamicClass<'r> {
    /// The class under construction
    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    /// Its descriptor
    pub fn descriptor(&self) -> &Arc<ClassDescriptor> {
        &self.descriptor
    }

    /// Add an instance method with a no-op body
    pub fn add_method(&mut self, name: &str) -> &mut Self {
        self.add_method_with(name, |_| {})
    }

    /// Add an instance method and configure its parameters, body and
    /// decorators
    pub fn add_method_with(&mut self, name: &str, configure: impl FnOnce(&mut DynamicMethod<'_>)) -> &mut Self {
        let method = self.descriptor.get_or_create_method(name);
        method.set_kind(MethodKind::Instance);

        let mut builder = DynamicMethod {
            reflector: self.reflector,
            class: &self.class,
            method: Arc::clone(&method),
            auto_index: 0,
            body: None,
        };
        configure(&mut builder);

        let body = builder.body.unwrap_or_else(noop_body);
        let arity = method.parameters().iter().map(|p| p.idx() + 1).max().unwrap_or(0);
        let function = Function::new(name, arity).with_body(body);
        self.class.define_method(name, function);
        self
    }

    /// Add an instance property
    pub fn add_property(&mut self, name: &str) -> &mut Self {
        self.add_property_with(name, |_| {})
    }

    /// Add an instance property and configure its value and decorators
    pub fn add_property_with(&mut self, name: &str, configure: impl FnOnce(&mut DynamicProperty<'_>)) -> &mut Self {
        let property = self.descriptor.get_or_create_property(name);
        property.set_kind(PropertyKind::Instance);

        let mut builder = DynamicProperty {
            reflector: self.reflector,
            class: &self.class,
            property,
        };
        configure(&mut builder);
        self
    }

    /// Apply a class decorator
    pub fn decorate(&mut self, decorator: &dyn Decorator) -> &mut Self {
        decorator.decorate(self.reflector, Target::Class(&self.class), None, None);
        self
    }
}

fn noop_body() -> Body {
    Arc::new(|_: &Instance, _: &[Value]| Value::Undefined)
}

/// Builder handle for a method of a dynamic class
pub struct DynamicMethod<'a> {
    reflector: &'a Reflector,
    class: &'a Arc<Class>,
    method: Arc<MethodDescriptor>,
    auto_index: usize,
    body: Option<Body>,
}

impl<'a> DynamicMethod<'a> {
    /// The method descriptor
    pub fn descriptor(&self) -> &Arc<MethodDescriptor> {
        &self.method
    }

    /// Add the next parameter, typed `Object`
    pub fn add_parameter(&mut self) -> &mut Self {
        self.add_parameter_with(None, None, |_| {})
    }

    /// Add a parameter.
    ///
    /// Without an index the parameter takes the next automatic position.
    /// Without a type it is typed `Object` unless a decorator typed it.
    pub fn add_parameter_with(
        &mut self,
        idx: Option<usize>,
        ty: Option<TypeRef>,
        configure: impl FnOnce(&mut DynamicParameter<'_>),
    ) -> &mut Self {
        let idx = idx.unwrap_or_else(|| {
            let next = self.auto_index;
            self.auto_index += 1;
            next
        });
        let parameter = self.method.get_or_create_parameter(idx);

        let mut builder = DynamicParameter {
            reflector: self.reflector,
            class: self.class,
            method: &self.method,
            parameter: Arc::clone(&parameter),
        };
        configure(&mut builder);

        match ty {
            Some(ty) => parameter.set_declared_type(ty),
            None if parameter.declared_type().is_none() => parameter.set_declared_type(TypeRef::object()),
            None => {}
        }
        self
    }

    /// Set the invocable body; it receives the instance as `this`
    pub fn add_body(&mut self, body: impl Fn(&Instance, &[Value]) -> Value + Send + Sync + 'static) -> &mut Self {
        let body: Body = Arc::new(body);
        self.body = Some(body);
        self
    }

    /// Apply a method decorator
    pub fn decorate(&mut self, decorator: &dyn Decorator) -> &mut Self {
        decorator.decorate(
            self.reflector,
            Target::Prototype(self.class),
            Some(self.method.name()),
            Some(&DecoratorArg::Descriptor(SlotDescriptor::method())),
        );
        self
    }
}

/// Builder handle for a parameter of a dynamic method
pub struct DynamicParameter<'a> {
    reflector: &'a Reflector,
    class: &'a Arc<Class>,
    method: &'a Arc<MethodDescriptor>,
    parameter: Arc<ParameterDescriptor>,
}

impl<'a> DynamicParameter<'a> {
    /// The parameter descriptor
    pub fn descriptor(&self) -> &Arc<ParameterDescriptor> {
        &self.parameter
    }

    /// Apply a parameter decorator
    pub fn decorate(&mut self, decorator: &dyn Decorator) -> &mut Self {
        decorator.decorate(
            self.reflector,
            Target::Prototype(self.class),
            Some(self.method.name()),
            Some(&DecoratorArg::Index(self.parameter.idx())),
        );
        self
    }
}

/// Builder handle for a property of a dynamic class
pub struct DynamicProperty<'a> {
    reflector: &'a Reflector,
    class: &'a Arc<Class>,
    property: Arc<PropertyDescriptor>,
}

impl<'a> DynamicProperty<'a> {
    /// The property descriptor
    pub fn descriptor(&self) -> &Arc<PropertyDescriptor> {
        &self.property
    }

    /// Apply a property decorator
    pub fn decorate(&mut self, decorator: &dyn Decorator) -> &mut Self {
        decorator.decorate(
            self.reflector,
            Target::Prototype(self.class),
            Some(self.property.name()),
            None,
        );
        self
    }

    /// Give the property a value on the prototype, shared by all instances
    pub fn set_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.class.define_value(self.property.name(), value.into());
        self
    }
}
