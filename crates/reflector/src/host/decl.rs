//! Declarative class definition
//!
//! [`ClassDef`] describes a class the way a class declaration in source
//! would: constructor parameters, methods, fields and accessors, each with
//! optional declared types and attached decorators. [`ClassDef::define`]
//! then does what a decorator-aware compiler does:
//!
//! 1. creates the [`Class`] with its members and declaration text
//! 2. records `design:paramtypes`, `design:returntype` and `design:type`
//!    for typed members in the reflector's [`DesignMetadata`] store
//! 3. applies the decorators with the host argument shapes, in host order:
//!    instance members then static members in declaration order (for each
//!    member, parameter decorators last position first, then the member's
//!    own decorators bottom-up), then constructor parameters, then class
//!    decorators bottom-up
//!
//! [`DesignMetadata`]: crate::oracle::DesignMetadata

use std::sync::Arc;

use super::{Body, Class, Function, Instance, SlotDescriptor, Target, Value};
use crate::decorator::{Decorator, DecoratorArg};
use crate::oracle::{MetadataValue, DESIGN_PARAM_TYPES, DESIGN_RETURN_TYPE, DESIGN_TYPE};
use crate::registry::Reflector;
use crate::types::TypeRef;

type Decorators = Vec<Arc<dyn Decorator>>;

/// A formal parameter
pub struct ParamDef {
    name: String,
    ty: TypeRef,
    decorators: Decorators,
}

impl ParamDef {
    /// Attach a decorator
    pub fn decorate(&mut self, decorator: impl Decorator + 'static) -> &mut Self {
        self.decorators.push(Arc::new(decorator));
        self
    }
}

/// A method, static method or the constructor
#[derive(Default)]
pub struct MethodDef {
    params: Vec<ParamDef>,
    return_type: Option<TypeRef>,
    decorators: Decorators,
    body: Option<Body>,
    source: Option<String>,
}

impl MethodDef {
    /// Declare the next parameter
    pub fn param(&mut self, name: &str, ty: TypeRef) -> &mut ParamDef {
        self.params.push(ParamDef {
            name: name.to_string(),
            ty,
            decorators: Vec::new(),
        });
        let last = self.params.len() - 1;
        &mut self.params[last]
    }

    /// Declare the return type
    pub fn returns(&mut self, ty: TypeRef) -> &mut Self {
        self.return_type = Some(ty);
        self
    }

    /// Attach a decorator
    pub fn decorate(&mut self, decorator: impl Decorator + 'static) -> &mut Self {
        self.decorators.push(Arc::new(decorator));
        self
    }

    /// Give the method an invocable body
    pub fn body(&mut self, body: impl Fn(&Instance, &[Value]) -> Value + Send + Sync + 'static) -> &mut Self {
        let body: Body = Arc::new(body);
        self.body = Some(body);
        self
    }

    /// Override the declaration text, which otherwise lists the declared
    /// parameter names
    pub fn source(&mut self, source: &str) -> &mut Self {
        self.source = Some(source.to_string());
        self
    }

    fn function(&self, name: &str) -> Function {
        let source = self.source.clone().unwrap_or_else(|| {
            let names: Vec<&str> = self.params.iter().map(|p| p.name.as_str()).collect();
            format!("{}({}) {{}}", name, names.join(", "))
        });
        let function = Function::new(name, self.params.len()).with_source(source);
        match &self.body {
            Some(body) => function.with_body(Arc::clone(body)),
            None => function,
        }
    }

    fn param_types(&self) -> MetadataValue {
        MetadataValue::Types(self.params.iter().map(|p| p.ty.clone()).collect())
    }
}

/// A field or static field
#[derive(Default)]
pub struct FieldDef {
    ty: Option<TypeRef>,
    initial: Value,
    decorators: Decorators,
}

impl FieldDef {
    /// Declare the type
    pub fn typed(&mut self, ty: TypeRef) -> &mut Self {
        self.ty = Some(ty);
        self
    }

    /// Initial value
    pub fn initial(&mut self, value: impl Into<Value>) -> &mut Self {
        self.initial = value.into();
        self
    }

    /// Attach a decorator
    pub fn decorate(&mut self, decorator: impl Decorator + 'static) -> &mut Self {
        self.decorators.push(Arc::new(decorator));
        self
    }
}

/// A `get`/`set` accessor
#[derive(Default)]
pub struct AccessorDef {
    ty: Option<TypeRef>,
    getter: Option<Body>,
    setter: Option<Body>,
    decorators: Decorators,
}

impl AccessorDef {
    /// Declare the type
    pub fn typed(&mut self, ty: TypeRef) -> &mut Self {
        self.ty = Some(ty);
        self
    }

    /// Getter body
    pub fn getter(&mut self, body: impl Fn(&Instance, &[Value]) -> Value + Send + Sync + 'static) -> &mut Self {
        let body: Body = Arc::new(body);
        self.getter = Some(body);
        self
    }

    /// Setter body; receives the assigned value as its only argument
    pub fn setter(&mut self, body: impl Fn(&Instance, &[Value]) -> Value + Send + Sync + 'static) -> &mut Self {
        let body: Body = Arc::new(body);
        self.setter = Some(body);
        self
    }

    /// Attach a decorator
    pub fn decorate(&mut self, decorator: impl Decorator + 'static) -> &mut Self {
        self.decorators.push(Arc::new(decorator));
        self
    }
}

enum MemberDef {
    Method(MethodDef),
    Field(FieldDef),
    Accessor(AccessorDef),
}

struct Declared {
    name: String,
    is_static: bool,
    member: MemberDef,
}

/// Declarative description of a class
pub struct ClassDef {
    name: String,
    base: Option<Arc<Class>>,
    constructor: MethodDef,
    members: Vec<Declared>,
    decorators: Decorators,
}

impl ClassDef {
    /// Start a class declaration
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            base: None,
            constructor: MethodDef::default(),
            members: Vec::new(),
            decorators: Vec::new(),
        }
    }

    /// Extend a base class
    pub fn extends(mut self, base: &Arc<Class>) -> Self {
        self.base = Some(Arc::clone(base));
        self
    }

    /// Declare the constructor
    pub fn constructor(mut self, configure: impl FnOnce(&mut MethodDef)) -> Self {
        configure(&mut self.constructor);
        self
    }

    /// Declare an instance method
    pub fn method(self, name: &str, configure: impl FnOnce(&mut MethodDef)) -> Self {
        self.declare_method(name, false, configure)
    }

    /// Declare a static method
    pub fn static_method(self, name: &str, configure: impl FnOnce(&mut MethodDef)) -> Self {
        self.declare_method(name, true, configure)
    }

    /// Declare an instance field
    pub fn field(self, name: &str, configure: impl FnOnce(&mut FieldDef)) -> Self {
        self.declare_field(name, false, configure)
    }

    /// Declare a static field
    pub fn static_field(self, name: &str, configure: impl FnOnce(&mut FieldDef)) -> Self {
        self.declare_field(name, true, configure)
    }

    /// Declare an instance accessor
    pub fn accessor(self, name: &str, configure: impl FnOnce(&mut AccessorDef)) -> Self {
        self.declare_accessor(name, false, configure)
    }

    /// Declare a static accessor
    pub fn static_accessor(self, name: &str, configure: impl FnOnce(&mut AccessorDef)) -> Self {
        self.declare_accessor(name, true, configure)
    }

    /// Attach a class decorator
    pub fn decorate(mut self, decorator: impl Decorator + 'static) -> Self {
        self.decorators.push(Arc::new(decorator));
        self
    }

    fn declare_method(mut self, name: &str, is_static: bool, configure: impl FnOnce(&mut MethodDef)) -> Self {
        let mut def = MethodDef::default();
        configure(&mut def);
        self.push(name, is_static, MemberDef::Method(def));
        self
    }

    fn declare_field(mut self, name: &str, is_static: bool, configure: impl FnOnce(&mut FieldDef)) -> Self {
        let mut def = FieldDef::default();
        configure(&mut def);
        self.push(name, is_static, MemberDef::Field(def));
        self
    }

    fn declare_accessor(mut self, name: &str, is_static: bool, configure: impl FnOnce(&mut AccessorDef)) -> Self {
        let mut def = AccessorDef::default();
        configure(&mut def);
        self.push(name, is_static, MemberDef::Accessor(def));
        self
    }

    fn push(&mut self, name: &str, is_static: bool, member: MemberDef) {
        self.members.push(Declared {
            name: name.to_string(),
            is_static,
            member,
        });
    }

    /// Create the class, record its design metadata in `reflector` and
    /// apply the attached decorators
    pub fn define(self, reflector: &Reflector) -> Arc<Class> {
        let class = Class::with_constructor(&self.name, self.base.clone(), self.constructor.function(&self.name));
        for declared in &self.members {
            self.install(&class, declared);
        }
        self.emit_metadata(reflector, &class);

        let instance = self.members.iter().filter(|d| !d.is_static);
        let statics = self.members.iter().filter(|d| d.is_static);
        for declared in instance.chain(statics) {
            let target = if declared.is_static {
                Target::Class(&class)
            } else {
                Target::Prototype(&class)
            };
            let key = Some(declared.name.as_str());
            match &declared.member {
                MemberDef::Method(def) => {
                    apply_parameters(reflector, target, key, &def.params);
                    let slot = DecoratorArg::Descriptor(SlotDescriptor::method());
                    apply(reflector, &def.decorators, target, key, Some(&slot));
                }
                MemberDef::Field(def) => apply(reflector, &def.decorators, target, key, None),
                MemberDef::Accessor(def) => {
                    let slot = DecoratorArg::Descriptor(SlotDescriptor::accessor());
                    apply(reflector, &def.decorators, target, key, Some(&slot));
                }
            }
        }

        let target = Target::Class(&class);
        apply_parameters(reflector, target, None, &self.constructor.params);
        apply(reflector, &self.decorators, target, None, None);
        class
    }

    fn install(&self, class: &Class, declared: &Declared) {
        let name = declared.name.as_str();
        match (&declared.member, declared.is_static) {
            (MemberDef::Method(def), false) => class.define_method(name, def.function(name)),
            (MemberDef::Method(def), true) => class.define_static_method(name, def.function(name)),
            (MemberDef::Field(def), false) => class.define_field(name, def.initial.clone()),
            (MemberDef::Field(def), true) => class.define_static_value(name, def.initial.clone()),
            (MemberDef::Accessor(def), is_static) => {
                let getter = def
                    .getter
                    .as_ref()
                    .map(|body| Function::new(name, 0).with_body(Arc::clone(body)));
                let setter = def
                    .setter
                    .as_ref()
                    .map(|body| Function::new(name, 1).with_body(Arc::clone(body)));
                if is_static {
                    class.define_static_accessor(name, getter, setter);
                } else {
                    class.define_accessor(name, getter, setter);
                }
            }
        }
    }

    fn emit_metadata(&self, reflector: &Reflector, class: &Arc<Class>) {
        let design = reflector.design_metadata();
        if !self.constructor.params.is_empty() {
            design.define_metadata(DESIGN_PARAM_TYPES, self.constructor.param_types(), Target::Class(class), None);
        }

        for declared in &self.members {
            let target = if declared.is_static {
                Target::Class(class)
            } else {
                Target::Prototype(class)
            };
            let key = Some(declared.name.as_str());
            match &declared.member {
                MemberDef::Method(def) => {
                    design.define_metadata(DESIGN_PARAM_TYPES, def.param_types(), target, key);
                    if let Some(ty) = &def.return_type {
                        design.define_metadata(DESIGN_RETURN_TYPE, MetadataValue::Type(ty.clone()), target, key);
                    }
                }
                MemberDef::Field(FieldDef { ty: Some(ty), .. }) | MemberDef::Accessor(AccessorDef { ty: Some(ty), .. }) => {
                    design.define_metadata(DESIGN_TYPE, MetadataValue::Type(ty.clone()), target, key);
                }
                MemberDef::Field(_) | MemberDef::Accessor(_) => {}
            }
        }
    }
}

/// Apply decorators bottom-up
fn apply(reflector: &Reflector, decorators: &Decorators, target: Target<'_>, key: Option<&str>, arg: Option<&DecoratorArg>) {
    for decorator in decorators.iter().rev() {
        decorator.decorate(reflector, target, key, arg);
    }
}

/// Apply parameter decorators, last position first
fn apply_parameters(reflector: &Reflector, target: Target<'_>, key: Option<&str>, params: &[ParamDef]) {
    for (idx, param) in params.iter().enumerate().rev() {
        apply(reflector, &param.decorators, target, key, Some(&DecoratorArg::Index(idx)));
    }
}
