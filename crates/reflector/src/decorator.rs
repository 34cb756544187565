//! Decorator factories
//!
//! A decorator is applied with the host decoration arguments: the target
//! side, an optional member key and an optional third argument (a slot
//! descriptor for methods, a position for parameters). The factories turn a
//! callback over descriptors into a [`Decorator`]:
//!
//! - [`any_decorator`] works at every site and works out which one from the
//!   argument shape (see [`decorator_site`]); its callback receives a
//!   [`Decorated`] value tagged with the site.
//! - [`class_decorator`], [`method_decorator`], [`property_decorator`] and
//!   [`parameter_decorator`] serve one known site.
//!
//! Every factory resolves (creating if needed) the descriptors for the site,
//! runs the callback, then fires the matching `on_decorated_*` hook.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::descriptor::{ClassDescriptor, MethodDescriptor, MethodKey, ParameterDescriptor, PropertyDescriptor};
use crate::host::{SlotDescriptor, Target};
use crate::registry::Reflector;

/// Third decoration argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoratorArg {
    /// Position of a decorated parameter
    Index(usize),
    /// Slot of a decorated method or accessor
    Descriptor(SlotDescriptor),
}

/// Site a decorator was attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoratorSite {
    /// The class
    Class,
    /// The constructor, or one of its parameters
    Constructor,
    /// A method or accessor
    Method,
    /// A field
    Property,
    /// A method parameter
    Parameter,
}

/// Work out the decoration site from the argument shape.
///
/// | key     | arg          | site        |
/// |---------|--------------|-------------|
/// | absent  | absent       | Class       |
/// | absent  | present      | Constructor |
/// | present | absent       | Property    |
/// | present | `Index`      | Parameter   |
/// | present | `Descriptor` | Method      |
///
/// An accessor arrives with a descriptor and is therefore reported as a
/// method.
pub fn decorator_site(key: Option<&str>, arg: Option<&DecoratorArg>) -> DecoratorSite {
    match (key, arg) {
        (None, None) => DecoratorSite::Class,
        (None, Some(_)) => DecoratorSite::Constructor,
        (Some(_), None) => DecoratorSite::Property,
        (Some(_), Some(DecoratorArg::Index(_))) => DecoratorSite::Parameter,
        (Some(_), Some(DecoratorArg::Descriptor(_))) => DecoratorSite::Method,
    }
}

/// Something that can be attached to a class, member or parameter
pub trait Decorator: Send + Sync {
    /// Apply the decorator with the host decoration arguments
    fn decorate(
        &self,
        reflector: &Reflector,
        target: Target<'_>,
        key: Option<&str>,
        arg: Option<&DecoratorArg>,
    );
}

impl<D: Decorator + ?Sized> Decorator for Arc<D> {
    fn decorate(
        &self,
        reflector: &Reflector,
        target: Target<'_>,
        key: Option<&str>,
        arg: Option<&DecoratorArg>,
    ) {
        (**self).decorate(reflector, target, key, arg);
    }
}

/// Descriptors resolved for one decoration, tagged with the site
#[derive(Debug, Clone, Copy)]
pub enum Decorated<'a> {
    /// Class decoration
    Class {
        /// The class
        class: &'a Arc<ClassDescriptor>,
    },
    /// Constructor decoration; `parameter` is set for a constructor
    /// parameter
    Constructor {
        /// The class
        class: &'a Arc<ClassDescriptor>,
        /// The constructor
        constructor: &'a Arc<MethodDescriptor>,
        /// The decorated constructor parameter
        parameter: Option<&'a Arc<ParameterDescriptor>>,
    },
    /// Method (or accessor) decoration
    Method {
        /// The class
        class: &'a Arc<ClassDescriptor>,
        /// The method
        method: &'a Arc<MethodDescriptor>,
        /// Slot of the method
        descriptor: &'a SlotDescriptor,
    },
    /// Property decoration
    Property {
        /// The class
        class: &'a Arc<ClassDescriptor>,
        /// The property
        property: &'a Arc<PropertyDescriptor>,
    },
    /// Parameter decoration
    Parameter {
        /// The class
        class: &'a Arc<ClassDescriptor>,
        /// The method owning the parameter
        method: &'a Arc<MethodDescriptor>,
        /// The parameter
        parameter: &'a Arc<ParameterDescriptor>,
    },
}

impl<'a> Decorated<'a> {
    /// Decoration site
    pub fn site(&self) -> DecoratorSite {
        match self {
            Decorated::Class { .. } => DecoratorSite::Class,
            Decorated::Constructor { .. } => DecoratorSite::Constructor,
            Decorated::Method { .. } => DecoratorSite::Method,
            Decorated::Property { .. } => DecoratorSite::Property,
            Decorated::Parameter { .. } => DecoratorSite::Parameter,
        }
    }

    /// Class descriptor of the decorated entity
    pub fn class(&self) -> &'a Arc<ClassDescriptor> {
        match *self {
            Decorated::Class { class }
            | Decorated::Constructor { class, .. }
            | Decorated::Method { class, .. }
            | Decorated::Property { class, .. }
            | Decorated::Parameter { class, .. } => class,
        }
    }
}

type AnyFn = dyn Fn(&Decorated<'_>) + Send + Sync;
type ClassFn = dyn Fn(&Arc<ClassDescriptor>) + Send + Sync;
type MethodFn = dyn Fn(&Arc<ClassDescriptor>, &Arc<MethodDescriptor>, Option<&SlotDescriptor>) + Send + Sync;
type PropertyFn = dyn Fn(&Arc<ClassDescriptor>, &Arc<PropertyDescriptor>) + Send + Sync;
type ParameterFn =
    dyn Fn(&Arc<ClassDescriptor>, &Arc<MethodDescriptor>, &Arc<ParameterDescriptor>) + Send + Sync;

/// Decorator usable at every site
pub struct AnyDecorator {
    callback: Box<AnyFn>,
}

/// Decorator for any site; the callback learns the site from the
/// [`Decorated`] variant
pub fn any_decorator(callback: impl Fn(&Decorated<'_>) + Send + Sync + 'static) -> AnyDecorator {
    AnyDecorator {
        callback: Box::new(callback),
    }
}

impl Decorator for AnyDecorator {
    fn decorate(
        &self,
        reflector: &Reflector,
        target: Target<'_>,
        key: Option<&str>,
        arg: Option<&DecoratorArg>,
    ) {
        let class = reflector.get_or_create(target.class());
        let hooks = reflector.hooks();

        match (decorator_site(key, arg), key, arg) {
            (DecoratorSite::Class, _, _) => {
                (self.callback)(&Decorated::Class { class: &class });
                hooks.invoke(|h| h.on_decorated_class(&class));
            }
            (DecoratorSite::Constructor, _, arg) => {
                let constructor = class.constructor();
                match arg {
                    Some(DecoratorArg::Index(idx)) => {
                        let parameter = constructor.get_or_create_parameter(*idx);
                        (self.callback)(&Decorated::Constructor {
                            class: &class,
                            constructor: &constructor,
                            parameter: Some(&parameter),
                        });
                        hooks.invoke(|h| h.on_decorated_parameter(&class, &constructor, &parameter));
                    }
                    _ => {
                        (self.callback)(&Decorated::Constructor {
                            class: &class,
                            constructor: &constructor,
                            parameter: None,
                        });
                        hooks.invoke(|h| h.on_decorated_method(&class, &constructor));
                    }
                }
            }
            (DecoratorSite::Property, Some(key), _) => {
                let property = class.get_or_create_property(key);
                (self.callback)(&Decorated::Property {
                    class: &class,
                    property: &property,
                });
                hooks.invoke(|h| h.on_decorated_property(&class, &property));
            }
            (DecoratorSite::Parameter, Some(key), Some(DecoratorArg::Index(idx))) => {
                let method = class.get_or_create_method(key);
                let parameter = method.get_or_create_parameter(*idx);
                (self.callback)(&Decorated::Parameter {
                    class: &class,
                    method: &method,
                    parameter: &parameter,
                });
                hooks.invoke(|h| h.on_decorated_parameter(&class, &method, &parameter));
            }
            (DecoratorSite::Method, Some(key), Some(DecoratorArg::Descriptor(descriptor))) => {
                let method = class.get_or_create_method(key);
                (self.callback)(&Decorated::Method {
                    class: &class,
                    method: &method,
                    descriptor,
                });
                hooks.invoke(|h| h.on_decorated_method(&class, &method));
            }
            // decorator_site only yields the combinations above
            _ => {}
        }
    }
}

impl fmt::Debug for AnyDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnyDecorator")
    }
}

/// Decorator for classes
pub struct ClassDecorator {
    callback: Box<ClassFn>,
}

/// Decorator receiving the class descriptor
pub fn class_decorator(callback: impl Fn(&Arc<ClassDescriptor>) + Send + Sync + 'static) -> ClassDecorator {
    ClassDecorator {
        callback: Box::new(callback),
    }
}

impl Decorator for ClassDecorator {
    fn decorate(&self, reflector: &Reflector, target: Target<'_>, _key: Option<&str>, _arg: Option<&DecoratorArg>) {
        let class = reflector.get_or_create(target.class());
        (self.callback)(&class);
        reflector.hooks().invoke(|h| h.on_decorated_class(&class));
    }
}

/// Decorator for methods; without a key it decorates the constructor
pub struct MethodDecorator {
    callback: Box<MethodFn>,
}

/// Decorator receiving the class and method descriptors and the method's
/// slot, when the host supplied one
pub fn method_decorator(
    callback: impl Fn(&Arc<ClassDescriptor>, &Arc<MethodDescriptor>, Option<&SlotDescriptor>)
        + Send
        + Sync
        + 'static,
) -> MethodDecorator {
    MethodDecorator {
        callback: Box::new(callback),
    }
}

impl Decorator for MethodDecorator {
    fn decorate(&self, reflector: &Reflector, target: Target<'_>, key: Option<&str>, arg: Option<&DecoratorArg>) {
        let class = reflector.get_or_create(target.class());
        let method = class.get_or_create_method(MethodKey::from(key));
        let descriptor = match arg {
            Some(DecoratorArg::Descriptor(descriptor)) => Some(descriptor),
            _ => None,
        };
        (self.callback)(&class, &method, descriptor);
        reflector.hooks().invoke(|h| h.on_decorated_method(&class, &method));
    }
}

/// Decorator for properties
pub struct PropertyDecorator {
    callback: Box<PropertyFn>,
}

/// Decorator receiving the class and property descriptors
pub fn property_decorator(
    callback: impl Fn(&Arc<ClassDescriptor>, &Arc<PropertyDescriptor>) + Send + Sync + 'static,
) -> PropertyDecorator {
    PropertyDecorator {
        callback: Box::new(callback),
    }
}

impl Decorator for PropertyDecorator {
    fn decorate(&self, reflector: &Reflector, target: Target<'_>, key: Option<&str>, _arg: Option<&DecoratorArg>) {
        let Some(key) = key else {
            warn!(class = target.class().name(), "property decorator applied without a property key");
            return;
        };
        let class = reflector.get_or_create(target.class());
        let property = class.get_or_create_property(key);
        (self.callback)(&class, &property);
        reflector.hooks().invoke(|h| h.on_decorated_property(&class, &property));
    }
}

/// Decorator for parameters; without a key it decorates a constructor
/// parameter
pub struct ParameterDecorator {
    callback: Box<ParameterFn>,
}

/// Decorator receiving the class, method and parameter descriptors
pub fn parameter_decorator(
    callback: impl Fn(&Arc<ClassDescriptor>, &Arc<MethodDescriptor>, &Arc<ParameterDescriptor>)
        + Send
        + Sync
        + 'static,
) -> ParameterDecorator {
    ParameterDecorator {
        callback: Box::new(callback),
    }
}

impl Decorator for ParameterDecorator {
    fn decorate(&self, reflector: &Reflector, target: Target<'_>, key: Option<&str>, arg: Option<&DecoratorArg>) {
        let Some(DecoratorArg::Index(idx)) = arg else {
            warn!(
                class = target.class().name(),
                member = key.unwrap_or("constructor"),
                "parameter decorator applied without a parameter index"
            );
            return;
        };
        let class = reflector.get_or_create(target.class());
        let method = class.get_or_create_method(MethodKey::from(key));
        let parameter = method.get_or_create_parameter(*idx);
        (self.callback)(&class, &method, &parameter);
        reflector
            .hooks()
            .invoke(|h| h.on_decorated_parameter(&class, &method, &parameter));
    }
}

macro_rules! opaque_debug {
    ($($ty:ident),*) => {
        $(impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(stringify!($ty))
            }
        })*
    };
}

opaque_debug!(ClassDecorator, MethodDecorator, PropertyDecorator, ParameterDecorator);
