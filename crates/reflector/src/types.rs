//! Nominal type references
//!
//! Declared types of parameters, return values and properties. A type is
//! either one of the host builtins, a host class (compared by identity) or
//! an opaque name for types with no runtime representation (interfaces,
//! aliases).

use std::fmt;
use std::sync::Arc;

use crate::host::Class;

/// Builtin host types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    /// `String`
    String,
    /// `Number`
    Number,
    /// `Boolean`
    Boolean,
    /// `Object` (also recorded for `any` and unknown shapes)
    Object,
    /// `Array`
    Array,
    /// `Function`
    Function,
    /// `Symbol`
    Symbol,
    /// `BigInt`
    BigInt,
    /// `Promise`
    Promise,
}

impl BuiltinType {
    /// Name of the builtin constructor
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinType::String => "String",
            BuiltinType::Number => "Number",
            BuiltinType::Boolean => "Boolean",
            BuiltinType::Object => "Object",
            BuiltinType::Array => "Array",
            BuiltinType::Function => "Function",
            BuiltinType::Symbol => "Symbol",
            BuiltinType::BigInt => "BigInt",
            BuiltinType::Promise => "Promise",
        }
    }
}

/// Reference to a declared type
#[derive(Clone)]
pub enum TypeRef {
    /// Builtin type
    Builtin(BuiltinType),
    /// Host class
    Class(Arc<Class>),
    /// Type known only by name
    Named(Arc<str>),
}

impl TypeRef {
    /// `String`
    pub fn string() -> Self {
        TypeRef::Builtin(BuiltinType::String)
    }

    /// `Number`
    pub fn number() -> Self {
        TypeRef::Builtin(BuiltinType::Number)
    }

    /// `Boolean`
    pub fn boolean() -> Self {
        TypeRef::Builtin(BuiltinType::Boolean)
    }

    /// `Object`
    pub fn object() -> Self {
        TypeRef::Builtin(BuiltinType::Object)
    }

    /// `Array`
    pub fn array() -> Self {
        TypeRef::Builtin(BuiltinType::Array)
    }

    /// `Function`
    pub fn function() -> Self {
        TypeRef::Builtin(BuiltinType::Function)
    }

    /// A host class
    pub fn class(class: &Arc<Class>) -> Self {
        TypeRef::Class(Arc::clone(class))
    }

    /// A type known only by name
    pub fn named(name: &str) -> Self {
        TypeRef::Named(Arc::from(name))
    }

    /// Type name
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Builtin(b) => b.name(),
            TypeRef::Class(c) => c.name(),
            TypeRef::Named(n) => n,
        }
    }

    /// The class, for class types
    pub fn as_class(&self) -> Option<&Arc<Class>> {
        match self {
            TypeRef::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Whether this is exactly the given class
    pub fn is_class(&self, class: &Arc<Class>) -> bool {
        self.as_class().is_some_and(|c| Arc::ptr_eq(c, class))
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeRef::Builtin(a), TypeRef::Builtin(b)) => a == b,
            (TypeRef::Class(a), TypeRef::Class(b)) => Arc::ptr_eq(a, b),
            (TypeRef::Named(a), TypeRef::Named(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TypeRef {}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Builtin(b) => write!(f, "Builtin({})", b.name()),
            TypeRef::Class(c) => write!(f, "Class({})", c.name()),
            TypeRef::Named(n) => write!(f, "Named({})", n),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<BuiltinType> for TypeRef {
    fn from(b: BuiltinType) -> Self {
        TypeRef::Builtin(b)
    }
}

impl From<&Arc<Class>> for TypeRef {
    fn from(class: &Arc<Class>) -> Self {
        TypeRef::class(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_types_compare_by_identity() {
        let a = Class::new("Same", None);
        let b = Class::new("Same", None);

        assert_eq!(TypeRef::class(&a), TypeRef::class(&a));
        assert_ne!(TypeRef::class(&a), TypeRef::class(&b));
        assert!(TypeRef::class(&a).is_class(&a));
        assert!(!TypeRef::class(&a).is_class(&b));
    }

    #[test]
    fn test_names() {
        assert_eq!(TypeRef::string().name(), "String");
        assert_eq!(TypeRef::named("IRepository").name(), "IRepository");
        let class = Class::new("User", None);
        assert_eq!(TypeRef::class(&class).to_string(), "User");
    }

    #[test]
    fn test_builtin_and_named_differ() {
        assert_ne!(TypeRef::string(), TypeRef::named("String"));
        assert_eq!(TypeRef::from(BuiltinType::Number), TypeRef::number());
    }
}
