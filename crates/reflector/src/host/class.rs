//! Host classes and instances
//!
//! A [`Class`] has two sides: the prototype (members shared by instances)
//! and the constructor object (static members). Both are insertion-ordered
//! so introspection sees members in declaration order. A class is identified
//! by its address; classes are always handed out as `Arc<Class>` and stay
//! alive as long as a descriptor refers to them, so identities are never
//! reused.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::{Function, Value};
use crate::error::{ReflectError, ReflectResult};

/// Identity key of a class
pub type ClassId = usize;

/// A slot on the prototype or the constructor object
#[derive(Debug, Clone)]
pub enum Member {
    /// Callable value
    Method(Arc<Function>),
    /// `get`/`set` pair
    Accessor {
        /// Getter
        getter: Option<Arc<Function>>,
        /// Setter
        setter: Option<Arc<Function>>,
    },
    /// Plain data value
    Value(Value),
}

impl Member {
    /// Whether the slot resolves to nothing (`null`/`undefined` data)
    pub fn is_nil(&self) -> bool {
        matches!(self, Member::Value(v) if v.is_nullish())
    }

    /// The callable, if this slot is a method
    pub fn as_function(&self) -> Option<&Arc<Function>> {
        match self {
            Member::Method(f) => Some(f),
            _ => None,
        }
    }

    /// Property-descriptor view of the slot
    pub fn slot(&self) -> SlotDescriptor {
        match self {
            Member::Method(_) => SlotDescriptor::method(),
            Member::Accessor { .. } => SlotDescriptor::accessor(),
            Member::Value(_) => SlotDescriptor::value(),
        }
    }
}

/// Kind of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Callable value
    Method,
    /// Getter and/or setter
    Accessor,
    /// Data value
    Value,
}

/// Descriptor handed to method decorators, mirroring a host property
/// descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDescriptor {
    /// Slot kind
    pub kind: SlotKind,
    /// Value can be reassigned
    pub writable: bool,
    /// Shows up in enumeration
    pub enumerable: bool,
    /// Slot can be redefined
    pub configurable: bool,
}

impl SlotDescriptor {
    /// Slot of a method defined in a class body
    pub fn method() -> Self {
        Self {
            kind: SlotKind::Method,
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }

    /// Slot of a getter/setter pair
    pub fn accessor() -> Self {
        Self {
            kind: SlotKind::Accessor,
            writable: false,
            enumerable: false,
            configurable: true,
        }
    }

    /// Slot of an assigned data value
    pub fn value() -> Self {
        Self {
            kind: SlotKind::Value,
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }
}

/// Target a decorator receives: the constructor object for class and
/// static member decorators, the prototype for instance members.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// The class itself (static side)
    Class(&'a Arc<Class>),
    /// The class prototype (instance side)
    Prototype(&'a Arc<Class>),
}

impl<'a> Target<'a> {
    /// The class owning the target, whichever side was supplied
    pub fn class(&self) -> &'a Arc<Class> {
        match self {
            Target::Class(c) | Target::Prototype(c) => c,
        }
    }
}

/// A host class
pub struct Class {
    name: String,
    base: Option<Arc<Class>>,
    constructor: Arc<Function>,
    prototype: RwLock<IndexMap<String, Member>>,
    statics: RwLock<IndexMap<String, Member>>,
    /// Instance field initializers, applied on construction
    fields: RwLock<Vec<(String, Value)>>,
}

impl Class {
    /// Create a class with an implicit zero-argument constructor
    pub fn new(name: impl Into<String>, base: Option<Arc<Class>>) -> Arc<Self> {
        let name = name.into();
        let constructor = Function::new(name.clone(), 0);
        Self::with_constructor(name, base, constructor)
    }

    /// Create a class with an explicit constructor
    pub fn with_constructor(
        name: impl Into<String>,
        base: Option<Arc<Class>>,
        constructor: Function,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            base,
            constructor: Arc::new(constructor),
            prototype: RwLock::new(IndexMap::new()),
            statics: RwLock::new(IndexMap::new()),
            fields: RwLock::new(Vec::new()),
        })
    }

    /// Identity of this class
    pub fn id(&self) -> ClassId {
        self as *const Self as usize
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct base class
    pub fn base(&self) -> Option<&Arc<Class>> {
        self.base.as_ref()
    }

    /// Constructor function
    pub fn constructor(&self) -> &Arc<Function> {
        &self.constructor
    }

    // ========================================================================
    // Definition
    // ========================================================================

    /// Define (or replace) an instance method on the prototype
    pub fn define_method(&self, name: impl Into<String>, function: Function) {
        self.prototype
            .write()
            .insert(name.into(), Member::Method(Arc::new(function)));
    }

    /// Define (or replace) a static method
    pub fn define_static_method(&self, name: impl Into<String>, function: Function) {
        self.statics
            .write()
            .insert(name.into(), Member::Method(Arc::new(function)));
    }

    /// Define an accessor on the prototype
    pub fn define_accessor(
        &self,
        name: impl Into<String>,
        getter: Option<Function>,
        setter: Option<Function>,
    ) {
        self.prototype.write().insert(
            name.into(),
            Member::Accessor {
                getter: getter.map(Arc::new),
                setter: setter.map(Arc::new),
            },
        );
    }

    /// Define a static accessor
    pub fn define_static_accessor(
        &self,
        name: impl Into<String>,
        getter: Option<Function>,
        setter: Option<Function>,
    ) {
        self.statics.write().insert(
            name.into(),
            Member::Accessor {
                getter: getter.map(Arc::new),
                setter: setter.map(Arc::new),
            },
        );
    }

    /// Define a data value on the prototype
    pub fn define_value(&self, name: impl Into<String>, value: Value) {
        self.prototype.write().insert(name.into(), Member::Value(value));
    }

    /// Define a static data value
    pub fn define_static_value(&self, name: impl Into<String>, value: Value) {
        self.statics.write().insert(name.into(), Member::Value(value));
    }

    /// Register an instance field initializer
    pub fn define_field(&self, name: impl Into<String>, initial: Value) {
        self.fields.write().push((name.into(), initial));
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Own prototype slots in definition order
    pub fn own_members(&self) -> Vec<(String, Member)> {
        self.prototype
            .read()
            .iter()
            .map(|(k, m)| (k.clone(), m.clone()))
            .collect()
    }

    /// Own static slots in definition order
    pub fn own_static_members(&self) -> Vec<(String, Member)> {
        self.statics
            .read()
            .iter()
            .map(|(k, m)| (k.clone(), m.clone()))
            .collect()
    }

    /// Own prototype slot
    pub fn own_member(&self, name: &str) -> Option<Member> {
        self.prototype.read().get(name).cloned()
    }

    /// Own static slot
    pub fn own_static_member(&self, name: &str) -> Option<Member> {
        self.statics.read().get(name).cloned()
    }

    /// Resolve a name on the prototype chain
    pub fn lookup_instance(&self, name: &str) -> Option<Member> {
        self.ancestry().find_map(|class| class.own_member(name))
    }

    /// Resolve a name on the constructor chain (static inheritance)
    pub fn lookup_static(&self, name: &str) -> Option<Member> {
        self.ancestry().find_map(|class| class.own_static_member(name))
    }

    /// Whether the name resolves to a non-nil slot on the prototype chain
    pub fn resolves_on_instance(&self, name: &str) -> bool {
        self.lookup_instance(name).is_some_and(|m| !m.is_nil())
    }

    /// Whether the name resolves to a non-nil slot on the constructor chain
    pub fn resolves_on_static(&self, name: &str) -> bool {
        self.lookup_static(name).is_some_and(|m| !m.is_nil())
    }

    /// This class followed by its ancestors, nearest first
    pub fn ancestry(&self) -> impl Iterator<Item = &Class> {
        std::iter::successors(Some(self), |class| class.base.as_deref())
    }

    // ========================================================================
    // Instantiation
    // ========================================================================

    /// Create an instance: field initializers run root class first, then the
    /// constructor body if there is one.
    pub fn construct(self: &Arc<Self>, args: &[Value]) -> Instance {
        let instance = Instance {
            class: Arc::clone(self),
            fields: RwLock::new(FxHashMap::default()),
        };

        let chain: Vec<&Class> = self.ancestry().collect();
        for class in chain.into_iter().rev() {
            let initializers = class.fields.read().clone();
            let mut fields = instance.fields.write();
            for (name, value) in initializers {
                fields.insert(name, value);
            }
        }

        self.constructor.call(&instance, args);
        instance
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("id", &format_args!("{:#x}", self.id()))
            .field("base", &self.base.as_ref().map(|b| b.name()))
            .finish()
    }
}

/// An instance of a host class
pub struct Instance {
    class: Arc<Class>,
    fields: RwLock<FxHashMap<String, Value>>,
}

impl Instance {
    /// Class of the instance
    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    /// Read a property: own fields first, then the prototype chain
    pub fn get(&self, name: &str) -> Value {
        if let Some(value) = self.fields.read().get(name).cloned() {
            return value;
        }
        match self.class.lookup_instance(name) {
            Some(Member::Value(v)) => v,
            Some(Member::Accessor {
                getter: Some(getter),
                ..
            }) => getter.call(self, &[]).unwrap_or_default(),
            _ => Value::Undefined,
        }
    }

    /// Write a property: goes through a setter on the prototype chain if one
    /// exists, otherwise becomes an own field.
    pub fn set(&self, name: &str, value: Value) {
        if let Some(Member::Accessor {
            setter: Some(setter),
            ..
        }) = self.class.lookup_instance(name)
        {
            setter.call(self, &[value]);
            return;
        }
        self.fields.write().insert(name.to_string(), value);
    }

    /// Invoke a method resolved on the prototype chain
    pub fn invoke(&self, name: &str, args: &[Value]) -> ReflectResult<Value> {
        let member = self
            .class
            .lookup_instance(name)
            .ok_or_else(|| ReflectError::MemberNotFound {
                class: self.class.name().to_string(),
                member: name.to_string(),
            })?;

        member
            .as_function()
            .and_then(|function| function.call(self, args))
            .ok_or_else(|| ReflectError::NotCallable {
                class: self.class.name().to_string(),
                member: name.to_string(),
            })
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name())
            .field("fields", &*self.fields.read())
            .finish()
    }
}
