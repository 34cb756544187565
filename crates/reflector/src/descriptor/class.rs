//! Class descriptors

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};
use tracing::trace;

use super::{MethodDescriptor, MethodKind, PropertyDescriptor, PropertyKind, CONSTRUCTOR};
use crate::attribute::{Annotated, Annotations};
use crate::host::Class;
use crate::registry::Context;
use crate::types::TypeRef;

/// Key of a method lookup: the constructor sentinel or a member name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKey<'a> {
    /// The class constructor
    Constructor,
    /// A named method
    Named(&'a str),
}

impl<'a> MethodKey<'a> {
    /// Normalized method name
    pub fn name(&self) -> &'a str {
        match self {
            MethodKey::Constructor => CONSTRUCTOR,
            MethodKey::Named(name) => name,
        }
    }
}

impl<'a> From<&'a str> for MethodKey<'a> {
    fn from(name: &'a str) -> Self {
        MethodKey::Named(name)
    }
}

impl<'a> From<&'a String> for MethodKey<'a> {
    fn from(name: &'a String) -> Self {
        MethodKey::Named(name)
    }
}

impl<'a> From<Option<&'a str>> for MethodKey<'a> {
    fn from(name: Option<&'a str>) -> Self {
        name.map_or(MethodKey::Constructor, MethodKey::Named)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuildState {
    Pending,
    Building,
    Built,
}

#[derive(Default)]
struct Members {
    methods: Vec<Arc<MethodDescriptor>>,
    properties: Vec<Arc<PropertyDescriptor>>,
}

/// Metadata of one class
///
/// Strictly per class: a descriptor never sees the methods or properties of
/// its ancestors' descriptors. Use
/// [`Reflector::get_with_ancestors`](crate::Reflector::get_with_ancestors)
/// to collect the chain.
pub struct ClassDescriptor {
    name: String,
    target: Arc<Class>,
    context: Arc<Context>,
    annotations: Annotations,
    members: RwLock<Members>,
    build_state: ReentrantMutex<Cell<BuildState>>,
}

impl ClassDescriptor {
    /// Create the descriptor together with its constructor descriptor. No
    /// hook fires here; the registry announces both once registered.
    pub(crate) fn new(target: Arc<Class>, context: Arc<Context>) -> Arc<Self> {
        Arc::new_cyclic(|me| {
            let constructor = MethodDescriptor::new(CONSTRUCTOR, MethodKind::Constructor, me.clone());
            constructor.set_return_type(TypeRef::class(&target));
            Self {
                name: target.name().to_string(),
                target,
                context,
                annotations: Annotations::default(),
                members: RwLock::new(Members {
                    methods: vec![constructor],
                    properties: Vec::new(),
                }),
                build_state: ReentrantMutex::new(Cell::new(BuildState::Pending)),
            }
        })
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The described class
    pub fn target(&self) -> &Arc<Class> {
        &self.target
    }

    pub(crate) fn context(&self) -> &Arc<Context> {
        &self.context
    }

    // ========================================================================
    // Methods
    // ========================================================================

    /// Method descriptors in creation order; the constructor comes first
    pub fn methods(&self) -> Vec<Arc<MethodDescriptor>> {
        self.members.read().methods.clone()
    }

    /// Find a method descriptor without creating it
    pub fn method(&self, name: &str) -> Option<Arc<MethodDescriptor>> {
        self.members
            .read()
            .methods
            .iter()
            .find(|m| m.name() == name)
            .cloned()
    }

    /// The constructor descriptor
    pub fn constructor(self: &Arc<Self>) -> Arc<MethodDescriptor> {
        self.get_or_create_method(MethodKey::Constructor)
    }

    /// Find or create a method descriptor.
    ///
    /// A new descriptor is an instance method when the name resolves on the
    /// prototype chain, otherwise a static one; the constructor name always
    /// yields the constructor.
    pub fn get_or_create_method<'a>(self: &Arc<Self>, key: impl Into<MethodKey<'a>>) -> Arc<MethodDescriptor> {
        let name = key.into().name();
        if let Some(found) = self.method(name) {
            return found;
        }

        let created = {
            let mut members = self.members.write();
            if let Some(found) = members.methods.iter().find(|m| m.name() == name) {
                return Arc::clone(found);
            }
            let kind = if name == CONSTRUCTOR {
                MethodKind::Constructor
            } else if self.target.resolves_on_instance(name) {
                MethodKind::Instance
            } else {
                MethodKind::Static
            };
            let method = MethodDescriptor::new(name, kind, Arc::downgrade(self));
            members.methods.push(Arc::clone(&method));
            method
        };

        trace!(class = %self.name, method = name, kind = ?created.kind(), "created method descriptor");
        self.context.hooks.invoke(|h| h.on_create_method(self, &created));
        created
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Property descriptors in creation order
    pub fn properties(&self) -> Vec<Arc<PropertyDescriptor>> {
        self.members.read().properties.clone()
    }

    /// Find a property descriptor without creating it
    pub fn property(&self, name: &str) -> Option<Arc<PropertyDescriptor>> {
        self.members
            .read()
            .properties
            .iter()
            .find(|p| p.name() == name)
            .cloned()
    }

    /// Find or create a property descriptor.
    ///
    /// A new descriptor is static when the class itself holds a non-nil
    /// value under that name, otherwise an instance property.
    pub fn get_or_create_property(self: &Arc<Self>, name: &str) -> Arc<PropertyDescriptor> {
        if let Some(found) = self.property(name) {
            return found;
        }

        let created = {
            let mut members = self.members.write();
            if let Some(found) = members.properties.iter().find(|p| p.name() == name) {
                return Arc::clone(found);
            }
            let kind = if self.target.resolves_on_static(name) {
                PropertyKind::Static
            } else {
                PropertyKind::Instance
            };
            let property = PropertyDescriptor::new(name, kind, Arc::downgrade(self));
            members.properties.push(Arc::clone(&property));
            property
        };

        trace!(class = %self.name, property = name, kind = ?created.kind(), "created property descriptor");
        self.context.hooks.invoke(|h| h.on_create_property(self, &created));
        created
    }

    // ========================================================================
    // Build state
    // ========================================================================

    /// Whether the reconciliation pass has completed
    pub fn is_built(&self) -> bool {
        self.build_state.lock().get() == BuildState::Built
    }

    pub(crate) fn build_state(&self) -> &ReentrantMutex<Cell<BuildState>> {
        &self.build_state
    }

    /// Mark the descriptor complete without running the reconciliation pass
    pub(crate) fn mark_built(&self) {
        self.build_state.lock().set(BuildState::Built);
    }
}

impl Annotated for ClassDescriptor {
    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members = self.members.read();
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("methods", &members.methods)
            .field("properties", &members.properties)
            .field("annotations", &self.annotations)
            .field("built", &self.is_built())
            .finish()
    }
}
