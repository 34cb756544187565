//! Property descriptors

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::{ClassDescriptor, PropertyKind};
use crate::attribute::{Annotated, Annotations};
use crate::types::TypeRef;

struct PropertyState {
    kind: PropertyKind,
    declared_type: Option<TypeRef>,
}

/// Metadata of a field, accessor or static value
pub struct PropertyDescriptor {
    name: String,
    parent: Weak<ClassDescriptor>,
    annotations: Annotations,
    state: RwLock<PropertyState>,
}

impl PropertyDescriptor {
    pub(crate) fn new(name: &str, kind: PropertyKind, parent: Weak<ClassDescriptor>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            parent,
            annotations: Annotations::default(),
            state: RwLock::new(PropertyState {
                kind,
                declared_type: None,
            }),
        })
    }

    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning class descriptor
    pub fn parent(&self) -> Option<Arc<ClassDescriptor>> {
        self.parent.upgrade()
    }

    /// Property kind
    pub fn kind(&self) -> PropertyKind {
        self.state.read().kind
    }

    /// Override the property kind
    pub fn set_kind(&self, kind: PropertyKind) {
        self.state.write().kind = kind;
    }

    /// Declared type
    pub fn declared_type(&self) -> Option<TypeRef> {
        self.state.read().declared_type.clone()
    }

    /// Set the declared type
    pub fn set_declared_type(&self, ty: TypeRef) {
        self.state.write().declared_type = Some(ty);
    }
}

impl Annotated for PropertyDescriptor {
    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("kind", &state.kind)
            .field("declared_type", &state.declared_type)
            .finish()
    }
}
