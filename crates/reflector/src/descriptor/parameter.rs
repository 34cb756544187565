//! Parameter descriptors

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::MethodDescriptor;
use crate::attribute::{Annotated, Annotations};
use crate::types::TypeRef;

#[derive(Default)]
struct ParameterState {
    name: Option<String>,
    declared_type: Option<TypeRef>,
}

/// Metadata of one formal parameter
pub struct ParameterDescriptor {
    idx: usize,
    parent: Weak<MethodDescriptor>,
    annotations: Annotations,
    state: RwLock<ParameterState>,
}

impl ParameterDescriptor {
    pub(crate) fn new(idx: usize, parent: Weak<MethodDescriptor>) -> Arc<Self> {
        Arc::new(Self {
            idx,
            parent,
            annotations: Annotations::default(),
            state: RwLock::new(ParameterState::default()),
        })
    }

    /// Zero-based position
    pub fn idx(&self) -> usize {
        self.idx
    }

    /// Owning method descriptor
    pub fn parent(&self) -> Option<Arc<MethodDescriptor>> {
        self.parent.upgrade()
    }

    /// Formal name, once extracted or assigned
    pub fn name(&self) -> Option<String> {
        self.state.read().name.clone()
    }

    /// Assign the formal name
    pub fn set_name(&self, name: impl Into<String>) {
        self.state.write().name = Some(name.into());
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

impl Annotated for ParameterDescriptor {
    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

impl fmt::Debug for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("ParameterDescriptor")
            .field("idx", &self.idx)
            .field("name", &state.name)
            .field("declared_type", &state.declared_type)
            .finish()
    }
}
