//! Method descriptors

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::trace;

use super::{ClassDescriptor, MethodKind, ParameterDescriptor};
use crate::attribute::{Annotated, Annotations};
use crate::types::TypeRef;

struct MethodState {
    kind: MethodKind,
    /// Creation order; decorators usually run last parameter first
    parameters: Vec<Arc<ParameterDescriptor>>,
    return_type: Option<TypeRef>,
}

/// Metadata of a method or the constructor
pub struct MethodDescriptor {
    name: String,
    parent: Weak<ClassDescriptor>,
    annotations: Annotations,
    state: RwLock<MethodState>,
}

impl MethodDescriptor {
    pub(crate) fn new(name: &str, kind: MethodKind, parent: Weak<ClassDescriptor>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            parent,
            annotations: Annotations::default(),
            state: RwLock::new(MethodState {
                kind,
                parameters: Vec::new(),
                return_type: None,
            }),
        })
    }

    /// Method name; `"constructor"` for the constructor
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning class descriptor
    pub fn parent(&self) -> Option<Arc<ClassDescriptor>> {
        self.parent.upgrade()
    }

    /// Method kind
    pub fn kind(&self) -> MethodKind {
        self.state.read().kind
    }

    /// Override the method kind
    pub fn set_kind(&self, kind: MethodKind) {
        self.state.write().kind = kind;
    }

    /// Whether this is the class constructor
    pub fn is_constructor(&self) -> bool {
        self.kind() == MethodKind::Constructor
    }

    /// Declared return type
    pub fn return_type(&self) -> Option<TypeRef> {
        self.state.read().return_type.clone()
    }

    /// Set the declared return type
    pub fn set_return_type(&self, ty: TypeRef) {
        self.state.write().return_type = Some(ty);
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// Parameters in creation order
    pub fn parameters(&self) -> Vec<Arc<ParameterDescriptor>> {
        self.state.read().parameters.clone()
    }

    /// Parameters ordered by position
    pub fn sorted_parameters(&self) -> Vec<Arc<ParameterDescriptor>> {
        let mut parameters = self.parameters();
        parameters.sort_by_key(|p| p.idx());
        parameters
    }

    /// Number of parameter descriptors
    pub fn parameter_count(&self) -> usize {
        self.state.read().parameters.len()
    }

    /// Find a parameter descriptor without creating it
    pub fn parameter(&self, idx: usize) -> Option<Arc<ParameterDescriptor>> {
        self.state
            .read()
            .parameters
            .iter()
            .find(|p| p.idx() == idx)
            .cloned()
    }

    /// Find or create the parameter descriptor at a position
    pub fn get_or_create_parameter(self: &Arc<Self>, idx: usize) -> Arc<ParameterDescriptor> {
        if let Some(found) = self.parameter(idx) {
            return found;
        }

        let created = {
            let mut state = self.state.write();
            if let Some(found) = state.parameters.iter().find(|p| p.idx() == idx) {
                return Arc::clone(found);
            }
            let parameter = ParameterDescriptor::new(idx, Arc::downgrade(self));
            state.parameters.push(Arc::clone(&parameter));
            parameter
        };

        trace!(method = %self.name, idx, "created parameter descriptor");
        if let Some(class) = self.parent() {
            class
                .context()
                .hooks
                .invoke(|h| h.on_create_parameter(&class, self, &created));
        }
        created
    }

    /// Drop the parameter descriptor at a position, returning it
    pub fn remove_parameter(&self, idx: usize) -> Option<Arc<ParameterDescriptor>> {
        let mut state = self.state.write();
        let position = state.parameters.iter().position(|p| p.idx() == idx)?;
        Some(state.parameters.remove(position))
    }
}

impl Annotated for MethodDescriptor {
    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("kind", &state.kind)
            .field("parameters", &state.parameters)
            .field("return_type", &state.return_type)
            .finish()
    }
}
