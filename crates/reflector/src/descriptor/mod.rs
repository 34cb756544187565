//! Reflection descriptors
//!
//! The metadata graph: a [`ClassDescriptor`] owns its method and property
//! descriptors, a [`MethodDescriptor`] owns its parameter descriptors.
//! Children point back to their parent through `Weak` references.
//!
//! Descriptors are created on demand by the `get_or_create_*` accessors,
//! which are idempotent: the same key always yields the same `Arc` and the
//! creation hook fires once.

mod class;
mod method;
mod parameter;
mod property;

pub(crate) use class::BuildState;
pub use class::{ClassDescriptor, MethodKey};
pub use method::MethodDescriptor;
pub use parameter::ParameterDescriptor;
pub use property::PropertyDescriptor;

use crate::oracle::MemberSide;

/// Reserved method name of the constructor
pub const CONSTRUCTOR: &str = "constructor";

/// Kind of a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Lives on the prototype
    Instance,
    /// Lives on the constructor object
    Static,
    /// The class constructor
    Constructor,
}

impl MethodKind {
    /// Side of the class where ambient metadata for the method lives
    pub fn side(&self) -> MemberSide {
        match self {
            MethodKind::Instance => MemberSide::Instance,
            MethodKind::Static | MethodKind::Constructor => MemberSide::Static,
        }
    }
}

/// Kind of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Per-instance property
    Instance,
    /// Property of the constructor object
    Static,
}

impl PropertyKind {
    /// Side of the class where ambient metadata for the property lives
    pub fn side(&self) -> MemberSide {
        match self {
            PropertyKind::Instance => MemberSide::Instance,
            PropertyKind::Static => MemberSide::Static,
        }
    }
}
