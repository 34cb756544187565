//! Host object model
//!
//! The runtime the reflection layer describes: classes with an instance
//! side and a static side, callable members, instances and values, and
//! [`ClassDef`] for declaring classes with decorators attached.

mod class;
mod decl;
mod function;
mod value;

pub use class::{Class, ClassId, Instance, Member, SlotDescriptor, SlotKind, Target};
pub use decl::{AccessorDef, ClassDef, FieldDef, MethodDef, ParamDef};
pub use function::{Body, Function};
pub use value::Value;
