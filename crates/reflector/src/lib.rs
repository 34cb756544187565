//! Reflector: class reflection metadata
//!
//! This crate records structural metadata about classes as they are
//! declared and decorated, and completes it on demand:
//! - **Descriptors**: class, method, property and parameter records with
//!   declared types, custom attributes and tags (`descriptor` module)
//! - **Registry**: one descriptor per class identity, hooks and the ambient
//!   type oracle (`registry` module)
//! - **Decorators**: factories adapting callbacks to the host decoration
//!   protocol (`decorator` module)
//! - **Build pass**: introspection and reconciliation with ambient type
//!   information (`build` module)
//! - **Dynamic classes**: runtime class construction (`dynamic` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use reflector::{parameter_decorator, Annotated, ClassDef, Reflector, TypeRef};
//!
//! let reflector = Reflector::new();
//! let inject = parameter_decorator(|_, _, p| p.set_tag("inject", true));
//!
//! let class = ClassDef::new("Controller")
//!     .method("handle", |m| {
//!         m.param("request", TypeRef::object()).decorate(inject);
//!         m.param("limit", TypeRef::number());
//!     })
//!     .define(&reflector);
//!
//! let cd = reflector.get_or_create(&class);
//! cd.build();
//! let handle = cd.method("handle").unwrap();
//! assert_eq!(handle.parameter_count(), 2);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Custom attributes and tags
pub mod attribute;

/// Reconciliation pass
pub mod build;

/// Build configuration
pub mod config;

/// Decorator factories and site dispatch
pub mod decorator;

/// Class, method, property and parameter descriptors
pub mod descriptor;

/// Dynamic class construction
pub mod dynamic;

/// Error types
pub mod error;

/// Lifecycle hooks
pub mod hooks;

/// Host object model
pub mod host;

/// Display name decorator
pub mod name;

/// Ambient type information
pub mod oracle;

/// Parameter name extraction
pub mod param_names;

/// Descriptor registry and service object
pub mod registry;

/// Type references
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use attribute::{Annotated, Annotations, Attribute};
pub use config::ReflectConfig;
pub use decorator::{
    any_decorator, class_decorator, decorator_site, method_decorator, parameter_decorator,
    property_decorator, AnyDecorator, ClassDecorator, Decorated, Decorator, DecoratorArg,
    DecoratorSite, MethodDecorator, ParameterDecorator, PropertyDecorator,
};
pub use descriptor::{
    ClassDescriptor, MethodDescriptor, MethodKey, MethodKind, ParameterDescriptor,
    PropertyDescriptor, PropertyKind, CONSTRUCTOR,
};
pub use dynamic::{Dynamic, DynamicClass, DynamicMethod, DynamicParameter, DynamicProperty};
pub use error::{ReflectError, ReflectResult};
pub use hooks::{HookRegistry, PartialHook, ReflectionHook};
pub use host::{Class, ClassDef, Function, Instance, Member, SlotDescriptor, Target, Value};
pub use name::{name_decorator, NAME_TAG};
pub use oracle::{DesignMetadata, MemberSide, MetadataValue, NoTypeInfo, TypeOracle, TypeQuery, TypeQueryKind};
pub use param_names::{parameter_names, Callable};
pub use registry::{Reflector, ReflectorBuilder};
pub use types::{BuiltinType, TypeRef};
