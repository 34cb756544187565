//! Ambient Type Metadata
//!
//! The build pass asks a [`TypeOracle`] for declared types that decorators
//! did not supply. [`DesignMetadata`] is the default oracle: a store in the
//! style of `Reflect.defineMetadata`, filled by the class definition API
//! with the `design:*` keys a compiler would emit.
//!
//! Metadata can be attached to:
//! - a target side directly (constructor parameter types)
//! - a named member on a target side (method parameter/return types,
//!   property types)
//!
//! Targets are keyed by class identity and side. An entry remembers its
//! class weakly: once the class is dropped the entry is ignored, and it is
//! reset when a new class reuses the address. Lookups walk the owner's
//! ancestors, so inherited members resolve to the nearest declaration.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::host::{Class, ClassId, Target};
use crate::types::TypeRef;

/// Parameter types of a constructor or method
pub const DESIGN_PARAM_TYPES: &str = "design:paramtypes";
/// Return type of a method
pub const DESIGN_RETURN_TYPE: &str = "design:returntype";
/// Type of a property
pub const DESIGN_TYPE: &str = "design:type";

/// A key for metadata - can be any string
pub type MetadataKey = String;

/// A property key - the name of a member on a target
pub type PropertyKey = String;

/// Side of a class a member lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberSide {
    /// Prototype (instance members)
    Instance,
    /// Constructor object (static members and the constructor itself)
    Static,
}

impl From<Target<'_>> for MemberSide {
    fn from(target: Target<'_>) -> Self {
        match target {
            Target::Class(_) => MemberSide::Static,
            Target::Prototype(_) => MemberSide::Instance,
        }
    }
}

/// What a [`TypeQuery`] asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeQueryKind {
    /// Declared type of the parameter at a position
    ParamType(usize),
    /// Declared return type
    ReturnType,
    /// Declared property type
    PropertyType,
}

/// A lookup of ambient type information
#[derive(Debug, Clone, Copy)]
pub struct TypeQuery<'a> {
    /// What is requested
    pub kind: TypeQueryKind,
    /// Class owning the member
    pub owner: &'a Class,
    /// Side of the member
    pub side: MemberSide,
    /// Member name; `None` addresses the constructor
    pub member: Option<&'a str>,
}

/// Source of ambient type information
///
/// Implementations may be backed by emitted metadata, static analysis, an
/// IDL or manual annotation. A miss must return `None`, never a placeholder.
pub trait TypeOracle: Send + Sync {
    /// Resolve a declared type
    fn resolve(&self, query: &TypeQuery<'_>) -> Option<TypeRef>;
}

/// An oracle that knows nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTypeInfo;

impl TypeOracle for NoTypeInfo {
    fn resolve(&self, _query: &TypeQuery<'_>) -> Option<TypeRef> {
        None
    }
}

/// Stored metadata value
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    /// A single type
    Type(TypeRef),
    /// An ordered list of types
    Types(Vec<TypeRef>),
}

type TargetKey = (ClassId, MemberSide);

/// Metadata storage for a single target
#[derive(Debug, Default)]
struct TargetMetadata {
    /// The class the entry was written for
    owner: Weak<Class>,
    /// Direct metadata on the target (key -> value)
    direct: FxHashMap<MetadataKey, MetadataValue>,
    /// Member-level metadata (member -> key -> value)
    properties: FxHashMap<PropertyKey, FxHashMap<MetadataKey, MetadataValue>>,
}

impl TargetMetadata {
    fn is_live(&self) -> bool {
        self.owner.strong_count() > 0
    }
}

/// In-memory `design:*` metadata, the default [`TypeOracle`]
#[derive(Debug, Default)]
pub struct DesignMetadata {
    /// Map from target identity to its metadata
    targets: RwLock<FxHashMap<TargetKey, TargetMetadata>>,
}

impl DesignMetadata {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn target_key(target: Target<'_>) -> TargetKey {
        (target.class().id(), MemberSide::from(target))
    }

    /// Define metadata on a target, or on a member of it when `property`
    /// is given
    pub fn define_metadata(
        &self,
        key: &str,
        value: MetadataValue,
        target: Target<'_>,
        property: Option<&str>,
    ) {
        let mut targets = self.targets.write();
        let entry = targets.entry(Self::target_key(target)).or_default();
        if !entry.is_live() {
            *entry = TargetMetadata {
                owner: Arc::downgrade(target.class()),
                ..TargetMetadata::default()
            };
        }
        match property {
            Some(property) => {
                entry
                    .properties
                    .entry(property.to_string())
                    .or_default()
                    .insert(key.to_string(), value);
            }
            None => {
                entry.direct.insert(key.to_string(), value);
            }
        }
    }

    /// Get metadata from a target or one of its members
    pub fn get_metadata(
        &self,
        key: &str,
        target: Target<'_>,
        property: Option<&str>,
    ) -> Option<MetadataValue> {
        self.lookup(key, Self::target_key(target), property)
    }

    fn lookup(&self, key: &str, target: TargetKey, property: Option<&str>) -> Option<MetadataValue> {
        let targets = self.targets.read();
        let entry = targets.get(&target).filter(|e| e.is_live())?;
        match property {
            Some(property) => entry.properties.get(property)?.get(key).cloned(),
            None => entry.direct.get(key).cloned(),
        }
    }

    /// Check if the target (or member) has metadata under `key`
    pub fn has_metadata(&self, key: &str, target: Target<'_>, property: Option<&str>) -> bool {
        self.get_metadata(key, target, property).is_some()
    }

    /// All metadata keys on a target (or member)
    pub fn metadata_keys(&self, target: Target<'_>, property: Option<&str>) -> Vec<MetadataKey> {
        let targets = self.targets.read();
        let Some(entry) = targets.get(&Self::target_key(target)).filter(|e| e.is_live()) else {
            return Vec::new();
        };
        match property {
            Some(property) => entry
                .properties
                .get(property)
                .map(|p| p.keys().cloned().collect())
                .unwrap_or_default(),
            None => entry.direct.keys().cloned().collect(),
        }
    }

    /// Delete metadata. Returns true if it existed.
    pub fn delete_metadata(&self, key: &str, target: Target<'_>, property: Option<&str>) -> bool {
        let mut targets = self.targets.write();
        let Some(entry) = targets.get_mut(&Self::target_key(target)).filter(|e| e.is_live()) else {
            return false;
        };
        match property {
            Some(property) => entry
                .properties
                .get_mut(property)
                .is_some_and(|p| p.remove(key).is_some()),
            None => entry.direct.remove(key).is_some(),
        }
    }

    /// Number of live targets carrying metadata
    pub fn target_count(&self) -> usize {
        self.targets.read().values().filter(|e| e.is_live()).count()
    }
}

impl DesignMetadata {
    /// Nearest entry for `key` on the owner's side, walking its ancestors
    fn lookup_inherited(&self, key: &str, query: &TypeQuery<'_>) -> Option<MetadataValue> {
        query
            .owner
            .ancestry()
            .find_map(|class| self.lookup(key, (class.id(), query.side), query.member))
    }
}

impl TypeOracle for DesignMetadata {
    fn resolve(&self, query: &TypeQuery<'_>) -> Option<TypeRef> {
        match query.kind {
            TypeQueryKind::ParamType(position) => {
                match self.lookup_inherited(DESIGN_PARAM_TYPES, query)? {
                    MetadataValue::Types(types) => types.get(position).cloned(),
                    MetadataValue::Type(_) => None,
                }
            }
            TypeQueryKind::ReturnType => match self.lookup_inherited(DESIGN_RETURN_TYPE, query)? {
                MetadataValue::Type(ty) => Some(ty),
                MetadataValue::Types(_) => None,
            },
            TypeQueryKind::PropertyType => match self.lookup_inherited(DESIGN_TYPE, query)? {
                MetadataValue::Type(ty) => Some(ty),
                MetadataValue::Types(_) => None,
            },
        }
    }
}
