//! Custom attributes and tags
//!
//! Every descriptor carries an ordered list of attribute instances and a
//! free-form tag map. Attributes are queried by type: strictly through
//! [`Annotated::attributes_of`], or loosely by simple type name through
//! [`Annotated::attributes_named`], which also matches any name listed in
//! [`Attribute::lineage`]. The name-based query treats two unrelated types
//! with the same simple name as equal.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::Value as TagValue;

/// A typed marker attached to a descriptor by a decorator
pub trait Attribute: Send + Sync + 'static {
    /// Get the attribute as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Simple type name used for name-based matching
    fn kind_name(&self) -> &str {
        simple_type_name(std::any::type_name_of_val(self))
    }

    /// Names of the attribute kinds this one specializes, nearest first
    fn lineage(&self) -> &[&'static str] {
        &[]
    }
}

impl fmt::Debug for dyn Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("kind", &self.kind_name())
            .field("lineage", &self.lineage())
            .finish()
    }
}

fn simple_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Attributes and tags of one descriptor
#[derive(Default)]
pub struct Annotations {
    attributes: RwLock<Vec<Arc<dyn Attribute>>>,
    tags: RwLock<FxHashMap<String, TagValue>>,
}

impl fmt::Debug for Annotations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotations")
            .field("attributes", &*self.attributes.read())
            .field("tags", &*self.tags.read())
            .finish()
    }
}

/// Access to the attributes and tags of a descriptor
pub trait Annotated {
    /// The annotation storage
    fn annotations(&self) -> &Annotations;

    /// Append an attribute instance
    fn add_attribute<A: Attribute>(&self, attribute: A) {
        self.add_shared_attribute(Arc::new(attribute));
    }

    /// Append an already shared attribute instance
    fn add_shared_attribute(&self, attribute: Arc<dyn Attribute>) {
        self.annotations().attributes.write().push(attribute);
    }

    /// All attributes, in attachment order
    fn attributes(&self) -> Vec<Arc<dyn Attribute>> {
        self.annotations().attributes.read().clone()
    }

    /// Attributes of exactly type `A`
    fn attributes_of<A: Attribute + Clone>(&self) -> Vec<A> {
        self.annotations()
            .attributes
            .read()
            .iter()
            .filter_map(|a| a.as_any().downcast_ref::<A>().cloned())
            .collect()
    }

    /// Whether an attribute of type `A` is attached
    fn has_attribute<A: Attribute>(&self) -> bool {
        self.annotations()
            .attributes
            .read()
            .iter()
            .any(|a| a.as_any().is::<A>())
    }

    /// Attributes whose simple type name, or one of whose lineage names,
    /// equals `name`
    fn attributes_named(&self, name: &str) -> Vec<Arc<dyn Attribute>> {
        self.annotations()
            .attributes
            .read()
            .iter()
            .filter(|a| a.kind_name() == name || a.lineage().iter().any(|n| *n == name))
            .cloned()
            .collect()
    }

    /// Set a tag, replacing any previous value
    fn set_tag(&self, key: &str, value: impl Into<TagValue>) {
        self.annotations()
            .tags
            .write()
            .insert(key.to_string(), value.into());
    }

    /// Read a tag
    fn tag(&self, key: &str) -> Option<TagValue> {
        self.annotations().tags.read().get(key).cloned()
    }

    /// Whether a tag is set
    fn has_tag(&self, key: &str) -> bool {
        self.annotations().tags.read().contains_key(key)
    }

    /// Remove a tag, returning its value
    fn remove_tag(&self, key: &str) -> Option<TagValue> {
        self.annotations().tags.write().remove(key)
    }

    /// Snapshot of all tags
    fn tags(&self) -> FxHashMap<String, TagValue> {
        self.annotations().tags.read().clone()
    }
}
