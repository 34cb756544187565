//! Class descriptor registry
//!
//! A [`Reflector`] owns the side table from class identity to descriptor,
//! the hook registry, the ambient type oracle and the build configuration.
//! Most programs use the process-wide instance from [`Reflector::global`];
//! tests and embedders that need isolation create their own.

use std::fmt;
use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::config::ReflectConfig;
use crate::descriptor::ClassDescriptor;
use crate::error::{ReflectError, ReflectResult};
use crate::hooks::{HookRegistry, ReflectionHook};
use crate::host::{Class, ClassId};
use crate::oracle::{DesignMetadata, TypeOracle};

/// Services shared by every descriptor of one reflector
pub(crate) struct Context {
    pub(crate) hooks: HookRegistry,
    pub(crate) oracle: Arc<dyn TypeOracle>,
    pub(crate) config: ReflectConfig,
}

#[derive(Default)]
struct Registry {
    /// Descriptors in registration order
    classes: IndexMap<ClassId, Arc<ClassDescriptor>>,
    /// Names taken by dynamically created classes
    dynamic_names: FxHashSet<String>,
}

static GLOBAL: LazyLock<Reflector> = LazyLock::new(Reflector::new);

/// Reflection service: registry, hooks, oracle and configuration
pub struct Reflector {
    context: Arc<Context>,
    design: Arc<DesignMetadata>,
    registry: RwLock<Registry>,
}

impl Default for Reflector {
    fn default() -> Self {
        Self::new()
    }
}

impl Reflector {
    /// Reflector with the default configuration, backed by its own
    /// [`DesignMetadata`] store
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a reflector
    pub fn builder() -> ReflectorBuilder {
        ReflectorBuilder::default()
    }

    /// The process-wide reflector, created on first use
    pub fn global() -> &'static Reflector {
        &GLOBAL
    }

    /// Build configuration
    pub fn config(&self) -> &ReflectConfig {
        &self.context.config
    }

    /// Store receiving `design:*` metadata from class definitions
    pub fn design_metadata(&self) -> &Arc<DesignMetadata> {
        &self.design
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    /// Registered hooks
    pub fn hooks(&self) -> &HookRegistry {
        &self.context.hooks
    }

    /// Append a hook
    pub fn register_hook(&self, hook: impl ReflectionHook + 'static) {
        self.context.hooks.register(Arc::new(hook));
    }

    /// Append a hook that may be absent; fails with
    /// [`ReflectError::InvalidHook`] when it is
    pub fn add_hook(&self, hook: Option<Arc<dyn ReflectionHook>>) -> ReflectResult<()> {
        self.context.hooks.add(hook)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// The descriptor of exactly this class, creating it on first request.
    ///
    /// Creation announces the implicit constructor and then the class to the
    /// hooks, once per class identity.
    pub fn get_or_create(&self, class: &Arc<Class>) -> Arc<ClassDescriptor> {
        if let Some(found) = self.get(class) {
            return found;
        }

        let descriptor = {
            let mut registry = self.registry.write();
            if let Some(found) = registry.classes.get(&class.id()) {
                return Arc::clone(found);
            }
            let descriptor = ClassDescriptor::new(Arc::clone(class), Arc::clone(&self.context));
            registry.classes.insert(class.id(), Arc::clone(&descriptor));
            descriptor
        };

        debug!(class = class.name(), "created class descriptor");
        let constructor = descriptor.constructor();
        self.context
            .hooks
            .invoke(|h| h.on_create_method(&descriptor, &constructor));
        self.context.hooks.invoke(|h| h.on_create_class(&descriptor));
        descriptor
    }

    /// The descriptor of exactly this class, if one exists. Ancestors are
    /// not consulted.
    pub fn get(&self, class: &Class) -> Option<Arc<ClassDescriptor>> {
        self.registry.read().classes.get(&class.id()).cloned()
    }

    /// Descriptors of the class and its ancestors, nearest first.
    ///
    /// Unregistered classes are `None`; the list ends at the farthest
    /// registered ancestor and is empty when nothing in the chain is
    /// registered.
    pub fn get_with_ancestors(&self, class: &Class) -> Vec<Option<Arc<ClassDescriptor>>> {
        let mut chain: Vec<Option<Arc<ClassDescriptor>>> =
            class.ancestry().map(|c| self.get(c)).collect();
        let len = chain.iter().rposition(Option::is_some).map_or(0, |last| last + 1);
        chain.truncate(len);
        chain
    }

    /// All registered descriptors in registration order
    pub fn classes(&self) -> Vec<Arc<ClassDescriptor>> {
        self.registry.read().classes.values().cloned().collect()
    }

    /// First registered descriptor of a class with this name
    pub fn get_by_name(&self, name: &str) -> Option<Arc<ClassDescriptor>> {
        self.registry
            .read()
            .classes
            .values()
            .find(|cd| cd.name() == name)
            .cloned()
    }

    /// Number of registered descriptors
    pub fn len(&self) -> usize {
        self.registry.read().classes.len()
    }

    /// Whether no descriptor is registered
    pub fn is_empty(&self) -> bool {
        self.registry.read().classes.is_empty()
    }

    /// Reserve a name for a dynamically created class
    pub(crate) fn claim_dynamic_name(&self, name: &str) -> ReflectResult<()> {
        let mut registry = self.registry.write();
        if !registry.dynamic_names.insert(name.to_string()) {
            return Err(ReflectError::DuplicateClass(name.to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for Reflector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflector")
            .field("classes", &self.len())
            .field("hooks", &self.context.hooks)
            .field("config", &self.context.config)
            .finish()
    }
}

/// Builder for a [`Reflector`]
#[derive(Default)]
pub struct ReflectorBuilder {
    config: Option<ReflectConfig>,
    oracle: Option<Arc<dyn TypeOracle>>,
}

impl ReflectorBuilder {
    /// Use this configuration
    pub fn config(mut self, config: ReflectConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Consult this oracle instead of the reflector's own
    /// [`DesignMetadata`] store
    pub fn oracle(mut self, oracle: Arc<dyn TypeOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Create the reflector
    pub fn build(self) -> Reflector {
        let design = Arc::new(DesignMetadata::new());
        let oracle = self
            .oracle
            .unwrap_or_else(|| Arc::clone(&design) as Arc<dyn TypeOracle>);
        Reflector {
            context: Arc::new(Context {
                hooks: HookRegistry::new(),
                oracle,
                config: self.config.unwrap_or_default(),
            }),
            design,
            registry: RwLock::new(Registry::default()),
        }
    }
}
