//! Reflection hooks
//!
//! Observers notified on every metadata lifecycle event. A hook implements
//! any subset of [`ReflectionHook`]; callbacks it does not override are
//! no-ops. Hooks run synchronously, in registration order, and a panic in a
//! hook unwinds through the operation that fired it.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::descriptor::{ClassDescriptor, MethodDescriptor, ParameterDescriptor, PropertyDescriptor};
use crate::error::{ReflectError, ReflectResult};

/// Observer of descriptor lifecycle events
#[allow(unused_variables)]
pub trait ReflectionHook: Send + Sync {
    /// Called after the class descriptor has been created
    fn on_create_class(&self, class: &Arc<ClassDescriptor>) {}

    /// Called after a class decorator is applied
    fn on_decorated_class(&self, class: &Arc<ClassDescriptor>) {}

    /// Called once the class has been reconciled with ambient type
    /// information
    fn on_processed_class(&self, class: &Arc<ClassDescriptor>) {}

    /// Called once a method descriptor is created
    fn on_create_method(&self, class: &Arc<ClassDescriptor>, method: &Arc<MethodDescriptor>) {}

    /// Called after a method (or constructor) decorator is applied
    fn on_decorated_method(&self, class: &Arc<ClassDescriptor>, method: &Arc<MethodDescriptor>) {}

    /// Called once a method is processed by the build pass. Afterwards:
    /// - parameters have names where they could be extracted
    /// - undecorated parameters carry their ambient type
    /// - the return type is set when known
    fn on_processed_method(&self, class: &Arc<ClassDescriptor>, method: &Arc<MethodDescriptor>) {}

    /// Called once a property descriptor is created
    fn on_create_property(&self, class: &Arc<ClassDescriptor>, property: &Arc<PropertyDescriptor>) {}

    /// Called after a property decorator is applied
    fn on_decorated_property(
        &self,
        class: &Arc<ClassDescriptor>,
        property: &Arc<PropertyDescriptor>,
    ) {
    }

    /// Called once a parameter descriptor is created
    fn on_create_parameter(
        &self,
        class: &Arc<ClassDescriptor>,
        method: &Arc<MethodDescriptor>,
        parameter: &Arc<ParameterDescriptor>,
    ) {
    }

    /// Called after a parameter decorator is applied
    fn on_decorated_parameter(
        &self,
        class: &Arc<ClassDescriptor>,
        method: &Arc<MethodDescriptor>,
        parameter: &Arc<ParameterDescriptor>,
    ) {
    }
}

/// Process-wide list of hooks
#[derive(Default)]
pub struct HookRegistry {
    hooks: RwLock<Vec<Arc<dyn ReflectionHook>>>,
}

impl HookRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook
    pub fn register(&self, hook: Arc<dyn ReflectionHook>) {
        self.hooks.write().push(hook);
    }

    /// Append a hook that may be absent
    pub fn add(&self, hook: Option<Arc<dyn ReflectionHook>>) -> ReflectResult<()> {
        let hook = hook.ok_or(ReflectError::InvalidHook)?;
        self.register(hook);
        Ok(())
    }

    /// Call `f` on every hook in registration order.
    ///
    /// Works on a snapshot, so hooks may register further hooks or query the
    /// registry; hooks added meanwhile see only later events.
    pub fn invoke(&self, f: impl Fn(&dyn ReflectionHook)) {
        let hooks = self.hooks.read().clone();
        for hook in &hooks {
            f(hook.as_ref());
        }
    }

    /// Number of registered hooks
    pub fn len(&self) -> usize {
        self.hooks.read().len()
    }

    /// Whether no hook is registered
    pub fn is_empty(&self) -> bool {
        self.hooks.read().is_empty()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.len())
            .finish()
    }
}

type ClassFn = Box<dyn Fn(&Arc<ClassDescriptor>) + Send + Sync>;
type MethodFn = Box<dyn Fn(&Arc<ClassDescriptor>, &Arc<MethodDescriptor>) + Send + Sync>;
type PropertyFn = Box<dyn Fn(&Arc<ClassDescriptor>, &Arc<PropertyDescriptor>) + Send + Sync>;
type ParameterFn = Box<
    dyn Fn(&Arc<ClassDescriptor>, &Arc<MethodDescriptor>, &Arc<ParameterDescriptor>)
        + Send
        + Sync,
>;

/// A hook assembled from closures, for observers interested in a few events
///
/// ```rust,ignore
/// reflector.register_hook(PartialHook::new().on_create_class(|cd| {
///     println!("described {}", cd.name());
/// }));
/// ```
#[derive(Default)]
pub struct PartialHook {
    create_class: Option<ClassFn>,
    decorated_class: Option<ClassFn>,
    processed_class: Option<ClassFn>,
    create_method: Option<MethodFn>,
    decorated_method: Option<MethodFn>,
    processed_method: Option<MethodFn>,
    create_property: Option<PropertyFn>,
    decorated_property: Option<PropertyFn>,
    create_parameter: Option<ParameterFn>,
    decorated_parameter: Option<ParameterFn>,
}

impl PartialHook {
    /// Hook with no callbacks
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `on_create_class`
    pub fn on_create_class(
        mut self,
        f: impl Fn(&Arc<ClassDescriptor>) + Send + Sync + 'static,
    ) -> Self {
        self.create_class = Some(Box::new(f));
        self
    }

    /// Set `on_decorated_class`
    pub fn on_decorated_class(
        mut self,
        f: impl Fn(&Arc<ClassDescriptor>) + Send + Sync + 'static,
    ) -> Self {
        self.decorated_class = Some(Box::new(f));
        self
    }

    /// Set `on_processed_class`
    pub fn on_processed_class(
        mut self,
        f: impl Fn(&Arc<ClassDescriptor>) + Send + Sync + 'static,
    ) -> Self {
        self.processed_class = Some(Box::new(f));
        self
    }

    /// Set `on_create_method`
    pub fn on_create_method(
        mut self,
        f: impl Fn(&Arc<ClassDescriptor>, &Arc<MethodDescriptor>) + Send + Sync + 'static,
    ) -> Self {
        self.create_method = Some(Box::new(f));
        self
    }

    /// Set `on_decorated_method`
    pub fn on_decorated_method(
        mut self,
        f: impl Fn(&Arc<ClassDescriptor>, &Arc<MethodDescriptor>) + Send + Sync + 'static,
    ) -> Self {
        self.decorated_method = Some(Box::new(f));
        self
    }

    /// Set `on_processed_method`
    pub fn on_processed_method(
        mut self,
        f: impl Fn(&Arc<ClassDescriptor>, &Arc<MethodDescriptor>) + Send + Sync + 'static,
    ) -> Self {
        self.processed_method = Some(Box::new(f));
        self
    }

    /// Set `on_create_property`
    pub fn on_create_property(
        mut self,
        f: impl Fn(&Arc<ClassDescriptor>, &Arc<PropertyDescriptor>) + Send + Sync + 'static,
    ) -> Self {
        self.create_property = Some(Box::new(f));
        self
    }

    /// Set `on_decorated_property`
    pub fn on_decorated_property(
        mut self,
        f: impl Fn(&Arc<ClassDescriptor>, &Arc<PropertyDescriptor>) + Send + Sync + 'static,
    ) -> Self {
        self.decorated_property = Some(Box::new(f));
        self
    }

    /// Set `on_create_parameter`
    pub fn on_create_parameter(
        mut self,
        f: impl Fn(&Arc<ClassDescriptor>, &Arc<MethodDescriptor>, &Arc<ParameterDescriptor>)
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.create_parameter = Some(Box::new(f));
        self
    }

    /// Set `on_decorated_parameter`
    pub fn on_decorated_parameter(
        mut self,
        f: impl Fn(&Arc<ClassDescriptor>, &Arc<MethodDescriptor>, &Arc<ParameterDescriptor>)
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.decorated_parameter = Some(Box::new(f));
        self
    }
}

impl ReflectionHook for PartialHook {
    fn on_create_class(&self, class: &Arc<ClassDescriptor>) {
        if let Some(f) = &self.create_class {
            f(class);
        }
    }

    fn on_decorated_class(&self, class: &Arc<ClassDescriptor>) {
        if let Some(f) = &self.decorated_class {
            f(class);
        }
    }

    fn on_processed_class(&self, class: &Arc<ClassDescriptor>) {
        if let Some(f) = &self.processed_class {
            f(class);
        }
    }

    fn on_create_method(&self, class: &Arc<ClassDescriptor>, method: &Arc<MethodDescriptor>) {
        if let Some(f) = &self.create_method {
            f(class, method);
        }
    }

    fn on_decorated_method(&self, class: &Arc<ClassDescriptor>, method: &Arc<MethodDescriptor>) {
        if let Some(f) = &self.decorated_method {
            f(class, method);
        }
    }

    fn on_processed_method(&self, class: &Arc<ClassDescriptor>, method: &Arc<MethodDescriptor>) {
        if let Some(f) = &self.processed_method {
            f(class, method);
        }
    }

    fn on_create_property(&self, class: &Arc<ClassDescriptor>, property: &Arc<PropertyDescriptor>) {
        if let Some(f) = &self.create_property {
            f(class, property);
        }
    }

    fn on_decorated_property(
        &self,
        class: &Arc<ClassDescriptor>,
        property: &Arc<PropertyDescriptor>,
    ) {
        if let Some(f) = &self.decorated_property {
            f(class, property);
        }
    }

    fn on_create_parameter(
        &self,
        class: &Arc<ClassDescriptor>,
        method: &Arc<MethodDescriptor>,
        parameter: &Arc<ParameterDescriptor>,
    ) {
        if let Some(f) = &self.create_parameter {
            f(class, method, parameter);
        }
    }

    fn on_decorated_parameter(
        &self,
        class: &Arc<ClassDescriptor>,
        method: &Arc<MethodDescriptor>,
        parameter: &Arc<ParameterDescriptor>,
    ) {
        if let Some(f) = &self.decorated_parameter {
            f(class, method, parameter);
        }
    }
}
