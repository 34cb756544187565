//! Reconciliation pass
//!
//! Decorators only describe what they were attached to. The first build of a
//! class descriptor completes the record: undecorated members are picked up
//! by introspecting the class, every method gets one parameter descriptor
//! per formal parameter, and missing names and types are filled from the
//! declaration text and the type oracle. Values set by decorators are never
//! overwritten.

use std::cell::Cell;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::descriptor::{
    BuildState, ClassDescriptor, MethodDescriptor, MethodKind, PropertyDescriptor, PropertyKind,
};
use crate::host::{Class, Function, Member};
use crate::oracle::{TypeQuery, TypeQueryKind};
use crate::param_names::function_parameter_names;

impl ClassDescriptor {
    /// Complete the descriptor from the class and ambient type information.
    ///
    /// Runs once; later calls, including re-entrant calls from hooks during
    /// the pass, return immediately. A pass unwound by a panicking hook is
    /// run again by the next call.
    pub fn build(self: &Arc<Self>) {
        let guard = self.build_state().lock();
        if guard.get() != BuildState::Pending {
            return;
        }
        guard.set(BuildState::Building);
        let _pass = PassGuard { state: &guard };

        debug!(class = self.name(), "building class descriptor");
        self.introspect();

        let mut idx = 0;
        while let Some(method) = self.methods().get(idx).cloned() {
            self.reconcile_method(&method);
            idx += 1;
        }

        for property in self.properties() {
            self.reconcile_property(&property);
        }

        let hooks = &self.context().hooks;
        hooks.invoke(|h| h.on_processed_class(self));
        guard.set(BuildState::Built);
        debug!(class = self.name(), methods = self.methods().len(), "built class descriptor");
    }

    /// Create descriptors for the class's own members
    fn introspect(self: &Arc<Self>) {
        let target = Arc::clone(self.target());
        let config = &self.context().config;

        for (name, member) in target.own_members() {
            if config.is_reserved(&name) {
                continue;
            }
            match member {
                Member::Method(_) => {
                    self.get_or_create_method(name.as_str());
                }
                Member::Accessor { .. } => {
                    self.get_or_create_property(&name);
                }
                Member::Value(_) => {}
            }
        }

        for (name, member) in target.own_static_members() {
            if config.is_reserved(&name) {
                continue;
            }
            match member {
                Member::Method(_) => {
                    self.get_or_create_method(name.as_str()).set_kind(MethodKind::Static);
                }
                Member::Value(_) | Member::Accessor { .. } => {
                    self.get_or_create_property(&name).set_kind(PropertyKind::Static);
                }
            }
        }
    }

    fn reconcile_method(self: &Arc<Self>, method: &Arc<MethodDescriptor>) {
        let target = self.target();
        let kind = method.kind();

        if let Some(arity) = natural_arity(target, method.name(), kind) {
            trace!(class = self.name(), method = method.name(), arity, "reconciling method");
            let context = self.context();
            let member = (kind != MethodKind::Constructor).then_some(method.name());
            let query = |what: TypeQueryKind| TypeQuery {
                kind: what,
                owner: target.as_ref(),
                side: method.kind().side(),
                member,
            };

            if context.config.infer_types {
                for position in 0..arity {
                    let Some(ty) = context.oracle.resolve(&query(TypeQueryKind::ParamType(position))) else {
                        continue;
                    };
                    let parameter = method.get_or_create_parameter(position);
                    if parameter.declared_type().is_none() {
                        parameter.set_declared_type(ty);
                    }
                }
            }

            let count = method.parameter_count();
            if count != arity {
                for position in 0..count.max(arity) {
                    method.get_or_create_parameter(position);
                }
            }

            if kind != MethodKind::Constructor {
                if context.config.extract_parameter_names {
                    let names = resolve_function(target, method.name(), kind)
                        .map(|f| function_parameter_names(&f))
                        .unwrap_or_default();
                    for (position, name) in names.into_iter().enumerate() {
                        let parameter = method.get_or_create_parameter(position);
                        if parameter.name().is_none() {
                            parameter.set_name(name);
                        }
                    }
                }

                if context.config.infer_types && method.return_type().is_none() {
                    if let Some(ty) = context.oracle.resolve(&query(TypeQueryKind::ReturnType)) {
                        method.set_return_type(ty);
                    }
                }
            }
        }

        self.context()
            .hooks
            .invoke(|h| h.on_processed_method(self, method));
    }

    fn reconcile_property(&self, property: &PropertyDescriptor) {
        let context = self.context();
        if !context.config.infer_types || property.declared_type().is_some() {
            return;
        }
        let query = TypeQuery {
            kind: TypeQueryKind::PropertyType,
            owner: self.target().as_ref(),
            side: property.kind().side(),
            member: Some(property.name()),
        };
        if let Some(ty) = context.oracle.resolve(&query) {
            property.set_declared_type(ty);
        }
    }
}

/// Puts an unfinished pass back to pending when it unwinds
struct PassGuard<'a> {
    state: &'a Cell<BuildState>,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        if self.state.get() == BuildState::Building {
            self.state.set(BuildState::Pending);
        }
    }
}

/// The callable a method descriptor stands for, resolved on its side
fn resolve_function(class: &Class, name: &str, kind: MethodKind) -> Option<Arc<Function>> {
    let member = match kind {
        MethodKind::Constructor => return Some(Arc::clone(class.constructor())),
        MethodKind::Instance => class.lookup_instance(name),
        MethodKind::Static => class.lookup_static(name),
    }?;
    member.as_function().cloned()
}

/// Formal parameter count, or `None` when the method cannot be augmented
fn natural_arity(class: &Class, name: &str, kind: MethodKind) -> Option<usize> {
    resolve_function(class, name, kind).map(|f| f.arity())
}
