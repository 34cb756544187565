//! Host callables

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::{Instance, Value};

/// Native body of a method: receives the instance as `this` and the call
/// arguments.
pub type Body = Arc<dyn Fn(&Instance, &[Value]) -> Value + Send + Sync>;

/// A callable member of a class (method, accessor half or constructor)
pub struct Function {
    name: String,
    /// Number of formal parameters before the first defaulted one
    arity: usize,
    /// Declaration text, e.g. `method(y, z, t) {}`
    source: Option<String>,
    body: Option<Body>,
    /// Parameter names scanned from `source`, filled on first extraction
    pub(crate) scanned_parameters: OnceLock<Vec<String>>,
}

impl Function {
    /// Create a function with a natural arity and no body
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
            source: None,
            body: None,
            scanned_parameters: OnceLock::new(),
        }
    }

    /// Attach declaration text
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach a native body
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Natural arity (`length` of the callable)
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Declaration text, if known
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Whether the function has an invocable body
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Invoke the body. Returns `None` when the function has no body.
    pub fn call(&self, this: &Instance, args: &[Value]) -> Option<Value> {
        self.body.as_ref().map(|body| body(this, args))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("source", &self.source)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}
