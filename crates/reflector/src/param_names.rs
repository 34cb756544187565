//! Best-effort parameter name extraction
//!
//! Names are scanned from a callable's declaration text: comments are
//! stripped, the parenthesized parameter list is matched and split on
//! commas. Defaulted, destructured or computed parameters are not
//! understood; a default expression containing a comma or a parenthesis
//! will corrupt the result.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::host::Function;

static FN_ARGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^function\s*[^(]*\(\s*([^)]*)\)").unwrap());
static STRIP_COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(//.*$)|(/\*[\s\S]*?\*/)").unwrap());

/// Something parameter names can be taken from
#[derive(Debug, Clone)]
pub enum Callable {
    /// A function; names are scanned from its declaration text
    Function(Arc<Function>),
    /// Array-style declaration `[name..., function]`: the names are given
    /// explicitly
    Annotated {
        /// Parameter names
        names: Vec<String>,
        /// The function itself
        function: Arc<Function>,
    },
}

/// Ordered formal parameter names of a callable.
///
/// Returns an empty list for zero-arity functions, functions without
/// declaration text and text that does not parse. Scanned names are cached
/// on the function.
pub fn parameter_names(callable: &Callable) -> Vec<String> {
    match callable {
        Callable::Function(function) => function_parameter_names(function),
        Callable::Annotated { names, .. } => names.clone(),
    }
}

/// Parameter names of a function, cached on the function
pub fn function_parameter_names(function: &Function) -> Vec<String> {
    if function.arity() == 0 {
        return Vec::new();
    }
    function
        .scanned_parameters
        .get_or_init(|| scan(function.source().unwrap_or_default()))
        .clone()
}

fn scan(source: &str) -> Vec<String> {
    let text = format!("function {}", STRIP_COMMENTS.replace_all(source, ""));
    let Some(decl) = FN_ARGS.captures(&text).and_then(|c| c.get(1)) else {
        return Vec::new();
    };
    decl.as_str().split(',').filter_map(bare_name).collect()
}

/// Trim whitespace and an optional `_name_` marker pair
fn bare_name(fragment: &str) -> Option<String> {
    let name = fragment.trim();
    if name.is_empty() {
        return None;
    }
    let name = match name.strip_prefix('_').and_then(|n| n.strip_suffix('_')) {
        Some(inner) if !inner.is_empty() => inner,
        _ => name,
    };
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(source: &str, arity: usize) -> Vec<String> {
        let function = Function::new("f", arity).with_source(source);
        function_parameter_names(&function)
    }

    #[test]
    fn test_method_text() {
        assert_eq!(names("method(y, z, t) {}", 3), vec!["y", "z", "t"]);
    }

    #[test]
    fn test_function_text() {
        assert_eq!(names("function add(a,b){ return a + b; }", 2), vec!["a", "b"]);
    }

    #[test]
    fn test_comments_are_stripped() {
        let source = "method(/* first */ a, // second\n b) {}";
        assert_eq!(names(source, 2), vec!["a", "b"]);
    }

    #[test]
    fn test_underscore_markers() {
        assert_eq!(names("m(_service_, _x, y_) {}", 3), vec!["service", "_x", "y_"]);
    }

    #[test]
    fn test_zero_arity_is_empty() {
        assert!(names("method(a) {}", 0).is_empty());
    }

    #[test]
    fn test_unparseable_is_empty() {
        assert!(names("=> nothing here", 1).is_empty());
        let function = Function::new("f", 2);
        assert!(function_parameter_names(&function).is_empty());
    }

    #[test]
    fn test_default_values_are_not_understood() {
        // the default expression stays part of the fragment
        assert_eq!(names("m(a, b = 1) {}", 1), vec!["a", "b = 1"]);
    }

    #[test]
    fn test_result_is_cached() {
        let function = Function::new("f", 1).with_source("f(a) {}");
        assert_eq!(function_parameter_names(&function), vec!["a"]);
        assert_eq!(function.scanned_parameters.get().map(Vec::len), Some(1));
        assert_eq!(function_parameter_names(&function), vec!["a"]);
    }

    #[test]
    fn test_annotated_names() {
        let callable = Callable::Annotated {
            names: vec!["$http".to_string(), "$scope".to_string()],
            function: Arc::new(Function::new("ctrl", 2)),
        };
        assert_eq!(parameter_names(&callable), vec!["$http", "$scope"]);
    }
}
