//! Error types for the reflection layer
//!
//! Descriptor lookups are total and never produce errors; only registration
//! of dynamic classes and hooks, host invocation and configuration loading
//! can fail.

use thiserror::Error;

/// Reflection errors
#[derive(Debug, Error)]
pub enum ReflectError {
    /// A dynamic class with the same name was already registered
    #[error("Cannot create dynamic class '{0}' since it is already registered")]
    DuplicateClass(String),

    /// `add_hook` was called without an observer
    #[error("Invalid hook (null or undefined)")]
    InvalidHook,

    /// Member lookup on an instance failed
    #[error("Member '{member}' not found on class '{class}'")]
    MemberNotFound {
        /// Class name
        class: String,
        /// Member name
        member: String,
    },

    /// Member exists but has no callable body
    #[error("Member '{member}' of class '{class}' is not callable")]
    NotCallable {
        /// Class name
        class: String,
        /// Member name
        member: String,
    },

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reflection result
pub type ReflectResult<T> = Result<T, ReflectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_class_message() {
        let err = ReflectError::DuplicateClass("Foo".to_string());
        assert_eq!(
            err.to_string(),
            "Cannot create dynamic class 'Foo' since it is already registered"
        );
    }

    #[test]
    fn test_member_not_found_message() {
        let err = ReflectError::MemberNotFound {
            class: "Foo".to_string(),
            member: "bar".to_string(),
        };
        assert_eq!(err.to_string(), "Member 'bar' not found on class 'Foo'");
    }
}
