// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for the management engine.
//!
//! Configuration errors (`UnsupportedType`, `DuplicateMember`, `MissingField`,
//! `InvalidConfig`, `InvalidIndex`, `TypeNameConflict`) are only produced by
//! `build()` calls. Everything else is a per-call error and never touches the
//! state of the writer or interface that produced it.

use std::fmt;

/// Boxed error returned by caller-supplied suppliers, extractors and invokers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by hdds-mx operations.
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors (build time)
    // ========================================================================
    /// Class has no simple mapping and no registered composite writer.
    UnsupportedType { class: String },
    /// Two members (composite items, attributes, operations, parameters) share a name.
    DuplicateMember { owner: String, name: String },
    /// Required builder field was never set.
    MissingField {
        builder: &'static str,
        field: &'static str,
    },
    /// Builder input is structurally invalid (empty name, no members, ...).
    InvalidConfig(String),
    /// Tabular index name is not a simple-typed member of the row type.
    InvalidIndex { table: String, name: String },
    /// Type name already registered with a different shape.
    TypeNameConflict { name: String },

    // ========================================================================
    // Per-call Errors
    // ========================================================================
    /// Two tabular rows produced the same index key.
    DuplicateKey { table: String, key: String },
    /// No attribute with this name on the interface.
    AttributeNotFound(String),
    /// No operation with this name on the interface.
    OperationNotFound(String),
    /// Argument count or types do not match the operation signature.
    InvalidOperationArguments { operation: String, reason: String },
    /// Attribute supplier (or the writer behind it) failed.
    AttributeRead { attribute: String, source: BoxError },
    /// Member extractor failed inside a composite writer.
    Extraction { member: String, source: BoxError },
    /// Operation invoker failed.
    Invocation { operation: String, source: BoxError },
    /// Value does not conform to its declared open type.
    InvalidValue(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Configuration
            Error::UnsupportedType { class } => {
                write!(f, "Unsupported type: {} has no open type mapping", class)
            }
            Error::DuplicateMember { owner, name } => {
                write!(f, "Duplicate member '{}' in {}", name, owner)
            }
            Error::MissingField { builder, field } => {
                write!(f, "{}: required field '{}' not set", builder, field)
            }
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::InvalidIndex { table, name } => {
                write!(f, "Invalid index '{}' for table '{}'", name, table)
            }
            Error::TypeNameConflict { name } => write!(
                f,
                "Type name conflict: '{}' is already registered with a different shape",
                name
            ),
            // Per-call
            Error::DuplicateKey { table, key } => {
                write!(f, "Duplicate key {} in table '{}'", key, table)
            }
            Error::AttributeNotFound(name) => write!(f, "Attribute not found: {}", name),
            Error::OperationNotFound(name) => write!(f, "Operation not found: {}", name),
            Error::InvalidOperationArguments { operation, reason } => {
                write!(f, "Invalid arguments for operation '{}': {}", operation, reason)
            }
            Error::AttributeRead { attribute, source } => {
                write!(f, "Failed to read attribute '{}': {}", attribute, source)
            }
            Error::Extraction { member, source } => {
                write!(f, "Failed to extract member '{}': {}", member, source)
            }
            Error::Invocation { operation, source } => {
                write!(f, "Operation '{}' failed: {}", operation, source)
            }
            Error::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::AttributeRead { source, .. }
            | Error::Extraction { source, .. }
            | Error::Invocation { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl Error {
    /// True for errors that can only come out of a `build()` call.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedType { .. }
                | Error::DuplicateMember { .. }
                | Error::MissingField { .. }
                | Error::InvalidConfig(_)
                | Error::InvalidIndex { .. }
                | Error::TypeNameConflict { .. }
        )
    }
}

/// Convenient alias for API results using the crate `Error` type.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_messages() {
        let err = Error::AttributeNotFound("uptime".into());
        assert_eq!(err.to_string(), "Attribute not found: uptime");

        let err = Error::DuplicateKey {
            table: "addresses".into(),
            key: "(\"street1\")".into(),
        };
        assert!(err.to_string().contains("addresses"));
    }

    #[test]
    fn test_source_chain() {
        let inner: BoxError = "boom".into();
        let err = Error::AttributeRead {
            attribute: "address".into(),
            source: inner,
        };
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".into()));
        assert!(Error::OperationNotFound("x".into()).source().is_none());
    }

    #[test]
    fn test_configuration_classification() {
        assert!(Error::UnsupportedType {
            class: "Foo".into()
        }
        .is_configuration());
        assert!(!Error::AttributeNotFound("a".into()).is_configuration());
    }
}
