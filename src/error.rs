// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types.
//!
//! | Error | Raised by | Recoverable |
//! |-------|-----------|-------------|
//! | [`MappingError::DuplicateIdProperty`], [`MappingError::DuplicateVersionProperty`] | Entity population | No, fix the mapping |
//! | [`MappingError::EmptyFieldMatch`], [`MappingError::InvalidFieldPattern`] | Filter configuration | No, fix the configuration |
//! | [`MappingError::UnknownEntity`] | Strict-mode lookups | Yes, register the type |
//! | [`MappingError::Verification`] | Entity verifiers | No, registration is rolled back |
//! | [`PropertyReferenceError`] | Property path parsing | Yes, report to the user |
//! | [`SourceError`] | Source loading | No, fix the source |
//!
//! Constructor ambiguity is not an error: it shows up as an absent
//! [`PreferredConstructor`](crate::mapping::PreferredConstructor).

use proc_macro2::Span;
use thiserror::Error;

use crate::{mapping::PropertyPath, typeinfo::TypeInformation};

/// Errors raised while building or querying mapping metadata.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A second identifier property was added to an entity.
    #[error(
        "attempt to add id property `{added}` but already have property `{existing}` registered as id on `{entity}`; check your mapping configuration"
    )]
    DuplicateIdProperty {
        /// Entity type.
        entity:   String,
        /// Rejected property.
        added:    String,
        /// Property already registered as id.
        existing: String
    },

    /// A second version property was added to an entity.
    #[error(
        "attempt to add version property `{added}` but already have property `{existing}` registered as version on `{entity}`; check your mapping configuration"
    )]
    DuplicateVersionProperty {
        /// Entity type.
        entity:   String,
        /// Rejected property.
        added:    String,
        /// Property already registered as version.
        existing: String
    },

    /// A field match rule without name pattern and type name.
    #[error("field match rule needs a name pattern or a type name")]
    EmptyFieldMatch,

    /// A field match name pattern that does not compile.
    #[error("invalid field name pattern `{pattern}`")]
    InvalidFieldPattern {
        /// Offending pattern.
        pattern: String,
        /// Regex compilation error.
        #[source]
        source:  regex::Error
    },

    /// Strict-mode lookup of a type that was never registered.
    #[error("unknown persistent entity `{0}`")]
    UnknownEntity(String),

    /// An entity verifier rejected a freshly built entity.
    #[error("persistent entity `{entity}` failed verification: {reason}")]
    Verification {
        /// Entity type.
        entity: String,
        /// Verifier message.
        reason: String
    },

    /// A path segment has no mapped property on its entity.
    #[error("no property `{property}` found on entity `{entity}`")]
    PropertyNotMapped {
        /// Segment name.
        property: String,
        /// Entity type.
        entity:   String
    },

    /// A path traverses a type that cannot be an entity.
    #[error("`{0}` is not a persistent entity")]
    NotAnEntity(String),

    /// A configured type expression does not parse.
    #[error("invalid type expression `{expression}`")]
    InvalidTypeExpression {
        /// Offending expression.
        expression: String,
        /// Parse failure.
        #[source]
        source:     SourceError
    },

    /// A property path does not resolve.
    #[error(transparent)]
    PropertyReference(#[from] PropertyReferenceError)
}

/// A property path segment that does not resolve against its owning type.
#[derive(Debug, Clone, Error)]
#[error("No property {property_name} found for type {owning_type}{}", traversed(.base_path.as_ref()))]
pub struct PropertyReferenceError {
    property_name: String,
    owning_type:   TypeInformation,
    base_path:     Option<PropertyPath>
}

fn traversed(base: Option<&PropertyPath>) -> String {
    base.map(|path| format!("! Traversed path: {}", path.dot_path()))
        .unwrap_or_default()
}

impl PropertyReferenceError {
    pub(crate) fn new(
        property_name: impl Into<String>,
        owning_type: TypeInformation,
        base_path: Option<PropertyPath>
    ) -> Self {
        Self {
            property_name: property_name.into(),
            owning_type,
            base_path
        }
    }

    /// Segment that failed to resolve, as written.
    #[must_use]
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// Type the segment was resolved against.
    #[must_use]
    pub const fn owning_type(&self) -> &TypeInformation {
        &self.owning_type
    }

    /// Longest successfully resolved prefix; `None` when the first segment
    /// failed.
    #[must_use]
    pub const fn base_path(&self) -> Option<&PropertyPath> {
        self.base_path.as_ref()
    }
}

/// Errors raised while loading type definitions from Rust source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A source file cannot be read.
    #[error("failed to read `{path}`")]
    Io {
        /// File path.
        path:   String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error
    },

    /// The source does not parse.
    #[error("failed to parse source at {line}:{column}: {message}")]
    Syntax {
        /// Parser message.
        message: String,
        /// 1-based line.
        line:    usize,
        /// 0-based column.
        column:  usize
    },

    /// An `#[entity(...)]` attribute is malformed.
    #[error("invalid `#[entity]` attribute on `{item}`: {message}")]
    Attribute {
        /// Item carrying the attribute.
        item:    String,
        /// Attribute parser message.
        message: String
    },

    /// A type expression the catalog cannot represent.
    #[error("unsupported type `{ty}` at {line}:{column}")]
    UnsupportedType {
        /// Rendered type.
        ty:     String,
        /// 1-based line.
        line:   usize,
        /// 0-based column.
        column: usize
    }
}

impl SourceError {
    pub(crate) fn unsupported(ty: String, span: Span) -> Self {
        let start = span.start();
        Self::UnsupportedType {
            ty,
            line: start.line,
            column: start.column
        }
    }
}

impl From<syn::Error> for SourceError {
    fn from(error: syn::Error) -> Self {
        let start = error.span().start();
        Self::Syntax {
            message: error.to_string(),
            line:    start.line,
            column:  start.column
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_id_names_both_properties() {
        let error = MappingError::DuplicateIdProperty {
            entity:   "Person".to_owned(),
            added:    "key".to_owned(),
            existing: "id".to_owned()
        };
        let message = error.to_string();
        assert!(message.contains("`key`"));
        assert!(message.contains("`id`"));
        assert!(message.contains("Person"));
    }

    #[test]
    fn syntax_error_carries_location() {
        let error = SourceError::from(
            syn::parse_file("struct Fine;\nstruct Broken { a: }").expect_err("missing field type")
        );
        assert!(matches!(error, SourceError::Syntax { line: 2, .. }));
    }
}
