// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Declarative context configuration.
//!
//! With the `serde` feature, settings deserialize from any serde format;
//! missing keys take their defaults:
//!
//! ```rust
//! # #[cfg(feature = "serde")]
//! # fn main() {
//! use entity_mapping::mapping::MappingSettings;
//!
//! let settings: MappingSettings = serde_json::from_str(
//!     r#"{ "strict": true, "initial_entity_set": ["Person"], "ignored_fields": [{ "name_pattern": "cache_.*" }] }"#
//! )
//! .unwrap();
//! assert!(settings.strict);
//! assert!(!settings.skip_default_simple_types);
//! # }
//! # #[cfg(not(feature = "serde"))]
//! # fn main() {}
//! ```

use std::str::FromStr;

use crate::{
    error::MappingError,
    model::TypeRef,
    reflect::{FieldFilter, FieldMatch},
    simple::SimpleTypeHolder
};

/// Configuration of a [`MappingContext`](super::MappingContext).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default, deny_unknown_fields))]
pub struct MappingSettings {
    /// Fail lookups of unregistered types instead of registering them.
    pub strict:                    bool,
    /// Type expressions registered by `initialize`.
    pub initial_entity_set:        Vec<String>,
    /// Additional simple type names.
    pub simple_types:              Vec<String>,
    /// Leave out the built-in simple types.
    pub skip_default_simple_types: bool,
    /// Extra field filter rules, on top of the default ones.
    pub ignored_fields:            Vec<FieldMatchSettings>
}

/// One field filter rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default, deny_unknown_fields))]
pub struct FieldMatchSettings {
    /// Regular expression matched against the whole field name.
    pub name_pattern: Option<String>,
    /// Raw type name of the field.
    pub type_name:    Option<String>
}

impl FieldMatchSettings {
    fn to_rule(&self) -> Result<FieldMatch, MappingError> {
        FieldMatch::new(self.name_pattern.as_deref(), self.type_name.as_deref())
    }
}

impl MappingSettings {
    pub(super) fn simple_type_holder(&self) -> SimpleTypeHolder {
        SimpleTypeHolder::new(&self.simple_types, !self.skip_default_simple_types)
    }

    pub(super) fn field_filter(&self) -> Result<FieldFilter, MappingError> {
        self.ignored_fields
            .iter()
            .try_fold(FieldFilter::default(), |filter, rule| Ok(filter.with(rule.to_rule()?)))
    }

    pub(super) fn initial_types(&self) -> Result<Vec<TypeRef>, MappingError> {
        self.initial_entity_set
            .iter()
            .map(|expression| {
                TypeRef::from_str(expression).map_err(|source| MappingError::InvalidTypeExpression {
                    expression: expression.clone(),
                    source
                })
            })
            .collect()
    }
}
