// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Static field filtering policy.

use regex::Regex;

use crate::{
    error::MappingError,
    model::{FieldDef, builtins::PHANTOM_DATA}
};

/// Rule excluding fields by name pattern, declared type name, or both.
///
/// The name pattern must match the whole field name. When both criteria are
/// given, both must match.
#[derive(Debug, Clone)]
pub struct FieldMatch {
    name:      Option<Regex>,
    type_name: Option<String>
}

impl FieldMatch {
    /// Build a rule.
    ///
    /// # Errors
    ///
    /// - [`MappingError::EmptyFieldMatch`] when neither criterion is given
    /// - [`MappingError::InvalidFieldPattern`] when the pattern does not
    ///   compile
    pub fn new(name_pattern: Option<&str>, type_name: Option<&str>) -> Result<Self, MappingError> {
        if name_pattern.is_none() && type_name.is_none() {
            return Err(MappingError::EmptyFieldMatch);
        }
        let name = name_pattern
            .map(|pattern| {
                Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
                    MappingError::InvalidFieldPattern {
                        pattern: pattern.to_owned(),
                        source
                    }
                })
            })
            .transpose()?;
        Ok(Self {
            name,
            type_name: type_name.map(str::to_owned)
        })
    }

    /// Rule matching field names.
    ///
    /// # Errors
    ///
    /// Fails when the pattern does not compile.
    pub fn by_name(pattern: &str) -> Result<Self, MappingError> {
        Self::new(Some(pattern), None)
    }

    /// Rule matching declared raw type names.
    #[must_use]
    pub fn by_type(type_name: &str) -> Self {
        Self {
            name:      None,
            type_name: Some(type_name.to_owned())
        }
    }

    /// Whether `field` is excluded by this rule.
    #[must_use]
    pub fn matches(&self, field: &FieldDef) -> bool {
        let name_matches = self
            .name
            .as_ref()
            .is_none_or(|pattern| pattern.is_match(field.name()));
        let type_matches = self
            .type_name
            .as_deref()
            .is_none_or(|type_name| field.ty().raw_name() == Some(type_name));
        name_matches && type_matches
    }
}

/// Decides which enumerated fields become persistent properties.
///
/// Static and synthesized fields are always rejected; the remaining fields
/// are rejected when any [`FieldMatch`] rule matches.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    rules: Vec<FieldMatch>
}

impl FieldFilter {
    /// Filter with the given rules only.
    #[must_use]
    pub fn new(rules: Vec<FieldMatch>) -> Self {
        Self { rules }
    }

    /// Add a rule.
    #[must_use]
    pub fn with(mut self, rule: FieldMatch) -> Self {
        self.rules.push(rule);
        self
    }

    /// Whether `field` should be mapped.
    #[must_use]
    pub fn accepts(&self, field: &FieldDef) -> bool {
        !field.is_static()
            && !field.is_synthetic()
            && !self.rules.iter().any(|rule| rule.matches(field))
    }
}

impl Default for FieldFilter {
    /// Skips `PhantomData` markers and `__`-prefixed names.
    fn default() -> Self {
        let mut rules = vec![FieldMatch::by_type(PHANTOM_DATA)];
        if let Ok(reserved) = FieldMatch::by_name("__.*") {
            rules.push(reserved);
        }
        Self { rules }
    }
}
