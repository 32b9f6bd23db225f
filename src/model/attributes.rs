// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Declarative marker table attached to types, fields, constructors and
//! parameters.

use std::{collections::BTreeMap, sync::Arc};

/// Well-known marker names.
///
/// | Marker | Applies to | Meaning |
/// |--------|------------|---------|
/// | `id` | field | Identifier property |
/// | `version` | field | Optimistic-locking version property |
/// | `transient` | field | Never persisted |
/// | `reference` | field | Association to another entity |
/// | `autowired` | field | Injected at runtime, never persisted |
/// | `value` | field, parameter | Override expression |
/// | `persistence_constructor` | constructor | Explicitly preferred constructor |
/// | `type_alias` | type | Store-facing type alias |
pub mod markers {
    /// Identifier property.
    pub const ID: &str = "id";
    /// Version property.
    pub const VERSION: &str = "version";
    /// Transient property.
    pub const TRANSIENT: &str = "transient";
    /// Association to another entity.
    pub const REFERENCE: &str = "reference";
    /// Runtime-injected property.
    pub const AUTOWIRED: &str = "autowired";
    /// Override expression for fields and constructor parameters.
    pub const VALUE: &str = "value";
    /// Explicitly preferred constructor.
    pub const PERSISTENCE_CONSTRUCTOR: &str = "persistence_constructor";
    /// Store-facing type alias.
    pub const TYPE_ALIAS: &str = "type_alias";
}

/// Marker name to optional value.
///
/// A marker without a value (`#[id]`) is stored as `None`; a marker with a
/// value (`#[value("expr")]`) keeps the string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: BTreeMap<Arc<str>, Option<String>>
}

impl Attributes {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a valueless marker.
    pub fn insert_marker(&mut self, name: impl Into<Arc<str>>) {
        self.entries.insert(name.into(), None);
    }

    /// Add a marker carrying a value.
    pub fn insert_value(&mut self, name: impl Into<Arc<str>>, value: impl Into<String>) {
        self.entries.insert(name.into(), Some(value.into()));
    }

    /// Whether the marker is present, with or without a value.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Value of the marker, if present and valued.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(Option::as_deref)
    }

    /// Whether no marker is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate markers in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_ref(), value.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_without_value() {
        let mut attributes = Attributes::new();
        attributes.insert_marker(markers::ID);
        assert!(attributes.has(markers::ID));
        assert_eq!(attributes.value(markers::ID), None);
    }

    #[test]
    fn marker_with_value() {
        let mut attributes = Attributes::new();
        attributes.insert_value(markers::VALUE, "#root.name");
        assert!(attributes.has(markers::VALUE));
        assert_eq!(attributes.value(markers::VALUE), Some("#root.name"));
    }

    #[test]
    fn iterates_in_name_order() {
        let mut attributes = Attributes::new();
        attributes.insert_marker(markers::VERSION);
        attributes.insert_marker(markers::ID);
        let names: Vec<_> = attributes.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["id", "version"]);
    }
}
