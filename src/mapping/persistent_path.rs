// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Chains of persistent properties.

use std::{fmt, sync::Arc};

use convert_case::{Case, Casing};

use super::PersistentProperty;

/// Property descriptors along a property path, root first.
///
/// Produced by
/// [`MappingContext::persistent_property_path`](super::MappingContext::persistent_property_path);
/// never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersistentPropertyPath {
    properties: Vec<Arc<PersistentProperty>>
}

impl PersistentPropertyPath {
    pub(crate) const fn new(properties: Vec<Arc<PersistentProperty>>) -> Self {
        Self { properties }
    }

    /// Property names joined with `.`.
    #[must_use]
    pub fn to_dot_path(&self) -> String {
        self.to_path(".", |property| Some(property.name().to_owned()))
    }

    /// Render the path with a custom delimiter and converter.
    ///
    /// # Arguments
    ///
    /// * `delimiter` - Separator between rendered segments
    /// * `converter` - Segment rendering; `None` drops the segment
    #[must_use]
    pub fn to_path(
        &self,
        delimiter: &str,
        converter: impl Fn(&PersistentProperty) -> Option<String>
    ) -> String {
        self.properties
            .iter()
            .filter_map(|property| converter(property))
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    /// Render every property name in `case`, e.g. store column paths.
    ///
    /// ```rust
    /// # use convert_case::Case;
    /// # fn render(path: &entity_mapping::mapping::PersistentPropertyPath) -> String {
    /// path.to_cased_path("_", Case::Snake)
    /// # }
    /// ```
    #[must_use]
    pub fn to_cased_path(&self, delimiter: &str, case: Case<'_>) -> String {
        self.to_path(delimiter, |property| Some(property.name().to_case(case)))
    }

    /// Last property.
    #[must_use]
    pub fn leaf_property(&self) -> Option<&Arc<PersistentProperty>> {
        self.properties.last()
    }

    /// First property.
    #[must_use]
    pub fn base_property(&self) -> Option<&Arc<PersistentProperty>> {
        self.properties.first()
    }

    /// Whether this path is a prefix of `other`.
    #[must_use]
    pub fn is_base_path_of(&self, other: &Self) -> bool {
        other.properties.starts_with(&self.properties)
    }

    /// The part of this path after `base`; this path when `base` is not a
    /// prefix, `None` when both are equal.
    #[must_use]
    pub fn extension_for_base_of(&self, base: &Self) -> Option<Self> {
        if !base.is_base_path_of(self) {
            return Some(self.clone());
        }
        let rest = &self.properties[base.properties.len()..];
        (!rest.is_empty()).then(|| Self::new(rest.to_vec()))
    }

    /// The path without its leaf; single properties return themselves.
    #[must_use]
    pub fn parent_path(&self) -> Self {
        match self.properties.split_last() {
            Some((_, parent)) if !parent.is_empty() => Self::new(parent.to_vec()),
            _ => self.clone()
        }
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the path is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Properties, root first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<PersistentProperty>> {
        self.properties.iter()
    }
}

impl<'a> IntoIterator for &'a PersistentPropertyPath {
    type Item = &'a Arc<PersistentProperty>;
    type IntoIter = std::slice::Iter<'a, Arc<PersistentProperty>>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

impl fmt::Display for PersistentPropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dot_path())
    }
}
