// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Property path expressions.
//!
//! # Syntax
//!
//! A path is a chain of property names separated by `.` or `_`. Within one
//! delimited token, camelCase boundaries act as implicit separators when
//! the whole token does not name a property:
//!
//! ```text
//! user.address.city    -> user → address → city
//! user_address         -> user → address
//! userAddressCity      -> userAddressCity, else userAddress → city,
//!                         else user → addressCity, else user → address → city
//! ```
//!
//! The longest prefix naming a property wins; shorter prefixes are only
//! tried while backtracking. Segment names are uncapitalized unless they
//! are entirely upper case (`UUID`).

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, LazyLock}
};

use regex::Regex;
use tracing::debug;

use crate::{error::PropertyReferenceError, typeinfo::TypeInformation, utils::naming};

static DELIMITED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_.]?([_.]*?[^_.]+)").expect("valid delimiter pattern"));

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Lu}+\p{Ll}*$").expect("valid boundary pattern"));

/// One resolved segment, before linking.
#[derive(Debug, Clone)]
struct Segment {
    owning_type:   TypeInformation,
    name:          Arc<str>,
    information:   TypeInformation,
    is_collection: bool
}

impl Segment {
    fn resolve(source: &str, owning_type: &TypeInformation) -> Option<Self> {
        let name = naming::normalize_segment(source);
        let property = owning_type.property(&name)?;
        let is_collection = property.is_collection_like();
        let information = property.actual_type().unwrap_or(property);
        Some(Self {
            owning_type: owning_type.clone(),
            name: Arc::from(name),
            information,
            is_collection
        })
    }
}

/// Parsed chain of property segments.
///
/// Equality compares segment names, segment types and continuations.
#[derive(Debug, Clone)]
pub struct PropertyPath {
    owning_type:   TypeInformation,
    name:          Arc<str>,
    information:   TypeInformation,
    is_collection: bool,
    next:          Option<Box<PropertyPath>>
}

impl PropertyPath {
    /// Parse `source` against `root`.
    ///
    /// # Arguments
    ///
    /// * `source` - Path expression, e.g. `user.address.city` or
    ///   `userAddressCity`
    /// * `root` - Type the first segment belongs to
    ///
    /// # Errors
    ///
    /// [`PropertyReferenceError`] naming the segment that does not resolve,
    /// its owning type and the longest resolved prefix.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use entity_mapping::{
    ///     mapping::PropertyPath,
    ///     model::{ClassDef, FieldDef, TypeCatalog, TypeRef},
    ///     typeinfo::TypeResolver
    /// };
    ///
    /// let resolver = TypeResolver::new(
    ///     TypeCatalog::with_builtins()
    ///         .with(ClassDef::class("Address").field(FieldDef::new("city", TypeRef::named("String"))))
    ///         .with(ClassDef::class("User").field(FieldDef::new("address", TypeRef::named("Address"))))
    /// );
    ///
    /// let path = PropertyPath::parse("addressCity", &resolver.resolve_named("User")).unwrap();
    /// assert_eq!(path.dot_path(), "address.city");
    /// assert_eq!(path.leaf_property().type_information().to_string(), "String");
    /// ```
    pub fn parse(source: &str, root: &TypeInformation) -> Result<Self, PropertyReferenceError> {
        let tokens: Vec<&str> = DELIMITED
            .captures_iter(source)
            .filter_map(|captures| captures.get(1))
            .map(|token| token.as_str())
            .collect();

        let mut segments: Vec<Segment> = Vec::new();
        let mut owning = root.clone();
        for token in tokens {
            let resolved = create(token, &owning, "", &segments)?;
            if let Some(last) = resolved.last() {
                owning = last.information.clone();
            }
            segments.extend(resolved);
        }

        let path = Self::from_segments(segments)
            .ok_or_else(|| PropertyReferenceError::new(source, root.clone(), None))?;
        debug!(path = %path, root = %root, "parsed property path");
        Ok(path)
    }

    fn from_segments(segments: Vec<Segment>) -> Option<Self> {
        segments
            .into_iter()
            .rev()
            .fold(None, |next, segment| {
                Some(Self {
                    owning_type:   segment.owning_type,
                    name:          segment.name,
                    information:   segment.information,
                    is_collection: segment.is_collection,
                    next:          next.map(Box::new)
                })
            })
    }

    fn segments(&self) -> Vec<Segment> {
        self.iter()
            .map(|path| Segment {
                owning_type:   path.owning_type.clone(),
                name:          Arc::clone(&path.name),
                information:   path.information.clone(),
                is_collection: path.is_collection
            })
            .collect()
    }

    /// Type owning this segment.
    #[must_use]
    pub const fn owning_type(&self) -> &TypeInformation {
        &self.owning_type
    }

    /// Segment name.
    #[must_use]
    pub fn segment(&self) -> &str {
        &self.name
    }

    /// Segment type, with containers unwrapped to their actual type.
    #[must_use]
    pub const fn type_information(&self) -> &TypeInformation {
        &self.information
    }

    /// Whether the segment's property is collection-like.
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        self.is_collection
    }

    /// Continuation, if any.
    #[must_use]
    pub fn next(&self) -> Option<&Self> {
        self.next.as_deref()
    }

    /// Whether a continuation follows.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Segments from this one to the leaf.
    pub fn iter(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |path| path.next())
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always `false`; a parsed path has at least one segment.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Terminal segment.
    #[must_use]
    pub fn leaf_property(&self) -> &Self {
        self.iter().last().unwrap_or(self)
    }

    /// Segment names joined with `.`.
    #[must_use]
    pub fn dot_path(&self) -> String {
        self.iter()
            .map(Self::segment)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// The chain without its leaf; single segments return themselves.
    #[must_use]
    pub fn parent_path(&self) -> Self {
        let mut segments = self.segments();
        if segments.len() > 1 {
            segments.pop();
        }
        Self::from_segments(segments).unwrap_or_else(|| self.clone())
    }

    /// Whether this path is a prefix of `other`.
    #[must_use]
    pub fn is_base_path_of(&self, other: &Self) -> bool {
        let mut theirs = other.iter();
        self.iter().all(|mine| {
            theirs
                .next()
                .is_some_and(|theirs| mine.same_segment(theirs))
        })
    }

    /// The part of this path after `base`.
    ///
    /// # Returns
    ///
    /// This path when `base` is not a prefix of it, `None` when both are
    /// equal.
    #[must_use]
    pub fn extension_for_base_of(&self, base: &Self) -> Option<Self> {
        if !base.is_base_path_of(self) {
            return Some(self.clone());
        }
        let remainder = self.segments().split_off(base.len());
        Self::from_segments(remainder)
    }

    fn same_segment(&self, other: &Self) -> bool {
        self.name == other.name && self.information == other.information
    }
}

/// Resolve `source` (plus a carried camelCase `tail`) against `owning`.
///
/// `base` holds the segments resolved so far and becomes the error's base
/// path.
fn create(
    source: &str,
    owning: &TypeInformation,
    tail: &str,
    base: &[Segment]
) -> Result<Vec<Segment>, PropertyReferenceError> {
    if let Some(segment) = Segment::resolve(source, owning) {
        let mut resolved = vec![segment];
        if !tail.is_empty() {
            let next_owner = resolved[0].information.clone();
            let prefix: Vec<Segment> = base.iter().chain(&resolved).cloned().collect();
            resolved.extend(create(tail, &next_owner, "", &prefix)?);
        }
        return Ok(resolved);
    }

    let error = PropertyReferenceError::new(
        source,
        owning.clone(),
        PropertyPath::from_segments(base.to_vec())
    );
    let split = CAMEL_BOUNDARY
        .find(source)
        .filter(|boundary| boundary.start() > 0);
    let Some(boundary) = split else {
        return Err(error);
    };

    let (head, rest) = source.split_at(boundary.start());
    create(head, owning, &format!("{rest}{tail}"), base).map_err(|deeper| {
        if depth(&deeper) > depth(&error) {
            deeper
        } else {
            error
        }
    })
}

fn depth(error: &PropertyReferenceError) -> usize {
    error.base_path().map_or(0, PropertyPath::len)
}

impl PartialEq for PropertyPath {
    fn eq(&self, other: &Self) -> bool {
        self.same_segment(other) && self.next == other.next
    }
}

impl Eq for PropertyPath {}

impl Hash for PropertyPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.information.hash(state);
        self.next.hash(state);
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owning_type, self.dot_path())
    }
}
