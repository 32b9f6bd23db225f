// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-memory registry of raw type definitions.

use std::{collections::HashMap, sync::Arc};

use super::{ClassDef, builtins};
use crate::reflect::TypeIntrospector;

/// Name to [`ClassDef`] registry.
///
/// The catalog is the default [`TypeIntrospector`]. It is mutable while it
/// is being filled and is usually frozen behind an `Arc` once handed to a
/// [`TypeResolver`](crate::typeinfo::TypeResolver).
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    classes: HashMap<Arc<str>, Arc<ClassDef>>
}

impl TypeCatalog {
    /// Empty catalog without built-in types.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-filled with the root type, scalars, capability
    /// interfaces and standard containers.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        builtins::register(&mut catalog);
        catalog
    }

    /// Register (or replace) a definition.
    pub fn register(&mut self, class: ClassDef) -> &mut Self {
        self.classes
            .insert(Arc::from(class.name()), Arc::new(class));
        self
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, class: ClassDef) -> Self {
        self.register(class);
        self
    }

    /// Definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<ClassDef>> {
        self.classes.get(name)
    }

    /// Mutable definition by name, cloning it out of any shared `Arc`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ClassDef> {
        self.classes.get_mut(name).map(Arc::make_mut)
    }

    /// Whether a definition with that name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl TypeIntrospector for TypeCatalog {
    fn class(&self, name: &str) -> Option<Arc<ClassDef>> {
        self.classes.get(name).cloned()
    }
}
