// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Injectable entry point and top-level cache.

use std::{fmt, sync::Arc};

use super::information::{Env, TypeCache, TypeInformation};
use crate::{model::TypeRef, reflect::TypeIntrospector};

/// Resolves raw types into [`TypeInformation`] and caches the results.
///
/// The resolver is owned by the application and shared by cloning; clones
/// share one cache. Entries are never evicted while the resolver lives.
/// Instances created through a resolver keep working after it is dropped,
/// they just stop sharing top-level lookups.
///
/// # Example
///
/// ```rust
/// use entity_mapping::{model::TypeCatalog, typeinfo::TypeResolver};
///
/// let resolver = TypeResolver::new(TypeCatalog::with_builtins());
/// let first = resolver.resolve_named("String");
/// let second = resolver.resolve_named("String");
/// assert_eq!(first, second);
/// assert_eq!(resolver.cached(), 1);
/// ```
#[derive(Clone)]
pub struct TypeResolver {
    catalog: Arc<dyn TypeIntrospector>,
    cache:   Arc<TypeCache>
}

impl TypeResolver {
    /// Resolver over an owned introspector.
    #[must_use]
    pub fn new(catalog: impl TypeIntrospector + 'static) -> Self {
        Self::shared(Arc::new(catalog))
    }

    /// Resolver over a shared introspector.
    #[must_use]
    pub fn shared(catalog: Arc<dyn TypeIntrospector>) -> Self {
        Self {
            catalog,
            cache: Arc::new(TypeCache::new())
        }
    }

    fn env(&self) -> Env {
        Env::new(Arc::clone(&self.catalog), Arc::downgrade(&self.cache))
    }

    /// Cached top-level information for `ty`.
    #[must_use]
    pub fn resolve(&self, ty: &TypeRef) -> TypeInformation {
        self.env().resolve(ty.clone())
    }

    /// Cached top-level information for a non-generic named type.
    #[must_use]
    pub fn resolve_named(&self, name: &str) -> TypeInformation {
        self.resolve(&TypeRef::named(name))
    }

    /// Fresh, uncached information for `ty`.
    ///
    /// Equal to the cached instance, but does not share its memoized field
    /// lookups.
    #[must_use]
    pub fn detached(&self, ty: &TypeRef) -> TypeInformation {
        self.env().detached(ty.clone())
    }

    /// Type of a (possibly dotted) field of `info`.
    #[must_use]
    pub fn resolve_field(&self, info: &TypeInformation, field: &str) -> Option<TypeInformation> {
        info.property(field)
    }

    /// Specialization of `candidate` among the supertypes of `info`.
    #[must_use]
    pub fn resolve_super_type(
        &self,
        info: &TypeInformation,
        candidate: &str
    ) -> Option<TypeInformation> {
        info.super_type(candidate)
    }

    /// Underlying introspector.
    #[must_use]
    pub fn introspector(&self) -> &Arc<dyn TypeIntrospector> {
        &self.catalog
    }

    /// Number of cached top-level entries.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl fmt::Debug for TypeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeResolver")
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}
