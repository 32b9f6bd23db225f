// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Constructor parameter name discovery.

use std::sync::Arc;

use dashmap::DashMap;

use crate::model::ConstructorDef;

/// Parameter names of one constructor; unknown names are `None`.
pub type ParameterNames = Arc<[Option<Arc<str>>]>;

/// Resolves constructor parameter names.
pub trait ParameterNameDiscoverer: Send + Sync {
    /// Names for `constructor`, or `None` when names are unavailable
    /// altogether.
    fn parameter_names(&self, constructor: &ConstructorDef) -> Option<ParameterNames>;
}

/// Reads names recorded on the constructor definition.
///
/// Results are cached per declaring type and constructor position.
/// A constructor whose parameters are all unnamed reports names as
/// unavailable.
#[derive(Debug, Default)]
pub struct DeclaredParameterNames {
    cache: DashMap<(Arc<str>, usize), Option<ParameterNames>>
}

impl DeclaredParameterNames {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(constructor: &ConstructorDef) -> Option<ParameterNames> {
        let names: Vec<Option<Arc<str>>> = constructor
            .params()
            .iter()
            .map(|param| param.name().map(Arc::from))
            .collect();
        if !names.is_empty() && names.iter().all(Option::is_none) {
            return None;
        }
        Some(names.into())
    }
}

impl ParameterNameDiscoverer for DeclaredParameterNames {
    fn parameter_names(&self, constructor: &ConstructorDef) -> Option<ParameterNames> {
        let key = (Arc::from(constructor.declaring()), constructor.position());
        self.cache
            .entry(key)
            .or_insert_with(|| Self::read(constructor))
            .value()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassDef, ParamDef, TypeRef};

    fn constructor_of(params: Vec<ParamDef>) -> ConstructorDef {
        let class = ClassDef::class("Point").constructor(ConstructorDef::new(params));
        class.constructors()[0].clone()
    }

    #[test]
    fn reads_declared_names() {
        let constructor = constructor_of(vec![
            ParamDef::new("x", TypeRef::named("i32")),
            ParamDef::unnamed(TypeRef::named("i32")),
        ]);
        let names = DeclaredParameterNames::new().parameter_names(&constructor);
        let names: Option<Vec<_>> =
            names.map(|names| names.iter().map(|n| n.as_deref().map(str::to_owned)).collect());
        assert_eq!(names, Some(vec![Some("x".to_owned()), None]));
    }

    #[test]
    fn all_unnamed_is_unavailable() {
        let constructor = constructor_of(vec![ParamDef::unnamed(TypeRef::named("i32"))]);
        assert!(DeclaredParameterNames::new().parameter_names(&constructor).is_none());
    }

    #[test]
    fn caches_per_declaring_type() {
        let discoverer = DeclaredParameterNames::new();
        let constructor = constructor_of(vec![ParamDef::new("x", TypeRef::named("i32"))]);
        let first = discoverer.parameter_names(&constructor);
        let second = discoverer.parameter_names(&constructor);
        assert!(matches!((first, second), (Some(a), Some(b)) if Arc::ptr_eq(&a, &b)));
    }
}
