// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Preferred constructor selection.
//!
//! # Selection Policy
//!
//! | Candidates | Selected |
//! |------------|----------|
//! | Any constructor marked `#[persistence_constructor]` | The first marked one |
//! | A public zero-argument constructor | The zero-argument one |
//! | Exactly one constructor with arguments | That one |
//! | Two or more with arguments, none without | None |
//!
//! Only public constructors take part. Ambiguity is not an error.

use std::sync::Arc;

use tracing::trace;

use super::PersistentProperty;
use crate::{
    model::{ConstructorDef, markers},
    reflect::{DeclaredParameterNames, ParameterNameDiscoverer},
    typeinfo::TypeInformation
};

/// One parameter of a preferred constructor.
///
/// Equality covers name, override key, type and owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name:        Option<Arc<str>>,
    information: TypeInformation,
    key:         Option<String>,
    owner:       Option<TypeInformation>
}

impl Parameter {
    /// Parameter bound to properties of `owner`.
    ///
    /// # Arguments
    ///
    /// * `name` - Declared name, if discoverable
    /// * `information` - Resolved parameter type
    /// * `key` - Override expression from `#[value("...")]`
    /// * `owner` - Entity type whose properties the parameter maps
    #[must_use]
    pub const fn new(
        name: Option<Arc<str>>,
        information: TypeInformation,
        key: Option<String>,
        owner: Option<TypeInformation>
    ) -> Self {
        Self {
            name,
            information,
            key,
            owner
        }
    }

    /// Declared name, if discoverable.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Resolved parameter type.
    #[must_use]
    pub const fn type_information(&self) -> &TypeInformation {
        &self.information
    }

    /// Override expression.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Whether an override expression is present.
    #[must_use]
    pub const fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// Entity type owning the constructor.
    #[must_use]
    pub const fn owner(&self) -> Option<&TypeInformation> {
        self.owner.as_ref()
    }

    /// Whether this parameter binds `property`: same owner and same name.
    #[must_use]
    pub fn maps(&self, property: &PersistentProperty) -> bool {
        self.owner.as_ref() == Some(property.owner()) && self.name() == Some(property.name())
    }
}

/// Constructor chosen to instantiate an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferredConstructor {
    constructor: ConstructorDef,
    parameters:  Vec<Parameter>
}

impl PreferredConstructor {
    /// Wrap `constructor` with its resolved parameters.
    #[must_use]
    pub const fn new(constructor: ConstructorDef, parameters: Vec<Parameter>) -> Self {
        Self {
            constructor,
            parameters
        }
    }

    /// Underlying constructor.
    #[must_use]
    pub const fn constructor(&self) -> &ConstructorDef {
        &self.constructor
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Whether the constructor takes arguments.
    #[must_use]
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Whether the constructor takes no arguments.
    #[must_use]
    pub fn is_no_arg(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Whether the constructor carries the explicit selection marker.
    #[must_use]
    pub fn is_explicitly_annotated(&self) -> bool {
        self.constructor
            .attributes()
            .has(markers::PERSISTENCE_CONSTRUCTOR)
    }

    /// Whether some parameter binds `property`.
    #[must_use]
    pub fn is_constructor_parameter(&self, property: &PersistentProperty) -> bool {
        self.parameters
            .iter()
            .any(|parameter| parameter.maps(property))
    }
}

/// Selects the [`PreferredConstructor`] of a type.
#[derive(Clone)]
pub struct PreferredConstructorDiscoverer {
    names: Arc<dyn ParameterNameDiscoverer>
}

impl PreferredConstructorDiscoverer {
    /// Discoverer reading parameter names from `names`.
    #[must_use]
    pub fn new(names: Arc<dyn ParameterNameDiscoverer>) -> Self {
        Self { names }
    }

    /// Preferred constructor of `information`.
    ///
    /// # Arguments
    ///
    /// * `information` - Type whose public constructors are candidates
    /// * `owner` - Entity type recorded on each parameter
    ///
    /// # Returns
    ///
    /// `None` for types without constructors and for ambiguous candidates.
    #[must_use]
    pub fn discover(
        &self,
        information: &TypeInformation,
        owner: Option<&TypeInformation>
    ) -> Option<PreferredConstructor> {
        let raw = information.raw_name()?;
        let candidates = information.introspector().constructors(raw);

        let mut selected: Option<&ConstructorDef> = None;
        let mut no_arg_found = false;
        let mut with_args = 0_usize;

        for candidate in &candidates {
            if candidate.is_explicit() {
                trace!(entity = %information, position = candidate.position(), "explicit persistence constructor");
                return Some(self.build(candidate, information, owner));
            }
            let no_arg = candidate.arity() == 0;
            if selected.is_none() || no_arg {
                selected = Some(candidate);
            }
            if no_arg {
                no_arg_found = true;
            } else {
                with_args += 1;
            }
        }

        if !no_arg_found && with_args > 1 {
            trace!(entity = %information, candidates = with_args, "ambiguous constructors");
            return None;
        }
        let selected = selected?;
        trace!(entity = %information, arity = selected.arity(), "preferred constructor");
        Some(self.build(selected, information, owner))
    }

    fn build(
        &self,
        constructor: &ConstructorDef,
        information: &TypeInformation,
        owner: Option<&TypeInformation>
    ) -> PreferredConstructor {
        if constructor.arity() == 0 {
            return PreferredConstructor::new(constructor.clone(), Vec::new());
        }
        let names = self.names.parameter_names(constructor);
        let types = information.parameter_types(constructor);
        let parameters = constructor
            .params()
            .iter()
            .zip(types)
            .enumerate()
            .map(|(index, (param, information))| {
                let name = names
                    .as_ref()
                    .and_then(|names| names.get(index).cloned().flatten());
                let key = param
                    .attributes()
                    .value(markers::VALUE)
                    .map(str::to_owned);
                Parameter::new(name, information, key, owner.cloned())
            })
            .collect();
        PreferredConstructor::new(constructor.clone(), parameters)
    }
}

impl Default for PreferredConstructorDiscoverer {
    fn default() -> Self {
        Self::new(Arc::new(DeclaredParameterNames::new()))
    }
}

impl std::fmt::Debug for PreferredConstructorDiscoverer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferredConstructorDiscoverer")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{ClassDef, ParamDef, TypeCatalog, TypeRef},
        reflect::ParameterNames,
        typeinfo::TypeResolver
    };

    fn string() -> TypeRef {
        TypeRef::named("String")
    }

    fn resolver() -> TypeResolver {
        TypeResolver::new(
            TypeCatalog::with_builtins()
                .with(
                    ClassDef::class("WithNoArg")
                        .constructor(ConstructorDef::new([ParamDef::new("name", string())]))
                        .constructor(ConstructorDef::no_arg())
                )
                .with(
                    ClassDef::class("Ambiguous")
                        .constructor(ConstructorDef::new([ParamDef::new("a", string())]))
                        .constructor(ConstructorDef::new([
                            ParamDef::new("a", string()),
                            ParamDef::new("b", string())
                        ]))
                )
                .with(
                    ClassDef::class("Explicit")
                        .constructor(ConstructorDef::no_arg())
                        .constructor(
                            ConstructorDef::new([
                                ParamDef::new("a", string()),
                                ParamDef::new("b", string()).with_value("#root.b")
                            ])
                            .explicit()
                        )
                        .constructor(ConstructorDef::new([ParamDef::new("a", string())]))
                )
                .with(
                    ClassDef::class("Single")
                        .constructor(ConstructorDef::new([ParamDef::unnamed(string())]))
                        .constructor(ConstructorDef::new([ParamDef::new("x", string())]).private())
                )
                .with(
                    ClassDef::class("Holder")
                        .type_params(["T"])
                        .constructor(ConstructorDef::new([ParamDef::new("content", TypeRef::param("T"))]))
                )
                .with(ClassDef::class("Bare"))
        )
    }

    fn discover(resolver: &TypeResolver, ty: &TypeRef) -> Option<PreferredConstructor> {
        let info = resolver.resolve(ty);
        PreferredConstructorDiscoverer::default().discover(&info, Some(&info))
    }

    #[test]
    fn no_arg_wins_over_arg_constructor() {
        let resolver = resolver();
        let selected = discover(&resolver, &TypeRef::named("WithNoArg")).expect("selected");
        assert!(selected.is_no_arg());
        assert!(!selected.has_parameters());
    }

    #[test]
    fn ambiguity_yields_none() {
        let resolver = resolver();
        assert!(discover(&resolver, &TypeRef::named("Ambiguous")).is_none());
    }

    #[test]
    fn explicit_marker_wins() {
        let resolver = resolver();
        let selected = discover(&resolver, &TypeRef::named("Explicit")).expect("selected");
        assert!(selected.is_explicitly_annotated());
        assert_eq!(selected.parameters().len(), 2);
        assert_eq!(selected.parameters()[1].key(), Some("#root.b"));
        assert!(!selected.parameters()[0].has_key());
    }

    #[test]
    fn private_constructors_are_ignored_and_names_may_be_missing() {
        let resolver = resolver();
        let selected = discover(&resolver, &TypeRef::named("Single")).expect("selected");
        assert_eq!(selected.parameters().len(), 1);
        assert_eq!(selected.parameters()[0].name(), None);
    }

    #[test]
    fn parameter_types_follow_bindings() {
        let resolver = resolver();
        let selected = discover(&resolver, &TypeRef::generic("Holder", [string()])).expect("selected");
        let parameter = &selected.parameters()[0];
        assert_eq!(parameter.name(), Some("content"));
        assert_eq!(parameter.type_information().to_string(), "String");
    }

    #[test]
    fn types_without_constructors_have_none() {
        let resolver = resolver();
        assert!(discover(&resolver, &TypeRef::named("Bare")).is_none());
    }

    #[test]
    fn custom_name_discoverer_is_consulted() {
        struct Fixed;

        impl ParameterNameDiscoverer for Fixed {
            fn parameter_names(&self, constructor: &ConstructorDef) -> Option<ParameterNames> {
                Some(
                    constructor
                        .params()
                        .iter()
                        .map(|_| Some(Arc::<str>::from("fixed")))
                        .collect::<Vec<_>>()
                        .into()
                )
            }
        }

        let resolver = resolver();
        let info = resolver.resolve_named("Single");
        let selected = PreferredConstructorDiscoverer::new(Arc::new(Fixed))
            .discover(&info, None)
            .expect("selected");
        assert_eq!(selected.parameters()[0].name(), Some("fixed"));
        assert_eq!(selected.parameters()[0].owner(), None);
    }
}
