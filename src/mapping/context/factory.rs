// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Descriptor construction hooks.

use std::sync::Arc;

use crate::{
    mapping::{
        Association, AttributePredicates, EntityVerifier, PersistentEntity, PersistentProperty,
        PreferredConstructor, PropertyOrder, PropertyPredicates
    },
    model::FieldDef,
    simple::SimpleTypeHolder,
    typeinfo::TypeInformation
};

/// Builds the descriptors a [`MappingContext`](super::MappingContext)
/// registers.
///
/// Store adapters implement this to attach their own predicates,
/// verifiers and property ordering. Hooks run while the context holds its
/// registration lock and must not call back into the context.
pub trait MappingFactory: Send + Sync {
    /// Empty entity for `information`.
    fn create_entity(
        &self,
        information: TypeInformation,
        constructor: Option<PreferredConstructor>
    ) -> PersistentEntity;

    /// Property for `field` of `owner`.
    fn create_property(
        &self,
        field: &FieldDef,
        owner: &PersistentEntity,
        simple_types: &SimpleTypeHolder
    ) -> PersistentProperty;

    /// Association owned by `property`.
    fn create_association(&self, property: &Arc<PersistentProperty>) -> Association {
        Association::new(Arc::clone(property), None)
    }
}

/// Factory driven by declarative field markers.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
///
/// use entity_mapping::{
///     error::MappingError,
///     mapping::{BasicMappingFactory, PersistentEntity}
/// };
///
/// let factory = BasicMappingFactory::new().with_verifier(Arc::new(|entity: &PersistentEntity| {
///     if entity.has_id_property() {
///         Ok(())
///     } else {
///         Err(MappingError::Verification {
///             entity: entity.name(),
///             reason: "missing id property".to_owned()
///         })
///     }
/// }));
/// # let _ = factory;
/// ```
#[derive(Clone)]
pub struct BasicMappingFactory {
    predicates: Arc<dyn PropertyPredicates>,
    order:      Option<PropertyOrder>,
    verifiers:  Vec<Arc<dyn EntityVerifier>>
}

impl BasicMappingFactory {
    /// Factory using [`AttributePredicates`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            predicates: Arc::new(AttributePredicates),
            order:      None,
            verifiers:  Vec::new()
        }
    }

    /// Replace the field classification.
    #[must_use]
    pub fn with_predicates(mut self, predicates: Arc<dyn PropertyPredicates>) -> Self {
        self.predicates = predicates;
        self
    }

    /// Keep properties of every entity sorted by `order`.
    #[must_use]
    pub fn with_property_order(mut self, order: PropertyOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Verify every entity with `verifier`.
    #[must_use]
    pub fn with_verifier(mut self, verifier: Arc<dyn EntityVerifier>) -> Self {
        self.verifiers.push(verifier);
        self
    }
}

impl Default for BasicMappingFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingFactory for BasicMappingFactory {
    fn create_entity(
        &self,
        information: TypeInformation,
        constructor: Option<PreferredConstructor>
    ) -> PersistentEntity {
        let entity = PersistentEntity::new(information, constructor);
        let entity = match &self.order {
            Some(order) => entity.with_property_order(Arc::clone(order)),
            None => entity
        };
        self.verifiers
            .iter()
            .fold(entity, |entity, verifier| entity.with_verifier(Arc::clone(verifier)))
    }

    fn create_property(
        &self,
        field: &FieldDef,
        owner: &PersistentEntity,
        simple_types: &SimpleTypeHolder
    ) -> PersistentProperty {
        PersistentProperty::new(field, owner, simple_types, self.predicates.as_ref())
    }
}

impl std::fmt::Debug for BasicMappingFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicMappingFactory")
            .field("ordered", &self.order.is_some())
            .field("verifiers", &self.verifiers.len())
            .finish_non_exhaustive()
    }
}
