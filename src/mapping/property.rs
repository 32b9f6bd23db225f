// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Property descriptors.
//!
//! A [`PersistentProperty`] wraps one field of an entity. Its classification
//! is computed once at construction from [`PropertyPredicates`] and the
//! resolved field type:
//!
//! | Flag | Source |
//! |------|--------|
//! | `is_transient` | Predicate |
//! | `is_id`, `is_version` | Predicate, never set on transient properties |
//! | `is_association` | Predicate, never set on transient properties |
//! | `is_collection_like`, `is_map`, `is_array` | Resolved type |
//! | `is_entity` | Actual type is not simple and the property is neither transient nor a container |

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::OnceLock
};

use super::PersistentEntity;
use crate::{
    model::{FieldDef, TypeRef, markers},
    simple::SimpleTypeHolder,
    typeinfo::TypeInformation
};

/// Classification of fields, usually backed by declarative markers.
pub trait PropertyPredicates: Send + Sync {
    /// Whether the field is the identifier.
    fn is_id(&self, field: &FieldDef) -> bool;

    /// Whether the field is the version.
    fn is_version(&self, field: &FieldDef) -> bool;

    /// Whether the field is never persisted.
    fn is_transient(&self, field: &FieldDef) -> bool;

    /// Whether the field references another entity.
    fn is_association(&self, field: &FieldDef) -> bool;

    /// Override expression for the field's value.
    fn value_expression(&self, field: &FieldDef) -> Option<String> {
        let _ = field;
        None
    }
}

/// Predicates reading the [`markers`] table of each field.
///
/// | Marker | Effect |
/// |--------|--------|
/// | `#[id]` | Identifier |
/// | `#[version]` | Version |
/// | `#[transient]`, `#[autowired]`, `#[value(..)]` | Transient |
/// | `#[reference]` | Association |
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributePredicates;

impl PropertyPredicates for AttributePredicates {
    fn is_id(&self, field: &FieldDef) -> bool {
        field.attributes().has(markers::ID)
    }

    fn is_version(&self, field: &FieldDef) -> bool {
        field.attributes().has(markers::VERSION)
    }

    fn is_transient(&self, field: &FieldDef) -> bool {
        let attributes = field.attributes();
        attributes.has(markers::TRANSIENT)
            || attributes.has(markers::VALUE)
            || attributes.has(markers::AUTOWIRED)
    }

    fn is_association(&self, field: &FieldDef) -> bool {
        field.attributes().has(markers::REFERENCE)
    }

    fn value_expression(&self, field: &FieldDef) -> Option<String> {
        field
            .attributes()
            .value(markers::VALUE)
            .map(str::to_owned)
    }
}

/// One mapped field of one entity.
pub struct PersistentProperty {
    field:              FieldDef,
    owner:              TypeInformation,
    information:        TypeInformation,
    actual:             Option<TypeInformation>,
    value_expression:   Option<String>,
    is_transient:       bool,
    is_id:              bool,
    is_version:         bool,
    is_association:     bool,
    is_collection_like: bool,
    is_map:             bool,
    is_entity:          bool,
    simple_types:       SimpleTypeHolder,
    entity_types:       OnceLock<Vec<TypeInformation>>
}

impl PersistentProperty {
    /// Describe `field` as a property of `owner`.
    ///
    /// # Arguments
    ///
    /// * `field` - Field as enumerated from the owner's type
    /// * `owner` - Entity under construction
    /// * `simple_types` - Simple-type predicate
    /// * `predicates` - Field classification
    #[must_use]
    pub fn new(
        field: &FieldDef,
        owner: &PersistentEntity,
        simple_types: &SimpleTypeHolder,
        predicates: &dyn PropertyPredicates
    ) -> Self {
        let owner = owner.type_information().clone();
        let information = owner.field_type(field);
        let actual = information.actual_type();

        let is_transient = predicates.is_transient(field);
        let is_collection_like = information.is_collection_like();
        let is_map = information.is_map();
        let is_entity = !is_transient
            && !is_collection_like
            && !is_map
            && actual
                .as_ref()
                .is_some_and(|actual| !simple_types.is_simple_type(actual));

        Self {
            field: field.clone(),
            value_expression: predicates.value_expression(field),
            is_id: !is_transient && predicates.is_id(field),
            is_version: !is_transient && predicates.is_version(field),
            is_association: !is_transient && predicates.is_association(field),
            is_transient,
            is_collection_like,
            is_map,
            is_entity,
            owner,
            information,
            actual,
            simple_types: simple_types.clone(),
            entity_types: OnceLock::new()
        }
    }

    /// Property name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.field.name()
    }

    /// Underlying field.
    #[must_use]
    pub const fn field(&self) -> &FieldDef {
        &self.field
    }

    /// Type information of the owning entity.
    #[must_use]
    pub const fn owner(&self) -> &TypeInformation {
        &self.owner
    }

    /// Resolved property type.
    #[must_use]
    pub const fn type_information(&self) -> &TypeInformation {
        &self.information
    }

    /// Declared field type, before substitution.
    #[must_use]
    pub fn raw_type(&self) -> &TypeRef {
        self.field.ty()
    }

    /// Resolved property type expression.
    #[must_use]
    pub fn resolved_type(&self) -> &TypeRef {
        self.information.resolved_type()
    }

    /// Payload type behind container wrappers.
    #[must_use]
    pub fn actual_type(&self) -> Option<&TypeInformation> {
        self.actual.as_ref()
    }

    /// Element type of collection-like properties, key type of maps.
    #[must_use]
    pub fn component_type(&self) -> Option<TypeInformation> {
        if self.is_collection_like || self.is_map {
            self.information.component_type()
        } else {
            None
        }
    }

    /// Value type of map properties.
    #[must_use]
    pub fn map_value_type(&self) -> Option<TypeInformation> {
        if self.is_map {
            self.information.map_value_type()
        } else {
            None
        }
    }

    /// Override expression, e.g. from `#[value("...")]`.
    #[must_use]
    pub fn value_expression(&self) -> Option<&str> {
        self.value_expression.as_deref()
    }

    /// Whether the property is never persisted.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        self.is_transient
    }

    /// Whether the property is persisted.
    #[must_use]
    pub const fn should_be_persisted(&self) -> bool {
        !self.is_transient
    }

    /// Whether this is the identifier property.
    #[must_use]
    pub const fn is_id_property(&self) -> bool {
        self.is_id
    }

    /// Whether this is the version property.
    #[must_use]
    pub const fn is_version_property(&self) -> bool {
        self.is_version
    }

    /// Whether the property references another entity.
    #[must_use]
    pub const fn is_association(&self) -> bool {
        self.is_association
    }

    /// Whether the property is an array or collection.
    #[must_use]
    pub const fn is_collection_like(&self) -> bool {
        self.is_collection_like
    }

    /// Whether the property is an associative container.
    #[must_use]
    pub const fn is_map(&self) -> bool {
        self.is_map
    }

    /// Whether the property is an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.information.is_array()
    }

    /// Whether the property itself holds a nested entity.
    #[must_use]
    pub const fn is_entity(&self) -> bool {
        self.is_entity
    }

    /// Types that must be registered as entities because of this property.
    ///
    /// Contains the property type when [`is_entity`](Self::is_entity), and
    /// the non-simple element or value type of containers.
    pub fn persistent_entity_types(&self) -> &[TypeInformation] {
        self.entity_types.get_or_init(|| {
            let mut types = Vec::new();
            if self.is_entity {
                types.push(self.information.clone());
            }
            if (self.is_collection_like || self.is_map)
                && let Some(actual) = &self.actual
                && !self.simple_types.is_simple_type(actual)
            {
                types.push(actual.clone());
            }
            types
        })
    }
}

impl PartialEq for PersistentProperty {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner
            && self.field.declaring() == other.field.declaring()
            && self.field.name() == other.field.name()
    }
}

impl Eq for PersistentProperty {}

impl Hash for PersistentProperty {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.field.declaring().hash(state);
        self.field.name().hash(state);
    }
}

impl fmt::Debug for PersistentProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentProperty")
            .field("name", &self.name())
            .field("owner", &format_args!("{}", self.owner))
            .field("type", &format_args!("{}", self.information))
            .field("id", &self.is_id)
            .field("version", &self.is_version)
            .field("association", &self.is_association)
            .field("entity", &self.is_entity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{ClassDef, FieldDef, TypeCatalog, TypeRef, markers},
        typeinfo::TypeResolver
    };

    fn string() -> TypeRef {
        TypeRef::named("String")
    }

    fn resolver() -> TypeResolver {
        TypeResolver::new(
            TypeCatalog::with_builtins()
                .with(ClassDef::class("Address").field(FieldDef::new("city", string())))
                .with(
                    ClassDef::class("Person")
                        .field(FieldDef::new("id", string()).with_marker(markers::ID))
                        .field(FieldDef::new("cache", string()).with_marker(markers::TRANSIENT))
                        .field(
                            FieldDef::new("secret", string())
                                .with_marker(markers::TRANSIENT)
                                .with_marker(markers::ID)
                        )
                        .field(FieldDef::new("computed", string()).with_value(markers::VALUE, "#root.id"))
                        .field(FieldDef::new("address", TypeRef::named("Address")))
                        .field(FieldDef::new(
                            "addresses",
                            TypeRef::generic("Vec", [TypeRef::named("Address")])
                        ))
                        .field(FieldDef::new(
                            "by_label",
                            TypeRef::generic("HashMap", [string(), TypeRef::named("Address")])
                        ))
                        .field(FieldDef::new("nicknames", TypeRef::generic("Vec", [string()])))
                        .field(FieldDef::new("raw", TypeRef::array(TypeRef::named("u8"))))
                        .field(
                            FieldDef::new("manager", TypeRef::named("Person"))
                                .with_marker(markers::REFERENCE)
                        )
                )
        )
    }

    fn property(name: &str) -> PersistentProperty {
        let resolver = resolver();
        let entity = PersistentEntity::new(resolver.resolve_named("Person"), None);
        let fields = resolver.introspector().fields("Person");
        let field = fields
            .iter()
            .find(|field| field.name() == name)
            .expect("fixture field");
        PersistentProperty::new(field, &entity, &SimpleTypeHolder::default(), &AttributePredicates)
    }

    #[test]
    fn id_from_marker() {
        let id = property("id");
        assert!(id.is_id_property());
        assert!(!id.is_entity());
        assert!(id.persistent_entity_types().is_empty());
    }

    #[test]
    fn transient_is_never_id() {
        let secret = property("secret");
        assert!(secret.is_transient());
        assert!(!secret.is_id_property());
        assert!(!secret.should_be_persisted());
    }

    #[test]
    fn value_marker_is_transient_with_expression() {
        let computed = property("computed");
        assert!(computed.is_transient());
        assert_eq!(computed.value_expression(), Some("#root.id"));
    }

    #[test]
    fn nested_type_is_entity() {
        let address = property("address");
        assert!(address.is_entity());
        let types: Vec<_> = address
            .persistent_entity_types()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(types, vec!["Address"]);
    }

    #[test]
    fn collection_yields_component_entity() {
        let addresses = property("addresses");
        assert!(addresses.is_collection_like());
        assert!(!addresses.is_entity());
        assert_eq!(
            addresses.component_type().map(|c| c.to_string()),
            Some("Address".to_owned())
        );
        let types: Vec<_> = addresses
            .persistent_entity_types()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(types, vec!["Address"]);
    }

    #[test]
    fn map_yields_value_entity() {
        let by_label = property("by_label");
        assert!(by_label.is_map());
        assert!(!by_label.is_collection_like());
        assert_eq!(
            by_label.map_value_type().map(|v| v.to_string()),
            Some("Address".to_owned())
        );
        assert_eq!(by_label.persistent_entity_types().len(), 1);
    }

    #[test]
    fn simple_containers_yield_nothing() {
        assert!(property("nicknames").persistent_entity_types().is_empty());
        let raw = property("raw");
        assert!(raw.is_array());
        assert!(raw.persistent_entity_types().is_empty());
    }

    #[test]
    fn reference_marks_association() {
        let manager = property("manager");
        assert!(manager.is_association());
        assert!(manager.is_entity());
    }
}
