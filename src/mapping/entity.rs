// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity descriptors.
//!
//! A [`PersistentEntity`] is populated by the mapping context while it is
//! being registered and is immutable once published.

use std::{cmp::Ordering, fmt, sync::Arc};

use super::{Association, PersistentProperty, PreferredConstructor};
use crate::{error::MappingError, typeinfo::TypeInformation, utils::naming};

/// Comparator keeping an entity's properties sorted.
pub type PropertyOrder =
    Arc<dyn Fn(&PersistentProperty, &PersistentProperty) -> Ordering + Send + Sync>;

/// Structural check run once an entity is fully populated.
///
/// A failing verifier rolls back the registration of the entity and of
/// every entity discovered with it.
pub trait EntityVerifier: Send + Sync {
    /// Check `entity`.
    ///
    /// # Errors
    ///
    /// Any [`MappingError`], usually [`MappingError::Verification`].
    fn verify(&self, entity: &PersistentEntity) -> Result<(), MappingError>;
}

impl<F> EntityVerifier for F
where
    F: Fn(&PersistentEntity) -> Result<(), MappingError> + Send + Sync
{
    fn verify(&self, entity: &PersistentEntity) -> Result<(), MappingError> {
        self(entity)
    }
}

/// Mapping metadata of one entity type.
pub struct PersistentEntity {
    information:  TypeInformation,
    constructor:  Option<PreferredConstructor>,
    properties:   Vec<Arc<PersistentProperty>>,
    associations: Vec<Association>,
    id:           Option<Arc<PersistentProperty>>,
    version:      Option<Arc<PersistentProperty>>,
    order:        Option<PropertyOrder>,
    verifiers:    Vec<Arc<dyn EntityVerifier>>
}

impl PersistentEntity {
    /// Empty entity for `information`.
    ///
    /// # Arguments
    ///
    /// * `information` - Resolved entity type
    /// * `constructor` - Preferred constructor, if one could be selected
    #[must_use]
    pub const fn new(information: TypeInformation, constructor: Option<PreferredConstructor>) -> Self {
        Self {
            information,
            constructor,
            properties: Vec::new(),
            associations: Vec::new(),
            id: None,
            version: None,
            order: None,
            verifiers: Vec::new()
        }
    }

    /// Keep properties sorted by `order` instead of insertion order.
    #[must_use]
    pub fn with_property_order(mut self, order: PropertyOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Run `verifier` in [`verify`](Self::verify).
    #[must_use]
    pub fn with_verifier(mut self, verifier: Arc<dyn EntityVerifier>) -> Self {
        self.verifiers.push(verifier);
        self
    }

    /// Resolved entity type.
    #[must_use]
    pub const fn type_information(&self) -> &TypeInformation {
        &self.information
    }

    /// Rendered entity type, e.g. `Page<Person>`.
    #[must_use]
    pub fn name(&self) -> String {
        self.information.to_string()
    }

    /// Store-facing alias declared on the type.
    #[must_use]
    pub fn type_alias(&self) -> Option<&str> {
        self.information.type_alias()
    }

    /// Constructor used to instantiate the entity.
    #[must_use]
    pub const fn persistence_constructor(&self) -> Option<&PreferredConstructor> {
        self.constructor.as_ref()
    }

    /// Add a property.
    ///
    /// Adding a property equal to one already present returns the existing
    /// one. The id and version slots accept one property each.
    ///
    /// # Errors
    ///
    /// [`MappingError::DuplicateIdProperty`] or
    /// [`MappingError::DuplicateVersionProperty`] naming both properties.
    /// The entity is left unchanged.
    pub fn add_property(
        &mut self,
        property: PersistentProperty
    ) -> Result<Arc<PersistentProperty>, MappingError> {
        if let Some(existing) = self.properties.iter().find(|p| ***p == property) {
            return Ok(Arc::clone(existing));
        }
        if property.is_id_property()
            && let Some(existing) = &self.id
        {
            return Err(MappingError::DuplicateIdProperty {
                entity:   self.name(),
                added:    property.name().to_owned(),
                existing: existing.name().to_owned()
            });
        }
        if property.is_version_property()
            && let Some(existing) = &self.version
        {
            return Err(MappingError::DuplicateVersionProperty {
                entity:   self.name(),
                added:    property.name().to_owned(),
                existing: existing.name().to_owned()
            });
        }

        let property = Arc::new(property);
        if property.is_id_property() {
            self.id = Some(Arc::clone(&property));
        }
        if property.is_version_property() {
            self.version = Some(Arc::clone(&property));
        }
        let index = match &self.order {
            Some(order) => self
                .properties
                .partition_point(|existing| order(&**existing, &*property) != Ordering::Greater),
            None => self.properties.len()
        };
        self.properties.insert(index, Arc::clone(&property));
        Ok(property)
    }

    /// Add an association unless already present.
    pub fn add_association(&mut self, association: Association) {
        if self.associations.contains(&association) {
            return;
        }
        let name = association.inverse().name();
        let index = self
            .associations
            .partition_point(|existing| existing.inverse().name() <= name);
        self.associations.insert(index, association);
    }

    /// Property by name; the exact name wins over its snake_case form.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Arc<PersistentProperty>> {
        naming::find_by_name(&self.properties, name, |property| property.name())
    }

    /// Every property, in order.
    #[must_use]
    pub fn properties(&self) -> &[Arc<PersistentProperty>] {
        &self.properties
    }

    /// Associations ordered by inverse property name.
    #[must_use]
    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    /// Identifier property.
    #[must_use]
    pub const fn id_property(&self) -> Option<&Arc<PersistentProperty>> {
        self.id.as_ref()
    }

    /// Version property.
    #[must_use]
    pub const fn version_property(&self) -> Option<&Arc<PersistentProperty>> {
        self.version.as_ref()
    }

    /// Whether an identifier property is registered.
    #[must_use]
    pub const fn has_id_property(&self) -> bool {
        self.id.is_some()
    }

    /// Whether a version property is registered.
    #[must_use]
    pub const fn has_version_property(&self) -> bool {
        self.version.is_some()
    }

    /// Whether `property` is this entity's identifier.
    #[must_use]
    pub fn is_id_property(&self, property: &PersistentProperty) -> bool {
        self.id.as_deref() == Some(property)
    }

    /// Whether `property` is this entity's version.
    #[must_use]
    pub fn is_version_property(&self, property: &PersistentProperty) -> bool {
        self.version.as_deref() == Some(property)
    }

    /// Whether `property` is bound by a parameter of the preferred
    /// constructor.
    #[must_use]
    pub fn is_constructor_argument(&self, property: &PersistentProperty) -> bool {
        self.constructor
            .as_ref()
            .is_some_and(|constructor| constructor.is_constructor_parameter(property))
    }

    /// Visit every property that is not an association.
    pub fn do_with_properties(&self, mut handler: impl FnMut(&PersistentProperty)) {
        self.properties
            .iter()
            .filter(|property| !property.is_transient() && !property.is_association())
            .for_each(|property| handler(&**property));
    }

    /// Visit every association.
    pub fn do_with_associations(&self, handler: impl FnMut(&Association)) {
        self.associations.iter().for_each(handler);
    }

    /// Run the registered verifiers.
    ///
    /// # Errors
    ///
    /// The first verifier failure.
    pub fn verify(&self) -> Result<(), MappingError> {
        self.verifiers
            .iter()
            .try_for_each(|verifier| verifier.verify(self))
    }
}

impl fmt::Debug for PersistentEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentEntity")
            .field("type", &format_args!("{}", self.information))
            .field(
                "properties",
                &self
                    .properties
                    .iter()
                    .map(|property| property.name())
                    .collect::<Vec<_>>()
            )
            .field("id", &self.id.as_ref().map(|id| id.name()))
            .field("version", &self.version.as_ref().map(|version| version.name()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mapping::AttributePredicates,
        model::{ClassDef, FieldDef, TypeCatalog, TypeRef, markers},
        simple::SimpleTypeHolder,
        typeinfo::TypeResolver
    };

    fn resolver() -> TypeResolver {
        TypeResolver::new(
            TypeCatalog::with_builtins()
                .with(ClassDef::class("Author").field(FieldDef::new("name", TypeRef::named("String"))))
                .with(
                    ClassDef::class("Book")
                        .alias("books")
                        .field(FieldDef::new("title", TypeRef::named("String")))
                        .field(FieldDef::new("id", TypeRef::named("i64")).with_marker(markers::ID))
                        .field(FieldDef::new("key", TypeRef::named("i64")).with_marker(markers::ID))
                        .field(FieldDef::new("rev", TypeRef::named("i32")).with_marker(markers::VERSION))
                        .field(FieldDef::new("stamp", TypeRef::named("i32")).with_marker(markers::VERSION))
                        .field(
                            FieldDef::new("author", TypeRef::named("Author"))
                                .with_marker(markers::REFERENCE)
                        )
                        .field(
                            FieldDef::new("editor", TypeRef::named("Author"))
                                .with_marker(markers::REFERENCE)
                        )
                )
        )
    }

    fn entity() -> (PersistentEntity, Vec<FieldDef>) {
        let resolver = resolver();
        let fields = resolver.introspector().fields("Book");
        (PersistentEntity::new(resolver.resolve_named("Book"), None), fields)
    }

    fn describe(entity: &PersistentEntity, fields: &[FieldDef], name: &str) -> PersistentProperty {
        let field = fields
            .iter()
            .find(|field| field.name() == name)
            .expect("fixture field");
        PersistentProperty::new(field, entity, &SimpleTypeHolder::default(), &AttributePredicates)
    }

    #[test]
    fn second_id_is_rejected() {
        let (mut entity, fields) = entity();
        let id = describe(&entity, &fields, "id");
        entity.add_property(id).expect("first id");

        let key = describe(&entity, &fields, "key");
        let error = entity.add_property(key).expect_err("second id");
        assert!(matches!(
            error,
            MappingError::DuplicateIdProperty { ref added, ref existing, .. }
                if added == "key" && existing == "id"
        ));
        assert_eq!(entity.id_property().map(|p| p.name()), Some("id"));
        assert_eq!(entity.properties().len(), 1);
    }

    #[test]
    fn second_version_is_rejected() {
        let (mut entity, fields) = entity();
        let rev = describe(&entity, &fields, "rev");
        entity.add_property(rev).expect("first version");
        let stamp = describe(&entity, &fields, "stamp");
        assert!(matches!(
            entity.add_property(stamp),
            Err(MappingError::DuplicateVersionProperty { .. })
        ));
        assert!(entity.has_version_property());
    }

    #[test]
    fn adding_twice_keeps_one_property() {
        let (mut entity, fields) = entity();
        let first = entity
            .add_property(describe(&entity, &fields, "title"))
            .expect("title");
        let second = entity
            .add_property(describe(&entity, &fields, "title"))
            .expect("title again");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(entity.properties().len(), 1);
    }

    #[test]
    fn order_comparator_sorts_properties() {
        let (entity, fields) = entity();
        let mut entity = entity.with_property_order(Arc::new(
            |a: &PersistentProperty, b: &PersistentProperty| a.name().cmp(b.name())
        ));
        for name in ["title", "rev", "id"] {
            let property = describe(&entity, &fields, name);
            entity.add_property(property).expect("property");
        }
        let names: Vec<_> = entity.properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["id", "rev", "title"]);
    }

    #[test]
    fn associations_are_sorted_and_skipped_by_property_visitor() {
        let (mut entity, fields) = entity();
        for name in ["title", "editor", "author"] {
            let property = entity
                .add_property(describe(&entity, &fields, name))
                .expect("property");
            if property.is_association() {
                entity.add_association(Association::new(property, None));
            }
        }
        let inverse: Vec<_> = entity
            .associations()
            .iter()
            .map(|a| a.inverse().name())
            .collect();
        assert_eq!(inverse, vec!["author", "editor"]);

        let mut visited = Vec::new();
        entity.do_with_properties(|property| visited.push(property.name().to_owned()));
        assert_eq!(visited, vec!["title"]);
    }

    #[test]
    fn lookup_falls_back_to_snake_case() {
        let resolver = TypeResolver::new(TypeCatalog::with_builtins().with(
            ClassDef::class("Account").field(FieldDef::new("user_name", TypeRef::named("String")))
        ));
        let mut entity = PersistentEntity::new(resolver.resolve_named("Account"), None);
        let fields = resolver.introspector().fields("Account");
        let property = describe(&entity, &fields, "user_name");
        entity.add_property(property).expect("property");
        assert!(entity.property("userName").is_some());
        assert!(entity.property("missing").is_none());
    }

    #[test]
    fn verifiers_run_in_order() {
        let (entity, _) = entity();
        let entity = entity.with_verifier(Arc::new(|entity: &PersistentEntity| {
            Err(MappingError::Verification {
                entity: entity.name(),
                reason: "no id".to_owned()
            })
        }));
        assert!(matches!(entity.verify(), Err(MappingError::Verification { .. })));
    }

    #[test]
    fn alias_comes_from_type() {
        let (entity, _) = entity();
        assert_eq!(entity.type_alias(), Some("books"));
        assert_eq!(entity.name(), "Book");
    }
}
