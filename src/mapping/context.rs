// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity registry.
//!
//! # Registration
//!
//! ```text
//! Unregistered ──add_entity──► Registering ──verified──► Registered
//!                                   │
//!                                   └──error──► Unregistered (rolled back)
//! ```
//!
//! Registering a type builds its entity and, depth first, every entity
//! type reachable through its properties. The whole batch is published
//! only after every entity in it verified; any failure publishes nothing.
//!
//! Registrations are serialized by one lock while lookups of registered
//! entities never wait on it. Two threads racing to register the same type
//! observe the same entity instance.
//!
//! # Module Structure
//!
//! ```text
//! context/
//! ├── factory.rs   - MappingFactory, BasicMappingFactory
//! ├── event.rs     - MappingContextEvent, MappingListener
//! └── settings.rs  - MappingSettings, FieldMatchSettings
//! ```

mod event;
mod factory;
mod settings;


use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering}
    }
};

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use super::{
    PersistentEntity, PersistentProperty, PersistentPropertyPath, PreferredConstructorDiscoverer,
    PropertyPath
};
use crate::{
    error::MappingError,
    model::TypeRef,
    reflect::{FieldFilter, ParameterNameDiscoverer},
    simple::SimpleTypeHolder,
    typeinfo::{TypeInformation, TypeResolver}
};

pub use self::{
    event::{ListenerError, MappingContextEvent, MappingListener},
    factory::{BasicMappingFactory, MappingFactory},
    settings::{FieldMatchSettings, MappingSettings}
};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Entities built during one registration, in completion order.
#[derive(Default)]
struct Batch {
    seen:      HashSet<TypeInformation>,
    completed: Vec<Arc<PersistentEntity>>
}

/// Registry of [`PersistentEntity`] descriptors.
///
/// # Examples
///
/// ```rust
/// use entity_mapping::{
///     mapping::MappingContext,
///     model::{ClassDef, FieldDef, TypeCatalog, TypeRef, markers},
///     typeinfo::TypeResolver
/// };
///
/// let resolver = TypeResolver::new(
///     TypeCatalog::with_builtins().with(
///         ClassDef::class("Person")
///             .field(FieldDef::new("id", TypeRef::named("String")).with_marker(markers::ID))
///             .field(FieldDef::new("name", TypeRef::named("String")))
///     )
/// );
/// let context = MappingContext::new(resolver);
///
/// let person = context.entity_named("Person").unwrap().unwrap();
/// assert_eq!(person.id_property().map(|id| id.name()), Some("id"));
/// assert!(context.entity_named("String").unwrap().is_none());
/// ```
pub struct MappingContext<F = BasicMappingFactory> {
    id:           u64,
    resolver:     TypeResolver,
    factory:      F,
    simple_types: SimpleTypeHolder,
    filter:       FieldFilter,
    constructors: PreferredConstructorDiscoverer,
    strict:       bool,
    initial:      Vec<TypeRef>,
    entities:     DashMap<TypeInformation, Arc<PersistentEntity>>,
    registration: Mutex<()>,
    listeners:    RwLock<Vec<Arc<dyn MappingListener>>>
}

impl MappingContext<BasicMappingFactory> {
    /// Lenient context with default settings.
    #[must_use]
    pub fn new(resolver: TypeResolver) -> Self {
        Self::assemble(
            resolver,
            BasicMappingFactory::new(),
            SimpleTypeHolder::default(),
            FieldFilter::default(),
            PreferredConstructorDiscoverer::default(),
            false,
            Vec::new()
        )
    }

    /// Configure a context step by step.
    #[must_use]
    pub fn builder(resolver: TypeResolver) -> MappingContextBuilder {
        MappingContextBuilder::new(resolver)
    }
}

impl<F> MappingContext<F> {
    /// Identity carried by the events this context emits.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Whether lookups of unregistered types fail.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Resolver used for type lookups.
    #[must_use]
    pub const fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    /// Simple-type predicate.
    #[must_use]
    pub const fn simple_types(&self) -> &SimpleTypeHolder {
        &self.simple_types
    }

    /// Descriptor factory.
    #[must_use]
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// Registered entity for `information`, without registering.
    #[must_use]
    pub fn registered(&self, information: &TypeInformation) -> Option<Arc<PersistentEntity>> {
        self.entities
            .get(information)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Whether an entity is registered for `information`.
    #[must_use]
    pub fn has_entity(&self, information: &TypeInformation) -> bool {
        self.entities.contains_key(information)
    }

    /// Every registered entity, in no particular order.
    #[must_use]
    pub fn persistent_entities(&self) -> Vec<Arc<PersistentEntity>> {
        self.entities
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Notify `listener` of every later registration.
    pub fn add_listener(&self, listener: Arc<dyn MappingListener>) {
        self.listeners.write().push(listener);
    }

    fn assemble(
        resolver: TypeResolver,
        factory: F,
        simple_types: SimpleTypeHolder,
        filter: FieldFilter,
        constructors: PreferredConstructorDiscoverer,
        strict: bool,
        initial: Vec<TypeRef>
    ) -> Self {
        Self {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            resolver,
            factory,
            simple_types,
            filter,
            constructors,
            strict,
            initial,
            entities: DashMap::new(),
            registration: Mutex::new(()),
            listeners: RwLock::new(Vec::new())
        }
    }
}

impl<F: MappingFactory> MappingContext<F> {
    /// Register every type of the initial entity set.
    ///
    /// # Errors
    ///
    /// The first registration failure; earlier registrations stay in place.
    pub fn initialize(&self) -> Result<(), MappingError> {
        debug!(context = self.id, types = self.initial.len(), "initializing mapping context");
        for ty in &self.initial {
            let information = self.resolver.resolve(ty);
            self.add_entity(&information)?;
        }
        Ok(())
    }

    /// Entity for `information`, registering it on demand.
    ///
    /// # Returns
    ///
    /// `None` for simple types.
    ///
    /// # Errors
    ///
    /// [`MappingError::UnknownEntity`] in strict mode when the type is not
    /// registered; registration errors otherwise.
    pub fn entity(
        &self,
        information: &TypeInformation
    ) -> Result<Option<Arc<PersistentEntity>>, MappingError> {
        if let Some(entity) = self.registered(information) {
            return Ok(Some(entity));
        }
        if self.strict {
            return Err(MappingError::UnknownEntity(information.to_string()));
        }
        if self.simple_types.is_simple_type(information) {
            return Ok(None);
        }
        self.add_entity(information).map(Some)
    }

    /// Entity for a type expression.
    ///
    /// # Errors
    ///
    /// See [`entity`](Self::entity).
    pub fn entity_for(&self, ty: &TypeRef) -> Result<Option<Arc<PersistentEntity>>, MappingError> {
        self.entity(&self.resolver.resolve(ty))
    }

    /// Entity for a non-generic type name.
    ///
    /// # Errors
    ///
    /// See [`entity`](Self::entity).
    pub fn entity_named(&self, name: &str) -> Result<Option<Arc<PersistentEntity>>, MappingError> {
        self.entity(&self.resolver.resolve_named(name))
    }

    /// Entity held by `property`, looked up through its actual type.
    ///
    /// # Errors
    ///
    /// See [`entity`](Self::entity).
    pub fn entity_for_property(
        &self,
        property: &PersistentProperty
    ) -> Result<Option<Arc<PersistentEntity>>, MappingError> {
        match property.actual_type() {
            Some(actual) => self.entity(actual),
            None => Ok(None)
        }
    }

    /// Register `information` and every entity type reachable from it.
    ///
    /// Returns the registered entity when one exists already.
    ///
    /// # Errors
    ///
    /// Duplicate id or version properties and verifier failures. Nothing
    /// from a failed registration stays registered.
    pub fn add_entity(
        &self,
        information: &TypeInformation
    ) -> Result<Arc<PersistentEntity>, MappingError> {
        if let Some(entity) = self.registered(information) {
            return Ok(entity);
        }

        let (entity, published) = {
            let _registration = self.registration.lock();
            if let Some(entity) = self.registered(information) {
                return Ok(entity);
            }

            let mut batch = Batch::default();
            let entity = match self.build(information, &mut batch) {
                Ok(entity) => entity,
                Err(error) => {
                    warn!(entity = %information, %error, "entity registration rolled back");
                    return Err(error);
                }
            };
            for completed in &batch.completed {
                self.entities
                    .insert(completed.type_information().clone(), Arc::clone(completed));
            }
            debug!(
                entity = %information,
                registered = batch.completed.len(),
                "registered persistent entities"
            );
            (entity, batch.completed)
        };

        self.notify(&published);
        Ok(entity)
    }

    /// Register `ty`.
    ///
    /// # Errors
    ///
    /// See [`add_entity`](Self::add_entity).
    pub fn add_entity_for(&self, ty: &TypeRef) -> Result<Arc<PersistentEntity>, MappingError> {
        self.add_entity(&self.resolver.resolve(ty))
    }

    /// Parse `source` against `root`.
    ///
    /// # Errors
    ///
    /// [`MappingError::PropertyReference`] when a segment does not resolve.
    pub fn property_path(&self, source: &str, root: &TypeRef) -> Result<PropertyPath, MappingError> {
        Ok(PropertyPath::parse(source, &self.resolver.resolve(root))?)
    }

    /// Property descriptors along `path`.
    ///
    /// # Errors
    ///
    /// [`MappingError::NotAnEntity`] when a traversed type is simple,
    /// [`MappingError::PropertyNotMapped`] when a segment is transient or
    /// filtered, and lookup errors from [`entity`](Self::entity).
    pub fn persistent_property_path(
        &self,
        path: &PropertyPath
    ) -> Result<PersistentPropertyPath, MappingError> {
        let mut properties = Vec::with_capacity(path.len());
        let mut owner = self.require_entity(path.owning_type())?;

        for segment in path.iter() {
            let property = owner
                .property(segment.segment())
                .cloned()
                .ok_or_else(|| MappingError::PropertyNotMapped {
                    property: segment.segment().to_owned(),
                    entity:   owner.name()
                })?;
            properties.push(property);
            if segment.has_next() {
                owner = self.require_entity(segment.type_information())?;
            }
        }
        Ok(PersistentPropertyPath::new(properties))
    }

    fn require_entity(
        &self,
        information: &TypeInformation
    ) -> Result<Arc<PersistentEntity>, MappingError> {
        self.entity(information)?
            .ok_or_else(|| MappingError::NotAnEntity(information.to_string()))
    }

    fn build(
        &self,
        information: &TypeInformation,
        batch: &mut Batch
    ) -> Result<Arc<PersistentEntity>, MappingError> {
        batch.seen.insert(information.clone());
        let constructor = self.constructors.discover(information, Some(information));
        let mut entity = self.factory.create_entity(information.clone(), constructor);

        let fields = information
            .raw_name()
            .map(|name| self.resolver.introspector().fields(name))
            .unwrap_or_default();
        for field in fields.iter().filter(|field| self.filter.accepts(field)) {
            let property = self
                .factory
                .create_property(field, &entity, &self.simple_types);
            if property.is_transient() {
                trace!(entity = %information, property = field.name(), "skipping transient property");
                continue;
            }
            let property = entity.add_property(property)?;
            trace!(entity = %information, property = property.name(), "added property");
            if property.is_association() {
                entity.add_association(self.factory.create_association(&property));
            }
            for nested in property.persistent_entity_types() {
                if batch.seen.contains(nested) || self.has_entity(nested) {
                    continue;
                }
                self.build(nested, batch)?;
            }
        }

        entity.verify()?;
        let entity = Arc::new(entity);
        batch.completed.push(Arc::clone(&entity));
        Ok(entity)
    }

    fn notify(&self, published: &[Arc<PersistentEntity>]) {
        let listeners = self.listeners.read().clone();
        if listeners.is_empty() {
            return;
        }
        for entity in published {
            let event = MappingContextEvent::new(self.id, Arc::clone(entity));
            for listener in &listeners {
                if let Err(error) = listener.on_entity_registered(&event) {
                    warn!(entity = %entity.type_information(), %error, "mapping listener failed");
                }
            }
        }
    }
}

impl<F> std::fmt::Debug for MappingContext<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingContext")
            .field("id", &self.id)
            .field("strict", &self.strict)
            .field("entities", &self.entities.len())
            .finish_non_exhaustive()
    }
}

/// Step-by-step [`MappingContext`] configuration.
pub struct MappingContextBuilder<F = BasicMappingFactory> {
    resolver:     TypeResolver,
    factory:      F,
    settings:     MappingSettings,
    initial:      Vec<TypeRef>,
    simple_types: Option<SimpleTypeHolder>,
    filter:       Option<FieldFilter>,
    names:        Option<Arc<dyn ParameterNameDiscoverer>>,
    listeners:    Vec<Arc<dyn MappingListener>>
}

impl MappingContextBuilder<BasicMappingFactory> {
    fn new(resolver: TypeResolver) -> Self {
        Self {
            resolver,
            factory: BasicMappingFactory::new(),
            settings: MappingSettings::default(),
            initial: Vec::new(),
            simple_types: None,
            filter: None,
            names: None,
            listeners: Vec::new()
        }
    }
}

impl<F: MappingFactory> MappingContextBuilder<F> {
    /// Use `factory` to build descriptors.
    #[must_use]
    pub fn factory<G: MappingFactory>(self, factory: G) -> MappingContextBuilder<G> {
        MappingContextBuilder {
            resolver: self.resolver,
            factory,
            settings: self.settings,
            initial: self.initial,
            simple_types: self.simple_types,
            filter: self.filter,
            names: self.names,
            listeners: self.listeners
        }
    }

    /// Apply declarative settings.
    #[must_use]
    pub fn settings(mut self, settings: MappingSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Fail lookups of unregistered types.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.settings.strict = strict;
        self
    }

    /// Types registered by [`MappingContext::initialize`], in addition to
    /// the configured expressions.
    #[must_use]
    pub fn initial_entity_set(mut self, types: impl IntoIterator<Item = TypeRef>) -> Self {
        self.initial.extend(types);
        self
    }

    /// Replace the simple-type predicate built from the settings.
    #[must_use]
    pub fn simple_types(mut self, simple_types: SimpleTypeHolder) -> Self {
        self.simple_types = Some(simple_types);
        self
    }

    /// Replace the field filter built from the settings.
    #[must_use]
    pub fn field_filter(mut self, filter: FieldFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Discover constructor parameter names with `names`.
    #[must_use]
    pub fn parameter_names(mut self, names: Arc<dyn ParameterNameDiscoverer>) -> Self {
        self.names = Some(names);
        self
    }

    /// Register a listener up front.
    #[must_use]
    pub fn listener(mut self, listener: Arc<dyn MappingListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Build the context.
    ///
    /// # Errors
    ///
    /// Invalid field filter rules or initial type expressions in the
    /// settings.
    pub fn build(self) -> Result<MappingContext<F>, MappingError> {
        let simple_types = match self.simple_types {
            Some(simple_types) => simple_types,
            None => self.settings.simple_type_holder()
        };
        let filter = match self.filter {
            Some(filter) => filter,
            None => self.settings.field_filter()?
        };
        let constructors = self
            .names
            .map(PreferredConstructorDiscoverer::new)
            .unwrap_or_default();
        let mut initial = self.settings.initial_types()?;
        initial.extend(self.initial);

        let context = MappingContext::assemble(
            self.resolver,
            self.factory,
            simple_types,
            filter,
            constructors,
            self.settings.strict,
            initial
        );
        *context.listeners.write() = self.listeners;
        Ok(context)
    }
}
