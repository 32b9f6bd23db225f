// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Persistent entity metadata.
//!
//! # Overview
//!
//! A [`MappingContext`] turns raw types into [`PersistentEntity`]
//! descriptors on demand. Each entity aggregates [`PersistentProperty`]
//! descriptors, tracks its identifier and version properties, its
//! associations, and the [`PreferredConstructor`] used to instantiate it.
//! Nested entity types reachable through properties are registered along
//! the way.
//!
//! [`PropertyPath`] resolves path expressions such as `user.address.city`,
//! `user_address` or `userAddressCity` against a root type; the context
//! translates them into a [`PersistentPropertyPath`] of property
//! descriptors.
//!
//! # Module Structure
//!
//! ```text
//! mapping/
//! ├── property.rs         - PersistentProperty, PropertyPredicates
//! ├── association.rs      - Association
//! ├── entity.rs           - PersistentEntity, EntityVerifier
//! ├── constructor.rs      - PreferredConstructor, Parameter, discoverer
//! ├── path.rs             - PropertyPath parsing
//! ├── persistent_path.rs  - PersistentPropertyPath
//! └── context.rs          - MappingContext, factory, events, settings
//! ```

mod association;
mod constructor;
mod context;
mod entity;
mod path;
mod persistent_path;
mod property;

pub use association::Association;
pub use constructor::{Parameter, PreferredConstructor, PreferredConstructorDiscoverer};
pub use context::{
    BasicMappingFactory, FieldMatchSettings, ListenerError, MappingContext,
    MappingContextBuilder, MappingContextEvent, MappingFactory, MappingListener, MappingSettings
};
pub use entity::{EntityVerifier, PersistentEntity, PropertyOrder};
pub use path::PropertyPath;
pub use persistent_path::PersistentPropertyPath;
pub use property::{AttributePredicates, PersistentProperty, PropertyPredicates};
