// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! # entity-mapping
//!
//! Store-agnostic mapping metadata for persistent entities.
//!
//! Given a catalog of raw type definitions, the crate builds a cached,
//! generics-aware model of which types are entities, which of their fields
//! are persistent properties, which constructor materializes them and how
//! property path expressions such as `userAddressCity` resolve against
//! them. Concrete store modules (document, relational, key-value) consume
//! this metadata; none is part of this crate.
//!
//! # Quick Start
//!
//! ```rust
//! use entity_mapping::{MappingContext, SourceLoader, TypeRef, TypeResolver};
//!
//! let catalog = SourceLoader::parse(
//!     r#"
//!     pub struct Address { city: String }
//!
//!     pub struct User {
//!         #[id]
//!         id: String,
//!         name: String,
//!         address: Address,
//!         #[transient]
//!         session: Option<String>,
//!     }
//!
//!     impl User {
//!         pub fn new(id: String, name: String, address: Address) -> Self {
//!             Self { id, name, address, session: None }
//!         }
//!     }
//!     "#
//! )
//! .unwrap();
//!
//! let context = MappingContext::new(TypeResolver::new(catalog));
//! let user = context.entity_named("User").unwrap().unwrap();
//!
//! assert_eq!(user.properties().len(), 3);
//! assert_eq!(user.id_property().map(|p| p.name()), Some("id"));
//! assert_eq!(
//!     user.persistence_constructor().map(|c| c.parameters().len()),
//!     Some(3)
//! );
//!
//! let path = context
//!     .property_path("addressCity", &TypeRef::named("User"))
//!     .unwrap();
//! let properties = context.persistent_property_path(&path).unwrap();
//! assert_eq!(properties.to_dot_path(), "address.city");
//! ```
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`model`] | Raw type universe: type expressions, class definitions, catalog |
//! | [`reflect`] | Introspection seams: field access, parameter names, field filters |
//! | [`typeinfo`] | Generics-aware type information and its resolver cache |
//! | [`simple`] | Simple (atomic value) type predicate |
//! | [`mapping`] | Entities, properties, constructors, paths and the mapping context |
//! | [`source`] | Catalog loading from Rust source via `syn` |
//! | [`error`] | Error types |
//!
//! # Logging
//!
//! The crate emits `tracing` events (registration, rollback, path parsing,
//! constructor selection) and installs no subscriber.
//!
//! # Features
//!
//! | Feature | Enables |
//! |---------|---------|
//! | `serde` | `Deserialize` for [`MappingSettings`](mapping::MappingSettings) |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

pub mod error;
pub mod mapping;
pub mod model;
pub mod reflect;
pub mod simple;
pub mod source;
pub mod typeinfo;

mod utils;

pub use error::{MappingError, PropertyReferenceError, SourceError};
pub use mapping::{MappingContext, PersistentEntity, PersistentProperty, PropertyPath};
pub use model::{ClassDef, TypeCatalog, TypeRef};
pub use source::SourceLoader;
pub use typeinfo::{TypeInformation, TypeResolver};
