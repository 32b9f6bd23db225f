// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Raw type universe consumed by the mapping engine.
//!
//! Rust has no runtime reflection, so every type the engine introspects is
//! described up front as a [`ClassDef`] held by a [`TypeCatalog`]. Catalogs
//! are filled either programmatically through the builder methods or from
//! Rust source with [`SourceLoader`](crate::source::SourceLoader).
//!
//! # Module Structure
//!
//! ```text
//! model/
//! ├── type_ref.rs    - TypeRef: declared type expressions
//! ├── attributes.rs  - Attributes: declarative marker table
//! ├── class.rs       - ClassDef, FieldDef, ConstructorDef, MethodDef, ParamDef
//! ├── builtins.rs    - Object, capability interfaces, std containers, scalars
//! └── catalog.rs     - TypeCatalog: name -> ClassDef registry
//! ```
//!
//! # Example
//!
//! ```rust
//! use entity_mapping::model::{ClassDef, FieldDef, TypeCatalog, TypeRef, markers};
//!
//! let catalog = TypeCatalog::with_builtins().with(
//!     ClassDef::class("Person")
//!         .field(FieldDef::new("id", TypeRef::named("String")).with_marker(markers::ID))
//!         .field(FieldDef::new("name", TypeRef::named("String")))
//! );
//!
//! assert!(catalog.contains("Person"));
//! ```

mod attributes;
pub mod builtins;
mod catalog;
mod class;
mod type_ref;

pub use attributes::{Attributes, markers};
pub use catalog::TypeCatalog;
pub use class::{ClassDef, ClassKind, ConstructorDef, FieldDef, MethodDef, ParamDef};
pub use type_ref::TypeRef;
