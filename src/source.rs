// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Type catalog loading from Rust source.
//!
//! Rust has no runtime reflection, so the raw types the mapping engine
//! inspects are read from item definitions with `syn`:
//!
//! ```text
//! source
//! ├── attrs    #[entity(...)] via darling, member markers via syn
//! ├── convert  syn::Type → TypeRef, FromStr for TypeRef
//! └── loader   SourceLoader: items → TypeCatalog
//! ```
//!
//! Loaded catalogs feed a [`TypeResolver`](crate::typeinfo::TypeResolver)
//! like hand-built ones:
//!
//! ```rust
//! use entity_mapping::{mapping::MappingContext, source::SourceLoader, typeinfo::TypeResolver};
//!
//! let catalog = SourceLoader::parse(
//!     r#"
//!     struct Address { city: String }
//!     struct User { #[id] id: u64, address: Address }
//!     "#
//! )
//! .unwrap();
//!
//! let context = MappingContext::new(TypeResolver::new(catalog));
//! let user = context.entity_named("User").unwrap().unwrap();
//! assert_eq!(user.id_property().map(|p| p.name()), Some("id"));
//! ```

mod attrs;
mod convert;
mod loader;

pub use loader::SourceLoader;

#[cfg(test)]
mod tests;
