// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Structural type information with generic substitution.
//!
//! A [`TypeInformation`] is one type occurrence resolved in its context.
//! Given `struct Wrapper<T> { inner: GenericType<T, Object> }`, resolving
//! `Wrapper<String>` and asking for `inner` yields
//! `GenericType<String, Object>`, whose own fields resolve against that
//! specialization in turn.
//!
//! # Variants
//!
//! | [`TypeKind`] | Produced for | Identity |
//! |--------------|--------------|----------|
//! | `Class` | Non-generic named types | Raw type only, shared through the resolver cache |
//! | `Parameterized` | Named types with arguments | Resolved type and enclosing context |
//! | `Array` | Arrays | Resolved type and enclosing context |
//! | `Variable` | Unbound generic parameters | Parameter and enclosing context |
//!
//! # Caching
//!
//! [`TypeResolver`] owns the top-level cache keyed by type expression. Every
//! instance memoizes its own field lookups by name. The caches never evict.
//!
//! # Example
//!
//! ```rust
//! use entity_mapping::{
//!     model::{ClassDef, FieldDef, TypeCatalog, TypeRef},
//!     typeinfo::TypeResolver
//! };
//!
//! let catalog = TypeCatalog::with_builtins().with(
//!     ClassDef::class("Box2")
//!         .type_params(["T"])
//!         .field(FieldDef::new("content", TypeRef::param("T")))
//! );
//! let resolver = TypeResolver::new(catalog);
//!
//! let boxed = resolver.resolve(&TypeRef::generic("Box2", [TypeRef::named("String")]));
//! let content = boxed.property("content").map(|info| info.resolved_type().clone());
//! assert_eq!(content, Some(TypeRef::named("String")));
//! ```

mod information;
mod resolver;


pub use information::{TypeInformation, TypeKind};
pub use resolver::TypeResolver;
