// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Introspection capabilities the engine consumes.
//!
//! | Capability | Default implementation |
//! |------------|------------------------|
//! | [`TypeIntrospector`] | [`TypeCatalog`](crate::model::TypeCatalog) |
//! | [`ParameterNameDiscoverer`] | [`DeclaredParameterNames`] |
//! | Field filtering | [`FieldFilter`] with [`FieldMatch`] rules |

mod filter;
mod introspector;
mod names;

pub use filter::{FieldFilter, FieldMatch};
pub use introspector::TypeIntrospector;
pub use names::{DeclaredParameterNames, ParameterNameDiscoverer, ParameterNames};
