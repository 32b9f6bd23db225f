// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Attribute parsing for loaded items.
//!
//! # Type-level
//!
//! ```rust,ignore
//! #[entity(alias = "person", extends = "Base<T>")]
//! struct Person<T> { ... }
//! ```
//!
//! # Member-level
//!
//! | Attribute | Applies to | Effect |
//! |-----------|------------|--------|
//! | `#[id]` | Field | Identifier property |
//! | `#[version]` | Field | Version property |
//! | `#[transient]` | Field | Not persisted |
//! | `#[reference]` | Field | Association |
//! | `#[autowired]` | Field | Injected, not persisted |
//! | `#[value("expr")]` | Field, parameter | Override key |
//! | `#[persistence_constructor]` | Associated function | Preferred constructor |

use darling::FromDeriveInput;
use syn::{Attribute, DeriveInput, Ident, LitStr};

use crate::{
    error::SourceError,
    model::{Attributes, markers}
};

const FLAGS: &[&str] = &[
    markers::ID,
    markers::VERSION,
    markers::TRANSIENT,
    markers::REFERENCE,
    markers::AUTOWIRED,
    markers::PERSISTENCE_CONSTRUCTOR
];

/// Type-level attributes parsed from `#[entity(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(entity), supports(struct_any, enum_any))]
pub(super) struct TypeAttrs {
    /// Item identifier.
    ident: Ident,

    /// Store-facing type alias.
    #[darling(default)]
    alias: Option<String>,

    /// Base type expression, e.g. `"Base<T>"`.
    #[darling(default)]
    extends: Option<String>
}

impl TypeAttrs {
    /// Parse the `#[entity]` attribute of `input`.
    ///
    /// # Errors
    ///
    /// [`SourceError::Attribute`] for unknown keys or malformed values.
    pub(super) fn parse(input: &DeriveInput) -> Result<Self, SourceError> {
        Self::from_derive_input(input).map_err(|error| SourceError::Attribute {
            item:    input.ident.to_string(),
            message: error.to_string()
        })
    }

    pub(super) fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub(super) fn extends(&self) -> Option<&str> {
        self.extends.as_deref()
    }

    pub(super) fn ident(&self) -> &Ident {
        &self.ident
    }
}

/// Collect member markers from `attrs`.
///
/// Unrelated attributes (`#[serde]`, doc comments) are ignored.
///
/// # Errors
///
/// [`SourceError::Syntax`] when `#[value]` does not hold one string literal.
pub(super) fn member_markers(attrs: &[Attribute]) -> Result<Attributes, SourceError> {
    let mut table = Attributes::new();
    for attr in attrs {
        if attr.path().is_ident(markers::VALUE) {
            let value: LitStr = attr.parse_args()?;
            table.insert_value(markers::VALUE, value.value());
        } else if let Some(flag) = FLAGS.iter().find(|flag| attr.path().is_ident(flag)) {
            table.insert_marker(*flag);
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_alias_and_base() {
        let input: DeriveInput = syn::parse_quote! {
            #[entity(alias = "people", extends = "Base<T>")]
            struct Person<T> { id: T }
        };
        let attrs = TypeAttrs::parse(&input).expect("attributes");
        assert_eq!(attrs.ident(), "Person");
        assert_eq!(attrs.alias(), Some("people"));
        assert_eq!(attrs.extends(), Some("Base<T>"));
    }

    #[test]
    fn attribute_is_optional() {
        let input: DeriveInput = syn::parse_quote! {
            enum Status { Active, Inactive }
        };
        let attrs = TypeAttrs::parse(&input).expect("attributes");
        assert!(attrs.alias().is_none());
        assert!(attrs.extends().is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let input: DeriveInput = syn::parse_quote! {
            #[entity(table = "people")]
            struct Person { id: i64 }
        };
        assert!(matches!(
            TypeAttrs::parse(&input),
            Err(SourceError::Attribute { ref item, .. }) if item == "Person"
        ));
    }

    #[test]
    fn collects_member_markers() {
        let field: syn::Field = syn::parse_quote! {
            #[id]
            #[serde(rename = "ID")]
            #[value("#root.id")]
            id: i64
        };
        let table = member_markers(&field.attrs).expect("markers");
        assert!(table.has(markers::ID));
        assert_eq!(table.value(markers::VALUE), Some("#root.id"));
        assert!(!table.has("serde"));
    }

    #[test]
    fn value_requires_a_string_literal() {
        let field: syn::Field = syn::parse_quote! {
            #[value(42)]
            id: i64
        };
        assert!(matches!(member_markers(&field.attrs), Err(SourceError::Syntax { .. })));
    }
}
