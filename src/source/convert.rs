// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rust type syntax to [`TypeRef`] conversion.
//!
//! | Syntax | Result |
//! |--------|--------|
//! | `Option<T>`, `Box<T>`, `Arc<T>`, `Rc<T>`, `&T`, `(T)` | Conversion of `T` |
//! | `[T]`, `[T; N]` | `Array(T)` |
//! | `(A, B)` | `Tuple<A, B>` |
//! | In-scope generic parameter `T` | `Param(T)` |
//! | `Self` | The enclosing type |
//! | `path::to::Name<A, B>` | `Name<A, B>` |
//! | Anything else | [`SourceError::UnsupportedType`] |

use std::{str::FromStr, sync::Arc};

use quote::ToTokens;
use syn::{GenericArgument, Path, PathArguments, Type, spanned::Spanned};

use crate::{
    error::SourceError,
    model::{TypeRef, builtins::TUPLE}
};

const TRANSPARENT: &[&str] = &["Option", "Box", "Arc", "Rc"];

/// Names visible while converting one type expression.
#[derive(Debug, Clone, Default)]
pub(super) struct Scope {
    params:    Vec<Arc<str>>,
    self_type: Option<TypeRef>
}

impl Scope {
    pub(super) fn new(params: impl IntoIterator<Item = Arc<str>>) -> Self {
        Self {
            params:    params.into_iter().collect(),
            self_type: None
        }
    }

    pub(super) fn with_self(mut self, self_type: TypeRef) -> Self {
        self.self_type = Some(self_type);
        self
    }

    pub(super) fn extended(&self, params: impl IntoIterator<Item = Arc<str>>) -> Self {
        let mut scope = self.clone();
        scope.params.extend(params);
        scope
    }

    fn is_param(&self, name: &str) -> bool {
        self.params.iter().any(|param| param.as_ref() == name)
    }

    /// Convert `ty`.
    pub(super) fn convert(&self, ty: &Type) -> Result<TypeRef, SourceError> {
        match ty {
            Type::Path(path) if path.qself.is_none() => self.convert_path(&path.path, ty),
            Type::Reference(reference) => self.convert(&reference.elem),
            Type::Paren(inner) => self.convert(&inner.elem),
            Type::Group(inner) => self.convert(&inner.elem),
            Type::Slice(slice) => Ok(TypeRef::array(self.convert(&slice.elem)?)),
            Type::Array(array) => Ok(TypeRef::array(self.convert(&array.elem)?)),
            Type::Tuple(tuple) => {
                let elements = tuple
                    .elems
                    .iter()
                    .map(|element| self.convert(element))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TypeRef::generic(TUPLE, elements))
            }
            _ => Err(unsupported(ty))
        }
    }

    /// Convert a path such as a supertrait bound.
    pub(super) fn convert_path(
        &self,
        path: &Path,
        origin: &dyn ToTokens
    ) -> Result<TypeRef, SourceError> {
        let Some(last) = path.segments.last() else {
            return Err(unsupported(origin));
        };
        let name = last.ident.to_string();
        let args = match &last.arguments {
            PathArguments::None => Vec::new(),
            PathArguments::AngleBracketed(bracketed) => bracketed
                .args
                .iter()
                .filter_map(|arg| match arg {
                    GenericArgument::Type(ty) => Some(self.convert(ty)),
                    _ => None
                })
                .collect::<Result<Vec<_>, _>>()?,
            PathArguments::Parenthesized(_) => return Err(unsupported(origin))
        };

        if path.segments.len() == 1 && args.is_empty() {
            if name == "Self" {
                return self
                    .self_type
                    .clone()
                    .ok_or_else(|| unsupported(origin));
            }
            if self.is_param(&name) {
                return Ok(TypeRef::param(name));
            }
        }
        if args.len() == 1 && TRANSPARENT.contains(&name.as_str()) {
            return Ok(args.into_iter().next().unwrap_or_else(TypeRef::object));
        }
        Ok(TypeRef::generic(name, args))
    }
}

fn unsupported(origin: &dyn ToTokens) -> SourceError {
    let tokens = origin.to_token_stream();
    SourceError::unsupported(tokens.to_string(), tokens.span())
}

impl FromStr for TypeRef {
    type Err = SourceError;

    /// Parse Rust type syntax. Every identifier is taken as a type name;
    /// use [`TypeRef::param`] for generic parameters.
    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let ty: Type = syn::parse_str(source)?;
        Scope::default().convert(&ty)
    }
}
