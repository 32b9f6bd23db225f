// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Declared type expressions.

use std::{collections::HashMap, fmt, sync::Arc};

use super::builtins::OBJECT;

/// A type expression as written in a declaration.
///
/// | Variant | Rust source | Meaning |
/// |---------|-------------|---------|
/// | `Named` | `HashMap<String, T>` | Raw type with generic arguments |
/// | `Array` | `[u8]`, `[T; 4]` | Array of an element type |
/// | `Param` | `T` | Generic parameter of the enclosing declaration |
///
/// Type expressions are plain values. Generic parameters stay symbolic until
/// [`substitute`](Self::substitute) binds them against a concrete context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeRef {
    /// Named raw type with (possibly empty) generic arguments.
    Named {
        /// Raw type name, e.g. `HashMap`.
        name: Arc<str>,
        /// Generic arguments in declaration order.
        args: Vec<TypeRef>
    },

    /// Array of the boxed element type.
    Array(Box<TypeRef>),

    /// Generic parameter reference, e.g. `T`.
    Param(Arc<str>)
}

impl TypeRef {
    /// Non-generic named type.
    #[must_use]
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new()
        }
    }

    /// Named type specialized with generic arguments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use entity_mapping::model::TypeRef;
    ///
    /// let map = TypeRef::generic("HashMap", [TypeRef::named("String"), TypeRef::param("T")]);
    /// assert_eq!(map.to_string(), "HashMap<String, T>");
    /// ```
    #[must_use]
    pub fn generic(name: impl Into<Arc<str>>, args: impl IntoIterator<Item = TypeRef>) -> Self {
        Self::Named {
            name: name.into(),
            args: args.into_iter().collect()
        }
    }

    /// Array of `element`.
    #[must_use]
    pub fn array(element: TypeRef) -> Self {
        Self::Array(Box::new(element))
    }

    /// Generic parameter reference.
    #[must_use]
    pub fn param(name: impl Into<Arc<str>>) -> Self {
        Self::Param(name.into())
    }

    /// The universal root type.
    #[must_use]
    pub fn object() -> Self {
        Self::named(OBJECT)
    }

    /// Raw type name for `Named` expressions.
    #[must_use]
    pub fn raw_name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => Some(name),
            Self::Array(_) | Self::Param(_) => None
        }
    }

    /// Generic arguments; empty for arrays and parameters.
    #[must_use]
    pub fn args(&self) -> &[TypeRef] {
        match self {
            Self::Named { args, .. } => args,
            Self::Array(_) | Self::Param(_) => &[]
        }
    }

    /// Element type of an array expression.
    #[must_use]
    pub fn element(&self) -> Option<&TypeRef> {
        match self {
            Self::Array(element) => Some(element),
            Self::Named { .. } | Self::Param(_) => None
        }
    }

    /// Whether this expression is an array.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Whether this expression is a bare generic parameter.
    #[must_use]
    pub const fn is_param(&self) -> bool {
        matches!(self, Self::Param(_))
    }

    /// Whether no generic parameter occurs anywhere in the expression.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match self {
            Self::Named { args, .. } => args.iter().all(Self::is_resolved),
            Self::Array(element) => element.is_resolved(),
            Self::Param(_) => false
        }
    }

    /// Replace bound generic parameters with their bindings.
    ///
    /// Parameters without a binding are left in place.
    ///
    /// # Arguments
    ///
    /// * `bindings` - Parameter name to concrete type
    ///
    /// # Returns
    ///
    /// A new expression; `self` is untouched.
    #[must_use]
    pub fn substitute(&self, bindings: &HashMap<Arc<str>, TypeRef>) -> TypeRef {
        if bindings.is_empty() {
            return self.clone();
        }
        match self {
            Self::Named { name, args } => Self::Named {
                name: Arc::clone(name),
                args: args.iter().map(|arg| arg.substitute(bindings)).collect()
            },
            Self::Array(element) => Self::array(element.substitute(bindings)),
            Self::Param(name) => bindings
                .get(name)
                .cloned()
                .unwrap_or_else(|| self.clone())
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, args } => {
                f.write_str(name)?;
                if args.is_empty() {
                    return Ok(());
                }
                f.write_str("<")?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            Self::Array(element) => write!(f, "[{element}]"),
            Self::Param(name) => f.write_str(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, TypeRef)]) -> HashMap<Arc<str>, TypeRef> {
        pairs
            .iter()
            .map(|(name, ty)| (Arc::from(*name), ty.clone()))
            .collect()
    }

    #[test]
    fn displays_nested_generics() {
        let ty = TypeRef::generic(
            "HashMap",
            [
                TypeRef::named("String"),
                TypeRef::generic("Vec", [TypeRef::array(TypeRef::named("u8"))])
            ]
        );
        assert_eq!(ty.to_string(), "HashMap<String, Vec<[u8]>>");
    }

    #[test]
    fn substitutes_bound_parameters_only() {
        let ty = TypeRef::generic("Pair", [TypeRef::param("T"), TypeRef::param("U")]);
        let resolved = ty.substitute(&bindings(&[("T", TypeRef::named("String"))]));
        assert_eq!(
            resolved,
            TypeRef::generic("Pair", [TypeRef::named("String"), TypeRef::param("U")])
        );
        assert!(!resolved.is_resolved());
    }

    #[test]
    fn substitutes_inside_arrays() {
        let ty = TypeRef::array(TypeRef::param("T"));
        let resolved = ty.substitute(&bindings(&[("T", TypeRef::named("i64"))]));
        assert_eq!(resolved, TypeRef::array(TypeRef::named("i64")));
        assert!(resolved.is_resolved());
    }

    #[test]
    fn raw_name_only_for_named() {
        assert_eq!(TypeRef::named("Person").raw_name(), Some("Person"));
        assert_eq!(TypeRef::param("T").raw_name(), None);
        assert_eq!(TypeRef::array(TypeRef::named("u8")).raw_name(), None);
    }
}
