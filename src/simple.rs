// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Simple-type predicate.
//!
//! Simple types are atomic values: they become properties but are never
//! inspected for nested entities.

use std::{collections::HashSet, sync::Arc};

use crate::{
    model::{ClassKind, TypeRef, builtins},
    typeinfo::TypeInformation
};

/// Set of raw type names treated as simple.
///
/// | Classified simple | Condition |
/// |-------------------|-----------|
/// | Root type | Always |
/// | Registered names | Exact raw name, or any ancestor registered |
/// | Enumerations | When the default set is registered |
/// | Arrays | When the element type is simple |
/// | Unbound generic parameters | Always, they erase to the root type |
///
/// The default set holds the built-in scalars (booleans, integers of every
/// width, floats, decimal, char, strings, date and time types).
#[derive(Debug, Clone)]
pub struct SimpleTypeHolder {
    types: Arc<HashSet<Arc<str>>>,
    enums: bool
}

impl SimpleTypeHolder {
    /// Holder with `custom` types, optionally on top of the default set.
    ///
    /// # Arguments
    ///
    /// * `custom` - Additional raw type names
    /// * `register_defaults` - Whether to include the built-in scalars and
    ///   enumerations
    #[must_use]
    pub fn new<I, S>(custom: I, register_defaults: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        let mut types: HashSet<Arc<str>> = custom
            .into_iter()
            .map(|name| Arc::from(name.as_ref()))
            .collect();
        if register_defaults {
            types.extend(builtins::SCALARS.iter().map(|name| Arc::from(*name)));
        }
        Self {
            types: Arc::new(types),
            enums: register_defaults
        }
    }

    /// Copy of this holder with `custom` types added.
    #[must_use]
    pub fn extended<I, S>(&self, custom: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        let mut types = (*self.types).clone();
        types.extend(custom.into_iter().map(|name| Arc::from(name.as_ref())));
        Self {
            types: Arc::new(types),
            enums: self.enums
        }
    }

    /// Whether the raw name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    /// Whether `info` is a simple type.
    #[must_use]
    pub fn is_simple_type(&self, info: &TypeInformation) -> bool {
        match info.resolved_type() {
            TypeRef::Param(_) => true,
            TypeRef::Array(_) => info
                .component_type()
                .is_some_and(|component| self.is_simple_type(&component)),
            TypeRef::Named { name, .. } => {
                name.as_ref() == builtins::OBJECT
                    || self.contains(name)
                    || (self.enums
                        && info
                            .class_def()
                            .is_some_and(|class| class.kind() == ClassKind::Enum))
                    || info
                        .ancestor_names()
                        .iter()
                        .any(|ancestor| self.contains(ancestor))
            }
        }
    }
}

impl Default for SimpleTypeHolder {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>(), true)
    }
}
