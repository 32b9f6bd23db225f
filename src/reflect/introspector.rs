// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Raw type lookup and field/constructor enumeration.

use std::{collections::HashSet, sync::Arc};

use crate::model::{ClassDef, ConstructorDef, FieldDef, builtins::OBJECT};

/// Source of raw type definitions.
///
/// Only [`class`](Self::class) is required. Field enumeration walks the
/// declared type and then every ancestor up to, but excluding, the root
/// [`OBJECT`] type. Own fields come first, followed by each ancestor's in
/// inheritance order.
pub trait TypeIntrospector: Send + Sync {
    /// Definition of the raw type with that name.
    fn class(&self, name: &str) -> Option<Arc<ClassDef>>;

    /// Instance and static fields of `name` including inherited ones.
    ///
    /// # Arguments
    ///
    /// * `name` - Raw type name
    ///
    /// # Returns
    ///
    /// Fields in declaration order, own type first. Unknown types yield an
    /// empty list. Cyclic inheritance is walked once.
    fn fields(&self, name: &str) -> Vec<FieldDef> {
        let mut fields = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(name.to_owned());

        while let Some(type_name) = current.take() {
            if type_name == OBJECT || !visited.insert(type_name.clone()) {
                break;
            }
            let Some(class) = self.class(&type_name) else {
                break;
            };
            fields.extend(class.fields().iter().cloned());
            current = class
                .base()
                .and_then(|base| base.raw_name())
                .map(str::to_owned);
        }
        fields
    }

    /// Public constructors declared by `name`.
    fn constructors(&self, name: &str) -> Vec<ConstructorDef> {
        self.class(name)
            .map(|class| {
                class
                    .constructors()
                    .iter()
                    .filter(|constructor| constructor.is_public())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl<T: TypeIntrospector + ?Sized> TypeIntrospector for Arc<T> {
    fn class(&self, name: &str) -> Option<Arc<ClassDef>> {
        (**self).class(name)
    }

    fn fields(&self, name: &str) -> Vec<FieldDef> {
        (**self).fields(name)
    }

    fn constructors(&self, name: &str) -> Vec<ConstructorDef> {
        (**self).constructors(name)
    }
}
