// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Built-in raw types.
//!
//! Container detection is capability based: a type is iterable when it
//! reaches [`ITERABLE`] through its interfaces or base types, and associative
//! when it reaches [`MAP`]. The standard containers are registered with the
//! matching capability so user types only need to implement the interface.

use super::{ClassDef, FieldDef, TypeCatalog, TypeRef};

/// Universal root type. Inheritance walks stop here.
pub const OBJECT: &str = "Object";

/// Single-element iteration capability, `Iterable<T>`.
pub const ITERABLE: &str = "Iterable";

/// Collection capability, `Collection<T>: Iterable<T>`.
pub const COLLECTION: &str = "Collection";

/// Associative capability, `Map<K, V>: Iterable<Entry<K, V>>`.
pub const MAP: &str = "Map";

/// Key/value pair yielded when iterating a map.
pub const ENTRY: &str = "Entry";

/// Tuple type produced for Rust tuple expressions.
pub const TUPLE: &str = "Tuple";

/// Marker type excluded from persistence by the default field filter.
pub const PHANTOM_DATA: &str = "PhantomData";

/// Scalar value types registered as primitives.
pub const SCALARS: &[&str] = &[
    "bool",
    "i8",
    "i16",
    "i32",
    "i64",
    "i128",
    "isize",
    "u8",
    "u16",
    "u32",
    "u64",
    "u128",
    "usize",
    "f32",
    "f64",
    "char",
    "str",
    "String",
    "Decimal",
    "DateTime",
    "NaiveDate",
    "NaiveTime",
    "NaiveDateTime",
    "SystemTime",
    "Duration"
];

const COLLECTIONS: &[&str] = &["Vec", "VecDeque", "LinkedList", "HashSet", "BTreeSet"];

const MAPS: &[&str] = &["HashMap", "BTreeMap"];

fn param(name: &str) -> TypeRef {
    TypeRef::param(name)
}

pub(super) fn register(catalog: &mut TypeCatalog) {
    catalog.register(ClassDef::class(OBJECT));

    for scalar in SCALARS {
        catalog.register(ClassDef::primitive(*scalar));
    }

    catalog.register(ClassDef::interface(ITERABLE).type_params(["T"]));
    catalog.register(
        ClassDef::interface(COLLECTION)
            .type_params(["T"])
            .implements(TypeRef::generic(ITERABLE, [param("T")]))
    );
    catalog.register(
        ClassDef::class(ENTRY)
            .type_params(["K", "V"])
            .field(FieldDef::new("key", param("K")))
            .field(FieldDef::new("value", param("V")))
    );
    catalog.register(
        ClassDef::interface(MAP)
            .type_params(["K", "V"])
            .implements(TypeRef::generic(
                ITERABLE,
                [TypeRef::generic(ENTRY, [param("K"), param("V")])]
            ))
    );

    for collection in COLLECTIONS {
        catalog.register(
            ClassDef::class(*collection)
                .type_params(["T"])
                .implements(TypeRef::generic(COLLECTION, [param("T")]))
        );
    }

    for map in MAPS {
        catalog.register(
            ClassDef::class(*map)
                .type_params(["K", "V"])
                .implements(TypeRef::generic(MAP, [param("K"), param("V")]))
        );
    }

    catalog.register(ClassDef::class(PHANTOM_DATA).type_params(["T"]));
}
