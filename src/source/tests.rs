// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Source loader tests.
//!
//! | Category | Covered |
//! |----------|---------|
//! | Structs | Named and tuple fields, markers, generics, `#[entity]` |
//! | Other items | Enums, traits, supertraits, inline modules |
//! | Impl blocks | Interfaces, parameter renaming, constructors, methods, constants |
//! | Ordering | Impl before struct, impl in a later source, unknown targets |
//! | Errors | Syntax, unsupported types, malformed attributes, I/O, atomicity |

use std::sync::Arc;

use super::*;
use crate::{
    error::SourceError,
    model::{ClassKind, TypeCatalog, TypeRef, builtins, markers},
    typeinfo::TypeResolver
};

fn load(source: &str) -> TypeCatalog {
    SourceLoader::parse(source).expect("source loads")
}

#[test]
fn struct_fields_and_markers() {
    let catalog = load(
        r##"
        pub struct Person {
            #[id]
            id: String,
            #[version]
            version: i64,
            #[transient]
            cache: Option<String>,
            #[value("#root.name")]
            name: Box<String>,
            friends: Vec<Person>,
        }
        "##
    );
    let person = catalog.get("Person").expect("Person");
    assert_eq!(person.kind(), ClassKind::Class);

    let fields = person.fields();
    let names: Vec<_> = fields.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["id", "version", "cache", "name", "friends"]);
    assert!(fields[0].attributes().has(markers::ID));
    assert!(fields[1].attributes().has(markers::VERSION));
    assert!(fields[2].attributes().has(markers::TRANSIENT));
    assert_eq!(fields[2].ty(), &TypeRef::named("String"));
    assert_eq!(fields[3].attributes().value(markers::VALUE), Some("#root.name"));
    assert_eq!(
        fields[4].ty(),
        &TypeRef::generic("Vec", [TypeRef::named("Person")])
    );
    assert!(fields.iter().all(|f| f.declaring() == "Person"));
}

#[test]
fn tuple_and_unit_structs() {
    let catalog = load("struct Meters(f64, String); struct Marker;");
    let meters = catalog.get("Meters").expect("Meters");
    let names: Vec<_> = meters.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["0", "1"]);
    assert!(catalog.get("Marker").expect("Marker").fields().is_empty());
}

#[test]
fn generic_struct_with_base_and_alias() {
    let catalog = load(
        r#"
        struct Base<K> { id: K }

        #[entity(alias = "node", extends = "Base<T>")]
        struct Node<T> {
            value: T,
            children: Vec<Self>,
        }
        "#
    );
    let node = catalog.get("Node").expect("Node");
    assert_eq!(node.generic_params(), &[Arc::<str>::from("T")]);
    assert_eq!(node.type_alias(), Some("node"));
    assert_eq!(
        node.base(),
        Some(&TypeRef::generic("Base", [TypeRef::param("T")]))
    );
    assert_eq!(node.fields()[0].ty(), &TypeRef::param("T"));
    assert_eq!(
        node.fields()[1].ty(),
        &TypeRef::generic("Vec", [TypeRef::generic("Node", [TypeRef::param("T")])])
    );

    let resolver = TypeResolver::new(catalog);
    let node = resolver.resolve(&TypeRef::generic("Node", [TypeRef::named("i64")]));
    let id = node.property("id").expect("inherited id");
    assert_eq!(id.to_string(), "i64");
}

#[test]
fn enums_traits_and_modules() {
    let catalog = load(
        r#"
        enum Status { Active, Inactive }

        trait Named: Clone + ?Sized {
            fn name(&self) -> String;
            fn build() -> Self;
        }

        trait Repository<T>: Named + Iterable<T> {}

        mod nested {
            pub struct Inner { pub code: u32 }
        }
        "#
    );
    assert_eq!(catalog.get("Status").expect("Status").kind(), ClassKind::Enum);

    let named = catalog.get("Named").expect("Named");
    assert_eq!(named.kind(), ClassKind::Interface);
    assert_eq!(named.interfaces(), &[TypeRef::named("Clone")]);
    assert_eq!(named.methods().len(), 1);
    assert_eq!(named.methods()[0].returns(), Some(&TypeRef::named("String")));

    let repository = catalog.get("Repository").expect("Repository");
    assert_eq!(
        repository.interfaces(),
        &[
            TypeRef::named("Named"),
            TypeRef::generic(builtins::ITERABLE, [TypeRef::param("T")])
        ]
    );

    assert!(catalog.contains("Inner"));
}

#[test]
fn trait_impls_rename_generic_parameters() {
    let catalog = load(
        r#"
        struct Bag<T> { items: Vec<T> }

        impl<U: Clone> Iterable<U> for Bag<U> {}
        impl Clone for Bag<String> {}
        impl !Send for Bag<u8> {}
        "#
    );
    let bag = catalog.get("Bag").expect("Bag");
    assert_eq!(
        bag.interfaces(),
        &[
            TypeRef::generic(builtins::ITERABLE, [TypeRef::param("T")]),
            TypeRef::named("Clone")
        ]
    );

    let resolver = TypeResolver::new(catalog);
    let bag = resolver.resolve(&TypeRef::generic("Bag", [TypeRef::named("u32")]));
    assert!(bag.is_collection_like());
    assert_eq!(
        bag.component_type().map(|c| c.to_string()),
        Some("u32".to_owned())
    );
}

#[test]
fn inherent_impls_declare_constructors_methods_and_constants() {
    let catalog = load(
        r#"
        struct Account<T> { owner: T, balance: i64 }

        impl<O> Account<O> {
            const LIMIT: i64 = 10;

            pub fn new(owner: O, #[value("0")] balance: i64) -> Self {
                Self { owner, balance }
            }

            #[persistence_constructor]
            fn restore(_: O, (balance, _): (i64, i64)) -> Account<O> {
                todo!()
            }

            pub fn try_new(owner: O) -> Option<Self> {
                None
            }

            fn helper() -> i64 { 0 }

            pub fn owner(&self) -> &O {
                &self.owner
            }

            pub fn deposit<A>(&mut self, amount: A) {}
        }
        "#
    );
    let account = catalog.get("Account").expect("Account");

    let constructors = account.constructors();
    assert_eq!(constructors.len(), 2);
    let new = &constructors[0];
    assert!(new.is_public());
    assert!(!new.is_explicit());
    assert_eq!(new.params()[0].name(), Some("owner"));
    assert_eq!(new.params()[0].ty(), &TypeRef::param("T"));
    assert_eq!(new.params()[1].attributes().value(markers::VALUE), Some("0"));

    let restore = &constructors[1];
    assert!(!restore.is_public());
    assert!(restore.is_explicit());
    assert_eq!(restore.position(), 1);
    assert!(restore.params().iter().all(|param| param.name().is_none()));

    let methods: Vec<_> = account.methods().iter().map(|m| m.name()).collect();
    assert_eq!(methods, vec!["owner", "deposit"]);
    let owner = account.find_method("owner").expect("owner");
    assert_eq!(owner.returns(), Some(&TypeRef::param("T")));
    assert_eq!(
        account.find_method("deposit").map(|m| m.params()[0].ty().clone()),
        Some(TypeRef::param("A"))
    );

    let limit = account
        .fields()
        .iter()
        .find(|field| field.name() == "LIMIT")
        .expect("constant");
    assert!(limit.is_static());
}

#[test]
fn impl_blocks_may_precede_or_follow_their_type() {
    let catalog = load(
        r#"
        impl Point {
            pub fn origin() -> Self { Point { x: 0, y: 0 } }
        }
        struct Point { x: i32, y: i32 }
        "#
    );
    assert_eq!(catalog.get("Point").expect("Point").constructors().len(), 1);

    let mut loader = SourceLoader::new();
    loader
        .load_str("impl Later { fn make(value: u8) -> Self { todo!() } }")
        .expect("first source");
    assert_eq!(loader.pending_impls(), 1);
    loader
        .load_str("struct Later { value: u8 }")
        .expect("second source");
    assert_eq!(loader.pending_impls(), 0);

    let later = loader.catalog().get("Later").expect("Later");
    assert_eq!(later.constructors()[0].params()[0].name(), Some("value"));
}

#[test]
fn impls_for_unknown_types_are_dropped_on_finish() {
    let mut loader = SourceLoader::new();
    loader
        .load_str("impl Display for Missing {} impl Foo for [u8] {}")
        .expect("source");
    assert_eq!(loader.pending_impls(), 1);
    let catalog = loader.finish();
    assert!(!catalog.contains("Missing"));
}

#[test]
fn syntax_errors_carry_positions() {
    let error = SourceLoader::parse("struct Broken {\n    id: ,\n}").expect_err("syntax");
    assert!(matches!(error, SourceError::Syntax { line: 2, .. }), "{error}");
}

#[test]
fn unsupported_types_are_rejected() {
    let error = SourceLoader::parse("struct Callback {\n    run: fn(u8) -> u8,\n}")
        .expect_err("function pointer");
    let SourceError::UnsupportedType { ty, line, .. } = error else {
        panic!("unexpected error: {error}");
    };
    assert_eq!(line, 2);
    assert!(ty.starts_with("fn"));

    assert!(matches!(
        SourceLoader::parse("struct Plugin { inner: Box<dyn Send> }"),
        Err(SourceError::UnsupportedType { .. })
    ));
}

#[test]
fn malformed_attributes_are_rejected() {
    assert!(matches!(
        SourceLoader::parse(r#"#[entity(table = "x")] struct T { id: u8 }"#),
        Err(SourceError::Attribute { ref item, .. }) if item == "T"
    ));
    assert!(matches!(
        SourceLoader::parse(r#"#[entity(extends = "Base<")] struct T { id: u8 }"#),
        Err(SourceError::Attribute { .. })
    ));
}

#[test]
fn failing_source_leaves_catalog_untouched() {
    let mut loader = SourceLoader::new();
    loader.load_str("struct Kept { id: u8 }").expect("first source");
    let before = loader.catalog().len();

    let result = loader.load_str("struct Lost { id: u8 } struct Bad { f: impl Send }");
    assert!(result.is_err());
    assert_eq!(loader.catalog().len(), before);
    assert!(!loader.catalog().contains("Lost"));
}

#[test]
fn missing_files_report_their_path() {
    let mut loader = SourceLoader::default();
    let error = loader
        .load_file("/definitely/not/here.rs")
        .expect_err("missing file");
    assert!(matches!(error, SourceError::Io { ref path, .. } if path.ends_with("here.rs")));
}
