// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Property path integration tests over loaded source fixtures.

use entity_mapping::{
    MappingContext, MappingError, PropertyPath, SourceLoader, TypeRef, TypeResolver
};

const FIXTURES: &str = r#"
    struct FooBar { name: String }

    struct Bar {
        user: FooBar,
        users: HashSet<FooBar>,
        #[allow(non_snake_case)]
        userNames: Vec<String>,
    }

    struct Sample { #[allow(non_snake_case)] userName: String }

    struct Sample2 {
        user: FooBar,
        #[allow(non_snake_case)]
        userNameWhatever: String,
    }

    struct Order {
        #[id]
        id: u64,
        customer: Customer,
        lines: Vec<OrderLine>,
    }

    struct Customer { full_name: String, address: Address }
    struct Address { zip_code: String }
    struct OrderLine { sku: String, quantity: u32 }
"#;

fn resolver() -> TypeResolver {
    TypeResolver::new(SourceLoader::parse(FIXTURES).expect("fixtures load"))
}

fn parse(resolver: &TypeResolver, source: &str, root: &str) -> PropertyPath {
    PropertyPath::parse(source, &resolver.resolve_named(root)).expect(source)
}

#[test]
fn declared_full_names_win() {
    let resolver = resolver();

    let path = parse(&resolver, "userName", "Sample");
    assert!(!path.has_next());
    assert_eq!(path.segment(), "userName");

    let path = parse(&resolver, "userName", "Sample2");
    assert_eq!(path.dot_path(), "user.name");
    assert_eq!(path.leaf_property().owning_type().to_string(), "FooBar");
}

#[test]
fn longest_prefix_before_backtracking() {
    let resolver = resolver();
    let path = parse(&resolver, "userNames", "Bar");
    assert_eq!(path.dot_path(), "userNames");
    assert!(path.is_collection());

    let path = parse(&resolver, "usersName", "Bar");
    assert_eq!(path.dot_path(), "users.name");
}

#[test]
fn dot_paths_round_trip() {
    let resolver = resolver();
    for (source, root) in [
        ("userName", "Sample"),
        ("userName", "Sample2"),
        ("usersName", "Bar"),
        ("customerAddressZipCode", "Order"),
        ("customer.fullName", "Order"),
        ("lines.sku", "Order")
    ] {
        let path = parse(&resolver, source, root);
        let reparsed = parse(&resolver, &path.dot_path(), root);
        assert_eq!(path, reparsed, "{source}");
    }
}

#[test]
fn unresolved_first_segment() {
    let resolver = resolver();
    let error = PropertyPath::parse("bar", &resolver.resolve_named("FooBar")).expect_err("bar");
    assert_eq!(error.property_name(), "bar");
    assert!(error.base_path().is_none());
}

#[test]
fn unresolved_nested_segment_keeps_base_path() {
    let resolver = resolver();
    let error =
        PropertyPath::parse("usersMame", &resolver.resolve_named("Bar")).expect_err("usersMame");

    assert_eq!(error.property_name(), "Mame");
    assert_eq!(error.owning_type().to_string(), "FooBar");
    assert_eq!(error.base_path(), Some(&parse(&resolver, "users", "Bar")));
    assert_eq!(
        error.to_string(),
        "No property Mame found for type FooBar! Traversed path: users"
    );
}

#[test]
fn persistent_paths_follow_entities() {
    let context = MappingContext::new(resolver());
    let root: TypeRef = "Order".parse().expect("type");

    let path = context
        .property_path("customerAddressZipCode", &root)
        .expect("path");
    let properties = context.persistent_property_path(&path).expect("properties");
    assert_eq!(properties.to_dot_path(), "customer.address.zip_code");
    assert_eq!(properties.to_string(), "customer.address.zip_code");

    let lines = context.property_path("linesQuantity", &root).expect("path");
    let properties = context.persistent_property_path(&lines).expect("properties");
    assert!(
        properties
            .base_property()
            .is_some_and(|property| property.is_collection_like())
    );

    assert!(matches!(
        context.property_path("customerPhone", &root),
        Err(MappingError::PropertyReference(_))
    ));
}
