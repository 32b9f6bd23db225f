// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Type information integration tests over loaded source fixtures.

use entity_mapping::{
    SourceLoader, TypeRef, TypeResolver, reflect::TypeIntrospector, typeinfo::TypeKind
};

const FIXTURES: &str = r#"
    struct Auditable<T> { stamp: T }

    #[entity(extends = "Auditable<i64>")]
    struct Versioned<U> { value: U }

    #[entity(extends = "Versioned<String>")]
    struct Document { title: String }

    struct Page<T> {
        items: Vec<T>,
        index: HashMap<String, T>,
        first: Option<T>,
    }

    struct Translations<T> { entries: Vec<T> }

    impl<V> Map<String, V> for Translations<V> {}

    trait Shape {}
    struct Circle { radius: f64 }
    impl Shape for Circle {}
"#;

fn resolver() -> TypeResolver {
    TypeResolver::new(SourceLoader::parse(FIXTURES).expect("fixtures load"))
}

fn ty(source: &str) -> TypeRef {
    source.parse().expect(source)
}

#[test]
fn fields_are_collected_through_every_ancestor() {
    let resolver = resolver();
    let names: Vec<_> = resolver
        .introspector()
        .fields("Document")
        .iter()
        .map(|field| field.name().to_owned())
        .collect();
    assert_eq!(names, vec!["title", "value", "stamp"]);

    let document = resolver.resolve_named("Document");
    assert_eq!(document.property("value").map(|t| t.to_string()), Some("String".to_owned()));
    assert_eq!(document.property("stamp").map(|t| t.to_string()), Some("i64".to_owned()));
}

#[test]
fn generic_fields_follow_their_context() {
    let resolver = resolver();
    let page = resolver.resolve(&ty("Page<Circle>"));

    let items = page.property("items").expect("items");
    assert!(items.is_collection_like());
    assert_eq!(items.actual_type().map(|t| t.to_string()), Some("Circle".to_owned()));

    let index = page.property("index").expect("index");
    assert!(index.is_map());
    assert_eq!(index.actual_type().map(|t| t.to_string()), Some("Circle".to_owned()));
    assert_eq!(index.component_type().map(|t| t.to_string()), Some("String".to_owned()));

    let first = page.property("first").expect("first");
    assert_eq!(first.to_string(), "Circle");

    let radius = page.property("first.radius").expect("dotted lookup");
    assert_eq!(radius.to_string(), "f64");
}

#[test]
fn unbound_parameters_stay_variables() {
    let resolver = resolver();
    let raw = resolver.resolve_named("Page");
    let first = raw.property("first").expect("first");
    assert_eq!(first.kind(), TypeKind::Variable);
}

#[test]
fn user_maps_expose_their_value_type() {
    let resolver = resolver();
    let translations = resolver.resolve(&ty("Translations<Circle>"));

    assert!(translations.is_map());
    assert!(!translations.is_collection_like());
    assert_eq!(
        translations.map_value_type().map(|t| t.to_string()),
        Some("Circle".to_owned())
    );
    assert_eq!(
        translations.actual_type().map(|t| t.to_string()),
        Some("Circle".to_owned())
    );
}

#[test]
fn equality_and_caching() {
    let resolver = resolver();
    let first = resolver.resolve(&ty("Page<Circle>"));
    let second = resolver.resolve(&ty("Page<Circle>"));
    assert_eq!(first, second);
    assert_ne!(first, resolver.resolve(&ty("Page<Document>")));
    assert_eq!(first, resolver.detached(&ty("Page<Circle>")));
    assert!(resolver.cached() >= 2);
}

#[test]
fn assignability_uses_supertypes() {
    let resolver = resolver();
    let shape = resolver.resolve_named("Shape");
    let circle = resolver.resolve_named("Circle");
    assert!(shape.is_assignable_from(&circle));
    assert!(!circle.is_assignable_from(&shape));

    let auditable = resolver.resolve(&ty("Auditable<i64>"));
    let document = resolver.resolve_named("Document");
    assert!(auditable.is_assignable_from(&document));
    assert!(!resolver.resolve(&ty("Auditable<String>")).is_assignable_from(&document));
}
