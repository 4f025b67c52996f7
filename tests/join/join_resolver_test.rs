use std::collections::HashSet;
use std::sync::Arc;

use joinery::backend::Backend;
use joinery::join::{JoinChain, JoinError, JoinType};
use joinery::model::{Catalog, CatalogBuilder, FieldDef, FieldType, Hook, ModelDef};
use joinery::query::{Condition, Sort, Value};

/// Helper: Book -> Author -> Publisher, Review -> Book.
fn library() -> Arc<Catalog> {
    Arc::new(
        CatalogBuilder::new(Backend::Sqlite)
            .register(
                ModelDef::new("Publisher")
                    .short_name("Pub")
                    .hook(Hook::Load)
                    .field(FieldDef::new("id", FieldType::Integer))
                    .field(FieldDef::new("name", FieldType::Text)),
            )
            .register(
                ModelDef::new("Author")
                    .field(FieldDef::new("id", FieldType::Integer))
                    .field(FieldDef::new("name", FieldType::Text))
                    .field(FieldDef::new("publisher", FieldType::Integer).references("Publisher", "id")),
            )
            .register(
                ModelDef::new("Book")
                    .hook(Hook::Save)
                    .field(FieldDef::new("id", FieldType::Integer))
                    .field(FieldDef::new("title", FieldType::Text))
                    .field(FieldDef::new("author", FieldType::Integer).references("Author", "id")),
            )
            .register(
                ModelDef::new("Review")
                    .field(FieldDef::new("book", FieldType::Integer).references("Book", "id"))
                    .field(FieldDef::new("stars", FieldType::Integer)),
            )
            .build()
            .unwrap(),
    )
}

fn id(catalog: &Catalog, name: &str) -> joinery::model::ModelId {
    catalog.model_by_name(name).unwrap().id()
}

#[test]
fn test_inferred_join_in_both_directions() {
    let catalog = library();

    let mut forward = JoinChain::rooted(catalog.clone(), "Book").unwrap();
    forward.join_with(id(&catalog, "Author"), None, JoinType::Inner).unwrap();
    assert_eq!(forward.to_string(), "Book JOIN Author ON Book|author = Author|id");

    let mut reverse = JoinChain::rooted(catalog.clone(), "Author").unwrap();
    reverse.join_with(id(&catalog, "Book"), None, JoinType::Left).unwrap();
    let join = reverse.nodes()[1].join.as_ref().unwrap();
    assert_eq!(join.join_type, JoinType::Left);
    assert_eq!(join.condition, Condition::eq("Book|author", Value::field("Author|id")));
}

#[test]
fn test_candidates_are_collected_along_the_chain() {
    let catalog = library();
    let mut chain = JoinChain::rooted(catalog.clone(), "Review").unwrap();
    chain.join_with_name("Book", None, JoinType::Inner).unwrap();
    chain.join_with_name("Author", None, JoinType::Inner).unwrap();
    let pos = chain.join_with_name("Publisher", None, JoinType::Outer).unwrap();

    assert_eq!(pos, 3);
    let models: Vec<&str> = chain.models().map(|m| m.name()).collect();
    assert_eq!(models, vec!["Review", "Book", "Author", "Publisher"]);
    assert_eq!(
        chain.to_string(),
        "Review JOIN Book ON Review|book = Book|id \
         JOIN Author ON Book|author = Author|id \
         JOIN Publisher ON Author|publisher = Publisher|id"
    );
}

#[test]
fn test_no_relationship_leaves_chain_untouched() {
    let catalog = library();
    let mut chain = JoinChain::rooted(catalog, "Review").unwrap();
    let err = chain.join_with_name("Publisher", None, JoinType::Inner).unwrap_err();
    assert_eq!(
        err,
        JoinError::NoRelationship {
            chain: "Review".into(),
            target: "Publisher".into()
        }
    );
    assert_eq!(chain.len(), 1);
}

#[test]
fn test_explicit_condition_skips_inference() {
    let catalog = library();
    let mut chain = JoinChain::rooted(catalog, "Review").unwrap();
    let on = Condition::eq("Review|stars", Value::field("Publisher|id"));
    chain.join_with_name("Publisher", Some(on.clone()), JoinType::Right).unwrap();
    let join = chain.nodes()[1].join.as_ref().unwrap();
    assert_eq!(join.condition, on);
    assert_eq!(join.join_type, JoinType::Right);
}

#[test]
fn test_field_references_walk_the_chain() {
    let catalog = library();
    let mut chain = JoinChain::rooted(catalog, "Review").unwrap();
    chain.join_with_name("Book", None, JoinType::Inner).unwrap();

    let mut visited = chain.visited();
    let mut hooks = Vec::new();
    let filter = Condition::and(vec![
        Condition::gte("stars", 4),
        Condition::or(vec![
            Condition::like("Author|name", "K%"),
            Condition::eq("Pub|name", "Ace"),
        ]),
    ]);
    // Author is reached through Book; Publisher only once Author is present.
    chain
        .join_with_condition(&filter, JoinType::Left, &mut visited, &mut hooks)
        .unwrap();

    let summary: Vec<(&str, bool)> = chain
        .nodes()
        .iter()
        .map(|n| (chain.catalog().model(n.model).name(), n.skip))
        .collect();
    assert_eq!(
        summary,
        vec![("Review", false), ("Book", false), ("Author", true), ("Publisher", true)]
    );
    assert_eq!(hooks.len(), 2);
    assert!(hooks[1].has(Hook::Load));
    assert_eq!(visited.len(), 4);
}

#[test]
fn test_sort_keys_join_once() {
    let catalog = library();
    let mut chain = JoinChain::rooted(catalog, "Book").unwrap();
    let mut visited: HashSet<_> = chain.visited();
    let mut hooks = Vec::new();
    let sort = [Sort::asc("Author|name"), Sort::desc("Author|id"), Sort::asc("title")];
    chain
        .join_with_sort(&sort, JoinType::Inner, &mut visited, &mut hooks)
        .unwrap();
    assert_eq!(chain.len(), 2);
    assert!(chain.nodes()[1].skip);
    assert_eq!(chain.projected().count(), 1);
}

#[test]
fn test_field_reference_to_model_already_in_chain() {
    let catalog = library();
    let mut chain = JoinChain::rooted(catalog, "Book").unwrap();
    chain.join_with_name("Author", None, JoinType::Inner).unwrap();
    let mut visited = chain.visited();
    let mut hooks = Vec::new();
    chain
        .join_with_field("Book|title", JoinType::Inner, &mut visited, &mut hooks)
        .unwrap();
    assert_eq!(chain.len(), 2);
    assert!(hooks.is_empty());
}

#[test]
fn test_clone_is_independent() {
    let catalog = library();
    let base = JoinChain::rooted(catalog, "Book").unwrap();
    let mut copy = base.clone();
    copy.join_with_name("Author", None, JoinType::Inner).unwrap();
    assert_eq!(base.len(), 1);
    assert_eq!(copy.len(), 2);
    assert!(Arc::ptr_eq(base.catalog(), copy.catalog()));
}
