use std::sync::Arc;

use joinery::backend::Backend;
use joinery::join::{JoinChain, JoinType};
use joinery::model::{Catalog, CatalogBuilder, FieldDef, FieldType, MapError, ModelDef};

/// Helper: Invoice -> Client, both with `id` and `name`.
fn billing() -> Arc<Catalog> {
    Arc::new(
        CatalogBuilder::new(Backend::Postgres)
            .register(
                ModelDef::new("Client")
                    .short_name("C")
                    .field(FieldDef::new("id", FieldType::Integer))
                    .field(FieldDef::new("name", FieldType::Text))
                    .field(FieldDef::new("Billing.Email", FieldType::Text)),
            )
            .register(
                ModelDef::new("Invoice")
                    .field(FieldDef::new("id", FieldType::Integer))
                    .field(FieldDef::new("name", FieldType::Text))
                    .field(FieldDef::new("amount", FieldType::Real))
                    .field(FieldDef::new("client", FieldType::Integer).references("Client", "id")),
            )
            .build()
            .unwrap(),
    )
}

fn joined() -> JoinChain {
    let mut chain = JoinChain::rooted(billing(), "Invoice").unwrap();
    chain.join_with_name("Client", None, JoinType::Inner).unwrap();
    chain
}

#[test]
fn test_unique_field_maps_without_qualifier() {
    let chain = joined();
    assert_eq!(
        chain.map("amount").unwrap(),
        ("\"invoice\".\"amount\"".to_string(), FieldType::Real)
    );
    assert_eq!(
        chain.map("Billing.Email").unwrap(),
        ("\"client\".\"billing_email\"".to_string(), FieldType::Text)
    );
}

#[test]
fn test_shared_field_is_ambiguous() {
    let chain = joined();
    let err = chain.map("name").unwrap_err();
    assert_eq!(err, MapError::Ambiguous("name".into()));
    assert_eq!(
        err.to_string(),
        "field name \"name\" is ambiguous, qualify it as Type|Field"
    );
}

#[test]
fn test_qualifier_picks_one_model() {
    let chain = joined();
    assert_eq!(chain.map("Invoice|name").unwrap().0, "\"invoice\".\"name\"");
    assert_eq!(chain.map("C|name").unwrap().0, "\"client\".\"name\"");
    assert_eq!(chain.map("Client|id").unwrap().0, "\"client\".\"id\"");
}

#[test]
fn test_unknown_fields() {
    let chain = joined();
    assert_eq!(chain.map("total"), Err(MapError::CantMap("total".into())));
    assert_eq!(chain.map("Client|amount"), Err(MapError::CantMap("Client|amount".into())));
    assert_eq!(chain.map("Vendor|name"), Err(MapError::CantMap("Vendor|name".into())));
}

#[test]
fn test_single_model_chain() {
    let chain = JoinChain::rooted(billing(), "Client").unwrap();
    assert_eq!(chain.map("name").unwrap().0, "\"client\".\"name\"");
}
