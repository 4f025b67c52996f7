use joinery::backend::Backend;
use joinery::model::{
    Catalog, CatalogBuilder, FieldDef, FieldType, Hook, Index, IndexTag, MapError, ModelDef,
    ModelError,
};
use joinery::query::SortDir;

/// Helper: a small shop schema. Order -> Customer -> Country, Order -> Product.
fn shop() -> Catalog {
    CatalogBuilder::new(Backend::Sqlite)
        .register(
            ModelDef::new("Order")
                .field(FieldDef::new("id", FieldType::Integer).primary_key())
                .field(FieldDef::new("customer", FieldType::Integer).references("Customer", "id"))
                .field(FieldDef::new("product", FieldType::Integer).references("Product", "id"))
                .field(FieldDef::new("placed", FieldType::Timestamp).index(IndexTag::Desc)),
        )
        .register(
            ModelDef::new("Customer")
                .short_name("Cust")
                .hook(Hook::Load)
                .field(FieldDef::new("id", FieldType::Integer).primary_key())
                .field(FieldDef::new("name", FieldType::Text))
                .field(FieldDef::new("Address.City", FieldType::Text))
                .field(FieldDef::new("country", FieldType::Text).references("Country", "code")),
        )
        .register(
            ModelDef::new("Product")
                .table("products")
                .field(FieldDef::new("id", FieldType::Integer).primary_key())
                .field(FieldDef::new("sku", FieldType::Text).unique().index(IndexTag::Both)),
        )
        .register(
            ModelDef::new("Country")
                .field(FieldDef::new("code", FieldType::Text).primary_key())
                .index(Index::new(["code"]).unique()),
        )
        .build()
        .unwrap()
}

#[test]
fn test_lookup_by_name_and_short_name() {
    let catalog = shop();
    assert_eq!(catalog.len(), 4);
    let customer = catalog.model_by_name("Customer").unwrap();
    assert_eq!(catalog.model_by_name("Cust").unwrap().id(), customer.id());
    assert_eq!(catalog.model(customer.id()).name(), "Customer");
    assert!(catalog.model_by_name("Nobody").is_none());
    assert!(matches!(catalog.require("Nobody"), Err(ModelError::UnknownModel(_))));
}

#[test]
fn test_model_map() {
    let catalog = shop();
    let customer = catalog.model_by_name("Customer").unwrap();

    assert_eq!(
        customer.map("Address.City").unwrap(),
        ("\"customer\".\"address_city\"", FieldType::Text)
    );
    assert_eq!(customer.map("Cust|name").unwrap().0, "\"customer\".\"name\"");
    assert_eq!(customer.map("Customer|name").unwrap().1, FieldType::Text);
    assert_eq!(
        customer.map("Order|name"),
        Err(MapError::NotThisModel("Order".into()))
    );
    assert_eq!(customer.map("email"), Err(MapError::CantMap("email".into())));
}

#[test]
fn test_explicit_table_name() {
    let catalog = shop();
    let product = catalog.model_by_name("Product").unwrap();
    assert_eq!(product.table(), "products");
    assert_eq!(product.map("sku").unwrap().0, "\"products\".\"sku\"");
}

#[test]
fn test_full_name_and_hooks() {
    let catalog = shop();
    let customer = catalog.model_by_name("Customer").unwrap();
    assert_eq!(customer.full_name("name"), "Customer|name");
    assert!(customer.hooks().has(Hook::Load));
    assert!(!customer.hooks().has(Hook::Save));
    assert!(catalog.model_by_name("Order").unwrap().hooks().is_empty());
}

#[test]
fn test_indexes_declared_then_derived() {
    let catalog = shop();

    let order = catalog.model_by_name("Order").unwrap().indexes();
    assert_eq!(order.len(), 1);
    assert_eq!(order[0].fields, vec![("placed".to_string(), SortDir::Desc)]);

    let product = catalog.model_by_name("Product").unwrap().indexes();
    assert_eq!(product.len(), 2);
    assert_eq!(product[0].fields[0].1, SortDir::Asc);
    assert_eq!(product[1].fields[0].1, SortDir::Desc);
    assert!(product.iter().all(|idx| idx.unique));

    let country = catalog.model_by_name("Country").unwrap().indexes();
    assert_eq!(country, vec![Index::new(["code"]).unique()]);
}

#[test]
fn test_less_follows_references() {
    let catalog = shop();
    let id = |name: &str| catalog.model_by_name(name).unwrap().id();

    // Order references Customer directly and Country transitively.
    assert!(!catalog.less(id("Order"), id("Customer")));
    assert!(!catalog.less(id("Order"), id("Country")));
    assert!(catalog.less(id("Customer"), id("Order")));
    assert!(catalog.less(id("Product"), id("Customer")));
    assert!(!catalog.less(id("Order"), id("Order")));
}

#[test]
fn test_dependency_order() {
    let catalog = shop();
    let names: Vec<&str> = catalog
        .dependency_order()
        .unwrap()
        .into_iter()
        .map(|id| catalog.model(id).name())
        .collect();
    assert_eq!(names, vec!["Product", "Country", "Customer", "Order"]);
    assert_eq!(catalog.graph().edge_count(), 3);
}

#[test]
fn test_cyclic_references() {
    let catalog = CatalogBuilder::new(Backend::Sqlite)
        .register(
            ModelDef::new("A")
                .field(FieldDef::new("id", FieldType::Integer))
                .field(FieldDef::new("b", FieldType::Integer).references("B", "id")),
        )
        .register(
            ModelDef::new("B")
                .field(FieldDef::new("id", FieldType::Integer))
                .field(FieldDef::new("a", FieldType::Integer).references("A", "id")),
        )
        .register(ModelDef::new("C").field(FieldDef::new("id", FieldType::Integer)))
        .build()
        .unwrap();

    let err = catalog.dependency_order().unwrap_err();
    assert_eq!(err, ModelError::CyclicReference(vec!["A".into(), "B".into()]));
    assert_eq!(err.to_string(), "cyclic references between models: A, B");
}

#[test]
fn test_self_reference_is_not_a_cycle() {
    let catalog = CatalogBuilder::new(Backend::Sqlite)
        .register(
            ModelDef::new("Node")
                .field(FieldDef::new("id", FieldType::Integer))
                .field(FieldDef::new("parent", FieldType::Integer).nullable().references("Node", "id")),
        )
        .build()
        .unwrap();
    let node = catalog.model_by_name("Node").unwrap();
    assert_eq!(catalog.dependency_order().unwrap(), vec![node.id()]);
    assert_eq!(node.joins_to(node.id()).len(), 1);
    assert_eq!(catalog.reference_count(), 0);
}

#[test]
fn test_unknown_reference_targets() {
    let err = CatalogBuilder::new(Backend::Sqlite)
        .register(ModelDef::new("A").field(FieldDef::new("x", FieldType::Integer).references("Missing", "id")))
        .build()
        .unwrap_err();
    assert!(matches!(err, ModelError::UnknownReference { .. }));

    let err = CatalogBuilder::new(Backend::Sqlite)
        .register(ModelDef::new("B").field(FieldDef::new("id", FieldType::Integer)))
        .register(ModelDef::new("A").field(FieldDef::new("x", FieldType::Integer).references("B", "uuid")))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        ModelError::UnknownField {
            model: "B".into(),
            field: "uuid".into()
        }
    );
}

#[test]
fn test_index_on_unknown_field() {
    let err = CatalogBuilder::new(Backend::Sqlite)
        .register(
            ModelDef::new("A")
                .field(FieldDef::new("id", FieldType::Integer))
                .index(Index::new(["id", "nope"])),
        )
        .build()
        .unwrap_err();
    assert!(matches!(err, ModelError::UnknownField { field, .. } if field == "nope"));
}

#[test]
fn test_mysql_quoting() {
    let catalog = CatalogBuilder::new(Backend::MySql)
        .register(ModelDef::new("UserGroup").field(FieldDef::new("id", FieldType::Integer)))
        .build()
        .unwrap();
    let model = catalog.model_by_name("UserGroup").unwrap();
    assert_eq!(model.map("id").unwrap().0, "`user_group`.`id`");
}
