use std::sync::Arc;

use joinery::backend::Backend;
use joinery::join::JoinType;
use joinery::model::{Catalog, CatalogBuilder, FieldDef, FieldType, Hook, ModelDef};
use joinery::query::{Condition, Query, SortDir, Value};
use joinery::Error;

/// Helper: Ticket -> Project -> Team, Ticket -> User.
fn tracker(backend: Backend) -> Arc<Catalog> {
    Arc::new(
        CatalogBuilder::new(backend)
            .register(
                ModelDef::new("Team")
                    .field(FieldDef::new("id", FieldType::Integer))
                    .field(FieldDef::new("title", FieldType::Text)),
            )
            .register(
                ModelDef::new("Project")
                    .hook(Hook::Load)
                    .field(FieldDef::new("id", FieldType::Integer))
                    .field(FieldDef::new("title", FieldType::Text))
                    .field(FieldDef::new("team", FieldType::Integer).references("Team", "id")),
            )
            .register(
                ModelDef::new("User")
                    .field(FieldDef::new("id", FieldType::Integer))
                    .field(FieldDef::new("login", FieldType::Text)),
            )
            .register(
                ModelDef::new("Ticket")
                    .field(FieldDef::new("id", FieldType::Integer))
                    .field(FieldDef::new("summary", FieldType::Text))
                    .field(FieldDef::new("open", FieldType::Bool))
                    .field(FieldDef::new("project", FieldType::Integer).references("Project", "id"))
                    .field(FieldDef::new("assignee", FieldType::Integer).nullable().references("User", "id")),
            )
            .build()
            .unwrap(),
    )
}

#[test]
fn test_select_all_fields_of_base_model() {
    let compiled = Query::new(tracker(Backend::Sqlite), "Team")
        .unwrap()
        .compile()
        .unwrap();
    insta::assert_snapshot!(compiled.sql, @r#"SELECT "team"."id", "team"."title" FROM "team""#);
    assert!(compiled.args.is_empty());
    assert!(compiled.hooks.is_empty());
}

#[test]
fn test_implicit_joins_are_not_projected() {
    let compiled = Query::new(tracker(Backend::Sqlite), "Ticket")
        .unwrap()
        .filter(Condition::eq("Project|title", "core"))
        .filter(Condition::eq("open", true))
        .sort("User|login", SortDir::Asc)
        .implicit_join_type(JoinType::Left)
        .compile()
        .unwrap();

    insta::assert_snapshot!(compiled.sql, @r#"SELECT "ticket"."id", "ticket"."summary", "ticket"."open", "ticket"."project", "ticket"."assignee" FROM "ticket" LEFT OUTER JOIN "project" ON "ticket"."project" = "project"."id" LEFT OUTER JOIN "user" ON "ticket"."assignee" = "user"."id" WHERE "project"."title" = ? AND "ticket"."open" = ? ORDER BY "user"."login" ASC"#);
    assert_eq!(compiled.args, vec![Value::from("core"), Value::Bool(true)]);
    assert_eq!(compiled.hooks.len(), 2);
    assert_eq!(compiled.hooks[0].model, "Project");
    assert_eq!(compiled.columns().count(), 5);
}

#[test]
fn test_explicit_join_is_projected() {
    let compiled = Query::new(tracker(Backend::Sqlite), "Ticket")
        .unwrap()
        .join("Project", None, JoinType::Inner)
        .unwrap()
        .filter(Condition::eq("Team|title", "infra"))
        .limit(5)
        .offset(10)
        .compile()
        .unwrap();

    insta::assert_snapshot!(compiled.sql, @r#"SELECT "ticket"."id", "ticket"."summary", "ticket"."open", "ticket"."project", "ticket"."assignee", "project"."id", "project"."title", "project"."team" FROM "ticket" INNER JOIN "project" ON "ticket"."project" = "project"."id" INNER JOIN "team" ON "project"."team" = "team"."id" WHERE "team"."title" = ? LIMIT 5 OFFSET 10"#);
    // Only Team was pulled in by the filter.
    assert_eq!(compiled.hooks.len(), 1);
    assert_eq!(compiled.hooks[0].model, "Team");
}

#[test]
fn test_null_and_field_comparisons() {
    let compiled = Query::new(tracker(Backend::Sqlite), "Ticket")
        .unwrap()
        .filter(Condition::eq("assignee", Value::Null))
        .filter(Condition::neq("project", Value::field("id")))
        .filter(Condition::is_in("id", Vec::<i64>::new()))
        .compile()
        .unwrap();
    assert!(compiled.sql.ends_with(
        r#"WHERE "ticket"."assignee" IS NULL AND "ticket"."project" != "ticket"."id" AND 1 = 0"#
    ));
    assert!(compiled.args.is_empty());
}

#[test]
fn test_mysql_identifiers() {
    let compiled = Query::new(tracker(Backend::MySql), "User")
        .unwrap()
        .filter(Condition::or(vec![Condition::like("login", "a%"), Condition::is_in("id", [1, 2, 3])]))
        .sort("id", SortDir::Desc)
        .compile()
        .unwrap();
    insta::assert_snapshot!(compiled.sql, @"SELECT `user`.`id`, `user`.`login` FROM `user` WHERE `user`.`login` LIKE ? OR `user`.`id` IN (?, ?, ?) ORDER BY `user`.`id` DESC");
    assert_eq!(compiled.args.len(), 4);
}

#[test]
fn test_ambiguous_field_fails_to_compile() {
    let query = Query::new(tracker(Backend::Sqlite), "Ticket")
        .unwrap()
        .join("Project", None, JoinType::Inner)
        .unwrap()
        .sort("id", SortDir::Asc);
    assert!(matches!(query.compile(), Err(Error::Map(_))));
}

#[test]
fn test_unknown_models() {
    assert!(matches!(
        Query::new(tracker(Backend::Sqlite), "Nope"),
        Err(Error::Join(_))
    ));
    let err = Query::new(tracker(Backend::Sqlite), "User")
        .unwrap()
        .join("Team", None, JoinType::Inner)
        .unwrap_err();
    assert_eq!(err.to_string(), "Join error: cannot join `User` with model `Team`");
}
