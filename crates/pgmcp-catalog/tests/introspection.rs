//! Introspection tests against a live PostgreSQL server.
//!
//! These run only when `DATABASE_URL` points at a database the test user can
//! create schemas in; otherwise each test returns early.

use std::sync::atomic::{AtomicUsize, Ordering};

use pgmcp_catalog::{ColumnConstraint, Introspector, ReferentialAction, RowCountMode};
use pretty_assertions::assert_eq;
use sqlx::{Connection, PgConnection};

static NEXT_SCHEMA: AtomicUsize = AtomicUsize::new(0);

struct TestContext {
    conn: PgConnection,
    schema: String,
}

impl TestContext {
    /// Connect and create a fresh, uniquely named schema.
    async fn new(prefix: &str) -> Option<Self> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let mut conn = PgConnection::connect(&url).await.unwrap();
        let schema = format!(
            "{prefix}_{}_{}",
            std::process::id(),
            NEXT_SCHEMA.fetch_add(1, Ordering::Relaxed)
        );
        sqlx::raw_sql(&format!(
            "DROP SCHEMA IF EXISTS \"{schema}\" CASCADE; CREATE SCHEMA \"{schema}\";"
        ))
        .execute(&mut conn)
        .await
        .unwrap();
        Some(Self { conn, schema })
    }

    /// Run DDL with `{s}` replaced by the quoted test schema.
    async fn exec(&mut self, sql: &str) {
        let sql = sql.replace("{s}", &format!("\"{}\"", self.schema));
        sqlx::raw_sql(&sql).execute(&mut self.conn).await.unwrap();
    }

    async fn teardown(mut self) {
        let sql = format!("DROP SCHEMA IF EXISTS \"{}\" CASCADE", self.schema);
        sqlx::raw_sql(&sql).execute(&mut self.conn).await.unwrap();
        self.conn.close().await.unwrap();
    }
}

async fn setup_shop(ctx: &mut TestContext) {
    ctx.exec(
        "CREATE TABLE {s}.customers (id serial PRIMARY KEY, name text NOT NULL);
         CREATE TABLE {s}.orders (
             id serial PRIMARY KEY,
             customer_id int REFERENCES {s}.customers(id),
             total numeric
         );
         CREATE INDEX orders_customer_id_idx ON {s}.orders USING btree (customer_id);
         INSERT INTO {s}.customers (name) VALUES ('ada'), ('grace');
         INSERT INTO {s}.orders (customer_id, total) VALUES (1, 10), (1, 20), (2, 5);",
    )
    .await;
}

#[tokio::test]
async fn test_orders_table_detail() {
    let Some(mut ctx) = TestContext::new("shop").await else {
        return;
    };
    setup_shop(&mut ctx).await;

    let detail = Introspector::new()
        .get_schema_table(&mut ctx.conn, &ctx.schema, "orders")
        .await
        .unwrap();

    assert!(detail.found());
    assert_eq!(detail.table.schema.as_deref(), Some(ctx.schema.as_str()));

    let names: Vec<&str> = detail.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "customer_id", "total"]);

    let pks = &detail.constraints.primary_keys;
    assert_eq!(pks.len(), 1);
    assert_eq!(pks[0].columns, vec!["id"]);

    let fks = &detail.constraints.foreign_keys;
    assert_eq!(fks.len(), 1);
    assert_eq!(fks[0].columns, vec!["customer_id"]);
    assert_eq!(fks[0].referenced_schema, ctx.schema);
    assert_eq!(fks[0].referenced_table, "customers");
    assert_eq!(fks[0].referenced_columns, vec!["id"]);
    assert_eq!(fks[0].on_update, ReferentialAction::NoAction);
    assert_eq!(fks[0].on_delete, ReferentialAction::NoAction);

    let covering: Vec<_> = detail
        .indexes
        .iter()
        .filter(|i| i.covers(&["customer_id"]))
        .collect();
    assert_eq!(covering.len(), 1);
    assert_eq!(covering[0].index.method, "btree");

    ctx.teardown().await;
}

#[tokio::test]
async fn test_column_ordinals_follow_declaration_order() {
    let Some(mut ctx) = TestContext::new("ordinals").await else {
        return;
    };
    ctx.exec(
        "CREATE TABLE {s}.events (a int, b int, c int, d text);
         ALTER TABLE {s}.events DROP COLUMN b;",
    )
    .await;

    let detail = Introspector::new()
        .get_schema_table(&mut ctx.conn, &ctx.schema, "events")
        .await
        .unwrap();

    let names: Vec<&str> = detail.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a", "c", "d"]);
    assert!(detail
        .columns
        .windows(2)
        .all(|w| w[0].ordinal_position < w[1].ordinal_position));
    assert!(detail.constraints.foreign_keys.is_empty());

    ctx.teardown().await;
}

#[tokio::test]
async fn test_primary_and_foreign_key_tags() {
    let Some(mut ctx) = TestContext::new("tags").await else {
        return;
    };
    ctx.exec(
        "CREATE TABLE {s}.users (id int PRIMARY KEY);
         CREATE TABLE {s}.profiles (
             user_id int PRIMARY KEY REFERENCES {s}.users(id) ON DELETE CASCADE,
             bio text
         );",
    )
    .await;

    let detail = Introspector::new()
        .get_schema_table(&mut ctx.conn, &ctx.schema, "profiles")
        .await
        .unwrap();

    let user_id = detail.column("user_id").unwrap();
    assert!(user_id.constraints.contains(&ColumnConstraint::PrimaryKey));
    assert!(user_id.constraints.contains(&ColumnConstraint::ForeignKey));
    assert_eq!(
        detail.constraints.foreign_keys[0].on_delete,
        ReferentialAction::Cascade
    );
    assert!(detail.column("bio").unwrap().constraints.is_empty());

    ctx.teardown().await;
}

#[tokio::test]
async fn test_database_document_column_tags() {
    let Some(mut ctx) = TestContext::new("dbtags").await else {
        return;
    };
    ctx.exec(
        "CREATE TABLE {s}.users (id int PRIMARY KEY, email text UNIQUE);
         CREATE TABLE {s}.profiles (
             user_id int PRIMARY KEY REFERENCES {s}.users(id) ON DELETE CASCADE,
             bio text,
             avatar text
         );",
    )
    .await;

    let database = Introspector::new().get_database(&mut ctx.conn).await.unwrap();
    let schema = database.schema(&ctx.schema).unwrap();
    let profiles = schema.table("profiles").unwrap();

    let user_id = profiles.column("user_id").unwrap();
    assert!(user_id.constraints.contains(&ColumnConstraint::PrimaryKey));
    assert!(user_id.constraints.contains(&ColumnConstraint::ForeignKey));
    assert!(profiles.column("bio").unwrap().constraints.is_empty());

    assert_eq!(profiles.foreign_keys.len(), 1);
    assert_eq!(profiles.foreign_keys[0].columns, vec!["user_id"]);
    assert_eq!(profiles.foreign_keys[0].referenced_table, "users");

    let ordinals: Vec<i32> = profiles
        .columns
        .iter()
        .map(|c| c.ordinal_position)
        .collect();
    assert_eq!(ordinals, vec![1, 2, 3]);

    let users = schema.table("users").unwrap();
    assert!(users
        .column("email")
        .unwrap()
        .constraints
        .contains(&ColumnConstraint::Unique));
    assert!(users.foreign_keys.is_empty());

    ctx.teardown().await;
}

#[tokio::test]
async fn test_include_columns_are_not_index_keys() {
    let Some(mut ctx) = TestContext::new("incl").await else {
        return;
    };
    setup_shop(&mut ctx).await;
    ctx.exec(
        "CREATE INDEX orders_lower_total_idx ON {s}.orders (lower(total::text), customer_id)
             INCLUDE (id);",
    )
    .await;

    let detail = Introspector::new()
        .get_schema_table(&mut ctx.conn, &ctx.schema, "orders")
        .await
        .unwrap();
    let index = detail
        .indexes
        .iter()
        .find(|i| i.index.name == "orders_lower_total_idx")
        .unwrap();
    assert_eq!(index.index.columns.len(), 2);
    assert_eq!(index.index.columns[1], "customer_id");
    assert_eq!(index.index.include_columns, vec!["id"]);
    assert_eq!(index.expressions.len(), 2);

    let database = Introspector::new().get_database(&mut ctx.conn).await.unwrap();
    let orders = database.schema(&ctx.schema).unwrap().table("orders").unwrap();
    let index = orders
        .indexes
        .iter()
        .find(|i| i.name == "orders_lower_total_idx")
        .unwrap();
    assert_eq!(index.include_columns, vec!["id"]);
    assert!(!index.columns.contains(&"id".to_string()));

    ctx.teardown().await;
}

#[tokio::test]
async fn test_empty_schema_summary() {
    let Some(mut ctx) = TestContext::new("empty").await else {
        return;
    };

    let detail = Introspector::new()
        .get_schema(&mut ctx.conn, &ctx.schema)
        .await
        .unwrap();

    assert!(detail.found());
    assert!(detail.tables.is_empty());
    assert!(detail.materialized_views.is_empty());

    ctx.teardown().await;
}

#[tokio::test]
async fn test_nonexistent_schema_is_not_an_error() {
    let Some(mut ctx) = TestContext::new("missing").await else {
        return;
    };

    let detail = Introspector::new()
        .get_schema(&mut ctx.conn, "nonexistent_schema_for_tests")
        .await
        .unwrap();

    assert!(!detail.found());
    assert!(detail.tables.is_empty());
    assert!(detail.materialized_views.is_empty());
    assert!(detail.extensions.is_empty());

    let table = Introspector::new()
        .get_schema_table(&mut ctx.conn, "nonexistent_schema_for_tests", "nope")
        .await
        .unwrap();
    assert!(!table.found());
    assert!(table.constraints.is_empty());

    ctx.teardown().await;
}

#[tokio::test]
async fn test_system_schemas_are_excluded() {
    let Some(mut ctx) = TestContext::new("sys").await else {
        return;
    };
    // Temporary tables live in a pg_temp_N schema.
    ctx.exec("CREATE TEMP TABLE scratch (id int); CREATE TABLE {s}.visible (id int);")
        .await;

    let introspector = Introspector::new();
    let database = introspector.get_database(&mut ctx.conn).await.unwrap();
    assert!(database
        .schemas
        .iter()
        .all(|s| !s.name.starts_with("pg_") && s.name != "information_schema"));
    let schema = database.schema(&ctx.schema).unwrap();
    assert!(schema.table("visible").is_some());

    let listing = introspector.list_schemas(&mut ctx.conn).await.unwrap();
    assert!(listing.schemas.iter().any(|s| s.name == ctx.schema));
    assert!(listing.schemas.iter().all(|s| !s.name.starts_with("pg_")));

    let system = introspector
        .get_schema(&mut ctx.conn, "pg_catalog")
        .await
        .unwrap();
    assert!(!system.found());

    ctx.teardown().await;
}

#[tokio::test]
async fn test_materialized_view_detail() {
    let Some(mut ctx) = TestContext::new("mv").await else {
        return;
    };
    setup_shop(&mut ctx).await;
    ctx.exec(
        "CREATE MATERIALIZED VIEW {s}.customer_totals AS
             SELECT customer_id, sum(total) AS total FROM {s}.orders GROUP BY customer_id;
         CREATE UNIQUE INDEX customer_totals_customer_id_idx ON {s}.customer_totals (customer_id);
         CREATE MATERIALIZED VIEW {s}.pending AS SELECT 1 AS one WITH NO DATA;",
    )
    .await;

    let introspector = Introspector::new().with_row_counts(RowCountMode::Exact);

    let detail = introspector
        .get_schema_view(&mut ctx.conn, &ctx.schema, "customer_totals")
        .await
        .unwrap();
    assert!(detail.found());
    assert_eq!(detail.materialized_view.is_populated, Some(true));
    assert_eq!(detail.materialized_view.row_count, Some(2));
    assert!(detail.materialized_view.definition.is_some());
    assert_eq!(detail.columns.len(), 2);
    assert_eq!(detail.indexes.len(), 1);
    assert!(detail.indexes[0].index.is_unique);

    let pending = introspector
        .get_schema_view(&mut ctx.conn, &ctx.schema, "pending")
        .await
        .unwrap();
    assert_eq!(pending.materialized_view.is_populated, Some(false));

    let summary = introspector
        .get_schema(&mut ctx.conn, &ctx.schema)
        .await
        .unwrap();
    let views: Vec<&str> = summary
        .materialized_views
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(views, vec!["customer_totals", "pending"]);
    let orders = summary.tables.iter().find(|t| t.name == "orders").unwrap();
    assert_eq!(orders.row_count, 3);

    ctx.teardown().await;
}
