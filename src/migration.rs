//! Apply the catalogue to the database: DDL for the schema, enum types, tables, foreign keys,
//! indexes and the `updated_at` trigger. Every statement is idempotent so startup can re-run it.
//! Order follows PostgreSQL dependencies: types before tables, tables before constraints.

use crate::catalog::{Audit, Catalog, ColumnDef, TableDef};
use crate::error::AppError;
use crate::sql::{qualified_table, quoted};
use sqlx::PgPool;
use std::collections::HashSet;

/// PostgreSQL truncates identifiers beyond this many bytes.
const MAX_IDENTIFIER_LEN: usize = 63;
const TOUCH_FUNCTION: &str = "touch_updated_at";

fn literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn identifier(name: String) -> String {
    if name.len() <= MAX_IDENTIFIER_LEN {
        return name;
    }
    let mut end = MAX_IDENTIFIER_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

/// Run `body` and swallow the error raised when the object it creates already exists.
fn ignore_duplicate(body: &str) -> String {
    format!("DO $$ BEGIN {}; EXCEPTION WHEN duplicate_object THEN NULL; END $$", body)
}

fn column_ddl(schema: &str, c: &ColumnDef, with_constraints: bool) -> String {
    let mut def = format!("{} {}", quoted(c.name), c.ty.ddl(schema));
    if !c.nullable && (with_constraints || c.default.is_some()) {
        def.push_str(" NOT NULL");
    }
    if let Some(d) = c.default {
        def.push_str(" DEFAULT ");
        def.push_str(d);
    }
    def
}

fn create_table(schema: &str, t: &TableDef) -> String {
    let mut defs: Vec<String> = t
        .all_columns()
        .into_iter()
        .map(|c| {
            if c.name == "id" {
                format!("{} UUID NOT NULL DEFAULT gen_random_uuid()", quoted("id"))
            } else {
                column_ddl(schema, c, true)
            }
        })
        .collect();
    defs.push(format!("PRIMARY KEY ({})", quoted("id")));
    for u in t.unique {
        let name = identifier(format!("{}_{}_key", t.table, u.columns.join("_")));
        let cols: Vec<String> = u.columns.iter().map(|c| quoted(c)).collect();
        defs.push(format!("CONSTRAINT {} UNIQUE ({})", quoted(&name), cols.join(", ")));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        qualified_table(schema, t.table),
        defs.join(",\n  ")
    )
}

/// Index column lists: every foreign key, the declared composites, then the time column.
fn index_columns(t: &TableDef) -> Vec<Vec<&'static str>> {
    let mut out: Vec<Vec<&'static str>> = Vec::new();
    for c in t.columns.iter().filter(|c| c.references.is_some()) {
        out.push(vec![c.name]);
    }
    for idx in t.indexes {
        out.push(idx.to_vec());
    }
    out.push(vec![t.time_column]);
    let mut seen = HashSet::new();
    out.retain(|cols| seen.insert(cols.clone()));
    out
}

/// Every DDL statement for `catalog`, in execution order.
pub fn migration_statements(schema: &str, catalog: &Catalog) -> Vec<String> {
    let mut out = vec![format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema))];

    for e in catalog.enums() {
        let type_name = qualified_table(schema, e.name);
        let values: Vec<String> = e.values.iter().map(|v| literal(v)).collect();
        out.push(ignore_duplicate(&format!("CREATE TYPE {} AS ENUM ({})", type_name, values.join(", "))));
        for v in e.values {
            out.push(format!("ALTER TYPE {} ADD VALUE IF NOT EXISTS {}", type_name, literal(v)));
        }
    }

    out.push(format!(
        "CREATE OR REPLACE FUNCTION {}() RETURNS TRIGGER AS $$ BEGIN NEW.{} = now(); RETURN NEW; END $$ LANGUAGE plpgsql",
        qualified_table(schema, TOUCH_FUNCTION),
        quoted("updated_at")
    ));

    for t in catalog.tables() {
        out.push(create_table(schema, t));
        // Tables created by an older catalogue pick up new columns here.
        for c in t.all_columns().into_iter().filter(|c| c.name != "id") {
            out.push(format!(
                "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {}",
                qualified_table(schema, t.table),
                column_ddl(schema, c, false)
            ));
        }
    }

    for t in catalog.tables() {
        for c in t.columns {
            let Some(fk) = c.references else { continue };
            let name = identifier(format!("{}_{}_fkey", t.table, c.name));
            out.push(ignore_duplicate(&format!(
                "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {}",
                qualified_table(schema, t.table),
                quoted(&name),
                quoted(c.name),
                qualified_table(schema, fk.table),
                quoted("id"),
                fk.on_delete.sql()
            )));
        }
    }

    for t in catalog.tables() {
        for cols in index_columns(t) {
            let name = identifier(format!("idx_{}_{}", t.table, cols.join("_")));
            let list: Vec<String> = cols.iter().map(|c| quoted(c)).collect();
            out.push(format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                quoted(&name),
                qualified_table(schema, t.table),
                list.join(", ")
            ));
        }
    }

    for t in catalog.tables().iter().filter(|t| t.audit == Audit::Mutable) {
        let trigger = quoted(&identifier(format!("trg_{}_updated_at", t.table)));
        let table = qualified_table(schema, t.table);
        out.push(format!("DROP TRIGGER IF EXISTS {} ON {}", trigger, table));
        out.push(format!(
            "CREATE TRIGGER {} BEFORE UPDATE ON {} FOR EACH ROW EXECUTE FUNCTION {}()",
            trigger,
            table,
            qualified_table(schema, TOUCH_FUNCTION)
        ));
    }

    out
}

/// Apply every catalogue statement in order. Stops at the first failure.
pub async fn apply_migrations(pool: &PgPool, schema: &str, catalog: &Catalog) -> Result<(), AppError> {
    catalog.check()?;
    let statements = migration_statements(schema, catalog);
    for sql in &statements {
        tracing::debug!(sql = %sql, "migration");
        sqlx::query(sql).execute(pool).await?;
    }
    tracing::info!(schema, tables = catalog.tables().len(), statements = statements.len(), "migrations applied");
    Ok(())
}
