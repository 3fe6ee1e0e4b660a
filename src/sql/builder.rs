//! Builds parameterized SELECT, INSERT, UPDATE, DELETE, COUNT and aggregate queries from a
//! catalogue table. Identifiers come from the catalogue only; values are always parameters.

use super::params::SqlValue;
use crate::catalog::{ColumnDef, TableDef};
use uuid::Uuid;

/// Quote identifier for PostgreSQL (safe: only from catalogue).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a value and return its placeholder, cast to the column's storage type when needed.
    fn push(&mut self, schema: &str, column: &ColumnDef, value: SqlValue) -> String {
        self.params.push(value);
        let n = self.params.len();
        match column.ty.bind_cast(schema) {
            Some(cast) => format!("${}::{}", n, cast),
            None => format!("${}", n),
        }
    }

    fn push_id(&mut self, id: Uuid) -> String {
        self.params.push(SqlValue::Uuid(Some(id)));
        format!("${}", self.params.len())
    }
}

/// Row filter shared by list, count and aggregate queries. Bounds apply to the table's time column.
#[derive(Clone, Debug, Default)]
pub struct Conditions {
    pub eq: Vec<(&'static ColumnDef, SqlValue)>,
    /// Inclusive lower bound.
    pub since: Option<SqlValue>,
    /// Exclusive upper bound.
    pub before: Option<SqlValue>,
}

impl Conditions {
    pub fn eq(mut self, column: &'static ColumnDef, value: SqlValue) -> Self {
        self.eq.push((column, value));
        self
    }

    pub fn since(mut self, value: SqlValue) -> Self {
        self.since = Some(value);
        self
    }
}

/// Offset pagination; both values are validated before they get here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Page { skip: 0, limit: 100 }
    }
}

/// Visible columns; enums come back as text and decimals as float8.
fn select_column_list(t: &TableDef) -> String {
    t.visible_columns()
        .iter()
        .map(|c| {
            let q = quoted(c.name);
            match c.ty.select_cast() {
                Some(cast) => format!("{}::{} AS {}", q, cast, q),
                None => q,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn where_clause(q: &mut QueryBuf, schema: &str, t: &TableDef, conditions: &Conditions) -> String {
    let mut parts = Vec::new();
    for (column, value) in &conditions.eq {
        if value.is_null() {
            parts.push(format!("{} IS NULL", quoted(column.name)));
        } else {
            let ph = q.push(schema, column, value.clone());
            parts.push(format!("{} = {}", quoted(column.name), ph));
        }
    }
    if let Some(time) = t.column(t.time_column) {
        if let Some(v) = &conditions.since {
            let ph = q.push(schema, time, v.clone());
            parts.push(format!("{} >= {}", quoted(time.name), ph));
        }
        if let Some(v) = &conditions.before {
            let ph = q.push(schema, time, v.clone());
            parts.push(format!("{} < {}", quoted(time.name), ph));
        }
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

/// SELECT by primary key. Caller binds nothing further.
pub fn select_by_id(schema: &str, t: &TableDef, id: Uuid) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_id(id);
    q.sql = format!(
        "SELECT {} FROM {} WHERE \"id\" = {}",
        select_column_list(t),
        qualified_table(schema, t.table),
        ph
    );
    q
}

/// SELECT list: AND-combined filters, newest first on the time column, `id` as tie-breaker.
pub fn select_list(schema: &str, t: &TableDef, conditions: &Conditions, page: Page) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, schema, t, conditions);
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {} DESC NULLS LAST, \"id\" ASC LIMIT {} OFFSET {}",
        select_column_list(t),
        qualified_table(schema, t.table),
        where_sql,
        quoted(t.time_column),
        page.limit,
        page.skip
    );
    q
}

/// INSERT with an application-generated id; omitted columns take their store default.
pub fn insert(schema: &str, t: &TableDef, id: Uuid, values: &[(&'static ColumnDef, SqlValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = vec![quoted("id")];
    let mut placeholders = vec![q.push_id(id)];
    for (column, value) in values {
        cols.push(quoted(column.name));
        placeholders.push(q.push(schema, column, value.clone()));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        qualified_table(schema, t.table),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(t)
    );
    q
}

/// UPDATE by id, setting only the supplied columns. `updated_at` is left to the store trigger.
/// With nothing to set this degrades to a SELECT so callers still get the row back.
pub fn update(schema: &str, t: &TableDef, id: Uuid, values: &[(&'static ColumnDef, SqlValue)]) -> QueryBuf {
    if values.is_empty() {
        return select_by_id(schema, t, id);
    }
    let mut q = QueryBuf::new();
    let sets: Vec<String> = values
        .iter()
        .map(|(column, value)| format!("{} = {}", quoted(column.name), q.push(schema, column, value.clone())))
        .collect();
    let id_ph = q.push_id(id);
    q.sql = format!(
        "UPDATE {} SET {} WHERE \"id\" = {} RETURNING {}",
        qualified_table(schema, t.table),
        sets.join(", "),
        id_ph,
        select_column_list(t)
    );
    q
}

pub fn delete(schema: &str, t: &TableDef, id: Uuid) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_id(id);
    q.sql = format!("DELETE FROM {} WHERE \"id\" = {} RETURNING \"id\"", qualified_table(schema, t.table), ph);
    q
}

/// `total` plus `avg_<col>` for each average column, over the filtered rows.
pub fn aggregate(schema: &str, t: &TableDef, conditions: &Conditions, averages: &[&str]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, schema, t, conditions);
    let mut select = vec!["COUNT(*) AS \"total\"".to_string()];
    for a in averages {
        select.push(format!("AVG({})::float8 AS {}", quoted(a), quoted(&format!("avg_{}", a))));
    }
    q.sql = format!("SELECT {} FROM {}{}", select.join(", "), qualified_table(schema, t.table), where_sql);
    q
}

/// Row counts per distinct value of `column` (as text; NULL groups are dropped).
pub fn group_counts(schema: &str, t: &TableDef, conditions: &Conditions, column: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_sql = where_clause(&mut q, schema, t, conditions);
    let not_null = format!("{} IS NOT NULL", quoted(column));
    if where_sql.is_empty() {
        where_sql = format!(" WHERE {}", not_null);
    } else {
        where_sql.push_str(&format!(" AND {}", not_null));
    }
    q.sql = format!(
        "SELECT {col}::text AS \"key\", COUNT(*) AS \"count\" FROM {}{} GROUP BY {col} ORDER BY {col}",
        qualified_table(schema, t.table),
        where_sql,
        col = quoted(column)
    );
    q
}

/// `SELECT EXISTS(...)` over equality matches, optionally excluding one row (the row being updated).
pub fn exists(schema: &str, t: &TableDef, matches: &[(&'static ColumnDef, SqlValue)], exclude: Option<Uuid>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut parts: Vec<String> = matches
        .iter()
        .map(|(column, value)| format!("{} = {}", quoted(column.name), q.push(schema, column, value.clone())))
        .collect();
    if let Some(id) = exclude {
        let ph = q.push_id(id);
        parts.push(format!("\"id\" <> {}", ph));
    }
    let where_sql = if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {}{}) AS \"exists\"",
        qualified_table(schema, t.table),
        where_sql
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::alerts::ALERTS;
    use crate::catalog::enums::{AlertPriority, AlertStatus};
    use crate::catalog::personnel::USERS;
    use crate::catalog::sites::SITES;

    fn col(t: &TableDef, name: &str) -> &'static ColumnDef {
        t.column(name).unwrap()
    }

    #[test]
    fn test_select_list_filters_orders_and_pages() {
        let conditions = Conditions::default()
            .eq(col(&ALERTS, "priority"), SqlValue::text(AlertPriority::Critical.as_str()))
            .eq(col(&ALERTS, "status"), SqlValue::text(AlertStatus::Open.as_str()));
        let q = select_list("sw", &ALERTS, &conditions, Page { skip: 20, limit: 10 });
        assert!(q.sql.starts_with("SELECT \"id\", "));
        assert!(q.sql.contains("\"priority\"::text AS \"priority\""));
        assert!(q.sql.contains(
            " FROM \"sw\".\"alerts\" WHERE \"priority\" = $1::\"sw\".\"alert_priority\" AND \"status\" = $2::\"sw\".\"alert_status\""
        ));
        assert!(q.sql.ends_with("ORDER BY \"triggered_at\" DESC NULLS LAST, \"id\" ASC LIMIT 10 OFFSET 20"));
        assert_eq!(q.params.len(), 2);
    }

    #[test]
    fn test_time_bounds_bind_on_time_column() {
        let conditions = Conditions {
            since: Some(SqlValue::now()),
            before: Some(SqlValue::now()),
            ..Conditions::default()
        };
        let q = select_list("sw", &SITES, &conditions, Page::default());
        assert!(q.sql.contains("WHERE \"created_at\" >= $1 AND \"created_at\" < $2"));
        assert!(q.sql.contains("LIMIT 100 OFFSET 0"));
    }

    #[test]
    fn test_null_filter_uses_is_null() {
        let conditions = Conditions::default().eq(col(&SITES, "project_manager_id"), SqlValue::Uuid(None));
        let q = select_list("sw", &SITES, &conditions, Page::default());
        assert!(q.sql.contains("WHERE \"project_manager_id\" IS NULL"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn test_write_only_columns_are_never_selected() {
        let q = select_by_id("sw", &USERS, Uuid::new_v4());
        assert!(!q.sql.contains("password_hash"));
        assert!(q.sql.contains("\"email\""));
        assert!(q.sql.ends_with("WHERE \"id\" = $1"));
    }

    #[test]
    fn test_insert_casts_decimal_and_enum() {
        let values = vec![
            (col(&SITES, "name"), SqlValue::text("Site A")),
            (col(&SITES, "budget"), SqlValue::Float(Some(1200.5))),
            (col(&SITES, "status"), SqlValue::text("active")),
        ];
        let q = insert("sw", &SITES, Uuid::new_v4(), &values);
        assert!(q
            .sql
            .starts_with("INSERT INTO \"sw\".\"sites\" (\"id\", \"name\", \"budget\", \"status\") VALUES ($1, $2, $3::numeric, $4::\"sw\".\"site_status\") RETURNING "));
        assert!(q.sql.contains("\"budget\"::float8 AS \"budget\""));
        assert_eq!(q.params.len(), 4);
    }

    #[test]
    fn test_update_binds_id_last() {
        let id = Uuid::new_v4();
        let values = vec![(col(&SITES, "name"), SqlValue::text("Renamed"))];
        let q = update("sw", &SITES, id, &values);
        assert!(q.sql.starts_with("UPDATE \"sw\".\"sites\" SET \"name\" = $1 WHERE \"id\" = $2 RETURNING "));
        assert_eq!(q.params.last(), Some(&SqlValue::Uuid(Some(id))));
        assert!(!q.sql.contains("updated_at\" ="));
    }

    #[test]
    fn test_empty_update_is_a_select() {
        let q = update("sw", &SITES, Uuid::new_v4(), &[]);
        assert!(q.sql.starts_with("SELECT "));
    }

    #[test]
    fn test_aggregates() {
        let q = aggregate("sw", &SITES, &Conditions::default(), &["budget"]);
        assert_eq!(
            q.sql,
            "SELECT COUNT(*) AS \"total\", AVG(\"budget\")::float8 AS \"avg_budget\" FROM \"sw\".\"sites\""
        );
        let q = group_counts("sw", &SITES, &Conditions::default(), "status");
        assert_eq!(
            q.sql,
            "SELECT \"status\"::text AS \"key\", COUNT(*) AS \"count\" FROM \"sw\".\"sites\" WHERE \"status\" IS NOT NULL GROUP BY \"status\" ORDER BY \"status\""
        );
    }

    #[test]
    fn test_exists_excludes_current_row() {
        let id = Uuid::new_v4();
        let q = exists("sw", &SITES, &[(col(&SITES, "code"), SqlValue::text("SA-001"))], Some(id));
        assert_eq!(
            q.sql,
            "SELECT EXISTS(SELECT 1 FROM \"sw\".\"sites\" WHERE \"code\" = $1 AND \"id\" <> $2) AS \"exists\""
        );
    }
}
