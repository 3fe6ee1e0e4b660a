//! Catalogue lookup and consistency checks: references, columns named by filters/actions, enum tags.

use super::types::{Assign, ColumnDef, ColumnType, EnumDef, TableDef};
use crate::error::CatalogError;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug)]
pub struct Catalog {
    tables: Vec<&'static TableDef>,
    by_path: HashMap<&'static str, &'static TableDef>,
    by_table: HashMap<&'static str, &'static TableDef>,
}

impl Catalog {
    /// Every construction-site resource the API serves.
    pub fn standard() -> Self {
        let tables: Vec<&'static TableDef> = [
            super::sites::TABLES,
            super::personnel::TABLES,
            super::cameras::TABLES,
            super::detections::TABLES,
            super::alerts::TABLES,
            super::video::TABLES,
            super::navigation::TABLES,
            super::access::TABLES,
            super::models::TABLES,
            super::admin::TABLES,
        ]
        .concat();
        Self::from_tables(&tables)
    }

    pub fn from_tables(tables: &[&'static TableDef]) -> Self {
        Catalog {
            tables: tables.to_vec(),
            by_path: tables.iter().map(|t| (t.path, *t)).collect(),
            by_table: tables.iter().map(|t| (t.table, *t)).collect(),
        }
    }

    pub fn tables(&self) -> &[&'static TableDef] {
        &self.tables
    }

    pub fn by_path(&self, path: &str) -> Option<&'static TableDef> {
        self.by_path.get(path).copied()
    }

    pub fn by_table(&self, table: &str) -> Option<&'static TableDef> {
        self.by_table.get(table).copied()
    }

    /// Distinct enum types in first-use order.
    pub fn enums(&self) -> Vec<&'static EnumDef> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for t in &self.tables {
            for c in t.all_columns() {
                if let Some(e) = c.ty.enum_def() {
                    if seen.insert(e.name) {
                        out.push(e);
                    }
                }
            }
        }
        out
    }

    /// Verify every name the catalogue uses resolves. Run once at startup.
    pub fn check(&self) -> Result<(), CatalogError> {
        let mut paths = HashSet::new();
        let mut tables = HashSet::new();
        for t in &self.tables {
            if !paths.insert(t.path) {
                return Err(CatalogError::DuplicatePath(t.path.to_string()));
            }
            if !tables.insert(t.table) {
                return Err(CatalogError::Validation(format!("duplicate table {}", t.table)));
            }
        }

        let mut enum_values: HashMap<&str, &[&str]> = HashMap::new();
        for t in &self.tables {
            let mut names = HashSet::new();
            for c in t.all_columns() {
                if !names.insert(c.name) {
                    return Err(CatalogError::Validation(format!("{}: duplicate column {}", t.table, c.name)));
                }
                if let Some(fk) = c.references {
                    if !tables.contains(fk.table) {
                        return Err(CatalogError::MissingReference {
                            kind: "table",
                            id: format!("{}.{} -> {}", t.table, c.name, fk.table),
                        });
                    }
                }
                if let Some(e) = c.ty.enum_def() {
                    if let Some(prev) = enum_values.insert(e.name, e.values) {
                        if prev != e.values {
                            return Err(CatalogError::Validation(format!("enum {} declared twice with different tags", e.name)));
                        }
                    }
                }
            }
            check_table(t)?;
        }
        Ok(())
    }
}

fn check_table(t: &TableDef) -> Result<(), CatalogError> {
    let time = column(t, t.time_column)?;
    if !matches!(time.ty, ColumnType::Timestamp | ColumnType::Date) {
        return Err(CatalogError::Validation(format!("{}: time column {} is not temporal", t.table, time.name)));
    }
    for f in t.filters {
        column(t, f)?;
    }
    for u in t.unique {
        for c in u.columns {
            column(t, c)?;
        }
    }
    for idx in t.indexes {
        for c in *idx {
            column(t, c)?;
        }
    }
    if let Some(name) = t.caller_column {
        if !matches!(column(t, name)?.ty, ColumnType::Uuid) {
            return Err(CatalogError::Validation(format!("{}: caller column {} is not a uuid", t.table, name)));
        }
    }
    for span in t.spans {
        let (start, end) = (column(t, span.start)?, column(t, span.end)?);
        if std::mem::discriminant(&start.ty) != std::mem::discriminant(&end.ty) {
            return Err(CatalogError::Validation(format!(
                "{}: span {}..{} mixes column types",
                t.table, span.start, span.end
            )));
        }
    }
    for stamp in t.stamps {
        check_tags(t, column(t, stamp.column)?, stamp.values)?;
        if !matches!(column(t, stamp.sets)?.ty, ColumnType::Timestamp) {
            return Err(CatalogError::Validation(format!("{}: stamp target {} is not a timestamp", t.table, stamp.sets)));
        }
    }
    for th in t.thresholds {
        if !is_numeric(column(t, th.when)?) {
            return Err(CatalogError::Validation(format!("{}: threshold on non-numeric {}", t.table, th.when)));
        }
        check_tags(t, column(t, th.column)?, &[th.value])?;
    }
    for action in t.actions {
        for p in action.params {
            if !column(t, p.column)?.is_writable() {
                return Err(CatalogError::Validation(format!(
                    "{}: action {} writes read-only {}",
                    t.table, action.name, p.column
                )));
            }
        }
        for (name, assign) in action.assigns {
            let c = column(t, name)?;
            match assign {
                Assign::Tag(v) => check_tags(t, c, &[*v])?,
                Assign::Flag(_) if !matches!(c.ty, ColumnType::Bool) => {
                    return Err(CatalogError::Validation(format!("{}: flag assigned to {}", t.table, name)));
                }
                Assign::Now if !matches!(c.ty, ColumnType::Timestamp) => {
                    return Err(CatalogError::Validation(format!("{}: time assigned to {}", t.table, name)));
                }
                Assign::Caller if !matches!(c.ty, ColumnType::Uuid) => {
                    return Err(CatalogError::Validation(format!("{}: caller assigned to {}", t.table, name)));
                }
                _ => {}
            }
        }
    }
    if let Some(summary) = t.summary {
        for g in summary.group_by {
            let c = column(t, g)?;
            if !matches!(c.ty, ColumnType::Enum(_) | ColumnType::Bool | ColumnType::Text) {
                return Err(CatalogError::Validation(format!("{}: cannot group by {}", t.table, g)));
            }
        }
        for a in summary.averages {
            if !is_numeric(column(t, a)?) {
                return Err(CatalogError::Validation(format!("{}: cannot average {}", t.table, a)));
            }
        }
    }
    Ok(())
}

fn column(t: &TableDef, name: &str) -> Result<&'static ColumnDef, CatalogError> {
    t.column(name).ok_or_else(|| CatalogError::MissingReference {
        kind: "column",
        id: format!("{}.{}", t.table, name),
    })
}

fn check_tags(t: &TableDef, c: &ColumnDef, values: &[&str]) -> Result<(), CatalogError> {
    let Some(def) = c.ty.enum_def() else {
        return Err(CatalogError::Validation(format!("{}: {} is not an enum column", t.table, c.name)));
    };
    match values.iter().find(|v| !def.contains(v)) {
        Some(v) => Err(CatalogError::Validation(format!("{}: '{}' is not a {} tag", t.table, v, def.name))),
        None => Ok(()),
    }
}

fn is_numeric(c: &ColumnDef) -> bool {
    matches!(c.ty, ColumnType::Int | ColumnType::BigInt | ColumnType::Decimal(..))
}
