//! Declarative resource types: one `TableDef` per table, built in const context.

/// Closed set of string tags backing a PostgreSQL enum type.
#[derive(Clone, Copy, Debug)]
pub struct EnumDef {
    pub name: &'static str,
    pub values: &'static [&'static str],
}

impl EnumDef {
    pub fn contains(&self, tag: &str) -> bool {
        self.values.iter().any(|v| *v == tag)
    }
}

#[derive(Clone, Copy, Debug)]
pub enum ColumnType {
    Uuid,
    Text,
    Int,
    BigInt,
    /// NUMERIC(precision, scale); surfaced to clients as a JSON number.
    Decimal(u8, u8),
    Bool,
    Timestamp,
    Date,
    /// Opaque JSON payload, stored and served verbatim.
    Json,
    Enum(&'static EnumDef),
}

impl ColumnType {
    /// DDL type name. Enum types are schema-qualified.
    pub fn ddl(&self, schema: &str) -> String {
        match self {
            ColumnType::Uuid => "UUID".into(),
            ColumnType::Text => "TEXT".into(),
            ColumnType::Int => "INTEGER".into(),
            ColumnType::BigInt => "BIGINT".into(),
            ColumnType::Decimal(p, s) => format!("NUMERIC({}, {})", p, s),
            ColumnType::Bool => "BOOLEAN".into(),
            ColumnType::Timestamp => "TIMESTAMPTZ".into(),
            ColumnType::Date => "DATE".into(),
            ColumnType::Json => "JSONB".into(),
            ColumnType::Enum(e) => qualified_type(schema, e.name),
        }
    }

    /// Cast applied to a bound parameter so the driver's wire type lands in the column type.
    pub fn bind_cast(&self, schema: &str) -> Option<String> {
        match self {
            ColumnType::Decimal(..) => Some("numeric".into()),
            ColumnType::Enum(e) => Some(qualified_type(schema, e.name)),
            _ => None,
        }
    }

    /// Cast applied in SELECT lists so rows decode into plain Rust types.
    pub fn select_cast(&self) -> Option<&'static str> {
        match self {
            ColumnType::Decimal(..) => Some("float8"),
            ColumnType::Enum(_) => Some("text"),
            _ => None,
        }
    }

    pub fn enum_def(&self) -> Option<&'static EnumDef> {
        match self {
            ColumnType::Enum(e) => Some(*e),
            _ => None,
        }
    }
}

fn qualified_type(schema: &str, name: &str) -> String {
    format!("\"{}\".\"{}\"", schema, name)
}

/// Whether clients may write a column, read it, or both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    /// Server-managed (identity, audit timestamps, computed fields).
    ReadOnly,
    /// Accepted on create/update, never returned (secrets).
    WriteOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnDelete {
    NoAction,
    Cascade,
    SetNull,
}

impl OnDelete {
    pub fn sql(&self) -> &'static str {
        match self {
            OnDelete::NoAction => "NO ACTION",
            OnDelete::Cascade => "CASCADE",
            OnDelete::SetNull => "SET NULL",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ForeignKey {
    pub table: &'static str,
    pub on_delete: OnDelete,
}

/// Extra shape checks for text columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Any,
    Email,
    Url,
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
    /// SQL default expression applied by the store when the insert omits the column.
    pub default: Option<&'static str>,
    pub references: Option<ForeignKey>,
    pub access: Access,
    pub format: Format,
}

impl ColumnDef {
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        ColumnDef {
            name,
            ty,
            nullable: true,
            default: None,
            references: None,
            access: Access::ReadWrite,
            format: Format::Any,
        }
    }

    pub const fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub const fn default(mut self, expression: &'static str) -> Self {
        self.default = Some(expression);
        self
    }

    pub const fn references(mut self, table: &'static str) -> Self {
        self.references = Some(ForeignKey {
            table,
            on_delete: OnDelete::NoAction,
        });
        self
    }

    /// Reference to a parent row; deleting the parent deletes this row.
    pub const fn owned_by(mut self, table: &'static str) -> Self {
        self.references = Some(ForeignKey {
            table,
            on_delete: OnDelete::Cascade,
        });
        self
    }

    /// Optional reference cleared when the target row is deleted.
    pub const fn weak_ref(mut self, table: &'static str) -> Self {
        self.references = Some(ForeignKey {
            table,
            on_delete: OnDelete::SetNull,
        });
        self
    }

    pub const fn read_only(mut self) -> Self {
        self.access = Access::ReadOnly;
        self
    }

    pub const fn write_only(mut self) -> Self {
        self.access = Access::WriteOnly;
        self
    }

    pub const fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn is_writable(&self) -> bool {
        self.access != Access::ReadOnly
    }

    pub fn is_visible(&self) -> bool {
        self.access != Access::WriteOnly
    }

    /// Must a create payload carry this column?
    pub fn required_on_create(&self) -> bool {
        self.is_writable() && !self.nullable && self.default.is_none()
    }
}

pub const fn uuid(name: &'static str) -> ColumnDef {
    ColumnDef::new(name, ColumnType::Uuid)
}

pub const fn text(name: &'static str) -> ColumnDef {
    ColumnDef::new(name, ColumnType::Text)
}

pub const fn int(name: &'static str) -> ColumnDef {
    ColumnDef::new(name, ColumnType::Int)
}

pub const fn bigint(name: &'static str) -> ColumnDef {
    ColumnDef::new(name, ColumnType::BigInt)
}

pub const fn decimal(name: &'static str, precision: u8, scale: u8) -> ColumnDef {
    ColumnDef::new(name, ColumnType::Decimal(precision, scale))
}

pub const fn boolean(name: &'static str) -> ColumnDef {
    ColumnDef::new(name, ColumnType::Bool)
}

pub const fn timestamp(name: &'static str) -> ColumnDef {
    ColumnDef::new(name, ColumnType::Timestamp)
}

pub const fn date(name: &'static str) -> ColumnDef {
    ColumnDef::new(name, ColumnType::Date)
}

pub const fn json(name: &'static str) -> ColumnDef {
    ColumnDef::new(name, ColumnType::Json)
}

pub const fn tag(name: &'static str, def: &'static EnumDef) -> ColumnDef {
    ColumnDef::new(name, ColumnType::Enum(def))
}

/// Implicit identity column present on every table.
pub static ID: ColumnDef = uuid("id").required().read_only();
pub static CREATED_AT: ColumnDef = timestamp("created_at").required().default("now()").read_only();
pub static UPDATED_AT: ColumnDef = timestamp("updated_at").required().default("now()").read_only();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Audit {
    /// `created_at` + trigger-maintained `updated_at`.
    Mutable,
    /// `created_at` only (logs, time series).
    AppendOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ops {
    pub list: bool,
    pub get: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl Ops {
    pub const ALL: Ops = Ops {
        list: true,
        get: true,
        create: true,
        update: true,
        delete: true,
    };
    pub const NO_DELETE: Ops = Ops {
        delete: false,
        ..Ops::ALL
    };
    pub const READ_CREATE: Ops = Ops {
        update: false,
        delete: false,
        ..Ops::ALL
    };
}

/// Columns whose combined value must be unique; `message` is the 400 detail on conflict.
#[derive(Clone, Copy, Debug)]
pub struct UniqueKey {
    pub columns: &'static [&'static str],
    pub message: &'static str,
}

/// `start` must precede `end` (or equal it when `strict` is false) whenever both are known.
#[derive(Clone, Copy, Debug)]
pub struct Span {
    pub start: &'static str,
    pub end: &'static str,
    pub strict: bool,
}

/// When `column` is written with one of `values`, `sets` is stamped with the current time
/// unless the same write supplies it.
#[derive(Clone, Copy, Debug)]
pub struct Stamp {
    pub column: &'static str,
    pub values: &'static [&'static str],
    pub sets: &'static str,
}

/// When numeric `when` is written with a value >= `at_least`, `column` is set to `value`.
#[derive(Clone, Copy, Debug)]
pub struct Threshold {
    pub when: &'static str,
    pub at_least: f64,
    pub column: &'static str,
    pub value: &'static str,
}

/// Value assigned by an action regardless of query parameters.
#[derive(Clone, Copy, Debug)]
pub enum Assign {
    Tag(&'static str),
    Flag(bool),
    Now,
    Caller,
}

#[derive(Clone, Copy, Debug)]
pub struct ActionParam {
    /// Query parameter name.
    pub name: &'static str,
    pub column: &'static str,
    pub required: bool,
}

/// Single-purpose update exposed as `PUT /{path}/{id}/{name}`.
#[derive(Clone, Copy, Debug)]
pub struct ActionDef {
    pub name: &'static str,
    pub params: &'static [ActionParam],
    pub assigns: &'static [(&'static str, Assign)],
}

#[derive(Clone, Copy, Debug)]
pub struct SummaryDef {
    pub group_by: &'static [&'static str],
    pub averages: &'static [&'static str],
}

#[derive(Debug)]
pub struct TableDef {
    pub table: &'static str,
    /// URL segment under the API prefix.
    pub path: &'static str,
    /// Human label used in messages ("Site not found").
    pub label: &'static str,
    pub columns: &'static [ColumnDef],
    pub audit: Audit,
    /// Timestamp or date column used for ordering and date-range filters.
    pub time_column: &'static str,
    /// Columns accepted as equality filters on list and summary.
    pub filters: &'static [&'static str],
    pub unique: &'static [UniqueKey],
    /// Composite secondary indexes; single foreign-key columns are indexed implicitly.
    pub indexes: &'static [&'static [&'static str]],
    pub ops: Ops,
    /// Column filled from the request's caller when a create payload omits it.
    pub caller_column: Option<&'static str>,
    pub spans: &'static [Span],
    pub stamps: &'static [Stamp],
    pub thresholds: &'static [Threshold],
    pub actions: &'static [ActionDef],
    pub summary: Option<SummaryDef>,
}

impl TableDef {
    pub const BASE: TableDef = TableDef {
        table: "",
        path: "",
        label: "",
        columns: &[],
        audit: Audit::Mutable,
        time_column: "created_at",
        filters: &[],
        unique: &[],
        indexes: &[],
        ops: Ops::ALL,
        caller_column: None,
        spans: &[],
        stamps: &[],
        thresholds: &[],
        actions: &[],
        summary: None,
    };

    /// Every column in storage order: id, declared columns, audit timestamps.
    pub fn all_columns(&self) -> Vec<&'static ColumnDef> {
        let declared: &'static [ColumnDef] = self.columns;
        let mut out = Vec::with_capacity(declared.len() + 3);
        out.push(&ID);
        out.extend(declared.iter());
        out.push(&CREATED_AT);
        if self.audit == Audit::Mutable {
            out.push(&UPDATED_AT);
        }
        out
    }

    pub fn visible_columns(&self) -> Vec<&'static ColumnDef> {
        self.all_columns().into_iter().filter(|c| c.is_visible()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.all_columns().into_iter().find(|c| c.name == name)
    }

    pub fn action(&self, name: &str) -> Option<&'static ActionDef> {
        let actions: &'static [ActionDef] = self.actions;
        actions.iter().find(|a| a.name == name)
    }

    pub fn not_found_message(&self) -> String {
        format!("{} not found", self.label)
    }
}
