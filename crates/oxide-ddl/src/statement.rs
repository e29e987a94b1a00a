//! Typed DDL statements.
//!
//! The builders produce these values instead of SQL text. They are ordered
//! and hashable so that a `BTreeSet` of them both drops duplicates and yields
//! a stable output order; [`PostgresDialect`](crate::dialect::PostgresDialect)
//! turns them into SQL.

/// Column data type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnType {
    /// Auto-incrementing integer.
    Serial,
    /// 32-bit integer.
    Integer,
    /// Timestamp without time zone.
    Timestamp,
    /// Type token copied verbatim from the schema.
    Custom(String),
}

impl ColumnType {
    /// Returns the SQL spelling of this type.
    #[must_use]
    pub fn as_sql(&self) -> &str {
        match self {
            Self::Serial => "SERIAL",
            Self::Integer => "INTEGER",
            Self::Timestamp => "TIMESTAMP",
            Self::Custom(token) => token,
        }
    }
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Data type.
    pub column_type: ColumnType,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Whether this column alone is the primary key.
    pub primary_key: bool,
    /// Default value as a SQL expression.
    pub default: Option<String>,
}

impl ColumnDef {
    /// Creates a nullable column.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            primary_key: false,
            default: None,
        }
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the column as the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Sets the default expression.
    #[must_use]
    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }
}

/// `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CreateTable {
    /// Table name.
    pub name: String,
    /// Column definitions, in output order.
    pub columns: Vec<ColumnDef>,
    /// Composite primary key columns. Empty when a column carries the key.
    pub primary_key: Vec<String>,
}

impl CreateTable {
    /// Creates a table with no columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets a composite primary key.
    #[must_use]
    pub fn composite_key(mut self, columns: Vec<String>) -> Self {
        self.primary_key = columns;
        self
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A named foreign key constraint over a single column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForeignKey {
    /// Referencing table.
    pub table: String,
    /// Constraint name.
    pub name: String,
    /// Referencing column.
    pub column: String,
    /// Referenced table.
    pub references_table: String,
    /// Referenced column.
    pub references_column: String,
}

/// `ALTER TABLE` statements.
///
/// Variant order matters: every column addition sorts before every
/// constraint, so a constraint never precedes the column it covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Alteration {
    /// Add a column to an existing table.
    AddColumn {
        /// Table name.
        table: String,
        /// Column definition.
        column: ColumnDef,
    },
    /// Add a foreign key constraint.
    AddForeignKey(ForeignKey),
}

impl Alteration {
    /// Table this statement alters.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::AddColumn { table, .. } => table,
            Self::AddForeignKey(fk) => &fk.table,
        }
    }
}

/// Trigger refreshing a timestamp column before every row update.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UpdateTrigger {
    /// Table the trigger is attached to.
    pub table: String,
    /// Timestamp column to refresh.
    pub column: String,
    /// Name of the trigger function.
    pub function: String,
    /// Name of the trigger.
    pub trigger: String,
}
