//! Error types for schema loading and DDL generation.

use crate::schema::Cardinality;

/// Errors raised while turning raw input into a [`Schema`](crate::schema::Schema).
#[derive(Debug, thiserror::Error)]
pub enum SchemaParseError {
    /// The document is not valid YAML or not shaped as a mapping of entities.
    #[error("Invalid schema document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An entity or field name cannot be used as a SQL identifier.
    #[error("Invalid identifier '{name}': {reason}")]
    InvalidIdentifier {
        /// The offending name, as written in the schema.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Two entity names collapse to the same name after lowercasing.
    #[error("Entity '{0}' is declared more than once")]
    DuplicateEntity(String),

    /// Two field names of one entity collapse to the same name after lowercasing.
    #[error("Field '{field}' is declared more than once in entity '{entity}'")]
    DuplicateField {
        /// Entity owning the field.
        entity: String,
        /// The duplicated field name.
        field: String,
    },
}

/// Errors raised by the relation builder when the schema contradicts itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaInconsistencyError {
    /// A relation points at an entity that is not declared.
    #[error("Entity '{entity}' declares a relation to unknown entity '{target}'")]
    UnknownEntity {
        /// Entity declaring the relation.
        entity: String,
        /// The missing target.
        target: String,
    },

    /// One side of a pair declares a relation the other side does not.
    #[error("Entity '{entity}' has no relation entry for '{other}'")]
    MissingReciprocal {
        /// Entity lacking the entry.
        entity: String,
        /// Entity it should point at.
        other: String,
    },

    /// The pair of cardinalities matches no supported relation.
    #[error(
        "Conflicting relation between '{entity}' ({relation}) and '{other}' ({reverse})"
    )]
    ConflictingCardinality {
        /// Entity currently being resolved.
        entity: String,
        /// Its declared cardinality towards `other`.
        relation: Cardinality,
        /// The other side of the pair.
        other: String,
        /// The cardinality `other` declares back.
        reverse: Cardinality,
    },

    /// An entity declares a relation to itself.
    #[error("Entity '{0}' declares a relation to itself")]
    SelfRelation(String),

    /// A binding table would share its name with another table.
    #[error("Binding table '{table}' for '{left}' and '{right}' collides with an existing table")]
    TableNameCollision {
        /// The clashing table name.
        table: String,
        /// Left side of the many-to-many pair.
        left: String,
        /// Right side of the many-to-many pair.
        right: String,
    },

    /// A generated column would repeat a column name already in the table.
    #[error("Column '{column}' appears more than once in table '{table}'")]
    ColumnNameCollision {
        /// Table holding both columns.
        table: String,
        /// The clashing column name.
        column: String,
    },
}

/// Top-level error for the generator.
#[derive(Debug, thiserror::Error)]
pub enum DdlError {
    /// The schema could not be loaded.
    #[error(transparent)]
    Parse(#[from] SchemaParseError),

    /// The schema was loaded but its relations do not resolve.
    #[error(transparent)]
    Inconsistent(#[from] SchemaInconsistencyError),

    /// `generate()` was called before any schema was loaded.
    #[error("No schema loaded")]
    NoSchema,

    /// IO error (reading the schema or writing the output).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for generator operations.
pub type Result<T> = std::result::Result<T, DdlError>;
