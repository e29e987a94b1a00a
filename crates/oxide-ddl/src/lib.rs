//! PostgreSQL DDL generation from an entity-relationship schema.
//!
//! `oxide-ddl` reads a YAML document describing entities, their fields and
//! the cardinality each entity declares towards the others, and produces:
//!
//! - one `CREATE TABLE` per entity, with a serial surrogate key and
//!   creation/update timestamps,
//! - a foreign key column and constraint for every many-to-one relation,
//! - a binding table and two constraints for every many-to-many relation,
//! - a before-update trigger per entity refreshing its update timestamp.
//!
//! # Relation resolution
//!
//! Every entity declares `one` or `many` towards each entity it relates to,
//! and the other side must declare the reverse:
//!
//! | entity | other  | result                                      |
//! |--------|--------|---------------------------------------------|
//! | `one`  | `many` | `entity` holds a foreign key to `other`     |
//! | `many` | `many` | binding table `{smaller}_{greater}`         |
//! | `one`  | `one`  | rejected                                    |
//!
//! # Example
//!
//! ```rust
//! use oxide_ddl::prelude::*;
//!
//! let schema = SchemaLoader::parse_yaml(
//!     "Tag:\n  relations:\n    Post: many\nPost:\n  relations:\n    Tag: many\n",
//! )
//! .unwrap();
//!
//! let artifacts = generate(&schema, &GeneratorOptions::default()).unwrap();
//! assert!(artifacts.to_sql().contains("CREATE TABLE \"post_tag\""));
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Structure.yaml -> output.sql
//! oxide-ddl
//!
//! # Explicit paths, print to stdout
//! oxide-ddl schema.yaml -o -
//!
//! # Validate only, requiring every entity to relate to every other
//! oxide-ddl schema.yaml --check --strict
//! ```

pub mod builder;
pub mod dialect;
pub mod error;
pub mod generator;
pub mod loader;
pub mod naming;
pub mod schema;
pub mod statement;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::builder::{build_relations, build_tables, build_triggers};
    pub use crate::dialect::PostgresDialect;
    pub use crate::error::{DdlError, Result, SchemaInconsistencyError, SchemaParseError};
    pub use crate::generator::{
        GeneratedArtifacts, Generator, GeneratorOptions, GeneratorState, generate,
    };
    pub use crate::loader::SchemaLoader;
    pub use crate::schema::{Cardinality, EntityDefinition, Schema};
    pub use crate::statement::{
        Alteration, ColumnDef, ColumnType, CreateTable, ForeignKey, UpdateTrigger,
    };
}
