//! Generation facade.
//!
//! [`generate`] is the stateless entry point: schema in, statement sets out.
//! [`Generator`] wraps it for callers that load, build and dump in separate
//! steps and reuse one instance across several schema files.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::builder::{build_relations, build_tables, build_triggers};
use crate::dialect::PostgresDialect;
use crate::error::{DdlError, Result, SchemaInconsistencyError};
use crate::loader::SchemaLoader;
use crate::schema::Schema;
use crate::statement::{Alteration, CreateTable, UpdateTrigger};

/// Options for relation resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Require every entity to declare a relation to every other entity.
    ///
    /// Off by default: a pair where neither side declares a relation is
    /// treated as unrelated, while a one-sided declaration is still a
    /// [`MissingReciprocal`](SchemaInconsistencyError::MissingReciprocal).
    /// When set, any missing entry in the full mesh is a lookup failure
    /// reported as `MissingReciprocal` rather than being silently skipped.
    pub strict: bool,
}

/// The statement sets produced from a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    /// Entity tables and binding tables.
    pub tables: BTreeSet<CreateTable>,
    /// Foreign key columns and constraints.
    pub alterations: BTreeSet<Alteration>,
    /// Update-timestamp triggers.
    pub triggers: BTreeSet<UpdateTrigger>,
}

impl GeneratedArtifacts {
    /// Creates empty artifacts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no statement has been produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.alterations.is_empty() && self.triggers.is_empty()
    }

    /// Empties all three sets.
    pub fn clear(&mut self) {
        self.tables.clear();
        self.alterations.clear();
        self.triggers.clear();
    }

    /// Runs the table builder into these artifacts.
    pub fn add_tables(&mut self, schema: &Schema) {
        self.tables.extend(build_tables(schema));
    }

    /// Runs the relation builder into these artifacts.
    ///
    /// Nothing is added when the schema is inconsistent.
    pub fn add_relations(
        &mut self,
        schema: &Schema,
        options: &GeneratorOptions,
    ) -> std::result::Result<(), SchemaInconsistencyError> {
        let relations = build_relations(schema, options)?;
        self.tables.extend(relations.binding_tables);
        self.alterations.extend(relations.alterations);
        Ok(())
    }

    /// Runs the trigger builder into these artifacts.
    pub fn add_triggers(&mut self, schema: &Schema) {
        self.triggers.extend(build_triggers(schema));
    }

    /// Renders every statement, without terminators: tables, then
    /// alterations, then triggers.
    #[must_use]
    pub fn statements(&self, dialect: &PostgresDialect) -> Vec<String> {
        let mut statements: Vec<String> = self
            .tables
            .iter()
            .map(|table| dialect.create_table(table))
            .collect();
        statements.extend(self.alterations.iter().map(|a| dialect.alteration(a)));
        statements.extend(
            self.triggers
                .iter()
                .flat_map(|trigger| dialect.update_trigger(trigger)),
        );
        statements
    }

    /// Writes the DDL script: every statement ends with `;` and a blank line.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> std::io::Result<()> {
        for statement in self.statements(&PostgresDialect::new()) {
            write!(sink, "{statement};\n\n")?;
        }
        sink.flush()
    }

    /// Returns the DDL script as a string.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.statements(&PostgresDialect::new())
            .into_iter()
            .map(|statement| format!("{statement};\n\n"))
            .collect()
    }
}

/// Builds tables, relations and triggers for `schema` in a fresh context.
pub fn generate(
    schema: &Schema,
    options: &GeneratorOptions,
) -> std::result::Result<GeneratedArtifacts, SchemaInconsistencyError> {
    let mut artifacts = GeneratedArtifacts::new();
    artifacts.add_tables(schema);
    artifacts.add_relations(schema, options)?;
    artifacts.add_triggers(schema);
    Ok(artifacts)
}

/// Lifecycle of a [`Generator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// No schema loaded.
    Empty,
    /// A schema is loaded; nothing built from it yet.
    Loaded,
    /// Statements have been built from the loaded schema.
    Built,
    /// Statements have been written out.
    Dumped,
}

/// Stateful generator: load, generate, dump, and optionally clear for reuse.
#[derive(Debug)]
pub struct Generator {
    options: GeneratorOptions,
    schema: Option<Schema>,
    artifacts: GeneratedArtifacts,
    state: GeneratorState,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Creates an empty generator with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(GeneratorOptions::default())
    }

    /// Creates an empty generator.
    #[must_use]
    pub fn with_options(options: GeneratorOptions) -> Self {
        Self {
            options,
            schema: None,
            artifacts: GeneratedArtifacts::new(),
            state: GeneratorState::Empty,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// The loaded schema, if any.
    #[must_use]
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Statements accumulated so far.
    #[must_use]
    pub fn artifacts(&self) -> &GeneratedArtifacts {
        &self.artifacts
    }

    /// Parses a YAML schema and makes it the current schema.
    ///
    /// Accumulated statements are kept; call [`clear`](Self::clear) first to
    /// start over.
    pub fn load(&mut self, source: &str) -> Result<()> {
        let schema = SchemaLoader::parse_yaml(source)?;
        self.set_schema(schema);
        Ok(())
    }

    /// Reads a YAML schema file and makes it the current schema.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let schema = SchemaLoader::load_file(path)?;
        self.set_schema(schema);
        Ok(())
    }

    /// Makes an already built schema the current schema.
    pub fn set_schema(&mut self, schema: Schema) {
        debug!(entities = schema.len(), "Schema loaded");
        self.schema = Some(schema);
        self.state = GeneratorState::Loaded;
    }

    /// Builds tables, relations and triggers from the current schema.
    ///
    /// On an inconsistent schema the entity tables built so far stay in
    /// place; [`clear`](Self::clear) before retrying.
    pub fn generate(&mut self) -> Result<()> {
        let schema = self.schema.as_ref().ok_or(DdlError::NoSchema)?;

        self.artifacts.add_tables(schema);
        self.artifacts.add_relations(schema, &self.options)?;
        self.artifacts.add_triggers(schema);
        self.state = GeneratorState::Built;

        info!(
            tables = self.artifacts.tables.len(),
            alterations = self.artifacts.alterations.len(),
            triggers = self.artifacts.triggers.len(),
            "Generated DDL"
        );
        Ok(())
    }

    /// Writes the accumulated statements to `sink`.
    ///
    /// Only a dump after a successful [`generate`](Self::generate) moves the
    /// generator to [`GeneratorState::Dumped`]; otherwise the state is kept.
    pub fn dump<W: Write>(&mut self, sink: &mut W) -> Result<()> {
        self.artifacts.write_to(sink)?;
        if self.state == GeneratorState::Built {
            self.state = GeneratorState::Dumped;
        }
        Ok(())
    }

    /// Writes the accumulated statements to a file, replacing it.
    pub fn dump_to_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.dump(&mut writer)?;
        info!(path = %path.display(), "Wrote DDL");
        Ok(())
    }

    /// Drops the schema and every accumulated statement.
    pub fn clear(&mut self) {
        self.artifacts.clear();
        self.schema = None;
        self.state = GeneratorState::Empty;
    }
}
