//! Schema representation types.
//!
//! A [`Schema`] maps entity names to their [`EntityDefinition`]: the fields the
//! entity's table carries and the cardinality it declares towards every other
//! entity. Names are kept lowercase; the builders below normalize whatever
//! they are given, and the YAML loader additionally validates them with
//! [`validate_identifier`].

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SchemaParseError;

/// Cardinality marker declared on one endpoint of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// `one`
    One,
    /// `many`
    Many,
}

impl Cardinality {
    /// Returns the marker as written in a schema file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Many => "many",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Definition of a single entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityDefinition {
    /// Field name to SQL type token, in declaration order.
    ///
    /// Type tokens are opaque: they are emitted exactly as written.
    pub fields: IndexMap<String, String>,
    /// Other entity name to the cardinality declared towards it.
    pub relations: BTreeMap<String, Cardinality>,
}

impl EntityDefinition {
    /// Creates an entity with no fields and no relations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        self.fields
            .insert(name.into().to_lowercase(), sql_type.into());
        self
    }

    /// Declares the cardinality towards another entity.
    #[must_use]
    pub fn relation(mut self, target: impl Into<String>, cardinality: Cardinality) -> Self {
        self.relations
            .insert(target.into().to_lowercase(), cardinality);
        self
    }

    /// Returns the cardinality declared towards `target`, if any.
    #[must_use]
    pub fn relation_to(&self, target: &str) -> Option<Cardinality> {
        self.relations.get(target).copied()
    }
}

/// The complete entity-relationship schema.
///
/// Entities are kept sorted by name so that every walk over the schema, and
/// therefore every error and every generated statement, is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    entities: BTreeMap<String, EntityDefinition>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity, replacing any previous definition with the same name.
    #[must_use]
    pub fn entity(mut self, name: impl Into<String>, definition: EntityDefinition) -> Self {
        self.insert(name, definition);
        self
    }

    /// Inserts an entity and returns the definition it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        definition: EntityDefinition,
    ) -> Option<EntityDefinition> {
        self.entities.insert(name.into().to_lowercase(), definition)
    }

    /// Gets an entity by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EntityDefinition> {
        self.entities.get(name)
    }

    /// Returns true if an entity with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Iterates over entities in name order.
    pub fn entities(&self) -> impl Iterator<Item = (&str, &EntityDefinition)> {
        self.entities.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Iterates over entity names in order.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the schema declares no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Checks that `name` is usable as an unquoted-safe SQL identifier.
///
/// Accepted names match `[a-z_][a-z0-9_]*`. Callers lowercase before
/// validating.
pub fn validate_identifier(name: &str) -> Result<(), SchemaParseError> {
    let invalid = |reason| SchemaParseError::InvalidIdentifier {
        name: name.to_string(),
        reason,
    };

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(invalid("name is empty"));
    };
    if !(first.is_ascii_lowercase() || first == '_') {
        return Err(invalid("must start with a letter or underscore"));
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        return Err(invalid("only letters, digits and underscores are allowed"));
    }
    Ok(())
}
