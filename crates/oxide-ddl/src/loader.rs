//! YAML schema loader.
//!
//! The document's top level maps entity names to an object with two keys,
//! both optional:
//!
//! ```yaml
//! Author:
//!   fields:
//!     name: VARCHAR(255)
//!   relations:
//!     Book: one
//! Book:
//!   fields:
//!     title: TEXT
//!   relations:
//!     Author: many
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SchemaParseError};
use crate::schema::{Cardinality, EntityDefinition, Schema, validate_identifier};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntity {
    #[serde(default)]
    fields: Option<IndexMap<String, String>>,
    #[serde(default)]
    relations: Option<IndexMap<String, Cardinality>>,
}

/// Loads schema documents into a validated [`Schema`].
pub struct SchemaLoader;

impl SchemaLoader {
    /// Parses a YAML document.
    pub fn parse_yaml(yaml: &str) -> std::result::Result<Schema, SchemaParseError> {
        let raw: IndexMap<String, RawEntity> = serde_yaml::from_str(yaml)?;

        let mut schema = Schema::new();
        for (name, raw_entity) in raw {
            let entity_name = Self::normalize(&name)?;
            let definition = Self::convert_raw_entity(&entity_name, raw_entity)?;
            if schema.insert(entity_name.clone(), definition).is_some() {
                return Err(SchemaParseError::DuplicateEntity(entity_name));
            }
        }

        debug!(entities = schema.len(), "Parsed schema document");
        Ok(schema)
    }

    /// Reads and parses a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Schema> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading schema file");
        let source = std::fs::read_to_string(path)?;
        Ok(Self::parse_yaml(&source)?)
    }

    fn convert_raw_entity(
        entity: &str,
        raw: RawEntity,
    ) -> std::result::Result<EntityDefinition, SchemaParseError> {
        let mut definition = EntityDefinition::new();

        for (name, sql_type) in raw.fields.unwrap_or_default() {
            let field = Self::normalize(&name)?;
            if definition.fields.insert(field.clone(), sql_type).is_some() {
                return Err(SchemaParseError::DuplicateField {
                    entity: entity.to_string(),
                    field,
                });
            }
        }

        for (target, cardinality) in raw.relations.unwrap_or_default() {
            let target = Self::normalize(&target)?;
            // Two spellings of one target are a duplicate entity reference.
            if definition.relations.insert(target.clone(), cardinality).is_some() {
                return Err(SchemaParseError::DuplicateEntity(target));
            }
        }

        Ok(definition)
    }

    fn normalize(name: &str) -> std::result::Result<String, SchemaParseError> {
        let lowered = name.to_lowercase();
        // Report the name as the author wrote it, not the lowered form.
        validate_identifier(&lowered).map_err(|err| match err {
            SchemaParseError::InvalidIdentifier { reason, .. } => {
                SchemaParseError::InvalidIdentifier {
                    name: name.to_string(),
                    reason,
                }
            }
            other => other,
        })?;
        Ok(lowered)
    }
}
