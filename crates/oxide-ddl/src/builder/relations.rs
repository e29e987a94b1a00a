use std::collections::BTreeSet;

use tracing::debug;

use crate::error::SchemaInconsistencyError;
use crate::generator::GeneratorOptions;
use crate::naming;
use crate::schema::{Cardinality, Schema};
use crate::statement::{Alteration, ColumnDef, ColumnType, CreateTable, ForeignKey};

/// How one visit of an entity pair resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// `child` gets a foreign key column pointing at `parent`.
    ManyToOne {
        /// Side marked `one`, holding the key.
        child: &'a str,
        /// Side marked `many`, being referenced.
        parent: &'a str,
    },
    /// A binding table joins both sides. `left` sorts before `right`.
    ManyToMany {
        /// Lexicographically smaller entity.
        left: &'a str,
        /// Lexicographically greater entity.
        right: &'a str,
    },
    /// Resolved when the pair is visited from the other side.
    Mirror,
}

/// Classifies the visit of `entity` towards `other`.
///
/// The side declaring `one` towards a side declaring `many` holds the foreign
/// key. Mutual `many` is emitted only from the smaller name; the reverse
/// visit, like `many` towards `one`, is a [`Resolution::Mirror`]. Mutual `one`
/// is rejected.
pub fn classify<'a>(
    entity: &'a str,
    relation: Cardinality,
    other: &'a str,
    reverse: Cardinality,
) -> Result<Resolution<'a>, SchemaInconsistencyError> {
    match (relation, reverse) {
        (Cardinality::One, Cardinality::Many) => Ok(Resolution::ManyToOne {
            child: entity,
            parent: other,
        }),
        (Cardinality::Many, Cardinality::Many) if entity < other => Ok(Resolution::ManyToMany {
            left: entity,
            right: other,
        }),
        (Cardinality::Many, _) => Ok(Resolution::Mirror),
        (Cardinality::One, Cardinality::One) => {
            Err(SchemaInconsistencyError::ConflictingCardinality {
                entity: entity.to_string(),
                relation,
                other: other.to_string(),
                reverse,
            })
        }
    }
}

/// Statements produced by [`build_relations`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationArtifacts {
    /// Foreign key columns and constraints.
    pub alterations: BTreeSet<Alteration>,
    /// Binding tables of many-to-many relations.
    pub binding_tables: BTreeSet<CreateTable>,
}

impl RelationArtifacts {
    fn many_to_one(&mut self, child: &str, parent: &str) {
        let column = naming::primary_key_column(parent);
        let constraint = naming::foreign_key_name(child, parent);
        naming::check_length("column", &column);
        naming::check_length("constraint", &constraint);

        self.alterations.insert(Alteration::AddColumn {
            table: child.to_string(),
            column: ColumnDef::new(column.clone(), ColumnType::Integer).not_null(),
        });
        self.alterations.insert(Alteration::AddForeignKey(ForeignKey {
            table: child.to_string(),
            name: constraint,
            references_column: column.clone(),
            column,
            references_table: parent.to_string(),
        }));
    }

    fn many_to_many(&mut self, table: String, left: &str, right: &str) {
        naming::check_length("table", &table);
        let left_key = naming::primary_key_column(left);
        let right_key = naming::primary_key_column(right);

        for (side, key) in [(left, &left_key), (right, &right_key)] {
            let constraint = naming::foreign_key_name(&table, side);
            naming::check_length("constraint", &constraint);
            self.alterations.insert(Alteration::AddForeignKey(ForeignKey {
                table: table.clone(),
                name: constraint,
                column: key.clone(),
                references_table: side.to_string(),
                references_column: key.clone(),
            }));
        }

        self.binding_tables.insert(
            CreateTable::new(table)
                .column(ColumnDef::new(left_key.clone(), ColumnType::Integer).not_null())
                .column(ColumnDef::new(right_key.clone(), ColumnType::Integer).not_null())
                .composite_key(vec![left_key, right_key]),
        );
    }
}

/// Resolves every declared relation into foreign keys and binding tables.
///
/// Fails on the first pair that does not resolve, walking entities and their
/// targets in name order.
pub fn build_relations(
    schema: &Schema,
    options: &GeneratorOptions,
) -> Result<RelationArtifacts, SchemaInconsistencyError> {
    check_reserved_columns(schema)?;
    if options.strict {
        check_full_mesh(schema)?;
    }

    let mut artifacts = RelationArtifacts::default();
    let mut binding_names = BTreeSet::new();

    for (entity, definition) in schema.entities() {
        for (other, &relation) in &definition.relations {
            let other = other.as_str();
            if other == entity {
                return Err(SchemaInconsistencyError::SelfRelation(entity.to_string()));
            }

            let reverse = schema
                .get(other)
                .ok_or_else(|| SchemaInconsistencyError::UnknownEntity {
                    entity: entity.to_string(),
                    target: other.to_string(),
                })?
                .relation_to(entity)
                .ok_or_else(|| SchemaInconsistencyError::MissingReciprocal {
                    entity: other.to_string(),
                    other: entity.to_string(),
                })?;

            match classify(entity, relation, other, reverse)? {
                Resolution::ManyToOne { child, parent } => {
                    let key = naming::primary_key_column(parent);
                    if definition
                        .fields
                        .keys()
                        .any(|field| naming::field_column(child, field) == key)
                    {
                        return Err(SchemaInconsistencyError::ColumnNameCollision {
                            table: child.to_string(),
                            column: key,
                        });
                    }
                    debug!(child, parent, "Resolved many-to-one relation");
                    artifacts.many_to_one(child, parent);
                }
                Resolution::ManyToMany { left, right } => {
                    let table = naming::binding_table(left, right);
                    if schema.contains(&table) || !binding_names.insert(table.clone()) {
                        return Err(SchemaInconsistencyError::TableNameCollision {
                            table,
                            left: left.to_string(),
                            right: right.to_string(),
                        });
                    }
                    debug!(left, right, table = %table, "Resolved many-to-many relation");
                    artifacts.many_to_many(table, left, right);
                }
                Resolution::Mirror => {}
            }
        }
    }

    Ok(artifacts)
}

/// Rejects fields whose column would shadow the key or a timestamp column.
fn check_reserved_columns(schema: &Schema) -> Result<(), SchemaInconsistencyError> {
    for (entity, definition) in schema.entities() {
        let reserved = [
            naming::primary_key_column(entity),
            naming::created_column(entity),
            naming::updated_column(entity),
        ];
        for field in definition.fields.keys() {
            let column = naming::field_column(entity, field);
            if reserved.contains(&column) {
                return Err(SchemaInconsistencyError::ColumnNameCollision {
                    table: entity.to_string(),
                    column,
                });
            }
        }
    }
    Ok(())
}

/// Rejects any entity lacking a relation entry for some other entity.
fn check_full_mesh(schema: &Schema) -> Result<(), SchemaInconsistencyError> {
    for (entity, definition) in schema.entities() {
        for other in schema.entity_names().filter(|other| *other != entity) {
            if definition.relation_to(other).is_none() {
                return Err(SchemaInconsistencyError::MissingReciprocal {
                    entity: entity.to_string(),
                    other: other.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntityDefinition;

    fn pair(a: Cardinality, b: Cardinality) -> Schema {
        Schema::new()
            .entity("author", EntityDefinition::new().relation("book", a))
            .entity("book", EntityDefinition::new().relation("author", b))
    }

    fn lenient() -> GeneratorOptions {
        GeneratorOptions::default()
    }

    #[test]
    fn test_classify_priority() {
        use Cardinality::{Many, One};

        assert_eq!(
            classify("a", One, "b", Many).unwrap(),
            Resolution::ManyToOne { child: "a", parent: "b" }
        );
        assert_eq!(
            classify("a", Many, "b", Many).unwrap(),
            Resolution::ManyToMany { left: "a", right: "b" }
        );
        assert_eq!(classify("b", Many, "a", Many).unwrap(), Resolution::Mirror);
        assert_eq!(classify("b", Many, "a", One).unwrap(), Resolution::Mirror);
        assert!(classify("a", One, "b", One).is_err());
    }

    #[test]
    fn test_many_to_one_emits_column_and_constraint() {
        let artifacts =
            build_relations(&pair(Cardinality::One, Cardinality::Many), &lenient()).unwrap();

        assert!(artifacts.binding_tables.is_empty());
        let alterations: Vec<Alteration> = artifacts.alterations.into_iter().collect();
        assert_eq!(alterations.len(), 2);

        match &alterations[0] {
            Alteration::AddColumn { table, column } => {
                assert_eq!(table, "author");
                assert_eq!(column.name, "book_id");
                assert_eq!(column.column_type, ColumnType::Integer);
                assert!(!column.nullable);
            }
            other => panic!("Expected AddColumn, got {other:?}"),
        }
        match &alterations[1] {
            Alteration::AddForeignKey(fk) => {
                assert_eq!(fk.table, "author");
                assert_eq!(fk.name, "fk_author_book");
                assert_eq!(fk.column, "book_id");
                assert_eq!(fk.references_table, "book");
                assert_eq!(fk.references_column, "book_id");
            }
            other => panic!("Expected AddForeignKey, got {other:?}"),
        }
    }

    #[test]
    fn test_many_to_one_from_either_side() {
        let artifacts =
            build_relations(&pair(Cardinality::Many, Cardinality::One), &lenient()).unwrap();
        assert!(artifacts
            .alterations
            .iter()
            .all(|alteration| alteration.table() == "book"));
        assert_eq!(artifacts.alterations.len(), 2);
    }

    #[test]
    fn test_many_to_many_emitted_once() {
        let schema = Schema::new()
            .entity("tag", EntityDefinition::new().relation("post", Cardinality::Many))
            .entity("post", EntityDefinition::new().relation("tag", Cardinality::Many));

        let artifacts = build_relations(&schema, &lenient()).unwrap();

        assert_eq!(artifacts.binding_tables.len(), 1);
        let table = artifacts.binding_tables.first().unwrap();
        assert_eq!(table.name, "post_tag");
        assert_eq!(table.primary_key, vec!["post_id", "tag_id"]);

        let names: Vec<&str> = artifacts
            .alterations
            .iter()
            .map(|alteration| match alteration {
                Alteration::AddForeignKey(fk) => fk.name.as_str(),
                Alteration::AddColumn { .. } => panic!("Binding tables add no columns"),
            })
            .collect();
        assert_eq!(names, vec!["fk_post_tag_post", "fk_post_tag_tag"]);
    }

    #[test]
    fn test_one_to_one_rejected() {
        let err =
            build_relations(&pair(Cardinality::One, Cardinality::One), &lenient()).unwrap_err();
        assert_eq!(
            err,
            SchemaInconsistencyError::ConflictingCardinality {
                entity: "author".into(),
                relation: Cardinality::One,
                other: "book".into(),
                reverse: Cardinality::One,
            }
        );
    }

    #[test]
    fn test_unknown_entity_rejected() {
        let schema = Schema::new().entity(
            "author",
            EntityDefinition::new().relation("publisher", Cardinality::One),
        );

        let err = build_relations(&schema, &lenient()).unwrap_err();
        assert_eq!(
            err,
            SchemaInconsistencyError::UnknownEntity {
                entity: "author".into(),
                target: "publisher".into(),
            }
        );
    }

    #[test]
    fn test_missing_reciprocal_rejected() {
        let schema = Schema::new()
            .entity("author", EntityDefinition::new().relation("book", Cardinality::One))
            .entity("book", EntityDefinition::new());

        let err = build_relations(&schema, &lenient()).unwrap_err();
        assert_eq!(
            err,
            SchemaInconsistencyError::MissingReciprocal {
                entity: "book".into(),
                other: "author".into(),
            }
        );
    }

    #[test]
    fn test_self_relation_rejected() {
        let schema = Schema::new().entity(
            "node",
            EntityDefinition::new().relation("node", Cardinality::Many),
        );

        let err = build_relations(&schema, &lenient()).unwrap_err();
        assert_eq!(err, SchemaInconsistencyError::SelfRelation("node".into()));
    }

    #[test]
    fn test_binding_table_collides_with_entity() {
        let schema = Schema::new()
            .entity("post", EntityDefinition::new().relation("tag", Cardinality::Many))
            .entity("tag", EntityDefinition::new().relation("post", Cardinality::Many))
            .entity("post_tag", EntityDefinition::new());

        let err = build_relations(&schema, &lenient()).unwrap_err();
        assert!(matches!(
            err,
            SchemaInconsistencyError::TableNameCollision { ref table, .. } if table == "post_tag"
        ));
    }

    #[test]
    fn test_binding_tables_collide_with_each_other() {
        let schema = Schema::new()
            .entity("a", EntityDefinition::new().relation("b_c", Cardinality::Many))
            .entity("b_c", EntityDefinition::new().relation("a", Cardinality::Many))
            .entity("a_b", EntityDefinition::new().relation("c", Cardinality::Many))
            .entity("c", EntityDefinition::new().relation("a_b", Cardinality::Many));

        let err = build_relations(&schema, &lenient()).unwrap_err();
        assert!(matches!(
            err,
            SchemaInconsistencyError::TableNameCollision { ref table, .. } if table == "a_b_c"
        ));
    }

    #[test]
    fn test_field_shadowing_reserved_column_rejected() {
        let schema = Schema::new().entity(
            "author",
            EntityDefinition::new()
                .field("name", "TEXT")
                .field("updated", "TEXT"),
        );

        let err = build_relations(&schema, &lenient()).unwrap_err();
        assert_eq!(
            err,
            SchemaInconsistencyError::ColumnNameCollision {
                table: "author".into(),
                column: "author_updated".into(),
            }
        );

        let schema =
            Schema::new().entity("author", EntityDefinition::new().field("id", "INTEGER"));
        let err = build_relations(&schema, &lenient()).unwrap_err();
        assert!(matches!(
            err,
            SchemaInconsistencyError::ColumnNameCollision { ref column, .. } if column == "author_id"
        ));
    }

    #[test]
    fn test_foreign_key_shadowing_field_rejected() {
        let schema = Schema::new()
            .entity(
                "order",
                EntityDefinition::new()
                    .field("item_id", "INTEGER")
                    .relation("order_item", Cardinality::One),
            )
            .entity(
                "order_item",
                EntityDefinition::new().relation("order", Cardinality::Many),
            );

        let err = build_relations(&schema, &lenient()).unwrap_err();
        assert_eq!(
            err,
            SchemaInconsistencyError::ColumnNameCollision {
                table: "order".into(),
                column: "order_item_id".into(),
            }
        );
    }

    #[test]
    fn test_unrelated_pair_allowed_unless_strict() {
        let schema = Schema::new()
            .entity("author", EntityDefinition::new())
            .entity("book", EntityDefinition::new());

        let artifacts = build_relations(&schema, &lenient()).unwrap();
        assert!(artifacts.alterations.is_empty());

        let strict = GeneratorOptions { strict: true };
        let err = build_relations(&schema, &strict).unwrap_err();
        assert_eq!(
            err,
            SchemaInconsistencyError::MissingReciprocal {
                entity: "author".into(),
                other: "book".into(),
            }
        );
    }

    #[test]
    fn test_strict_accepts_full_mesh() {
        let strict = GeneratorOptions { strict: true };
        let artifacts = build_relations(&pair(Cardinality::Many, Cardinality::Many), &strict)
            .unwrap();
        assert_eq!(artifacts.binding_tables.len(), 1);
    }
}
