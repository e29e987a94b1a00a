use std::collections::BTreeSet;

use tracing::debug;

use crate::naming;
use crate::schema::{EntityDefinition, Schema};
use crate::statement::{ColumnDef, ColumnType, CreateTable};

const NOW: &str = "CURRENT_TIMESTAMP";

/// Builds one `CREATE TABLE` per entity.
///
/// Columns are the surrogate key, one column per field in declaration order,
/// then the creation and update timestamps. Field types are not checked.
#[must_use]
pub fn build_tables(schema: &Schema) -> BTreeSet<CreateTable> {
    schema
        .entities()
        .map(|(name, entity)| entity_table(name, entity))
        .collect()
}

fn entity_table(name: &str, entity: &EntityDefinition) -> CreateTable {
    naming::check_length("table", name);

    let mut table = CreateTable::new(name)
        .column(ColumnDef::new(naming::primary_key_column(name), ColumnType::Serial).primary_key());

    for (field, sql_type) in &entity.fields {
        let column = naming::field_column(name, field);
        naming::check_length("column", &column);
        table = table.column(ColumnDef::new(column, ColumnType::Custom(sql_type.clone())));
    }

    table = table
        .column(timestamp_column(naming::created_column(name)))
        .column(timestamp_column(naming::updated_column(name)));

    debug!(table = name, columns = table.columns.len(), "Built entity table");
    table
}

fn timestamp_column(name: String) -> ColumnDef {
    ColumnDef::new(name, ColumnType::Timestamp)
        .not_null()
        .default_expr(NOW)
}
