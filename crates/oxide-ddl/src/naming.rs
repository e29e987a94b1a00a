//! Naming conventions shared by the builders.
//!
//! Every column of an entity table is prefixed with the entity name, so the
//! relation builder can derive key columns from entity names alone.

use tracing::warn;

/// PostgreSQL truncates identifiers longer than this many bytes.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Surrogate primary key column of `entity`.
#[must_use]
pub fn primary_key_column(entity: &str) -> String {
    format!("{entity}_id")
}

/// Column holding `field` of `entity`.
#[must_use]
pub fn field_column(entity: &str, field: &str) -> String {
    format!("{entity}_{field}")
}

/// Insertion timestamp column of `entity`.
#[must_use]
pub fn created_column(entity: &str) -> String {
    format!("{entity}_created")
}

/// Last-update timestamp column of `entity`.
#[must_use]
pub fn updated_column(entity: &str) -> String {
    format!("{entity}_updated")
}

/// Foreign key constraint from `child` to `parent`.
#[must_use]
pub fn foreign_key_name(child: &str, parent: &str) -> String {
    format!("fk_{child}_{parent}")
}

/// Binding table of a many-to-many pair. `left` must sort before `right`.
#[must_use]
pub fn binding_table(left: &str, right: &str) -> String {
    format!("{left}_{right}")
}

/// Function refreshing the update timestamp of `entity`.
#[must_use]
pub fn touch_function(entity: &str) -> String {
    format!("{entity}_touch_updated")
}

/// Trigger calling [`touch_function`] on `entity`.
#[must_use]
pub fn update_trigger(entity: &str) -> String {
    format!("{entity}_update_trigger")
}

/// Logs a warning when PostgreSQL would silently truncate `name`.
pub fn check_length(kind: &'static str, name: &str) {
    if name.len() > MAX_IDENTIFIER_LEN {
        warn!(
            kind,
            name,
            max = MAX_IDENTIFIER_LEN,
            "Identifier exceeds the PostgreSQL length limit and will be truncated"
        );
    }
}
