//! Statement builders.
//!
//! Each builder is a pure function from a [`Schema`](crate::schema::Schema) to
//! a set of typed statements. They run in order: tables, then relations
//! (which rely on the table naming), then triggers.

mod relations;
mod tables;
mod triggers;

pub use relations::{RelationArtifacts, Resolution, build_relations, classify};
pub use tables::build_tables;
pub use triggers::build_triggers;
