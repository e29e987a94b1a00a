#![allow(dead_code)]

use oxide_ddl::prelude::*;

pub fn schema(yaml: &str) -> Schema {
    SchemaLoader::parse_yaml(yaml)
        .unwrap_or_else(|e| panic!("Failed to parse schema:\n{yaml}\nError: {e:?}"))
}

pub fn build(yaml: &str) -> GeneratedArtifacts {
    generate(&schema(yaml), &GeneratorOptions::default())
        .unwrap_or_else(|e| panic!("Failed to generate:\n{yaml}\nError: {e:?}"))
}

pub fn build_err(yaml: &str) -> SchemaInconsistencyError {
    generate(&schema(yaml), &GeneratorOptions::default())
        .expect_err(&format!("Expected inconsistency for:\n{yaml}"))
}

pub fn sql(yaml: &str) -> String {
    build(yaml).to_sql()
}

pub fn table_names(artifacts: &GeneratedArtifacts) -> Vec<&str> {
    artifacts.tables.iter().map(|t| t.name.as_str()).collect()
}

pub fn foreign_keys(artifacts: &GeneratedArtifacts) -> Vec<&ForeignKey> {
    artifacts
        .alterations
        .iter()
        .filter_map(|a| match a {
            Alteration::AddForeignKey(fk) => Some(fk),
            Alteration::AddColumn { .. } => None,
        })
        .collect()
}

pub fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path}: {e}"))
}
