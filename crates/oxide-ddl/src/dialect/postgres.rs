//! PostgreSQL rendering of typed statements.

use crate::statement::{Alteration, ColumnDef, CreateTable, ForeignKey, UpdateTrigger};

/// PostgreSQL SQL generator.
///
/// Rendered statements carry no trailing `;`; the writer terminates them.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Quotes an identifier, doubling any embedded quote.
    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Generates column definition SQL.
    #[must_use]
    pub fn column_definition(&self, column: &ColumnDef) -> String {
        let mut sql = format!(
            "{} {}",
            self.quote_identifier(&column.name),
            column.column_type.as_sql()
        );

        if column.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if !column.nullable {
            sql.push_str(" NOT NULL");
        }

        if let Some(ref default) = column.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }

        sql
    }

    /// Generates SQL for `CREATE TABLE`.
    #[must_use]
    pub fn create_table(&self, table: &CreateTable) -> String {
        let mut sql = String::from("CREATE TABLE ");
        sql.push_str(&self.quote_identifier(&table.name));
        sql.push_str(" (\n");

        let mut lines: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("    {}", self.column_definition(c)))
            .collect();

        if !table.primary_key.is_empty() {
            let quoted: Vec<String> = table
                .primary_key
                .iter()
                .map(|c| self.quote_identifier(c))
                .collect();
            lines.push(format!("    PRIMARY KEY ({})", quoted.join(", ")));
        }

        sql.push_str(&lines.join(",\n"));
        sql.push_str("\n)");
        sql
    }

    /// Generates SQL for an `ALTER TABLE` statement.
    #[must_use]
    pub fn alteration(&self, alteration: &Alteration) -> String {
        match alteration {
            Alteration::AddColumn { table, column } => format!(
                "ALTER TABLE {} ADD COLUMN {}",
                self.quote_identifier(table),
                self.column_definition(column)
            ),
            Alteration::AddForeignKey(fk) => self.add_foreign_key(fk),
        }
    }

    fn add_foreign_key(&self, fk: &ForeignKey) -> String {
        format!(
            "ALTER TABLE {}\n    ADD CONSTRAINT {}\n    FOREIGN KEY ({})\n    REFERENCES {} ({})",
            self.quote_identifier(&fk.table),
            self.quote_identifier(&fk.name),
            self.quote_identifier(&fk.column),
            self.quote_identifier(&fk.references_table),
            self.quote_identifier(&fk.references_column)
        )
    }

    /// Generates the trigger function and the trigger, in that order.
    #[must_use]
    pub fn update_trigger(&self, trigger: &UpdateTrigger) -> Vec<String> {
        let function = self.quote_identifier(&trigger.function);
        vec![
            format!(
                "CREATE OR REPLACE FUNCTION {function}() RETURNS trigger AS $$\n\
                 BEGIN\n    NEW.{} = now();\n    RETURN NEW;\nEND;\n$$ LANGUAGE plpgsql",
                self.quote_identifier(&trigger.column)
            ),
            format!(
                "CREATE TRIGGER {} BEFORE UPDATE ON {}\n    FOR EACH ROW EXECUTE PROCEDURE {function}()",
                self.quote_identifier(&trigger.trigger),
                self.quote_identifier(&trigger.table)
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::ColumnType;

    fn dialect() -> PostgresDialect {
        PostgresDialect::new()
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(dialect().quote_identifier("user"), "\"user\"");
        assert_eq!(dialect().quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_create_table() {
        let table = CreateTable::new("author")
            .column(ColumnDef::new("author_id", ColumnType::Serial).primary_key())
            .column(ColumnDef::new(
                "author_name",
                ColumnType::Custom("VARCHAR(255)".into()),
            ))
            .column(
                ColumnDef::new("author_created", ColumnType::Timestamp)
                    .not_null()
                    .default_expr("CURRENT_TIMESTAMP"),
            );

        assert_eq!(
            dialect().create_table(&table),
            "CREATE TABLE \"author\" (\n    \"author_id\" SERIAL PRIMARY KEY,\n    \"author_name\" VARCHAR(255),\n    \"author_created\" TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP\n)"
        );
    }

    #[test]
    fn test_create_table_composite_key() {
        let table = CreateTable::new("post_tag")
            .column(ColumnDef::new("post_id", ColumnType::Integer).not_null())
            .column(ColumnDef::new("tag_id", ColumnType::Integer).not_null())
            .composite_key(vec!["post_id".into(), "tag_id".into()]);

        let sql = dialect().create_table(&table);
        assert!(sql.starts_with("CREATE TABLE \"post_tag\" (\n"));
        assert!(sql.contains("    \"post_id\" INTEGER NOT NULL,\n"));
        assert!(sql.ends_with("    PRIMARY KEY (\"post_id\", \"tag_id\")\n)"));
    }

    #[test]
    fn test_add_column() {
        let alteration = Alteration::AddColumn {
            table: "author".into(),
            column: ColumnDef::new("book_id", ColumnType::Integer).not_null(),
        };

        assert_eq!(
            dialect().alteration(&alteration),
            "ALTER TABLE \"author\" ADD COLUMN \"book_id\" INTEGER NOT NULL"
        );
    }

    #[test]
    fn test_add_foreign_key() {
        let alteration = Alteration::AddForeignKey(ForeignKey {
            table: "author".into(),
            name: "fk_author_book".into(),
            column: "book_id".into(),
            references_table: "book".into(),
            references_column: "book_id".into(),
        });

        assert_eq!(
            dialect().alteration(&alteration),
            "ALTER TABLE \"author\"\n    ADD CONSTRAINT \"fk_author_book\"\n    FOREIGN KEY (\"book_id\")\n    REFERENCES \"book\" (\"book_id\")"
        );
    }

    #[test]
    fn test_update_trigger() {
        let trigger = UpdateTrigger {
            table: "book".into(),
            column: "book_updated".into(),
            function: "book_touch_updated".into(),
            trigger: "book_update_trigger".into(),
        };

        let sql = dialect().update_trigger(&trigger);
        assert_eq!(sql.len(), 2);
        assert!(sql[0].starts_with(
            "CREATE OR REPLACE FUNCTION \"book_touch_updated\"() RETURNS trigger AS $$"
        ));
        assert!(sql[0].contains("NEW.\"book_updated\" = now();"));
        assert!(sql[0].ends_with("$$ LANGUAGE plpgsql"));
        assert_eq!(
            sql[1],
            "CREATE TRIGGER \"book_update_trigger\" BEFORE UPDATE ON \"book\"\n    FOR EACH ROW EXECUTE PROCEDURE \"book_touch_updated\"()"
        );
    }
}
