//! SQL rendering.
//!
//! Output targets PostgreSQL only: serial keys, `$$`-quoted PL/pgSQL trigger
//! functions and `ALTER TABLE ... ADD CONSTRAINT` for foreign keys.

mod postgres;

pub use postgres::PostgresDialect;
