// ABOUTME: PostgreSQL connector module
// ABOUTME: Exports session management and catalog queries

pub mod catalog;
pub mod connection;

pub use catalog::{count_rows, list_base_tables, quote_ident, SchemaCounter};
pub use connection::{connect, probe, DatabaseConfig, DatabaseRole, Session};
