// ABOUTME: Catalog queries used by the comparison
// ABOUTME: Lists base tables in a schema and counts rows per table

use crate::compare::RowCounter;
use crate::error::{CompareError, Result};
use tokio_postgres::Client;

/// List base tables (no views or foreign tables) in a schema
pub async fn list_base_tables(client: &Client, schema: &str) -> Result<Vec<String>> {
    let rows = client
        .query(
            "SELECT table_name
             FROM information_schema.tables
             WHERE table_schema = $1
               AND table_type = 'BASE TABLE'
             ORDER BY table_name",
            &[&schema],
        )
        .await
        .map_err(|e| {
            CompareError::query(format!("Failed to list tables in schema '{}'", schema), e)
        })?;

    Ok(rows.iter().map(|row| row.get(0)).collect())
}

/// Count all rows in `schema.table`
pub async fn count_rows(client: &Client, schema: &str, table: &str) -> Result<i64> {
    let query = format!(
        "SELECT COUNT(*) FROM {}.{}",
        quote_ident(schema),
        quote_ident(table)
    );

    let row = client.query_one(&query, &[]).await.map_err(|e| {
        CompareError::query("Row count query failed", e)
    })?;

    Ok(row.get(0))
}

/// Quote an identifier for interpolation into SQL
pub fn quote_ident(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Row counter bound to one schema of one database
pub struct SchemaCounter<'a> {
    client: &'a Client,
    schema: &'a str,
}

impl<'a> SchemaCounter<'a> {
    pub fn new(client: &'a Client, schema: &'a str) -> Self {
        Self { client, schema }
    }
}

impl RowCounter for SchemaCounter<'_> {
    fn qualified_name(&self, table: &str) -> String {
        format!("{}.{}", self.schema, table)
    }

    async fn count_rows(&self, table: &str) -> Result<i64> {
        count_rows(self.client, self.schema, table).await
    }
}
