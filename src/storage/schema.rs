//! Schema of the synced resource store.
//!
//! The store is produced by the Stocard app and is only ever read here.
//! The DDL is kept so fixtures and tests can build a compatible store.

use rusqlite::{Connection, Result};

/// Table holding every synced object.
pub const RESOURCES_TABLE: &str = "synced_resources";

/// DDL for the `synced_resources` table.
///
/// `content` carries JSON documents as TEXT or BLOB and images as BLOB.
pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS synced_resources (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    content BLOB,
    content_type TEXT
);

CREATE INDEX IF NOT EXISTS idx_synced_resources_collection ON synced_resources(collection);
CREATE INDEX IF NOT EXISTS idx_synced_resources_id ON synced_resources(id);
";

/// Create the resource table on a fresh connection.
///
/// # Errors
///
/// Returns an error if the DDL fails.
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
