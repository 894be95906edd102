//! SQLite resource store.
//!
//! Read-only access to the `synced_resources` table exported by the
//! Stocard app. Every lookup the migration needs is a method here; callers
//! never see SQL.

use crate::config::LOYALTY_CARD_CONTENT_TYPE;
use crate::error::{Error, Result};
use crate::storage::collection;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};
use std::path::Path;
use std::time::Duration;

/// One opaque object in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRow {
    /// Hierarchical collection path, e.g. `/users/u1/loyalty-cards/`.
    pub collection: String,
    /// Local id within the collection.
    pub id: String,
    /// Raw content; JSON text and image bytes alike.
    pub content: Vec<u8>,
}

/// An image attached to a card: its row id and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub id: String,
    pub content: Vec<u8>,
}

/// Read-only handle on a synced resource store.
#[derive(Debug)]
pub struct ResourceStore {
    conn: Connection,
}

impl ResourceStore {
    /// Open the store at `path` read-only.
    ///
    /// # Errors
    ///
    /// Returns `StoreNotFound` if the file does not exist and
    /// `StoreUnavailable` if SQLite cannot open it.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::StoreNotFound {
                path: path.to_path_buf(),
            });
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(Duration::from_secs(5))?;

        tracing::debug!(path = %path.display(), "opened resource store");
        Ok(Self::from_connection(conn))
    }

    /// Wrap an existing connection (in-memory stores in tests).
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Every loyalty card row, in store order.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the query cannot run, e.g. when the
    /// `synced_resources` table is missing.
    pub fn loyalty_cards(&self) -> Result<Vec<ResourceRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT collection, id, content FROM synced_resources
             WHERE collection LIKE ?1 AND content_type = ?2",
        )?;

        let rows = stmt
            .query_map(
                rusqlite::params![collection::loyalty_cards_like(), LOYALTY_CARD_CONTENT_TYPE],
                map_resource_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let cards: Vec<ResourceRow> = rows
            .into_iter()
            .filter(|row| collection::is_loyalty_cards(&row.collection))
            .collect();

        tracing::debug!(count = cards.len(), "loaded loyalty card rows");
        Ok(cards)
    }

    /// Content of the first row whose id is `provider_id`.
    ///
    /// The collection is not constrained. If unrelated collections reuse the
    /// id, whichever row SQLite returns first wins.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the query fails.
    pub fn provider_content(&self, provider_id: &str) -> Result<Option<Vec<u8>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT content FROM synced_resources WHERE id = ?1 LIMIT 1")?;

        let content = stmt
            .query_row([provider_id], |row| content_bytes(row, 0))
            .optional()?;

        Ok(content)
    }

    /// The logo of a provider, if one was synced.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the query fails.
    pub fn provider_logo(&self, provider_id: &str) -> Result<Option<Vec<u8>>> {
        let mut stmt = self.conn.prepare(
            "SELECT collection, id, content FROM synced_resources
             WHERE collection LIKE ?1 ESCAPE '\\' AND id = ?2",
        )?;

        let rows = stmt.query_map(
            rusqlite::params![collection::provider_logo_like(provider_id), collection::LOGO_ID],
            map_resource_row,
        )?;

        for row in rows {
            let row = row?;
            if collection::is_provider_logo(&row.collection, provider_id) {
                return Ok(Some(row.content));
            }
        }

        Ok(None)
    }

    /// Every image attached to a user's card.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the query fails.
    pub fn card_images(&self, user_id: &str, card_id: &str) -> Result<Vec<ImageAsset>> {
        let exact = collection::card_images(user_id, card_id);
        tracing::debug!(collection = %exact, "querying card images");

        let mut stmt = self.conn.prepare(
            "SELECT collection, id, content FROM synced_resources
             WHERE collection LIKE ?1 ESCAPE '\\'",
        )?;

        let rows = stmt
            .query_map(
                [collection::card_images_like(user_id, card_id)],
                map_resource_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .filter(|row| row.collection == exact)
            .map(|row| ImageAsset {
                id: row.id,
                content: row.content,
            })
            .collect())
    }
}

/// Map a `collection, id, content` row.
fn map_resource_row(row: &Row<'_>) -> rusqlite::Result<ResourceRow> {
    Ok(ResourceRow {
        collection: row.get(0)?,
        id: row.get(1)?,
        content: content_bytes(row, 2)?,
    })
}

/// Read a `content` column stored as either TEXT or BLOB.
fn content_bytes(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<u8>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => bytes.to_vec(),
        ValueRef::Null => Vec::new(),
        ValueRef::Integer(i) => i.to_string().into_bytes(),
        ValueRef::Real(f) => f.to_string().into_bytes(),
    })
}
