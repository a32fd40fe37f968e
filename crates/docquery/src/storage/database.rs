//! SQLite registry mapping document id -> file path -> indexed flag

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::types::Document;

/// SQLite-backed document registry
pub struct DocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl DocumentStore {
    /// Create or open the database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        // WAL mode for better concurrency
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA temp_store=MEMORY;
        "#,
        )?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                file_path TEXT NOT NULL,
                original_filename TEXT NOT NULL,
                is_indexed INTEGER NOT NULL DEFAULT 0,
                uploaded_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_documents_is_indexed ON documents(is_indexed);
        "#,
        )?;

        Ok(())
    }

    /// Insert a new document record, returning its assigned id
    pub fn insert(&self, file_path: &str, original_filename: &str) -> Result<i64> {
        let conn = self.conn.lock();

        conn.execute(
            "INSERT INTO documents (file_path, original_filename, is_indexed, uploaded_at)
             VALUES (?1, ?2, 0, ?3)",
            params![file_path, original_filename, Utc::now().to_rfc3339()],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Look up a document by id
    pub fn get(&self, id: i64) -> Result<Option<Document>> {
        let conn = self.conn.lock();

        let doc = conn
            .query_row(
                "SELECT id, file_path, original_filename, is_indexed, uploaded_at
                 FROM documents WHERE id = ?1",
                params![id],
                Self::row_to_document,
            )
            .optional()?;

        Ok(doc)
    }

    /// Mark a document as indexed
    ///
    /// Called only after a fully successful index build.
    pub fn mark_indexed(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute(
            "UPDATE documents SET is_indexed = 1 WHERE id = ?1",
            params![id],
        )?;

        Ok(())
    }

    /// List all documents, oldest first
    pub fn list(&self) -> Result<Vec<Document>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(
            "SELECT id, file_path, original_filename, is_indexed, uploaded_at
             FROM documents ORDER BY id",
        )?;

        let docs = stmt
            .query_map([], Self::row_to_document)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(docs)
    }

    fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<Document> {
        let uploaded_at: String = row.get(4)?;
        let uploaded_at = DateTime::parse_from_rfc3339(&uploaded_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Document {
            id: row.get(0)?,
            file_path: row.get(1)?,
            original_filename: row.get(2)?,
            is_indexed: row.get::<_, i64>(3)? != 0,
            uploaded_at,
        })
    }
}
