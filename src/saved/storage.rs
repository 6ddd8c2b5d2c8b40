//! SQLite storage for saved companies
//!
//! One row per company, keyed by its fingerprint. The full API record is kept
//! as JSON so details can be shown offline.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;

use super::SavedCompany;
use crate::client::models::Organization;
use crate::error::StoreError;

/// Schema version - increment to trigger a rebuild
const SCHEMA_VERSION: i32 = 1;

/// Database file name inside the data directory
pub const DB_FILE: &str = "saved.db";

type Result<T> = std::result::Result<T, StoreError>;

/// SQLite-backed saved-company list
pub struct SavedCompanies {
    conn: Connection,
}

impl SavedCompanies {
    /// Open or create the store in `data_dir`.
    pub fn open_at(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .map_err(|e| StoreError::Io(format!("Failed to create data dir: {}", e)))?;

        let db_path = data_dir.join(DB_FILE);
        let conn = Connection::open(&db_path)?;

        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Saved companies schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            conn.execute_batch("DROP TABLE IF EXISTS saved_companies;")?;
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS saved_companies (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                legal_form TEXT,
                status TEXT,
                jurisdiction TEXT,
                register_number TEXT,
                description TEXT,
                record TEXT NOT NULL,
                saved_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_saved_at ON saved_companies(saved_at);
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self { conn })
    }

    /// Save a company, replacing any earlier copy of the same record.
    pub fn save(&self, org: &Organization) -> Result<SavedCompany> {
        let saved = SavedCompany::from_organization(org, Utc::now());
        let record = serde_json::to_string(&saved.record)?;

        self.conn.execute(
            "INSERT OR REPLACE INTO saved_companies
             (id, name, legal_form, status, jurisdiction, register_number, description, record, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                saved.id,
                saved.name,
                saved.legal_form,
                saved.status,
                saved.jurisdiction,
                saved.register_number,
                saved.description,
                record,
                saved.saved_on.timestamp_millis(),
            ],
        )?;

        log::debug!("Saved company {} ({})", saved.name, saved.id);
        Ok(saved)
    }

    /// All saved companies, newest first
    pub fn list(&self) -> Result<Vec<SavedCompany>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, legal_form, status, jurisdiction, register_number, description, record, saved_at
             FROM saved_companies ORDER BY saved_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map([], read_row)?;
        let mut saved = Vec::new();
        for row in rows {
            saved.push(row??);
        }
        Ok(saved)
    }

    pub fn get(&self, id: &str) -> Result<Option<SavedCompany>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, legal_form, status, jurisdiction, register_number, description, record, saved_at
                 FROM saved_companies WHERE id = ?1",
                [id],
                read_row,
            )
            .optional()?;
        row.transpose()
    }

    /// Remove one company; returns whether it was saved.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM saved_companies WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    /// Remove everything; returns the number of rows removed.
    pub fn clear(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM saved_companies", [])?)
    }
}

/// Map a row; JSON decoding errors are surfaced separately from SQL errors.
fn read_row(row: &Row<'_>) -> rusqlite::Result<Result<SavedCompany>> {
    let record: String = row.get(7)?;
    let saved_at: i64 = row.get(8)?;

    let saved = SavedCompany {
        id: row.get(0)?,
        name: row.get(1)?,
        legal_form: row.get(2)?,
        status: row.get(3)?,
        jurisdiction: row.get(4)?,
        register_number: row.get(5)?,
        description: row.get(6)?,
        record: serde_json::Value::Null,
        saved_on: DateTime::from_timestamp_millis(saved_at).unwrap_or_default(),
    };

    Ok(serde_json::from_str(&record)
        .map(|record| SavedCompany { record, ..saved })
        .map_err(StoreError::from))
}
