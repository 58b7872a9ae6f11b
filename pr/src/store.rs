//! SQLite persistence for templates and history
//!
//! ```text
//! templates(id, name, body, fields_data BLOB, created_at)
//! history(id, template_id, template_name, content, created_at)
//! ```
//!
//! `created_at` is stored as Unix microseconds. History rows reference their
//! template by ID only; there is no foreign key, so deleting a template never
//! touches its history.

use std::path::Path;

use chrono::{DateTime, Utc};
use promptcore::{HistoryRecord, Template, decode_fields, encode_fields};
use rusqlite::types::{Type, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{RollError, RollResult};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS templates (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    body        TEXT NOT NULL,
    fields_data BLOB NOT NULL,
    created_at  INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS history (
    id            TEXT PRIMARY KEY,
    template_id   TEXT NOT NULL,
    template_name TEXT NOT NULL,
    content       TEXT NOT NULL,
    created_at    INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_templates_created ON templates(created_at);
CREATE INDEX IF NOT EXISTS idx_history_created ON history(created_at);
";

const TEMPLATE_COLUMNS: &str = "id, name, body, fields_data, created_at";
const HISTORY_COLUMNS: &str = "id, template_id, template_name, content, created_at";

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a store at the given database path
    pub fn open(path: impl AsRef<Path>) -> RollResult<Self> {
        let path = path.as_ref();
        debug!(?path, "Store::open: called");
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| promptcore::PromptError::io(parent, e))?;
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Store that lives only as long as the value
    pub fn open_in_memory() -> RollResult<Self> {
        debug!("Store::open_in_memory: called");
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> RollResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // === Templates ===

    pub fn insert_template(&self, template: &Template) -> RollResult<()> {
        debug!(id = %template.id(), name = %template.name(), "Store::insert_template: called");
        let blob = encode_fields(template.fields())?;
        self.conn.execute(
            "INSERT INTO templates (id, name, body, fields_data, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                template.id().to_string(),
                template.name(),
                template.body(),
                blob,
                template.created_at().timestamp_micros()
            ],
        )?;
        info!(id = %template.id(), name = %template.name(), "Inserted template");
        Ok(())
    }

    /// Write back name, body and fields; `created_at` never changes
    pub fn update_template(&self, template: &Template) -> RollResult<()> {
        debug!(id = %template.id(), "Store::update_template: called");
        let blob = encode_fields(template.fields())?;
        let changed = self.conn.execute(
            "UPDATE templates SET name = ?2, body = ?3, fields_data = ?4 WHERE id = ?1",
            params![template.id().to_string(), template.name(), template.body(), blob],
        )?;
        if changed == 0 {
            return Err(RollError::not_found(format!("template {}", template.id())));
        }
        info!(id = %template.id(), "Updated template");
        Ok(())
    }

    /// Delete a template, returning whether it existed
    pub fn delete_template(&self, id: Uuid) -> RollResult<bool> {
        debug!(%id, "Store::delete_template: called");
        let changed = self
            .conn
            .execute("DELETE FROM templates WHERE id = ?1", params![id.to_string()])?;
        if changed > 0 {
            info!(%id, "Deleted template");
        }
        Ok(changed > 0)
    }

    pub fn get_template(&self, id: Uuid) -> RollResult<Option<Template>> {
        debug!(%id, "Store::get_template: called");
        let sql = format!("SELECT {} FROM templates WHERE id = ?1", TEMPLATE_COLUMNS);
        let template = self
            .conn
            .query_row(&sql, params![id.to_string()], template_from_row)
            .optional()?;
        Ok(template)
    }

    /// All templates, newest first
    pub fn list_templates(&self) -> RollResult<Vec<Template>> {
        debug!("Store::list_templates: called");
        let sql = format!(
            "SELECT {} FROM templates ORDER BY created_at DESC, id DESC",
            TEMPLATE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let templates = stmt
            .query_map([], template_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(templates)
    }

    // === History ===

    pub fn insert_history(&self, record: &HistoryRecord) -> RollResult<()> {
        debug!(id = %record.id(), template_id = %record.template_id(), "Store::insert_history: called");
        self.conn.execute(
            "INSERT INTO history (id, template_id, template_name, content, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id().to_string(),
                record.template_id().to_string(),
                record.template_name(),
                record.content(),
                record.created_at().timestamp_micros()
            ],
        )?;
        info!(id = %record.id(), template = %record.template_name(), "Recorded generation");
        Ok(())
    }

    pub fn delete_history(&self, id: Uuid) -> RollResult<bool> {
        debug!(%id, "Store::delete_history: called");
        let changed = self
            .conn
            .execute("DELETE FROM history WHERE id = ?1", params![id.to_string()])?;
        if changed > 0 {
            info!(%id, "Deleted history record");
        }
        Ok(changed > 0)
    }

    pub fn get_history(&self, id: Uuid) -> RollResult<Option<HistoryRecord>> {
        debug!(%id, "Store::get_history: called");
        let sql = format!("SELECT {} FROM history WHERE id = ?1", HISTORY_COLUMNS);
        let record = self
            .conn
            .query_row(&sql, params![id.to_string()], history_from_row)
            .optional()?;
        Ok(record)
    }

    /// All history records, newest first
    pub fn list_history(&self) -> RollResult<Vec<HistoryRecord>> {
        debug!("Store::list_history: called");
        let sql = format!("SELECT {} FROM history ORDER BY created_at DESC, id DESC", HISTORY_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt.query_map([], history_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

fn template_from_row(row: &Row<'_>) -> rusqlite::Result<Template> {
    let id = uuid_column(row, 0)?;
    let fields = match row.get_ref(3)? {
        ValueRef::Blob(bytes) | ValueRef::Text(bytes) => decode_fields(bytes),
        other => {
            warn!(%id, column_type = ?other.data_type(), "Unexpected fields_data type, loading without fields");
            Vec::new()
        }
    };
    Ok(Template::from_parts(
        id,
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        fields,
        micros_column(row, 4)?,
    ))
}

fn history_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryRecord> {
    Ok(HistoryRecord::from_parts(
        uuid_column(row, 0)?,
        uuid_column(row, 1)?,
        row.get::<_, String>(2)?,
        row.get::<_, String>(3)?,
        micros_column(row, 4)?,
    ))
}

fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn micros_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let micros: i64 = row.get(idx)?;
    DateTime::from_timestamp_micros(micros).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, micros))
}
