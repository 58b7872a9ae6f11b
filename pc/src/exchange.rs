//! Template exchange documents
//!
//! Templates move between installations as pretty-printed JSON objects with
//! lexicographically sorted keys:
//!
//! ```text
//! {
//!   "body": "Hello {{who}}",
//!   "createdAt": "2026-01-05T09:30:00.000000Z",
//!   "fields": [
//!     { "defaultValue": "", "id": "...", "name": "who", "options": [], "type": "text" }
//!   ],
//!   "id": "...",
//!   "name": "Greeting"
//! }
//! ```
//!
//! Importing always creates a new template: the document's `id` and
//! `createdAt` are read and checked but not reused.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{PromptError, PromptResult};
use crate::field::Field;
use crate::template::Template;

/// Serialized shape of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeDocument {
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub fields: Vec<Field>,
    pub id: Uuid,
    pub name: String,
}

impl From<&Template> for ExchangeDocument {
    fn from(template: &Template) -> Self {
        Self {
            body: template.body().to_string(),
            created_at: template.created_at(),
            fields: template.fields().to_vec(),
            id: template.id(),
            name: template.name().to_string(),
        }
    }
}

impl ExchangeDocument {
    /// Pretty JSON with sorted keys
    pub fn to_bytes(&self) -> PromptResult<Vec<u8>> {
        debug!(%self.id, "ExchangeDocument::to_bytes: called");
        // Going through Value sorts object keys at every level
        let value = serde_json::to_value(self).map_err(|e| PromptError::Encode(e.to_string()))?;
        let mut bytes = serde_json::to_vec_pretty(&value).map_err(|e| PromptError::Encode(e.to_string()))?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> PromptResult<Self> {
        debug!(len = bytes.len(), "ExchangeDocument::from_bytes: called");
        serde_json::from_slice(bytes).map_err(|e| PromptError::Decode(format!("invalid template document: {}", e)))
    }
}

/// Serialize the selected template; fails before any I/O when nothing is selected
pub fn export_template(selected: Option<&Template>) -> PromptResult<Vec<u8>> {
    let template = selected.ok_or_else(|| PromptError::NotFound("no template selected for export".to_string()))?;
    debug!(template_id = %template.id(), "export_template: called");
    ExchangeDocument::from(template).to_bytes()
}

/// Parse a document into a brand-new template with a fresh ID and timestamp
pub fn import_template(bytes: &[u8]) -> PromptResult<Template> {
    let doc = ExchangeDocument::from_bytes(bytes)?;
    let template = Template::new(doc.name, doc.body, doc.fields)?;
    info!(source_id = %doc.id, template_id = %template.id(), name = %template.name(), "Imported template");
    Ok(template)
}

/// `<template-name>.json`, with path separators replaced
pub fn default_export_filename(template: &Template) -> String {
    let stem: String = template
        .name()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '-' } else { c })
        .collect();
    format!("{}.json", stem)
}
