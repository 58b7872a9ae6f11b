//! History records
//!
//! A record is a snapshot of one generation. It refers to its template by ID
//! only and copies the template name, so it outlives renames and deletion.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::now;
use crate::template::Template;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    id: Uuid,
    template_id: Uuid,
    template_name: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Record a generation of `template` that produced `content`
    pub fn new(template: &Template, content: impl Into<String>) -> Self {
        debug!(template_id = %template.id(), "HistoryRecord::new: called");
        Self {
            id: Uuid::now_v7(),
            template_id: template.id(),
            template_name: template.name().to_string(),
            content: content.into(),
            created_at: now(),
        }
    }

    /// Rebuild a record from stored parts
    pub fn from_parts(
        id: Uuid,
        template_id: Uuid,
        template_name: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            template_id,
            template_name: template_name.into(),
            content: content.into(),
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn template_id(&self) -> Uuid {
        self.template_id
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// First line of the content, shortened to `max_chars`
    pub fn preview(&self, max_chars: usize) -> String {
        let line = self.content.lines().next().unwrap_or("");
        if line.chars().count() > max_chars {
            let cut: String = line.chars().take(max_chars).collect();
            format!("{}…", cut)
        } else {
            line.to_string()
        }
    }
}
