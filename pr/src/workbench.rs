//! Generation workflow
//!
//! The workbench is what a front end talks to. It owns the store and the
//! clipboard and filesystem adapters, and performs the steps around the
//! substitution engine: copy the result, record it in history, clear the
//! input buffer. Export and import go through the exchange codec and the
//! filesystem adapter.

use std::path::{Path, PathBuf};

use promptcore::{
    Field, FieldInputs, HistoryRecord, Template, default_export_filename, export_template, generate, import_template,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clipboard::Clipboard;
use crate::error::{RollError, RollResult};
use crate::files::FileSystem;
use crate::store::Store;

/// Result of one generation
#[derive(Debug, Clone)]
pub struct Generation {
    /// History entry that was recorded; its content is the generated text
    pub record: HistoryRecord,
    /// Why copying to the clipboard failed, if it did
    pub copy_error: Option<String>,
}

impl Generation {
    pub fn content(&self) -> &str {
        self.record.content()
    }

    pub fn copied(&self) -> bool {
        self.copy_error.is_none()
    }
}

pub struct Workbench {
    store: Store,
    clipboard: Box<dyn Clipboard>,
    files: Box<dyn FileSystem>,
}

impl Workbench {
    pub fn new(store: Store, clipboard: Box<dyn Clipboard>, files: Box<dyn FileSystem>) -> Self {
        Self {
            store,
            clipboard,
            files,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // === Templates ===

    pub fn create_template(
        &self,
        name: impl Into<String>,
        body: impl Into<String>,
        fields: Vec<Field>,
    ) -> RollResult<Template> {
        let template = Template::new(name, body, fields)?;
        debug!(id = %template.id(), "Workbench::create_template: called");
        self.store.insert_template(&template)?;
        Ok(template)
    }

    /// Persist in-place edits to a template
    pub fn save_template(&self, template: &Template) -> RollResult<()> {
        debug!(id = %template.id(), "Workbench::save_template: called");
        self.store.update_template(template)
    }

    /// Delete a template; its history stays
    pub fn delete_template(&self, id: Uuid) -> RollResult<()> {
        debug!(%id, "Workbench::delete_template: called");
        if !self.store.delete_template(id)? {
            return Err(RollError::not_found(format!("template {}", id)));
        }
        Ok(())
    }

    pub fn templates(&self) -> RollResult<Vec<Template>> {
        self.store.list_templates()
    }

    /// Find a template by full ID, unique ID prefix, or exact name
    pub fn resolve_template(&self, reference: &str) -> RollResult<Template> {
        debug!(%reference, "Workbench::resolve_template: called");
        let templates = self.store.list_templates()?;
        resolve(
            templates,
            reference,
            |t| t.id(),
            |t, r| t.name() == r,
            "template",
        )
    }

    // === Generation ===

    /// Generate text from `inputs`, copy it, record it and clear the inputs
    ///
    /// A clipboard failure does not undo the generation; it is returned in
    /// [`Generation::copy_error`].
    pub fn generate(&self, template: &Template, inputs: &mut FieldInputs) -> RollResult<Generation> {
        debug!(id = %template.id(), "Workbench::generate: called");
        let content = generate(template, inputs.values());

        let copy_error = match self.clipboard.set_text(&content) {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "Copy to clipboard failed");
                Some(e.to_string())
            }
        };

        let record = HistoryRecord::new(template, content);
        self.store.insert_history(&record)?;
        inputs.clear();
        info!(template = %template.name(), history = %record.id(), "Generated prompt");
        Ok(Generation { record, copy_error })
    }

    // === History ===

    pub fn history(&self) -> RollResult<Vec<HistoryRecord>> {
        self.store.list_history()
    }

    /// Find a history record by full ID or unique ID prefix
    pub fn resolve_history(&self, reference: &str) -> RollResult<HistoryRecord> {
        debug!(%reference, "Workbench::resolve_history: called");
        let records = self.store.list_history()?;
        resolve(records, reference, |r| r.id(), |_, _| false, "history record")
    }

    /// Put a past result back on the clipboard
    pub fn copy_history(&self, id: Uuid) -> RollResult<HistoryRecord> {
        debug!(%id, "Workbench::copy_history: called");
        let record = self
            .store
            .get_history(id)?
            .ok_or_else(|| RollError::not_found(format!("history record {}", id)))?;
        self.clipboard.set_text(record.content())?;
        Ok(record)
    }

    pub fn delete_history(&self, id: Uuid) -> RollResult<()> {
        debug!(%id, "Workbench::delete_history: called");
        if !self.store.delete_history(id)? {
            return Err(RollError::not_found(format!("history record {}", id)));
        }
        Ok(())
    }

    // === Exchange ===

    /// Write the selected template to `destination`
    ///
    /// A directory destination (or none, meaning `export_dir`) gets the
    /// default `<name>.json` file name. Nothing is written when no template
    /// is selected.
    pub fn export_template(
        &self,
        selected: Option<&Template>,
        destination: Option<&Path>,
        export_dir: &Path,
    ) -> RollResult<PathBuf> {
        let template = selected.ok_or_else(|| RollError::not_found("no template selected for export"))?;
        let bytes = export_template(Some(template))?;
        let path = match destination {
            Some(path) if path.is_dir() => path.join(default_export_filename(template)),
            Some(path) => path.to_path_buf(),
            None => export_dir.join(default_export_filename(template)),
        };
        debug!(?path, "Workbench::export_template: writing");
        self.files.write_file(&path, &bytes)?;
        info!(id = %template.id(), ?path, "Exported template");
        Ok(path)
    }

    /// Read a template document and add it as a new template
    pub fn import_template(&self, source: &Path) -> RollResult<Template> {
        debug!(?source, "Workbench::import_template: called");
        let bytes = self.files.read_file(source)?;
        let template = import_template(&bytes)?;
        self.store.insert_template(&template)?;
        Ok(template)
    }
}

fn resolve<T>(
    items: Vec<T>,
    reference: &str,
    id_of: impl Fn(&T) -> Uuid,
    name_matches: impl Fn(&T, &str) -> bool,
    kind: &str,
) -> RollResult<T> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(RollError::invalid(format!("empty {} reference", kind)));
    }

    if let Ok(id) = Uuid::parse_str(reference) {
        return items
            .into_iter()
            .find(|item| id_of(item) == id)
            .ok_or_else(|| RollError::not_found(format!("{} {}", kind, id)));
    }

    let lowered = reference.to_lowercase();
    let mut by_name: Vec<T> = Vec::new();
    let mut by_prefix: Vec<T> = Vec::new();
    for item in items {
        if name_matches(&item, reference) {
            by_name.push(item);
        } else if id_of(&item).to_string().starts_with(&lowered) {
            by_prefix.push(item);
        }
    }

    let mut candidates = if by_name.is_empty() { by_prefix } else { by_name };
    if candidates.len() > 1 {
        return Err(RollError::invalid(format!(
            "'{}' matches {} {}s, use a longer ID",
            reference,
            candidates.len(),
            kind
        )));
    }
    candidates
        .pop()
        .ok_or_else(|| RollError::not_found(format!("{} '{}'", kind, reference)))
}
