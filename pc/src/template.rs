//! Template model
//!
//! A template is a named body with `{{name}}` placeholders and the ordered
//! list of fields that fill them. Field order is form order.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{PromptError, PromptResult};
use crate::field::Field;
use crate::now;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    id: Uuid,
    name: String,
    body: String,
    fields: Vec<Field>,
    created_at: DateTime<Utc>,
}

impl Template {
    /// Create a new template with a generated ID
    ///
    /// Name and body must be non-empty and every field must pass
    /// [`Field::validate`].
    pub fn new(name: impl Into<String>, body: impl Into<String>, fields: Vec<Field>) -> PromptResult<Self> {
        let name = name.into();
        let body = body.into();
        debug!(%name, field_count = fields.len(), "Template::new: called");
        validate_name(&name)?;
        validate_body(&body)?;
        for field in &fields {
            field.validate()?;
        }
        Ok(Self {
            id: Uuid::now_v7(),
            name,
            body,
            fields,
            created_at: now(),
        })
    }

    /// Rebuild a template from stored parts without re-validating
    pub fn from_parts(
        id: Uuid,
        name: impl Into<String>,
        body: impl Into<String>,
        fields: Vec<Field>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            body: body.into(),
            fields,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Look up a field by ID
    pub fn field(&self, id: Uuid) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Look up the first field with the given name
    pub fn field_named(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> PromptResult<()> {
        let name = name.into();
        debug!(%self.id, %name, "Template::set_name: called");
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_body(&mut self, body: impl Into<String>) -> PromptResult<()> {
        let body = body.into();
        debug!(%self.id, "Template::set_body: called");
        validate_body(&body)?;
        self.body = body;
        Ok(())
    }

    /// Replace the whole field list
    pub fn set_fields(&mut self, fields: Vec<Field>) -> PromptResult<()> {
        debug!(%self.id, field_count = fields.len(), "Template::set_fields: called");
        for field in &fields {
            field.validate()?;
        }
        self.fields = fields;
        Ok(())
    }

    /// Append a field at the end of the form
    pub fn add_field(&mut self, field: Field) -> PromptResult<()> {
        debug!(%self.id, %field.name, "Template::add_field: called");
        field.validate()?;
        self.fields.push(field);
        Ok(())
    }

    /// Swap in an edited field, keeping its position
    pub fn replace_field(&mut self, field: Field) -> PromptResult<()> {
        debug!(%self.id, %field.id, "Template::replace_field: called");
        field.validate()?;
        let slot = self
            .fields
            .iter_mut()
            .find(|f| f.id == field.id)
            .ok_or_else(|| PromptError::NotFound(format!("field {}", field.id)))?;
        *slot = field;
        Ok(())
    }

    /// Remove a field, returning it if it existed
    pub fn remove_field(&mut self, id: Uuid) -> Option<Field> {
        debug!(%self.id, %id, "Template::remove_field: called");
        let pos = self.fields.iter().position(|f| f.id == id)?;
        let field = self.fields.remove(pos);
        info!(template = %self.id, field = %field.name, "Removed field");
        Some(field)
    }
}

fn validate_name(name: &str) -> PromptResult<()> {
    if name.is_empty() {
        return Err(PromptError::Invalid("template name must not be empty".to_string()));
    }
    Ok(())
}

fn validate_body(body: &str) -> PromptResult<()> {
    if body.is_empty() {
        return Err(PromptError::Invalid("template body must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greeting() -> Template {
        Template::new(
            "Greeting",
            "Hello {{who}}, signed {{sig}}",
            vec![Field::text("who"), Field::fixed("sig", "Bot")],
        )
        .unwrap()
    }

    #[test]
    fn test_new_template() {
        let t = greeting();
        assert_eq!(t.name(), "Greeting");
        assert_eq!(t.fields().len(), 2);
        assert_eq!(t.fields()[0].name, "who");
        assert!(t.created_at() <= now());
    }

    #[test]
    fn test_new_rejects_empty_name_and_body() {
        assert!(matches!(Template::new("", "body", vec![]), Err(PromptError::Invalid(_))));
        assert!(matches!(Template::new("name", "", vec![]), Err(PromptError::Invalid(_))));
    }

    #[test]
    fn test_new_rejects_invalid_field() {
        let result = Template::new("t", "{{sig}}", vec![Field::fixed("sig", "")]);
        assert!(matches!(result, Err(PromptError::Invalid(_))));
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(greeting().id(), greeting().id());
    }

    #[test]
    fn test_edit_in_place_keeps_identity() {
        let mut t = greeting();
        let id = t.id();
        let created = t.created_at();
        t.set_name("Hi").unwrap();
        t.set_body("Hi {{who}}").unwrap();
        assert_eq!(t.id(), id);
        assert_eq!(t.created_at(), created);
        assert_eq!(t.name(), "Hi");
        assert!(t.set_name("").is_err());
        assert_eq!(t.name(), "Hi");
    }

    #[test]
    fn test_field_editing() {
        let mut t = greeting();
        t.add_field(Field::radio("tone", ["warm", "cold"])).unwrap();
        assert_eq!(t.fields().len(), 3);
        assert_eq!(t.fields()[2].name, "tone");

        let who = t.field_named("who").unwrap().clone();
        let renamed = Field::link("url").with_id(who.id);
        t.replace_field(renamed).unwrap();
        assert_eq!(t.fields()[0].name, "url");
        assert_eq!(t.field(who.id).unwrap().name, "url");

        let removed = t.remove_field(who.id).unwrap();
        assert_eq!(removed.name, "url");
        assert!(t.remove_field(who.id).is_none());
        assert_eq!(t.fields().len(), 2);
    }

    #[test]
    fn test_replace_unknown_field() {
        let mut t = greeting();
        let result = t.replace_field(Field::text("x"));
        assert!(matches!(result, Err(PromptError::NotFound(_))));
    }
}
