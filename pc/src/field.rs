//! Template fields and the field type taxonomy
//!
//! A field is one named variable of a template. Its kind decides where the
//! substituted value comes from:
//!
//! | Kind  | Presented for input | Value source                  |
//! |-------|---------------------|-------------------------------|
//! | Text  | yes                 | user entered text             |
//! | Link  | yes                 | user entered URL              |
//! | Radio | yes                 | selected option, or empty     |
//! | Fixed | no                  | the fixed value, always       |

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{PromptError, PromptResult};

/// Wire name of a field kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Link,
    Radio,
    Fixed,
}

impl FieldType {
    /// All variants, in display order
    pub const ALL: [FieldType; 4] = [Self::Text, Self::Link, Self::Radio, Self::Fixed];

    /// Literal used in exchange documents and persisted blobs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Link => "link",
            Self::Radio => "radio",
            Self::Fixed => "fixed",
        }
    }

    /// Human readable label for listings
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Link => "Link",
            Self::Radio => "Choice",
            Self::Fixed => "Fixed value",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "FieldType::from_str: called");
        match s {
            "text" => Ok(Self::Text),
            "link" => Ok(Self::Link),
            "radio" => Ok(Self::Radio),
            "fixed" => Ok(Self::Fixed),
            other => Err(PromptError::Decode(format!("unknown field type '{}'", other))),
        }
    }
}

/// Field kind together with the data only that kind carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Link,
    Radio { options: Vec<String> },
    Fixed { value: String },
}

impl FieldKind {
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Text => FieldType::Text,
            Self::Link => FieldType::Link,
            Self::Radio { .. } => FieldType::Radio,
            Self::Fixed { .. } => FieldType::Fixed,
        }
    }
}

/// One named variable of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "FieldRecord", from = "FieldRecord")]
pub struct Field {
    /// Stable identifier, survives renames
    pub id: Uuid,
    /// Display label and substitution key
    pub name: String,
    pub kind: FieldKind,
}

impl Field {
    /// Create a field with a generated ID
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        debug!(%name, ?kind, "Field::new: called");
        Self {
            id: Uuid::now_v7(),
            name,
            kind,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn link(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Link)
    }

    /// Radio field; blank options are dropped
    pub fn radio<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = options
            .into_iter()
            .map(Into::into)
            .filter(|o: &String| !o.is_empty())
            .collect();
        Self::new(name, FieldKind::Radio { options })
    }

    pub fn fixed(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Fixed { value: value.into() })
    }

    /// Builder method to keep a known ID
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    /// Options of a radio field, empty for every other kind
    pub fn options(&self) -> &[String] {
        match &self.kind {
            FieldKind::Radio { options } => options,
            _ => &[],
        }
    }

    /// Value of a fixed field, empty for every other kind
    pub fn default_value(&self) -> &str {
        match &self.kind {
            FieldKind::Fixed { value } => value,
            _ => "",
        }
    }

    /// Whether the user is asked for a value (everything except Fixed)
    pub fn is_input(&self) -> bool {
        !matches!(self.kind, FieldKind::Fixed { .. })
    }

    /// The `{{name}}` token this field replaces
    pub fn placeholder(&self) -> String {
        format!("{{{{{}}}}}", self.name)
    }

    /// Check the conditions the editor requires before a field can be saved
    pub fn validate(&self) -> PromptResult<()> {
        debug!(%self.id, %self.name, "Field::validate: called");
        if self.name.is_empty() {
            return Err(PromptError::Invalid("field name must not be empty".to_string()));
        }
        match &self.kind {
            FieldKind::Radio { options } if options.iter().all(|o| o.is_empty()) => Err(PromptError::Invalid(
                format!("radio field '{}' needs at least one option", self.name),
            )),
            FieldKind::Fixed { value } if value.is_empty() => Err(PromptError::Invalid(format!(
                "fixed field '{}' needs a value",
                self.name
            ))),
            _ => Ok(()),
        }
    }
}

/// Flat representation shared by exchange documents and persisted blobs.
///
/// Keys are declared in lexicographic order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FieldRecord {
    pub default_value: String,
    pub id: Uuid,
    pub name: String,
    pub options: Vec<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl From<Field> for FieldRecord {
    fn from(field: Field) -> Self {
        let field_type = field.field_type();
        let (options, default_value) = match field.kind {
            FieldKind::Radio { options } => (options, String::new()),
            FieldKind::Fixed { value } => (Vec::new(), value),
            FieldKind::Text | FieldKind::Link => (Vec::new(), String::new()),
        };
        Self {
            default_value,
            id: field.id,
            name: field.name,
            options,
            field_type,
        }
    }
}

impl From<FieldRecord> for Field {
    /// The attribute that does not belong to the record's type is ignored
    fn from(record: FieldRecord) -> Self {
        let kind = match record.field_type {
            FieldType::Text => FieldKind::Text,
            FieldType::Link => FieldKind::Link,
            FieldType::Radio => FieldKind::Radio {
                options: record.options,
            },
            FieldType::Fixed => FieldKind::Fixed {
                value: record.default_value,
            },
        };
        Self {
            id: record.id,
            name: record.name,
            kind,
        }
    }
}
