//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use promptcore::Field;
use std::path::PathBuf;
use tracing::debug;

/// PromptRoll - reusable prompt templates
#[derive(Parser, Debug)]
#[command(
    name = "pr",
    author,
    version,
    about = "Fill in reusable prompt templates and copy the result",
    long_about = None
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage templates
    Template {
        #[command(subcommand)]
        command: TemplateCommand,
    },

    /// Fill in a template, print the result and copy it to the clipboard
    Generate {
        /// Template ID, ID prefix or name
        template: String,

        /// Field value as NAME=VALUE (repeatable)
        #[arg(short = 's', long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        values: Vec<(String, String)>,

        /// Print only, leave the clipboard alone
        #[arg(long)]
        no_copy: bool,

        /// Refuse to generate while an input field has no value
        #[arg(long)]
        strict: bool,
    },

    /// Browse past generations
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// List templates, newest first
    List,

    /// Show a template's body and fields
    Show {
        /// Template ID, ID prefix or name
        template: String,
    },

    /// Create a template
    New {
        /// Template name
        #[arg(short, long)]
        name: String,

        /// Body text with {{field}} placeholders
        #[arg(short, long, conflicts_with = "body_file", required_unless_present = "body_file")]
        body: Option<String>,

        /// Read the body from a file
        #[arg(long, value_name = "PATH")]
        body_file: Option<PathBuf>,

        /// Field as NAME:text, NAME:link, NAME:radio=A|B or NAME:fixed=VALUE (repeatable)
        #[arg(short, long = "field", value_name = "FIELD", value_parser = parse_field_arg)]
        fields: Vec<Field>,
    },

    /// Edit a template in place
    Edit {
        /// Template ID, ID prefix or name
        template: String,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New body
        #[arg(short, long, conflicts_with = "body_file")]
        body: Option<String>,

        /// Read the new body from a file
        #[arg(long, value_name = "PATH")]
        body_file: Option<PathBuf>,

        /// Remove all existing fields before adding
        #[arg(long)]
        clear_fields: bool,

        /// Remove the field with this name (repeatable)
        #[arg(long = "remove-field", value_name = "NAME")]
        remove_fields: Vec<String>,

        /// Append a field, same syntax as `new --field` (repeatable)
        #[arg(long = "add-field", value_name = "FIELD", value_parser = parse_field_arg)]
        add_fields: Vec<Field>,
    },

    /// Delete a template (its history is kept)
    Delete {
        /// Template ID, ID prefix or name
        template: String,
    },

    /// Write a template to a JSON file
    Export {
        /// Template ID, ID prefix or name
        template: String,

        /// Output file or directory (default: <export-dir>/<name>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Add a template from a JSON file
    Import {
        /// File written by `template export`
        path: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List past generations, newest first
    List {
        /// Only show generations of this template name
        #[arg(short, long)]
        template: Option<String>,
    },

    /// Print a generation's full content
    Show {
        /// History ID or ID prefix
        id: String,
    },

    /// Copy a past generation to the clipboard again
    Copy {
        /// History ID or ID prefix
        id: String,
    },

    /// Delete a history entry
    Delete {
        /// History ID or ID prefix
        id: String,
    },
}

/// Parse `NAME=VALUE`
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    debug!(%s, "parse_assignment: called");
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    if name.is_empty() {
        return Err(format!("missing field name in '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Parse a field definition: `NAME:text`, `NAME:link`, `NAME:radio=A|B`, `NAME:fixed=VALUE`
///
/// A bare `NAME` is a text field. Names cannot contain `:`; values can.
pub fn parse_field_arg(s: &str) -> Result<Field, String> {
    debug!(%s, "parse_field_arg: called");
    let (name, spec) = s.split_once(':').unwrap_or((s, "text"));
    let (kind, arg) = match spec.split_once('=') {
        Some((kind, arg)) => (kind, Some(arg)),
        None => (spec, None),
    };

    let field = match (kind, arg) {
        ("text", None) => Field::text(name),
        ("link", None) => Field::link(name),
        ("radio", Some(options)) => Field::radio(name, options.split('|').map(str::trim)),
        ("fixed", Some(value)) => Field::fixed(name, value),
        ("radio", None) => return Err(format!("radio field '{}' needs options: {}:radio=A|B", name, name)),
        ("fixed", None) => return Err(format!("fixed field '{}' needs a value: {}:fixed=VALUE", name, name)),
        ("text" | "link", Some(_)) => return Err(format!("{} fields take no value: '{}'", kind, s)),
        (other, _) => {
            return Err(format!(
                "unknown field type '{}' (expected text, link, radio or fixed)",
                other
            ));
        }
    };
    field.validate().map_err(|e| e.to_string())?;
    Ok(field)
}
