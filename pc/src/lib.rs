//! PromptCore - template fields, placeholder substitution and exchange documents
//!
//! A [`Template`] is a body with `{{name}}` placeholders plus an ordered list
//! of [`Field`]s. [`generate`] substitutes field values into the body.
//! Templates travel between installations as JSON [`ExchangeDocument`]s and
//! are kept in stores with their field list as an opaque blob
//! ([`encode_fields`] / [`decode_fields`]).
//!
//! # Example
//!
//! ```
//! use promptcore::{Field, FieldInputs, Template, generate};
//!
//! let template = Template::new(
//!     "Greeting",
//!     "Hello {{who}}, signed {{sig}}",
//!     vec![Field::text("who"), Field::fixed("sig", "Bot")],
//! )?;
//! let mut inputs = FieldInputs::new();
//! inputs.set_named(&template, "who", "Ann")?;
//! assert_eq!(generate(&template, inputs.values()), "Hello Ann, signed Bot");
//! # Ok::<(), promptcore::PromptError>(())
//! ```

use chrono::{DateTime, SubsecRound, Utc};

pub mod encoding;
pub mod error;
pub mod exchange;
pub mod field;
pub mod generate;
pub mod history;
pub mod template;

pub use encoding::{decode_fields, encode_fields, try_decode_fields};
pub use error::{PromptError, PromptResult};
pub use exchange::{ExchangeDocument, default_export_filename, export_template, import_template};
pub use field::{Field, FieldKind, FieldType};
pub use generate::{
    FieldInputs, FieldValues, generate, input_fields, missing_inputs, placeholders, unmatched_placeholders,
};
pub use history::HistoryRecord;
pub use template::Template;

/// Current time at microsecond precision, so timestamps survive storage unchanged
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
