//! PromptRoll - reusable prompt templates with fill-in fields
//!
//! Templates live in a SQLite [`Store`]. A [`Workbench`] fills them in with
//! the `promptcore` substitution engine, copies the result through a
//! [`Clipboard`] and records it in history. Templates are exchanged as JSON
//! files through a [`FileSystem`].
//!
//! # Example
//!
//! ```
//! use promptroll::{LocalFileSystem, MemoryClipboard, Store, Workbench};
//! use promptcore::{Field, FieldInputs};
//!
//! let clipboard = MemoryClipboard::new();
//! let bench = Workbench::new(Store::open_in_memory()?, Box::new(clipboard.clone()), Box::new(LocalFileSystem));
//! let template = bench.create_template("Greeting", "Hello {{who}}", vec![Field::text("who")])?;
//!
//! let mut inputs = FieldInputs::new();
//! inputs.set_named(&template, "who", "Ann")?;
//! bench.generate(&template, &mut inputs)?;
//! assert_eq!(clipboard.text().as_deref(), Some("Hello Ann"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod files;
pub mod store;
pub mod workbench;

pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use config::{ClipboardConfig, Config};
pub use error::{RollError, RollResult};
pub use files::{FileSystem, LocalFileSystem};
pub use store::Store;
pub use workbench::{Generation, Workbench};
