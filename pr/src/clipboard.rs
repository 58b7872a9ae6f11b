//! Clipboard adapters
//!
//! The system clipboard is reached through the platform's copy command
//! (`pbcopy`, `wl-copy`, `xclip`, `clip`), fed through stdin.

use std::cell::RefCell;
use std::io::Write;
use std::process::{Command, Stdio};
use std::rc::Rc;

use tracing::debug;

use crate::error::{RollError, RollResult};

/// Something that can take text and make it the current clipboard content
pub trait Clipboard {
    fn set_text(&self, text: &str) -> RollResult<()>;
}

/// Copies by piping text into an external command
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    program: String,
    args: Vec<String>,
}

impl SystemClipboard {
    /// Use an explicit command line, e.g. `["xsel", "--clipboard", "--input"]`
    pub fn with_command(argv: &[String]) -> RollResult<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| RollError::invalid("clipboard command must not be empty"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// The copy command for the current platform
    pub fn detect() -> Self {
        let argv: &[&str] = if cfg!(target_os = "macos") {
            &["pbcopy"]
        } else if cfg!(windows) {
            &["clip"]
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            &["wl-copy"]
        } else {
            &["xclip", "-selection", "clipboard"]
        };
        debug!(?argv, "SystemClipboard::detect: selected command");
        Self {
            program: argv[0].to_string(),
            args: argv[1..].iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> RollResult<()> {
        debug!(program = %self.program, len = text.len(), "SystemClipboard::set_text: called");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| RollError::Clipboard(format!("failed to run {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(RollError::Clipboard(format!("failed to write to {}: {}", self.program, e)));
            }
        }

        let status = child
            .wait()
            .map_err(|e| RollError::Clipboard(format!("failed to wait for {}: {}", self.program, e)))?;
        if !status.success() {
            return Err(RollError::Clipboard(format!("{} exited with {}", self.program, status)));
        }
        Ok(())
    }
}

/// Keeps the last copied text in memory; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    last: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<String> {
        self.last.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&self, text: &str) -> RollResult<()> {
        debug!(len = text.len(), "MemoryClipboard::set_text: called");
        *self.last.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}
