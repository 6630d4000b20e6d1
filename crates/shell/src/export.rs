//! `export` statements for `eval "$(buildenv ...)"`

use crate::keys::is_valid_key;
use buildenv_core::{Error, Output, OutputList, Result};
use std::io::Write;

/// Double-quote `value` for a POSIX shell.
///
/// Inside double quotes only `\`, `"`, `$` and `` ` `` are special.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Comments must stay on their own line under `eval`
fn single_line(comment: &str) -> String {
    comment.replace(['\r', '\n'], " ")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportPrinter {
    comments: bool,
}

impl ExportPrinter {
    #[must_use]
    pub fn new(comments: bool) -> Self {
        Self { comments }
    }

    /// The line for one output, or `None` when nothing is printed for it
    #[must_use]
    pub fn line(&self, output: &Output) -> Option<String> {
        if output.is_comment() {
            return self.comments.then(|| format!("# {}", single_line(&output.comment)));
        }
        if !is_valid_key(&output.key) {
            tracing::debug!(key = %output.key.escape_debug(), "Dropping invalid variable name");
            return None;
        }

        let mut line = format!("export {}={}", output.key, quote(&output.value));
        if self.comments && !output.comment.is_empty() {
            line.push_str(" # ");
            line.push_str(&single_line(&output.comment));
        }
        Some(line)
    }

    pub fn write<W: Write>(&self, outputs: &OutputList, out: &mut W) -> Result<()> {
        for output in outputs {
            if let Some(line) = self.line(output) {
                writeln!(out, "{line}")
                    .map_err(|e| Error::file_system("<stdout>", "write", e))?;
            }
        }
        out.flush()
            .map_err(|e| Error::file_system("<stdout>", "flush", e))
    }
}
