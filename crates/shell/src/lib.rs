//! Output sinks for buildenv
//!
//! Every sink consumes a resolved [`OutputList`](buildenv_core::OutputList):
//!
//! - [`ExportPrinter`] prints `export KEY="VALUE"` statements for `eval`
//! - [`encode`] packs the variables into one base64 JSON token
//! - [`ExecSink`] runs a shell command with the variables in its environment
//!
//! Keys that are not valid shell identifiers never reach a shell: the export
//! printer and exec sink both drop them.

pub mod encoded;
pub mod exec;
pub mod export;
pub mod keys;

pub use encoded::{encode, write_encoded};
pub use exec::ExecSink;
pub use export::{quote, ExportPrinter};
pub use keys::is_valid_key;
