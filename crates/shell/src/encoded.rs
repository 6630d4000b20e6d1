//! Base64 JSON transport of resolved variables
//!
//! The whole key/value map travels as one shell-safe token, so a parent
//! process can hand resolved variables to a child without a shared file.

use base64::{engine::general_purpose::STANDARD, Engine};
use buildenv_core::{Error, OutputList, Result};
use std::collections::BTreeMap;
use std::io::Write;

/// Encode variables as base64(JSON object). Comments are dropped and the last
/// output for a repeated key wins.
pub fn encode(outputs: &OutputList) -> Result<String> {
    let map: BTreeMap<&str, &str> = outputs
        .variables()
        .map(|output| (output.key.as_str(), output.value.as_str()))
        .collect();

    let json = serde_json::to_vec(&map)?;
    Ok(STANDARD.encode(json))
}

pub fn write_encoded<W: Write>(outputs: &OutputList, out: &mut W) -> Result<()> {
    let encoded = encode(outputs)?;
    writeln!(out, "{encoded}").map_err(|e| Error::file_system("<stdout>", "write", e))
}
