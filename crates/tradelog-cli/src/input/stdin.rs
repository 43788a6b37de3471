use serde_json::Value;
use std::io::{self, Read};

/// Journal JSON piped into `tlj`, if any. None when stdin is a terminal or
/// the pipe is empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| format!("tlj: failed to read journal JSON from stdin: {e}"))?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("tlj: stdin is not valid journal JSON: {e}"))?;
    Ok(Some(value))
}
