use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a journal export (`--input <file.json>`) into a typed input.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let file = resolve_path(path)?;
    let contents = fs::read_to_string(&file)
        .map_err(|e| format!("tlj: cannot read '{}': {e}", file.display()))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("tlj: '{}' does not match the expected input: {e}", file.display()))?;
    Ok(value)
}

/// Absolute path to an existing regular file, relative paths taken from the
/// working directory.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let file = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !file.exists() {
        return Err(format!("tlj: input file not found: {}", file.display()).into());
    }
    if !file.is_file() {
        return Err(format!("tlj: input is not a file: {}", file.display()).into());
    }

    Ok(file)
}
