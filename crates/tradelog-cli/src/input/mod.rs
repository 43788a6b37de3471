pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a typed input from `--input <file>`, falling back to piped stdin.
pub fn load<T: DeserializeOwned>(
    path: &Option<String>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(ref path) = path {
        file::read_json(path)
    } else if let Some(data) = stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err(format!("--input <file.json> or stdin required for {what}").into())
    }
}
