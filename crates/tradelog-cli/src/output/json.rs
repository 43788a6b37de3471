use serde_json::Value;

/// Pretty-printed envelope on stdout; the default `--output json`.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("tlj: could not render result as JSON: {e}"),
    }
}
