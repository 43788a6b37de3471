use chrono::{Datelike, NaiveDate};
use serde_json::Value;
use tabled::{Table, builder::Builder};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            // Check if "result" key holds the primary data
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    // Print the result section
    if let Some(Value::Array(weeks)) = result.get("weeks") {
        print_month_grid(weeks);
    } else if let Value::Object(res_map) = result {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in res_map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    } else {
        print_flat_object(&Value::Object(envelope.clone()));
    }

    // Print warnings if any
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    // Print methodology
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Calendar layout for month grids and month views, Monday first.
fn print_month_grid(weeks: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun", "Week"]);
    for week in weeks {
        let (cells, total) = match week {
            Value::Array(cells) => (cells.clone(), None),
            Value::Object(row) => (
                row.get("cells")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
                row.get("net_pnl"),
            ),
            _ => continue,
        };
        let mut record: Vec<String> = cells.iter().map(grid_cell).collect();
        record.push(total.map(format_value).unwrap_or_default());
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn grid_cell(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(date) => day_of_month(date),
        Value::Object(day) => {
            let date = day
                .get("date")
                .and_then(Value::as_str)
                .map(day_of_month)
                .unwrap_or_default();
            match day.get("net_pnl").and_then(Value::as_str) {
                Some(pnl) => format!("{date}\n{pnl}"),
                None => date,
            }
        }
        other => format_value(other),
    }
}

fn day_of_month(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.day().to_string())
        .unwrap_or_else(|_| date.to_string())
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Collect all keys from first object for headers
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_value(v))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        let table = Table::from(builder);
        println!("{}", table);
    } else {
        // Simple array of values
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(|v| format_value(v)).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
