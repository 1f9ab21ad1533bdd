use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as a table using the tabled crate.
///
/// Valuation results nest one level deep (one-off costs, financing, the
/// investment or owner-occupied branch); sections are flattened into
/// `section.field` rows and the sensitivity grid gets its own table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            // The computation envelope holds the primary data under "result"
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
    if let Value::Object(res_map) = result {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        let mut grids: Vec<(String, &Vec<Value>)> = Vec::new();
        push_flattened(&mut builder, &mut grids, "", res_map);
        let table = Table::from(builder);
        println!("{}", table);

        for (name, grid) in grids {
            println!("\n{}:", name);
            print_array_table(grid);
        }
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

/// Walk one object, flattening nested sections into `prefix.field` rows and
/// collecting arrays of objects for separate tables.
fn push_flattened<'a>(
    builder: &mut Builder,
    grids: &mut Vec<(String, &'a Vec<Value>)>,
    prefix: &str,
    map: &'a serde_json::Map<String, Value>,
) {
    for (key, val) in map {
        let label = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => push_flattened(builder, grids, &label, inner),
            Value::Array(arr) if arr.first().map_or(false, |v| v.is_object()) => {
                grids.push((label, arr));
            }
            other => {
                builder.push_record([label.as_str(), &format_value(other)]);
            }
        }
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        let mut grids = Vec::new();
        push_flattened(&mut builder, &mut grids, "", map);
        let table = Table::from(builder);
        println!("{}", table);

        for (name, grid) in grids {
            println!("\n{}:", name);
            print_array_table(grid);
        }
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
