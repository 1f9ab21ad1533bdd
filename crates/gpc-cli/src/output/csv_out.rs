use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// Objects flatten to two-column `field,value` rows with dotted paths for
/// nested sections; the sensitivity grid (an array of objects) is emitted as
/// its own block with one row per cell.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let target = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            let _ = wtr.write_record(["field", "value"]);
            let mut grids: Vec<(String, &Vec<Value>)> = Vec::new();
            write_flattened(&mut wtr, &mut grids, "", target);
            for (_, grid) in grids {
                write_array_csv(&mut wtr, grid);
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_flattened<'a>(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
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
            Value::Object(inner) => write_flattened(wtr, grids, &label, inner),
            Value::Array(arr) if arr.first().map_or(false, |v| v.is_object()) => {
                grids.push((label, arr));
            }
            other => {
                let _ = wtr.write_record([label.as_str(), &format_csv_value(other)]);
            }
        }
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    // Extract headers from first object
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(*h)
                            .map(|v| format_csv_value(v))
                            .unwrap_or_default()
                    })
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
