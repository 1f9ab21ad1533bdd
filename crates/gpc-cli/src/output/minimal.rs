use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: look for the headline valuation figures in order of priority,
/// then fall back to the first scalar field in the result object.
pub fn print_minimal(value: &Value) {
    // Try to extract the "result" envelope
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Headline figures: investment runs lead with cash-on-cash ROI,
    // owner-occupied runs with the annual running-cost total
    let priority_paths = [
        "/investment/cash_on_cash_pct",
        "/investment/net_yield_pct",
        "/owner_occupied/annual_total_running_costs",
        "/owner_occupied/monthly_running_costs",
        "/one_off_costs/upfront_costs",
    ];

    for path in &priority_paths {
        if let Some(val) = result_obj.pointer(path) {
            if !val.is_null() {
                println!("{}", format_minimal(val));
                return;
            }
        }
    }

    if let Value::Object(map) = result_obj {
        // Fall back to the first scalar field
        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_object() && !v.is_array()) {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    // Not an object, just print directly
    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
