use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as tables using the tabled crate.
///
/// Scalar fields of the result render as a field/value table; nested
/// arrays of objects (the payment ledger, yearly rollups, buydown
/// scenarios) render as their own column tables underneath.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_warnings(map);
                if let Some(Value::String(meth)) = map.get("methodology") {
                    println!("\nMethodology: {}", meth);
                }
            } else {
                print_result(value);
            }
        }
        Value::Array(arr) => print_rows("", arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    let Value::Object(map) = result else {
        println!("{}", result);
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut scalar_count = 0;
    for (key, val) in map {
        if !matches!(val, Value::Array(_) | Value::Object(_)) {
            builder.push_record([key.as_str(), &scalar(val)]);
            scalar_count += 1;
        }
    }
    if scalar_count > 0 {
        println!("{}", Table::from(builder));
    }

    // Nested sections after the scalars.
    for (key, val) in map {
        match val {
            Value::Array(rows) => print_rows(key, rows),
            Value::Object(_) => {
                println!("\n{}:", key);
                print_result(val);
            }
            _ => {}
        }
    }
}

fn print_rows(label: &str, rows: &[Value]) {
    if rows.is_empty() {
        return;
    }
    if !label.is_empty() {
        println!("\n{}:", label);
    }

    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            println!("{}", scalar(row));
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(scalar).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_warnings(envelope: &serde_json::Map<String, Value>) {
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
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "—".to_string(),
        other => other.to_string(),
    }
}
