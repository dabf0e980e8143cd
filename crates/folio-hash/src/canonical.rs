//! Canonical JSON serialization.
//!
//! Canonical form: object keys recursively sorted ascending, arrays keeping
//! their order, compact separators, standard JSON escaping. Two documents
//! that differ only in key insertion order canonicalize to identical bytes.
//!
//! The writer is explicit rather than delegating to `serde_json::to_vec`
//! because map ordering there depends on the `preserve_order` feature, which
//! any crate in the dependency graph can toggle.

use serde_json::Value;

/// Serialize a document to its canonical byte form.
pub fn canonical_json(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<(&String, &Value)> = map.iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            out.push(b'{');
            for (i, (key, item)) in pairs.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_string(key, out);
                out.push(b':');
                write_value(item, out);
            }
            out.push(b'}');
        }
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out);
            }
            out.push(b']');
        }
        scalar => write_scalar(scalar, out),
    }
}

fn write_string(s: &str, out: &mut Vec<u8>) {
    serde_json::to_writer(&mut *out, s).expect("string JSON serialization cannot fail");
}

fn write_scalar(value: &Value, out: &mut Vec<u8>) {
    // Null, bool, number, and string serialization to a Vec is infallible.
    serde_json::to_writer(&mut *out, value).expect("scalar JSON serialization cannot fail");
}
