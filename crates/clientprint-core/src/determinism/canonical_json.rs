//! Canonical JSON encoding for clientprint.
//!
//! Rules:
//! - compact output (no whitespace)
//! - object keys are emitted in insertion order, which for typed models is field
//!   declaration order; keys are never sorted
//! - strings use standard JSON escaping
//! - numbers use one canonical decimal form (see `format_number`)
//!
//! Two structurally identical records always encode to identical bytes.

use serde_json::{Number, Value};

use crate::errors::ClientprintResult;
use crate::model::SignalRecord;

/// Encode a record into its canonical byte form.
pub fn to_canonical_bytes(record: &SignalRecord) -> ClientprintResult<Vec<u8>> {
    let value = record.to_value()?;
    value_to_canonical_bytes(&value)
}

/// Encode an arbitrary structured value into canonical bytes.
pub fn value_to_canonical_bytes(value: &Value) -> ClientprintResult<Vec<u8>> {
    Ok(canonical_json_string(value)?.into_bytes())
}

/// Canonical encoding as a `String`.
pub fn canonical_json_string(value: &Value) -> ClientprintResult<String> {
    let mut out = String::with_capacity(512);
    write_value(&mut out, value)?;
    Ok(out)
}

fn write_value(out: &mut String, value: &Value) -> ClientprintResult<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&canonical_number(n)),
        Value::String(s) => out.push_str(&serde_json::to_string(s)?),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(k)?);
                out.push(':');
                write_value(out, v)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn canonical_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => format_number(f),
        _ => "null".to_string(),
    }
}

/// Render a float in its canonical decimal form.
///
/// - integral values below 1e21 have no fractional part (`44100`, `-50`)
/// - `-0` renders as `0`
/// - other values use the shortest string that round-trips, switching to
///   exponent form below 1e-6 and at or above 1e21 (`1e-7`, `1.5e+21`)
/// - non-finite values render as `NaN`, `Infinity`, `-Infinity`
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }

    let abs = v.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let s = format!("{v:e}");
        return match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        };
    }

    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn keys_keep_insertion_order() {
        let v = json!({ "b": 1, "a": { "y": 2, "x": 1 } });
        assert_eq!(canonical_json_string(&v).unwrap(), r#"{"b":1,"a":{"y":2,"x":1}}"#);
    }

    #[test]
    fn canonical_is_stable() {
        let v = json!({ "s": "q\"uote", "n": [1.5, -50.0, 44100.0], "z": null, "t": true });
        let c1 = value_to_canonical_bytes(&v).unwrap();
        let c2 = value_to_canonical_bytes(&v).unwrap();
        assert_eq!(c1, c2);
        assert_eq!(
            String::from_utf8(c1).unwrap(),
            r#"{"s":"q\"uote","n":[1.5,-50,44100],"z":null,"t":true}"#
        );
    }

    #[test]
    fn number_forms() {
        assert_eq!(format_number(44100.0), "44100");
        assert_eq!(format_number(-50.0), "-50");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e21), "1.5e+21");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }
}
