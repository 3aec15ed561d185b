//! Canonical JSON serialization for the RVA registry.
//!
//! Canonical JSON rules enforced here:
//! - Object keys are sorted lexicographically at every nesting level
//! - Arrays preserve order
//! - Strings use standard JSON escaping, UTF-8
//! - Numbers preserve the input's representation; `-0` is normalized to `0`
//! - No insignificant whitespace, no trailing newline
//!
//! Round-trip property: `canonicalize(parse(canonicalize(x))) == canonicalize(x)`.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::errors::{RvaError, RvaResult};

/// Canonicalize a JSON value recursively: sort object keys at every level,
/// normalize `-0`/`-0.0` to `0`, leave arrays and strings untouched.
pub fn canonicalize(value: &Value) -> RvaResult<Value> {
    match value {
        Value::Object(map) => canonicalize_object(map),
        Value::Array(arr) => {
            let mut out = Vec::with_capacity(arr.len());
            for v in arr {
                out.push(canonicalize(v)?);
            }
            Ok(Value::Array(out))
        }
        Value::Number(n) => Ok(Value::Number(normalize_number(n))),
        _ => Ok(value.clone()),
    }
}

fn canonicalize_object(map: &Map<String, Value>) -> RvaResult<Value> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    let mut out = Map::new();
    for k in keys {
        let v = map
            .get(k)
            .ok_or_else(|| RvaError::Canonicalization("key disappeared during canonicalization".into()))?;
        out.insert(k.clone(), canonicalize(v)?);
    }

    Ok(Value::Object(out))
}

/// `-0` and `-0.0` canonicalize to `0`; every other number is passed through
/// unchanged so the input's exact lossless representation survives.
fn normalize_number(n: &Number) -> Number {
    if let Some(i) = n.as_i64() {
        if i == 0 {
            return Number::from(0);
        }
    }
    if let Some(f) = n.as_f64() {
        if f == 0.0 {
            return Number::from(0);
        }
    }
    n.clone()
}

/// Serialize a value to its canonical JSON representation, then emit the
/// exact minified UTF-8 bytes: no insignificant whitespace, no trailing
/// newline.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> RvaResult<Vec<u8>> {
    let value = serde_json::to_value(value)
        .map_err(|e| RvaError::Canonicalization(format!("failed to convert to JSON: {e}")))?;
    let canonical = canonicalize(&value)?;
    serde_json::to_vec(&canonical)
        .map_err(|e| RvaError::Canonicalization(format!("failed to serialize canonical JSON: {e}")))
}

/// Parse canonical-JSON bytes back into a `Value`, rejecting non-UTF-8 or
/// structurally invalid input with a distinct error kind.
pub fn parse_canonical_bytes(bytes: &[u8]) -> RvaResult<Value> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| RvaError::Canonicalization(format!("input is not valid UTF-8: {e}")))?;
    serde_json::from_str(text)
        .map_err(|e| RvaError::Canonicalization(format!("invalid JSON: {e}")))
}

/// Compare two JSON values for canonical equality: true iff their canonical
/// byte forms are identical.
pub fn canonical_eq(a: &Value, b: &Value) -> RvaResult<bool> {
    let ba = to_canonical_bytes(a)?;
    let bb = to_canonical_bytes(b)?;
    Ok(ba == bb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_sorts_keys() {
        let v = serde_json::json!({"b": 1, "a": {"d": 2, "c": 3}});
        let c = canonicalize(&v).unwrap();
        let obj = c.as_object().unwrap();
        let keys: Vec<_> = obj.keys().cloned().collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn canonical_eq_true_for_different_order() {
        let a = serde_json::json!({"a": 1, "b": 2});
        let b = serde_json::json!({"b": 2, "a": 1});
        assert!(canonical_eq(&a, &b).unwrap());
    }

    #[test]
    fn canonical_eq_false_for_different_values() {
        let a = serde_json::json!({"a": 1});
        let b = serde_json::json!({"a": 2});
        assert!(!canonical_eq(&a, &b).unwrap());
    }

    #[test]
    fn no_trailing_newline_and_minified() {
        let v = serde_json::json!({"a": 1, "b": [1, 2, 3]});
        let bytes = to_canonical_bytes(&v).unwrap();
        assert_eq!(bytes, br#"{"a":1,"b":[1,2,3]}"#);
        assert_ne!(bytes.last(), Some(&b'\n'));
    }

    #[test]
    fn negative_zero_normalizes_to_zero() {
        let v = serde_json::json!({"a": -0.0});
        let bytes = to_canonical_bytes(&v).unwrap();
        assert_eq!(bytes, br#"{"a":0}"#);
    }

    #[test]
    fn idempotent_round_trip() {
        let v = serde_json::json!({"z": 1, "a": {"y": 2, "b": 3}, "arr": [3, 1, 2]});
        let once = to_canonical_bytes(&v).unwrap();
        let parsed = parse_canonical_bytes(&once).unwrap();
        let twice = to_canonical_bytes(&parsed).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn rejects_invalid_utf8() {
        let bytes = [0xff, 0xfe, 0xfd];
        assert!(parse_canonical_bytes(&bytes).is_err());
    }

    #[test]
    fn rejects_structurally_invalid_json() {
        assert!(parse_canonical_bytes(b"{not json}").is_err());
    }
}
