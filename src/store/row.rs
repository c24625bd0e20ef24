//! Rows and value semantics
//!
//! Rows are schema-less JSON objects. Matching compares numbers by value,
//! so `1` matches `1.0`, and everything else strictly: `1` does not match
//! `"1"` or `true`.

use std::cmp::Ordering;

use serde_json::{Map, Number, Value};

/// A schema-less record
pub type Row = Map<String, Value>;

/// Field carrying a row's nominally unique identifier
pub const ID_FIELD: &str = "id";

/// Returns the row's `id` value, if any
pub fn row_id(row: &Row) -> Option<&Value> {
    row.get(ID_FIELD)
}

/// Returns true if the row's `id` equals `id`
pub fn has_id(row: &Row, id: &Value) -> bool {
    row_id(row).map_or(false, |value| values_equal(value, id))
}

/// JSON equality with numbers compared by value, recursing into arrays and
/// objects
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, a)| y.get(k).map_or(false, |b| values_equal(a, b)))
        }
        _ => a == b,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    match (integer_value(x), integer_value(y)) {
        (Some(a), Some(b)) => a == b,
        (Some(int), None) => float_equals_integer(y, int),
        (None, Some(int)) => float_equals_integer(x, int),
        (None, None) => x.as_f64() == y.as_f64(),
    }
}

fn integer_value(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

// Exact: 2^53 + 1 does not equal the float 2^53
fn float_equals_integer(float: &Number, int: i128) -> bool {
    match float.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => f as i128 == int,
        _ => false,
    }
}

/// Null and empty-string values are blank; everything else is kept by
/// cleaning, including `0`, `false`, `[]` and `{}`.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Conjunctive equality: every `(field, value)` of `condition` must be
/// present in `row` with an equal value (see [`values_equal`]). A missing
/// field never matches.
pub fn matches_condition(row: &Row, condition: &Row) -> bool {
    condition.iter().all(|(field, expected)| {
        row.get(field)
            .map_or(false, |value| values_equal(value, expected))
    })
}

/// Total order over optional JSON values.
///
/// missing < null < bool < number < string < array < object. Arrays and
/// objects compare equal among themselves.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => {
            let a_rank = type_rank(a_val);
            let b_rank = type_rank(b_val);
            if a_rank != b_rank {
                return a_rank.cmp(&b_rank);
            }

            match (a_val, b_val) {
                (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                (Value::Number(x), Value::Number(y)) => {
                    if let (Some(xi), Some(yi)) = (x.as_i64(), y.as_i64()) {
                        return xi.cmp(&yi);
                    }
                    let xf = x.as_f64().unwrap_or(0.0);
                    let yf = y.as_f64().unwrap_or(0.0);
                    xf.partial_cmp(&yf).unwrap_or(Ordering::Equal)
                }
                (Value::String(x), Value::String(y)) => x.cmp(y),
                _ => Ordering::Equal,
            }
        }
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// First integer literal in `json` that fits neither i64 nor u64.
///
/// serde_json reads such literals as f64, rounding them, so callers reject
/// input that contains one. Assumes `json` already parsed successfully.
pub fn oversized_integer(json: &[u8]) -> Option<String> {
    let mut i = 0;
    while i < json.len() {
        match json[i] {
            b'"' => {
                i += 1;
                while i < json.len() && json[i] != b'"' {
                    if json[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'-' | b'0'..=b'9' => {
                let start = i;
                while i < json.len()
                    && matches!(json[i], b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9')
                {
                    i += 1;
                }
                let token = &json[start..i];
                if token.iter().any(|b| matches!(b, b'.' | b'e' | b'E')) {
                    continue;
                }
                let literal = String::from_utf8_lossy(token);
                if literal.parse::<i64>().is_err() && literal.parse::<u64>().is_err() {
                    return Some(literal.into_owned());
                }
            }
            _ => i += 1,
        }
    }
    None
}

/// Builds a row from a JSON value; `None` unless it is an object
pub fn row_from_value(value: Value) -> Option<Row> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
