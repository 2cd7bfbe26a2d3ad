use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::{
    dates::{self, DateParser},
    rules::round4,
    types::NormalizedRecord,
};

const NAME_KEYS: &[&str] = &["name", "bucket_name", "id"];
const REGION_KEYS: &[&str] = &["region"];
const SIZE_KEYS: &[&str] = &["size_gb", "size"];
const VERSIONING_KEYS: &[&str] = &["versioning", "version_enabled"];
const LAST_ACCESS_KEYS: &[&str] = &["last_accessed", "last_modified", "last_access"];
const DEPARTMENT_KEYS: &[&str] = &["department", "team"];

pub const UNKNOWN_NAME: &str = "<unknown>";
pub const UNKNOWN: &str = "unknown";

static RE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(\.\d+)?").expect("valid regex"));

static EMPTY: Lazy<Map<String, Value>> = Lazy::new(Map::new);

/// Normalize one raw record using the default date parser.
pub fn normalize(raw: &Value, rate: f64) -> NormalizedRecord {
    normalize_with(raw, rate, dates::parse_timestamp)
}

/// Normalize one raw record. Never fails: every missing or malformed field
/// degrades to its default.
pub fn normalize_with(raw: &Value, rate: f64, parse_date: DateParser) -> NormalizedRecord {
    let obj = match raw.as_object() {
        Some(obj) => obj,
        None => {
            tracing::warn!(kind = json_kind(raw), "bucket record is not an object; using defaults");
            &*EMPTY
        }
    };

    let name = first_truthy(obj, NAME_KEYS)
        .map(display_value)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());
    let region = first_truthy(obj, REGION_KEYS)
        .map(display_value)
        .unwrap_or_else(|| UNKNOWN.to_string());
    let department = first_truthy(obj, DEPARTMENT_KEYS)
        .map(display_value)
        .unwrap_or_else(|| UNKNOWN.to_string());

    let size_gb = first_truthy(obj, SIZE_KEYS).map(coerce_size).unwrap_or(0.0);
    let versioning = first_truthy(obj, VERSIONING_KEYS).is_some();

    let (last, last_raw) = match first_truthy(obj, LAST_ACCESS_KEYS) {
        Some(v) => {
            let parsed = parse_date(v);
            if parsed.is_none() {
                tracing::debug!(bucket = %name, value = %v, "unparsable last-access; treating as never accessed");
            }
            (parsed, display_value(v))
        }
        None => (None, String::new()),
    };

    let monthly_cost = match obj.get("monthly_cost") {
        None | Some(Value::Null) => round4(size_gb * rate),
        Some(v) => coerce_size(v),
    };

    NormalizedRecord {
        name,
        region,
        size_gb,
        versioning,
        last,
        last_raw,
        department,
        monthly_cost,
    }
}

/// Coerce a size-like value into a float.
///
/// Numbers pass through. Anything else has `,` separators stripped and the first
/// signed decimal pulled out of its text; no match yields `0.0`.
pub fn coerce_size(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        other => {
            let text = display_value(other).replace(',', "");
            match RE_NUMBER.find(&text).and_then(|m| m.as_str().parse::<f64>().ok()) {
                Some(n) => n,
                None => {
                    tracing::debug!(value = %text, "size is not numeric; defaulting to 0");
                    0.0
                }
            }
        }
    }
}

fn first_truthy<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| is_truthy(v))
}

/// Loose truthiness: null, false, zero and empty containers/strings are all falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
