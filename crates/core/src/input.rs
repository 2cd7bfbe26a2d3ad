use std::path::Path;

use anyhow::Context;
use serde_json::Value;

const SHAPE_ERROR: &str = "expected a JSON array of buckets or an object with a \"buckets\" array";

/// Parse a bucket listing: either a bare array of records or an object with a
/// `"buckets"` array.
pub fn parse_buckets(bytes: &[u8]) -> anyhow::Result<Vec<Value>> {
    let v: Value = serde_json::from_slice(bytes).context("parse json")?;
    match v {
        Value::Array(records) => Ok(records),
        Value::Object(mut obj) => match obj.remove("buckets") {
            Some(Value::Array(records)) => Ok(records),
            _ => anyhow::bail!(SHAPE_ERROR),
        },
        _ => anyhow::bail!(SHAPE_ERROR),
    }
}

pub fn load_buckets(path: &Path) -> anyhow::Result<Vec<Value>> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    parse_buckets(&bytes).with_context(|| format!("load buckets from {}", path.display()))
}
