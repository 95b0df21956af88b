//! Field-by-field merge over the intermediate JSON form
//!
//! Both copy strategies end up here: the structural path walks the two
//! trees with [`merge_values`], the round-trip path lays the source over
//! the destination with [`overlay`].

use serde_json::Value;
use tracing::trace;

use super::{CopyError, CopyOptions};

/// Whether unknown source keys may be added to a destination object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Destination is a mapping: every source key lands
    Open,
    /// Destination is a record: keys it does not declare are dropped
    Closed,
}

/// Merge `src` into `dst`, matching object keys by name.
///
/// Nested objects merge recursively and are always open, since a nested
/// object may back either a map or a struct and serde drops unknown struct
/// fields on the way back. Arrays and scalars replace the destination value.
/// A `null` source never clears a non-null destination.
pub fn merge_values(
    dst: &mut Value,
    src: &Value,
    policy: KeyPolicy,
    opts: &CopyOptions,
) -> Result<(), CopyError> {
    merge_at(dst, src, policy, opts, "")
}

fn merge_at(
    dst: &mut Value,
    src: &Value,
    policy: KeyPolicy,
    opts: &CopyOptions,
    path: &str,
) -> Result<(), CopyError> {
    match (dst, src) {
        (Value::Object(dst_map), Value::Object(src_map)) => {
            for (key, src_val) in src_map {
                if opts.ignore_empty && is_empty(src_val) {
                    continue;
                }
                let field_path = join_path(path, key);
                match dst_map.get_mut(key) {
                    Some(dst_val) => {
                        merge_at(dst_val, src_val, KeyPolicy::Open, opts, &field_path)?
                    }
                    None if policy == KeyPolicy::Open => {
                        dst_map.insert(key.clone(), src_val.clone());
                    }
                    None => trace!(field = %field_path, "source field absent on destination"),
                }
            }
            Ok(())
        }
        (dst, src) => {
            if src.is_null() && !dst.is_null() {
                trace!(field = %path, "null source leaves destination untouched");
                return Ok(());
            }
            if compatible(dst, src) {
                *dst = src.clone();
                return Ok(());
            }
            if opts.strict {
                return Err(CopyError::StructuralCopy {
                    path: path.to_string(),
                    expected: kind(dst),
                    found: kind(src),
                });
            }
            trace!(field = %path, expected = kind(dst), found = kind(src), "skipping incompatible field");
            Ok(())
        }
    }
}

/// Lay the source over the destination the way decoding into an existing
/// value does.
///
/// Objects recurse, so keys the source does not carry keep their
/// destination values at every depth. A `null` never replaces a non-null
/// value. Anything else replaces the destination without kind checks.
pub fn overlay(dst: &mut Value, src: Value, opts: &CopyOptions) {
    match (dst, src) {
        (Value::Object(dst_map), Value::Object(src_map)) => {
            for (key, value) in src_map {
                if opts.ignore_empty && is_empty(&value) {
                    continue;
                }
                match dst_map.get_mut(&key) {
                    Some(slot) => overlay(slot, value, opts),
                    None => {
                        dst_map.insert(key, value);
                    }
                }
            }
        }
        (dst, Value::Null) if !dst.is_null() => {}
        (dst, src) => *dst = src,
    }
}

/// Zero values: null, empty string/array/object, `false`, `0`
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Short name of a value's JSON kind
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn compatible(dst: &Value, src: &Value) -> bool {
    match (kind(dst), kind(src)) {
        ("null", _) | (_, "null") => true,
        ("float", "integer") => true,
        (a, b) => a == b,
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}
