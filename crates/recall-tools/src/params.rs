//! Small parsing helpers shared by the individual tool modules. Validation
//! failures are `<path>: <message>` strings per spec §6.1, collected into
//! `RpcError::invalid_params`.

use recall_core::errors::RecallResult;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{RpcError, RpcResult};

pub fn required_str<'a>(v: &'a Value, field: &str) -> RpcResult<&'a str> {
    v.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RpcError::invalid_params(format!("{field}: required")))
}

pub fn required_uuid(v: &Value, field: &str) -> RpcResult<Uuid> {
    let raw = required_str(v, field)?;
    Uuid::parse_str(raw).map_err(|_| RpcError::invalid_params(format!("{field}: must be a uuid")))
}

pub fn optional_uuid(v: &Value, field: &str) -> RpcResult<Option<Uuid>> {
    match v.get(field).and_then(Value::as_str) {
        None => Ok(None),
        Some(raw) => Uuid::parse_str(raw)
            .map(Some)
            .map_err(|_| RpcError::invalid_params(format!("{field}: must be a uuid"))),
    }
}

pub fn user_context(v: &Value) -> String {
    v.get("user_context").and_then(Value::as_str).unwrap_or("default").to_string()
}

pub fn tags(v: &Value) -> Vec<String> {
    v.get("tags")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(|t| t.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

pub fn clamped_usize(v: &Value, field: &str, default: usize, min: usize, max: usize) -> RpcResult<usize> {
    match v.get(field) {
        None => Ok(default),
        Some(raw) => {
            let n = raw.as_u64().ok_or_else(|| RpcError::invalid_params(format!("{field}: must be an integer")))? as usize;
            if n < min || n > max {
                return Err(RpcError::invalid_params(format!("{field}: must be between {min} and {max}, got {n}")));
            }
            Ok(n)
        }
    }
}

pub fn range_f64(v: &Value, field: &str, default: f64, min: f64, max: f64) -> RpcResult<f64> {
    match v.get(field).and_then(Value::as_f64) {
        None => Ok(default),
        Some(n) => {
            validate_range_into_rpc(field, n, min, max)?;
            Ok(n)
        }
    }
}

fn validate_range_into_rpc(field: &str, value: f64, min: f64, max: f64) -> RpcResult<()> {
    recall_core::sanitize::validate_range(field, value, min, max).map_err(RpcError::from)
}

pub fn max_content_chars(v: &Value, field: &str, max: usize) -> RpcResult<String> {
    let raw = required_str(v, field)?;
    if raw.chars().count() > max {
        return Err(RpcError::invalid_params(format!("{field}: exceeds {max} chars")));
    }
    Ok(raw.to_string())
}

pub fn into_recall<T>(r: RecallResult<T>) -> RpcResult<T> {
    r.map_err(RpcError::from)
}
