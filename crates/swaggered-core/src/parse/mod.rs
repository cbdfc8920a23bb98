pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod response;
pub mod schema;
pub mod spec;

use serde_json::Value;

use crate::error::ParseError;
use spec::{Document, SpecVersion};

/// Parse a raw document from JSON.
pub fn from_json(input: &str) -> Result<Value, ParseError> {
    let value: Value = serde_json::from_str(input)?;
    detect_version(&value)?;
    Ok(value)
}

/// Parse a raw document from YAML.
pub fn from_yaml(input: &str) -> Result<Value, ParseError> {
    let value: Value = serde_yaml_ng::from_str(input)?;
    detect_version(&value)?;
    Ok(value)
}

/// Parse a raw document, trying JSON first and YAML second.
pub fn from_str(input: &str) -> Result<Value, ParseError> {
    match from_json(input) {
        Ok(value) => Ok(value),
        Err(ParseError::Json(json_err)) => {
            log::debug!("input is not JSON ({json_err}), retrying as YAML");
            from_yaml(input)
        }
        Err(e) => Err(e),
    }
}

/// Determine whether a raw document is Swagger 2.0 or OpenAPI 3.x.
pub fn detect_version(value: &Value) -> Result<SpecVersion, ParseError> {
    if let Some(v) = value.get("swagger") {
        let v = version_string(v);
        return if v.starts_with("2.") || v == "2" {
            Ok(SpecVersion::Swagger2)
        } else {
            Err(ParseError::UnsupportedVersion(format!("swagger {v}")))
        };
    }
    if let Some(v) = value.get("openapi") {
        let v = version_string(v);
        return if v.starts_with("3.") {
            Ok(SpecVersion::OpenApi3)
        } else {
            Err(ParseError::UnsupportedVersion(format!("openapi {v}")))
        };
    }
    Err(ParseError::MissingField("swagger/openapi".to_string()))
}

fn version_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert a dereferenced raw document into the typed document model.
pub fn into_document(value: Value) -> Result<Document, ParseError> {
    let version = detect_version(&value)?;
    let mut doc: Document = serde_json::from_value(value)?;
    doc.version = version;
    Ok(doc)
}
