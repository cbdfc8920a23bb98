use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::parameter::Parameter;
use super::response::{RequestBody, Response};

/// HTTP methods that may appear as keys of a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Parse a path-item key, case-insensitively.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "put" => Some(Self::Put),
            "post" => Some(Self::Post),
            "delete" => Some(Self::Delete),
            "options" => Some(Self::Options),
            "head" => Some(Self::Head),
            "patch" => Some(Self::Patch),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Lowercase key as it appears in a path item.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }

    pub fn as_upper(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upper())
    }
}

/// A path item: shared parameters plus one operation per HTTP method,
/// in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "IndexMap<String, Value>")]
pub struct PathItem {
    pub parameters: Vec<Parameter>,
    pub operations: IndexMap<HttpMethod, Operation>,
}

impl TryFrom<IndexMap<String, Value>> for PathItem {
    type Error = serde_json::Error;

    fn try_from(raw: IndexMap<String, Value>) -> Result<Self, Self::Error> {
        let mut item = PathItem::default();
        for (key, value) in raw {
            if key == "parameters" {
                item.parameters = serde_json::from_value(value)?;
            } else if let Some(method) = HttpMethod::from_key(&key) {
                item.operations
                    .insert(method, serde_json::from_value(value)?);
            }
        }
        Ok(item)
    }
}

/// A single API operation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,

    pub summary: Option<String>,

    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(rename = "requestBody")]
    pub request_body: Option<RequestBody>,

    #[serde(default)]
    pub responses: IndexMap<String, Response>,

    #[serde(default)]
    pub deprecated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_item_keeps_method_order() {
        let item: PathItem = serde_json::from_value(serde_json::json!({
            "summary": "ignored",
            "put": { "operationId": "updatePet" },
            "post": { "operationId": "addPet" },
            "get": { "operationId": "getPet" },
            "parameters": [{ "name": "id", "in": "path", "required": true, "type": "integer" }],
            "x-internal": true
        }))
        .unwrap();

        let methods: Vec<_> = item.operations.keys().map(|m| m.as_str()).collect();
        assert_eq!(methods, ["put", "post", "get"]);
        assert_eq!(item.parameters.len(), 1);
        assert_eq!(item.parameters[0].name, "id");
    }

    #[test]
    fn method_keys_are_case_insensitive() {
        assert_eq!(HttpMethod::from_key("DELETE"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::from_key("servers"), None);
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
    }
}
