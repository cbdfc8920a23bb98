use indexmap::IndexMap;
use serde::Deserialize;

use super::operation::PathItem;

/// Document format family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpecVersion {
    Swagger2,
    #[default]
    OpenApi3,
}

/// Info object describing the API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Info {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// A server entry (OpenAPI 3.x).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Server {
    pub url: String,
    pub description: Option<String>,
}

/// A Swagger 2.0 or OpenAPI 3.x document after `$ref` resolution.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Document {
    #[serde(skip)]
    pub version: SpecVersion,

    #[serde(default)]
    pub info: Info,

    /// Swagger 2.0 base path.
    #[serde(rename = "basePath")]
    pub base_path: Option<String>,

    #[serde(default)]
    pub servers: Vec<Server>,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
}
