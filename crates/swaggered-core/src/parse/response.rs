use indexmap::IndexMap;
use serde::Deserialize;

use super::schema::SchemaOrRef;

/// Media types tried, in order, when picking a JSON payload schema.
pub const JSON_MEDIA_TYPES: &[&str] = &["application/json", "*/*"];

/// A response definition. Swagger 2.0 carries `schema` directly,
/// OpenAPI 3.x nests it under `content`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Response {
    pub description: Option<String>,

    pub schema: Option<SchemaOrRef>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

impl Response {
    /// The JSON payload schema, whichever document version this came from.
    pub fn json_schema(&self) -> Option<&SchemaOrRef> {
        self.schema.as_ref().or_else(|| json_content(&self.content))
    }
}

/// An OpenAPI 3.x request body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestBody {
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

impl RequestBody {
    pub fn json_schema(&self) -> Option<&SchemaOrRef> {
        json_content(&self.content)
    }
}

/// A media type entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaType {
    pub schema: Option<SchemaOrRef>,
}

fn json_content(content: &IndexMap<String, MediaType>) -> Option<&SchemaOrRef> {
    JSON_MEDIA_TYPES
        .iter()
        .find_map(|mt| content.get(*mt).and_then(|m| m.schema.as_ref()))
}
