use serde::Deserialize;

use super::schema::{Schema, SchemaOrRef};

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
    Cookie,
    /// Swagger 2.0 request body parameter.
    Body,
    /// Swagger 2.0 form field.
    FormData,
}

/// An operation or path-level parameter.
///
/// Swagger 2.0 non-body parameters describe their type inline (`type`,
/// `format`, `enum`, ...); those keywords are captured in `inline`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(default)]
    pub required: bool,

    pub description: Option<String>,

    pub schema: Option<SchemaOrRef>,

    #[serde(flatten)]
    pub inline: Schema,
}

impl Parameter {
    /// The parameter's schema: the 3.x `schema` field, else the 2.0 inline keywords.
    pub fn effective_schema(&self) -> SchemaOrRef {
        match &self.schema {
            Some(schema) => schema.clone(),
            None => SchemaOrRef::Schema(Box::new(self.inline.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::schema::{SchemaType, TypeSet};

    #[test]
    fn swagger2_inline_type() {
        let param: Parameter = serde_json::from_value(serde_json::json!({
            "name": "petId",
            "in": "path",
            "required": true,
            "description": "ID of pet",
            "type": "integer",
            "format": "int64"
        }))
        .unwrap();

        assert_eq!(param.location, ParameterLocation::Path);
        assert!(param.required);
        let SchemaOrRef::Schema(schema) = param.effective_schema() else {
            panic!("expected inline schema");
        };
        assert_eq!(
            schema.schema_type,
            Some(TypeSet::Single(SchemaType::Integer))
        );
        assert_eq!(schema.format.as_deref(), Some("int64"));
    }

    #[test]
    fn openapi3_schema_wins() {
        let param: Parameter = serde_json::from_value(serde_json::json!({
            "name": "status",
            "in": "query",
            "schema": { "type": "string", "enum": ["available", "sold"] }
        }))
        .unwrap();

        assert!(!param.required);
        let SchemaOrRef::Schema(schema) = param.effective_schema() else {
            panic!("expected inline schema");
        };
        assert_eq!(schema.enum_values.len(), 2);
    }

    #[test]
    fn form_data_location() {
        let param: Parameter = serde_json::from_value(serde_json::json!({
            "name": "file", "in": "formData", "type": "file"
        }))
        .unwrap();
        assert_eq!(param.location, ParameterLocation::FormData);
    }
}
