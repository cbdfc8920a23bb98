use serde::Serialize;

pub use crate::parse::operation::HttpMethod;
use crate::parse::schema::{Schema, SchemaOrRef};

/// Special parameter that is injected by a gateway, never sent by clients.
pub const JWT_PAYLOAD_PARAM: &str = "x-jwt-payload";

/// One HTTP method bound to one path.
#[derive(Debug, Clone)]
pub struct IrOperation {
    /// Path with the base path joined in.
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    /// Display name; stem of every type and the function name.
    pub name: String,
    pub description: String,
    /// First tag, or empty.
    pub group: String,
    pub tags: Vec<String>,
    pub parameters: Vec<IrParameter>,
    /// OpenAPI 3.x JSON request body.
    pub request_body: Option<Schema>,
    /// Success response schema; empty when the document has none.
    pub response: Schema,
    pub deprecated: bool,
}

impl IrOperation {
    /// Swagger 2.0 `in: body` parameter, if any.
    pub fn body_parameter(&self) -> Option<&IrParameter> {
        self.parameters
            .iter()
            .find(|p| p.location == IrParameterLocation::Body)
    }
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IrParameterLocation {
    Query,
    Path,
    Header,
    Body,
    Other,
}

/// A resolved parameter.
#[derive(Debug, Clone)]
pub struct IrParameter {
    pub name: String,
    pub location: IrParameterLocation,
    pub required: bool,
    pub description: Option<String>,
    pub schema: SchemaOrRef,
}

impl IrParameter {
    pub fn is_jwt_payload(&self) -> bool {
        self.name == JWT_PAYLOAD_PARAM
    }
}
