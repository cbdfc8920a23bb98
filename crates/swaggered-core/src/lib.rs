pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

use std::rc::Rc;

use config::GenerateOptions;
use ir::HttpMethod;

/// What one operation produced.
///
/// Each `*_type` field holds self-contained declarations (keyword, name,
/// body), one per element; an empty list means the operation has no such
/// type.
#[derive(Debug, Clone)]
pub struct GeneratedItem {
    /// Path with the base path joined in.
    pub path: String,
    pub method: HttpMethod,
    pub request_parameters_type: Vec<String>,
    pub request_body_type: Vec<String>,
    pub response_type: Vec<String>,
    /// The run's shared envelope declaration, once discovered.
    pub generic_resp: Option<Rc<str>>,
    /// Display name.
    pub summary: String,
    pub description: String,
    pub group: String,
    pub deprecated: bool,
    /// Emitted function source; absent in types-only runs.
    pub code: Option<String>,
    pub signature: FunctionSignature,
}

/// The pieces a function is rendered from, kept so that grouped output
/// can re-render the same call as a service member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionSignature {
    pub function_name: String,
    pub params_type: Option<String>,
    /// Every parameter is consumed by the path template.
    pub params_in_path: bool,
    pub body_type: Option<String>,
    /// Type argument of the request call.
    pub response_generic: Option<String>,
}

/// Output of one generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateResult {
    pub list: Vec<GeneratedItem>,
    /// Operations in the document before filtering.
    pub total: usize,
    /// Source printed ahead of the functions (the request helper).
    pub code_before: Option<String>,
    pub base_path: Option<String>,
    pub generic_resp: Option<Rc<str>>,
}

/// Trait for code generators that turn extracted operations into source.
pub trait CodeGenerator {
    type Error: std::error::Error;
    fn generate(
        &self,
        ir: &ir::IrSpec,
        options: &GenerateOptions,
    ) -> Result<GenerateResult, Self::Error>;
}
