//! Per-operation sub-schemas: the parameters object, the request body and
//! the response, each titled after the operation and compiled.

use swaggered_core::ir::{IrOperation, IrParameterLocation};
use swaggered_core::parse::schema::{Schema, SchemaOrRef, SchemaType, TypeSet};
use swaggered_core::transform::name_normalizer::type_stem;

use crate::adapter::{
    self, Compiled, ENVELOPE_NAME, Envelope, FALLBACK_ENVELOPE_FIELD, RESP_MARKER,
};
use crate::compiler::{CompileError, RenderOptions};

/// State shared by every operation of one run.
#[derive(Debug, Default)]
pub struct RunContext {
    /// Set by the first response that yields an envelope, then reused.
    pub envelope: Option<Envelope>,
}

/// The compiled types of one operation.
#[derive(Debug, Default)]
pub struct OperationTypes {
    pub params: Option<Compiled>,
    /// No original parameter is carried in the query string.
    pub params_in_path: bool,
    pub body: Option<Compiled>,
    pub response: Option<Compiled>,
    /// Type argument of the `request` call.
    pub response_generic: Option<String>,
}

pub fn synthesize(
    op: &IrOperation,
    ctx: &mut RunContext,
    opts: &RenderOptions,
) -> Result<OperationTypes, CompileError> {
    let stem = type_stem(&op.name);
    let params_in_path = op
        .parameters
        .iter()
        .all(|p| p.location != IrParameterLocation::Query);

    let params = params_schema(op, &stem, params_in_path)
        .map(|s| adapter::compile(s, opts))
        .transpose()?;
    let body = body_schema(op, &stem)
        .map(|s| adapter::compile(s, opts))
        .transpose()?;
    let (response, response_generic) = response_types(op, &stem, ctx, opts)?;

    Ok(OperationTypes {
        params,
        params_in_path,
        body,
        response: Some(response),
        response_generic: Some(response_generic),
    })
}

/// Query and path parameters as one object schema, titled
/// `<Stem>Params` or `<Stem>ParamsInPath`.
pub fn params_schema(op: &IrOperation, stem: &str, in_path: bool) -> Option<Schema> {
    let params: Vec<_> = op
        .parameters
        .iter()
        .filter(|p| {
            matches!(
                p.location,
                IrParameterLocation::Query | IrParameterLocation::Path
            ) && !p.is_jwt_payload()
        })
        .collect();
    if params.is_empty() {
        return None;
    }

    let mut schema = Schema {
        schema_type: Some(TypeSet::Single(SchemaType::Object)),
        title: Some(format!(
            "{stem}Params{}",
            if in_path { "InPath" } else { "" }
        )),
        ..Default::default()
    };
    for param in params {
        let prop = match &param.schema {
            SchemaOrRef::Schema(s) => {
                let mut s = (**s).clone();
                s.title = None;
                if param.description.is_some() {
                    s.description = param.description.clone();
                }
                SchemaOrRef::from(s)
            }
            back_edge => back_edge.clone(),
        };
        schema.properties.insert(param.name.clone(), prop);
        if param.required {
            schema.required.push(param.name.clone());
        }
    }
    Some(schema)
}

/// The `in: body` parameter, else the JSON request body, titled
/// `<Stem>RequestData`.
pub fn body_schema(op: &IrOperation, stem: &str) -> Option<Schema> {
    let mut schema = match op.body_parameter() {
        Some(param) => param.schema.clone().into_schema(),
        None => op.request_body.clone()?,
    };
    schema.title = Some(format!("{stem}RequestData"));
    Some(schema)
}

fn response_types(
    op: &IrOperation,
    stem: &str,
    ctx: &mut RunContext,
    opts: &RenderOptions,
) -> Result<(Compiled, String), CompileError> {
    let response = &op.response;

    if ctx.envelope.is_none() {
        if response.properties.contains_key(FALLBACK_ENVELOPE_FIELD) {
            ctx.envelope = adapter::gen_generic_resp_type(response, opts)?;
            if ctx.envelope.is_some() {
                log::debug!("{} {}: response envelope established", op.method, op.path);
            }
        } else {
            log::debug!(
                "{} {}: no `{FALLBACK_ENVELOPE_FIELD}` field, no envelope yet",
                op.method,
                op.path
            );
        }
    }

    if let Some(envelope) = &ctx.envelope
        && let Some(payload) = response.properties.get(&envelope.field)
    {
        let mut payload = envelope_payload(payload);
        payload.title = Some(format!("{stem}ResponseData"));
        let compiled = adapter::compile(payload, opts)?;
        let generic = format!("{ENVELOPE_NAME}<{}>", compiled.name);
        return Ok((compiled, generic));
    }

    let mut whole = response.clone();
    let marked = match whole.title() {
        Some(title) => {
            whole.title = Some(format!("{title}{RESP_MARKER}"));
            true
        }
        None => {
            whole.title = Some(format!("{stem}ResponseData"));
            false
        }
    };
    let compiled = adapter::compile(whole, opts)?;
    let generic = if marked {
        adapter::strip_resp_marker(&compiled.name)
    } else {
        compiled.name.clone()
    };
    Ok((compiled, generic))
}

/// The envelope field's schema without its `| null` branch.
fn envelope_payload(field: &SchemaOrRef) -> Schema {
    let schema = field.clone().into_schema();
    let non_null: Vec<_> = schema
        .any_of
        .iter()
        .chain(&schema.one_of)
        .filter(|branch| {
            branch
                .as_schema()
                .is_none_or(|s| s.schema_type != Some(TypeSet::Single(SchemaType::Null)))
        })
        .collect();
    match non_null.as_slice() {
        [only] => {
            let mut payload = (*only).clone().into_schema();
            if payload.description.is_none() {
                payload.description = schema.description.clone();
            }
            payload
        }
        _ => {
            let mut payload = schema.clone();
            payload.nullable = None;
            payload
        }
    }
}

#[cfg(test)]
mod tests {
    use swaggered_core::config::Filter;
    use swaggered_core::transform::transform;

    use super::*;

    const APISERVER: &str =
        include_str!("../../swaggered-core/tests/fixtures/apiserver-simple.json");

    fn operations() -> Vec<IrOperation> {
        let raw: serde_json::Value = serde_json::from_str(APISERVER).unwrap();
        transform(&raw, &Filter::default()).unwrap().operations
    }

    fn op(name: &str) -> IrOperation {
        operations()
            .into_iter()
            .find(|o| o.name == name)
            .unwrap_or_else(|| panic!("no operation {name}"))
    }

    fn opts() -> RenderOptions {
        RenderOptions {
            prefix: "I".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_path_only_params() {
        let delete = op("Delete Bar");
        let schema = params_schema(&delete, "DeleteBar", true).unwrap();
        assert_eq!(schema.title.as_deref(), Some("DeleteBarParamsInPath"));
        let names: Vec<_> = schema.properties.keys().collect();
        assert_eq!(names, ["bar_id", "baz_id"]);
        assert_eq!(schema.required, ["bar_id", "baz_id"]);
        assert!(
            schema.properties["bar_id"]
                .as_schema()
                .unwrap()
                .title
                .is_none()
        );
    }

    #[test]
    fn test_jwt_payload_is_not_a_param() {
        let paged = op("pagedQueryBars");
        let schema = params_schema(&paged, "PagedQueryBars", false).unwrap();
        assert!(!schema.properties.contains_key("x-jwt-payload"));
        assert_eq!(schema.title.as_deref(), Some("PagedQueryBarsParams"));
    }

    #[test]
    fn test_no_params_no_type() {
        let create = op("createBar");
        assert!(params_schema(&create, "CreateBar", true).is_none());
        let types = synthesize(&create, &mut RunContext::default(), &opts()).unwrap();
        assert!(types.params.is_none());
        assert_eq!(types.body.unwrap().name, "ICreateBarRequestData");
    }

    #[test]
    fn test_envelope_payload_drops_null_branch() {
        let delete = op("Delete Bar");
        let mut ctx = RunContext::default();
        let types = synthesize(&delete, &mut ctx, &opts()).unwrap();

        assert!(ctx.envelope.is_some());
        assert_eq!(types.response_generic.as_deref(), Some("Data<IDeleteBarResponseData>"));
        assert_eq!(
            types.response.unwrap().declarations,
            ["type IDeleteBarResponseData = string;"]
        );
    }

    #[test]
    fn test_whole_response_is_marked() {
        let mut plain = op("createBar");
        plain.response = serde_json::from_value(serde_json::json!({
            "title": "Pet",
            "type": "object",
            "properties": { "id": { "type": "integer" } }
        }))
        .unwrap();

        let types = synthesize(&plain, &mut RunContext::default(), &opts()).unwrap();
        assert_eq!(types.response_generic.as_deref(), Some("IPet"));
        assert!(types.response.unwrap().declarations[0].starts_with("type IPet__Resp__ = {"));
    }

    #[test]
    fn test_response_without_data_leaves_envelope_unset() {
        let mut plain = op("createBar");
        plain.response = serde_json::from_value(serde_json::json!({
            "type": "object",
            "properties": { "result": { "type": "object", "properties": { "id": { "type": "integer" } } } }
        }))
        .unwrap();

        let mut ctx = RunContext::default();
        let types = synthesize(&plain, &mut ctx, &opts()).unwrap();
        assert!(ctx.envelope.is_none());
        assert_eq!(types.response_generic.as_deref(), Some("ICreateBarResponseData"));
    }

    #[test]
    fn test_untitled_response_takes_stem() {
        let mut plain = op("createBar");
        plain.response = Schema::default();
        let types = synthesize(&plain, &mut RunContext::default(), &opts()).unwrap();
        assert_eq!(types.response_generic.as_deref(), Some("ICreateBarResponseData"));
    }
}
