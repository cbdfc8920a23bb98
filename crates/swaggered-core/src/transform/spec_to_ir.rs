use std::collections::HashSet;

use serde_json::Value;

use crate::config::Filter;
use crate::error::TransformError;
use crate::ir::*;
use crate::parse;
use crate::parse::operation::{Operation, PathItem};
use crate::parse::parameter::{Parameter, ParameterLocation};
use crate::parse::ref_resolve::dereference;
use crate::parse::schema::Schema;
use crate::parse::spec::Document;

use super::name_normalizer::{NameSource, derive_display_name, type_stem};
use super::normalize::{
    base_path, count_operations, filter_paths, join_base_path, strip_property_titles,
};

/// Turn a raw document into the filtered list of operations.
pub fn transform(raw: &Value, filter: &Filter) -> Result<IrSpec, TransformError> {
    // Phase 1: Resolve all $ref pointers
    let mut resolved = dereference(raw)?;

    // Phase 2: Property titles never name types
    strip_property_titles(&mut resolved);

    // Phase 3: Typed model, counted before filtering
    let mut doc = parse::into_document(resolved)?;
    let total = count_operations(&doc);
    filter_paths(&mut doc, filter)?;

    // Phase 4: Operations
    let base_path = base_path(&doc);
    let operations = extract_operations(&doc, base_path.as_deref());
    log::debug!("extracted {} of {} operations", operations.len(), total);

    Ok(IrSpec {
        base_path,
        total,
        operations,
    })
}

/// Build one [`IrOperation`] per path × method, skipping `OPTIONS`.
pub fn extract_operations(doc: &Document, base_path: Option<&str>) -> Vec<IrOperation> {
    let mut names = NameRegistry::default();
    let mut operations = Vec::new();

    for (path, item) in &doc.paths {
        for (method, op) in &item.operations {
            if *method == HttpMethod::Options {
                continue;
            }
            let mut ir_op = build_operation(path, *method, op, item, base_path);
            ir_op.name = names.claim(&ir_op.name, &ir_op.path, *method);
            log::debug!(
                "{} {} → {} (group {:?})",
                method,
                ir_op.path,
                ir_op.name,
                ir_op.group
            );
            operations.push(ir_op);
        }
    }

    operations
}

fn build_operation(
    path: &str,
    method: HttpMethod,
    op: &Operation,
    item: &PathItem,
    base_path: Option<&str>,
) -> IrOperation {
    let display = derive_display_name(NameSource {
        summary: op.summary.as_deref(),
        description: op.description.as_deref(),
        operation_id: op.operation_id.as_deref(),
        method: method.as_str(),
        path,
    });
    let label = format!("{method} {path}");

    IrOperation {
        path: join_base_path(base_path, path),
        method,
        operation_id: op.operation_id.clone(),
        name: display.name,
        description: display.description,
        group: op.tags.first().cloned().unwrap_or_default(),
        tags: op.tags.clone(),
        parameters: merge_parameters(&item.parameters, &op.parameters)
            .into_iter()
            .map(to_ir_parameter)
            .collect(),
        request_body: op
            .request_body
            .as_ref()
            .and_then(|body| body.json_schema())
            .map(|s| s.clone().into_schema()),
        response: success_schema(op, &label),
        deprecated: op.deprecated,
    }
}

/// Path-level parameters followed by operation parameters; an operation
/// parameter replaces a path-level one with the same name and location.
fn merge_parameters<'a>(
    path_level: &'a [Parameter],
    op_level: &'a [Parameter],
) -> Vec<&'a Parameter> {
    let mut merged: Vec<&Parameter> = path_level.iter().collect();
    for param in op_level {
        match merged
            .iter_mut()
            .find(|p| p.name == param.name && p.location == param.location)
        {
            Some(slot) => *slot = param,
            None => merged.push(param),
        }
    }
    merged
}

fn to_ir_parameter(param: &Parameter) -> IrParameter {
    let location = match param.location {
        ParameterLocation::Query => IrParameterLocation::Query,
        ParameterLocation::Path => IrParameterLocation::Path,
        ParameterLocation::Header => IrParameterLocation::Header,
        ParameterLocation::Body => IrParameterLocation::Body,
        ParameterLocation::Cookie | ParameterLocation::FormData => IrParameterLocation::Other,
    };
    IrParameter {
        name: param.name.clone(),
        location,
        required: param.required || location == IrParameterLocation::Path,
        description: param.description.clone(),
        schema: param.effective_schema(),
    }
}

/// The `200` response schema, else the first `2xx` one, else `{}`.
fn success_schema(op: &Operation, label: &str) -> Schema {
    let response = op.responses.get("200").or_else(|| {
        op.responses
            .iter()
            .find(|(code, _)| code.starts_with('2'))
            .map(|(_, r)| r)
    });

    let Some(schema) = response.and_then(|r| r.json_schema()) else {
        log::warn!("{label}: no success response schema, using an empty one");
        return Schema::default();
    };

    let mut schema = schema.clone().into_schema();
    if schema.all_of.len() >= 2 {
        // Not a faithful merge: only the last branch survives.
        log::warn!(
            "{label}: response is an allOf of {} schemas, using the last one",
            schema.all_of.len()
        );
        if let Some(last) = schema.all_of.pop() {
            schema = last.into_schema();
        }
    }
    schema
}

/// Hands out display names with unique type stems, suffixing repeats with
/// 2, 3, ... A unique stem also makes the function name unique.
#[derive(Debug, Default)]
struct NameRegistry {
    taken: HashSet<String>,
}

impl NameRegistry {
    fn claim(&mut self, name: &str, path: &str, method: HttpMethod) -> String {
        if self.taken.insert(type_stem(name)) {
            return name.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{name}{n}");
            if self.taken.insert(type_stem(&candidate)) {
                log::warn!(
                    "{method} {path}: name `{name}` is already used, renamed to `{candidate}`"
                );
                return candidate;
            }
            n += 1;
        }
    }
}
