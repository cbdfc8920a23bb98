use swaggered_core::GenerateResult;

use super::service::{emit_service, group_items};
use super::types::emit_types;

/// What ends up in the printed source, and in which shape.
#[derive(Debug, Clone, Default)]
pub struct PrintOptions {
    /// Printed verbatim first.
    pub header: Option<String>,
    /// Print the `request` helper before the functions.
    pub request: bool,
    /// Cluster functions into service objects.
    pub grouped: bool,
    pub return_type: bool,
    pub types_only: bool,
    pub functions_only: bool,
}

/// Assemble the printable source of a run: header, request helper,
/// functions or services, then types.
pub fn render_output(
    result: &GenerateResult,
    opts: &PrintOptions,
) -> Result<String, minijinja::Error> {
    let mut sections: Vec<String> = Vec::new();

    if let Some(header) = opts.header.as_deref().filter(|h| !h.is_empty()) {
        sections.push(header.trim_end().to_string());
    }
    if opts.request
        && let Some(helper) = &result.code_before
    {
        sections.push(helper.trim_end().to_string());
    }

    if !opts.types_only {
        if opts.grouped {
            for group in group_items(&result.list) {
                sections.push(emit_service(&group, opts.return_type)?);
            }
        } else {
            sections.extend(result.list.iter().filter_map(|item| item.code.clone()));
        }
    }

    if !opts.functions_only {
        let types = emit_types(&result.list, result.generic_resp.as_deref());
        if !types.is_empty() {
            sections.push(types);
        }
    }

    if sections.is_empty() {
        return Ok(String::new());
    }
    Ok(sections.join("\n\n") + "\n")
}
