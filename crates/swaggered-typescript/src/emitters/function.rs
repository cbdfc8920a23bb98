use std::sync::LazyLock;

use minijinja::context;
use regex::{Captures, Regex};
use swaggered_core::FunctionSignature;
use swaggered_core::ir::HttpMethod;
use swaggered_core::transform::name_normalizer::is_identifier;

use super::{environment, escape_jsdoc};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}/]+)\}").expect("placeholder pattern is valid"));

/// Everything a request function is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct FunctionSource<'a> {
    pub signature: &'a FunctionSignature,
    pub path: &'a str,
    pub method: HttpMethod,
    pub description: &'a str,
    /// Display name; a description equal to it is not repeated as a doc.
    pub summary: &'a str,
    pub deprecated: bool,
}

/// The service a member function belongs to.
#[derive(Debug, Clone, Copy)]
pub struct ServiceRef<'a> {
    pub name: &'a str,
    /// Static path prefix replaced by `${<name>.prefix}`; may be empty.
    pub prefix: &'a str,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionStyle<'a> {
    pub export: bool,
    pub return_type: bool,
    /// Render as an object method of this service.
    pub member: Option<ServiceRef<'a>>,
}

/// Render one `request` call wrapped in an async function.
pub fn emit_function(
    source: &FunctionSource<'_>,
    style: &FunctionStyle<'_>,
) -> Result<String, minijinja::Error> {
    let env = environment();
    let tmpl = env.get_template("function.ts.j2")?;
    let sig = source.signature;

    let mut args = Vec::new();
    if let Some(params) = &sig.params_type {
        args.push(format!("params: {params}"));
    }
    if let Some(body) = &sig.body_type {
        args.push(format!("data: {body}"));
    }

    let mut options = vec![format!("method: '{}'", source.method.as_upper())];
    if sig.params_type.is_some() && !sig.params_in_path {
        options.push("params".to_string());
    }
    if sig.body_type.is_some() {
        options.push("data".to_string());
    }
    let last = options.len() - 1;
    let options: Vec<String> = options
        .into_iter()
        .enumerate()
        .map(|(i, o)| if i == last { o } else { format!("{o},") })
        .collect();

    tmpl.render(context! {
        doc_lines => doc_lines(source),
        member => style.member.is_some(),
        export => style.export,
        name => sig.function_name.clone(),
        args => args,
        return_type => style.return_type.then(|| sig.response_generic.clone()).flatten(),
        generic => sig.response_generic.clone(),
        path => path_expression(source.path, sig.params_type.is_some(), style.member),
        options => options,
    })
}

fn doc_lines(source: &FunctionSource<'_>) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let description = source.description.trim();
    if !description.is_empty() && description != source.summary {
        lines.extend(description.lines().map(|line| {
            let line = escape_jsdoc(line.trim_end().to_string());
            if line.is_empty() {
                " *".to_string()
            } else {
                format!(" * {line}")
            }
        }));
    }
    if source.deprecated {
        lines.push(" * @deprecated".to_string());
    }
    lines
}

/// The path as a TypeScript string: a template literal when anything was
/// interpolated, a single-quoted string otherwise.
///
/// - `/pet/{petId}` with params → `` `/pet/${params.petId}` ``
/// - `/pet` in a service with prefix `/pet` → `` `${petService.prefix}` ``
/// - `/store/inventory` → `'/store/inventory'`
pub fn path_expression(path: &str, has_params: bool, member: Option<ServiceRef<'_>>) -> String {
    let mut interpolated = false;
    let mut out = String::new();

    let mut rest = path;
    if let Some(svc) = member
        && !svc.prefix.is_empty()
        && let Some(tail) = path.strip_prefix(svc.prefix)
    {
        out.push_str(&format!("${{{}.prefix}}", svc.name));
        rest = tail;
        interpolated = true;
    }

    if has_params {
        let replaced = PLACEHOLDER.replace_all(rest, |caps: &Captures<'_>| {
            let name = &caps[1];
            if is_identifier(name) {
                format!("${{params.{name}}}")
            } else {
                format!("${{params[{name:?}]}}")
            }
        });
        interpolated |= replaced != rest;
        out.push_str(&replaced);
    } else {
        out.push_str(rest);
    }

    if interpolated {
        format!("`{out}`")
    } else {
        format!("'{out}'")
    }
}
