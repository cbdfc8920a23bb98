use regex::Regex;
use serde_json::Value;

use crate::config::Filter;
use crate::error::TransformError;
use crate::parse::operation::HttpMethod;
use crate::parse::spec::{Document, SpecVersion};

/// Clear the `title` of every schema that sits directly under a
/// `properties` map, so property schemas never become named types.
pub fn strip_property_titles(node: &mut Value) {
    match node {
        Value::Object(map) => {
            if let Some(Value::Object(props)) = map.get_mut("properties") {
                for prop in props.values_mut() {
                    if let Some(title) = prop.get_mut("title") {
                        *title = Value::String(String::new());
                    }
                }
            }
            for value in map.values_mut() {
                strip_property_titles(value);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(strip_property_titles),
        _ => {}
    }
}

/// Number of operations in the document, ignoring `OPTIONS`.
pub fn count_operations(doc: &Document) -> usize {
    doc.paths
        .values()
        .flat_map(|item| item.operations.keys())
        .filter(|m| **m != HttpMethod::Options)
        .count()
}

/// Drop paths that do not match the api pattern, then methods that do not
/// match the method pattern. Paths left without operations are dropped.
pub fn filter_paths(doc: &mut Document, filter: &Filter) -> Result<(), TransformError> {
    if filter.matches_all() {
        return Ok(());
    }

    let api = filter.api_pattern().map(compile_pattern).transpose()?;
    let method = filter
        .method_pattern()
        .map(|raw| compile_pattern(raw).map(|re| (raw, re)))
        .transpose()?;

    doc.paths.retain(|path, item| {
        if let Some(re) = &api
            && !re.is_match(path)
        {
            return false;
        }
        if let Some((raw, re)) = &method {
            item.operations
                .retain(|m, _| m.as_str().eq_ignore_ascii_case(raw) || re.is_match(m.as_str()));
        }
        !item.operations.is_empty()
    });

    log::debug!("{} paths left after filtering", doc.paths.len());
    Ok(())
}

fn compile_pattern(pattern: &str) -> Result<Regex, TransformError> {
    Regex::new(pattern).map_err(|source| TransformError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// The path prefix every operation path is served under.
///
/// Swagger 2.0 uses `basePath`; OpenAPI 3.x uses the path component of
/// the first server URL.
pub fn base_path(doc: &Document) -> Option<String> {
    let raw = match doc.version {
        SpecVersion::Swagger2 => doc.base_path.clone()?,
        SpecVersion::OpenApi3 => strip_host(&doc.servers.first()?.url),
    };
    let trimmed = raw.trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Keep only the path of a URL: `https://host/api/v3` → `/api/v3`.
/// Relative URLs are returned unchanged.
pub fn strip_host(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.has_host() => parsed.path().to_string(),
        _ => match url.split_once("://") {
            // Templated hosts such as `{scheme}://{host}/v1` do not parse.
            Some((_, rest)) => rest.find('/').map(|i| rest[i..].to_string()).unwrap_or_default(),
            None => url.to_string(),
        },
    }
}

/// Join the base path onto an operation path unless it is already there.
pub fn join_base_path(base_path: Option<&str>, path: &str) -> String {
    match base_path {
        Some(base) if !path.starts_with(base) => format!("{base}{path}"),
        _ => path.to_string(),
    }
}
