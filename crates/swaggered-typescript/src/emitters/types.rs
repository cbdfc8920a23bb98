use swaggered_core::GeneratedItem;

use crate::adapter::{dedupe_declarations, strip_resp_marker};

/// The type section: the envelope first, then each item's parameters, body
/// and response declarations, markers stripped and duplicates dropped.
pub fn emit_types(items: &[GeneratedItem], generic_resp: Option<&str>) -> String {
    let stripped: Vec<String> = generic_resp
        .into_iter()
        .map(str::to_string)
        .chain(items.iter().flat_map(|item| {
            item.request_parameters_type
                .iter()
                .chain(&item.request_body_type)
                .chain(&item.response_type)
                .map(|decl| strip_resp_marker(decl))
        }))
        .collect();

    dedupe_declarations(stripped.iter().map(String::as_str)).join("\n\n")
}

#[cfg(test)]
mod tests {
    use swaggered_core::FunctionSignature;
    use swaggered_core::ir::HttpMethod;

    use super::*;

    fn item(params: &[&str], response: &[&str]) -> GeneratedItem {
        GeneratedItem {
            path: "/x".into(),
            method: HttpMethod::Get,
            request_parameters_type: params.iter().map(|s| s.to_string()).collect(),
            request_body_type: vec![],
            response_type: response.iter().map(|s| s.to_string()).collect(),
            generic_resp: None,
            summary: "x".into(),
            description: "x".into(),
            group: String::new(),
            deprecated: false,
            code: None,
            signature: FunctionSignature::default(),
        }
    }

    #[test]
    fn test_envelope_first_and_duplicates_dropped() {
        let items = vec![
            item(&["type IAParams = {\n  id: number;\n}"], &["type IBar = {\n  id: number;\n}"]),
            item(&[], &["type IBar__Resp__ = {\n  id: number;\n}", "type IBar = {\n  id: number;\n}"]),
        ];
        assert_eq!(
            emit_types(&items, Some("type Data<T> = {\n  data?: T;\n}")),
            "type Data<T> = {\n  data?: T;\n}\n\ntype IAParams = {\n  id: number;\n}\n\ntype IBar = {\n  id: number;\n}"
        );
    }

    #[test]
    fn test_empty_run_has_no_types() {
        assert_eq!(emit_types(&[], None), "");
    }
}
