use indexmap::IndexMap;
use minijinja::context;
use swaggered_core::GeneratedItem;
use swaggered_core::transform::name_normalizer::{
    common_path_prefix, is_identifier, lower_first, static_prefix, to_service_name,
};

use super::function::{FunctionSource, FunctionStyle, ServiceRef, emit_function};
use super::{environment, indent};

/// Items sharing a group label, in first-appearance order.
#[derive(Debug)]
pub struct ServiceGroup<'a> {
    pub label: &'a str,
    pub items: Vec<&'a GeneratedItem>,
    /// Longest common path prefix of the members.
    pub common_prefix: String,
    pub name: String,
}

impl ServiceGroup<'_> {
    /// The part of the common prefix that precedes any `{placeholder}`.
    pub fn prefix(&self) -> &str {
        static_prefix(&self.common_prefix)
    }
}

/// Partition `items` by group label and name each group's service.
pub fn group_items(items: &[GeneratedItem]) -> Vec<ServiceGroup<'_>> {
    let mut by_label: IndexMap<&str, Vec<&GeneratedItem>> = IndexMap::new();
    for item in items {
        by_label.entry(item.group.as_str()).or_default().push(item);
    }

    let mut taken: Vec<String> = Vec::new();
    by_label
        .into_iter()
        .enumerate()
        .map(|(index, (label, items))| {
            let paths: Vec<&str> = items.iter().map(|i| i.path.as_str()).collect();
            let common_prefix = common_path_prefix(&paths);
            let mut name = service_name(label, &common_prefix);
            if taken.contains(&name) {
                name = format!("{name}{index}");
            }
            taken.push(name.clone());
            log::debug!("group {label:?}: {} ({} functions)", name, items.len());
            ServiceGroup {
                label,
                items,
                common_prefix,
                name,
            }
        })
        .collect()
}

/// `<label>Service` when the label is an identifier, else named after the
/// last literal segment of the common prefix.
///
/// - `pet` → `petService`
/// - `宠物`, `/api/foo/v1/bar/{bar_id}/baz` → `bazService`
/// - no label, no prefix → `service`
pub fn service_name(label: &str, common_prefix: &str) -> String {
    let base = if is_identifier(label) {
        lower_first(label)
    } else {
        to_service_name(common_prefix)
    };
    if base.is_empty() {
        "service".to_string()
    } else {
        format!("{base}Service")
    }
}

/// Render one service object whose members are the group's functions.
pub fn emit_service(
    group: &ServiceGroup<'_>,
    return_type: bool,
) -> Result<String, minijinja::Error> {
    let env = environment();
    let tmpl = env.get_template("service.ts.j2")?;

    let style = FunctionStyle {
        export: false,
        return_type,
        member: Some(ServiceRef {
            name: &group.name,
            prefix: group.prefix(),
        }),
    };
    let members = group
        .items
        .iter()
        .map(|item| {
            let source = FunctionSource {
                signature: &item.signature,
                path: &item.path,
                method: item.method,
                description: &item.description,
                summary: &item.summary,
                deprecated: item.deprecated,
            };
            emit_function(&source, &style).map(|code| indent(&code, 2))
        })
        .collect::<Result<Vec<_>, _>>()?;

    tmpl.render(context! {
        label => group.label,
        name => group.name.clone(),
        prefix => group.prefix(),
        members => members.join(",\n\n"),
    })
}

#[cfg(test)]
mod tests {
    use swaggered_core::FunctionSignature;
    use swaggered_core::ir::HttpMethod;

    use super::*;

    fn item(group: &str, path: &str, name: &str, method: HttpMethod) -> GeneratedItem {
        GeneratedItem {
            path: path.into(),
            method,
            request_parameters_type: vec![],
            request_body_type: vec![],
            response_type: vec![],
            generic_resp: None,
            summary: name.into(),
            description: name.into(),
            group: group.into(),
            deprecated: false,
            code: None,
            signature: FunctionSignature {
                function_name: name.into(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_service_names() {
        assert_eq!(service_name("pet", "/api/v3/pet"), "petService");
        assert_eq!(service_name("Store", "/store"), "storeService");
        assert_eq!(service_name("宠物", "/api/pets"), "petService");
        assert_eq!(service_name("foo-controller", "/api/foo/evaluate"), "evaluationService");
        assert_eq!(service_name("", ""), "service");
    }

    #[test]
    fn test_groups_keep_first_appearance_order() {
        let items = vec![
            item("pet", "/pet", "updatePet", HttpMethod::Put),
            item("store", "/store/order", "placeOrder", HttpMethod::Post),
            item("pet", "/pet/{petId}", "getPetById", HttpMethod::Get),
        ];
        let groups = group_items(&items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "petService");
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[0].common_prefix, "/pet");
        assert_eq!(groups[1].name, "storeService");
    }

    #[test]
    fn test_colliding_names_get_the_group_index() {
        let items = vec![
            item("", "/", "a", HttpMethod::Get),
            item("中文", "/{id}", "b", HttpMethod::Get),
        ];
        let groups = group_items(&items);
        assert_eq!(groups[0].name, "service");
        assert_eq!(groups[1].name, "service1");
    }

    #[test]
    fn test_prefix_stops_before_placeholders() {
        let items = vec![
            item("bar", "/api/foo/v1/bar/{bar_id}/baz/{baz_id}", "deleteBar", HttpMethod::Delete),
            item("bar", "/api/foo/v1/bar/{bar_id}/baz/{baz_id}", "getBaz", HttpMethod::Get),
        ];
        let groups = group_items(&items);
        assert_eq!(groups[0].prefix(), "/api/foo/v1/bar");
    }

    #[test]
    fn test_emit_service() {
        let mut items = vec![
            item("store", "/store/inventory", "getInventory", HttpMethod::Get),
            item("store", "/store/order", "placeOrder", HttpMethod::Post),
        ];
        items[0].signature.response_generic = Some("IGetInventoryResponseData".into());
        items[1].description = "Place an order for a pet.".into();

        let groups = group_items(&items);
        insta::assert_snapshot!(emit_service(&groups[0], true).unwrap(), @r"
        /** store */
        export const storeService = {
          prefix: '/store',

          async getInventory(): Promise<IGetInventoryResponseData> {
            return request<IGetInventoryResponseData>(`${storeService.prefix}/inventory`, {
              method: 'GET'
            });
          },

          /**
           * Place an order for a pet.
           */
          async placeOrder() {
            return request(`${storeService.prefix}/order`, {
              method: 'POST'
            });
          }
        };
        ");
    }
}
