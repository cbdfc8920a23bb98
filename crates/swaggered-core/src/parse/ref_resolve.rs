use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::ResolveError;

/// Key written on the expansion that a recursive reference points back to.
pub const ANCHOR_KEY: &str = "x-swaggered-anchor";

/// Resolves every local `$ref` pointer in a raw document.
///
/// Works on any `#/...` JSON pointer, so Swagger 2.0 `#/definitions/..`
/// and OpenAPI 3.x `#/components/..` targets resolve the same way. A
/// reference met again while it is being expanded stays in place as a
/// back-edge, and the expansion it re-enters is marked with
/// [`ANCHOR_KEY`] so later stages can name the cycle.
pub struct RefResolver<'a> {
    root: &'a Value,
    stack: Vec<String>,
    cycles: HashSet<String>,
}

impl<'a> RefResolver<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self {
            root,
            stack: Vec::new(),
            cycles: HashSet::new(),
        }
    }

    /// Resolve the whole document, returning a copy with no `$ref` nodes
    /// other than recursive back-edges.
    pub fn resolve_document(&mut self) -> Result<Value, ResolveError> {
        self.resolve(self.root)
    }

    pub fn resolve(&mut self, node: &Value) -> Result<Value, ResolveError> {
        match node {
            Value::Object(map) => {
                if let Some(Value::String(ref_path)) = map.get("$ref") {
                    return self.resolve_ref(ref_path, map);
                }
                let mut resolved = Map::with_capacity(map.len());
                for (key, value) in map {
                    resolved.insert(key.clone(), self.resolve(value)?);
                }
                Ok(Value::Object(resolved))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    fn resolve_ref(
        &mut self,
        ref_path: &str,
        siblings: &Map<String, Value>,
    ) -> Result<Value, ResolveError> {
        if self.stack.iter().any(|r| r == ref_path) {
            // Recursive reference: keep the back-edge.
            self.cycles.insert(ref_path.to_string());
            let mut back_edge = Map::new();
            back_edge.insert("$ref".to_string(), Value::String(ref_path.to_string()));
            return Ok(Value::Object(back_edge));
        }

        let target = self.lookup(ref_path)?;
        self.stack.push(ref_path.to_string());
        let mut resolved = self.resolve(target)?;
        self.stack.pop();

        if let Value::Object(map) = &mut resolved {
            if self.cycles.remove(ref_path) {
                map.insert(ANCHOR_KEY.to_string(), Value::String(ref_name(ref_path)));
            }
            // OpenAPI 3.1 allows keywords next to `$ref`; they refine the target.
            for (key, value) in siblings {
                if key != "$ref" {
                    map.insert(key.clone(), self.resolve(value)?);
                }
            }
        }

        Ok(resolved)
    }

    fn lookup(&self, ref_path: &str) -> Result<&'a Value, ResolveError> {
        let pointer = match ref_path.strip_prefix('#') {
            Some(pointer) => pointer,
            None => return Err(ResolveError::ExternalRef(ref_path.to_string())),
        };
        if !pointer.starts_with('/') {
            return Err(ResolveError::InvalidRefFormat(ref_path.to_string()));
        }
        self.root
            .pointer(pointer)
            .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))
    }
}

/// Resolve every `$ref` in `doc`.
pub fn dereference(doc: &Value) -> Result<Value, ResolveError> {
    RefResolver::new(doc).resolve_document()
}

/// The last segment of a `$ref`, unescaped: `#/components/schemas/Node` → `Node`.
pub fn ref_name(ref_path: &str) -> String {
    let last = ref_path.rsplit('/').next().unwrap_or(ref_path);
    last.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolves_swagger2_definitions() {
        let doc = json!({
            "swagger": "2.0",
            "paths": { "/pet": { "get": { "responses": { "200": {
                "schema": { "$ref": "#/definitions/Pet" }
            }}}}},
            "definitions": { "Pet": { "type": "object", "properties": {
                "tag": { "$ref": "#/definitions/Tag" }
            }}, "Tag": { "type": "string" } }
        });

        let resolved = dereference(&doc).unwrap();
        let schema = &resolved["paths"]["/pet"]["get"]["responses"]["200"]["schema"];
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["tag"]["type"], "string");
    }

    #[test]
    fn resolves_parameter_refs() {
        let doc = json!({
            "openapi": "3.0.0",
            "paths": { "/a": { "get": { "parameters": [
                { "$ref": "#/components/parameters/Limit" }
            ]}}},
            "components": { "parameters": { "Limit": {
                "name": "limit", "in": "query", "schema": { "type": "integer" }
            }}}
        });

        let resolved = dereference(&doc).unwrap();
        assert_eq!(resolved["paths"]["/a"]["get"]["parameters"][0]["name"], "limit");
    }

    #[test]
    fn recursive_schema_keeps_back_edge_and_anchor() {
        let doc = json!({
            "openapi": "3.0.0",
            "paths": {},
            "components": { "schemas": { "Node": {
                "type": "object",
                "properties": {
                    "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } }
                }
            }}},
            "x-root": { "$ref": "#/components/schemas/Node" }
        });

        let resolved = dereference(&doc).unwrap();
        let root = &resolved["x-root"];
        assert_eq!(root[ANCHOR_KEY], "Node");
        assert_eq!(
            root["properties"]["children"]["items"]["$ref"],
            "#/components/schemas/Node"
        );
    }

    #[test]
    fn sibling_keywords_override_target() {
        let doc = json!({
            "openapi": "3.1.0",
            "a": { "$ref": "#/b", "description": "override" },
            "b": { "type": "string", "description": "original" }
        });

        let resolved = dereference(&doc).unwrap();
        assert_eq!(resolved["a"]["description"], "override");
        assert_eq!(resolved["a"]["type"], "string");
    }

    #[test]
    fn dangling_ref_is_an_error() {
        let doc = json!({ "a": { "$ref": "#/definitions/Missing" } });
        assert!(matches!(
            dereference(&doc),
            Err(ResolveError::RefTargetNotFound(_))
        ));
    }

    #[test]
    fn external_ref_is_an_error() {
        let doc = json!({ "a": { "$ref": "other.yaml#/Pet" } });
        assert!(matches!(dereference(&doc), Err(ResolveError::ExternalRef(_))));
    }

    #[test]
    fn ref_name_unescapes() {
        assert_eq!(ref_name("#/components/schemas/Node"), "Node");
        assert_eq!(ref_name("#/definitions/a~1b"), "a/b");
    }
}
