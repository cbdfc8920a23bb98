//! JSON Schema → TypeScript declarations.
//!
//! A schema compiles to a list of [`Declaration`]s: the schema's own, named
//! after its title, followed by one per titled or recursive sub-schema.
//! Rendering to text is a separate step, see [`render`].

pub mod render;

use std::collections::HashMap;

use swaggered_core::parse::ref_resolve::ref_name;
use swaggered_core::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaType, TypeSet};
use thiserror::Error;

pub use render::{RenderOptions, render_declaration};

/// Name used when a schema has no title.
pub const DEFAULT_NAME: &str = "Schema";

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("cannot compile `{name}`: {reason}")]
    Unsupported { name: String, reason: String },
}

/// A TypeScript type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// `string`, `number`, `unknown`, ...
    Keyword(&'static str),
    /// A JSON literal: `"sold"`, `1`, `true`.
    Literal(String),
    /// Reference to another declaration.
    Named(String),
    /// Emitted verbatim (`tsType`).
    Raw(String),
    Array(Box<TsType>),
    Union(Vec<TsType>),
    Intersection(Vec<TsType>),
    Object(TsObject),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TsObject {
    pub members: Vec<TsMember>,
    /// `[k: string]: T` index signature.
    pub index: Option<Box<TsType>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TsMember {
    pub name: String,
    pub optional: bool,
    pub doc: Option<String>,
    pub ty: TsType,
}

/// A named, top-level type.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub type_params: Vec<String>,
    pub doc: Option<String>,
    pub body: TsType,
    /// Whether the run's name prefix applies to this declaration.
    pub prefixed: bool,
}

impl Declaration {
    pub fn is_object(&self) -> bool {
        matches!(self.body, TsType::Object(_))
    }
}

/// Compile `schema` into its declaration and those of its named sub-schemas.
pub fn compile_schema(schema: &Schema) -> Result<Vec<Declaration>, CompileError> {
    let name = to_safe_type_name(schema.title().unwrap_or(DEFAULT_NAME));
    let mut compiler = Compiler::default();
    compiler.reserve(&name);
    if let Some(anchor) = &schema.anchor {
        compiler.anchors.insert(anchor.clone(), name.clone());
    }

    let body = compiler.body(schema, &name, true)?;
    let mut declarations = vec![Declaration {
        name,
        type_params: Vec::new(),
        doc: schema.description.clone(),
        body,
        prefixed: true,
    }];
    declarations.extend(compiler.declarations);
    Ok(declarations)
}

#[derive(Default)]
struct Compiler {
    declarations: Vec<Declaration>,
    /// Anchor name → declared type name.
    anchors: HashMap<String, String>,
    taken: Vec<String>,
}

impl Compiler {
    fn reserve(&mut self, name: &str) {
        self.taken.push(name.to_string());
    }

    fn unique_name(&self, base: &str) -> String {
        if !self.taken.iter().any(|t| t == base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| !self.taken.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    fn schema_or_ref(&mut self, s: &SchemaOrRef, context: &str) -> Result<TsType, CompileError> {
        match s {
            SchemaOrRef::Ref { ref_path } => {
                match self.anchors.get(&ref_name(ref_path)) {
                    Some(name) => Ok(TsType::Named(name.clone())),
                    None => {
                        log::warn!("{context}: unresolved reference {ref_path}, typed as unknown");
                        Ok(TsType::Keyword("unknown"))
                    }
                }
            }
            SchemaOrRef::Schema(schema) => self.nested(schema, context),
        }
    }

    /// A sub-schema: titled and recursive ones become declarations of their own.
    fn nested(&mut self, schema: &Schema, context: &str) -> Result<TsType, CompileError> {
        if let Some(anchor) = &schema.anchor {
            if let Some(name) = self.anchors.get(anchor) {
                return Ok(TsType::Named(name.clone()));
            }
            let base = to_safe_type_name(schema.title().unwrap_or(anchor));
            let name = self.unique_name(&base);
            self.reserve(&name);
            self.anchors.insert(anchor.clone(), name.clone());
            let body = self.body(schema, &name, false)?;
            self.push(&name, schema, body);
            return Ok(TsType::Named(name));
        }

        let Some(title) = schema.title() else {
            return self.body(schema, context, false);
        };

        let base = to_safe_type_name(title);
        let body = self.body(schema, &base, false)?;
        // The same titled schema reached twice declares once.
        if self
            .declarations
            .iter()
            .any(|d| d.name == base && d.body == body)
        {
            return Ok(TsType::Named(base));
        }
        let name = self.unique_name(&base);
        self.reserve(&name);
        self.push(&name, schema, body);
        Ok(TsType::Named(name))
    }

    fn push(&mut self, name: &str, schema: &Schema, body: TsType) {
        self.declarations.push(Declaration {
            name: name.to_string(),
            type_params: Vec::new(),
            doc: schema.description.clone(),
            body,
            prefixed: true,
        });
    }

    /// The type of `schema` itself, ignoring its title.
    fn body(&mut self, schema: &Schema, context: &str, top: bool) -> Result<TsType, CompileError> {
        let ty = self.structural(schema, context, top)?;
        Ok(if schema.is_nullable() {
            union([ty, TsType::Keyword("null")])
        } else {
            ty
        })
    }

    fn structural(&mut self, schema: &Schema, context: &str, top: bool) -> Result<TsType, CompileError> {
        if let Some(ts_type) = &schema.ts_type {
            return Ok(TsType::Raw(ts_type.clone()));
        }
        if let Some(value) = &schema.const_value {
            return literal(value, context);
        }
        if !schema.enum_values.is_empty() {
            let literals = schema
                .enum_values
                .iter()
                .map(|v| literal(v, context))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(union(literals));
        }
        if !schema.any_of.is_empty() || !schema.one_of.is_empty() {
            let branches = schema
                .any_of
                .iter()
                .chain(&schema.one_of)
                .map(|s| self.schema_or_ref(s, context))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(union(branches));
        }
        if !schema.all_of.is_empty() {
            let mut parts = schema
                .all_of
                .iter()
                .map(|s| self.schema_or_ref(s, context))
                .collect::<Result<Vec<_>, _>>()?;
            if !schema.properties.is_empty() {
                parts.push(self.object(schema, context)?);
            }
            return Ok(intersection(parts));
        }

        match &schema.schema_type {
            Some(TypeSet::Single(t)) => self.typed(*t, schema, context),
            Some(TypeSet::Multiple(types)) => {
                let variants = types
                    .iter()
                    .map(|t| self.typed(*t, schema, context))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(union(variants))
            }
            None if !schema.properties.is_empty() || schema.additional_properties.is_some() => {
                self.object(schema, context)
            }
            None if schema.items.is_some() => self.typed(SchemaType::Array, schema, context),
            // An empty top-level schema is an open object.
            None if top => self.object(schema, context),
            None => Ok(TsType::Keyword("unknown")),
        }
    }

    fn typed(&mut self, t: SchemaType, schema: &Schema, context: &str) -> Result<TsType, CompileError> {
        Ok(match t {
            SchemaType::String if schema.format.as_deref() == Some("binary") => {
                TsType::Keyword("Blob")
            }
            SchemaType::String => TsType::Keyword("string"),
            SchemaType::Number | SchemaType::Integer => TsType::Keyword("number"),
            SchemaType::Boolean => TsType::Keyword("boolean"),
            SchemaType::Null => TsType::Keyword("null"),
            SchemaType::File => TsType::Keyword("Blob"),
            SchemaType::Array => {
                let item = match &schema.items {
                    Some(items) => self.schema_or_ref(items, context)?,
                    None => TsType::Keyword("unknown"),
                };
                TsType::Array(Box::new(item))
            }
            SchemaType::Object => self.object(schema, context)?,
        })
    }

    fn object(&mut self, schema: &Schema, context: &str) -> Result<TsType, CompileError> {
        let mut members = Vec::with_capacity(schema.properties.len());
        for (name, prop) in &schema.properties {
            let member_context = format!("{context}.{name}");
            members.push(TsMember {
                name: name.clone(),
                optional: !schema.required.contains(name),
                doc: prop.as_schema().and_then(|s| s.description.clone()),
                ty: self.schema_or_ref(prop, &member_context)?,
            });
        }

        let index = match &schema.additional_properties {
            Some(AdditionalProperties::Bool(false)) => None,
            Some(AdditionalProperties::Bool(true)) => Some(TsType::Keyword("unknown")),
            Some(AdditionalProperties::Schema(s)) => Some(self.schema_or_ref(s, context)?),
            None if members.is_empty() => Some(TsType::Keyword("unknown")),
            None => None,
        };

        Ok(TsType::Object(TsObject {
            members,
            index: index.map(Box::new),
        }))
    }
}

fn literal(value: &serde_json::Value, context: &str) -> Result<TsType, CompileError> {
    match value {
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            Err(CompileError::Unsupported {
                name: context.to_string(),
                reason: format!("non-scalar enum value {value}"),
            })
        }
        scalar => Ok(TsType::Literal(scalar.to_string())),
    }
}

/// Flatten nested unions and drop repeated variants; a single variant is
/// returned as is.
fn union(variants: impl IntoIterator<Item = TsType>) -> TsType {
    let mut flat: Vec<TsType> = Vec::new();
    for v in variants {
        let parts = match v {
            TsType::Union(inner) => inner,
            other => vec![other],
        };
        for part in parts {
            if !flat.contains(&part) {
                flat.push(part);
            }
        }
    }
    match flat.len() {
        1 => flat.remove(0),
        _ => TsType::Union(flat),
    }
}

fn intersection(parts: Vec<TsType>) -> TsType {
    match parts.len() {
        1 => parts.into_iter().next().unwrap_or(TsType::Keyword("unknown")),
        _ => TsType::Intersection(parts),
    }
}

/// Turn a title into a type name: non-identifier characters are dropped and
/// the letter after each one is capitalised.
///
/// - `BaseResponse[CreateBarResponse]` → `BaseResponseCreateBarResponse`
/// - `pet status` → `PetStatus`
pub fn to_safe_type_name(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut upper_next = true;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
            if out.is_empty() && ch.is_ascii_digit() {
                out.push('_');
            }
            if upper_next {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    if out.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        out
    }
}
