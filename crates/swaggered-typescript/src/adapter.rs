//! Glue between synthesized schemas and the type compiler: constraint
//! annotation, rendering, the `Data<T>` envelope and de-duplication.

use std::rc::Rc;

use indexmap::IndexSet;

use swaggered_core::parse::schema::{ExclusiveBound, Schema, SchemaOrRef};

use crate::compiler::{self, CompileError, RenderOptions, render_declaration};

/// Title suffix marking a response typed as a whole rather than through the
/// envelope.
pub const RESP_MARKER: &str = "__Resp__";

/// Name of the envelope declaration and of its type parameter.
pub const ENVELOPE_NAME: &str = "Data";
pub const ENVELOPE_PARAM: &str = "T";

/// Field used as the envelope payload when no property is an object.
pub const FALLBACK_ENVELOPE_FIELD: &str = "data";

/// A compiled schema: the (prefixed) name of its own declaration and the
/// text of every declaration it produced.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub name: String,
    pub declarations: Vec<String>,
}

/// Annotate, compile and render `schema`.
pub fn compile(mut schema: Schema, opts: &RenderOptions) -> Result<Compiled, CompileError> {
    annotate_constraints(&mut schema);
    let declarations = compiler::compile_schema(&schema)?;
    let name = declarations
        .first()
        .map(|d| format!("{}{}", opts.prefix, d.name))
        .unwrap_or_default();
    Ok(Compiled {
        name,
        declarations: declarations
            .iter()
            .map(|d| render_declaration(d, opts))
            .collect(),
    })
}

/// The run's shared response envelope.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Rendered `Data<T>` declaration(s).
    pub declaration: Rc<str>,
    /// Property whose type became `T`.
    pub field: String,
}

/// Derive the shared `Data<T>` declaration from a response envelope.
///
/// The payload field is the first property that is an object with
/// properties of its own, else `data`. Without either there is no
/// envelope and `None` is returned.
pub fn gen_generic_resp_type(
    response: &Schema,
    opts: &RenderOptions,
) -> Result<Option<Envelope>, CompileError> {
    let field = response
        .properties
        .iter()
        .find(|(_, prop)| {
            prop.as_schema()
                .is_some_and(|s| s.is_object() && !s.properties.is_empty())
        })
        .map(|(name, _)| name.clone())
        .or_else(|| {
            response
                .properties
                .contains_key(FALLBACK_ENVELOPE_FIELD)
                .then(|| FALLBACK_ENVELOPE_FIELD.to_string())
        });
    let Some(field) = field else {
        log::warn!("response has no envelope field, typing it as a whole");
        return Ok(None);
    };
    log::debug!("envelope payload field: {field}");

    let mut envelope = response.clone();
    envelope.title = Some(ENVELOPE_NAME.to_string());
    envelope.description = None;
    envelope.anchor = None;
    envelope.properties.insert(
        field.clone(),
        SchemaOrRef::from(Schema {
            ts_type: Some(ENVELOPE_PARAM.to_string()),
            ..Default::default()
        }),
    );
    annotate_constraints(&mut envelope);

    let mut declarations = compiler::compile_schema(&envelope)?;
    if let Some(first) = declarations.first_mut() {
        first.type_params = vec![ENVELOPE_PARAM.to_string()];
        first.prefixed = false;
    }
    let declaration = declarations
        .iter()
        .map(|d| render_declaration(d, opts))
        .collect::<Vec<_>>()
        .join("\n\n");
    Ok(Some(Envelope {
        declaration: Rc::from(declaration),
        field,
    }))
}

pub fn strip_resp_marker(text: &str) -> String {
    text.replace(RESP_MARKER, "")
}

/// Keep the first occurrence of each declaration, compared by trimmed text.
pub fn dedupe_declarations<'a>(declarations: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    declarations
        .into_iter()
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .collect::<IndexSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Append a `range **[a, b]**` / `length **[a, b]**` line to the description
/// of every constrained property.
pub fn annotate_constraints(schema: &mut Schema) {
    for prop in schema.properties.values_mut() {
        if let SchemaOrRef::Schema(prop) = prop {
            annotate_property(prop);
            annotate_constraints(prop);
        }
    }
    let nested = schema
        .items
        .iter_mut()
        .map(|b| &mut **b)
        .chain(schema.all_of.iter_mut())
        .chain(schema.any_of.iter_mut())
        .chain(schema.one_of.iter_mut());
    for sub in nested {
        if let SchemaOrRef::Schema(sub) = sub {
            annotate_constraints(sub);
        }
    }
}

fn annotate_property(prop: &mut Schema) {
    let mut notes = Vec::new();
    if let Some(range) = numeric_range(prop_bounds(
        prop.minimum,
        prop.maximum,
        prop.exclusive_minimum,
        prop.exclusive_maximum,
    )) {
        notes.push(format!("range **{range}**"));
    }
    if prop.min_length.is_some() || prop.max_length.is_some() {
        let min = prop.min_length.unwrap_or(0);
        let max = prop
            .max_length
            .map_or_else(|| "+∞".to_string(), |m| m.to_string());
        notes.push(format!("length **[{min}, {max}]**"));
    }

    if let Some(description) = prop.description.as_mut().filter(|d| !d.trim().is_empty()) {
        for note in notes {
            description.push('\n');
            description.push_str(&note);
        }
    }
}

struct Bounds {
    lower: Option<(f64, bool)>,
    upper: Option<(f64, bool)>,
}

/// Fold the 3.0 flag form and the 3.1 value form into `(bound, exclusive)`.
fn prop_bounds(
    minimum: Option<f64>,
    maximum: Option<f64>,
    exclusive_minimum: Option<ExclusiveBound>,
    exclusive_maximum: Option<ExclusiveBound>,
) -> Bounds {
    let fold = |inclusive: Option<f64>, exclusive: Option<ExclusiveBound>| match exclusive {
        Some(ExclusiveBound::Value(v)) => Some((v, true)),
        Some(ExclusiveBound::Flag(flag)) => inclusive.map(|v| (v, flag)),
        None => inclusive.map(|v| (v, false)),
    };
    Bounds {
        lower: fold(minimum, exclusive_minimum),
        upper: fold(maximum, exclusive_maximum),
    }
}

fn numeric_range(bounds: Bounds) -> Option<String> {
    if bounds.lower.is_none() && bounds.upper.is_none() {
        return None;
    }
    let (open, lower) = match bounds.lower {
        Some((v, exclusive)) => (if exclusive { '(' } else { '[' }, format_number(v)),
        None => ('[', "-∞".to_string()),
    };
    let (close, upper) = match bounds.upper {
        Some((v, exclusive)) => (if exclusive { ')' } else { ']' }, format_number(v)),
        None => (']', "+∞".to_string()),
    };
    Some(format!("{open}{lower}, {upper}{close}"))
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}
