use swaggered_core::transform::name_normalizer::is_identifier;

use super::{Declaration, TsObject, TsType};

const INDENT: &str = "  ";

/// How declarations are printed.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Prepended to declared names and to references between them.
    pub prefix: String,
    /// `interface X {}` for object bodies instead of `type X = {}`.
    pub use_interface: bool,
    pub export: bool,
}

/// Render one declaration, including its doc comment.
pub fn render_declaration(decl: &Declaration, opts: &RenderOptions) -> String {
    let mut out = String::new();
    if let Some(doc) = &decl.doc {
        push_doc(&mut out, doc, "");
    }
    if opts.export {
        out.push_str("export ");
    }

    let mut name = if decl.prefixed {
        format!("{}{}", opts.prefix, decl.name)
    } else {
        decl.name.clone()
    };
    if !decl.type_params.is_empty() {
        name = format!("{name}<{}>", decl.type_params.join(", "));
    }

    match &decl.body {
        TsType::Object(obj) if opts.use_interface => {
            out.push_str(&format!("interface {name} {}", render_object(obj, 0, opts)));
        }
        TsType::Object(obj) => {
            out.push_str(&format!("type {name} = {}", render_object(obj, 0, opts)));
        }
        other => {
            out.push_str(&format!("type {name} = {};", render_type(other, 0, opts)));
        }
    }
    out
}

/// Render a type expression; `depth` is the indentation level of the line it
/// starts on.
pub fn render_type(ty: &TsType, depth: usize, opts: &RenderOptions) -> String {
    match ty {
        TsType::Keyword(k) => (*k).to_string(),
        TsType::Literal(l) | TsType::Raw(l) => l.clone(),
        TsType::Named(n) => format!("{}{n}", opts.prefix),
        TsType::Array(inner) => {
            let inner_ts = render_type(inner, depth, opts);
            if matches!(**inner, TsType::Union(_) | TsType::Intersection(_)) {
                format!("({inner_ts})[]")
            } else {
                format!("{inner_ts}[]")
            }
        }
        TsType::Union(variants) => variants
            .iter()
            .map(|v| render_type(v, depth, opts))
            .collect::<Vec<_>>()
            .join(" | "),
        TsType::Intersection(parts) => parts
            .iter()
            .map(|p| match p {
                TsType::Union(_) => format!("({})", render_type(p, depth, opts)),
                _ => render_type(p, depth, opts),
            })
            .collect::<Vec<_>>()
            .join(" & "),
        TsType::Object(obj) => render_object(obj, depth, opts),
    }
}

fn render_object(obj: &TsObject, depth: usize, opts: &RenderOptions) -> String {
    if obj.members.is_empty() && obj.index.is_none() {
        return "{}".to_string();
    }

    let pad = INDENT.repeat(depth + 1);
    let mut out = String::from("{\n");
    for member in &obj.members {
        if let Some(doc) = &member.doc {
            push_doc(&mut out, doc, &pad);
        }
        let key = if is_identifier(&member.name) {
            member.name.clone()
        } else {
            format!("{:?}", member.name)
        };
        let optional = if member.optional { "?" } else { "" };
        let ty = render_type(&member.ty, depth + 1, opts);
        out.push_str(&format!("{pad}{key}{optional}: {ty};\n"));
    }
    if let Some(index) = &obj.index {
        let ty = render_type(index, depth + 1, opts);
        out.push_str(&format!("{pad}[k: string]: {ty};\n"));
    }
    out.push_str(&INDENT.repeat(depth));
    out.push('}');
    out
}

fn push_doc(out: &mut String, doc: &str, pad: &str) {
    out.push_str(pad);
    out.push_str("/**\n");
    for line in doc.lines() {
        let line = line.replace("*/", "*\\/");
        if line.trim().is_empty() {
            out.push_str(&format!("{pad} *\n"));
        } else {
            out.push_str(&format!("{pad} * {line}\n"));
        }
    }
    out.push_str(pad);
    out.push_str(" */\n");
}

#[cfg(test)]
mod tests {
    use super::super::TsMember;
    use super::*;

    fn member(name: &str, optional: bool, ty: TsType) -> TsMember {
        TsMember {
            name: name.into(),
            optional,
            doc: None,
            ty,
        }
    }

    fn decl(name: &str, body: TsType) -> Declaration {
        Declaration {
            name: name.into(),
            type_params: vec![],
            doc: None,
            body,
            prefixed: true,
        }
    }

    fn opts() -> RenderOptions {
        RenderOptions {
            prefix: "I".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_alias() {
        let out = render_declaration(&decl("DeleteBarResponseData", TsType::Keyword("string")), &opts());
        assert_eq!(out, "type IDeleteBarResponseData = string;");
    }

    #[test]
    fn test_object_alias_and_interface() {
        let body = TsType::Object(TsObject {
            members: vec![
                member("bar_id", false, TsType::Keyword("number")),
                member("x-trace", true, TsType::Named("Trace".into())),
            ],
            index: None,
        });
        let d = decl("Params", body);

        assert_eq!(
            render_declaration(&d, &opts()),
            "type IParams = {\n  bar_id: number;\n  \"x-trace\"?: ITrace;\n}"
        );

        let iface = RenderOptions {
            use_interface: true,
            export: true,
            ..opts()
        };
        assert_eq!(
            render_declaration(&d, &iface),
            "export interface IParams {\n  bar_id: number;\n  \"x-trace\"?: ITrace;\n}"
        );
    }

    #[test]
    fn test_generic_declaration_is_not_prefixed() {
        let d = Declaration {
            name: "Data".into(),
            type_params: vec!["T".into()],
            doc: None,
            body: TsType::Object(TsObject {
                members: vec![
                    member("code", false, TsType::Keyword("number")),
                    member("data", true, TsType::Raw("T".into())),
                ],
                index: None,
            }),
            prefixed: false,
        };
        assert_eq!(
            render_declaration(&d, &opts()),
            "type Data<T> = {\n  code: number;\n  data?: T;\n}"
        );
    }

    #[test]
    fn test_member_docs_and_nesting() {
        let inner = TsType::Object(TsObject {
            members: vec![TsMember {
                name: "id".into(),
                optional: true,
                doc: Some("identifier\nrange **[1, +∞]**".into()),
                ty: TsType::Keyword("number"),
            }],
            index: Some(Box::new(TsType::Keyword("unknown"))),
        });
        let d = decl("Outer", TsType::Object(TsObject {
            members: vec![member("inner", false, inner)],
            index: None,
        }));
        assert_eq!(
            render_declaration(&d, &opts()),
            "type IOuter = {\n  inner: {\n    /**\n     * identifier\n     * range **[1, +∞]**\n     */\n    id?: number;\n    [k: string]: unknown;\n  };\n}"
        );
    }

    #[test]
    fn test_array_of_union_is_parenthesized() {
        let ty = TsType::Array(Box::new(TsType::Union(vec![
            TsType::Keyword("string"),
            TsType::Keyword("number"),
        ])));
        assert_eq!(render_type(&ty, 0, &opts()), "(string | number)[]");
    }

    #[test]
    fn test_doc_comment_terminator_is_escaped() {
        let d = Declaration {
            doc: Some("ends */ early".into()),
            ..decl("X", TsType::Keyword("boolean"))
        };
        assert_eq!(
            render_declaration(&d, &RenderOptions::default()),
            "/**\n * ends *\\/ early\n */\ntype X = boolean;"
        );
    }
}
