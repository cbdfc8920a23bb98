pub mod function;
pub mod output;
pub mod service;
pub mod types;

use minijinja::Environment;

/// Escape `*/` sequences that would prematurely close JSDoc comment blocks.
pub(crate) fn escape_jsdoc(value: String) -> String {
    value.replace("*/", "*\\/")
}

/// Template environment with every emitter template loaded.
pub(crate) fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_filter("escape_jsdoc", escape_jsdoc);
    env.add_template(
        "function.ts.j2",
        include_str!("../../templates/function.ts.j2"),
    )
    .expect("template should be valid");
    env.add_template("service.ts.j2", include_str!("../../templates/service.ts.j2"))
        .expect("template should be valid");
    env
}

/// Indent every non-empty line of `text` by `spaces`.
pub(crate) fn indent(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
