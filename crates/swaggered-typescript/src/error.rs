use thiserror::Error;

use crate::compiler::CompileError;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("template render failed: {0}")]
    Render(#[from] minijinja::Error),

    #[error("type compilation failed: {0}")]
    Compile(#[from] CompileError),
}
