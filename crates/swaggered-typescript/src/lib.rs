pub mod adapter;
pub mod compiler;
pub mod emitters;
pub mod error;
pub mod generator;
pub mod synthesize;

pub use emitters::output::{PrintOptions, render_output};
pub use error::GeneratorError;
pub use generator::TypeScriptGenerator;
