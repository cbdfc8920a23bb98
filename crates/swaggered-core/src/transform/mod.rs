pub mod name_normalizer;
pub mod normalize;
pub mod spec_to_ir;

pub use spec_to_ir::{extract_operations, transform};
