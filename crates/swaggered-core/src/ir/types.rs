use super::operations::IrOperation;

/// The extracted, filtered operations of one document.
#[derive(Debug, Clone, Default)]
pub struct IrSpec {
    /// Path prefix joined onto every operation path.
    pub base_path: Option<String>,
    /// Operation count before filtering.
    pub total: usize,
    /// Operations in document order, after filtering.
    pub operations: Vec<IrOperation>,
}
