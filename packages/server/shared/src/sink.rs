//! The seam between the bridge and the variable tree it writes into.

use crate::records::VarValue;
use crate::registry::{CategorySpec, VariableSpec};
use anyhow::Result;

/// Receiver of normalized metric values and of structural maintenance driven
/// by the enable flags. The production implementation lives in the `vartree`
/// crate; tests substitute their own.
#[async_trait::async_trait]
pub trait StateSink: Send + Sync {
    /// Writes one value, last-write-wins per ident.
    async fn set_value(&self, ident: &str, value: VarValue) -> Result<()>;

    /// Creates the slot when `keep` and it is missing, deletes it when
    /// `!keep` and it exists. Must be idempotent.
    async fn maintain_variable(
        &self,
        spec: &VariableSpec,
        parent: Option<&'static str>,
        keep: bool,
    ) -> Result<()>;

    /// Same contract as `maintain_variable`, for grouping categories.
    async fn maintain_category(&self, spec: &CategorySpec, keep: bool) -> Result<()>;
}
