use crate::*;
pub use density::*;

mod density;

/// Seam between the engine and a mine-placement policy.
pub trait MinefieldGenerator {
    fn generate(self, config: FieldConfig) -> MineLayout;
}
