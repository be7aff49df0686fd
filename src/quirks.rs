/// Behaviour switches for instructions that differ between interpreters.
/// The defaults match most modern interpreters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    /// 8XY6 / 8XYE load VY into VX before shifting (original COSMAC VIP).
    pub shift_uses_vy: bool,
    /// FX55 / FX65 leave I pointing one past the last register touched.
    pub load_store_increments_index: bool,
}

impl Quirks {
    /// Everything switched to the COSMAC VIP behaviour.
    pub fn cosmac() -> Self {
        Self {
            shift_uses_vy: true,
            load_store_increments_index: true,
        }
    }
}
