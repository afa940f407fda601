/// Compatibility toggles for opcode families that historically diverged
/// across interpreters. Fixed at machine construction.
///
/// The defaults pick the commonly agreed modern behavior: shifts act on
/// VX in place, FX55/FX65 leave I untouched, and BNNN indexes with V0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// 8XY6/8XYE copy VY into VX before shifting, as the original
    /// interpreter did.
    pub shift_copies_vy: bool,
    /// FX55/FX65 advance I by X + 1 after the block copy.
    pub load_store_increments_i: bool,
    /// BNNN becomes BXNN: the jump offset comes from VX instead of V0.
    pub jump_uses_vx: bool,
}
