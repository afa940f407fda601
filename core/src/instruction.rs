use crate::opcode::Opcode;
use crate::operations::*;

/// Selects the handler for an instruction word.
///
/// Dispatch is two-level: the top nibble picks the family, and for
/// families 0, 5, 8, 9, E and F a second discriminant picks the member.
/// Undefined combinations inside a known family fall through to `nop`,
/// which leaves PC advanced and everything else alone.
pub(crate) fn from_op(op: &dyn Opcode) -> Operation {
    match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => cls,
        (0x0, 0x0, 0xE, 0xE) => ret,
        (0x0, ..) => sys,
        (0x1, ..) => jp,
        (0x2, ..) => call,
        (0x3, ..) => se_byte,
        (0x4, ..) => sne_byte,
        (0x5, .., 0x0) => se_reg,
        (0x6, ..) => ld_byte,
        (0x7, ..) => add_byte,
        (0x8, .., 0x0) => ld_reg,
        (0x8, .., 0x1) => or,
        (0x8, .., 0x2) => and,
        (0x8, .., 0x3) => xor,
        (0x8, .., 0x4) => add_reg,
        (0x8, .., 0x5) => sub,
        (0x8, .., 0x6) => shr,
        (0x8, .., 0x7) => subn,
        (0x8, .., 0xE) => shl,
        (0x9, .., 0x0) => sne_reg,
        (0xA, ..) => ld_index,
        (0xB, ..) => jp_offset,
        (0xC, ..) => rnd,
        (0xD, ..) => drw,
        (0xE, .., 0x9, 0xE) => skp,
        (0xE, .., 0xA, 0x1) => sknp,
        (0xF, .., 0x0, 0x7) => ld_delay,
        (0xF, .., 0x0, 0xA) => ld_key,
        (0xF, .., 0x1, 0x5) => set_delay,
        (0xF, .., 0x1, 0x8) => set_sound,
        (0xF, .., 0x1, 0xE) => add_index,
        (0xF, .., 0x2, 0x9) => ld_glyph,
        (0xF, .., 0x3, 0x3) => bcd,
        (0xF, .., 0x5, 0x5) => store_regs,
        (0xF, .., 0x6, 0x5) => load_regs,
        _ => nop,
    }
}
