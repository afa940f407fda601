/// Decoded views of a 16-bit instruction word.
///
/// The most significant nibble selects one of 16 opcode families. The
/// remaining nibbles carry either operands or a family-specific
/// discriminant:
/// - `nnn` — a 12-bit address (families 1, 2, A, B)
/// - `nn` — an 8-bit immediate (families 3, 4, 6, 7, C)
/// - `x`, `y` — register indices (nibbles 2 and 3)
/// - `n` — a 4-bit immediate (sprite height for family D)
pub trait Opcode {
    /// All four nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// Register index X. `[_x__]`
    fn x(&self) -> u8;

    /// Register index Y. `[__y_]`
    fn y(&self) -> u8;

    /// 4-bit immediate. `[___n]`
    fn n(&self) -> u8;

    /// 8-bit immediate. `[__nn]`
    fn nn(&self) -> u8;

    /// 12-bit address. `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        ((self >> 12) as u8, self.x(), self.y(), self.n())
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn nn(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}
