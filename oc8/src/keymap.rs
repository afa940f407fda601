use sdl2::keyboard::Scancode;

/// # Keymap
/// The hexadecimal keypad sits on the left 4x4 block of a QWERTY
/// keyboard:
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|      |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
/// Mapped key-to-scancode so the host can poll the whole latch each
/// cycle instead of chasing key events.
pub fn scancode(key: u8) -> Scancode {
    match key & 0xF {
        0x1 => Scancode::Num1,
        0x2 => Scancode::Num2,
        0x3 => Scancode::Num3,
        0xC => Scancode::Num4,
        0x4 => Scancode::Q,
        0x5 => Scancode::W,
        0x6 => Scancode::E,
        0xD => Scancode::R,
        0x7 => Scancode::A,
        0x8 => Scancode::S,
        0x9 => Scancode::D,
        0xE => Scancode::F,
        0xA => Scancode::Z,
        0x0 => Scancode::X,
        0xB => Scancode::C,
        _ => Scancode::V,
    }
}
