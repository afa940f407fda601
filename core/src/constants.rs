/// Total addressable memory in bytes. Addresses at or past this fault.
pub const MEMORY_SIZE: usize = 0x1000;

/// First address of the program image; everything below is reserved for
/// interpreter data such as the font sprites.
pub const PROGRAM_START: u16 = 0x200;

/// Largest program image that fits between `PROGRAM_START` and the end
/// of memory.
pub const MAX_IMAGE_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Horizontal display resolution in pixels.
pub const DISPLAY_WIDTH: usize = 64;

/// Vertical display resolution in pixels.
pub const DISPLAY_HEIGHT: usize = 32;

/// Maximum number of nested subroutine calls.
pub const STACK_DEPTH: usize = 16;

/// Rate at which the delay and sound timers count down, in Hz.
pub const TIMER_HZ: u32 = 60;

/// Address the host is expected to install the glyph sprites at.
pub const FONT_BASE: u16 = 0x000;

/// Bytes per hexadecimal glyph sprite.
pub const GLYPH_SIZE: u16 = 5;
