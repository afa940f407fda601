use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// One inner array per scanline, one cell per pixel; 1 is lit.
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// Outward display deltas, emitted per draw or clear call so hosts can
/// render incrementally instead of redrawing every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    /// 00E0 ran: every cell is now unlit. No per-pixel events accompany
    /// a clear.
    Cleared,
    /// A single cell changed value during a draw.
    Pixel { x: u8, y: u8, on: bool },
}

/// The 64x32 monochrome grid together with the XOR-blit rule.
pub(crate) struct Frame {
    cells: FrameBuffer,
}

impl Frame {
    pub(crate) fn new() -> Self {
        Frame {
            cells: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    pub(crate) fn cells(&self) -> &FrameBuffer {
        &self.cells
    }

    pub(crate) fn clear(&mut self, events: &mut Vec<DisplayEvent>) {
        self.cells = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        events.push(DisplayEvent::Cleared);
    }

    /// XORs `sprite` onto the grid at (x, y), one byte per row with the
    /// most significant bit leftmost. Coordinates wrap modulo the grid
    /// dimensions. Every cell that changes value is pushed onto
    /// `events`.
    ///
    /// Returns whether any lit cell went dark. The scan always covers
    /// the whole sprite, so a collision found early cannot mask later
    /// rows.
    pub(crate) fn blit(
        &mut self,
        sprite: &[u8],
        x: u8,
        y: u8,
        events: &mut Vec<DisplayEvent>,
    ) -> bool {
        let mut collision = false;
        for (row, byte) in sprite.iter().enumerate() {
            let cy = (y as usize + row) % DISPLAY_HEIGHT;
            for bit in 0..8 {
                if byte >> (7 - bit) & 1 == 0 {
                    continue;
                }
                let cx = (x as usize + bit) % DISPLAY_WIDTH;
                let cell = &mut self.cells[cy][cx];
                collision |= *cell == 1;
                *cell ^= 1;
                events.push(DisplayEvent::Pixel {
                    x: cx as u8,
                    y: cy as u8,
                    on: *cell == 1,
                });
            }
        }
        collision
    }
}
