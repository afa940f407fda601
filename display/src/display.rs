use sdl2::pixels::PixelFormatEnum;

use oc8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use oc8_core::{DisplayEvent, FrameBuffer};

const SCALE: usize = 10;

/// # Display
/// Renders the machine's 64x32 monochrome grid in an SDL2 window.
///
/// The renderer keeps its own copy of the grid and folds the core's
/// [`DisplayEvent`] deltas into it; [`render`](Display::render) then
/// uploads the grid as an RGB24 streaming texture. Hosts only need to
/// render on cycles where at least one event arrived.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
    cells: FrameBuffer,
}

impl Display {
    /// Opens a window on the given SDL2 context at 10x scale.
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let video = sdl.video()?;
        let window = video
            .window(
                "oc8",
                (DISPLAY_WIDTH * SCALE) as u32,
                (DISPLAY_HEIGHT * SCALE) as u32,
            )
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;

        Ok(Display {
            canvas,
            cells: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        })
    }

    /// Folds a batch of display deltas into the local grid. Returns
    /// whether anything changed, i.e. whether a render is due.
    pub fn apply(&mut self, events: &[DisplayEvent]) -> bool {
        for event in events {
            match *event {
                DisplayEvent::Cleared => {
                    self.cells = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
                }
                DisplayEvent::Pixel { x, y, on } => {
                    self.cells[y as usize][x as usize] = on as u8;
                }
            }
        }
        !events.is_empty()
    }

    /// Uploads the current grid as an RGB24 texture and presents it.
    pub fn render(&mut self) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        let pixels = cells_to_rgb24(&self.cells);
        texture
            .with_lock(None, |buffer: &mut [u8], _pitch: usize| {
                buffer.copy_from_slice(&pixels);
            })
            .map_err(|e| e.to_string())?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

/// Flattens the grid row by row and expands each cell to an RGB triple,
/// 0 or 255 per channel.
fn cells_to_rgb24(cells: &FrameBuffer) -> Vec<u8> {
    cells
        .iter()
        .flat_map(|row| row.iter())
        .flat_map(|&cell| std::iter::repeat(cell * 255).take(3))
        .collect()
}
