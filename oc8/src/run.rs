use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use oc8_core::{Machine, Quirks};
use oc8_display::Display;

use crate::keymap::scancode;

/// Drives the machine until it faults or the window closes.
///
/// One cycle is: refresh the key latch, execute one instruction, tick
/// the timers against the monotonic clock, flush display deltas, then
/// sleep toward the configured instruction cadence.
pub fn run(rom: PathBuf, quirks: Quirks, ips: u64) -> Result<(), Box<dyn Error>> {
    let image = fs::read(&rom)?;

    let mut machine = Machine::new(quirks);
    machine.install_font();
    machine.load_image(&image)?;
    log::info!("loaded {} byte image from {}", image.len(), rom.display());

    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl)?;
    let mut events = sdl.event_pump()?;

    let cycle_time = Duration::from_nanos(1_000_000_000 / ips);
    let mut last_cycle = Instant::now();

    'event: loop {
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                _ => {}
            }
        }

        // Whole-latch refresh, once per cycle.
        let keyboard = events.keyboard_state();
        let mut keys = [false; 16];
        for (key, pressed) in keys.iter_mut().enumerate() {
            *pressed = keyboard.is_scancode_pressed(scancode(key as u8));
        }
        machine.set_keys(keys);

        machine.step()?;
        machine.tick_timers(Instant::now());

        let deltas = machine.drain_events();
        if display.apply(&deltas) {
            display.render()?;
        }
        if machine.sound_active() {
            // Audio output is up to the host; this one only logs.
            log::trace!("sound timer active");
        }

        let elapsed = last_cycle.elapsed();
        if cycle_time > elapsed {
            std::thread::sleep(cycle_time - elapsed);
        }
        last_cycle = Instant::now();
    }

    Ok(())
}
