use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{FONT_BASE, MAX_IMAGE_SIZE, MEMORY_SIZE, PROGRAM_START};
use crate::error::{Fault, LoadError};
use crate::frame::{DisplayEvent, Frame, FrameBuffer};
use crate::instruction;
use crate::quirks::Quirks;
use crate::sprites::SPRITE_SHEET;
use crate::state::{Mode, State};
use crate::timer::Timers;

/// # Machine
/// A CHIP-8 virtual machine: 4K of memory, sixteen 8-bit registers, a
/// 16-deep call stack, a 64x32 monochrome frame buffer, two 60 Hz
/// countdown timers and a 16-key input latch.
///
/// The host drives it in a loop:
/// - [`set_keys`](Machine::set_keys) with the full latch, once per cycle
/// - [`step`](Machine::step) to execute one instruction
/// - [`tick_timers`](Machine::tick_timers) with a monotonic instant
/// - [`drain_events`](Machine::drain_events) to render display deltas
///
/// A [`Fault`] halts the machine for good; the host decides what to do
/// with the error.
pub struct Machine {
    pub(crate) state: State,
    pub(crate) frame: Frame,
    pub(crate) timers: Timers,
    pub(crate) keys: [bool; 16],
    pub(crate) quirks: Quirks,
    pub(crate) events: Vec<DisplayEvent>,
    pub(crate) rng: StdRng,
    fault: Option<Fault>,
}

impl Machine {
    pub fn new(quirks: Quirks) -> Self {
        Self::from_rng(quirks, StdRng::from_entropy())
    }

    /// Same machine, but CXNN draws from a fixed seed so runs replay
    /// deterministically.
    pub fn with_seed(quirks: Quirks, seed: u64) -> Self {
        Self::from_rng(quirks, StdRng::seed_from_u64(seed))
    }

    fn from_rng(quirks: Quirks, rng: StdRng) -> Self {
        Machine {
            state: State::new(),
            frame: Frame::new(),
            timers: Timers::new(),
            keys: [false; 16],
            quirks,
            events: Vec::new(),
            rng,
            fault: None,
        }
    }

    /// Copies a program image into memory starting at 0x200. An image
    /// that does not fit is refused outright and nothing is written.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), LoadError> {
        if image.len() > MAX_IMAGE_SIZE {
            return Err(LoadError::ImageTooLarge {
                len: image.len(),
                max: MAX_IMAGE_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + image.len()].copy_from_slice(image);
        Ok(())
    }

    /// Writes the standard glyph sheet at the font base address.
    ///
    /// Glyph provisioning is a host responsibility; FX29 only computes
    /// addresses, so without this call the glyph region reads as zeros
    /// and draws nothing.
    pub fn install_font(&mut self) {
        let base = FONT_BASE as usize;
        self.state.memory[base..base + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
    }

    /// Replaces the whole key latch. Hosts call this once per cycle;
    /// partial updates are not supported.
    ///
    /// While the engine is parked on FX0A, the first key observed going
    /// from released to pressed is stored in the waiting register and
    /// dispatch resumes.
    pub fn set_keys(&mut self, keys: [bool; 16]) {
        if let Mode::AwaitingKey { x } = self.state.mode {
            if let Some(key) = (0..16).find(|&k| keys[k] && !self.keys[k]) {
                self.state.v[x as usize] = key as u8;
                self.state.mode = Mode::Running;
            }
        }
        self.keys = keys;
    }

    /// Executes exactly one instruction and leaves PC at the next one,
    /// already adjusted for any jump or skip taken.
    ///
    /// Does nothing while awaiting a key. A fault halts the machine;
    /// every later call returns the same fault.
    pub fn step(&mut self) -> Result<(), Fault> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }
        if let Mode::AwaitingKey { .. } = self.state.mode {
            return Ok(());
        }
        self.dispatch().map_err(|fault| {
            log::error!("halting: {}", fault);
            self.fault = Some(fault);
            fault
        })
    }

    fn dispatch(&mut self) -> Result<(), Fault> {
        let op = self.fetch()?;
        log::trace!(
            "{:04X} pc={:04X} i={:04X} v={:02X?}",
            op,
            self.state.pc,
            self.state.i,
            self.state.v
        );
        // PC moves past the instruction before it runs; jumps overwrite
        // it and skips add another 2.
        self.state.pc += 2;
        instruction::from_op(&op)(&op, self)
    }

    /// Reads the two instruction bytes at PC, most significant first.
    fn fetch(&self) -> Result<u16, Fault> {
        let pc = self.state.pc as usize;
        if pc + 1 >= MEMORY_SIZE {
            return Err(Fault::OutOfBounds { addr: self.state.pc });
        }
        Ok(u16::from(self.state.memory[pc]) << 8 | u16::from(self.state.memory[pc + 1]))
    }

    /// Bounds-checks an I-derived access of `len` bytes, faulting
    /// instead of wrapping when it leaves addressable memory.
    pub(crate) fn index_range(&self, len: u16) -> Result<std::ops::Range<usize>, Fault> {
        let start = self.state.i as usize;
        let end = start + len as usize;
        if end > MEMORY_SIZE {
            return Err(Fault::OutOfBounds {
                addr: self.state.i.saturating_add(len.saturating_sub(1)),
            });
        }
        Ok(start..end)
    }

    /// Advances the delay and sound timers against a monotonic clock.
    /// Keeps working while the engine awaits a key.
    pub fn tick_timers(&mut self, now: Instant) {
        self.timers.tick(now);
    }

    /// Display deltas accumulated since the last drain, in emission
    /// order.
    pub fn drain_events(&mut self) -> Vec<DisplayEvent> {
        std::mem::take(&mut self.events)
    }

    /// The current pixel grid, for hosts that prefer full redraws.
    pub fn frame(&self) -> &FrameBuffer {
        self.frame.cells()
    }

    /// Whether the sound timer is running; a nonzero value means the
    /// host should be emitting audio.
    pub fn sound_active(&self) -> bool {
        self.timers.sound > 0
    }

    /// Whether the engine is parked on FX0A.
    pub fn awaiting_key(&self) -> bool {
        matches!(self.state.mode, Mode::AwaitingKey { .. })
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(Quirks::default())
    }
}

#[cfg(test)]
mod test_machine {
    use super::*;
    use std::time::Duration;

    fn machine_with(program: &[u8]) -> Machine {
        let mut machine = Machine::with_seed(Quirks::default(), 0);
        machine.load_image(program).unwrap();
        machine
    }

    #[test]
    fn test_fetch_combines_bytes() {
        let machine = machine_with(&[0xAA, 0xBB]);
        assert_eq!(machine.fetch().unwrap(), 0xAABB);
    }

    #[test]
    fn test_step_advances_pc() {
        let mut machine = machine_with(&[0x00, 0xE0]);
        machine.step().unwrap();
        assert_eq!(machine.state.pc, 0x202);
    }

    #[test]
    fn test_unknown_opcode_is_noop() {
        // 5XY1 is undefined within the skip family.
        let mut machine = machine_with(&[0x51, 0x21]);
        machine.step().unwrap();
        assert_eq!(machine.state.pc, 0x202);
    }

    #[test]
    fn test_fetch_past_end_of_memory_faults() {
        let mut machine = machine_with(&[]);
        machine.state.pc = 0xFFF;
        assert_eq!(
            machine.step(),
            Err(Fault::OutOfBounds { addr: 0xFFF })
        );
    }

    #[test]
    fn test_fault_halts_permanently() {
        let mut machine = machine_with(&[0x00, 0xEE]);
        let fault = machine.step().unwrap_err();
        assert_eq!(fault, Fault::StackUnderflow { pc: 0x200 });
        // Later steps return the same fault without executing anything.
        assert_eq!(machine.step(), Err(fault));
        assert_eq!(machine.state.pc, 0x202);
    }

    #[test]
    fn test_load_image_rejects_oversized() {
        let mut machine = Machine::default();
        let image = vec![0u8; MAX_IMAGE_SIZE + 1];
        assert_eq!(
            machine.load_image(&image),
            Err(LoadError::ImageTooLarge {
                len: MAX_IMAGE_SIZE + 1,
                max: MAX_IMAGE_SIZE,
            })
        );
        // Nothing was written.
        assert!(machine.state.memory.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_load_image_accepts_maximum() {
        let mut machine = Machine::default();
        let image = vec![0xAB; MAX_IMAGE_SIZE];
        machine.load_image(&image).unwrap();
        assert_eq!(machine.state.memory[MEMORY_SIZE - 1], 0xAB);
    }

    #[test]
    fn test_install_font_places_glyphs() {
        let mut machine = Machine::default();
        machine.install_font();
        assert_eq!(machine.state.memory[..5], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(machine.state.memory[75..80], [0xF0, 0x80, 0xF0, 0x80, 0x80]);
    }

    #[test]
    fn test_await_key_suspends_dispatch() {
        // F30A then 00E0; the clear must not run until a key arrives.
        let mut machine = machine_with(&[0xF3, 0x0A, 0x00, 0xE0]);
        machine.step().unwrap();
        assert!(machine.awaiting_key());
        assert_eq!(machine.state.pc, 0x202);
        machine.step().unwrap();
        machine.step().unwrap();
        assert_eq!(machine.state.pc, 0x202);
    }

    #[test]
    fn test_await_key_resumes_on_rising_edge() {
        let mut machine = machine_with(&[0xF3, 0x0A]);
        let mut held = [false; 16];
        held[0xB] = true;
        // A key already held when the wait begins is not a press.
        machine.set_keys(held);
        machine.step().unwrap();
        assert!(machine.awaiting_key());
        machine.set_keys(held);
        assert!(machine.awaiting_key());
        // Releasing and pressing again is the transition we want.
        machine.set_keys([false; 16]);
        machine.set_keys(held);
        assert!(!machine.awaiting_key());
        assert_eq!(machine.state.v[0x3], 0xB);
    }

    #[test]
    fn test_timers_run_while_awaiting_key() {
        let mut machine = machine_with(&[0xF0, 0x0A]);
        machine.timers.delay = 3;
        machine.step().unwrap();
        assert!(machine.awaiting_key());
        let t0 = Instant::now();
        machine.tick_timers(t0);
        machine.tick_timers(t0 + Duration::from_millis(50));
        assert_eq!(machine.timers.delay, 0);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut machine = machine_with(&[0x00, 0xE0]);
        machine.step().unwrap();
        assert_eq!(machine.drain_events(), vec![DisplayEvent::Cleared]);
        assert!(machine.drain_events().is_empty());
    }

    #[test]
    fn test_seeded_machines_replay_identically() {
        let mut a = machine_with(&[0xC0, 0xFF]);
        let mut b = machine_with(&[0xC0, 0xFF]);
        a.step().unwrap();
        b.step().unwrap();
        assert_eq!(a.state.v[0], b.state.v[0]);
    }

    #[test]
    fn test_add_scenario_no_carry() {
        // 6005 6103 8014: V0=5, V1=3, V0 += V1.
        let mut machine = machine_with(&[0x60, 0x05, 0x61, 0x03, 0x80, 0x14]);
        for _ in 0..3 {
            machine.step().unwrap();
        }
        assert_eq!(machine.state.v[0x0], 8);
        assert_eq!(machine.state.v[0x1], 3);
        assert_eq!(machine.state.v[0xF], 0);
    }

    #[test]
    fn test_add_scenario_carry_wraps() {
        // 60FA 610A 8014: 250 + 10 = 260 -> 4 with carry.
        let mut machine = machine_with(&[0x60, 0xFA, 0x61, 0x0A, 0x80, 0x14]);
        for _ in 0..3 {
            machine.step().unwrap();
        }
        assert_eq!(machine.state.v[0x0], 4);
        assert_eq!(machine.state.v[0xF], 1);
    }

    #[test]
    fn test_call_return_round_trip() {
        // 0x200: call 0x206; 0x206: ret. Registers stay untouched and PC
        // ends up after the call.
        let mut machine = machine_with(&[0x22, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0xEE]);
        let v_before = machine.state.v;
        machine.step().unwrap();
        assert_eq!(machine.state.pc, 0x206);
        assert_eq!(machine.state.stack, vec![0x202]);
        machine.step().unwrap();
        assert_eq!(machine.state.pc, 0x202);
        assert!(machine.state.stack.is_empty());
        assert_eq!(machine.state.v, v_before);
    }

    #[test]
    fn test_jump_offset_past_memory_faults_on_fetch() {
        // BNNN with nnn = 0xFFF and V0 = 2 leaves PC at 0x1001.
        let mut machine = machine_with(&[0x60, 0x02, 0xBF, 0xFF]);
        machine.step().unwrap();
        machine.step().unwrap();
        assert_eq!(
            machine.step(),
            Err(Fault::OutOfBounds { addr: 0x1001 })
        );
    }
}
