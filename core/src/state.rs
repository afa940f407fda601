use crate::constants::{MEMORY_SIZE, PROGRAM_START, STACK_DEPTH};

/// Whether the engine is dispatching instructions or parked on FX0A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Running,
    /// FX0A executed; the next key to go down lands in Vx and dispatch
    /// resumes. Timers are unaffected.
    AwaitingKey { x: u8 },
}

/// Memory, register file and control state, owned and mutated only by
/// the execution engine.
pub(crate) struct State {
    pub(crate) memory: [u8; MEMORY_SIZE],
    /// General-purpose registers V0..VF. VF doubles as the flag register
    /// and is clobbered by every flag-defining opcode.
    pub(crate) v: [u8; 16],
    /// Index register. 16 bits wide, semantically a 12-bit address; not
    /// masked on write, out-of-range surfaces at the access needing it.
    pub(crate) i: u16,
    pub(crate) pc: u16,
    /// Return addresses, most recent last. Depth-limited to
    /// `STACK_DEPTH`; exceeding it is a fault, not a wrap.
    pub(crate) stack: Vec<u16>,
    pub(crate) mode: Mode,
}

impl State {
    pub(crate) fn new() -> Self {
        State {
            memory: [0; MEMORY_SIZE],
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            stack: Vec::with_capacity(STACK_DEPTH),
            mode: Mode::Running,
        }
    }
}
