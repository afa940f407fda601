use thiserror::Error;

/// Fatal execution faults.
///
/// Any of these halts the machine permanently; further calls to
/// [`crate::Machine::step`] keep returning the same fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    /// A call was attempted with 16 return addresses already stacked.
    #[error("call stack overflow at {pc:#06X}")]
    StackOverflow { pc: u16 },

    /// 00EE executed with no return address on the stack.
    #[error("return with an empty call stack at {pc:#06X}")]
    StackUnderflow { pc: u16 },

    /// A PC- or I-derived access fell outside addressable memory.
    #[error("memory access out of bounds at {addr:#06X}")]
    OutOfBounds { addr: u16 },
}

/// Errors surfaced while loading a program image, before anything runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The image does not fit between 0x200 and the end of memory.
    #[error("program image is {len} bytes but at most {max} fit in memory")]
    ImageTooLarge { len: usize, max: usize },
}
