//! # oc8-core
//! A CHIP-8 virtual machine: the 35-opcode execution engine, the XOR
//! display with collision detection, the 60 Hz countdown timers and the
//! 16-key input latch.
//!
//! The crate has no opinion on rendering, audio or input capture. Hosts
//! load a program image, refresh the key latch, call
//! [`Machine::step`] and [`Machine::tick_timers`] in a loop, and render
//! the [`DisplayEvent`] stream however they like.

pub use crate::error::{Fault, LoadError};
pub use crate::frame::{DisplayEvent, FrameBuffer};
pub use crate::machine::Machine;
pub use crate::quirks::Quirks;

pub mod constants;
mod error;
mod frame;
mod instruction;
mod machine;
mod opcode;
mod operations;
mod quirks;
pub mod sprites;
mod state;
mod timer;
