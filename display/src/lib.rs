//! SDL2 renderer for the oc8 core's display-event stream.

pub use crate::display::Display;

mod display;
