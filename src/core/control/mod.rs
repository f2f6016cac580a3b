//! Run-state control
//!
//! The engine never writes the run state; an operator (or another process)
//! does. Every component reads it through [`ControlSignal`] at well-defined
//! safe points: before each attempt of an item, and between chunks.

mod file;
mod shared;
mod signal;


pub use file::{ControlFile, FileControlSignal};
pub use shared::SharedControlSignal;
pub use signal::{ControlSignal, RunState};
