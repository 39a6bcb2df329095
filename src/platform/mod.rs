//! Platform abstraction layer
//!
//! Browser events arrive whenever they like; the simulation wants one input
//! record per frame. `InputLatch` sits in between: event handlers write into
//! it and the frame driver samples it once per tick.

pub mod input;

pub use input::InputLatch;
