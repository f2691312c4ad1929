//! Utility Module
//!
//! - [`FpsCounter`]: frame rate and frame time measurement for the control panel

pub mod fps_counter;

pub use fps_counter::FpsCounter;
