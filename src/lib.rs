#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Glint: a small GPU application core.
//!
//! Device acquisition, a swap-chain resize state machine, per-frame
//! submission with an immediate-mode GUI, compute dispatch with asynchronous
//! read-back, and a toggleable audio tone.

pub mod app;
pub mod audio;
pub mod errors;
pub mod frame;
pub mod gpu;
pub mod settings;
pub mod utils;

pub use app::App;
pub use errors::{GlintError, Result};
pub use frame::FrameLoop;
pub use gpu::{ComputeJob, GpuContext, LoopDriver};
pub use settings::{AppSettings, ClearColor};
