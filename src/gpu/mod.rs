//! GPU device lifecycle: acquisition, swap chain, compute dispatch and
//! asynchronous read-back.

pub mod compute;
pub mod context;
pub mod diagnostics;
pub mod pump;
pub mod readback;
pub mod request;
pub mod swap_chain;

pub use compute::{BufferSpec, BufferUsage, ComputeBackend, ComputeJob, ComputeProgram, WgpuCompute};
pub use context::GpuContext;
pub use pump::{DevicePump, EventPump, InstancePump, LoopDriver};
pub use readback::{MapStatus, read_buffer};
pub use request::{Completer, Request, RequestSlot, resolve};
pub use swap_chain::{PresentMode, SurfaceSize, SwapChain, SwapChainConfig, SwapChainTarget};
