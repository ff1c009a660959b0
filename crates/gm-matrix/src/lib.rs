//! `gm-matrix` - Integer matrices with pluggable compute backends for gpu-matrix.
//!
//! This crate provides:
//! - A row-major `i32` `Matrix` type with shape validation
//! - A `ComputeBackend` trait for pluggable compute (CPU, wgpu)
//! - A reference `CpuBackend` implementation
//! - A `WgpuBackend` that runs WGSL kernels on the GPU (feature `gpu`)
//! - Kernel timing taken from device timestamps or the host clock

pub mod backend;
pub mod cpu;
pub mod error;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod matrix;
pub mod shape;
pub mod timing;

// Re-export primary types at the crate root for convenience.
pub use backend::{ComputeBackend, ElementwiseOp, KernelRun};
pub use cpu::CpuBackend;
pub use error::{MatrixError, Result};
#[cfg(feature = "gpu")]
pub use gpu::{GpuContext, WgpuBackend};
pub use matrix::{Computation, Matrix};
pub use shape::Shape;
pub use timing::{HostClock, KernelTiming, TimingSource};
