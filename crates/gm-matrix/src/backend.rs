use std::fmt::Debug;

use crate::error::{MatrixError, Result};
use crate::shape::Shape;
use crate::timing::KernelTiming;

/// Elementwise binary operations with a matching compute kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementwiseOp {
    Add,
    Sub,
}

impl ElementwiseOp {
    /// Entry point of the kernel that implements this op.
    pub fn kernel_name(&self) -> &'static str {
        match self {
            ElementwiseOp::Add => "matrix_addition",
            ElementwiseOp::Sub => "matrix_subtraction",
        }
    }

    /// Host-side reference of the kernel body. Overflow wraps, as it does on
    /// the device.
    pub fn apply(&self, x: i32, y: i32) -> i32 {
        match self {
            ElementwiseOp::Add => x.wrapping_add(y),
            ElementwiseOp::Sub => x.wrapping_sub(y),
        }
    }
}

/// Values read back from one dispatch, with the dispatch's timing.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelRun {
    pub values: Vec<i32>,
    pub timing: KernelTiming,
}

/// Trait for pluggable compute backends (CPU, wgpu).
///
/// Operands are row-major `i32` slices; one work-item produces one output
/// element. Implementations must check slice lengths against the dimensions
/// they are given and return `LengthMismatch` rather than reading out of
/// bounds.
pub trait ComputeBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "cpu", "wgpu").
    fn name(&self) -> &str;

    /// Elementwise op over two buffers of the same `shape`.
    fn elementwise(&self, op: ElementwiseOp, a: &[i32], b: &[i32], shape: Shape)
        -> Result<KernelRun>;

    /// Matrix multiplication: C = A @ B.
    ///
    /// - `a`: row-major data of shape [m, k]
    /// - `b`: row-major data of shape [k, n]
    /// - Returns: row-major data of shape [m, n]
    fn matmul(&self, a: &[i32], b: &[i32], m: usize, k: usize, n: usize) -> Result<KernelRun>;

    /// Element-wise addition: result[i] = a[i] + b[i].
    fn add(&self, a: &[i32], b: &[i32], shape: Shape) -> Result<KernelRun> {
        self.elementwise(ElementwiseOp::Add, a, b, shape)
    }

    /// Element-wise subtraction: result[i] = a[i] - b[i].
    fn sub(&self, a: &[i32], b: &[i32], shape: Shape) -> Result<KernelRun> {
        self.elementwise(ElementwiseOp::Sub, a, b, shape)
    }
}

/// Checks a buffer holds exactly `expected` elements.
pub(crate) fn check_len(data: &[i32], expected: usize) -> Result<()> {
    if data.len() != expected {
        return Err(MatrixError::LengthMismatch {
            expected,
            got: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_names() {
        assert_eq!(ElementwiseOp::Add.kernel_name(), "matrix_addition");
        assert_eq!(ElementwiseOp::Sub.kernel_name(), "matrix_subtraction");
    }

    #[test]
    fn test_apply_wraps() {
        assert_eq!(ElementwiseOp::Add.apply(2, 3), 5);
        assert_eq!(ElementwiseOp::Sub.apply(2, 3), -1);
        assert_eq!(ElementwiseOp::Add.apply(i32::MAX, 1), i32::MIN);
        assert_eq!(ElementwiseOp::Sub.apply(i32::MIN, 1), i32::MAX);
    }

    #[test]
    fn test_check_len() {
        assert!(check_len(&[1, 2, 3], 3).is_ok());
        assert!(check_len(&[1, 2], 3).is_err());
    }
}
