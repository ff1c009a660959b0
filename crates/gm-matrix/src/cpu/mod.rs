mod matmul;

use crate::backend::{check_len, ComputeBackend, ElementwiseOp, KernelRun};
use crate::error::Result;
use crate::shape::Shape;
use crate::timing::HostClock;

/// Pure-Rust CPU compute backend.
///
/// Straightforward loops with the same wrapping `i32` semantics as the GPU
/// kernels. Used as the fallback when no adapter is present and as the
/// reference the GPU backend is checked against.
#[derive(Debug, Clone, Default)]
pub struct CpuBackend {
    clock: HostClock,
}

impl CpuBackend {
    pub fn new() -> Self {
        CpuBackend {
            clock: HostClock::new(),
        }
    }
}

impl ComputeBackend for CpuBackend {
    fn name(&self) -> &str {
        "cpu"
    }

    fn elementwise(
        &self,
        op: ElementwiseOp,
        a: &[i32],
        b: &[i32],
        shape: Shape,
    ) -> Result<KernelRun> {
        check_len(a, shape.numel())?;
        check_len(b, shape.numel())?;

        let (values, timing) = self.clock.measure(|| {
            a.iter()
                .zip(b.iter())
                .map(|(&x, &y)| op.apply(x, y))
                .collect::<Vec<i32>>()
        });
        Ok(KernelRun { values, timing })
    }

    fn matmul(&self, a: &[i32], b: &[i32], m: usize, k: usize, n: usize) -> Result<KernelRun> {
        check_len(a, m * k)?;
        check_len(b, k * n)?;

        let (values, timing) = self.clock.measure(|| matmul::matmul_naive(a, b, m, k, n));
        Ok(KernelRun { values, timing })
    }
}
