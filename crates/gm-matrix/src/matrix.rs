use std::fmt;

use log::debug;

use crate::backend::{ComputeBackend, ElementwiseOp};
use crate::error::{MatrixError, Result};
use crate::shape::Shape;
use crate::timing::KernelTiming;

/// A dense row-major `i32` matrix held in host memory.
///
/// Arithmetic is dispatched to a `ComputeBackend`; the matrix itself only
/// validates shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    data: Vec<i32>,
    shape: Shape,
}

/// Result of a backend dispatch: the output matrix and how long the kernel ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Computation {
    pub matrix: Matrix,
    pub timing: KernelTiming,
}

impl Matrix {
    /// Create a new matrix from row-major data and a shape.
    ///
    /// # Panics
    /// Panics if `data.len() != shape.numel()`.
    pub fn new(data: Vec<i32>, shape: Shape) -> Self {
        assert_eq!(
            data.len(),
            shape.numel(),
            "data length {} does not match shape {} (numel={})",
            data.len(),
            shape,
            shape.numel()
        );
        Matrix { data, shape }
    }

    /// Like [`Matrix::new`], but returns `LengthMismatch` instead of panicking.
    pub fn try_new(data: Vec<i32>, shape: Shape) -> Result<Self> {
        if shape.checked_numel() != Some(data.len()) {
            return Err(MatrixError::LengthMismatch {
                expected: shape.checked_numel().unwrap_or(usize::MAX),
                got: data.len(),
            });
        }
        Ok(Matrix { data, shape })
    }

    pub fn zeros(shape: Shape) -> Self {
        Self::filled(shape, 0)
    }

    /// Create a matrix with every element set to `value`.
    pub fn filled(shape: Shape, value: i32) -> Self {
        Matrix {
            data: vec![value; shape.numel()],
            shape,
        }
    }

    /// Create a matrix whose element at `(row, col)` is `f(row, col)`.
    pub fn from_fn(shape: Shape, mut f: impl FnMut(usize, usize) -> i32) -> Self {
        let mut data = Vec::with_capacity(shape.numel());
        for row in 0..shape.rows() {
            for col in 0..shape.cols() {
                data.push(f(row, col));
            }
        }
        Matrix { data, shape }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    pub fn cols(&self) -> usize {
        self.shape.cols()
    }

    /// Returns the underlying row-major data.
    pub fn data(&self) -> &[i32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<i32> {
        self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        self.shape.index(row, col).map(|i| self.data[i])
    }

    /// Returns row `i` as a slice, or `None` when out of bounds.
    pub fn row(&self, i: usize) -> Option<&[i32]> {
        if i >= self.rows() {
            return None;
        }
        let start = i * self.cols();
        Some(&self.data[start..start + self.cols()])
    }

    /// Elementwise sum. Both matrices must have the same shape.
    pub fn add(&self, other: &Matrix, backend: &dyn ComputeBackend) -> Result<Computation> {
        self.elementwise(ElementwiseOp::Add, other, backend)
    }

    /// Elementwise difference. Both matrices must have the same shape.
    pub fn sub(&self, other: &Matrix, backend: &dyn ComputeBackend) -> Result<Computation> {
        self.elementwise(ElementwiseOp::Sub, other, backend)
    }

    fn elementwise(
        &self,
        op: ElementwiseOp,
        other: &Matrix,
        backend: &dyn ComputeBackend,
    ) -> Result<Computation> {
        self.shape.ensure_same(&other.shape)?;
        debug!(
            "{} on {} via {}",
            op.kernel_name(),
            self.shape,
            backend.name()
        );

        let run = backend.elementwise(op, &self.data, &other.data, self.shape)?;
        Ok(Computation {
            matrix: Matrix::try_new(run.values, self.shape)?,
            timing: run.timing,
        })
    }

    /// Matrix product of two matrices using the given backend.
    ///
    /// self is [m, k], other is [k, n], result is [m, n].
    pub fn matmul(&self, other: &Matrix, backend: &dyn ComputeBackend) -> Result<Computation> {
        let out_shape = self.shape.matmul_output(&other.shape)?;
        debug!(
            "matrix_multiply {} @ {} via {}",
            self.shape,
            other.shape,
            backend.name()
        );

        let run = backend.matmul(
            &self.data,
            &other.data,
            self.rows(),
            self.cols(),
            other.cols(),
        )?;
        Ok(Computation {
            matrix: Matrix::try_new(run.values, out_shape)?,
            timing: run.timing,
        })
    }
}

/// One line per row, each element followed by a space.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows() {
            let start = row * self.cols();
            for value in &self.data[start..start + self.cols()] {
                write!(f, "{} ", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::CpuBackend;

    #[test]
    fn test_new_matrix() {
        let m = Matrix::new(vec![1, 2, 3, 4, 5, 6], Shape::new(2, 3));
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.get(1, 0), Some(4));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.row(1), Some(&[4, 5, 6][..]));
        assert_eq!(m.row(2), None);
    }

    #[test]
    #[should_panic]
    fn test_new_shape_mismatch_panics() {
        let _m = Matrix::new(vec![1, 2], Shape::new(1, 3));
    }

    #[test]
    fn test_try_new_mismatch() {
        assert!(matches!(
            Matrix::try_new(vec![1, 2], Shape::new(1, 3)),
            Err(MatrixError::LengthMismatch {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn test_try_new_overflowing_shape() {
        assert!(matches!(
            Matrix::try_new(vec![], Shape::square(usize::MAX)),
            Err(MatrixError::LengthMismatch { got: 0, .. })
        ));
    }

    #[test]
    fn test_constructors() {
        assert_eq!(Matrix::zeros(Shape::square(2)).data(), &[0; 4]);
        assert_eq!(Matrix::filled(Shape::new(1, 3), 7).data(), &[7, 7, 7]);
        let m = Matrix::from_fn(Shape::new(2, 2), |r, c| (r * 10 + c) as i32);
        assert_eq!(m.data(), &[0, 1, 10, 11]);
    }

    #[test]
    fn test_add_sub() {
        let backend = CpuBackend::new();
        let a = Matrix::new(vec![1, 2, 3, 4], Shape::square(2));
        let b = Matrix::new(vec![10, 20, 30, 40], Shape::square(2));
        assert_eq!(a.add(&b, &backend).unwrap().matrix.data(), &[11, 22, 33, 44]);
        assert_eq!(
            a.sub(&b, &backend).unwrap().matrix.data(),
            &[-9, -18, -27, -36]
        );
    }

    #[test]
    fn test_add_shape_mismatch() {
        let backend = CpuBackend::new();
        let a = Matrix::zeros(Shape::new(2, 3));
        let b = Matrix::zeros(Shape::new(3, 2));
        assert!(matches!(
            a.add(&b, &backend),
            Err(MatrixError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_matmul() {
        let backend = CpuBackend::new();
        let a = Matrix::new(vec![2, 1, 4, 0, 1, 1], Shape::new(2, 3));
        let b = Matrix::new(
            vec![6, 3, -1, 0, 1, 1, 0, 4, -2, 5, 0, 2],
            Shape::new(3, 4),
        );
        let c = a.matmul(&b, &backend).unwrap().matrix;
        assert_eq!(c.shape(), Shape::new(2, 4));
        assert_eq!(c.data(), &[5, 27, -2, 12, -1, 6, 0, 6]);
    }

    #[test]
    fn test_matmul_dimension_mismatch() {
        let backend = CpuBackend::new();
        let a = Matrix::zeros(Shape::new(2, 3));
        let b = Matrix::zeros(Shape::new(2, 4));
        assert!(matches!(
            a.matmul(&b, &backend),
            Err(MatrixError::MatmulMismatch { .. })
        ));
    }

    #[test]
    fn test_display() {
        let m = Matrix::new(vec![1, -2, 3, 4], Shape::square(2));
        assert_eq!(m.to_string(), "1 -2 \n3 4 \n");
    }
}
