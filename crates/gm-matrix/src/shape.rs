use crate::error::{MatrixError, Result};
use std::fmt;

/// A 2-D matrix shape in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
}

impl Shape {
    /// Create a shape with `rows` rows and `cols` columns.
    pub fn new(rows: usize, cols: usize) -> Self {
        Shape { rows, cols }
    }

    /// Create an `n x n` shape.
    pub fn square(n: usize) -> Self {
        Shape { rows: n, cols: n }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.rows * self.cols
    }

    /// Total number of elements, or `None` if it does not fit in `usize`.
    pub fn checked_numel(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// Returns true if the shape holds no elements.
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Row-major offset of `(row, col)`, or `None` when out of bounds.
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    /// Checks that `other` has exactly this shape, as elementwise ops require.
    pub fn ensure_same(&self, other: &Shape) -> Result<()> {
        if self != other {
            return Err(MatrixError::ShapeMismatch {
                expected: self.to_string(),
                got: other.to_string(),
            });
        }
        Ok(())
    }

    /// Output shape of `self @ other`.
    ///
    /// The inner dimensions must agree: `[m x k] @ [k x n] -> [m x n]`.
    pub fn matmul_output(&self, other: &Shape) -> Result<Shape> {
        if self.cols != other.rows {
            return Err(MatrixError::MatmulMismatch {
                m: self.rows,
                k: self.cols,
                k2: other.rows,
                n: other.cols,
            });
        }
        Ok(Shape::new(self.rows, other.cols))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} x {}]", self.rows, self.cols)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((rows, cols): (usize, usize)) -> Self {
        Shape::new(rows, cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_shape() {
        let s = Shape::new(2, 3);
        assert_eq!(s.rows(), 2);
        assert_eq!(s.cols(), 3);
        assert_eq!(s.numel(), 6);
        assert!(!s.is_empty());
        assert_eq!(Shape::square(3), Shape::new(3, 3));
    }

    #[test]
    fn test_checked_numel() {
        assert_eq!(Shape::new(2, 3).checked_numel(), Some(6));
        assert_eq!(Shape::square(usize::MAX).checked_numel(), None);
        assert_eq!(Shape::new(usize::MAX, 1).checked_numel(), Some(usize::MAX));
    }

    #[test]
    fn test_index() {
        let s = Shape::new(2, 3);
        assert_eq!(s.index(0, 0), Some(0));
        assert_eq!(s.index(1, 2), Some(5));
        assert_eq!(s.index(2, 0), None);
        assert_eq!(s.index(0, 3), None);
    }

    #[test]
    fn test_ensure_same() {
        let a = Shape::new(2, 3);
        assert!(a.ensure_same(&Shape::new(2, 3)).is_ok());
        assert!(matches!(
            a.ensure_same(&Shape::new(3, 2)),
            Err(MatrixError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_matmul_output() {
        let a = Shape::new(2, 3);
        let b = Shape::new(3, 4);
        assert_eq!(a.matmul_output(&b).unwrap(), Shape::new(2, 4));
    }

    #[test]
    fn test_matmul_output_mismatch() {
        let a = Shape::new(2, 3);
        let b = Shape::new(2, 4);
        match a.matmul_output(&b) {
            Err(MatrixError::MatmulMismatch { m, k, k2, n }) => {
                assert_eq!((m, k, k2, n), (2, 3, 2, 4));
            }
            other => panic!("expected MatmulMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape::new(2, 4).to_string(), "[2 x 4]");
    }
}
