//! Built-in operands for the subtraction and multiplication demos.

use gm_matrix::{Matrix, Shape};

use crate::error::{DemoError, Result};

/// Default edge length of the subtraction demo's matrices.
pub const SUBTRACTION_SIZE: usize = 3;

/// `n x n` operands where `A[i] = i + 1` and `B[i] = n*n - i` over the
/// row-major index `i`.
///
/// Fails with `SizeTooLarge` unless `n * n` fits in an `i32`, which keeps
/// every generated value in `1..=n*n`.
pub fn subtraction_operands(n: usize) -> Result<(Matrix, Matrix)> {
    let shape = Shape::square(n);
    let total = shape
        .checked_numel()
        .and_then(|t| i32::try_from(t).ok())
        .ok_or(DemoError::SizeTooLarge(n))?;

    // Every index is below `total`, so the casts below are lossless.
    let a = Matrix::from_fn(shape, |row, col| (row * n + col) as i32 + 1);
    let b = Matrix::from_fn(shape, |row, col| total - (row * n + col) as i32);
    Ok((a, b))
}

/// A `2 x 3` and a `3 x 4` operand for the multiplication demo.
pub fn multiplication_operands() -> (Matrix, Matrix) {
    #[rustfmt::skip]
    let a = vec![
        2, 1, 4,
        0, 1, 1,
    ];
    #[rustfmt::skip]
    let b = vec![
        6, 3, -1, 0,
        1, 1, 0, 4,
        -2, 5, 0, 2,
    ];
    (
        Matrix::new(a, Shape::new(2, 3)),
        Matrix::new(b, Shape::new(3, 4)),
    )
}
