//! Whitespace-separated integer input for the addition demo.
//!
//! Layout: `n`, then `n * n` values of the first matrix in row-major order,
//! then `n * n` values of the second. Tokens after the second matrix are
//! ignored.

use std::io::BufRead;

use gm_matrix::{Matrix, Shape};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing {what}")]
    MissingValue { what: String },
    #[error("not an integer: {token:?}")]
    InvalidInteger { token: String },
    #[error("invalid matrix size: {0}")]
    InvalidSize(i64),
}

/// Read the size and both operands of a square elementwise operation.
pub fn read_square_operands<R: BufRead>(mut reader: R) -> Result<(Matrix, Matrix), InputError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let mut tokens = text.split_whitespace();

    let n = next_value::<i64>(&mut tokens, || "matrix size".to_string())?;
    let size = usize::try_from(n).map_err(|_| InputError::InvalidSize(n))?;
    let shape = Shape::square(size);
    if shape.checked_numel().is_none() {
        return Err(InputError::InvalidSize(n));
    }

    let first = read_matrix(&mut tokens, shape, "first")?;
    let second = read_matrix(&mut tokens, shape, "second")?;
    Ok((first, second))
}

fn read_matrix<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    shape: Shape,
    which: &str,
) -> Result<Matrix, InputError> {
    // Grows with the tokens actually read; the declared size is untrusted.
    let mut data = Vec::new();
    for row in 0..shape.rows() {
        for col in 0..shape.cols() {
            data.push(next_value::<i32>(tokens, || {
                format!("{} matrix element ({}, {})", which, row, col)
            })?);
        }
    }
    Ok(Matrix::new(data, shape))
}

fn next_value<'a, T: std::str::FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: impl FnOnce() -> String,
) -> Result<T, InputError> {
    let token = tokens
        .next()
        .ok_or_else(|| InputError::MissingValue { what: what() })?;
    token.parse().map_err(|_| InputError::InvalidInteger {
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_two_square_matrices() {
        let input = "2\n1 2\n3 4\n5 6 7 8\n";
        let (a, b) = read_square_operands(Cursor::new(input)).unwrap();
        assert_eq!(a.shape(), Shape::square(2));
        assert_eq!(a.data(), &[1, 2, 3, 4]);
        assert_eq!(b.data(), &[5, 6, 7, 8]);
    }

    #[test]
    fn test_negative_values_and_trailing_tokens() {
        let (a, b) = read_square_operands(Cursor::new("1 -5 7 99 100")).unwrap();
        assert_eq!(a.data(), &[-5]);
        assert_eq!(b.data(), &[7]);
    }

    #[test]
    fn test_zero_size() {
        let (a, b) = read_square_operands(Cursor::new("0")).unwrap();
        assert_eq!(a.shape().numel(), 0);
        assert_eq!(b.shape().numel(), 0);
    }

    #[test]
    fn test_empty_input() {
        match read_square_operands(Cursor::new("")) {
            Err(InputError::MissingValue { what }) => assert_eq!(what, "matrix size"),
            other => panic!("expected MissingValue, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_second_matrix() {
        match read_square_operands(Cursor::new("2 1 2 3 4 5 6 7")) {
            Err(InputError::MissingValue { what }) => {
                assert_eq!(what, "second matrix element (1, 1)")
            }
            other => panic!("expected MissingValue, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_token() {
        assert!(matches!(
            read_square_operands(Cursor::new("1 x 2")),
            Err(InputError::InvalidInteger { token }) if token == "x"
        ));
    }

    #[test]
    fn test_size_whose_square_overflows() {
        assert!(matches!(
            read_square_operands(Cursor::new("4294967296")),
            Err(InputError::InvalidSize(4294967296))
        ));
        assert!(matches!(
            read_square_operands(Cursor::new(i64::MAX.to_string())),
            Err(InputError::InvalidSize(i64::MAX))
        ));
    }

    #[test]
    fn test_huge_size_with_short_input() {
        match read_square_operands(Cursor::new("3000000000 1 2 3")) {
            Err(InputError::MissingValue { what }) => {
                assert_eq!(what, "first matrix element (0, 3)")
            }
            other => panic!("expected MissingValue, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_size() {
        assert!(matches!(
            read_square_operands(Cursor::new("-3")),
            Err(InputError::InvalidSize(-3))
        ));
    }
}
