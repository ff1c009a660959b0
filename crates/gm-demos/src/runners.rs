//! The three demo programs, generic over their input and output streams.
//!
//! Output ordering follows each program's established format: addition and
//! multiplication print the timing before the result, subtraction prints the
//! bare result rows first.

use std::io::{BufRead, Write};

use gm_matrix::{ComputeBackend, Matrix, MatrixError};
use log::info;

use crate::error::Result;
use crate::fixtures;
use crate::input;
use crate::report;

/// Printed instead of a result when the operands cannot be multiplied.
pub const DIMENSION_MISMATCH_MESSAGE: &str = "Dimensions are not correct";

/// Add two square matrices read from `input`.
pub fn run_addition<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    backend: &dyn ComputeBackend,
) -> Result<()> {
    let (a, b) = input::read_square_operands(input)?;
    info!("adding two {} matrices", a.shape());

    let computed = a.add(&b, backend)?;
    report::write_timing(out, &computed.timing)?;
    report::write_result(out, &computed.matrix)?;
    Ok(())
}

/// Subtract the generated `n x n` operands.
pub fn run_subtraction<W: Write>(n: usize, out: &mut W, backend: &dyn ComputeBackend) -> Result<()> {
    let (a, b) = fixtures::subtraction_operands(n)?;
    info!("subtracting two {} matrices", a.shape());

    let computed = a.sub(&b, backend)?;
    write!(out, "{}", computed.matrix)?;
    report::write_timing(out, &computed.timing)?;
    Ok(())
}

/// Multiply `a` by `b`.
///
/// On an inner-dimension mismatch the mismatch message is printed, no result
/// is printed, and the error is returned.
pub fn run_multiplication<W: Write>(
    a: &Matrix,
    b: &Matrix,
    out: &mut W,
    backend: &dyn ComputeBackend,
) -> Result<()> {
    info!("multiplying {} by {}", a.shape(), b.shape());

    let computed = match a.matmul(b, backend) {
        Ok(c) => c,
        Err(e @ MatrixError::MatmulMismatch { .. }) => {
            writeln!(out, "{}", DIMENSION_MISMATCH_MESSAGE)?;
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    report::write_timing(out, &computed.timing)?;
    report::write_result(out, &computed.matrix)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DemoError;
    use gm_matrix::{CpuBackend, Shape};
    use std::io::Cursor;

    /// Drops the three timing lines, whose values vary run to run.
    fn without_timing(text: &str) -> String {
        text.lines()
            .filter(|l| {
                !l.starts_with("Start time:")
                    && !l.starts_with("End time:")
                    && !l.starts_with("Execution time:")
            })
            .map(|l| format!("{}\n", l))
            .collect()
    }

    #[test]
    fn test_run_addition() {
        let backend = CpuBackend::new();
        let mut out = Vec::new();
        run_addition(Cursor::new("2\n1 2 3 4\n10 20 30 40\n"), &mut out, &backend).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Start time: "));
        assert!(text.contains(" ms\n\nResultant Matrix:\n"));
        assert_eq!(without_timing(&text), "\nResultant Matrix:\n11 22 \n33 44 \n");
    }

    #[test]
    fn test_run_addition_bad_input() {
        let backend = CpuBackend::new();
        let mut out = Vec::new();
        let err = run_addition(Cursor::new("2 1 2"), &mut out, &backend).unwrap_err();
        assert!(matches!(err, DemoError::Input(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_subtraction_prints_rows_then_timing() {
        let backend = CpuBackend::new();
        let mut out = Vec::new();
        run_subtraction(3, &mut out, &backend).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("-8 -6 -4 \n-2 0 2 \n4 6 8 \nStart time: "));
        assert!(text.ends_with(" ms\n"));
    }

    #[test]
    fn test_run_subtraction_rejects_oversized() {
        let backend = CpuBackend::new();
        let mut out = Vec::new();
        let err = run_subtraction(46_341, &mut out, &backend).unwrap_err();
        assert!(matches!(err, DemoError::SizeTooLarge(46_341)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_multiplication_fixture() {
        let backend = CpuBackend::new();
        let (a, b) = fixtures::multiplication_operands();
        let mut out = Vec::new();
        run_multiplication(&a, &b, &mut out, &backend).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            without_timing(&text),
            "\nResultant Matrix:\n5 27 -2 12 \n-1 6 0 6 \n"
        );
    }

    #[test]
    fn test_run_multiplication_mismatch() {
        let backend = CpuBackend::new();
        let (a, _) = fixtures::multiplication_operands();
        let b = Matrix::zeros(Shape::new(2, 2));
        let mut out = Vec::new();
        let err = run_multiplication(&a, &b, &mut out, &backend).unwrap_err();

        assert!(matches!(
            err,
            DemoError::Matrix(MatrixError::MatmulMismatch { .. })
        ));
        assert_eq!(String::from_utf8(out).unwrap(), "Dimensions are not correct\n");
    }
}
