use std::io::{self, Write};

use gm_matrix::{KernelTiming, Matrix};

/// Print the kernel's start, end and elapsed time.
pub fn write_timing<W: Write>(out: &mut W, timing: &KernelTiming) -> io::Result<()> {
    writeln!(out, "Start time: {} ns", timing.start_ns)?;
    writeln!(out, "End time: {} ns", timing.end_ns)?;
    writeln!(
        out,
        "Execution time: {} ms",
        format_general(timing.execution_ms())
    )
}

/// Significant digits used for the execution time, as a C++ stream prints a
/// `double` by default.
const SIGNIFICANT_DIGITS: i32 = 6;

/// `%g`-style formatting: `SIGNIFICANT_DIGITS` significant digits, trailing
/// zeros dropped, scientific notation when the exponent is below -4 or at
/// least `SIGNIFICANT_DIGITS`.
fn format_general(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }

    // Round to the target precision first so the exponent reflects any carry
    // (e.g. 999999.5 -> 1e+06).
    let sci = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };

    if exp < -4 || exp >= SIGNIFICANT_DIGITS {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Print the result matrix under a `Resultant Matrix:` header.
pub fn write_result<W: Write>(out: &mut W, matrix: &Matrix) -> io::Result<()> {
    write!(out, "\nResultant Matrix:\n{}", matrix)
}
