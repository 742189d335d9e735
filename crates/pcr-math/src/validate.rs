// ─────────────────────────────────────────────────────────────────────
// SCPN PCR — Validation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Backward-error checks for a solved system.
//!
//! Both metrics substitute the solver's `x` into the *original* equations
//! (a coefficient copy taken before the destructive solve) and compare the
//! row residual `r[i] = a₀[i]·x[i-1] + b₀[i]·x[i] + c₀[i]·x[i+1]` with the
//! original right-hand side `d₀[i]`. No true solution is needed.

use crate::system::TridiagonalSystem;

/// `A₀·x` for row `i`, accumulated in the order `b, a, c`.
#[inline]
fn row_residual(reference: &TridiagonalSystem, x: &[f32], i: usize) -> f32 {
    let n = reference.len();
    let mut result = reference.b()[i] * x[i];
    if i > 0 {
        result += reference.a()[i] * x[i - 1];
    }
    if i + 1 < n {
        result += reference.c()[i] * x[i + 1];
    }
    result
}

/// Largest `|r[i] - d₀[i]| / |d₀[i]|` over rows with `d₀[i] != 0`.
///
/// A NaN residual ends the scan and is returned as is. Systems of
/// different sizes yield NaN.
pub fn max_relative_error(solved: &TridiagonalSystem, reference: &TridiagonalSystem) -> f32 {
    if solved.len() != reference.len() {
        return f32::NAN;
    }
    let x = solved.x();

    let mut max_relative_error = 0.0f32;
    for i in 0..reference.len() {
        let result = row_residual(reference, x, i);
        if result.is_nan() {
            return result;
        }

        let expected = reference.d()[i];
        if expected != 0.0 {
            let relative_error = (result - expected).abs() / expected.abs();
            if relative_error > max_relative_error {
                max_relative_error = relative_error;
            }
        }
    }
    max_relative_error
}

/// Mean absolute percentage error of the residual, in percent.
///
/// Rows with `d₀[i] == 0` and a nonzero residual add a flat 1.0 to the sum.
/// The sum is divided by `n`, so an empty system gives NaN, as do systems
/// of different sizes.
pub fn mean_absolute_percentage_error(
    solved: &TridiagonalSystem,
    reference: &TridiagonalSystem,
) -> f32 {
    if solved.len() != reference.len() {
        return f32::NAN;
    }
    let x = solved.x();

    let mut total = 0.0f32;
    for i in 0..reference.len() {
        let result = row_residual(reference, x, i);
        let expected = reference.d()[i];
        if expected != 0.0 {
            total += ((result - expected) / expected).abs() * 100.0;
        } else if result != 0.0 {
            total += 1.0;
        }
    }
    total / reference.len() as f32
}

/// Both metrics for one solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationReport {
    pub max_relative_error: f32,
    pub mape: f32,
}

impl ValidationReport {
    pub fn compute(solved: &TridiagonalSystem, reference: &TridiagonalSystem) -> Self {
        ValidationReport {
            max_relative_error: max_relative_error(solved, reference),
            mape: mean_absolute_percentage_error(solved, reference),
        }
    }
}
