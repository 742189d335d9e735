// ─────────────────────────────────────────────────────────────────────
// SCPN PCR — Tridiag
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Thomas algorithm for tridiagonal systems.
//!
//! Sequential reference for the PCR solver. Accumulates in f64, so on
//! well-conditioned systems it is the more accurate of the two.

use std::time::Instant;

use pcr_types::error::{PcrError, PcrResult};

use crate::pcr::SolveTiming;
use crate::system::TridiagonalSystem;

/// Solve tridiagonal system Ax = d using the Thomas algorithm.
///
/// - `a`: sub-diagonal \[n\] (a\[0\] unused)
/// - `b`: main diagonal \[n\]
/// - `c`: super-diagonal \[n\] (c\[n-1\] unused)
/// - `d`: right-hand side \[n\]
///
/// Returns: solution vector x \[n\]. A zero pivot is an `InvalidArgument`.
pub fn thomas_solve(a: &[f32], b: &[f32], c: &[f32], d: &[f32]) -> PcrResult<Vec<f32>> {
    let n = d.len();
    for found in [a.len(), b.len(), c.len()] {
        if found != n {
            return Err(PcrError::SizeMismatch { expected: n, found });
        }
    }
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut c_prime = vec![0.0f64; n];
    let mut d_prime = vec![0.0f64; n];

    // Forward sweep
    let b0 = f64::from(b[0]);
    if b0 == 0.0 {
        return Err(PcrError::InvalidArgument("zero pivot at row 0".to_string()));
    }
    c_prime[0] = f64::from(c[0]) / b0;
    d_prime[0] = f64::from(d[0]) / b0;

    for i in 1..n {
        let ai = f64::from(a[i]);
        let den = f64::from(b[i]) - ai * c_prime[i - 1];
        if den == 0.0 {
            return Err(PcrError::InvalidArgument(format!("zero pivot at row {i}")));
        }
        if i < n - 1 {
            c_prime[i] = f64::from(c[i]) / den;
        }
        d_prime[i] = (f64::from(d[i]) - ai * d_prime[i - 1]) / den;
    }

    // Back substitution
    let mut x = vec![0.0f64; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }

    Ok(x.into_iter().map(|v| v as f32).collect())
}

/// Thomas solve writing into `system.x`. Coefficients are left intact.
pub fn solve_sequential(system: &mut TridiagonalSystem) -> PcrResult<SolveTiming> {
    let start = Instant::now();
    let x = thomas_solve(system.a(), system.b(), system.c(), system.d())?;
    system.x_mut().copy_from_slice(&x);
    Ok(SolveTiming {
        start,
        end: Instant::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thomas_identity() {
        // Solve I * x = [1,2,3,4,5]
        let n = 5;
        let a = vec![0.0; n];
        let b = vec![1.0; n];
        let c = vec![0.0; n];
        let d = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let x = thomas_solve(&a, &b, &c, &d).unwrap();
        for i in 0..n {
            assert!((x[i] - d[i]).abs() < 1e-6, "x[{i}] should equal d[{i}]");
        }
    }

    #[test]
    fn test_thomas_simple_tridiag() {
        // 1D Laplacian
        // [ 2 -1  0  0]   [x0]   [1]
        // [-1  2 -1  0] * [x1] = [0]
        // [ 0 -1  2 -1]   [x2]   [0]
        // [ 0  0 -1  2]   [x3]   [1]
        let a = vec![0.0, -1.0, -1.0, -1.0];
        let b = vec![2.0, 2.0, 2.0, 2.0];
        let c = vec![-1.0, -1.0, -1.0, 0.0];
        let d = vec![1.0, 0.0, 0.0, 1.0];
        let x = thomas_solve(&a, &b, &c, &d).unwrap();

        // Exact solution is all ones
        for (i, xi) in x.iter().enumerate() {
            assert!((xi - 1.0).abs() < 1e-5, "x[{i}] = {xi}, expected 1");
        }
    }

    #[test]
    fn test_thomas_empty() {
        assert!(thomas_solve(&[], &[], &[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_thomas_zero_pivot() {
        let err = thomas_solve(&[0.0, 1.0], &[0.0, 1.0], &[1.0, 0.0], &[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, PcrError::InvalidArgument(_)));
    }

    #[test]
    fn test_thomas_length_mismatch() {
        let err = thomas_solve(&[0.0], &[1.0, 1.0], &[0.0, 0.0], &[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, PcrError::SizeMismatch { expected: 2, found: 1 }));
    }

    #[test]
    fn test_solve_sequential_keeps_coefficients() {
        let mut system = TridiagonalSystem::from_diagonals(
            &[0.0, -1.0, -1.0],
            &[2.0, 2.0, 2.0],
            &[-1.0, -1.0, 0.0],
            &[1.0, 0.0, 1.0],
        )
        .unwrap();
        let before = system.clone();
        solve_sequential(&mut system).unwrap();
        assert_eq!(system.b(), before.b());
        assert_eq!(system.d(), before.d());
        for xi in system.x() {
            assert!((xi - 1.0).abs() < 1e-5);
        }
    }
}
