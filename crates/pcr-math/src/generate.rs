// ─────────────────────────────────────────────────────────────────────
// SCPN PCR — System Generator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Seeded random systems for benchmarking.
//!
//! Off-diagonals are tiny (|v| < 1e-5) against a main diagonal of
//! magnitude up to 100, each entry with a random sign.

use pcr_types::error::PcrResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::system::TridiagonalSystem;

pub const DEFAULT_SEED: u64 = 1234;

const OFF_DIAGONAL_SCALE: f64 = 1e-5;
const MAIN_DIAGONAL_SCALE: f64 = 1e2;

fn signed<R: Rng>(rng: &mut R, magnitude: f64) -> f32 {
    let value = magnitude as f32;
    if rng.gen_bool(0.5) {
        value
    } else {
        -value
    }
}

/// Random system of size `n`, reproducible for a given `seed`.
/// `a[0]` and `c[n-1]` are zero.
pub fn generate_system(n: usize, seed: u64) -> PcrResult<TridiagonalSystem> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut system = TridiagonalSystem::new(n)?;
    let (lower, main, upper, rhs) = system.coefficients_mut();

    for i in 0..n {
        let sub = if i > 0 {
            rng.gen::<f64>() * OFF_DIAGONAL_SCALE
        } else {
            0.0
        };
        lower[i] = signed(&mut rng, sub);
        let diag = rng.gen::<f64>() * MAIN_DIAGONAL_SCALE;
        main[i] = signed(&mut rng, diag);
        let sup = if i + 1 < n {
            rng.gen::<f64>() * OFF_DIAGONAL_SCALE
        } else {
            0.0
        };
        upper[i] = signed(&mut rng, sup);
        let value = rng.gen::<f64>();
        rhs[i] = signed(&mut rng, value);
    }

    Ok(system)
}
