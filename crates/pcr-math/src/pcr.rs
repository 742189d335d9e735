// ─────────────────────────────────────────────────────────────────────
// SCPN PCR — Parallel Cyclic Reduction
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Parallel Cyclic Reduction (Hockney & Jesshope, Parallel Computers 2,
//! pp. 475-483).
//!
//! Each level `l` combines every row `i` with its neighbours at stride
//! `2^l`, eliminating the coupling to them. After `ceil(log2 n)` levels
//! every row is decoupled and `x[i] = d[i] / b[i]`.
//!
//! Rows of one level only read the previous level's coefficients, so a
//! level is a data-parallel map over `0..n` into scratch buffers. The
//! scratch and live buffers trade places after each level. When the level
//! count is odd the final values are copied back so the system ends up
//! owning its original allocations.
//!
//! The reduction is destructive: on return `a, b, c, d` hold the fully
//! reduced (diagonal-only) system, not the caller's coefficients.

use std::time::{Duration, Instant};

use pcr_types::config::PcrConfig;
use pcr_types::error::{PcrError, PcrResult};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace};

use crate::diagonal::alloc_zeroed;
use crate::system::TridiagonalSystem;

/// Entry and exit timestamps of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveTiming {
    pub start: Instant,
    pub end: Instant,
}

impl SolveTiming {
    pub fn elapsed(&self) -> Duration {
        self.end.duration_since(self.start)
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

/// Number of reduction levels, `ceil(log2 n)`; zero for `n <= 1`.
pub fn level_count(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

/// `-value / divisor`, with an exactly-zero divisor replaced by `epsilon`.
#[inline(always)]
fn decoupling_coeff(divisor: f32, value: f32, epsilon: f32) -> f32 {
    -value / if divisor == 0.0 { epsilon } else { divisor }
}

/// One row of the next level.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ReducedRow {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
}

/// Read-only view of one level's coefficients.
struct LevelInput<'a> {
    a: &'a [f32],
    b: &'a [f32],
    c: &'a [f32],
    d: &'a [f32],
    stride: usize,
    epsilon: f32,
}

impl LevelInput<'_> {
    /// Combine row `i` with rows `i ± stride`. A neighbour outside `[0, n)`
    /// acts as the decoupled unit row `b = 1, a = c = d = 0`.
    #[inline(always)]
    fn reduce_row(&self, i: usize) -> ReducedRow {
        let n = self.b.len();
        let left = i.checked_sub(self.stride);
        let right = Some(i + self.stride).filter(|&r| r < n);

        let alpha = decoupling_coeff(left.map_or(1.0, |l| self.b[l]), self.a[i], self.epsilon);
        let gamma = decoupling_coeff(right.map_or(1.0, |r| self.b[r]), self.c[i], self.epsilon);

        let (a_left, c_left, d_left) =
            left.map_or((0.0, 0.0, 0.0), |l| (self.a[l], self.c[l], self.d[l]));
        let (a_right, c_right, d_right) =
            right.map_or((0.0, 0.0, 0.0), |r| (self.a[r], self.c[r], self.d[r]));

        ReducedRow {
            a: alpha * a_left,
            b: self.b[i] + alpha * c_left + gamma * a_right,
            c: gamma * c_right,
            d: self.d[i] + alpha * d_left + gamma * d_right,
        }
    }
}

/// The second buffer set for double buffering.
struct Scratch {
    a: Vec<f32>,
    b: Vec<f32>,
    c: Vec<f32>,
    d: Vec<f32>,
}

impl Scratch {
    fn new(n: usize) -> PcrResult<Self> {
        Ok(Scratch {
            a: alloc_zeroed(n)?,
            b: alloc_zeroed(n)?,
            c: alloc_zeroed(n)?,
            d: alloc_zeroed(n)?,
        })
    }

    /// Make the freshly written level the live one.
    fn swap_with(&mut self, system: &mut TridiagonalSystem) {
        system.a.swap_buffer(&mut self.a);
        system.b.swap_buffer(&mut self.b);
        system.c.swap_buffer(&mut self.c);
        system.d.swap_buffer(&mut self.d);
    }

    /// Copy the live values into the buffers the system started with, then
    /// hand those back to it.
    fn restore_into(&mut self, system: &mut TridiagonalSystem) {
        self.a.copy_from_slice(system.a.as_slice());
        self.b.copy_from_slice(system.b.as_slice());
        self.c.copy_from_slice(system.c.as_slice());
        self.d.copy_from_slice(system.d.as_slice());
        self.swap_with(system);
    }
}

/// PCR solver. Holds configuration and, optionally, a dedicated pool.
pub struct PcrSolver {
    config: PcrConfig,
    pool: Option<ThreadPool>,
}

impl Default for PcrSolver {
    fn default() -> Self {
        PcrSolver {
            config: PcrConfig::default(),
            pool: None,
        }
    }
}

impl PcrSolver {
    pub fn new(config: PcrConfig) -> PcrResult<Self> {
        config.validate()?;
        let pool = match config.num_threads {
            Some(threads) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("pcr-worker-{i}"))
                    .build()
                    .map_err(|e| PcrError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };
        Ok(PcrSolver { config, pool })
    }

    pub fn config(&self) -> &PcrConfig {
        &self.config
    }

    /// Solve `system` in place: `x` receives the solution and `a, b, c, d`
    /// are left fully reduced.
    ///
    /// Fails only if the scratch buffers cannot be allocated, in which case
    /// the system is untouched.
    pub fn solve(&self, system: &mut TridiagonalSystem) -> PcrResult<SolveTiming> {
        match &self.pool {
            Some(pool) => pool.install(|| self.solve_in_current_pool(system)),
            None => self.solve_in_current_pool(system),
        }
    }

    fn solve_in_current_pool(&self, system: &mut TridiagonalSystem) -> PcrResult<SolveTiming> {
        let start = Instant::now();
        let n = system.len();
        if n == 0 {
            return Ok(SolveTiming { start, end: start });
        }

        let levels = level_count(n);
        let parallel = n >= self.config.min_parallel_len;
        debug!(n, levels, parallel, "pcr solve");

        let mut scratch = Scratch::new(n)?;
        for level in 0..levels {
            let stride = 1usize << level;
            trace!(level, stride, "reduction level");
            self.reduce_level(system, &mut scratch, stride, parallel);
            scratch.swap_with(system);
        }

        divide_decoupled(system, parallel);

        if levels % 2 == 1 {
            scratch.restore_into(system);
        }

        let end = Instant::now();
        let timing = SolveTiming { start, end };
        debug!(n, elapsed_s = timing.elapsed_secs(), "pcr solve done");
        Ok(timing)
    }

    /// Write level `log2(stride) + 1` of `system` into `out`.
    fn reduce_level(
        &self,
        system: &TridiagonalSystem,
        out: &mut Scratch,
        stride: usize,
        parallel: bool,
    ) {
        let input = LevelInput {
            a: system.a.as_slice(),
            b: system.b.as_slice(),
            c: system.c.as_slice(),
            d: system.d.as_slice(),
            stride,
            epsilon: self.config.pivot_epsilon,
        };
        let store = |i: usize, ((a, b), (c, d)): ((&mut f32, &mut f32), (&mut f32, &mut f32))| {
            let row = input.reduce_row(i);
            *a = row.a;
            *b = row.b;
            *c = row.c;
            *d = row.d;
        };

        if parallel {
            out.a
                .par_iter_mut()
                .zip(out.b.par_iter_mut())
                .zip(out.c.par_iter_mut().zip(out.d.par_iter_mut()))
                .enumerate()
                .for_each(|(i, row)| store(i, row));
        } else {
            out.a
                .iter_mut()
                .zip(out.b.iter_mut())
                .zip(out.c.iter_mut().zip(out.d.iter_mut()))
                .enumerate()
                .for_each(|(i, row)| store(i, row));
        }
    }
}

/// `x[i] = d[i] / b[i]` for a fully decoupled system.
fn divide_decoupled(system: &mut TridiagonalSystem, parallel: bool) {
    let b = system.b.as_slice();
    let d = system.d.as_slice();
    let x = system.x.as_mut_slice();
    if parallel {
        x.par_iter_mut()
            .zip(d.par_iter().zip(b.par_iter()))
            .for_each(|(xi, (di, bi))| *xi = di / bi);
    } else {
        x.iter_mut()
            .zip(d.iter().zip(b.iter()))
            .for_each(|(xi, (di, bi))| *xi = di / bi);
    }
}

/// Solve with the default configuration on the global rayon pool.
pub fn solve(system: &mut TridiagonalSystem) -> PcrResult<SolveTiming> {
    PcrSolver::default().solve(system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tridiag::thomas_solve;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Diagonally dominant system with known solution in [1, 2].
    fn dominant_system(n: usize, seed: u64) -> (TridiagonalSystem, Vec<f32>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let x_true: Vec<f32> = (0..n).map(|_| rng.gen_range(1.0..2.0)).collect();
        let a: Vec<f32> = (0..n)
            .map(|i| if i > 0 { rng.gen_range(-1.0..1.0) } else { 0.0 })
            .collect();
        let c: Vec<f32> = (0..n)
            .map(|i| if i + 1 < n { rng.gen_range(-1.0..1.0) } else { 0.0 })
            .collect();
        let b: Vec<f32> = (0..n).map(|_| rng.gen_range(3.0..5.0)).collect();
        let d: Vec<f32> = (0..n)
            .map(|i| {
                let mut r = b[i] * x_true[i];
                if i > 0 {
                    r += a[i] * x_true[i - 1];
                }
                if i + 1 < n {
                    r += c[i] * x_true[i + 1];
                }
                r
            })
            .collect();
        (
            TridiagonalSystem::from_diagonals(&a, &b, &c, &d).unwrap(),
            x_true,
        )
    }

    fn max_rel_diff(x: &[f32], reference: &[f32]) -> f32 {
        x.iter()
            .zip(reference)
            .map(|(xi, ri)| (xi - ri).abs() / ri.abs())
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_level_count() {
        assert_eq!(level_count(0), 0);
        assert_eq!(level_count(1), 0);
        assert_eq!(level_count(2), 1);
        assert_eq!(level_count(3), 2);
        assert_eq!(level_count(4), 2);
        assert_eq!(level_count(5), 3);
        assert_eq!(level_count(8), 3);
        assert_eq!(level_count(9), 4);
        assert_eq!(level_count(1 << 20), 20);
        assert_eq!(level_count((1 << 20) + 1), 21);
    }

    #[test]
    fn test_decoupling_coeff_zero_divisor() {
        let alpha = decoupling_coeff(0.0, 1.0, 1e-30);
        assert!(alpha.is_finite());
        assert_eq!(alpha, -1e30);
        assert_eq!(decoupling_coeff(2.0, 1.0, 1e-30), -0.5);
    }

    #[test]
    fn test_empty_system_is_noop() {
        let mut system = TridiagonalSystem::new(0).unwrap();
        let timing = solve(&mut system).unwrap();
        assert_eq!(timing.elapsed(), Duration::ZERO);
        assert!(system.is_empty());
    }

    #[test]
    fn test_single_row_exact() {
        let mut system =
            TridiagonalSystem::from_diagonals(&[0.7], &[3.0], &[-0.4], &[7.5]).unwrap();
        solve(&mut system).unwrap();
        assert_eq!(system.x(), &[7.5f32 / 3.0]);
    }

    #[test]
    fn test_decoupled_rows() {
        let k = 2.5f32;
        for n in [1usize, 2, 3, 7, 16, 33] {
            let b: Vec<f32> = (0..n).map(|i| 1.0 + i as f32).collect();
            let d: Vec<f32> = b.iter().map(|bi| k * bi).collect();
            let mut system =
                TridiagonalSystem::from_diagonals(&vec![0.0; n], &b, &vec![0.0; n], &d).unwrap();
            solve(&mut system).unwrap();
            for (i, &xi) in system.x().iter().enumerate() {
                assert!((xi - k).abs() < 1e-6, "n={n}: x[{i}] = {xi}, expected {k}");
            }
        }
    }

    #[test]
    fn test_matches_thomas_reference() {
        for (seed, n) in [1usize, 2, 3, 4, 8, 17, 100].into_iter().enumerate() {
            let (mut system, x_true) = dominant_system(n, seed as u64);
            let reference =
                thomas_solve(system.a(), system.b(), system.c(), system.d()).unwrap();
            solve(&mut system).unwrap();

            let err = max_rel_diff(system.x(), &reference);
            assert!(err < 1e-4, "n={n}: max relative deviation from Thomas {err:e}");
            let err_true = max_rel_diff(system.x(), &x_true);
            assert!(err_true < 1e-4, "n={n}: max relative error {err_true:e}");
        }
    }

    #[test]
    fn test_left_boundary_ignores_raw_sub_diagonal() {
        let (mut clean, _) = dominant_system(6, 42);
        let mut dirty = clean.clone();
        dirty.coefficients_mut().0[0] = 123.0;
        dirty.coefficients_mut().2[5] = -77.0;
        solve(&mut clean).unwrap();
        solve(&mut dirty).unwrap();
        assert_eq!(clean.x(), dirty.x());
    }

    #[test]
    fn test_reduced_state_is_diagonal() {
        let (mut system, _) = dominant_system(13, 3);
        solve(&mut system).unwrap();
        assert!(system.a().iter().all(|&v| v == 0.0));
        assert!(system.c().iter().all(|&v| v == 0.0));
        for i in 0..13 {
            assert_eq!(system.x()[i], system.d()[i] / system.b()[i]);
        }
    }

    #[test]
    fn test_buffer_identity_survives_swapping() {
        // 2, 5, 8 reduce in an odd number of levels; 3, 4, 16 in an even one.
        for n in [2usize, 3, 4, 5, 8, 16] {
            let (mut system, _) = dominant_system(n, n as u64);
            let before: Vec<*const f32> = system.diagonals().iter().map(|v| v.as_ptr()).collect();
            solve(&mut system).unwrap();
            let after: Vec<*const f32> = system.diagonals().iter().map(|v| v.as_ptr()).collect();
            assert_eq!(before, after, "n={n} (levels={})", level_count(n));
        }
    }

    #[test]
    fn test_zero_pivot_stays_finite() {
        // b[1] == 0 forces the epsilon guard on the first level.
        let mut system = TridiagonalSystem::from_diagonals(
            &[0.0, 1.0, 1.0],
            &[1.0, 0.0, 1.0],
            &[0.0, 0.0, 0.0],
            &[1.0, 1.0, 1.0],
        )
        .unwrap();
        solve(&mut system).unwrap();
        assert!(system.b().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_serial_and_parallel_agree_bitwise() {
        let (template, _) = dominant_system(257, 9);
        let serial = PcrSolver::new(PcrConfig {
            min_parallel_len: usize::MAX,
            ..PcrConfig::default()
        })
        .unwrap();
        let parallel = PcrSolver::new(PcrConfig {
            min_parallel_len: 0,
            num_threads: Some(4),
            ..PcrConfig::default()
        })
        .unwrap();

        let mut s1 = template.clone();
        let mut s2 = template.clone();
        serial.solve(&mut s1).unwrap();
        parallel.solve(&mut s2).unwrap();
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_solver_rejects_invalid_config() {
        let result = PcrSolver::new(PcrConfig {
            num_threads: Some(0),
            ..PcrConfig::default()
        });
        assert!(matches!(result, Err(PcrError::ConfigError(_))));
    }

    #[test]
    fn test_minimal_dense_example() {
        let m = ndarray::array![
            [4.0f32, 3.0, 0.0, 0.0],
            [8.0, 4.0, 9.0, 0.0],
            [0.0, 2.0, 8.0, 4.0],
            [0.0, 0.0, 4.0, 8.0]
        ];
        let rhs = [1.0f32, 2.0, 3.0, 4.0];
        let mut system = TridiagonalSystem::from_dense(&m, &rhs).unwrap();
        let reference = system.try_clone_coefficients().unwrap();
        solve(&mut system).unwrap();

        let ax = m.dot(&ndarray::Array1::from(system.x().to_vec()));
        for i in 0..4 {
            assert!(
                (ax[i] - rhs[i]).abs() < 1e-4,
                "Ax[{i}] = {}, expected {}",
                ax[i],
                rhs[i]
            );
        }
        assert!(crate::validate::max_relative_error(&system, &reference) < 1e-4);
    }
}
