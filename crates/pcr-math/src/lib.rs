// ─────────────────────────────────────────────────────────────────────
// SCPN PCR — Math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Tridiagonal systems and their Parallel Cyclic Reduction solver.

pub mod diagonal;
pub mod generate;
pub mod pcr;
pub mod system;
pub mod tridiag;
pub mod validate;

pub use diagonal::DiagonalVector;
pub use pcr::{solve, PcrSolver, SolveTiming};
pub use system::TridiagonalSystem;
pub use validate::{max_relative_error, mean_absolute_percentage_error};
