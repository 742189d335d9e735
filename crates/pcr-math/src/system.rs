// ─────────────────────────────────────────────────────────────────────
// SCPN PCR — System
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! A tridiagonal system `A·x = d` stored as five equal-length vectors.
//!
//! - `a`: sub-diagonal (`a[0]` unused)
//! - `b`: main diagonal
//! - `c`: super-diagonal (`c[n-1]` unused)
//! - `d`: right-hand side
//! - `x`: solution, meaningful only after a successful solve

use ndarray::Array2;
use pcr_types::error::{PcrError, PcrResult};

use crate::diagonal::DiagonalVector;

#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalSystem {
    pub(crate) a: DiagonalVector,
    pub(crate) b: DiagonalVector,
    pub(crate) c: DiagonalVector,
    pub(crate) d: DiagonalVector,
    pub(crate) x: DiagonalVector,
}

impl TridiagonalSystem {
    /// Zeroed system of size `n`. A failed sub-allocation drops the
    /// vectors already obtained before the error is returned.
    pub fn new(n: usize) -> PcrResult<Self> {
        Ok(TridiagonalSystem {
            a: DiagonalVector::zeros(n)?,
            b: DiagonalVector::zeros(n)?,
            c: DiagonalVector::zeros(n)?,
            d: DiagonalVector::zeros(n)?,
            x: DiagonalVector::zeros(n)?,
        })
    }

    /// Build from coefficient slices of equal length. `x` starts zeroed.
    pub fn from_diagonals(a: &[f32], b: &[f32], c: &[f32], d: &[f32]) -> PcrResult<Self> {
        let n = b.len();
        for found in [a.len(), c.len(), d.len()] {
            if found != n {
                return Err(PcrError::SizeMismatch { expected: n, found });
            }
        }
        Ok(TridiagonalSystem {
            a: DiagonalVector::from_slice(a)?,
            b: DiagonalVector::from_slice(b)?,
            c: DiagonalVector::from_slice(c)?,
            d: DiagonalVector::from_slice(d)?,
            x: DiagonalVector::zeros(n)?,
        })
    }

    /// Extract the three bands of a square dense matrix.
    ///
    /// Entries outside the band must be zero.
    pub fn from_dense(matrix: &Array2<f32>, rhs: &[f32]) -> PcrResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(PcrError::InvalidArgument(format!(
                "matrix must be square, got {rows}x{cols}"
            )));
        }
        if rhs.len() != rows {
            return Err(PcrError::SizeMismatch {
                expected: rows,
                found: rhs.len(),
            });
        }
        if let Some(((i, j), v)) = matrix
            .indexed_iter()
            .find(|((i, j), v)| i.abs_diff(*j) > 1 && **v != 0.0)
        {
            return Err(PcrError::InvalidArgument(format!(
                "entry ({i}, {j}) = {v} lies outside the tridiagonal band"
            )));
        }

        let mut system = Self::new(rows)?;
        for i in 0..rows {
            if i > 0 {
                system.a.as_mut_slice()[i] = matrix[[i, i - 1]];
            }
            system.b.as_mut_slice()[i] = matrix[[i, i]];
            if i + 1 < rows {
                system.c.as_mut_slice()[i] = matrix[[i, i + 1]];
            }
        }
        system.d.as_mut_slice().copy_from_slice(rhs);
        Ok(system)
    }

    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    pub fn a(&self) -> &[f32] {
        self.a.as_slice()
    }

    pub fn b(&self) -> &[f32] {
        self.b.as_slice()
    }

    pub fn c(&self) -> &[f32] {
        self.c.as_slice()
    }

    pub fn d(&self) -> &[f32] {
        self.d.as_slice()
    }

    /// Solution vector. Zero until a solver has run.
    pub fn x(&self) -> &[f32] {
        self.x.as_slice()
    }

    pub fn x_mut(&mut self) -> &mut [f32] {
        self.x.as_mut_slice()
    }

    pub fn diagonals(&self) -> [&DiagonalVector; 5] {
        [&self.a, &self.b, &self.c, &self.d, &self.x]
    }

    /// Disjoint mutable views of `(a, b, c, d)` for populating coefficients.
    pub fn coefficients_mut(&mut self) -> (&mut [f32], &mut [f32], &mut [f32], &mut [f32]) {
        (
            self.a.as_mut_slice(),
            self.b.as_mut_slice(),
            self.c.as_mut_slice(),
            self.d.as_mut_slice(),
        )
    }

    /// Copy `a, b, c, d` from `src` (not `x`). Sizes must match; on
    /// mismatch `self` is left untouched.
    pub fn copy_from(&mut self, src: &TridiagonalSystem) -> PcrResult<()> {
        if self.len() != src.len() {
            return Err(PcrError::SizeMismatch {
                expected: self.len(),
                found: src.len(),
            });
        }
        self.a.copy_from(&src.a)?;
        self.b.copy_from(&src.b)?;
        self.c.copy_from(&src.c)?;
        self.d.copy_from(&src.d)?;
        Ok(())
    }

    /// Fresh, independently owned system holding a copy of the
    /// coefficients. The reference a validator needs after a destructive solve.
    pub fn try_clone_coefficients(&self) -> PcrResult<Self> {
        let mut copy = Self::new(self.len())?;
        copy.copy_from(self)?;
        Ok(copy)
    }

    /// Release all five vectors.
    pub fn destroy(self) {
        drop(self);
    }
}

/// Free-function form of [`TridiagonalSystem::copy_from`].
pub fn copy(dest: &mut TridiagonalSystem, src: &TridiagonalSystem) -> PcrResult<()> {
    dest.copy_from(src)
}
