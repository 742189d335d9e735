// ─────────────────────────────────────────────────────────────────────
// SCPN PCR — Diagonal
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fixed-length f32 storage for one diagonal, the right-hand side or the
//! solution of a tridiagonal system.

use pcr_types::error::{PcrError, PcrResult};

/// Allocate `n` zeroed floats, reporting allocator failure instead of aborting.
pub(crate) fn alloc_zeroed(n: usize) -> PcrResult<Vec<f32>> {
    let mut data = Vec::new();
    data.try_reserve_exact(n)
        .map_err(|_| PcrError::Allocation { requested: n })?;
    data.resize(n, 0.0);
    Ok(data)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiagonalVector {
    data: Vec<f32>,
}

impl DiagonalVector {
    /// `n` zero-initialised values.
    pub fn zeros(n: usize) -> PcrResult<Self> {
        Ok(DiagonalVector {
            data: alloc_zeroed(n)?,
        })
    }

    pub fn from_slice(values: &[f32]) -> PcrResult<Self> {
        let mut diag = Self::zeros(values.len())?;
        diag.data.copy_from_slice(values);
        Ok(diag)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Address of the backing buffer. Stable for the lifetime of the
    /// buffer, so it identifies which allocation currently backs this vector.
    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    /// Element-wise copy from `src`. Lengths must agree; on mismatch
    /// nothing is written.
    pub fn copy_from(&mut self, src: &DiagonalVector) -> PcrResult<()> {
        if self.len() != src.len() {
            return Err(PcrError::SizeMismatch {
                expected: self.len(),
                found: src.len(),
            });
        }
        self.data.copy_from_slice(&src.data);
        Ok(())
    }

    /// Free the buffer, leaving an empty vector. Calling it again is a no-op.
    pub fn release(&mut self) {
        self.data = Vec::new();
    }

    /// Exchange the backing buffer with `other` without copying values.
    pub(crate) fn swap_buffer(&mut self, other: &mut Vec<f32>) {
        std::mem::swap(&mut self.data, other);
    }
}
