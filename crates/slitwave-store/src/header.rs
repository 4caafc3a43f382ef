//! Store header and layout arithmetic.

use slitwave_core::{GridShape, SimulationParameters};

use crate::error::StoreError;
use crate::{FLAG_DIELECTRIC_WRITTEN, HEADER_LEN};

/// Bytes per stored real value (`f64`).
pub const REAL_BYTES: u64 = 8;

/// Bytes per stored complex value (`f64` real + `f64` imaginary).
pub const COMPLEX_BYTES: u64 = 16;

/// Everything the fixed-size header records.
///
/// Byte offsets of the dielectric block and of each frame follow from the
/// shapes and the frame count alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StoreHeader {
    /// Run parameters (`total_duration`, `frame_count`, `resolution`).
    pub params: SimulationParameters,
    /// Shape of the static dielectric array.
    pub dielectric_shape: GridShape,
    /// Shape of every field frame.
    pub frame_shape: GridShape,
    /// Flag bits (see [`FLAG_DIELECTRIC_WRITTEN`]).
    pub flags: u8,
}

impl StoreHeader {
    /// Header for a freshly created store (no flags set).
    pub fn new(
        params: SimulationParameters,
        dielectric_shape: GridShape,
        frame_shape: GridShape,
    ) -> Self {
        Self {
            params,
            dielectric_shape,
            frame_shape,
            flags: 0,
        }
    }

    /// Whether the dielectric map has been written.
    pub fn has_dielectric(&self) -> bool {
        self.flags & FLAG_DIELECTRIC_WRITTEN != 0
    }

    /// Byte offset of the dielectric block.
    pub fn dielectric_offset(&self) -> u64 {
        HEADER_LEN
    }

    /// Size of the dielectric block in bytes.
    pub fn dielectric_bytes(&self) -> u64 {
        self.dielectric_shape.cell_count() as u64 * REAL_BYTES
    }

    /// Size of one field frame in bytes.
    pub fn frame_bytes(&self) -> u64 {
        self.frame_shape.cell_count() as u64 * COMPLEX_BYTES
    }

    /// Byte offset of frame `index`. Does not bounds-check `index`.
    pub fn frame_offset(&self, index: u64) -> u64 {
        HEADER_LEN + self.dielectric_bytes() + index * self.frame_bytes()
    }

    /// Total file length implied by the header.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Malformed`] if the layout overflows `u64`, which
    /// only happens for corrupt headers.
    pub fn total_len(&self) -> Result<u64, StoreError> {
        let overflow = || StoreError::Malformed {
            detail: format!(
                "layout overflows u64: {} frames of {}",
                self.params.frame_count(),
                self.frame_shape
            ),
        };
        let dielectric = (self.dielectric_shape.cell_count() as u64)
            .checked_mul(REAL_BYTES)
            .ok_or_else(overflow)?;
        let frames = (self.frame_shape.cell_count() as u64)
            .checked_mul(COMPLEX_BYTES)
            .and_then(|b| b.checked_mul(self.params.frame_count()))
            .ok_or_else(overflow)?;
        HEADER_LEN
            .checked_add(dielectric)
            .and_then(|n| n.checked_add(frames))
            .ok_or_else(overflow)
    }

    /// Reject out-of-range frame indices.
    pub fn check_index(&self, index: u64) -> Result<(), StoreError> {
        let frame_count = self.params.frame_count();
        if index >= frame_count {
            return Err(StoreError::IndexOutOfRange { index, frame_count });
        }
        Ok(())
    }
}
