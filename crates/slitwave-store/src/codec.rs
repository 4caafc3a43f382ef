//! Binary encode/decode for the store format.
//!
//! All integers and floats are little-endian. Arrays are written in
//! row-major (logical) order with no alignment padding; complex values are
//! stored as a real `f64` followed by an imaginary `f64`.

use std::io::{Read, Write};

use ndarray::Array2;
use num_complex::Complex64;
use slitwave_core::{ComplexField, DielectricMap, GridShape, SimulationParameters};

use crate::error::StoreError;
use crate::header::{StoreHeader, COMPLEX_BYTES, REAL_BYTES};
use crate::{FORMAT_VERSION, HEADER_LEN, MAGIC};

/// Decode one f64 from an 8-byte chunk.
#[inline]
fn f64_from_chunk(chunk: &[u8]) -> f64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(chunk);
    f64::from_le_bytes(buf)
}

/// Sequential little-endian field reader over an in-memory header block.
struct HeaderFields<'a> {
    rest: &'a [u8],
}

impl<'a> HeaderFields<'a> {
    fn new(block: &'a [u8]) -> Self {
        Self { rest: block }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], StoreError> {
        let rest: &'a [u8] = self.rest;
        let (head, tail) = rest
            .split_first_chunk::<N>()
            .ok_or_else(|| StoreError::Malformed {
                detail: format!("header ends {} bytes early", N - rest.len()),
            })?;
        self.rest = tail;
        Ok(*head)
    }

    fn byte(&mut self) -> Result<u8, StoreError> {
        let [b] = self.take::<1>()?;
        Ok(b)
    }

    fn u32(&mut self) -> Result<u32, StoreError> {
        self.take().map(u32::from_le_bytes)
    }

    fn u64(&mut self) -> Result<u64, StoreError> {
        self.take().map(u64::from_le_bytes)
    }

    fn f64(&mut self) -> Result<f64, StoreError> {
        self.take().map(f64::from_le_bytes)
    }

    fn shape(&mut self, what: &str) -> Result<GridShape, StoreError> {
        let rows = self.u64()?;
        let cols = self.u64()?;
        let (Ok(rows), Ok(cols)) = (usize::try_from(rows), usize::try_from(cols)) else {
            return Err(StoreError::Malformed {
                detail: format!("{what} shape ({rows}, {cols}) does not fit in usize"),
            });
        };
        let shape = GridShape::new(rows, cols);
        if !shape.is_valid() {
            return Err(StoreError::Malformed {
                detail: format!("{what} shape {shape} has a zero dimension"),
            });
        }
        Ok(shape)
    }
}

// ── Header encode/decode ────────────────────────────────────────

/// Encode the fixed-size store header.
pub fn encode_header(w: &mut dyn Write, header: &StoreHeader) -> Result<(), StoreError> {
    let params = &header.params;
    let mut block = Vec::with_capacity(HEADER_LEN as usize);

    block.extend_from_slice(&MAGIC);
    block.extend_from_slice(&[FORMAT_VERSION, header.flags, 0, 0]);

    block.extend_from_slice(&params.total_duration().to_le_bytes());
    block.extend_from_slice(&params.frame_count().to_le_bytes());
    block.extend_from_slice(&params.time_delta().to_le_bytes());
    block.extend_from_slice(&params.resolution().to_le_bytes());
    block.extend_from_slice(&[0u8; 4]);

    for shape in [header.dielectric_shape, header.frame_shape] {
        block.extend_from_slice(&(shape.rows as u64).to_le_bytes());
        block.extend_from_slice(&(shape.cols as u64).to_le_bytes());
    }
    debug_assert_eq!(block.len() as u64, HEADER_LEN);

    w.write_all(&block)?;
    Ok(())
}

/// Decode and validate the store header.
///
/// Checks magic, version, parameter validity, that the stored `time_delta`
/// agrees bit-for-bit with the one derived from duration and frame count,
/// and that the dielectric and frame shapes agree.
pub fn decode_header(r: &mut dyn Read) -> Result<StoreHeader, StoreError> {
    let mut block = [0u8; HEADER_LEN as usize];
    r.read_exact(&mut block)?;
    let mut fields = HeaderFields::new(&block);

    if fields.take::<4>()? != MAGIC {
        return Err(StoreError::InvalidMagic);
    }
    let version = fields.byte()?;
    if version != FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion { found: version });
    }
    let flags = fields.byte()?;
    fields.take::<2>()?;

    let total_duration = fields.f64()?;
    let frame_count = fields.u64()?;
    let time_delta = fields.f64()?;
    let resolution = fields.u32()?;
    fields.take::<4>()?;

    let params = SimulationParameters::new(total_duration, frame_count, resolution)?;
    if params.time_delta().to_bits() != time_delta.to_bits() {
        return Err(StoreError::Malformed {
            detail: format!(
                "time_delta {time_delta} disagrees with duration/frames ({})",
                params.time_delta()
            ),
        });
    }

    let dielectric_shape = fields.shape("dielectric")?;
    let frame_shape = fields.shape("frame")?;
    if dielectric_shape != frame_shape {
        return Err(StoreError::Malformed {
            detail: format!(
                "dielectric shape {dielectric_shape} differs from frame shape {frame_shape}"
            ),
        });
    }

    Ok(StoreHeader {
        params,
        dielectric_shape,
        frame_shape,
        flags,
    })
}

// ── Array encode/decode ─────────────────────────────────────────

/// Encode a real array into a byte buffer, row-major.
pub fn encode_dielectric(data: &DielectricMap) -> Vec<u8> {
    let mut buf = Vec::with_capacity(data.len() * REAL_BYTES as usize);
    for v in data.iter() {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf
}

/// Encode a complex array into a byte buffer, row-major, `(re, im)` pairs.
pub fn encode_field(data: &ComplexField) -> Vec<u8> {
    let mut buf = Vec::with_capacity(data.len() * COMPLEX_BYTES as usize);
    for z in data.iter() {
        buf.extend_from_slice(&z.re.to_le_bytes());
        buf.extend_from_slice(&z.im.to_le_bytes());
    }
    buf
}

/// Decode a real array of `shape` from `bytes`.
pub fn decode_dielectric(bytes: &[u8], shape: GridShape) -> Result<DielectricMap, StoreError> {
    let expected = shape.cell_count() * REAL_BYTES as usize;
    if bytes.len() != expected {
        return Err(StoreError::Malformed {
            detail: format!(
                "dielectric block is {} bytes, expected {expected}",
                bytes.len()
            ),
        });
    }
    let values: Vec<f64> = bytes.chunks_exact(8).map(f64_from_chunk).collect();
    Array2::from_shape_vec(shape.dim(), values).map_err(|e| StoreError::Malformed {
        detail: format!("dielectric block: {e}"),
    })
}

/// Decode a complex array of `shape` from `bytes`.
pub fn decode_field(bytes: &[u8], shape: GridShape) -> Result<ComplexField, StoreError> {
    let expected = shape.cell_count() * COMPLEX_BYTES as usize;
    if bytes.len() != expected {
        return Err(StoreError::Malformed {
            detail: format!("frame block is {} bytes, expected {expected}", bytes.len()),
        });
    }
    let values: Vec<Complex64> = bytes
        .chunks_exact(16)
        .map(|c| Complex64::new(f64_from_chunk(&c[..8]), f64_from_chunk(&c[8..])))
        .collect();
    Array2::from_shape_vec(shape.dim(), values).map_err(|e| StoreError::Malformed {
        detail: format!("frame block: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> StoreHeader {
        let params = SimulationParameters::new(120.0, 120, 10).unwrap();
        StoreHeader::new(params, GridShape::new(30, 20), GridShape::new(30, 20))
    }

    #[test]
    fn header_roundtrip_and_length() {
        let h = header();
        let mut buf = Vec::new();
        encode_header(&mut buf, &h).unwrap();
        assert_eq!(buf.len() as u64, HEADER_LEN);
        let decoded = decode_header(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, h);
    }

    #[test]
    fn header_field_offsets() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        assert_eq!(&buf[0..4], b"SLIT");
        assert_eq!(buf[4], FORMAT_VERSION);
        assert_eq!(f64::from_le_bytes(buf[8..16].try_into().unwrap()), 120.0);
        assert_eq!(u64::from_le_bytes(buf[16..24].try_into().unwrap()), 120);
        assert_eq!(
            f64::from_le_bytes(buf[24..32].try_into().unwrap()),
            120.0 / 119.0
        );
        assert_eq!(u32::from_le_bytes(buf[32..36].try_into().unwrap()), 10);
        assert_eq!(u64::from_le_bytes(buf[64..72].try_into().unwrap()), 20);
    }

    #[test]
    fn bad_magic_rejected() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        buf[0] = b'X';
        assert!(matches!(
            decode_header(&mut buf.as_slice()),
            Err(StoreError::InvalidMagic)
        ));
    }

    #[test]
    fn unknown_version_rejected() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        buf[4] = 99;
        assert!(matches!(
            decode_header(&mut buf.as_slice()),
            Err(StoreError::UnsupportedVersion { found: 99 })
        ));
    }

    #[test]
    fn tampered_time_delta_rejected() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        buf[24..32].copy_from_slice(&1.0f64.to_le_bytes());
        assert!(matches!(
            decode_header(&mut buf.as_slice()),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn invalid_frame_count_rejected() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        buf[16..24].copy_from_slice(&1u64.to_le_bytes());
        assert!(matches!(
            decode_header(&mut buf.as_slice()),
            Err(StoreError::Params(_))
        ));
    }

    #[test]
    fn truncated_header_is_io_error() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        buf.truncate(40);
        assert!(matches!(
            decode_header(&mut buf.as_slice()),
            Err(StoreError::Io(_))
        ));
    }

    #[test]
    fn header_fields_read_in_sequence() {
        let mut block = vec![7u8];
        block.extend_from_slice(&42u32.to_le_bytes());
        block.extend_from_slice(&(-0.5f64).to_le_bytes());
        let mut fields = HeaderFields::new(&block);
        assert_eq!(fields.byte().unwrap(), 7);
        assert_eq!(fields.u32().unwrap(), 42);
        assert_eq!(fields.f64().unwrap(), -0.5);
        assert!(matches!(fields.u64(), Err(StoreError::Malformed { .. })));
    }

    #[test]
    fn field_block_layout_is_re_im_row_major() {
        let field = Array2::from_shape_fn((2, 2), |(r, c)| {
            Complex64::new((r * 2 + c) as f64, -((r * 2 + c) as f64))
        });
        let bytes = encode_field(&field);
        assert_eq!(bytes.len(), 4 * 16);
        // Cell (1, 0) is the third value.
        assert_eq!(f64_from_chunk(&bytes[32..40]), 2.0);
        assert_eq!(f64_from_chunk(&bytes[40..48]), -2.0);
        let back = decode_field(&bytes, GridShape::new(2, 2)).unwrap();
        assert_eq!(back, field);
    }

    #[test]
    fn short_block_is_malformed() {
        let bytes = vec![0u8; 8 * 3];
        assert!(matches!(
            decode_dielectric(&bytes, GridShape::new(2, 2)),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn transposed_view_encodes_logical_order() {
        let base = Array2::from_shape_fn((2, 3), |(r, c)| (r * 3 + c) as f64);
        let t = base.t().to_owned();
        let bytes = encode_dielectric(&t);
        let back = decode_dielectric(&bytes, GridShape::new(3, 2)).unwrap();
        assert_eq!(back, t);
    }
}
