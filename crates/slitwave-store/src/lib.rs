//! Binary frame store for slitwave field snapshots.
//!
//! A [`FrameStore`] is a single file holding the run parameters, one static
//! dielectric map, and a fixed number of complex field frames. The layout is
//! fixed-size, so any frame can be written or read by index without
//! touching the others.
//!
//! # Architecture
//!
//! - [`FrameStore`] owns the file handle: create/open, write, read, close
//! - [`codec`] holds the primitive and array encoders (no serde dependency)
//! - [`StoreHeader`] describes the layout and computes byte offsets
//!
//! # Format
//!
//! ```text
//! [MAGIC "SLIT"] [VERSION u8] [FLAGS u8] [pad u16]
//! [total_duration f64] [frame_count u64] [time_delta f64] [resolution u32] [pad u32]
//! [dielectric rows u64] [dielectric cols u64] [frame rows u64] [frame cols u64]
//! [dielectric_data: rows*cols f64]
//! [field_data: frame_count * rows*cols * (re f64, im f64)]
//! ```
//!
//! All values are little-endian.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod header;
pub mod store;

pub use error::StoreError;
pub use header::StoreHeader;
pub use store::{FrameIter, FrameStore};

/// Magic bytes at the start of every store file.
pub const MAGIC: [u8; 4] = *b"SLIT";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: u64 = 72;

/// Header flag: the dielectric map has been written.
pub const FLAG_DIELECTRIC_WRITTEN: u8 = 0b0000_0001;
