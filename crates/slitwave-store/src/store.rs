//! The frame store file handle.
//!
//! [`FrameStore`] owns one open file. The layout is fixed at creation, so
//! frames are written in place by seeking to their offset. Reads take
//! `&self`; writes take `&mut self`, which keeps a single writer per store.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use slitwave_core::{ComplexField, DielectricMap, GridShape, SimulationParameters};
use tracing::{debug, warn};

use crate::codec::{
    decode_dielectric, decode_field, decode_header, encode_dielectric, encode_field, encode_header,
};
use crate::error::StoreError;
use crate::header::StoreHeader;
use crate::FLAG_DIELECTRIC_WRITTEN;

/// Byte offset of the flags byte inside the header.
const FLAGS_OFFSET: u64 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Access {
    ReadWrite,
    ReadOnly,
}

/// A fixed-layout binary container of field frames.
///
/// Created by the driver with [`create()`](FrameStore::create) (or
/// [`recreate()`](FrameStore::recreate), which discards any previous store
/// first), filled frame by frame, then closed. Consumers reopen it with
/// [`open()`](FrameStore::open), which is read-only.
///
/// Dropping the store releases the file handle on every path.
///
/// # Examples
///
/// ```
/// use ndarray::Array2;
/// use slitwave_core::{Complex64, GridShape, SimulationParameters};
/// use slitwave_store::FrameStore;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("run.slit");
/// let params = SimulationParameters::new(2.0, 3, 10).unwrap();
/// let shape = GridShape::new(4, 3);
///
/// let mut store = FrameStore::create(&path, params, shape, shape).unwrap();
/// let frame = Array2::from_elem(shape.dim(), Complex64::new(1.0, -1.0));
/// store.write_frame(2, &frame).unwrap();
/// store.close().unwrap();
///
/// let store = FrameStore::open(&path).unwrap();
/// assert_eq!(store.read_params().unwrap().frame_count(), 3);
/// assert_eq!(store.read_frame(2).unwrap(), frame);
/// ```
#[derive(Debug)]
pub struct FrameStore {
    file: Option<File>,
    path: PathBuf,
    header: StoreHeader,
    access: Access,
}

impl FrameStore {
    /// Create a new store at `path` and allocate space for every frame.
    ///
    /// The dielectric block and all frames start zero-filled. The header is
    /// written immediately.
    ///
    /// # Errors
    ///
    /// - [`StoreError::AlreadyExists`] if anything exists at `path`. Callers
    ///   that want overwrite semantics use [`recreate()`](FrameStore::recreate).
    /// - [`StoreError::ShapeMismatch`] if the dielectric and frame shapes
    ///   differ.
    /// - [`StoreError::Malformed`] if either shape has a zero dimension.
    /// - [`StoreError::Io`] if the header cannot be written or the file
    ///   cannot be sized. The new file is removed again.
    pub fn create(
        path: impl AsRef<Path>,
        params: SimulationParameters,
        dielectric_shape: GridShape,
        frame_shape: GridShape,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if dielectric_shape != frame_shape {
            return Err(StoreError::ShapeMismatch {
                expected: frame_shape,
                found: dielectric_shape,
            });
        }
        if !frame_shape.is_valid() {
            return Err(StoreError::Malformed {
                detail: format!("frame shape {frame_shape} has a zero dimension"),
            });
        }

        let header = StoreHeader::new(params, dielectric_shape, frame_shape);
        let total_len = header.total_len()?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => StoreError::AlreadyExists {
                    path: path.to_path_buf(),
                },
                _ => StoreError::Io(e),
            })?;

        let mut head = Vec::with_capacity(crate::HEADER_LEN as usize);
        encode_header(&mut head, &header)?;
        let allocated = file.write_all(&head).and_then(|()| file.set_len(total_len));
        if let Err(e) = allocated {
            drop(file);
            if let Err(cleanup) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %cleanup, "could not remove unallocated store");
            }
            return Err(e.into());
        }

        debug!(
            path = %path.display(),
            frames = params.frame_count(),
            shape = %frame_shape,
            bytes = total_len,
            "created frame store"
        );

        Ok(Self {
            file: Some(file),
            path: path.to_path_buf(),
            header,
            access: Access::ReadWrite,
        })
    }

    /// Delete whatever store exists at `path`, then [`create()`](FrameStore::create).
    ///
    /// Prior content is discarded unconditionally; nothing is merged.
    pub fn recreate(
        path: impl AsRef<Path>,
        params: SimulationParameters,
        dielectric_shape: GridShape,
        frame_shape: GridShape,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref();
        Self::delete(path)?;
        Self::create(path, params, dielectric_shape, frame_shape)
    }

    /// Open an existing store read-only.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if nothing exists at `path`; header
    /// validation errors from [`decode_header`]; and
    /// [`StoreError::Malformed`] if the file length disagrees with the
    /// header (truncated file).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound {
                what: format!("store at {}", path.display()),
            },
            _ => StoreError::Io(e),
        })?;

        let header = decode_header(&mut file)?;
        let expected = header.total_len()?;
        let actual = file.metadata()?.len();
        if actual != expected {
            return Err(StoreError::Malformed {
                detail: format!("file is {actual} bytes, header implies {expected}"),
            });
        }

        debug!(path = %path.display(), frames = header.params.frame_count(), "opened frame store");

        Ok(Self {
            file: Some(file),
            path: path.to_path_buf(),
            header,
            access: Access::ReadOnly,
        })
    }

    /// Remove the store at `path`. A missing file is not an error.
    pub fn delete(path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "deleted frame store");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Path this store lives at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether [`close()`](FrameStore::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    /// Whether the store was opened read-only.
    pub fn is_read_only(&self) -> bool {
        self.access == Access::ReadOnly
    }

    /// The decoded header. Available even after close.
    pub fn header(&self) -> &StoreHeader {
        &self.header
    }

    fn handle(&self) -> Result<&File, StoreError> {
        self.file.as_ref().ok_or(StoreError::Closed)
    }

    fn writable(&mut self) -> Result<&mut File, StoreError> {
        if self.access == Access::ReadOnly {
            return if self.file.is_some() {
                Err(StoreError::ReadOnly)
            } else {
                Err(StoreError::Closed)
            };
        }
        self.file.as_mut().ok_or(StoreError::Closed)
    }

    fn check_shape(expected: GridShape, found: GridShape) -> Result<(), StoreError> {
        if expected != found {
            return Err(StoreError::ShapeMismatch { expected, found });
        }
        Ok(())
    }

    // ── Writes ──────────────────────────────────────────────────

    /// Write the static dielectric map and mark it present in the header.
    pub fn write_dielectric(&mut self, data: &DielectricMap) -> Result<(), StoreError> {
        self.writable()?;
        Self::check_shape(self.header.dielectric_shape, GridShape::of(data))?;

        let bytes = encode_dielectric(data);
        let offset = self.header.dielectric_offset();
        let flags = self.header.flags | FLAG_DIELECTRIC_WRITTEN;

        let file = self.writable()?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(&bytes)?;
        file.seek(SeekFrom::Start(FLAGS_OFFSET))?;
        file.write_all(&[flags])?;
        self.header.flags = flags;
        Ok(())
    }

    /// Write one field frame at `index`.
    ///
    /// Index and shape are checked before any byte is written, so a rejected
    /// call leaves the store unmodified. There is no write-once or ordering
    /// guard: the driver is responsible for writing each index once, in
    /// ascending order.
    pub fn write_frame(&mut self, index: u64, data: &ComplexField) -> Result<(), StoreError> {
        self.writable()?;
        self.header.check_index(index)?;
        Self::check_shape(self.header.frame_shape, GridShape::of(data))?;

        let bytes = encode_field(data);
        let offset = self.header.frame_offset(index);

        let file = self.writable()?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(&bytes)?;
        Ok(())
    }

    /// Flush buffered writes to the OS.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        let file = self.file.as_mut().ok_or(StoreError::Closed)?;
        file.flush()?;
        Ok(())
    }

    /// Flush and release the file handle. Later operations fail with
    /// [`StoreError::Closed`].
    pub fn close(&mut self) -> Result<(), StoreError> {
        let mut file = self.file.take().ok_or(StoreError::Closed)?;
        file.flush()?;
        if self.access == Access::ReadWrite {
            file.sync_all()?;
        }
        debug!(path = %self.path.display(), "closed frame store");
        Ok(())
    }

    // ── Reads ───────────────────────────────────────────────────

    /// Run parameters from the header.
    pub fn read_params(&self) -> Result<SimulationParameters, StoreError> {
        self.handle()?;
        Ok(self.header.params)
    }

    /// Elapsed physical time of frame `index`.
    pub fn frame_time(&self, index: u64) -> Result<f64, StoreError> {
        self.handle()?;
        self.header.check_index(index)?;
        Ok(self.header.params.frame_time(index))
    }

    /// Read the dielectric map.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the dielectric was never written.
    pub fn read_dielectric(&self) -> Result<DielectricMap, StoreError> {
        let file = self.handle()?;
        if !self.header.has_dielectric() {
            return Err(StoreError::NotFound {
                what: "dielectric_data".to_string(),
            });
        }
        let bytes = Self::read_block(
            file,
            self.header.dielectric_offset(),
            self.header.dielectric_bytes(),
        )?;
        decode_dielectric(&bytes, self.header.dielectric_shape)
    }

    /// Read the field frame at `index`.
    pub fn read_frame(&self, index: u64) -> Result<ComplexField, StoreError> {
        let file = self.handle()?;
        self.header.check_index(index)?;
        let bytes = Self::read_block(
            file,
            self.header.frame_offset(index),
            self.header.frame_bytes(),
        )?;
        decode_field(&bytes, self.header.frame_shape)
    }

    /// Read the last frame.
    pub fn read_final_frame(&self) -> Result<ComplexField, StoreError> {
        self.read_frame(self.header.params.last_frame())
    }

    /// Iterate over all frames in index order.
    pub fn frames(&self) -> FrameIter<'_> {
        FrameIter {
            store: self,
            next: 0,
            done: false,
        }
    }

    fn read_block(mut file: &File, offset: u64, len: u64) -> Result<Vec<u8>, StoreError> {
        let len = usize::try_from(len).map_err(|_| StoreError::Malformed {
            detail: format!("block of {len} bytes does not fit in memory"),
        })?;
        let mut buf = vec![0u8; len];
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut buf)?;
        Ok(buf)
    }
}

/// In-order iterator over `(index, frame)` pairs of a store.
///
/// Stops after the first error.
pub struct FrameIter<'a> {
    store: &'a FrameStore,
    next: u64,
    done: bool,
}

impl Iterator for FrameIter<'_> {
    type Item = Result<(u64, ComplexField), StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.next >= self.store.header.params.frame_count() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        match self.store.read_frame(index) {
            Ok(frame) => Some(Ok((index, frame))),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use slitwave_core::Complex64;
    use tempfile::TempDir;

    fn params() -> SimulationParameters {
        SimulationParameters::new(4.0, 5, 10).unwrap()
    }

    fn shape() -> GridShape {
        GridShape::new(6, 4)
    }

    fn fresh(dir: &TempDir) -> FrameStore {
        FrameStore::create(dir.path().join("s.slit"), params(), shape(), shape()).unwrap()
    }

    fn ramp(seed: f64) -> ComplexField {
        Array2::from_shape_fn(shape().dim(), |(r, c)| {
            Complex64::new(seed + r as f64, seed - c as f64 * 0.5)
        })
    }

    #[test]
    fn create_refuses_existing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.slit");
        fs::write(&path, b"previous run").unwrap();
        let err = FrameStore::create(&path, params(), shape(), shape()).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
        // Untouched.
        assert_eq!(fs::read(&path).unwrap(), b"previous run");
    }

    #[test]
    fn recreate_replaces_existing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.slit");
        fs::write(&path, b"previous run").unwrap();
        let store = FrameStore::recreate(&path, params(), shape(), shape()).unwrap();
        assert_eq!(
            fs::metadata(&path).unwrap().len(),
            store.header().total_len().unwrap()
        );
    }

    #[test]
    fn failed_allocation_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.slit");
        // 2^59 frames of one complex cell: the length fits in u64 but not
        // in a signed file offset, so sizing the file fails after creation.
        let huge = SimulationParameters::new(1.0, 1 << 59, 1).unwrap();
        let cell = GridShape::new(1, 1);
        let err = FrameStore::create(&path, huge, cell, cell).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)), "{err:?}");
        assert!(!path.exists());
    }

    #[test]
    fn create_rejects_mismatched_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.slit");
        let err =
            FrameStore::create(&path, params(), GridShape::new(6, 5), shape()).unwrap_err();
        assert!(matches!(err, StoreError::ShapeMismatch { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn unwritten_frames_read_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = fresh(&dir);
        let frame = store.read_frame(3).unwrap();
        assert!(frame.iter().all(|z| *z == Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn write_then_read_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = fresh(&dir);
        store.write_frame(1, &ramp(1.0)).unwrap();
        store.write_frame(2, &ramp(2.0)).unwrap();
        assert_eq!(store.read_frame(1).unwrap(), ramp(1.0));
        assert_eq!(store.read_frame(2).unwrap(), ramp(2.0));
    }

    #[test]
    fn out_of_range_write_leaves_store_unmodified() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = fresh(&dir);
        store.write_frame(4, &ramp(9.0)).unwrap();
        let before = fs::read(store.path()).unwrap();

        let err = store.write_frame(5, &ramp(1.0)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::IndexOutOfRange {
                index: 5,
                frame_count: 5
            }
        ));
        let err = store.write_frame(u64::MAX, &ramp(1.0)).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { .. }));

        store.flush().unwrap();
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn shape_mismatch_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = fresh(&dir);
        let wrong = Array2::from_elem((4, 6), Complex64::new(1.0, 0.0));
        assert!(matches!(
            store.write_frame(0, &wrong),
            Err(StoreError::ShapeMismatch { .. })
        ));
        let wrong = Array2::<f64>::zeros((6, 3));
        assert!(matches!(
            store.write_dielectric(&wrong),
            Err(StoreError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn dielectric_not_found_until_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = fresh(&dir);
        assert!(matches!(
            store.read_dielectric(),
            Err(StoreError::NotFound { .. })
        ));
        let eps = Array2::from_shape_fn(shape().dim(), |(r, _)| if r == 2 { 12.0 } else { 1.0 });
        store.write_dielectric(&eps).unwrap();
        assert_eq!(store.read_dielectric().unwrap(), eps);
        assert!(store.header().has_dielectric());
    }

    #[test]
    fn dielectric_flag_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = fresh(&dir);
        let eps = Array2::from_elem(shape().dim(), 2.25);
        store.write_dielectric(&eps).unwrap();
        let path = store.path().to_path_buf();
        store.close().unwrap();

        let store = FrameStore::open(&path).unwrap();
        assert_eq!(store.read_dielectric().unwrap(), eps);
    }

    #[test]
    fn closed_store_rejects_everything() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = fresh(&dir);
        store.close().unwrap();
        assert!(store.is_closed());
        assert!(matches!(store.read_params(), Err(StoreError::Closed)));
        assert!(matches!(store.read_frame(0), Err(StoreError::Closed)));
        assert!(matches!(store.read_dielectric(), Err(StoreError::Closed)));
        assert!(matches!(
            store.write_frame(0, &ramp(0.0)),
            Err(StoreError::Closed)
        ));
        assert!(matches!(store.close(), Err(StoreError::Closed)));
    }

    #[test]
    fn opened_store_is_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = fresh(&dir);
        let path = store.path().to_path_buf();
        store.close().unwrap();

        let mut store = FrameStore::open(&path).unwrap();
        assert!(store.is_read_only());
        assert!(matches!(
            store.write_frame(0, &ramp(0.0)),
            Err(StoreError::ReadOnly)
        ));
        store.close().unwrap();
        assert!(matches!(
            store.write_frame(0, &ramp(0.0)),
            Err(StoreError::Closed)
        ));
    }

    #[test]
    fn open_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FrameStore::open(dir.path().join("nope.slit")),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn open_truncated_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = fresh(&dir);
        let path = store.path().to_path_buf();
        store.close().unwrap();
        let len = fs::metadata(&path).unwrap().len();
        OpenOptions::new()
            .write(true)
            .open(&path)
            .unwrap()
            .set_len(len - 16)
            .unwrap();
        assert!(matches!(
            FrameStore::open(&path),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = fresh(&dir);
        let path = store.path().to_path_buf();
        store.close().unwrap();
        FrameStore::delete(&path).unwrap();
        assert!(!path.exists());
        FrameStore::delete(&path).unwrap();
    }

    #[test]
    fn frame_iterator_yields_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = fresh(&dir);
        for i in 0..5u64 {
            store.write_frame(i, &ramp(i as f64)).unwrap();
        }
        let frames: Vec<_> = store.frames().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(frames.len(), 5);
        for (i, (index, frame)) in frames.iter().enumerate() {
            assert_eq!(*index, i as u64);
            assert_eq!(frame, &ramp(i as f64));
        }
    }

    #[test]
    fn frame_times_follow_params() {
        let dir = tempfile::tempdir().unwrap();
        let store = fresh(&dir);
        assert_eq!(store.frame_time(0).unwrap(), 0.0);
        assert_eq!(store.frame_time(4).unwrap(), 4.0);
        assert!(matches!(
            store.frame_time(5),
            Err(StoreError::IndexOutOfRange { .. })
        ));
    }
}
