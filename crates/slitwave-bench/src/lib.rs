//! Benchmark profiles for slitwave.
//!
//! - [`REFERENCE_SHAPE`]: the 300 × 200 grid of the default experiment
//! - [`reference_engine`]: the default double-slit geometry on that grid

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use slitwave_core::{FieldEngine, GridShape};
use slitwave_engines::HuygensDoubleSlit;

/// 30 µm × 20 µm at 10 cells/µm.
pub const REFERENCE_SHAPE: GridShape = GridShape::new(300, 200);

/// Default double-slit engine on [`REFERENCE_SHAPE`], initialized and
/// advanced to `time` (engine units).
pub fn reference_engine(time: f64) -> Result<HuygensDoubleSlit, String> {
    let mut engine = HuygensDoubleSlit::builder()
        .shape(REFERENCE_SHAPE)
        .build()?;
    engine.initialize().map_err(|e| e.to_string())?;
    engine.advance(time).map_err(|e| e.to_string())?;
    Ok(engine)
}
