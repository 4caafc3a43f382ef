//! Reference [`FieldEngine`](slitwave_core::FieldEngine) implementations.
//!
//! These engines stand in for a full electromagnetic solver so that the
//! record, analyse and render pipeline can run end to end without one.
//!
//! - [`HuygensDoubleSlit`]: analytic double-slit diffraction from
//!   Huygens point emitters.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod huygens;

pub use huygens::{HuygensDoubleSlit, HuygensDoubleSlitBuilder};
