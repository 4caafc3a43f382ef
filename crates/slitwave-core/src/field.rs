//! Field array types, grid shapes, and field component selectors.

use std::fmt;

use ndarray::Array2;
use num_complex::Complex64;

/// One time-sampled snapshot of a complex field amplitude.
///
/// Axis 0 is the row (propagation direction), axis 1 the column.
pub type ComplexField = Array2<Complex64>;

/// Static real-valued permittivity map used as a geometry overlay.
pub type DielectricMap = Array2<f64>;

/// Shape of a 2D grid as `(rows, cols)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridShape {
    /// Number of rows (axis 0).
    pub rows: usize,
    /// Number of columns (axis 1).
    pub cols: usize,
}

impl GridShape {
    /// Create a shape from row and column counts.
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Shape of an existing array.
    pub fn of<T>(array: &Array2<T>) -> Self {
        let (rows, cols) = array.dim();
        Self { rows, cols }
    }

    /// Total number of cells.
    pub const fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Both dimensions are non-zero.
    pub const fn is_valid(&self) -> bool {
        self.rows > 0 && self.cols > 0
    }

    /// `(rows, cols)` tuple, as accepted by `ndarray` constructors.
    pub const fn dim(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

impl From<(usize, usize)> for GridShape {
    fn from((rows, cols): (usize, usize)) -> Self {
        Self { rows, cols }
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}

/// Electromagnetic field component an engine can be sampled for.
///
/// A 2D run in the TM polarisation carries `Ez`, `Hx`, `Hy`; TE carries
/// `Hz`, `Ex`, `Ey`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FieldComponent {
    /// Electric field, x component.
    Ex,
    /// Electric field, y component.
    Ey,
    /// Electric field, z component (out of plane).
    #[default]
    Ez,
    /// Magnetic field, x component.
    Hx,
    /// Magnetic field, y component.
    Hy,
    /// Magnetic field, z component (out of plane).
    Hz,
}

impl FieldComponent {
    /// Every component, in declaration order.
    pub const ALL: [FieldComponent; 6] = [
        Self::Ex,
        Self::Ey,
        Self::Ez,
        Self::Hx,
        Self::Hy,
        Self::Hz,
    ];

    /// Short lower-case name, e.g. `"ez"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ex => "ex",
            Self::Ey => "ey",
            Self::Ez => "ez",
            Self::Hx => "hx",
            Self::Hy => "hy",
            Self::Hz => "hz",
        }
    }

    /// Parse a component name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for FieldComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ex => "Ex",
            Self::Ey => "Ey",
            Self::Ez => "Ez",
            Self::Hx => "Hx",
            Self::Hy => "Hy",
            Self::Hz => "Hz",
        };
        f.write_str(s)
    }
}
