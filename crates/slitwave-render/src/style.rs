//! Rendering configuration.

use crate::error::RenderError;

/// How the field colour scale is chosen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorRange {
    /// `[-m, m]` where `m` is the largest `|re|` in each frame.
    PerFrame,
    /// `[-v, v]` for every frame.
    Fixed(f64),
}

/// Image and plot settings shared by every render call.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStyle {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Blank border around the plot area, in pixels.
    pub margin: u32,
    /// Field colour scale.
    pub color_range: ColorRange,
    /// How strongly dielectric cells are darkened, 0 (invisible) to 1 (black).
    pub dielectric_opacity: f64,
    /// Line colours for slice plots, cycled within each group.
    pub slice_palette: Vec<[u8; 3]>,
    /// Stroke width of slice lines, in pixels.
    pub line_width: u32,
    /// Frames per second of the encoded animation.
    pub fps: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            margin: 10,
            color_range: ColorRange::PerFrame,
            dielectric_opacity: 0.6,
            slice_palette: vec![
                [31, 119, 180],
                [255, 127, 14],
                [44, 160, 44],
                [214, 39, 40],
            ],
            line_width: 2,
            fps: 20,
        }
    }
}

impl RenderStyle {
    /// Check every setting.
    ///
    /// # Errors
    ///
    /// [`RenderError::InvalidStyle`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), RenderError> {
        let invalid = |reason: String| Err(RenderError::InvalidStyle { reason });
        if self.width == 0 || self.height == 0 {
            return invalid(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        if 2 * self.margin >= self.width.min(self.height) {
            return invalid(format!("margin {} leaves no plot area", self.margin));
        }
        if let ColorRange::Fixed(v) = self.color_range {
            if !(v > 0.0 && v.is_finite()) {
                return invalid(format!("fixed color range must be finite and > 0, got {v}"));
            }
        }
        if !(0.0..=1.0).contains(&self.dielectric_opacity) {
            return invalid(format!(
                "dielectric_opacity must be in [0, 1], got {}",
                self.dielectric_opacity
            ));
        }
        if self.slice_palette.is_empty() {
            return invalid("slice_palette must not be empty".to_string());
        }
        if self.line_width == 0 {
            return invalid("line_width must be > 0".to_string());
        }
        if self.fps == 0 {
            return invalid("fps must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(style: RenderStyle) -> String {
        match style.validate() {
            Err(RenderError::InvalidStyle { reason }) => reason,
            other => panic!("expected InvalidStyle, got {other:?}"),
        }
    }

    #[test]
    fn default_is_valid() {
        RenderStyle::default().validate().unwrap();
    }

    #[test]
    fn rejects_bad_settings() {
        let base = RenderStyle::default;
        assert!(reason(RenderStyle { width: 0, ..base() }).contains("image size"));
        assert!(reason(RenderStyle { margin: 300, ..base() }).contains("margin"));
        assert!(reason(RenderStyle {
            color_range: ColorRange::Fixed(0.0),
            ..base()
        })
        .contains("color range"));
        assert!(reason(RenderStyle {
            color_range: ColorRange::Fixed(f64::NAN),
            ..base()
        })
        .contains("color range"));
        assert!(reason(RenderStyle {
            dielectric_opacity: 1.5,
            ..base()
        })
        .contains("dielectric_opacity"));
        assert!(reason(RenderStyle {
            slice_palette: Vec::new(),
            ..base()
        })
        .contains("slice_palette"));
        assert!(reason(RenderStyle { line_width: 0, ..base() }).contains("line_width"));
        assert!(reason(RenderStyle { fps: 0, ..base() }).contains("fps"));
    }
}
