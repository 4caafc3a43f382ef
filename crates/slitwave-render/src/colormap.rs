//! Colour mapping for field heatmaps.

use plotters::style::RGBColor;

/// Map `v` in `[-1, 1]` onto blue, white, red. Values outside are clamped.
pub fn diverging(v: f64) -> RGBColor {
    let x = ((v + 1.0) * 0.5).clamp(0.0, 1.0);
    let r = (255.0 * (2.0 * x).min(1.0)).round() as u8;
    let b = (255.0 * (2.0 * (1.0 - x)).min(1.0)).round() as u8;
    let g = (255.0 * (1.0 - (2.0 * (x - 0.5)).abs())).round() as u8;
    RGBColor(r, g, b)
}

/// Darken `color` towards black by `amount` in `[0, 1]`.
pub fn darken(color: RGBColor, amount: f64) -> RGBColor {
    let keep = 1.0 - amount.clamp(0.0, 1.0);
    let scale = |c: u8| (f64::from(c) * keep).round() as u8;
    RGBColor(scale(color.0), scale(color.1), scale(color.2))
}
