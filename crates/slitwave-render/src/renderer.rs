//! PNG output: field heatmaps and slice plots.

use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use slitwave_analysis::SliceGroup;
use slitwave_core::{ComplexField, DielectricMap, GridShape};
use slitwave_store::{FrameStore, StoreError};
use tracing::{debug, info};

use crate::colormap::{darken, diverging};
use crate::error::RenderError;
use crate::style::{ColorRange, RenderStyle};

/// File name of the image for frame `index`: `frame_00042.png`.
pub fn frame_file_name(index: u64) -> String {
    format!("frame_{index:05}.png")
}

/// Whether `name` is an image written by [`frame_file_name`].
fn is_frame_file(name: &str) -> bool {
    name.strip_prefix("frame_")
        .and_then(|rest| rest.strip_suffix(".png"))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Delete every frame image in `dir`. Other files are left alone.
fn clear_frames(dir: &Path) -> Result<usize, RenderError> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_frame = entry.file_name().to_str().is_some_and(is_frame_file);
        if is_frame && entry.file_type()?.is_file() {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// Draws frames and slice groups according to a [`RenderStyle`].
#[derive(Clone, Debug)]
pub struct FrameRenderer {
    style: RenderStyle,
}

impl FrameRenderer {
    /// Create a renderer.
    ///
    /// # Errors
    ///
    /// [`RenderError::InvalidStyle`] if `style` fails validation.
    pub fn new(style: RenderStyle) -> Result<Self, RenderError> {
        style.validate()?;
        Ok(Self { style })
    }

    /// The renderer's style.
    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    fn color_scale(&self, field: &ComplexField) -> f64 {
        match self.style.color_range {
            ColorRange::Fixed(v) => v,
            ColorRange::PerFrame => {
                let m = field.iter().map(|z| z.re.abs()).fold(0.0, f64::max);
                if m > 0.0 {
                    m
                } else {
                    1.0
                }
            }
        }
    }

    /// Write a heatmap of `field`'s real part to `path`.
    ///
    /// Row 0 is drawn at the top. Cells with permittivity above 1 are
    /// darkened in proportion to their permittivity. `frame_index` and
    /// `elapsed` are only logged; the image carries no text.
    ///
    /// # Errors
    ///
    /// [`RenderError::ShapeMismatch`] if `dielectric` and `field` differ in
    /// shape, [`RenderError::Draw`] if the backend fails.
    pub fn render_frame(
        &self,
        path: &Path,
        frame_index: u64,
        field: &ComplexField,
        dielectric: Option<&DielectricMap>,
        elapsed: f64,
    ) -> Result<(), RenderError> {
        let shape = GridShape::of(field);
        if let Some(d) = dielectric {
            let found = GridShape::of(d);
            if found != shape {
                return Err(RenderError::ShapeMismatch {
                    field: shape,
                    dielectric: found,
                });
            }
        }
        let scale = self.color_scale(field);
        let eps_max = dielectric
            .map(|d| d.iter().copied().fold(1.0, f64::max))
            .unwrap_or(1.0);
        let opacity = self.style.dielectric_opacity;
        let rows = shape.rows as i32;
        let cols = shape.cols as i32;

        let root =
            BitMapBackend::new(path, (self.style.width, self.style.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(self.style.margin)
            .build_cartesian_2d(0..cols, 0..rows)
            .map_err(draw_err)?;

        chart
            .draw_series(field.indexed_iter().map(|((r, c), z)| {
                let mut color = diverging(z.re / scale);
                if let Some(d) = dielectric {
                    let eps = d[(r, c)];
                    if eps > 1.0 {
                        color = darken(color, opacity * (eps - 1.0) / (eps_max - 1.0));
                    }
                }
                let x = c as i32;
                let y = rows - 1 - r as i32;
                Rectangle::new([(x, y), (x + 1, y + 1)], color.filled())
            }))
            .map_err(draw_err)?;
        root.present().map_err(draw_err)?;

        debug!(
            frame = frame_index,
            elapsed,
            path = %path.display(),
            "rendered frame"
        );
        Ok(())
    }

    /// Render every frame of `store` into `out_dir`, one
    /// [`frame_file_name`] per frame. Returns the image paths in frame
    /// order.
    ///
    /// `out_dir` is created if missing. Frame images already in it are
    /// removed first, so the directory holds exactly this store's frames.
    /// A store without dielectric data is rendered without the overlay.
    pub fn render_store(
        &self,
        store: &FrameStore,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, RenderError> {
        fs::create_dir_all(out_dir)?;
        let stale = clear_frames(out_dir)?;
        if stale > 0 {
            debug!(removed = stale, dir = %out_dir.display(), "removed old frame images");
        }
        let dielectric = match store.read_dielectric() {
            Ok(d) => Some(d),
            Err(StoreError::NotFound { .. }) => None,
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        for item in store.frames() {
            let (index, field) = item?;
            let path = out_dir.join(frame_file_name(index));
            self.render_frame(
                &path,
                index,
                &field,
                dielectric.as_ref(),
                store.frame_time(index)?,
            )?;
            paths.push(path);
        }
        info!(frames = paths.len(), dir = %out_dir.display(), "rendered frames");
        Ok(paths)
    }

    /// Plot slice groups to `path`, one horizontal panel per group stacked
    /// top to bottom. Each panel's vertical axis runs from 0 to the group
    /// maximum, so slices within a group are directly comparable.
    pub fn render_slices(&self, path: &Path, groups: &[SliceGroup]) -> Result<(), RenderError> {
        let root =
            BitMapBackend::new(path, (self.style.width, self.style.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        if groups.is_empty() {
            root.present().map_err(draw_err)?;
            return Ok(());
        }

        let panel_height = self.style.height / groups.len() as u32;
        let margin = self.style.margin.min(panel_height / 4);
        let palette = &self.style.slice_palette;
        let panels = root.split_evenly((groups.len(), 1));

        for (panel, group) in panels.iter().zip(groups) {
            let len = group
                .slices
                .iter()
                .map(|s| s.values.len())
                .max()
                .unwrap_or(0);
            let x_max = len.saturating_sub(1).max(1) as f64;
            let y_max = (if group.max > 0.0 { group.max } else { 1.0 }) * 1.05;

            let mut chart = ChartBuilder::on(panel)
                .margin(margin)
                .build_cartesian_2d(0.0..x_max, 0.0..y_max)
                .map_err(draw_err)?;
            chart
                .plotting_area()
                .draw(&Rectangle::new(
                    [(0.0, 0.0), (x_max, y_max)],
                    BLACK.stroke_width(1),
                ))
                .map_err(draw_err)?;

            for (i, slice) in group.slices.iter().enumerate() {
                let [r, g, b] = palette[i % palette.len()];
                let style = RGBColor(r, g, b).stroke_width(self.style.line_width);
                chart
                    .draw_series(LineSeries::new(
                        slice
                            .values
                            .iter()
                            .enumerate()
                            .map(|(x, &v)| (x as f64, v)),
                        style,
                    ))
                    .map_err(draw_err)?;
            }
        }
        root.present().map_err(draw_err)?;
        debug!(groups = groups.len(), path = %path.display(), "rendered slice plot");
        Ok(())
    }
}
