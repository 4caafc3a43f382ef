//! Video encoding through an external `ffmpeg`.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::error::RenderError;

/// Input pattern handed to the encoder; matches
/// [`frame_file_name`](crate::frame_file_name).
pub const FRAME_PATTERN: &str = "frame_%05d.png";

/// Encode `frames_dir/frame_%05d.png` into `output` at `fps` frames per
/// second using the `ffmpeg` found on `PATH`.
///
/// # Errors
///
/// [`RenderError::Encoder`] if `ffmpeg` cannot be started or exits with a
/// failure status; [`RenderError::InvalidStyle`] if `fps` is 0.
pub fn encode_animation(
    frames_dir: impl AsRef<Path>,
    output: impl AsRef<Path>,
    fps: u32,
) -> Result<(), RenderError> {
    encode_animation_with("ffmpeg", frames_dir, output, fps)
}

/// [`encode_animation`] with an explicit encoder executable.
pub fn encode_animation_with(
    program: impl AsRef<OsStr>,
    frames_dir: impl AsRef<Path>,
    output: impl AsRef<Path>,
    fps: u32,
) -> Result<(), RenderError> {
    if fps == 0 {
        return Err(RenderError::InvalidStyle {
            reason: "fps must be > 0".to_string(),
        });
    }
    let program = program.as_ref();
    let output = output.as_ref();
    let input = frames_dir.as_ref().join(FRAME_PATTERN);

    let result = Command::new(program)
        .args(["-y", "-loglevel", "error", "-framerate"])
        .arg(fps.to_string())
        .arg("-i")
        .arg(&input)
        // yuv420p needs even dimensions.
        .args(["-vf", "scale=trunc(iw/2)*2:trunc(ih/2)*2", "-pix_fmt", "yuv420p"])
        .arg(output)
        .output()
        .map_err(|e| RenderError::Encoder {
            reason: format!("could not run {}: {e}", program.to_string_lossy()),
        })?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let detail = stderr.lines().last().unwrap_or("").trim();
        return Err(RenderError::Encoder {
            reason: format!(
                "{} exited with {}: {detail}",
                program.to_string_lossy(),
                result.status
            ),
        });
    }
    info!(output = %output.display(), fps, "encoded animation");
    Ok(())
}
