//! SVG → PNG rasterization.

use png::{BitDepth, ColorType, Encoder};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use super::SnapshotError;

/// Pixel size of a `logical`-sized edge at `scale`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scaled(logical: u32, scale: f32) -> u32 {
    (f64::from(logical) * f64::from(scale)).round().max(1.0) as u32
}

/// Rasterize `svg` (sized `width`×`height`) into PNG bytes at `scale`.
///
/// # Errors
///
/// Fails if the markup does not parse, the pixmap cannot be allocated, or
/// PNG encoding fails.
pub fn svg_to_png(svg: &str, width: u32, height: u32, scale: f32) -> Result<Vec<u8>, SnapshotError> {
    let mut options = Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = Tree::from_data(svg.as_bytes(), &options)?;

    let (px_width, px_height) = (scaled(width, scale), scaled(height, scale));
    let mut pixmap = Pixmap::new(px_width, px_height)
        .ok_or(SnapshotError::Pixmap { width: px_width, height: px_height })?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    let mut out = Vec::new();
    let mut encoder = Encoder::new(&mut out, px_width, px_height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixmap.data())?;
    writer.finish()?;
    Ok(out)
}
