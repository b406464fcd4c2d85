//! Rectangular patch compositing.
//!
//! Copies the pixels under a source rectangle of a read-only snapshot into a
//! target rectangle of the destination buffer. Equal-sized rectangles are a
//! straight row copy; differing sizes are resampled.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rect::Rect;

/// Resampling filter used when source and target sizes differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resample {
    /// Nearest neighbour.
    Nearest,
    /// Bilinear interpolation between the four closest source pixels.
    #[default]
    Bilinear,
}

const CHANNELS: usize = 4;

fn ensure_within(rect: Rect, image: &RgbaImage) -> Result<()> {
    if rect.fits_within(image.width(), image.height()) {
        Ok(())
    } else {
        Err(Error::RegionOutOfBounds {
            rect,
            width: image.width(),
            height: image.height(),
        })
    }
}

/// Copy `source` from `snapshot` into `target` of `destination`.
///
/// Only pixels inside `target` are written and only `snapshot` is read, so the
/// destination may already hold earlier patches without feeding back into this
/// one.
///
/// # Errors
///
/// Returns [`Error::RegionOutOfBounds`] if `source` does not fit `snapshot` or
/// `target` does not fit `destination`.
pub fn blit(
    snapshot: &RgbaImage,
    source: Rect,
    target: Rect,
    destination: &mut RgbaImage,
    resample: Resample,
) -> Result<()> {
    ensure_within(source, snapshot)?;
    ensure_within(target, destination)?;

    if source.width == target.width && source.height == target.height {
        copy_rows(snapshot, source, target, destination);
        return Ok(());
    }

    match resample {
        Resample::Nearest => resample_nearest(snapshot, source, target, destination),
        Resample::Bilinear => resample_bilinear(snapshot, source, target, destination),
    }
    Ok(())
}

fn copy_rows(snapshot: &RgbaImage, source: Rect, target: Rect, destination: &mut RgbaImage) {
    let src_stride = snapshot.width() as usize * CHANNELS;
    let dst_stride = destination.width() as usize * CHANNELS;
    let row_bytes = target.width as usize * CHANNELS;
    let src: &[u8] = snapshot;
    let dst: &mut [u8] = destination;

    for row in 0..target.height as usize {
        let s = (source.y as usize + row) * src_stride + source.x as usize * CHANNELS;
        let d = (target.y as usize + row) * dst_stride + target.x as usize * CHANNELS;
        dst[d..d + row_bytes].copy_from_slice(&src[s..s + row_bytes]);
    }
}

/// Map a target pixel index to a continuous source coordinate (pixel centers aligned).
fn map_coord(t: u32, target_len: u32, source_len: u32) -> f64 {
    (f64::from(t) + 0.5) * f64::from(source_len) / f64::from(target_len) - 0.5
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn resample_nearest(snapshot: &RgbaImage, source: Rect, target: Rect, destination: &mut RgbaImage) {
    for ty in 0..target.height {
        let sy = map_coord(ty, target.height, source.height)
            .round()
            .clamp(0.0, f64::from(source.height - 1)) as u32;
        for tx in 0..target.width {
            let sx = map_coord(tx, target.width, source.width)
                .round()
                .clamp(0.0, f64::from(source.width - 1)) as u32;
            let px = *snapshot.get_pixel(source.x + sx, source.y + sy);
            destination.put_pixel(target.x + tx, target.y + ty, px);
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn resample_bilinear(
    snapshot: &RgbaImage,
    source: Rect,
    target: Rect,
    destination: &mut RgbaImage,
) {
    let max_x = f64::from(source.width - 1);
    let max_y = f64::from(source.height - 1);

    for ty in 0..target.height {
        let fy = map_coord(ty, target.height, source.height).clamp(0.0, max_y);
        let y0 = fy.floor() as u32;
        let y1 = (y0 + 1).min(source.height - 1);
        let wy = fy - f64::from(y0);

        for tx in 0..target.width {
            let fx = map_coord(tx, target.width, source.width).clamp(0.0, max_x);
            let x0 = fx.floor() as u32;
            let x1 = (x0 + 1).min(source.width - 1);
            let wx = fx - f64::from(x0);

            let p00 = snapshot.get_pixel(source.x + x0, source.y + y0);
            let p10 = snapshot.get_pixel(source.x + x1, source.y + y0);
            let p01 = snapshot.get_pixel(source.x + x0, source.y + y1);
            let p11 = snapshot.get_pixel(source.x + x1, source.y + y1);

            let mut out = [0u8; CHANNELS];
            for (ch, value) in out.iter_mut().enumerate() {
                let top = f64::from(p00[ch]) * (1.0 - wx) + f64::from(p10[ch]) * wx;
                let bottom = f64::from(p01[ch]) * (1.0 - wx) + f64::from(p11[ch]) * wx;
                *value = (top * (1.0 - wy) + bottom * wy).round().clamp(0.0, 255.0) as u8;
            }
            destination.put_pixel(target.x + tx, target.y + ty, Rgba(out));
        }
    }
}
