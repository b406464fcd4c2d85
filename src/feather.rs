//! Seam feathering.
//!
//! After a patch is pasted its rectangular border is usually visible. The
//! feather pass blurs the patched rectangle and blends the blurred copy back
//! over it at partial opacity:
//!
//! `out = alpha * blurred + (1 - alpha) * current`
//!
//! The blur samples only pixels inside the target (clamp-to-edge at the target
//! border), so nothing outside the rectangle is pulled in and nothing outside
//! it is written.

use image::RgbaImage;

use crate::rect::Rect;

/// Opacity used by the engine when compositing the blurred copy.
pub const DEFAULT_FEATHER_ALPHA: f32 = 0.55;

/// Largest accepted feather radius, in pixels.
pub const MAX_FEATHER_RADIUS: u32 = 30;

const CHANNELS: usize = 4;

/// Normalized 1-D Gaussian kernel with `sigma = radius`, spanning `ceil(3 * sigma)`
/// taps on each side of the center.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn gaussian_kernel(radius: u32) -> Vec<f32> {
    let sigma = radius as f32;
    let half = (3.0 * sigma).ceil() as i32;
    let denom = 2.0 * sigma * sigma;

    let mut weights: Vec<f32> = (-half..=half)
        .map(|i| {
            let d = i as f32;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Clip `target` to the buffer; `None` when nothing is left.
fn clip(target: Rect, width: u32, height: u32) -> Option<Rect> {
    let x = target.x.min(width);
    let y = target.y.min(height);
    let w = target.width.min(width - x);
    let h = target.height.min(height - y);
    (w > 0 && h > 0).then(|| Rect::new(x, y, w, h))
}

/// Blur `target` in place and blend the blur back at `alpha` opacity.
///
/// Does nothing when `radius` is 0 or `alpha` is not positive. `alpha` is
/// clamped to `[0, 1]` and `radius` to [`MAX_FEATHER_RADIUS`]. A target that
/// extends past the buffer is clipped to it.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
pub fn feather(buffer: &mut RgbaImage, target: Rect, radius: u32, alpha: f32) {
    if radius == 0 || alpha.is_nan() || alpha <= 0.0 {
        return;
    }
    let Some(rect) = clip(target, buffer.width(), buffer.height()) else {
        return;
    };
    let alpha = alpha.min(1.0);
    let kernel = gaussian_kernel(radius.min(MAX_FEATHER_RADIUS));
    let half = (kernel.len() / 2) as i64;

    let w = rect.width as usize;
    let h = rect.height as usize;
    let stride = buffer.width() as usize * CHANNELS;

    // Pull the target out as floats.
    let mut current = vec![0f32; w * h * CHANNELS];
    {
        let raw = buffer.as_raw();
        for row in 0..h {
            let start = (rect.y as usize + row) * stride + rect.x as usize * CHANNELS;
            let src = &raw[start..start + w * CHANNELS];
            let dst = &mut current[row * w * CHANNELS..(row + 1) * w * CHANNELS];
            for (d, s) in dst.iter_mut().zip(src) {
                *d = f32::from(*s);
            }
        }
    }

    let clamp_idx = |i: i64, len: usize| i.clamp(0, len as i64 - 1) as usize;

    // Horizontal pass.
    let mut horizontal = vec![0f32; w * h * CHANNELS];
    for row in 0..h {
        for col in 0..w {
            let mut acc = [0f32; CHANNELS];
            for (k, weight) in kernel.iter().enumerate() {
                let sx = clamp_idx(col as i64 + k as i64 - half, w);
                let base = (row * w + sx) * CHANNELS;
                for (a, v) in acc.iter_mut().zip(&current[base..base + CHANNELS]) {
                    *a += v * weight;
                }
            }
            let base = (row * w + col) * CHANNELS;
            horizontal[base..base + CHANNELS].copy_from_slice(&acc);
        }
    }

    // Vertical pass, blended straight back into the buffer.
    let raw: &mut [u8] = buffer;
    for row in 0..h {
        for col in 0..w {
            let mut acc = [0f32; CHANNELS];
            for (k, weight) in kernel.iter().enumerate() {
                let sy = clamp_idx(row as i64 + k as i64 - half, h);
                let base = (sy * w + col) * CHANNELS;
                for (a, v) in acc.iter_mut().zip(&horizontal[base..base + CHANNELS]) {
                    *a += v * weight;
                }
            }

            let local = (row * w + col) * CHANNELS;
            let out = (rect.y as usize + row) * stride + (rect.x as usize + col) * CHANNELS;
            let original = &current[local..local + CHANNELS];
            let pixel = raw[out..out + CHANNELS].iter_mut().zip(acc).zip(original);
            for ((dst, blurred), src) in pixel {
                let blended = blurred * alpha + src * (1.0 - alpha);
                *dst = blended.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}
