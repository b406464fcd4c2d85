//! Rectangle and region model.
//!
//! Regions arrive in two shapes: pixel rectangles drawn directly on a canvas at
//! buffer resolution (possibly with negative extents when the drag went up or
//! left), and percent rectangles that stay resolution independent until the
//! buffer size is known. Both resolve to a normalized [`Rect`] that lies fully
//! inside the buffer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest accepted region side, in pixels, after normalization.
pub const DEFAULT_MIN_REGION_SIZE: u32 = 6;

/// Axis-aligned rectangle in pixel space with a top-left origin.
///
/// Rectangles produced by [`RawRect::normalize`] satisfy
/// `x + width <= buffer_width`, `y + height <= buffer_height` and have both
/// sides at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    #[must_use]
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    /// Number of pixels covered.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Geometric center in continuous pixel coordinates.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }

    /// Number of pixels shared with `other`.
    #[must_use]
    pub fn overlap_area(&self, other: &Rect) -> u64 {
        let w = self
            .right()
            .min(other.right())
            .saturating_sub(u64::from(self.x.max(other.x)));
        let h = self
            .bottom()
            .min(other.bottom())
            .saturating_sub(u64::from(self.y.max(other.y)));
        w * h
    }

    /// Whether the rectangle lies fully inside a `width` x `height` buffer.
    #[must_use]
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width >= 1
            && self.height >= 1
            && self.right() <= u64::from(width)
            && self.bottom() <= u64::from(height)
    }

    /// Re-apply the normalization rule for a `buf_w` x `buf_h` buffer.
    ///
    /// A rectangle that is already normalized for the same buffer comes back
    /// unchanged.
    #[must_use]
    pub fn normalize(self, buf_w: u32, buf_h: u32) -> Rect {
        RawRect::from(self).normalize(buf_w, buf_h)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// A rectangle as drawn by a drag gesture.
///
/// The origin is where the drag started, so `width` and `height` are negative
/// when the pointer moved left or up. The rectangle may extend past the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRect {
    /// Horizontal drag origin.
    pub x: i64,
    /// Vertical drag origin.
    pub y: i64,
    /// Signed horizontal extent.
    pub width: i64,
    /// Signed vertical extent.
    pub height: i64,
}

impl RawRect {
    /// Create a raw rectangle.
    #[must_use]
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalize into a rectangle inside a `buf_w` x `buf_h` buffer.
    ///
    /// Negative extents are flipped so the origin becomes the minimum corner,
    /// sides are clamped to `[1, buf_w]` / `[1, buf_h]`, and the origin is then
    /// clamped so the rectangle ends inside the buffer.
    #[must_use]
    pub fn normalize(self, buf_w: u32, buf_h: u32) -> Rect {
        let (x, width) = normalize_axis(self.x, self.width, buf_w);
        let (y, height) = normalize_axis(self.y, self.height, buf_h);
        Rect::new(x, y, width, height)
    }
}

impl From<Rect> for RawRect {
    fn from(r: Rect) -> Self {
        Self::new(
            i64::from(r.x),
            i64::from(r.y),
            i64::from(r.width),
            i64::from(r.height),
        )
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn normalize_axis(origin: i64, extent: i64, limit: u32) -> (u32, u32) {
    let (origin, extent) = if extent < 0 {
        (origin.saturating_add(extent), extent.saturating_neg())
    } else {
        (origin, extent)
    };
    let limit = i64::from(limit.max(1));
    let extent = extent.clamp(1, limit);
    let origin = origin.clamp(0, limit - extent);
    // Both values now lie in [0, limit], which came from a u32.
    (origin as u32, extent as u32)
}

impl FromStr for RawRect {
    type Err = Error;

    /// Parse `"x,y,width,height"`.
    fn from_str(s: &str) -> Result<Self> {
        let [x, y, w, h] = split_four(s)?;
        let parse = |v: &str| {
            v.parse::<i64>().map_err(|e| Error::InvalidRegion {
                reason: format!("'{v}' in '{s}': {e}"),
            })
        };
        Ok(Self::new(parse(x)?, parse(y)?, parse(w)?, parse(h)?))
    }
}

/// A rectangle expressed in percent of the buffer dimensions (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentRect {
    /// Left edge, percent of width.
    pub x: f64,
    /// Top edge, percent of height.
    pub y: f64,
    /// Width, percent of width.
    pub width: f64,
    /// Height, percent of height.
    pub height: f64,
}

impl PercentRect {
    /// Create a percent rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert to pixels for a `buf_w` x `buf_h` buffer.
    ///
    /// Each coordinate is rounded half away from zero.
    #[must_use]
    pub fn to_raw(&self, buf_w: u32, buf_h: u32) -> RawRect {
        let w = f64::from(buf_w);
        let h = f64::from(buf_h);
        RawRect::new(
            percent_of(self.x, w),
            percent_of(self.y, h),
            percent_of(self.width, w),
            percent_of(self.height, h),
        )
    }
}

#[allow(clippy::cast_possible_truncation)]
fn percent_of(pct: f64, dim: f64) -> i64 {
    // `as` saturates and maps NaN to 0.
    (pct / 100.0 * dim).round() as i64
}

impl FromStr for PercentRect {
    type Err = Error;

    /// Parse `"x,y,width,height"`, each value optionally suffixed with `%`.
    fn from_str(s: &str) -> Result<Self> {
        let [x, y, w, h] = split_four(s)?;
        let parse = |v: &str| {
            let v = v.strip_suffix('%').unwrap_or(v).trim();
            match v.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(n),
                Ok(_) => Err(Error::InvalidRegion {
                    reason: format!("non-finite value '{v}' in '{s}'"),
                }),
                Err(e) => Err(Error::InvalidRegion {
                    reason: format!("'{v}' in '{s}': {e}"),
                }),
            }
        };
        Ok(Self::new(parse(x)?, parse(y)?, parse(w)?, parse(h)?))
    }
}

fn split_four(s: &str) -> Result<[&str; 4]> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    <[&str; 4]>::try_from(parts).map_err(|parts| Error::InvalidRegion {
        reason: format!(
            "expected 4 comma-separated values, got {} in '{s}'",
            parts.len()
        ),
    })
}

/// A user-designated area to fill.
///
/// Serialized externally tagged, e.g. `{"pixels": {"x": 10, ...}}` or
/// `{"percent": {"x": 80.0, ...}}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Absolute pixel rectangle (object eraser).
    Pixels(RawRect),
    /// Percent-of-dimension rectangle (watermark tool).
    Percent(PercentRect),
}

impl Region {
    /// Resolve to a normalized rectangle inside a `buf_w` x `buf_h` buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if the region has a zero extent or
    /// either normalized side is shorter than `min_size`.
    pub fn resolve(&self, buf_w: u32, buf_h: u32, min_size: u32) -> Result<Rect> {
        let raw = match self {
            Region::Pixels(r) => *r,
            Region::Percent(p) => p.to_raw(buf_w, buf_h),
        };
        if raw.width == 0 || raw.height == 0 {
            return Err(Error::InvalidRegion {
                reason: format!("zero extent ({}x{})", raw.width, raw.height),
            });
        }

        let rect = raw.normalize(buf_w, buf_h);
        if rect.width < min_size || rect.height < min_size {
            return Err(Error::InvalidRegion {
                reason: format!(
                    "{}x{} is below the {min_size}px minimum",
                    rect.width, rect.height
                ),
            });
        }
        Ok(rect)
    }
}

impl From<RawRect> for Region {
    fn from(r: RawRect) -> Self {
        Region::Pixels(r)
    }
}

impl From<Rect> for Region {
    fn from(r: Rect) -> Self {
        Region::Pixels(r.into())
    }
}

impl From<PercentRect> for Region {
    fn from(p: PercentRect) -> Self {
        Region::Percent(p)
    }
}
