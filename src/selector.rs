//! Candidate source selection.
//!
//! For a target rectangle the selector proposes four same-size donors, one per
//! cardinal direction, each pushed away from the target by the target's own
//! extent plus a small gap so that pixels bleeding from the target edge are not
//! sampled. In [`Direction::Auto`] mode the donors are ranked by
//!
//! `score = distance(center, target_center) - overlap_penalty * overlap / area(target)`
//!
//! and the highest score wins. Ties resolve to the first candidate in
//! [`Direction::CANDIDATES`] order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Error;
use crate::rect::Rect;

/// Default gap, as a fraction of the target's shorter side.
pub const DEFAULT_GAP_RATIO: f64 = 0.12;
/// Default lower bound on the gap, in pixels.
pub const DEFAULT_MIN_GAP: u32 = 2;
/// Default weight applied to the overlap fraction when scoring.
pub const DEFAULT_OVERLAP_PENALTY: f64 = 400.0;

/// Where to look for replacement pixels relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Score all four neighbours and take the best.
    #[default]
    Auto,
    /// Sample from the area above the target.
    Above,
    /// Sample from the area below the target.
    Below,
    /// Sample from the area left of the target.
    Left,
    /// Sample from the area right of the target.
    Right,
}

impl Direction {
    /// Explicit directions in tie-break order.
    pub const CANDIDATES: [Direction; 4] = [
        Direction::Above,
        Direction::Below,
        Direction::Left,
        Direction::Right,
    ];

    /// Lowercase name as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Auto => "auto",
            Direction::Above => "above",
            Direction::Below => "below",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the names from [`Direction::as_str`], plus `up`/`top` for
/// `above` and `down`/`bottom` for `below`.
impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Direction::Auto),
            "above" | "up" | "top" => Ok(Direction::Above),
            "below" | "down" | "bottom" => Ok(Direction::Below),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(Error::InvalidParameters(format!(
                "unknown direction '{other}' (expected auto, above, below, left or right)"
            ))),
        }
    }
}

/// Tunables for candidate construction and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Gap between target and candidate, as a fraction of the target's shorter side.
    pub gap_ratio: f64,
    /// Minimum gap in pixels.
    pub min_gap: u32,
    /// Weight of the overlap fraction in the auto score.
    pub overlap_penalty: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            gap_ratio: DEFAULT_GAP_RATIO,
            min_gap: DEFAULT_MIN_GAP,
            overlap_penalty: DEFAULT_OVERLAP_PENALTY,
        }
    }
}

impl SelectorConfig {
    /// Gap used for `target`: `max(min_gap, round(min(w, h) * gap_ratio))`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn gap_for(&self, target: &Rect) -> u32 {
        let short = f64::from(target.width.min(target.height));
        // Negative or NaN ratios collapse to 0 through the saturating cast.
        let scaled = (short * self.gap_ratio).round() as u32;
        scaled.max(self.min_gap)
    }
}

/// Build the clamped candidate for one explicit direction.
///
/// `Direction::Auto` has no candidate of its own and yields the target itself.
#[must_use]
pub fn candidate(
    target: Rect,
    buf_w: u32,
    buf_h: u32,
    direction: Direction,
    config: &SelectorConfig,
) -> Rect {
    let gap = i64::from(config.gap_for(&target));
    let (x, y) = (i64::from(target.x), i64::from(target.y));
    let step_x = i64::from(target.width) + gap;
    let step_y = i64::from(target.height) + gap;

    let (cx, cy) = match direction {
        Direction::Auto => (x, y),
        Direction::Above => (x, y - step_y),
        Direction::Below => (x, y + step_y),
        Direction::Left => (x - step_x, y),
        Direction::Right => (x + step_x, y),
    };

    Rect::new(
        clamp_origin(cx, target.width, buf_w),
        clamp_origin(cy, target.height, buf_h),
        target.width,
        target.height,
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_origin(origin: i64, extent: u32, limit: u32) -> u32 {
    let max = i64::from(limit.saturating_sub(extent));
    origin.clamp(0, max) as u32
}

/// All four clamped candidates, in [`Direction::CANDIDATES`] order.
#[must_use]
pub fn candidates(
    target: Rect,
    buf_w: u32,
    buf_h: u32,
    config: &SelectorConfig,
) -> [(Direction, Rect); 4] {
    Direction::CANDIDATES.map(|d| (d, candidate(target, buf_w, buf_h, d, config)))
}

/// Auto-mode score of `candidate` for `target`. Higher is better.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score(candidate: &Rect, target: &Rect, config: &SelectorConfig) -> f64 {
    let (cx, cy) = candidate.center();
    let (tx, ty) = target.center();
    let distance = (cx - tx).hypot(cy - ty);

    let area = target.area();
    let overlap_fraction = if area == 0 {
        0.0
    } else {
        candidate.overlap_area(target) as f64 / area as f64
    };

    distance - config.overlap_penalty * overlap_fraction
}

/// Pick the donor rectangle for `target`.
///
/// The result always has the target's size and lies inside the buffer, as long
/// as `target` itself does. This never fails: when the buffer is too small for
/// any candidate to move off the target, the `Right` candidate is returned.
#[must_use]
pub fn select_source(
    target: Rect,
    buf_w: u32,
    buf_h: u32,
    direction: Direction,
    config: &SelectorConfig,
) -> Rect {
    if direction != Direction::Auto {
        return candidate(target, buf_w, buf_h, direction, config);
    }

    let all = candidates(target, buf_w, buf_h, config);
    if all.iter().all(|(_, c)| *c == target) {
        trace!(%target, "no candidate moves off the target, using right");
        return all[3].1;
    }

    let mut best: Option<(Direction, Rect, f64)> = None;
    for (dir, rect) in all {
        let s = score(&rect, &target, config);
        trace!(%target, direction = %dir, candidate = %rect, score = s, "scored candidate");
        // Strict comparison keeps the first-seen candidate on ties.
        if best.is_none_or(|(_, _, b)| s > b) {
            best = Some((dir, rect, s));
        }
    }

    match best {
        Some((_, rect, _)) => rect,
        None => all[3].1,
    }
}
