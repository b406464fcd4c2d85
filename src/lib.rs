//! Region-based content-aware patch fill.
//!
//! Marks one or more rectangles on an image and replaces their content with
//! pixels sampled from a nearby same-size rectangle, softening the seam with a
//! feathered blur. The select/paste/feather cycle repeats for a configurable
//! number of passes, each working on the previous pass's output, to wear down
//! whatever structure survives a single paste. It drives both watermark removal
//! (percent regions that scale with the image) and object erasing (pixel
//! regions drawn at image resolution).
//!
//! This is a purely spatial heuristic. There is no semantic model of the scene.
//!
//! # Quick Start
//!
//! ```no_run
//! use patch_fill::{Direction, FillParams, PatchEngine, PercentRect, Region};
//!
//! let engine = PatchEngine::new();
//! let img = image::open("photo.jpg").unwrap().to_rgba8();
//! // Bottom-right corner watermark, 15% x 8% of the image.
//! let regions = [Region::Percent(PercentRect::new(82.0, 89.0, 15.0, 8.0))];
//! let params = FillParams::new(3, 6, Direction::Auto).unwrap();
//! let filled = engine.apply(&img, &regions, &params).unwrap();
//! filled.save("cleaned.png").unwrap();
//! ```
//!
//! # Stepping
//!
//! [`PatchEngine::start`] returns a [`FillRun`] that can be advanced one pass
//! at a time, e.g. to show progress:
//!
//! ```no_run
//! use patch_fill::{FillParams, PatchEngine, Rect, Region, RunState};
//!
//! let engine = PatchEngine::new();
//! let img = image::open("photo.png").unwrap().to_rgba8();
//! let regions = [Region::from(Rect::new(120, 80, 40, 24))];
//! let mut run = engine.start(&img, &regions, &FillParams::default()).unwrap();
//! while run.step().unwrap() != RunState::Done {}
//! let (filled, report) = run.finish().unwrap();
//! println!("{} selections", report.selections.len());
//! # let _ = filled;
//! ```

#![deny(missing_docs)]

pub mod compositor;
mod engine;
pub mod error;
pub mod feather;
pub mod rect;
pub mod selector;

pub use compositor::Resample;
pub use engine::{
    default_output_path, encode, is_supported_image, save_image, ApplyReport, EngineConfig,
    FillParams, FillRun, PatchEngine, ProcessResult, RunState, Selection, MAX_PASSES, MIN_PASSES,
};
pub use error::{Error, Result};
pub use rect::{PercentRect, RawRect, Rect, Region};
pub use selector::{Direction, SelectorConfig};
