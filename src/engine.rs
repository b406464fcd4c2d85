//! Multi-pass fill engine.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace, warn};

use crate::compositor::{self, Resample};
use crate::error::{Error, Result};
use crate::feather::{self, DEFAULT_FEATHER_ALPHA, MAX_FEATHER_RADIUS};
use crate::rect::{Rect, Region, DEFAULT_MIN_REGION_SIZE};
use crate::selector::{self, Direction, SelectorConfig};

/// Fewest passes accepted per apply.
pub const MIN_PASSES: u8 = 1;
/// Most passes accepted per apply.
pub const MAX_PASSES: u8 = 6;

/// Per-call fill parameters, frozen for the duration of one apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillParams {
    /// Number of select/composite/feather passes (1-6).
    pub pass_count: u8,
    /// Feather blur radius in pixels (0-30, 0 disables feathering).
    pub feather_radius: u32,
    /// Where to sample replacement pixels from.
    pub direction: Direction,
}

impl Default for FillParams {
    fn default() -> Self {
        Self {
            pass_count: 3,
            feather_radius: 6,
            direction: Direction::Auto,
        }
    }
}

impl FillParams {
    /// Create validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameters`] if a value is out of range.
    pub fn new(pass_count: u8, feather_radius: u32, direction: Direction) -> Result<Self> {
        let params = Self {
            pass_count,
            feather_radius,
            direction,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check that every value is within its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameters`] naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_PASSES..=MAX_PASSES).contains(&self.pass_count) {
            return Err(Error::InvalidParameters(format!(
                "pass count {} outside {MIN_PASSES}..={MAX_PASSES}",
                self.pass_count
            )));
        }
        if self.feather_radius > MAX_FEATHER_RADIUS {
            return Err(Error::InvalidParameters(format!(
                "feather radius {} exceeds {MAX_FEATHER_RADIUS}px",
                self.feather_radius
            )));
        }
        Ok(())
    }
}

/// Engine-wide tunables.
///
/// The defaults reproduce the behaviour of the watermark and eraser tools; none
/// of them is known to be optimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Candidate construction and scoring.
    pub selector: SelectorConfig,
    /// Opacity of the feather blur composite.
    pub feather_alpha: f32,
    /// Regions with a normalized side shorter than this are skipped.
    pub min_region_size: u32,
    /// Filter used if a source and target ever differ in size.
    pub resample: Resample,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            selector: SelectorConfig::default(),
            feather_alpha: DEFAULT_FEATHER_ALPHA,
            min_region_size: DEFAULT_MIN_REGION_SIZE,
            resample: Resample::default(),
        }
    }
}

impl EngineConfig {
    /// Replace the selector tunables.
    #[must_use]
    pub fn with_selector(mut self, selector: SelectorConfig) -> Self {
        self.selector = selector;
        self
    }

    /// Set the feather opacity, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_feather_alpha(mut self, alpha: f32) -> Self {
        self.feather_alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Set the minimum region side.
    #[must_use]
    pub fn with_min_region_size(mut self, size: u32) -> Self {
        self.min_region_size = size.max(1);
        self
    }

    /// Set the resampling filter.
    #[must_use]
    pub fn with_resample(mut self, resample: Resample) -> Self {
        self.resample = resample;
        self
    }
}

/// Progress of a [`FillRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Prepared, no pass has run yet.
    Idle,
    /// `pass` passes have completed and more remain.
    Running {
        /// Number of completed passes.
        pass: u8,
    },
    /// All passes completed.
    Done,
    /// A step failed during `pass`; the buffer is discarded.
    Failed {
        /// The pass that failed.
        pass: u8,
    },
}

/// The donor chosen for one region in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Pass number, starting at 1.
    pub pass: u8,
    /// Index into the resolved target list.
    pub region: usize,
    /// The rectangle being filled.
    pub target: Rect,
    /// The rectangle its pixels came from.
    pub source: Rect,
}

/// Summary of a completed fill.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyReport {
    /// Final state, always [`RunState::Done`] for a returned report.
    pub state: RunState,
    /// Resolved target rectangles in processing order.
    pub targets: Vec<Rect>,
    /// Regions dropped as degenerate.
    pub skipped_regions: usize,
    /// Passes actually run.
    pub passes_run: u8,
    /// Every donor choice, in processing order.
    pub selections: Vec<Selection>,
}

/// One in-flight fill: `Idle -> Running -> Done`, or `Failed` on the first error.
///
/// Obtained from [`PatchEngine::start`]. Each [`step`](FillRun::step) runs one
/// full pass over every region. The caller's image is never touched; the run
/// works on its own copy and only hands it back once every pass succeeded.
#[derive(Debug)]
pub struct FillRun<'a> {
    config: &'a EngineConfig,
    params: FillParams,
    targets: Vec<Rect>,
    skipped_regions: usize,
    buffer: RgbaImage,
    state: RunState,
    passes_run: u8,
    selections: Vec<Selection>,
}

impl FillRun<'_> {
    /// Current state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Resolved targets in processing order.
    #[must_use]
    pub fn targets(&self) -> &[Rect] {
        &self.targets
    }

    /// Run the next pass.
    ///
    /// Stepping a run that is already `Done` or `Failed` does nothing and
    /// returns the current state.
    ///
    /// # Errors
    ///
    /// Propagates the first compositing error; the run moves to
    /// [`RunState::Failed`] and cannot be resumed.
    pub fn step(&mut self) -> Result<RunState> {
        if matches!(self.state, RunState::Done | RunState::Failed { .. }) {
            return Ok(self.state);
        }

        let pass = self.passes_run + 1;
        let _span = debug_span!("pass", pass).entered();

        if let Err(e) = self.run_pass(pass) {
            self.state = RunState::Failed { pass };
            warn!(pass, error = %e, "fill failed, discarding partial result");
            return Err(e);
        }

        self.passes_run = pass;
        self.state = if pass >= self.params.pass_count {
            RunState::Done
        } else {
            RunState::Running { pass }
        };
        debug!(state = ?self.state, "pass complete");
        Ok(self.state)
    }

    fn run_pass(&mut self, pass: u8) -> Result<()> {
        let (width, height) = self.buffer.dimensions();
        let mut snapshot = self.buffer.clone();
        let last = self.targets.len().saturating_sub(1);

        for (index, &target) in self.targets.iter().enumerate() {
            let source = selector::select_source(
                target,
                width,
                height,
                self.params.direction,
                &self.config.selector,
            );
            trace!(region = index, %target, %source, "selected source");

            compositor::blit(&snapshot, source, target, &mut self.buffer, self.config.resample)?;
            feather::feather(
                &mut self.buffer,
                target,
                self.params.feather_radius,
                self.config.feather_alpha,
            );

            // Later regions in this pass sample the patched pixels.
            if index < last {
                compositor::blit(&self.buffer, target, target, &mut snapshot, Resample::Nearest)?;
            }

            self.selections.push(Selection {
                pass,
                region: index,
                target,
                source,
            });
        }
        Ok(())
    }

    /// Run every remaining pass and return the filled image with its report.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing pass, or [`Error::Aborted`] if the run
    /// had already failed. No partial image is returned.
    pub fn finish(mut self) -> Result<(RgbaImage, ApplyReport)> {
        loop {
            match self.state {
                RunState::Done => break,
                RunState::Failed { pass } => return Err(Error::Aborted { pass }),
                RunState::Idle | RunState::Running { .. } => {
                    self.step()?;
                }
            }
        }

        let report = ApplyReport {
            state: self.state,
            passes_run: self.passes_run,
            targets: self.targets,
            skipped_regions: self.skipped_regions,
            selections: self.selections,
        };
        Ok((self.buffer, report))
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Whether the file was skipped (no usable region).
    pub skipped: bool,
    /// Number of regions filled.
    pub regions_filled: usize,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            success: false,
            skipped: false,
            regions_filled: 0,
            message: String::new(),
        }
    }
}

/// The patch-fill engine.
///
/// Holds only immutable tunables, so one engine can serve any number of calls
/// (including concurrent ones on different images).
#[derive(Debug, Clone, Default)]
pub struct PatchEngine {
    config: EngineConfig,
}

impl PatchEngine {
    /// Create an engine with default tunables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom tunables.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The engine's tunables.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve regions for a `width` x `height` buffer, dropping degenerate ones.
    ///
    /// Returns the usable targets in input order and the number dropped.
    #[must_use]
    pub fn resolve_regions(
        &self,
        regions: &[Region],
        width: u32,
        height: u32,
    ) -> (Vec<Rect>, usize) {
        let mut skipped = 0;
        let targets: Vec<Rect> = regions
            .iter()
            .enumerate()
            .filter_map(
                |(index, region)| match region.resolve(width, height, self.config.min_region_size) {
                    Ok(rect) => Some(rect),
                    Err(e) => {
                        warn!(region = index, error = %e, "skipping region");
                        skipped += 1;
                        None
                    }
                },
            )
            .collect();
        (targets, skipped)
    }

    /// Resolve regions strictly: every region must be usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRegions`] for an empty list, or the first region's
    /// [`Error::InvalidRegion`].
    pub fn prepare_regions(
        &self,
        regions: &[Region],
        width: u32,
        height: u32,
    ) -> Result<Vec<Rect>> {
        if regions.is_empty() {
            return Err(Error::NoRegions);
        }
        regions
            .iter()
            .map(|r| r.resolve(width, height, self.config.min_region_size))
            .collect()
    }

    /// Prepare a fill run without executing any pass.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameters`] for out-of-range parameters or
    /// [`Error::SurfaceUnavailable`] for an empty image.
    pub fn start(
        &self,
        image: &RgbaImage,
        regions: &[Region],
        params: &FillParams,
    ) -> Result<FillRun<'_>> {
        params.validate()?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::SurfaceUnavailable { width, height });
        }

        let (targets, skipped_regions) = self.resolve_regions(regions, width, height);
        debug!(
            width,
            height,
            regions = targets.len(),
            skipped = skipped_regions,
            passes = params.pass_count,
            feather = params.feather_radius,
            direction = %params.direction,
            "starting fill"
        );

        // With nothing to fill the run is complete before it starts.
        let state = if targets.is_empty() {
            RunState::Done
        } else {
            RunState::Idle
        };

        Ok(FillRun {
            config: &self.config,
            params: *params,
            targets,
            skipped_regions,
            buffer: image.clone(),
            state,
            passes_run: 0,
            selections: Vec::new(),
        })
    }

    /// Fill `regions` of `image` and return the result.
    ///
    /// The input is never modified. Degenerate regions are skipped; if none
    /// remain the result is an unchanged copy.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start) and [`FillRun::finish`].
    pub fn apply(
        &self,
        image: &RgbaImage,
        regions: &[Region],
        params: &FillParams,
    ) -> Result<RgbaImage> {
        self.apply_with_report(image, regions, params).map(|(img, _)| img)
    }

    /// Like [`apply`](Self::apply), also returning what was done.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start) and [`FillRun::finish`].
    pub fn apply_with_report(
        &self,
        image: &RgbaImage,
        regions: &[Region],
        params: &FillParams,
    ) -> Result<(RgbaImage, ApplyReport)> {
        self.start(image, regions, params)?.finish()
    }

    /// Process a single image file: load, fill, save.
    ///
    /// Every call starts from the decoded file, never from an earlier output.
    #[must_use]
    pub fn process_file(
        &self,
        input: &Path,
        output: &Path,
        regions: &[Region],
        params: &FillParams,
    ) -> ProcessResult {
        let mut result = ProcessResult::new(input);

        let image = match image::open(input) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                result.message = format!("Failed to load: {e}");
                return result;
            }
        };

        let (filled, report) = match self.apply_with_report(&image, regions, params) {
            Ok(out) => out,
            Err(e) => {
                result.message = format!("Fill failed: {e}");
                return result;
            }
        };

        if report.targets.is_empty() {
            result.skipped = true;
            result.success = true;
            result.message = format!(
                "No usable region for {}x{} image ({} skipped)",
                image.width(),
                image.height(),
                report.skipped_regions
            );
            return result;
        }

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    result.message = format!("Failed to create output directory: {e}");
                    return result;
                }
            }
        }

        match save_image(&filled, output) {
            Ok(()) => {
                result.success = true;
                result.regions_filled = report.targets.len();
                result.message = format!(
                    "Filled {} region(s) in {} pass(es)",
                    report.targets.len(),
                    report.passes_run
                );
            }
            Err(e) => {
                result.message = format!("Failed to save: {e}");
            }
        }

        result
    }

    /// Process all supported images in a directory with the same regions.
    ///
    /// Percent regions scale with each image. Files run in parallel when the
    /// `cli` feature is enabled (via rayon).
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        regions: &[Region],
        params: &FillParams,
    ) -> Vec<ProcessResult> {
        let entries: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| is_supported_image(p))
                .collect(),
            Err(e) => {
                let mut result = ProcessResult::new(input_dir);
                result.message = format!("Failed to read directory: {e}");
                return vec![result];
            }
        };

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                let mut result = ProcessResult::new(output_dir);
                result.message = format!("Failed to create output directory: {e}");
                return vec![result];
            }
        }

        let run = |input: &PathBuf| {
            let output = output_dir.join(input.file_name().unwrap_or_default());
            self.process_file(input, &output, regions, params)
        };

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            entries.par_iter().map(run).collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            entries.iter().map(run).collect()
        }
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

/// Encode a filled image into an in-memory byte blob.
///
/// JPEG is written at quality 100 without alpha; PNG, WebP and BMP keep RGBA.
///
/// # Errors
///
/// Returns an error if the format is unsupported or encoding fails.
pub fn encode(img: &RgbaImage, format: ImageFormat) -> Result<Vec<u8>> {
    let dyn_img = DynamicImage::ImageRgba8(img.clone());
    let mut bytes = Cursor::new(Vec::new());

    match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel.
            let rgb = dyn_img.to_rgb8();
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, 100);
            encoder.encode_image(&rgb)?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp => {
            dyn_img.write_to(&mut bytes, format)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(bytes.into_inner())
}

/// Save a filled image with format-specific settings chosen from the extension.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;
    let bytes = encode(img, format)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_filled.jpg"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input.extension().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_filled.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::{PercentRect, RawRect};
    use image::Rgba;

    #[allow(clippy::cast_possible_truncation)]
    fn noise(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            let v = x.wrapping_mul(2_654_435_761).wrapping_add(y.wrapping_mul(40_503));
            Rgba([(v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8, 255])
        })
    }

    #[test]
    fn params_reject_out_of_range_values() {
        assert!(FillParams::new(0, 4, Direction::Auto).is_err());
        assert!(FillParams::new(7, 4, Direction::Auto).is_err());
        assert!(FillParams::new(3, 31, Direction::Auto).is_err());
        assert!(FillParams::new(6, 30, Direction::Left).is_ok());
        assert!(FillParams::default().validate().is_ok());
    }

    #[test]
    fn run_walks_idle_running_done() {
        let engine = PatchEngine::new();
        let img = noise(64, 64);
        let regions = [Region::from(Rect::new(20, 20, 12, 12))];
        let params = FillParams::new(2, 0, Direction::Right).unwrap();

        let mut run = engine.start(&img, &regions, &params).unwrap();
        assert_eq!(run.state(), RunState::Idle);
        assert_eq!(run.step().unwrap(), RunState::Running { pass: 1 });
        assert_eq!(run.step().unwrap(), RunState::Done);
        assert_eq!(run.step().unwrap(), RunState::Done);

        let (_, report) = run.finish().unwrap();
        assert_eq!(report.passes_run, 2);
        assert_eq!(report.selections.len(), 2);
    }

    #[test]
    fn failed_pass_stops_the_run() {
        let engine = PatchEngine::new();
        let img = noise(64, 64);
        let regions = [Region::from(Rect::new(20, 20, 12, 12))];
        let params = FillParams::new(3, 4, Direction::Right).unwrap();

        let mut run = engine.start(&img, &regions, &params).unwrap();
        // Resolution never yields this; force a target hanging off the buffer.
        run.targets = vec![Rect::new(60, 60, 20, 20)];

        let err = run.step().unwrap_err();
        assert!(matches!(err, Error::RegionOutOfBounds { .. }));
        assert_eq!(run.state(), RunState::Failed { pass: 1 });
        assert!(run.selections.is_empty());

        assert_eq!(run.step().unwrap(), RunState::Failed { pass: 1 });
        assert_eq!(run.passes_run, 0);

        let err = run.finish().unwrap_err();
        assert!(matches!(err, Error::Aborted { pass: 1 }));
    }

    #[test]
    fn empty_region_list_is_nothing_to_do() {
        let engine = PatchEngine::new();
        let img = noise(32, 32);
        let (out, report) = engine
            .apply_with_report(&img, &[], &FillParams::default())
            .unwrap();
        assert_eq!(out, img);
        assert_eq!(report.passes_run, 0);
        assert_eq!(report.state, RunState::Done);
        assert!(report.targets.is_empty());
    }

    #[test]
    fn degenerate_regions_are_skipped() {
        let engine = PatchEngine::new();
        let img = noise(64, 64);
        let regions = [
            Region::Pixels(RawRect::new(5, 5, 2, 30)),
            Region::Pixels(RawRect::new(30, 30, 10, 10)),
        ];
        let (_, report) = engine
            .apply_with_report(&img, &regions, &FillParams::default())
            .unwrap();
        assert_eq!(report.skipped_regions, 1);
        assert_eq!(report.targets, vec![Rect::new(30, 30, 10, 10)]);
    }

    #[test]
    fn prepare_regions_is_strict() {
        let engine = PatchEngine::new();
        assert!(matches!(engine.prepare_regions(&[], 10, 10), Err(Error::NoRegions)));
        let bad = [Region::Pixels(RawRect::new(0, 0, 3, 3))];
        assert!(matches!(
            engine.prepare_regions(&bad, 100, 100),
            Err(Error::InvalidRegion { .. })
        ));
        let good = [Region::Percent(PercentRect::new(10.0, 10.0, 20.0, 20.0))];
        assert_eq!(
            engine.prepare_regions(&good, 100, 100).unwrap(),
            vec![Rect::new(10, 10, 20, 20)]
        );
    }

    #[test]
    fn empty_image_is_surface_unavailable() {
        let engine = PatchEngine::new();
        let img = RgbaImage::new(0, 10);
        let err = engine
            .apply(&img, &[Region::from(Rect::new(0, 0, 8, 8))], &FillParams::default())
            .unwrap_err();
        assert!(matches!(err, Error::SurfaceUnavailable { width: 0, height: 10 }));
    }

    #[test]
    fn single_pass_without_feather_is_a_plain_copy() {
        let engine = PatchEngine::new();
        let img = noise(100, 100);
        let target = Rect::new(10, 10, 20, 20);
        let params = FillParams::new(1, 0, Direction::Right).unwrap();
        let out = engine.apply(&img, &[Region::from(target)], &params).unwrap();

        // gap = max(2, round(2.4)) = 2, so the donor starts at x = 32.
        for dy in 0..20 {
            for dx in 0..20 {
                assert_eq!(out.get_pixel(10 + dx, 10 + dy), img.get_pixel(32 + dx, 10 + dy));
            }
        }
        assert_eq!(out.get_pixel(9, 9), img.get_pixel(9, 9));
    }

    #[test]
    fn input_image_is_not_modified() {
        let engine = PatchEngine::new();
        let img = noise(50, 50);
        let copy = img.clone();
        let _ = engine
            .apply(&img, &[Region::from(Rect::new(10, 10, 10, 10))], &FillParams::default())
            .unwrap();
        assert_eq!(img, copy);
    }

    #[test]
    fn config_builders_clamp() {
        let cfg = EngineConfig::default()
            .with_feather_alpha(3.0)
            .with_min_region_size(0)
            .with_resample(Resample::Nearest);
        assert!((cfg.feather_alpha - 1.0).abs() < f32::EPSILON);
        assert_eq!(cfg.min_region_size, 1);
        assert_eq!(cfg.resample, Resample::Nearest);
    }

    #[test]
    fn encode_png_and_jpeg() {
        let img = noise(16, 16);
        let png = encode(&img, ImageFormat::Png).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, img);

        let jpeg = encode(&img, ImageFormat::Jpeg).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        assert!(matches!(
            encode(&img, ImageFormat::Gif),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn default_output_path_appends_filled_suffix() {
        let p = default_output_path(Path::new("/tmp/photo.jpg"));
        assert_eq!(p, PathBuf::from("/tmp/photo_filled.jpg"));

        let p = default_output_path(Path::new("image.png"));
        assert_eq!(p.file_name().unwrap().to_str().unwrap(), "image_filled.png");
    }

    #[test]
    fn is_supported_image_accepts_common_formats() {
        assert!(is_supported_image(Path::new("photo.jpg")));
        assert!(is_supported_image(Path::new("photo.JPEG")));
        assert!(is_supported_image(Path::new("photo.png")));
        assert!(is_supported_image(Path::new("photo.webp")));
        assert!(is_supported_image(Path::new("photo.bmp")));
        assert!(!is_supported_image(Path::new("photo.gif")));
        assert!(!is_supported_image(Path::new("photo")));
    }
}
