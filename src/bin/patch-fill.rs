use std::fmt;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use patch_fill::{
    default_output_path, Direction, EngineConfig, FillParams, PatchEngine, PercentRect,
    ProcessResult, RawRect, Region, MAX_PASSES, MIN_PASSES,
};

#[derive(Parser)]
#[command(
    name = "patch-fill",
    about = "Fill rectangular regions of an image with nearby content",
    version,
    after_help = "Examples:\n  \
                  patch-fill photo.jpg --rect 120,80,40,24\n  \
                  patch-fill shots/ -o cleaned/ --percent 82,89,15,8 -p 4\n\n\
                  Pixel rectangles may use negative sizes (drag up/left).\n\
                  Percent rectangles are relative to each image's size."
)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Output file or directory (default: {name}_filled.{ext})
    #[arg(short, long)]
    output: Option<String>,

    /// Pixel region as x,y,width,height (repeatable)
    #[arg(long = "rect", value_name = "X,Y,W,H")]
    rects: Vec<RawRect>,

    /// Percent region as x,y,width,height in 0-100 (repeatable)
    #[arg(long = "percent", value_name = "X,Y,W,H")]
    percents: Vec<PercentRect>,

    /// JSON file with {"regions": [...]} and optional parameter overrides
    #[arg(long)]
    regions: Option<PathBuf>,

    /// Number of fill passes (1-6)
    #[arg(short, long)]
    passes: Option<u8>,

    /// Feather radius in pixels (0-30, 0 disables)
    #[arg(short = 'r', long)]
    feather: Option<u32>,

    /// Source direction: auto, above (up, top), below (down, bottom), left, right
    #[arg(short, long)]
    direction: Option<Direction>,

    /// Skip regions with a side shorter than this many pixels
    #[arg(long, default_value = "6")]
    min_size: u32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

/// Contents of a `--regions` file.
#[derive(Deserialize)]
struct RegionFile {
    regions: Vec<Region>,
    pass_count: Option<u8>,
    feather_radius: Option<u32>,
    direction: Option<Direction>,
}

fn load_region_file(path: &Path) -> patch_fill::Result<RegionFile> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let file = match &cli.regions {
        Some(path) => match load_region_file(path) {
            Ok(f) => Some(f),
            Err(e) => {
                eprintln!("Error: Failed to read {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => None,
    };

    let mut regions: Vec<Region> = cli.rects.iter().copied().map(Region::from).collect();
    regions.extend(cli.percents.iter().copied().map(Region::from));
    if let Some(f) = &file {
        regions.extend(f.regions.iter().copied());
    }
    if regions.is_empty() {
        eprintln!("Error: No regions given (use --rect, --percent or --regions)");
        process::exit(1);
    }

    let defaults = FillParams::default();
    let params = FillParams {
        pass_count: cli
            .passes
            .or(file.as_ref().and_then(|f| f.pass_count))
            .unwrap_or(defaults.pass_count),
        feather_radius: cli
            .feather
            .or(file.as_ref().and_then(|f| f.feather_radius))
            .unwrap_or(defaults.feather_radius),
        direction: cli
            .direction
            .or(file.as_ref().and_then(|f| f.direction))
            .unwrap_or(defaults.direction),
    };
    if let Err(e) = params.validate() {
        eprintln!("Error: {e} (passes must be {MIN_PASSES}-{MAX_PASSES})");
        process::exit(1);
    }

    let engine =
        PatchEngine::with_config(EngineConfig::default().with_min_region_size(cli.min_size));

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    if !cli.quiet {
        eprintln!(
            "Filling {} region(s): {} pass(es), feather {}px, direction {}",
            regions.len(),
            params.pass_count,
            params.feather_radius,
            params.direction
        );
        eprintln!();
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &cli.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: patch-fill <input_dir> -o <output_dir> --percent X,Y,W,H");
            process::exit(1);
        };
        engine.process_directory(input_path, &output_dir, &regions, &params)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path),
        };
        vec![engine.process_file(input_path, &output_path, &regions, &params)]
    };

    for r in &results {
        print_result(r, cli.verbose, cli.quiet);
    }

    let summary = Summary::tally(&results);
    if results.len() > 1 && !cli.quiet {
        eprintln!();
        eprintln!("{summary}");
    }

    if summary.failed > 0 {
        process::exit(1);
    }
}

/// Per-outcome file counts for a batch.
#[derive(Default)]
struct Summary {
    filled: usize,
    skipped: usize,
    failed: usize,
}

impl Summary {
    fn tally(results: &[ProcessResult]) -> Self {
        results.iter().fold(Self::default(), |mut s, r| {
            if r.skipped {
                s.skipped += 1;
            } else if r.success {
                s.filled += 1;
            } else {
                s.failed += 1;
            }
            s
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Summary] Filled: {}", self.filled)?;
        if self.skipped > 0 {
            write!(f, ", Skipped: {}", self.skipped)?;
        }
        if self.failed > 0 {
            write!(f, ", Failed: {}", self.failed)?;
        }
        write!(f, " (Total: {})", self.filled + self.skipped + self.failed)
    }
}

fn print_result(result: &ProcessResult, verbose: bool, quiet: bool) {
    if quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.skipped {
        if !quiet {
            eprintln!("[SKIP] {filename}: {}", result.message);
        }
    } else if result.success {
        if !quiet {
            eprintln!("[OK] {filename} ({} region(s))", result.regions_filled);
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(success: bool, skipped: bool) -> ProcessResult {
        ProcessResult {
            path: PathBuf::from("a.png"),
            success,
            skipped,
            regions_filled: 0,
            message: String::new(),
        }
    }

    #[test]
    fn summary_counts_each_outcome() {
        let results = [
            result(true, false),
            result(true, false),
            result(true, true),
            result(false, false),
        ];
        let summary = Summary::tally(&results);
        assert_eq!((summary.filled, summary.skipped, summary.failed), (2, 1, 1));
        assert_eq!(
            summary.to_string(),
            "[Summary] Filled: 2, Skipped: 1, Failed: 1 (Total: 4)"
        );
        assert_eq!(
            Summary::tally(&results[..1]).to_string(),
            "[Summary] Filled: 1 (Total: 1)"
        );
    }

    #[test]
    fn region_file_errors_surface_as_crate_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.json");

        std::fs::write(&path, r#"{"regions": "nope"}"#).unwrap();
        assert!(matches!(
            load_region_file(&path),
            Err(patch_fill::Error::RegionFile(_))
        ));

        let json = r#"{
            "regions": [{"pixels": {"x": 1, "y": 2, "width": 10, "height": 10}}],
            "pass_count": 2
        }"#;
        std::fs::write(&path, json).unwrap();
        let file = load_region_file(&path).unwrap();
        assert_eq!(file.regions.len(), 1);
        assert_eq!(file.pass_count, Some(2));
        assert!(file.direction.is_none());

        assert!(matches!(
            load_region_file(&dir.path().join("missing.json")),
            Err(patch_fill::Error::Io(_))
        ));
    }
}
