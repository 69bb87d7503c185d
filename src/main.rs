use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use gridcover::{
    batch::{self, BatchOptions, OnError},
    common_cell_sizes, debug, report,
    resolver::{CellSizeResolver, FixedCellSize, TerminalPrompt},
    score_image, Partition, ScoreConfig, DEFAULT_CELL_SIZE_PX, DEFAULT_GRID_SIZE,
    DEFAULT_PIXEL_THRESHOLD_PCT, DEFAULT_THRESHOLD_PCT,
};
use image::GenericImageView;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Score image coverage on a grid of cells")]
struct Cli {
    /// Log scoring details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every image in a folder and write a CSV report
    Score {
        /// Folder containing the images
        folder: PathBuf,
        #[command(flatten)]
        grid: GridArgs,
        /// Report path (default: results_<grid>_<threshold>.csv inside the folder)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Save each annotated image into this directory
        #[arg(long)]
        overlay_dir: Option<PathBuf>,
        /// Skip images that fail instead of aborting the run
        #[arg(long)]
        keep_going: bool,
    },
    /// Score a single image and save its grid overlay
    Preview {
        image: PathBuf,
        #[command(flatten)]
        grid: GridArgs,
        /// Where to write the annotated image
        #[arg(short, long, default_value = "preview_grid.png")]
        output: PathBuf,
    },
    /// List the cell sizes that evenly divide an image
    Divisors { image: PathBuf },
}

#[derive(Args, Debug)]
struct GridArgs {
    /// Number of rows and columns (count-based grid)
    #[arg(short, long, conflicts_with_all = ["cell_size", "prompt_cell_size"])]
    grid_size: Option<u32>,
    /// Cell side in pixels; must divide both image dimensions
    #[arg(short, long, conflicts_with = "prompt_cell_size")]
    cell_size: Option<u32>,
    /// Ask for the cell size, listing the valid choices
    #[arg(long)]
    prompt_cell_size: bool,
    /// Minimum foreground percentage for a cell to count
    /// (default: 25 for grid counts, 50 for pixel cells)
    #[arg(short, long)]
    threshold: Option<f64>,
    /// Exclusion mask: black keeps the image, anything else is ignored
    #[arg(short, long)]
    mask: Option<PathBuf>,
}

impl GridArgs {
    fn pixel_based(&self) -> bool {
        self.cell_size.is_some() || self.prompt_cell_size
    }

    /// Builds the scoring config, resolving pixel cell sizes against `reference`.
    fn config(&self, reference: &Path) -> Result<ScoreConfig> {
        if !self.pixel_based() {
            let n = self.grid_size.unwrap_or(DEFAULT_GRID_SIZE);
            return Ok(ScoreConfig::new(
                Partition::Count(n),
                self.threshold.unwrap_or(DEFAULT_THRESHOLD_PCT),
            ));
        }

        let (width, height) = batch::load_image(reference)?.dimensions();
        let size = match self.cell_size {
            Some(size) => FixedCellSize(size).resolve_for(width, height, DEFAULT_CELL_SIZE_PX)?,
            None => {
                TerminalPrompt::stdio().resolve_for(width, height, DEFAULT_CELL_SIZE_PX)?
            }
        };
        Ok(ScoreConfig::new(
            Partition::CellSize(size),
            self.threshold.unwrap_or(DEFAULT_PIXEL_THRESHOLD_PCT),
        ))
    }

    fn load_mask(&self) -> Result<Option<image::DynamicImage>> {
        self.mask
            .as_deref()
            .map(|path| batch::load_image(path).context("Failed to open mask"))
            .transpose()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Score {
            folder,
            grid,
            output,
            overlay_dir,
            keep_going,
        } => run_score(&folder, &grid, output, overlay_dir, keep_going),
        Command::Preview {
            image,
            grid,
            output,
        } => run_preview(&image, &grid, &output),
        Command::Divisors { image } => {
            let (width, height) = batch::load_image(&image)?.dimensions();
            let sizes: Vec<String> = common_cell_sizes(width, height)
                .iter()
                .map(u32::to_string)
                .collect();
            println!("{width}x{height}: {}", sizes.join(", "));
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "gridcover=debug" } else { "gridcover=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_score(
    folder: &Path,
    grid: &GridArgs,
    output: Option<PathBuf>,
    overlay_dir: Option<PathBuf>,
    keep_going: bool,
) -> Result<()> {
    if !folder.is_dir() {
        bail!("Images folder does not exist: {}", folder.display());
    }
    let images = batch::list_images(folder)?;
    let config = grid.config(&images[0])?;

    let mut options = BatchOptions::new(config).with_on_error(if keep_going {
        OnError::Skip
    } else {
        OnError::Abort
    });
    options.mask = grid.load_mask()?;
    options.overlay_dir = overlay_dir;

    let outcome = batch::score_images(&images, &options)
        .with_context(|| format!("Failed to score images in {}", folder.display()))?;

    let report_path = output.unwrap_or_else(|| folder.join(report::report_file_name(&config)));
    report::save_csv(&report_path, &outcome.rows)
        .with_context(|| format!("Failed to write report {}", report_path.display()))?;

    print!("{}", report::render_summary(&config, &outcome.rows));
    for skipped in &outcome.skipped {
        eprintln!("Skipped {}: {}", skipped.path.display(), skipped.error);
    }
    println!("\nResults saved to {}", report_path.display());
    Ok(())
}

fn run_preview(image_path: &Path, grid: &GridArgs, output: &Path) -> Result<()> {
    let config = grid.config(image_path)?;
    let image = batch::load_image(image_path)?;
    let mask = grid.load_mask()?;

    let scored = score_image(&image, &config, mask.as_ref())?;
    debug::save_annotated(&scored, output)?;

    println!("Normalised Value: {:.1}", scored.score);
    println!("Overlay saved to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn grid_args(args: &[&str]) -> GridArgs {
        let argv = ["gridcover", "score", "scans"]
            .into_iter()
            .chain(args.iter().copied());
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Score { grid, .. } => grid,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test_case(&[] => (Partition::Count(10), 25.0); "defaults")]
    #[test_case(&["--grid-size", "4"] => (Partition::Count(4), 25.0); "grid size only")]
    #[test_case(&["-g", "4", "-t", "60"] => (Partition::Count(4), 60.0); "explicit threshold")]
    fn test_count_mode_defaults(args: &[&str]) -> (Partition, f64) {
        // Count mode never opens the reference image
        let config = grid_args(args).config(Path::new("missing.png")).unwrap();
        (config.partition, config.threshold_pct)
    }

    #[test]
    fn test_pixel_mode_defaults_to_higher_threshold() {
        let reference = std::env::temp_dir().join("gridcover_test_cli_reference.png");
        image::GrayImage::new(100, 100).save(&reference).unwrap();

        let config = grid_args(&["--cell-size", "25"]).config(&reference).unwrap();
        let overridden = grid_args(&["-c", "25", "-t", "10"])
            .config(&reference)
            .unwrap();
        std::fs::remove_file(&reference).unwrap();

        assert_eq!(config.partition, Partition::CellSize(25));
        assert_eq!(config.threshold_pct, DEFAULT_PIXEL_THRESHOLD_PCT);
        assert_eq!(overridden.threshold_pct, 10.0);
    }

    #[test]
    fn test_grid_size_conflicts_with_cell_size() {
        let argv = ["gridcover", "score", "scans", "-g", "4", "-c", "25"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
