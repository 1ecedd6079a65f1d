use anyhow::{Context, Result};
use clap::Parser;
use image::ImageReader;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use roicut::input::{load_input, page_name};
use roicut::{ExtractConfig, MergeConfig, RegionFilter, build_extraction_pipeline, export_regions};

#[derive(Parser)]
#[command(name = "roicut")]
#[command(about = "Extract figures and photos from scanned document pages")]
struct Cli {
    /// Directory of .png pages, or a single page image
    #[arg(short, long, value_name = "PATH")]
    path: PathBuf,

    /// Directory for extracted regions (defaults to the input directory)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Also save each page with the extracted regions outlined
    #[arg(short, long)]
    save_original: bool,

    /// Minimum enclosed area of a contour, in square pixels
    #[arg(long, default_value_t = 1500.0)]
    min_area: f64,

    /// Minimum width of an exported region
    #[arg(long, default_value_t = 50)]
    min_width: i32,

    /// Minimum height of an exported region
    #[arg(long, default_value_t = 50)]
    min_height: i32,

    /// Export a region even when it covers the whole page
    #[arg(long)]
    keep_full_page: bool,

    /// Merge boxes that only touch along an edge or corner
    #[arg(long)]
    merge_touching: bool,

    /// Skip pages producing more candidate boxes than this
    #[arg(long, default_value_t = 10_000)]
    max_boxes: usize,

    /// Save intermediate images under DIR/<page>/ (each page directory must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn extract_config(&self) -> ExtractConfig {
        ExtractConfig {
            min_contour_area: self.min_area,
            max_boxes: self.max_boxes,
            merge: MergeConfig {
                strict_overlap: !self.merge_touching,
            },
            filter: RegionFilter {
                min_width: self.min_width,
                min_height: self.min_height,
                exclude_full_page: !self.keep_full_page,
            },
            ..ExtractConfig::default()
        }
    }

    fn output_dir(&self) -> Result<PathBuf> {
        let dir = match &self.output {
            Some(dir) => dir.clone(),
            None if self.path.is_file() => self
                .path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
            None => self.path.clone(),
        };
        if !dir.is_dir() {
            anyhow::bail!("Output directory {} does not exist", dir.display());
        }
        Ok(dir)
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn process_page(cli: &Cli, config: &ExtractConfig, page: &Path, output_dir: &Path) -> Result<usize> {
    let name = page_name(page);

    let img = ImageReader::open(page)
        .with_context(|| format!("Failed to open {}", page.display()))?
        .decode()
        .with_context(|| format!("Failed to decode {}", page.display()))?;
    info!("{}: loaded {}x{}", name, img.width(), img.height());

    let mut pipeline = build_extraction_pipeline(config);
    if let Some(debug_dir) = &cli.debug_out {
        pipeline = pipeline.with_debug(debug_dir.join(&name))?;
    }

    let regions: Vec<_> = pipeline
        .run(img.clone())?
        .into_iter()
        .filter_map(|item| item.bbox)
        .collect();
    if regions.is_empty() {
        info!("{}: no significant region found", name);
    }

    let report = export_regions(&img, &name, &regions, output_dir, cli.save_original)?;
    Ok(report.regions.len())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.extract_config();
    let output_dir = cli.output_dir()?;
    info!("Output will be saved to {}", output_dir.display());

    let pages = load_input(&cli.path)?;
    info!("Found {} page(s) in {}", pages.len(), cli.path.display());

    let mut failed = 0;
    let mut exported = 0;
    for page in &pages {
        match process_page(&cli, &config, page, &output_dir) {
            Ok(count) => exported += count,
            Err(e) => {
                error!("{}: {:#}", page.display(), e);
                failed += 1;
            }
        }
    }

    info!("Exported {} region(s) from {} page(s)", exported, pages.len() - failed);
    if failed > 0 {
        anyhow::bail!("{} of {} page(s) failed", failed, pages.len());
    }
    Ok(())
}
