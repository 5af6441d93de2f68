//! simplot - Render simulation results from JSON parameter files
//!
//! Reads the drawing parameters of one plot kind from a JSON file, draws the
//! figure and saves it (and optionally opens it in the system viewer).

use anyhow::{Context, Result};
use clap::Parser;
use simplot::plotter::SaveFig;
use simplot::style::StyleOverrides;
use simplot::{FigureOptions, PlotKind, PlotterConfig, PlotterOptions};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "simplot")]
#[command(about = "Render simulation results (rasters, traces, histograms)", long_about = None)]
struct Args {
    /// Plot kind: scatter, line, lines or histogram
    kind: PlotKind,

    /// JSON file with the drawing parameters
    data: PathBuf,

    /// JSON file with finishing options (title, legend, scalebar, ...)
    #[arg(long)]
    options: Option<PathBuf>,

    /// JSON file with style overrides, e.g. {"font.size": 12}
    #[arg(long)]
    style: Option<PathBuf>,

    /// JSON plotter configuration (default file name, directory, type)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file name
    #[arg(long)]
    out: Option<String>,

    /// Output directory
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Output file type: png, jpg, jpeg, bmp or svg
    #[arg(long = "type")]
    file_type: Option<String>,

    /// Description appended to the file name (defaults to the plot kind)
    #[arg(long)]
    desc: Option<String>,

    /// Keep existing files by numbering new ones
    #[arg(long)]
    no_overwrite: bool,

    /// Open the figure in the system viewer
    #[arg(long)]
    show: bool,

    /// Write logs to the specified file instead of stderr
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_deref())?;

    let config = match &args.config {
        Some(path) => PlotterConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PlotterConfig::default(),
    };

    let style: StyleOverrides = match &args.style {
        Some(path) => read_json(path)?,
        None => StyleOverrides::new(),
    };

    let mut opts: FigureOptions = match &args.options {
        Some(path) => read_json(path)?,
        None => FigureOptions::default(),
    };
    if opts.save_fig.is_none() {
        opts.save_fig = Some(SaveFig::Enabled(true));
    }
    opts.file_name = args.out.or(opts.file_name);
    opts.file_dir = args.dir.or(opts.file_dir);
    opts.file_type = args.file_type.or(opts.file_type);
    opts.file_desc = args.desc.or(opts.file_desc);
    opts.overwrite = opts.overwrite && !args.no_overwrite;
    opts.show_fig |= args.show;

    let options = PlotterOptions {
        style,
        config,
        ..PlotterOptions::default()
    };

    let output = simplot::plot(args.kind, args.data.as_path(), options, &opts)
        .with_context(|| format!("Failed to plot {}", args.data.display()))?;

    if let Some(path) = output.file_name {
        println!("{}", path.display());
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Log to `log_path` at debug level, or to stderr filtered by `SIMPLOT_LOG`.
fn init_logging(log_path: Option<&Path>) -> Result<()> {
    match log_path {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("debug"))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
            tracing::info!("Starting simplot");
        }
        None => {
            let filter = EnvFilter::try_from_env("SIMPLOT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
