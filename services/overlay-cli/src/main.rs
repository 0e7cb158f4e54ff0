//! Threshold overlay renderer.
//!
//! Composites a highlight over every pixel of a base satellite image whose
//! anomaly intensity reaches a threshold, with:
//! - Bounded output resolution for quick redraws
//! - Threshold suggestion from the intensity distribution
//! - Optional heatmap and JSON coverage report

mod config;
mod report;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use compositor::{heatmap, stats};
use overlay_session::{
    acquire_pair, codec, FileLoader, MemoryLoader, RedrawOutcome, RedrawRequest, RedrawScheduler,
    SourcePair,
};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::{load_config, Overrides};
use report::RenderReport;

#[derive(Parser, Debug)]
#[command(name = "overlay")]
#[command(about = "Highlight anomalous pixels of a satellite image")]
struct Args {
    /// Base ("after") color image
    base: PathBuf,

    /// Anomaly intensity image (grayscale, 0-255)
    intensity: PathBuf,

    /// Composite output path (format follows the extension)
    #[arg(short, long, default_value = "overlay.png")]
    output: PathBuf,

    /// Normalized threshold in [0, 1] (default: suggested from the intensity image)
    #[arg(short, long, env = "OVERLAY_THRESHOLD")]
    threshold: Option<f64>,

    /// Highlight opacity in [0, 1]
    #[arg(long)]
    opacity: Option<f64>,

    /// Maximum output width/height in pixels
    #[arg(long)]
    max_dimension: Option<u32>,

    /// Intensity resampling: flattened or geometric
    #[arg(long)]
    resample_mode: Option<String>,

    /// Also write a heatmap rendering of the intensity image
    #[arg(long)]
    heatmap: Option<PathBuf>,

    /// Write a JSON report with coverage statistics
    #[arg(long)]
    report: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, env = "OVERLAY_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_tracing(&args.log_level, args.json_logs)?;

    let overrides = Overrides {
        max_dimension: args.max_dimension,
        opacity: args.opacity,
        resample_mode: args.resample_mode.clone(),
    };
    let config = load_config(args.config.as_deref(), &overrides)?;

    let base_ref = args.base.to_string_lossy().into_owned();
    let intensity_ref = args.intensity.to_string_lossy().into_owned();

    // Decode both sources once; the scheduler serves them from memory
    let SourcePair { base, intensity } = acquire_pair(&FileLoader::new(), &base_ref, &intensity_ref)
        .await
        .context("Failed to load source images")?;

    let (threshold, threshold_suggested) = match args.threshold {
        Some(threshold) => (threshold, false),
        None => {
            let suggested = stats::suggest_threshold(&intensity)?;
            info!(threshold = suggested, "Using suggested threshold");
            (suggested, true)
        }
    };

    let requested = config.params(threshold, args.opacity);
    let params = requested.clamped();
    if params != requested {
        warn!(
            threshold = requested.threshold,
            opacity = requested.opacity,
            "Clamped threshold/opacity into [0, 1]"
        );
    }

    // Source-resolution outputs, taken before the intensity raster moves
    let coverage = match &args.report {
        Some(_) => Some(stats::coverage(&intensity, params.threshold)?),
        None => None,
    };
    let rendered_heatmap = match &args.heatmap {
        Some(_) => Some(heatmap::render_heatmap(&intensity)?),
        None => None,
    };

    let loader = MemoryLoader::new()
        .with(base_ref.clone(), base)
        .with(intensity_ref.clone(), intensity);
    let scheduler = RedrawScheduler::with_highlight(loader, config.highlight);
    let handle = scheduler.submit(RedrawRequest::new(base_ref.clone(), intensity_ref.clone(), params))?;
    let frame = match handle.wait().await? {
        RedrawOutcome::Delivered(frame) => frame,
        RedrawOutcome::Superseded => bail!("Redraw was superseded before delivery"),
    };

    codec::save(frame.result.raster(), &args.output)
        .with_context(|| format!("Failed to write composite: {}", args.output.display()))?;
    info!(
        path = %args.output.display(),
        width = frame.result.width(),
        height = frame.result.height(),
        anomalous_pct = frame.result.anomalous_percent(),
        "Wrote composite"
    );

    if let (Some(path), Some(rendered)) = (&args.heatmap, &rendered_heatmap) {
        codec::save(rendered, path)
            .with_context(|| format!("Failed to write heatmap: {}", path.display()))?;
        info!(path = %path.display(), "Wrote heatmap");
    }

    if let (Some(path), Some(coverage)) = (&args.report, coverage) {
        let report = RenderReport::new(
            base_ref,
            intensity_ref,
            args.output.display().to_string(),
            params,
            threshold_suggested,
            &frame.result,
            coverage,
        );
        tokio::fs::write(path, report.to_json()?)
            .await
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        info!(path = %path.display(), "Wrote report");
    }

    Ok(())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}
