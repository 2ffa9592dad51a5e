use clap::{Parser, Subcommand};
use clear_volume::tools::{
    analyze_image, bench_limit_from_env, dataset_iter, dataset_root_from_env, edge_stats,
    grayscale_stats, load_rgb, sample_every_from_env,
};
use clear_volume::utils::edges::{canny, gaussian_blur};
use clear_volume::utils::grayscale::frame_to_grayscale;
use clear_volume::{
    ChannelOrder, EstimatorConfig, Frame, FrameSampler, PipelineReport, VolumeEstimator,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "volumetool", version, about = "Bottle fluid volume CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate the fluid volume in a single image
    Estimate {
        #[arg(long)]
        image: PathBuf,
        /// JSON file overriding default thresholds
        #[arg(long)]
        config: Option<PathBuf>,
        /// Feed the pipeline BGR-ordered samples
        #[arg(long)]
        bgr: bool,
    },
    /// Print per-stage intermediate results for an image
    Diagnose {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run the pipeline over every image under a directory
    Batch {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        /// Process every Nth image
        #[arg(long)]
        every: Option<u64>,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Emit one JSON object per image
        #[arg(long)]
        json: bool,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Estimate { image, config, bgr } => estimate_cmd(&image, config.as_deref(), bgr),
        Command::Diagnose { image, config } => diagnose_cmd(&image, config.as_deref()),
        Command::Batch {
            root,
            limit,
            every,
            config,
            json,
        } => batch_cmd(root, limit, every, config.as_deref(), json),
    }
}

fn load_config(path: Option<&Path>) -> CliResult<EstimatorConfig> {
    match path {
        Some(path) => Ok(EstimatorConfig::from_json_file(path)?),
        None => Ok(EstimatorConfig::default()),
    }
}

fn swap_to_bgr(rgb: &[u8]) -> Vec<u8> {
    let mut bgr = rgb.to_vec();
    for px in bgr.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    bgr
}

fn estimate_cmd(image: &Path, config: Option<&Path>, bgr: bool) -> CliResult<()> {
    let estimator = VolumeEstimator::new(load_config(config)?);
    let rgb = load_rgb(image)?;
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);

    let swapped;
    let frame = if bgr {
        swapped = swap_to_bgr(rgb.as_raw());
        Frame::new(&swapped, width, height, ChannelOrder::Bgr)?
    } else {
        Frame::from_rgb_image(&rgb)?
    };

    println!("Image: {} ({}x{})", image.display(), width, height);
    match estimator.estimate(&frame) {
        Some(estimate) => println!("{}", serde_json::to_string_pretty(&estimate)?),
        None => println!("No bottle detected"),
    }
    Ok(())
}

fn diagnose_cmd(image: &Path, config: Option<&Path>) -> CliResult<()> {
    let config = load_config(config)?;
    let rgb = load_rgb(image)?;
    let frame = Frame::from_rgb_image(&rgb)?;
    println!("Image: {} ({}x{})", image.display(), frame.width(), frame.height());

    let gray = frame_to_grayscale(&frame);
    let stats = grayscale_stats(gray.as_raw());
    println!(
        "Grayscale range: {}-{}, average: {}",
        stats.min, stats.max, stats.avg
    );

    let locator = &config.locator;
    let edges = canny(
        &gaussian_blur(&gray, locator.blur_sigma),
        locator.canny_low,
        locator.canny_high,
    );
    let edge = edge_stats(&edges);
    println!(
        "Edges: edge_pixels={} total={} edge_ratio={:.2}%",
        edge.edge_pixels,
        edge.total_pixels,
        edge.edge_ratio * 100.0
    );

    let start = Instant::now();
    let report = VolumeEstimator::new(config).analyze(&frame);
    let elapsed = start.elapsed();

    match &report.detection {
        Some(d) => println!(
            "Bottle: region=({}, {}, {}x{}) confidence={:.2}",
            d.region.x, d.region.y, d.region.width, d.region.height, d.confidence
        ),
        None => println!("Bottle: none"),
    }
    if let Some(level) = &report.level {
        println!("Level: {:.3} via {:?}", level.level, level.source);
    }
    if let Some(volume) = &report.volume {
        match volume.volume {
            Some(ml) => println!("Volume: {:.1} mL confidence={:.2}", ml, volume.confidence),
            None => println!("Volume: unavailable"),
        }
    }
    println!("Pipeline time: {:.2}ms", elapsed.as_secs_f64() * 1000.0);
    Ok(())
}

fn batch_cmd(
    root: Option<PathBuf>,
    limit: Option<usize>,
    every: Option<u64>,
    config: Option<&Path>,
    json: bool,
) -> CliResult<()> {
    let root = root.unwrap_or_else(dataset_root_from_env);
    let limit = limit.or_else(bench_limit_from_env);
    let sampler = FrameSampler::new(every.unwrap_or_else(sample_every_from_env));
    let estimator = VolumeEstimator::new(load_config(config)?);

    let paths: Vec<PathBuf> = dataset_iter(&root, limit)
        .enumerate()
        .filter(|(n, _)| sampler.should_process(*n as u64))
        .map(|(_, path)| path)
        .collect();

    // Images are independent; results come back in path order
    let start = Instant::now();
    let reports: Vec<(PathBuf, PipelineReport)> = paths
        .into_par_iter()
        .filter_map(|path| match analyze_image(&estimator, &path) {
            Ok(report) => Some((path, report)),
            Err(err) => {
                warn!("skipping {}: {err}", path.display());
                None
            }
        })
        .collect();
    let total_time = start.elapsed().as_secs_f64();

    let processed = reports.len();
    let detected = reports.iter().filter(|(_, r)| r.detection.is_some()).count();

    for (path, report) in &reports {
        if json {
            let line = serde_json::json!({
                "image": path.display().to_string(),
                "report": report,
            });
            println!("{line}");
        } else {
            let volume = report
                .volume
                .as_ref()
                .and_then(|v| v.volume)
                .map(|ml| format!("{ml:.1} mL"))
                .unwrap_or_else(|| "-".to_string());
            println!("{}: {}", path.display(), volume);
        }
    }

    if processed == 0 {
        warn!("no images processed under {}", root.display());
        return Ok(());
    }
    info!(
        "processed {} images, {} with a bottle ({:.1}%), {:.2}ms wall per image",
        processed,
        detected,
        detected as f64 / processed as f64 * 100.0,
        total_time / processed as f64 * 1000.0
    );
    Ok(())
}
