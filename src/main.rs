// this_file: src/main.rs

//! vgfit CLI: fit vector paths to a raster image and emit SVG.
//!
//! The `fit` command runs the whole pipeline and prints a single-line JSON
//! report on stdout; failures print a JSON error object on stderr and exit
//! non-zero, so callers can script against the output.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use vgfit::{parse_background, render_scene_file, run_fit, FitRequest, RenderConfig};
use vgfit_core::FitConfig;
use vgfit_scene::FillRule;

/// vgfit: gradient-based raster-to-vector fitting
#[derive(Parser)]
#[command(name = "vgfit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit Bezier paths to an input image and write an SVG
    Fit {
        /// Input raster image (PNG, JPEG, ...)
        input: Utf8PathBuf,

        /// Output SVG path
        output: Utf8PathBuf,

        /// Number of paths to fit (more = more detail)
        #[arg(long, default_value = "128")]
        paths: usize,

        /// Cubic segments per path
        #[arg(long, default_value = "1")]
        segments: usize,

        /// Optimization iterations (more = better fit)
        #[arg(long, default_value = "500")]
        iters: usize,

        /// Canvas size the image is downscaled to fit
        #[arg(long, default_value = "256")]
        size: u32,

        /// Initialization seed
        #[arg(long, default_value = "4")]
        seed: u64,

        /// Adam learning rate for control points (pixels)
        #[arg(long, default_value = "1.0")]
        point_lr: f32,

        /// Adam learning rate for fill colors
        #[arg(long, default_value = "0.01")]
        color_lr: f32,

        /// Subpixel samples per axis
        #[arg(long, default_value = "2")]
        samples: u32,

        /// Antialias radius in pixels
        #[arg(long, default_value = "1.0")]
        aa_radius: f32,

        /// Background color (hex or 'transparent')
        #[arg(long, default_value = "#ffffff")]
        background: String,

        /// Fill rule: 'nonzero' or 'evenodd'
        #[arg(long, default_value = "nonzero")]
        fill_rule: FillRule,

        /// Log the loss every N iterations (0 disables)
        #[arg(long, default_value = "50")]
        log_every: usize,

        /// Write an intermediate PNG every N iterations (0 disables)
        #[arg(long, default_value = "0")]
        snapshot_every: usize,

        /// Directory for intermediate PNGs (defaults next to the output)
        #[arg(long)]
        snapshot_dir: Option<Utf8PathBuf>,

        /// Also write the fitted scene as JSON next to the SVG
        #[arg(long)]
        dump_scene: bool,

        /// SVG coordinate precision (decimal places)
        #[arg(long, default_value = "2")]
        precision: usize,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Rasterize a dumped scene JSON to a PNG for inspection
    Render {
        /// Scene JSON produced by `fit --dump-scene`
        scene: Utf8PathBuf,

        /// Output PNG path
        output: Utf8PathBuf,

        /// Subpixel samples per axis
        #[arg(long, default_value = "2")]
        samples: u32,

        /// Antialias radius in pixels
        #[arg(long, default_value = "1.0")]
        aa_radius: f32,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fit {
            input,
            output,
            paths,
            segments,
            iters,
            size,
            seed,
            point_lr,
            color_lr,
            samples,
            aa_radius,
            background,
            fill_rule,
            log_every,
            snapshot_every,
            snapshot_dir,
            dump_scene,
            precision,
            verbose,
        } => {
            init_logging(verbose);

            let result = parse_background(&background).and_then(|background| {
                let snapshot_dir = if snapshot_every > 0 {
                    Some(snapshot_dir.unwrap_or_else(|| {
                        output
                            .parent()
                            .map(|p| p.to_path_buf())
                            .unwrap_or_default()
                    }))
                } else {
                    None
                };
                let request = FitRequest {
                    input,
                    output,
                    config: FitConfig {
                        paths,
                        segments,
                        iters,
                        size,
                        seed,
                        point_lr,
                        color_lr,
                        log_every,
                        snapshot_every,
                        render: RenderConfig { samples, aa_radius },
                    },
                    background,
                    fill_rule,
                    snapshot_dir,
                    dump_scene,
                    precision,
                };
                run_fit(&request)
            });

            match result {
                Ok(report) => {
                    // Single-line JSON report for scripting.
                    match serde_json::to_string(&report) {
                        Ok(json) => println!("{json}"),
                        Err(e) => exit_with_error(&e.to_string()),
                    }
                }
                Err(e) => exit_with_error(&e.to_string()),
            }
        }

        Commands::Render {
            scene,
            output,
            samples,
            aa_radius,
            verbose,
        } => {
            init_logging(verbose);
            match render_scene_file(&scene, &output, RenderConfig { samples, aa_radius }) {
                Ok(info) => {
                    println!(
                        r#"{{"status":"success","output":"{}","width":{},"height":{}}}"#,
                        output, info.width, info.height
                    );
                }
                Err(e) => exit_with_error(&e.to_string()),
            }
        }

        Commands::Version => {
            println!("vgfit {}", env!("CARGO_PKG_VERSION"));
            println!("Gradient-based raster-to-vector fitting");
        }
    }
}

/// Initialize logging based on verbosity.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

/// Print a JSON error object on stderr and exit non-zero.
fn exit_with_error(message: &str) -> ! {
    let payload = serde_json::json!({
        "status": "error",
        "error": message,
    });
    eprintln!("{payload}");
    std::process::exit(1);
}
