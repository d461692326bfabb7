// this_file: src/lib.rs

//! vgfit: gradient-based raster-to-vector fitting.
//!
//! Loads a raster image, initializes a set of random filled Bezier paths,
//! optimizes their control points and colors against a pixel MSE with an
//! in-process differentiable rasterizer, and serializes the result as SVG.
//!
//! ## Architecture
//!
//! - **vgfit-core**: errors, configuration, target images, PNG surfaces
//! - **vgfit-scene**: scene model, Bezier geometry, seeded initialization
//! - **vgfit-render**: forward rasterizer, loss, backward gradients
//! - **vgfit-optim**: Adam and the fitting session
//! - **vgfit-svg**: SVG serialization
//!
//! ## Example
//!
//! ```rust,no_run
//! use vgfit::{FitRequest, run_fit};
//! use vgfit_core::FitConfig;
//!
//! let request = FitRequest {
//!     input: "photo.jpg".into(),
//!     output: "photo.svg".into(),
//!     config: FitConfig { paths: 64, iters: 200, ..FitConfig::default() },
//!     ..FitRequest::default()
//! };
//! let report = run_fit(&request)?;
//! println!("final loss: {}", report.loss);
//! # Ok::<(), vgfit_core::Error>(())
//! ```

use camino::Utf8PathBuf;
use serde::Serialize;
use std::time::Instant;
use vgfit_core::{parse_color, FitConfig, RenderSurface, Result, Rgba, TargetImage};
use vgfit_optim::FitSession;
use vgfit_render::Renderer;
use vgfit_scene::{random_scene, FillRule, Scene};
use vgfit_svg::SvgWriter;

pub use vgfit_core::{Error, RenderConfig};

/// Everything needed for one fitting run.
#[derive(Debug, Clone)]
pub struct FitRequest {
    /// Input raster image
    pub input: Utf8PathBuf,
    /// Output SVG path
    pub output: Utf8PathBuf,
    /// Fitting configuration
    pub config: FitConfig,
    /// Canvas background color
    pub background: Rgba,
    /// Fill rule applied to every path
    pub fill_rule: FillRule,
    /// Directory for intermediate PNG snapshots
    pub snapshot_dir: Option<Utf8PathBuf>,
    /// Also write the fitted scene as JSON next to the SVG
    pub dump_scene: bool,
    /// SVG coordinate precision (decimal places)
    pub precision: usize,
}

impl Default for FitRequest {
    fn default() -> Self {
        Self {
            input: Utf8PathBuf::new(),
            output: Utf8PathBuf::new(),
            config: FitConfig::default(),
            background: Rgba::WHITE,
            fill_rule: FillRule::default(),
            snapshot_dir: None,
            dump_scene: false,
            precision: 2,
        }
    }
}

/// Canvas dimensions after preprocessing.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CanvasInfo {
    pub width: u32,
    pub height: u32,
}

/// Wall-clock timing of the pipeline stages.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimingInfo {
    /// Image load + scene initialization (milliseconds)
    pub prepare_ms: f64,
    /// Optimization loop (milliseconds)
    pub fit_ms: f64,
    /// Total time (milliseconds)
    pub total_ms: f64,
}

/// Final status report, printed as one JSON line by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    /// Always "success" when the pipeline completed
    pub status: String,
    /// Output SVG path
    pub output: Utf8PathBuf,
    /// Final MSE loss
    pub loss: f32,
    /// Iterations performed
    pub iterations: usize,
    /// Number of fitted paths
    pub paths: usize,
    /// Canvas dimensions
    pub canvas: CanvasInfo,
    /// Stage timings
    pub timing: TimingInfo,
}

/// Run the whole pipeline: load, fit, serialize, report.
pub fn run_fit(request: &FitRequest) -> Result<FitReport> {
    let total_start = Instant::now();
    request.config.validate()?;
    log::debug!(target: "vgfit::fit", "config: {:?}", request.config);

    let target = TargetImage::load(request.input.as_std_path(), request.config.size)?;
    let (width, height) = (target.width(), target.height());
    log::info!(
        target: "vgfit::fit",
        "target ready: {}x{} ({} paths, {} iterations)",
        width,
        height,
        request.config.paths,
        request.config.iters
    );

    let mut scene = random_scene(
        width,
        height,
        request.config.paths,
        request.config.segments,
        request.config.seed,
        request.background,
    );
    scene.fill_rule = request.fill_rule;

    let mut session = FitSession::with_scene(target, request.config.clone(), scene)?;
    if let Some(dir) = &request.snapshot_dir {
        session.set_snapshot_dir(dir.as_std_path().to_path_buf());
    }
    let prepare_ms = total_start.elapsed().as_secs_f64() * 1000.0;

    let fit_start = Instant::now();
    let outcome = session.run()?;
    let fit_ms = fit_start.elapsed().as_secs_f64() * 1000.0;

    let scene = session.into_scene();
    write_outputs(request, &scene)?;

    Ok(FitReport {
        status: "success".to_string(),
        output: request.output.clone(),
        loss: outcome.final_loss,
        iterations: outcome.iterations,
        paths: scene.num_shapes(),
        canvas: CanvasInfo { width, height },
        timing: TimingInfo {
            prepare_ms,
            fit_ms,
            total_ms: total_start.elapsed().as_secs_f64() * 1000.0,
        },
    })
}

fn write_outputs(request: &FitRequest, scene: &Scene) -> Result<()> {
    let svg = SvgWriter::new(request.precision).render(scene);
    std::fs::write(request.output.as_std_path(), svg)?;
    log::info!(target: "vgfit::fit", "wrote {}", request.output);

    if request.dump_scene {
        let scene_path = request.output.with_extension("json");
        let json = serde_json::to_string_pretty(scene)?;
        std::fs::write(scene_path.as_std_path(), json)?;
        log::info!(target: "vgfit::fit", "wrote {}", scene_path);
    }
    Ok(())
}

/// Rasterize a previously dumped scene JSON to a PNG (the `render` command).
pub fn render_scene_file(
    scene_path: &Utf8PathBuf,
    output: &Utf8PathBuf,
    config: RenderConfig,
) -> Result<CanvasInfo> {
    let json = std::fs::read_to_string(scene_path.as_std_path())?;
    let scene: Scene = serde_json::from_str(&json)?;
    scene.validate()?;

    let renderer = Renderer::new(config)?;
    let pixels = renderer.render(&scene)?;
    let surface = RenderSurface::from_rgb_f32(scene.width, scene.height, &pixels);
    surface.write_png(output.as_std_path())?;

    Ok(CanvasInfo {
        width: scene.width,
        height: scene.height,
    })
}

/// Parse a CLI background specification.
pub fn parse_background(value: &str) -> Result<Rgba> {
    parse_color(value)
}
