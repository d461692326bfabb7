// this_file: crates/vgfit-optim/src/session.rs

//! The fitting session: forward, loss, backward, update, repeat.

use crate::adam::Adam;
use std::path::PathBuf;
use vgfit_core::{FitConfig, RenderSurface, Result, Rgba, TargetImage};
use vgfit_render::{mse, mse_grad, render_backward, Renderer, SceneGrads};
use vgfit_scene::{random_scene, Scene};

/// Summary of a finished fitting run.
#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub final_loss: f32,
    pub iterations: usize,
}

/// Owns the scene, target, and optimizer state for one fitting run.
pub struct FitSession {
    scene: Scene,
    target: TargetImage,
    config: FitConfig,
    renderer: Renderer,
    point_opt: Adam,
    color_opt: Adam,
    loss_history: Vec<f32>,
    last_frame: Vec<f32>,
    snapshot_dir: Option<PathBuf>,
}

impl FitSession {
    /// Initialize a random scene over the target canvas.
    pub fn new(target: TargetImage, config: FitConfig, background: Rgba) -> Result<Self> {
        config.validate()?;

        let scene = random_scene(
            target.width(),
            target.height(),
            config.paths,
            config.segments,
            config.seed,
            background,
        );
        let renderer = Renderer::new(config.render)?;
        let point_opt = Adam::new(config.point_lr, scene.num_points() * 2);
        let color_opt = Adam::new(config.color_lr, scene.num_shapes() * 4);
        let loss_history = Vec::with_capacity(config.iters);

        Ok(Self {
            scene,
            target,
            config,
            renderer,
            point_opt,
            color_opt,
            loss_history,
            last_frame: Vec::new(),
            snapshot_dir: None,
        })
    }

    /// Resume from an existing scene (dimensions must match the target).
    pub fn with_scene(target: TargetImage, config: FitConfig, scene: Scene) -> Result<Self> {
        config.validate()?;
        scene.validate()?;
        if scene.width != target.width() || scene.height != target.height() {
            return Err(vgfit_core::Error::config(format!(
                "scene canvas {}x{} does not match target {}x{}",
                scene.width,
                scene.height,
                target.width(),
                target.height()
            )));
        }
        let renderer = Renderer::new(config.render)?;
        let point_opt = Adam::new(config.point_lr, scene.num_points() * 2);
        let color_opt = Adam::new(config.color_lr, scene.num_shapes() * 4);
        let loss_history = Vec::with_capacity(config.iters);
        Ok(Self {
            scene,
            target,
            config,
            renderer,
            point_opt,
            color_opt,
            loss_history,
            last_frame: Vec::new(),
            snapshot_dir: None,
        })
    }

    /// Directory for intermediate PNG snapshots.
    pub fn set_snapshot_dir(&mut self, dir: PathBuf) {
        self.snapshot_dir = Some(dir);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    pub fn loss_history(&self) -> &[f32] {
        &self.loss_history
    }

    /// One optimization iteration; returns the pre-step loss.
    pub fn step(&mut self) -> Result<f32> {
        let rendered = self.renderer.render(&self.scene)?;
        let loss = mse(&rendered, self.target.pixels())?;
        let d_pixels = mse_grad(&rendered, self.target.pixels())?;
        let grads = render_backward(&self.scene, self.renderer.config(), &d_pixels)?;
        self.apply(&grads)?;
        self.scene.clamp_colors();

        self.last_frame = rendered;
        self.loss_history.push(loss);
        Ok(loss)
    }

    /// Run the configured number of iterations.
    pub fn run(&mut self) -> Result<FitOutcome> {
        let iters = self.config.iters;
        let mut loss = f32::INFINITY;
        for iter in 0..iters {
            loss = self.step()?;

            if self.config.log_every > 0 && iter % self.config.log_every == 0 {
                log::info!(
                    target: "vgfit::fit",
                    "iteration {iter}/{iters} loss={loss:.6}"
                );
            }
            if self.config.snapshot_every > 0 && iter % self.config.snapshot_every == 0 {
                self.write_snapshot(iter)?;
            }
        }
        log::debug!(target: "vgfit::fit", "finished {iters} iterations, loss={loss:.6}");
        Ok(FitOutcome {
            final_loss: loss,
            iterations: iters,
        })
    }

    /// Step both optimizers from a gradient set.
    fn apply(&mut self, grads: &SceneGrads) -> Result<()> {
        let mut point_params = pack_points(&self.scene);
        let point_grads = pack_point_grads(grads);
        self.point_opt.step(&mut point_params, &point_grads)?;
        unpack_points(&mut self.scene, &point_params);

        let mut color_params = pack_colors(&self.scene);
        let color_grads: Vec<f32> = grads.colors.iter().flatten().copied().collect();
        self.color_opt.step(&mut color_params, &color_grads)?;
        unpack_colors(&mut self.scene, &color_params);
        Ok(())
    }

    fn write_snapshot(&self, iter: usize) -> Result<()> {
        let Some(dir) = &self.snapshot_dir else {
            return Ok(());
        };
        if self.last_frame.is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(dir)?;
        let surface = RenderSurface::from_rgb_f32(
            self.scene.width,
            self.scene.height,
            &self.last_frame,
        );
        let path = dir.join(format!("iter_{iter:06}.png"));
        surface.write_png(&path)?;
        log::debug!(target: "vgfit::fit", "wrote snapshot {}", path.display());
        Ok(())
    }
}

fn pack_points(scene: &Scene) -> Vec<f32> {
    let mut out = Vec::with_capacity(scene.num_points() * 2);
    for shape in &scene.shapes {
        for p in shape.path.points() {
            out.push(p.x);
            out.push(p.y);
        }
    }
    out
}

fn pack_point_grads(grads: &SceneGrads) -> Vec<f32> {
    let mut out = Vec::new();
    for shape_grads in &grads.points {
        for g in shape_grads {
            out.push(g.x);
            out.push(g.y);
        }
    }
    out
}

fn unpack_points(scene: &mut Scene, params: &[f32]) {
    let mut it = params.iter();
    for shape in &mut scene.shapes {
        for p in shape.path.points_mut() {
            // Lengths match by construction of pack_points.
            p.x = *it.next().expect("point parameter count mismatch");
            p.y = *it.next().expect("point parameter count mismatch");
        }
    }
}

fn pack_colors(scene: &Scene) -> Vec<f32> {
    let mut out = Vec::with_capacity(scene.num_shapes() * 4);
    for shape in &scene.shapes {
        out.extend_from_slice(&[
            shape.fill.r,
            shape.fill.g,
            shape.fill.b,
            shape.fill.a,
        ]);
    }
    out
}

fn unpack_colors(scene: &mut Scene, params: &[f32]) {
    for (shape, chunk) in scene.shapes.iter_mut().zip(params.chunks_exact(4)) {
        shape.fill = Rgba::new(chunk[0], chunk[1], chunk[2], chunk[3]);
    }
}
