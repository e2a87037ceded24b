use std::path::PathBuf;

use anyhow::Context as _;

use crate::{
    core::{self, FrameIndex, FrameRange},
    error::{RaybatchError, RaybatchResult},
    ini::{self, IniTemplate},
    invoke::{FrameOutcome, Renderer},
    mutate::{FrameMutator, MutateSpec, MutateTargets},
    scene::SceneDoc,
};

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub scene_path: PathBuf,
    /// Where per-frame scene JSON files land.
    pub frames_dir: PathBuf,
    /// Where per-frame ini files land.
    pub ini_dir: PathBuf,
    /// Where the renderer is asked to write its PNGs.
    pub out_dir: PathBuf,
    /// `None` means emit files only, never invoke a renderer.
    pub renderer: Option<Renderer>,
    /// Number of frames; indices run 0..frames-1.
    pub frames: u64,
    pub seed: u64,
    pub spec: MutateSpec,
    pub targets: MutateTargets,
    pub template: IniTemplate,
}

impl RunConfig {
    pub fn validate(&self) -> RaybatchResult<()> {
        if self.frames == 0 {
            return Err(RaybatchError::validation("frame count must be non-zero"));
        }
        if !self.scene_path.is_file() {
            return Err(RaybatchError::validation(format!(
                "scene file '{}' does not exist",
                self.scene_path.display()
            )));
        }
        self.template.validate()
    }

    pub fn range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.frames),
        }
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<FrameOutcome>,
}

impl RunReport {
    pub fn failed(&self) -> impl Iterator<Item = &FrameOutcome> {
        self.outcomes.iter().filter(|o| !o.status.is_ok())
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.failed_count() == self.outcomes.len()
    }
}

/// Runs the whole batch: load the scene once, then fully sequentially per
/// frame write `frame<N>.json`, advance the mutator, write `frame<N>.ini`,
/// and invoke the renderer. Frame N completes before N+1 begins.
///
/// Frame 0's scene file is the unmutated input; frame N reflects the
/// cumulative effect of the N applies before it.
///
/// Render failures are collected into the report and the batch continues;
/// the run itself errors only when every invocation failed.
#[tracing::instrument(skip(cfg))]
pub fn run(cfg: &RunConfig) -> RaybatchResult<RunReport> {
    cfg.validate()?;

    for dir in [&cfg.frames_dir, &cfg.ini_dir, &cfg.out_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output directory '{}'", dir.display()))?;
    }

    let mut scene = SceneDoc::load(&cfg.scene_path)?;
    let mut mutator = FrameMutator::new(cfg.spec.clone(), cfg.targets.clone(), cfg.seed);
    let mut report = RunReport::default();

    for frame in cfg.range().iter() {
        let scene_path = cfg.frames_dir.join(core::scene_file_name(frame));
        tracing::info!(frame = frame.0, path = %scene_path.display(), "writing frame scene");
        scene.save(&scene_path)?;
        mutator.apply(&mut scene, frame)?;

        let ini_path = cfg.ini_dir.join(core::ini_file_name(frame));
        let out_path = cfg.out_dir.join(core::image_file_name(frame));
        ini::write_ini(&ini_path, &cfg.template.render(&scene_path, &out_path))?;

        if let Some(renderer) = &cfg.renderer {
            tracing::info!(frame = frame.0, ini = %ini_path.display(), "invoking renderer");
            report.outcomes.push(renderer.render(frame, &ini_path));
        }
    }

    if report.all_failed() {
        return Err(RaybatchError::render(format!(
            "all {} render invocations failed",
            report.outcomes.len()
        )));
    }

    Ok(report)
}
