//! Rendering both eyes of one or many scenes, optionally on a rayon pool.
//!
//! Scenes are validated once up front; the per-eye renders that follow skip the re-check.

use rayon::prelude::*;

use crate::{
    foundation::error::{StereoError, StereoResult},
    foundation::grid::Grid,
    render::compose::{DotStats, Eye, StereoScene, render_eye_validated},
};

/// Left and right canvases of one scene.
#[derive(Clone, Debug, PartialEq)]
pub struct StereoPair {
    pub left: Grid<u32>,
    pub right: Grid<u32>,
    /// Dot counts; identical for both eyes.
    pub stats: DotStats,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct RenderThreading {
    pub parallel: bool,
    /// Worker count; `None` lets rayon decide.
    pub threads: Option<usize>,
}

/// Render both eyes of `scene`.
///
/// The eyes share only read-only inputs, so with `threading.parallel` they are rendered on two
/// rayon tasks. The result is identical either way.
#[tracing::instrument(skip(scene), fields(dots = scene.dot_positions.len()))]
pub fn render_pair(scene: &StereoScene, threading: &RenderThreading) -> StereoResult<StereoPair> {
    scene.validate()?;

    if !threading.parallel {
        return render_pair_sequential(scene);
    }

    let pool = build_thread_pool(threading.threads)?;
    let (left, right) = pool.install(|| {
        rayon::join(
            || render_eye_validated(scene, Eye::Left),
            || render_eye_validated(scene, Eye::Right),
        )
    });
    let (left, stats) = left?;
    let (right, _) = right?;
    Ok(StereoPair { left, right, stats })
}

/// Render both eyes of every scene; output order follows `scenes`.
///
/// Every scene is validated before any is rendered.
#[tracing::instrument(skip(scenes), fields(scenes = scenes.len()))]
pub fn render_batch(
    scenes: &[StereoScene],
    threading: &RenderThreading,
) -> StereoResult<Vec<StereoPair>> {
    for (i, scene) in scenes.iter().enumerate() {
        scene
            .validate()
            .map_err(|e| e.prefixed(format!("scene {i}")))?;
    }

    if !threading.parallel {
        return scenes.iter().map(render_pair_sequential).collect();
    }

    let pool = build_thread_pool(threading.threads)?;
    let rendered = pool.install(|| {
        scenes
            .par_iter()
            .map(render_pair_sequential)
            .collect::<Vec<_>>()
    });
    rendered.into_iter().collect()
}

/// Both eyes of a scene that already passed validation.
fn render_pair_sequential(scene: &StereoScene) -> StereoResult<StereoPair> {
    let (left, stats) = render_eye_validated(scene, Eye::Left)?;
    let (right, _) = render_eye_validated(scene, Eye::Right)?;
    Ok(StereoPair { left, right, stats })
}

fn build_thread_pool(threads: Option<usize>) -> StereoResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(StereoError::invalid_parameter(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        StereoError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
