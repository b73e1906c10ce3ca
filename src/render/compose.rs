//! Dot-to-oval compositing.
//!
//! Each dot of a label image is replaced by a light or dark oval patch, alpha-blended onto a
//! background canvas. Up to `noise_budget` noise-eligible dots are drawn anticorrelated (the
//! two eyes receive opposite textures); every other dot is a signal dot drawn identically in
//! both eyes.

use crate::{
    foundation::error::{StereoError, StereoResult},
    foundation::grid::{Grid, Shape},
    render::index::{Extent, clip_patch, linear_to_rowcol},
};

/// Which eye a canvas is rendered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub fn is_left(self) -> bool {
        matches!(self, Eye::Left)
    }
}

/// One of the two oval textures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Oval {
    Light,
    Dark,
}

impl Oval {
    /// Default texture for a label sample: even labels are light, odd labels dark.
    pub fn for_label(label: u32) -> Self {
        if label % 2 != 0 { Oval::Dark } else { Oval::Light }
    }

    pub fn opposite(self) -> Self {
        match self {
            Oval::Light => Oval::Dark,
            Oval::Dark => Oval::Light,
        }
    }
}

/// How a dot is rendered across the two eyes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DotRole {
    /// Same texture in both eyes.
    Signal,
    /// Opposite textures between the eyes.
    Noise,
}

/// Texture drawn for a dot with `label`, `role` and `eye`.
///
/// Noise dots give the left eye the opposite of the label default and the right eye the
/// default itself.
pub fn select_oval(label: u32, role: DotRole, eye: Eye) -> Oval {
    let default = Oval::for_label(label);
    match (role, eye) {
        (DotRole::Noise, Eye::Left) => default.opposite(),
        _ => default,
    }
}

/// Light and dark patches sharing one alpha mask.
#[derive(Clone, Debug, PartialEq)]
pub struct OvalPair {
    pub light: Grid<f64>,
    pub dark: Grid<f64>,
    /// Blend weights in `[0, 1]`.
    pub alpha: Grid<f64>,
}

impl OvalPair {
    pub fn texture(&self, oval: Oval) -> &Grid<f64> {
        match oval {
            Oval::Light => &self.light,
            Oval::Dark => &self.dark,
        }
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.alpha.rows(), self.alpha.cols())
    }

    pub fn validate(&self) -> StereoResult<()> {
        let mask = self.alpha.shape();
        if mask.planes != 1 || mask.is_empty() {
            return Err(StereoError::invalid_parameter(format!(
                "alpha mask must be a non-empty single-plane grid, got {mask}"
            )));
        }
        for (name, patch) in [("light", &self.light), ("dark", &self.dark)] {
            if patch.shape() != mask {
                return Err(StereoError::shape_mismatch(format!(
                    "{name} patch is {} but alpha mask is {mask}",
                    patch.shape()
                )));
            }
            if patch.as_slice().iter().any(|v| !v.is_finite()) {
                return Err(StereoError::invalid_parameter(format!(
                    "{name} patch contains non-finite samples"
                )));
            }
        }
        if self
            .alpha
            .as_slice()
            .iter()
            .any(|a| !a.is_finite() || !(0.0..=1.0).contains(a))
        {
            return Err(StereoError::invalid_parameter(
                "alpha mask samples must be finite and within [0, 1]",
            ));
        }
        Ok(())
    }
}

/// All inputs of one stereogram frame except the eye.
#[derive(Clone, Debug, PartialEq)]
pub struct StereoScene {
    /// Dot labels; the parity of plane 0 picks each dot's default texture.
    pub label_image: Grid<u32>,
    /// Nonzero plane-0 samples mark noise-eligible dots.
    pub noise_flags: Grid<u32>,
    /// 1-based column-major linear indices, in drawing order.
    pub dot_positions: Vec<usize>,
    /// Maximum number of eligible dots drawn as noise.
    pub noise_budget: usize,
    pub ovals: OvalPair,
    pub background: u32,
}

impl StereoScene {
    /// Check every precondition of [`render_stereogram`] before anything is drawn.
    pub fn validate(&self) -> StereoResult<()> {
        let shape = self.label_image.shape();
        if shape.is_empty() {
            return Err(StereoError::invalid_parameter(format!(
                "label image must be non-empty, got {shape}"
            )));
        }
        let flags = self.noise_flags.shape();
        if !flags.same_area(shape) {
            return Err(StereoError::shape_mismatch(format!(
                "noise flags are {flags} but label image is {shape}"
            )));
        }
        self.ovals.validate()?;

        let limit = shape.plane_len();
        if let Some((i, &p)) = self
            .dot_positions
            .iter()
            .enumerate()
            .find(|&(_, &p)| p == 0 || p > limit)
        {
            return Err(StereoError::out_of_range(format!(
                "dot_positions[{i}] = {p} is outside 1..={limit}"
            )));
        }
        Ok(())
    }
}

/// Per-dot decision made before any pixel is touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DotPlan {
    pub position: usize,
    pub label: u32,
    pub role: DotRole,
}

/// Counts of one rendered eye.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DotStats {
    pub dots_total: usize,
    pub noise_dots: usize,
    pub signal_dots: usize,
}

/// Assign every dot its role, in order. Only the first `noise_budget` eligible dots become
/// noise dots.
pub fn plan_dots(scene: &StereoScene) -> StereoResult<Vec<DotPlan>> {
    scene.validate()?;
    Ok(plan_validated(scene))
}

fn plan_validated(scene: &StereoScene) -> Vec<DotPlan> {
    scene
        .dot_positions
        .iter()
        .scan(0usize, |noise_rendered, &position| {
            let eligible = scene.noise_flags.get_linear(position).unwrap_or(0) != 0;
            let role = if eligible && *noise_rendered < scene.noise_budget {
                *noise_rendered += 1;
                DotRole::Noise
            } else {
                DotRole::Signal
            };
            Some(DotPlan {
                position,
                label: scene.label_image.get_linear(position).unwrap_or(0),
                role,
            })
        })
        .collect()
}

/// `(1 - alpha) * dst + alpha * src`, truncated back to an integer sample.
#[inline]
pub fn blend(dst: u32, src: f64, alpha: f64) -> u32 {
    ((1.0 - alpha) * f64::from(dst) + alpha * src) as u32
}

/// Render one eye of `scene`.
///
/// The canvas has the label image's shape, every plane pre-filled with the background. Fails
/// before allocating anything when the scene is invalid.
pub fn render_stereogram(scene: &StereoScene, eye: Eye) -> StereoResult<Grid<u32>> {
    render_eye_with_stats(scene, eye).map(|(canvas, _)| canvas)
}

/// [`render_stereogram`] plus the noise/signal counts of the rendered eye.
pub fn render_eye_with_stats(
    scene: &StereoScene,
    eye: Eye,
) -> StereoResult<(Grid<u32>, DotStats)> {
    scene.validate()?;
    render_eye_validated(scene, eye)
}

/// Render one eye of a scene that already passed [`StereoScene::validate`].
#[tracing::instrument(skip(scene), fields(dots = scene.dot_positions.len()))]
pub(crate) fn render_eye_validated(
    scene: &StereoScene,
    eye: Eye,
) -> StereoResult<(Grid<u32>, DotStats)> {
    let shape: Shape = scene.label_image.shape();
    let mut canvas = Grid::filled(shape, scene.background);
    let plan = plan_validated(scene);

    let canvas_extent = Extent::new(shape.rows, shape.cols);
    let patch_extent = scene.ovals.extent();
    let alpha = &scene.ovals.alpha;
    let mut stats = DotStats {
        dots_total: plan.len(),
        ..DotStats::default()
    };

    for dot in &plan {
        match dot.role {
            DotRole::Noise => stats.noise_dots += 1,
            DotRole::Signal => stats.signal_dots += 1,
        }
        let texture = scene.ovals.texture(select_oval(dot.label, dot.role, eye));
        let center = linear_to_rowcol(dot.position, shape.rows)?;
        let clip = clip_patch(center, canvas_extent, patch_extent);

        for plane in 0..shape.planes {
            for (dc, sc) in clip.cols.dst.clone().zip(clip.cols.src.clone()) {
                for (dr, sr) in clip.rows.dst.clone().zip(clip.rows.src.clone()) {
                    let a = alpha[(sr, sc, 0)];
                    let px = &mut canvas[(dr, dc, plane)];
                    *px = blend(*px, texture[(sr, sc, 0)], a);
                }
            }
        }
    }

    tracing::debug!(
        noise = stats.noise_dots,
        signal = stats.signal_dots,
        "composited ovals"
    );
    Ok((canvas, stats))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
