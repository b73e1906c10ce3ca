//! JSON job files describing one stereogram frame.
//!
//! ```json
//! {
//!   "label_image": "labels.png",
//!   "noise_flags": "noise.png",
//!   "dot_positions": [6, 11],
//!   "noise_budget": 1,
//!   "ovals": { "light": "light.png", "dark": "dark.png", "alpha": "alpha.png" },
//!   "background": 128
//! }
//! ```
//!
//! Image paths are relative to the job file's directory.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::decode::{decode_alpha, decode_flag_image, decode_label_image, decode_patch},
    foundation::error::{StereoError, StereoResult},
    render::compose::{OvalPair, StereoScene},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StereoJob {
    pub label_image: String,
    pub noise_flags: String,
    /// 1-based column-major dot indices, in drawing order.
    pub dot_positions: Vec<usize>,
    #[serde(default)]
    pub noise_budget: usize,
    pub ovals: OvalSources,
    #[serde(default)]
    pub background: u32,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OvalSources {
    pub light: String,
    pub dark: String,
    pub alpha: String,
}

impl StereoJob {
    pub fn from_json(json: &str) -> StereoResult<Self> {
        let job: Self = serde_json::from_str(json).context("parse job JSON")?;
        Ok(job)
    }

    /// Read and parse a job file.
    pub fn read(path: &Path) -> StereoResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read job '{}'", path.display()))?;
        Self::from_json(&json)
    }

    /// Structural checks that need no image data.
    pub fn validate(&self) -> StereoResult<()> {
        for (field, source) in [
            ("label_image", &self.label_image),
            ("noise_flags", &self.noise_flags),
            ("ovals.light", &self.ovals.light),
            ("ovals.dark", &self.ovals.dark),
            ("ovals.alpha", &self.ovals.alpha),
        ] {
            validate_rel_source(source, field)?;
        }
        if let Some(i) = self.dot_positions.iter().position(|&p| p == 0) {
            return Err(StereoError::out_of_range(format!(
                "dot_positions[{i}] is 0; positions are 1-based"
            )));
        }
        Ok(())
    }

    /// Decode every referenced image into a renderable scene.
    #[tracing::instrument(skip(self))]
    pub fn load_scene(&self, root: &Path) -> StereoResult<StereoScene> {
        self.validate()?;

        let scene = StereoScene {
            label_image: decode_label_image(&read_asset(root, &self.label_image)?)?,
            noise_flags: decode_flag_image(&read_asset(root, &self.noise_flags)?)?,
            dot_positions: self.dot_positions.clone(),
            noise_budget: self.noise_budget,
            ovals: OvalPair {
                light: decode_patch(&read_asset(root, &self.ovals.light)?)?,
                dark: decode_patch(&read_asset(root, &self.ovals.dark)?)?,
                alpha: decode_alpha(&read_asset(root, &self.ovals.alpha)?)?,
            },
            background: self.background,
        };
        scene.validate()?;
        Ok(scene)
    }
}

fn read_asset(root: &Path, source: &str) -> StereoResult<Vec<u8>> {
    let path: PathBuf = root.join(source);
    let bytes =
        std::fs::read(&path).with_context(|| format!("read image '{}'", path.display()))?;
    Ok(bytes)
}

fn validate_rel_source(source: &str, field: &str) -> StereoResult<()> {
    if source.trim().is_empty() {
        return Err(StereoError::invalid_parameter(format!(
            "{field} must be non-empty"
        )));
    }
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(StereoError::invalid_parameter(format!(
            "{field} must be a relative path"
        )));
    }
    if s.split('/').any(|part| part == "..") {
        return Err(StereoError::invalid_parameter(format!(
            "{field} must not contain '..'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/job.rs"]
mod tests;
