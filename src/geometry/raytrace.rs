//! Horizontal screen positions of points in depth.
//!
//! For a point `world_x` cm from the visual midline and `depth` cm behind (+) or in front of
//! (-) the screen, each eye sees it at
//!
//! ```text
//! left  = floor(ppcm * (x * vd - d * ipd / 2) / (vd + d) + 0.5)
//! right = floor(ppcm * (x * vd + d * ipd / 2) / (vd + d) + 0.5)
//! ```
//!
//! (Howard & Rogers, *Seeing in Depth* vol. 2, eq. 2, p. 541).

use crate::{
    foundation::error::{StereoError, StereoResult},
    foundation::grid::Grid,
};

/// Viewing setup, all lengths in centimetres.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewGeometry {
    /// Inter-pupillary distance.
    pub ipd_cm: f64,
    /// Eye-to-screen distance.
    pub view_dist_cm: f64,
    pub pixels_per_cm: f64,
}

impl ViewGeometry {
    pub fn validate(&self) -> StereoResult<()> {
        for (name, v) in [
            ("ipd_cm", self.ipd_cm),
            ("view_dist_cm", self.view_dist_cm),
            ("pixels_per_cm", self.pixels_per_cm),
        ] {
            if !v.is_finite() {
                return Err(StereoError::invalid_parameter(format!(
                    "{name} must be finite"
                )));
            }
        }
        Ok(())
    }
}

/// Left/right pixel offsets of a single point. Depth `0` yields `(0.0, 0.0)`.
pub fn screen_offset(
    depth: f64,
    geometry: &ViewGeometry,
    world_x: i32,
) -> StereoResult<(f64, f64)> {
    geometry.validate()?;
    offset_unchecked(depth, geometry, world_x)
}

/// Element-wise [`screen_offset`] over a depth map.
///
/// Zero depths leave both outputs at zero; callers treat that as "no offset".
#[tracing::instrument(skip(depth), fields(shape = %depth.shape()))]
pub fn screen_offsets(
    depth: &Grid<f64>,
    geometry: &ViewGeometry,
    world_x: i32,
) -> StereoResult<(Grid<f64>, Grid<f64>)> {
    geometry.validate()?;

    let mut left = Grid::filled(depth.shape(), 0.0);
    let mut right = Grid::filled(depth.shape(), 0.0);
    let s = depth.shape();
    for plane in 0..s.planes {
        for col in 0..s.cols {
            for row in 0..s.rows {
                let (l, r) = offset_unchecked(depth[(row, col, plane)], geometry, world_x)?;
                left[(row, col, plane)] = l;
                right[(row, col, plane)] = r;
            }
        }
    }
    Ok((left, right))
}

fn offset_unchecked(depth: f64, g: &ViewGeometry, world_x: i32) -> StereoResult<(f64, f64)> {
    if depth == 0.0 {
        return Ok((0.0, 0.0));
    }
    let denom = g.view_dist_cm + depth;
    if !depth.is_finite() || denom == 0.0 {
        return Err(StereoError::invalid_parameter(format!(
            "depth {depth} has no screen projection at view distance {}",
            g.view_dist_cm
        )));
    }
    let x = f64::from(world_x) * g.view_dist_cm;
    let half_disp = depth * g.ipd_cm / 2.0;
    let left = (g.pixels_per_cm * (x - half_disp) / denom + 0.5).floor();
    let right = (g.pixels_per_cm * (x + half_disp) / denom + 0.5).floor();
    Ok((left, right))
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/raytrace.rs"]
mod tests;
