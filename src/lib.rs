//! stereodots renders random-dot stereogram frames for visual psychophysics.
//!
//! A label image marks where dots go. Each dot is replaced by a light or dark oval patch,
//! alpha-blended onto a background canvas, once per eye. Up to a budget of noise-eligible dots
//! are drawn anticorrelated (opposite textures in the two eyes); the rest are signal dots drawn
//! identically in both eyes.
//!
//! # Pipeline overview
//!
//! 1. **Describe**: a [`StereoScene`] (built in code, or loaded from a [`StereoJob`] file)
//! 2. **Validate**: [`StereoScene::validate`] checks shapes and dot positions up front
//! 3. **Render**: [`render_stereogram`] for one eye, [`render_pair`] / [`render_batch`] for both
//!
//! Leaf utilities cover the stereo geometry ([`screen_offsets`]) and image rotation
//! ([`rotate_nearest`]).
//!
//! All grids are column-major (see [`Grid`]); dot positions are 1-based linear indices in that
//! order.
#![forbid(unsafe_code)]

pub mod assets;
pub mod foundation;
pub mod geometry;
pub mod job;
pub mod render;
pub mod transform;

pub use assets::decode::{
    canvas_to_u8, decode_alpha, decode_flag_image, decode_image_u8, decode_label_image,
    decode_patch, encode_png,
};
pub use foundation::error::{StereoError, StereoResult};
pub use foundation::grid::{Grid, Shape};
pub use geometry::raytrace::{ViewGeometry, screen_offset, screen_offsets};
pub use job::{OvalSources, StereoJob};
pub use render::compose::{
    DotPlan, DotRole, DotStats, Eye, Oval, OvalPair, StereoScene, blend, plan_dots,
    render_eye_with_stats, render_stereogram, select_oval,
};
pub use render::index::{
    AxisClip, Extent, PatchClip, RowCol, clip_axis, clip_patch, clip_rectangle, half_extent,
    linear_to_rowcol, rowcol_to_linear,
};
pub use render::pipeline::{RenderThreading, StereoPair, render_batch, render_pair};
pub use transform::rotate::rotate_nearest;
