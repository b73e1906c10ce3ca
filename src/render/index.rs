//! Dot index arithmetic and patch clipping.
//!
//! Dot positions are 1-based, column-major linear indices (see [`crate::Grid`]). Clip results
//! are 0-based half-open ranges so they can drive grid loops directly.

use std::ops::Range;

use crate::foundation::error::{StereoError, StereoResult};

/// A 1-based (row, column) subscript.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowCol {
    pub row: usize,
    pub col: usize,
}

/// Extent of a rectangle along both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Extent {
    pub rows: usize,
    pub cols: usize,
}

impl Extent {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

/// Matching destination and source ranges along one axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AxisClip {
    /// Canvas cells written.
    pub dst: Range<usize>,
    /// Patch cells read.
    pub src: Range<usize>,
}

impl AxisClip {
    pub fn len(&self) -> usize {
        self.dst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dst.is_empty()
    }
}

/// Row and column clips of one patch placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchClip {
    pub rows: AxisClip,
    pub cols: AxisClip,
}

impl PatchClip {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }
}

/// Convert a 1-based linear index to a 1-based (row, col).
///
/// A position that is an exact multiple of `row_count` lands on the last row of its column,
/// never on row 0.
pub fn linear_to_rowcol(p: usize, row_count: usize) -> StereoResult<RowCol> {
    if row_count == 0 {
        return Err(StereoError::invalid_parameter(
            "row count must be >= 1 to map a linear index",
        ));
    }
    if p == 0 {
        return Err(StereoError::out_of_range("linear index 0; positions are 1-based"));
    }
    Ok(RowCol {
        row: (p - 1) % row_count + 1,
        col: (p - 1) / row_count + 1,
    })
}

/// Inverse of [`linear_to_rowcol`].
pub fn rowcol_to_linear(rc: RowCol, row_count: usize) -> usize {
    (rc.col - 1) * row_count + rc.row
}

/// Half-extent of a patch dimension: `floor((dim + 0.5) / 2)`.
///
/// Equals `dim / 2` in integer arithmetic, never `round(dim / 2)`.
pub fn half_extent(dim: usize) -> usize {
    ((dim as f64 + 0.5) / 2.0).floor() as usize
}

/// Clip a patch of `patch_len` cells against a canvas axis of `canvas_len` cells.
///
/// `center` is 1-based. The patch's last cell lands on canvas cell `center + half` and its
/// first on `center + half - patch_len + 1`. Cells outside `1..=canvas_len` are dropped from
/// the destination, and the same number of cells is dropped from the same side of the source.
pub fn clip_axis(center: usize, half: usize, canvas_len: usize, patch_len: usize) -> AxisClip {
    let far = center as i64 + half as i64;
    let near = far - patch_len as i64 + 1;

    let dst_first = near.max(1);
    let dst_last = far.min(canvas_len as i64);
    let len = (dst_last - dst_first + 1).max(0) as usize;

    let dst_start = (dst_first - 1) as usize;
    let src_start = (dst_first - near) as usize;
    AxisClip {
        dst: dst_start..dst_start + len,
        src: src_start..src_start + len,
    }
}

/// Clip a patch centred on `center` against a canvas, each axis independently.
pub fn clip_rectangle(center: RowCol, half: Extent, canvas: Extent, patch: Extent) -> PatchClip {
    PatchClip {
        rows: clip_axis(center.row, half.rows, canvas.rows, patch.rows),
        cols: clip_axis(center.col, half.cols, canvas.cols, patch.cols),
    }
}

/// [`clip_rectangle`] with the half-extents derived from the patch by [`half_extent`].
pub fn clip_patch(center: RowCol, canvas: Extent, patch: Extent) -> PatchClip {
    let half = Extent::new(half_extent(patch.rows), half_extent(patch.cols));
    clip_rectangle(center, half, canvas, patch)
}

#[cfg(test)]
#[path = "../../tests/unit/render/index.rs"]
mod tests;
