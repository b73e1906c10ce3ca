//! Column-major sample grids.
//!
//! Every image in the crate (label images, noise flags, oval patches, output canvases, depth
//! maps) is a [`Grid`]. Samples are stored column-major, plane after plane:
//! `(row, col, plane)` lives at `plane * rows * cols + col * rows + row`. The 1-based linear dot
//! indices used by the compositor address plane 0 in exactly this order, so the layout must
//! never be transposed.

use std::ops::{Index, IndexMut};

use crate::foundation::error::{StereoError, StereoResult};

/// Rows, columns and planes of a [`Grid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    /// Number of rows (image height).
    pub rows: usize,
    /// Number of columns (image width).
    pub cols: usize,
    /// Number of planes (1 for grayscale, 3 for color).
    pub planes: usize,
}

impl Shape {
    /// Single-plane shape.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            planes: 1,
        }
    }

    pub fn with_planes(rows: usize, cols: usize, planes: usize) -> Self {
        Self { rows, cols, planes }
    }

    /// Samples per plane.
    pub fn plane_len(self) -> usize {
        self.rows * self.cols
    }

    pub fn len(self) -> usize {
        self.plane_len() * self.planes
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True when rows and columns agree, ignoring planes.
    pub fn same_area(self, other: Shape) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.rows, self.cols, self.planes)
    }
}

/// A column-major, multi-plane grid of samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    shape: Shape,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Grid of `shape` with every sample set to `value`.
    pub fn filled(shape: Shape, value: T) -> Self {
        Self {
            shape,
            data: vec![value; shape.len()],
        }
    }

    /// Wrap column-major `data`. Fails when `data.len()` disagrees with `shape`.
    pub fn from_col_major(shape: Shape, data: Vec<T>) -> StereoResult<Self> {
        if data.len() != shape.len() {
            return Err(StereoError::shape_mismatch(format!(
                "grid {shape} needs {} samples, got {}",
                shape.len(),
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// Build a single-plane grid from row slices, the way a literal matrix is written down.
    pub fn from_rows(rows: &[&[T]]) -> StereoResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != n_cols) {
            return Err(StereoError::shape_mismatch(
                "from_rows expects rows of equal length",
            ));
        }
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for col in 0..n_cols {
            for row in rows {
                data.push(row[col]);
            }
        }
        Ok(Self {
            shape: Shape::new(n_rows, n_cols),
            data,
        })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    pub fn planes(&self) -> usize {
        self.shape.planes
    }

    /// Column-major storage, plane after plane.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Checked access with 0-based coordinates.
    pub fn get(&self, row: usize, col: usize, plane: usize) -> Option<T> {
        self.offset(row, col, plane).map(|i| self.data[i])
    }

    /// Plane-0 sample at a 1-based column-major linear index.
    pub fn get_linear(&self, p: usize) -> Option<T> {
        if p == 0 || p > self.shape.plane_len() {
            return None;
        }
        Some(self.data[p - 1])
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Apply `f` to every sample, keeping the shape.
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            shape: self.shape,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// One plane as a single-plane grid.
    pub fn plane(&self, plane: usize) -> Option<Grid<T>> {
        if plane >= self.shape.planes {
            return None;
        }
        let n = self.shape.plane_len();
        Some(Grid {
            shape: Shape::new(self.shape.rows, self.shape.cols),
            data: self.data[plane * n..(plane + 1) * n].to_vec(),
        })
    }

    fn offset(&self, row: usize, col: usize, plane: usize) -> Option<usize> {
        let s = self.shape;
        if row >= s.rows || col >= s.cols || plane >= s.planes {
            return None;
        }
        Some(plane * s.plane_len() + col * s.rows + row)
    }
}

impl<T: Copy> Index<(usize, usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, col, plane): (usize, usize, usize)) -> &T {
        match self.offset(row, col, plane) {
            Some(i) => &self.data[i],
            None => panic!(
                "grid index ({row}, {col}, {plane}) out of bounds for {}",
                self.shape
            ),
        }
    }
}

impl<T: Copy> IndexMut<(usize, usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (row, col, plane): (usize, usize, usize)) -> &mut T {
        match self.offset(row, col, plane) {
            Some(i) => &mut self.data[i],
            None => panic!(
                "grid index ({row}, {col}, {plane}) out of bounds for {}",
                self.shape
            ),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/grid.rs"]
mod tests;
