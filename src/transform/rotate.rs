//! Nearest-neighbour image rotation about the image centre, cropped to the input size.

use crate::foundation::grid::Grid;

/// Rotate every plane of `image` by `angle_degrees` about its centre.
///
/// The output has the input's shape. With `w = rows`, `h = cols`, output sample `(x, y)`
/// (row, col) reads source `(X, Y)`:
///
/// ```text
/// X = trunc(w/2 + (x - w/2) cos t + (y - h/2) sin t + 0.5)
/// Y = trunc(h/2 - (x - w/2) sin t + (y - h/2) cos t + 0.5)
/// ```
///
/// evaluated in `f32`. Samples whose source falls outside the image are `0`.
#[tracing::instrument(skip(image), fields(shape = %image.shape()))]
pub fn rotate_nearest(image: &Grid<u8>, angle_degrees: f32) -> Grid<u8> {
    let shape = image.shape();
    let mut out = Grid::filled(shape, 0u8);
    if shape.is_empty() {
        return out;
    }

    // Radians are rounded to f32 before sin/cos.
    let rad = (f64::from(angle_degrees) * std::f64::consts::PI / 180.0) as f32;
    let (sa, ca) = f64::from(rad).sin_cos();
    let (sa, ca) = (sa as f32, ca as f32);
    let w = shape.rows as i64;
    let h = shape.cols as i64;
    let w2 = 0.5 * shape.rows as f32;
    let h2 = 0.5 * shape.cols as f32;

    for y in 0..shape.cols {
        let dy = y as f32 - h2;
        for x in 0..shape.rows {
            let dx = x as f32 - w2;
            let sx = (w2 + dx * ca + dy * sa + 0.5) as i64;
            let sy = (h2 - dx * sa + dy * ca + 0.5) as i64;
            if sx < 0 || sy < 0 || sx >= w || sy >= h {
                continue;
            }
            for plane in 0..shape.planes {
                out[(x, y, plane)] = image[(sx as usize, sy as usize, plane)];
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/transform/rotate.rs"]
mod tests;
