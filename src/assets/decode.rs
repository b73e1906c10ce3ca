use std::io::Cursor;

use anyhow::Context;

use crate::{
    foundation::error::{StereoError, StereoResult},
    foundation::grid::{Grid, Shape},
};

/// Decode a label image. Color images keep three planes and grayscale images one; 16-bit
/// inputs keep their full sample values so labels above 255 (and their parity) survive.
pub fn decode_label_image(bytes: &[u8]) -> StereoResult<Grid<u32>> {
    let img = image::load_from_memory(bytes).context("decode label image")?;
    if img.color().has_color() {
        if matches!(
            img.color(),
            image::ColorType::Rgb16 | image::ColorType::Rgba16
        ) {
            let rgb = img.to_rgb16();
            let (w, h) = rgb.dimensions();
            return Ok(to_grid(w, h, 3, rgb.as_raw().as_slice()).map(u32::from));
        }
        let rgb = img.to_rgb8();
        let (w, h) = rgb.dimensions();
        return Ok(to_grid(w, h, 3, rgb.as_raw().as_slice()).map(u32::from));
    }
    decode_gray_u32(img)
}

/// Decode a single-plane integer map such as a noise-flag image.
pub fn decode_flag_image(bytes: &[u8]) -> StereoResult<Grid<u32>> {
    let img = image::load_from_memory(bytes).context("decode flag image")?;
    decode_gray_u32(img)
}

/// Decode an oval texture; samples keep their 0..=255 values.
pub fn decode_patch(bytes: &[u8]) -> StereoResult<Grid<f64>> {
    let luma = image::load_from_memory(bytes)
        .context("decode oval patch")?
        .to_luma8();
    let (w, h) = luma.dimensions();
    Ok(to_grid(w, h, 1, luma.as_raw().as_slice()).map(f64::from))
}

/// Decode an alpha mask, scaling 0..=255 to `[0, 1]`.
pub fn decode_alpha(bytes: &[u8]) -> StereoResult<Grid<f64>> {
    let luma = image::load_from_memory(bytes)
        .context("decode alpha mask")?
        .to_luma8();
    let (w, h) = luma.dimensions();
    Ok(to_grid(w, h, 1, luma.as_raw().as_slice()).map(|v| f64::from(v) / 255.0))
}

/// Decode an 8-bit image, one plane for grayscale and three for color.
pub fn decode_image_u8(bytes: &[u8]) -> StereoResult<Grid<u8>> {
    let img = image::load_from_memory(bytes).context("decode image")?;
    if img.color().has_color() {
        let rgb = img.to_rgb8();
        let (w, h) = rgb.dimensions();
        Ok(to_grid(w, h, 3, rgb.as_raw().as_slice()))
    } else {
        let luma = img.to_luma8();
        let (w, h) = luma.dimensions();
        Ok(to_grid(w, h, 1, luma.as_raw().as_slice()))
    }
}

/// Clamp canvas samples into 0..=255.
pub fn canvas_to_u8(canvas: &Grid<u32>) -> Grid<u8> {
    canvas.map(|v| v.min(255) as u8)
}

/// Encode a one- or three-plane grid as PNG.
pub fn encode_png(grid: &Grid<u8>) -> StereoResult<Vec<u8>> {
    let s = grid.shape();
    let color = match s.planes {
        1 => image::ColorType::L8,
        3 => image::ColorType::Rgb8,
        n => {
            return Err(StereoError::invalid_parameter(format!(
                "png output needs 1 or 3 planes, got {n}"
            )));
        }
    };
    let (w, h) = (dim_u32(s.cols)?, dim_u32(s.rows)?);

    let mut interleaved = Vec::with_capacity(s.len());
    for row in 0..s.rows {
        for col in 0..s.cols {
            for plane in 0..s.planes {
                interleaved.push(grid[(row, col, plane)]);
            }
        }
    }

    let mut buf = Vec::new();
    image::write_buffer_with_format(
        &mut Cursor::new(&mut buf),
        &interleaved,
        w,
        h,
        color,
        image::ImageFormat::Png,
    )
    .context("encode png")?;
    Ok(buf)
}

fn decode_gray_u32(img: image::DynamicImage) -> StereoResult<Grid<u32>> {
    if matches!(
        img.color(),
        image::ColorType::L16 | image::ColorType::La16
    ) {
        let luma = img.to_luma16();
        let (w, h) = luma.dimensions();
        return Ok(to_grid(w, h, 1, luma.as_raw().as_slice()).map(u32::from));
    }
    let luma = img.to_luma8();
    let (w, h) = luma.dimensions();
    Ok(to_grid(w, h, 1, luma.as_raw().as_slice()).map(u32::from))
}

/// Re-lay interleaved row-major pixels into a column-major grid.
fn to_grid<T: Copy + Default>(width: u32, height: u32, planes: usize, raw: &[T]) -> Grid<T> {
    let shape = Shape::with_planes(height as usize, width as usize, planes);
    let mut grid = Grid::filled(shape, T::default());
    for row in 0..shape.rows {
        for col in 0..shape.cols {
            let base = (row * shape.cols + col) * planes;
            for plane in 0..planes {
                grid[(row, col, plane)] = raw[base + plane];
            }
        }
    }
    grid
}

fn dim_u32(n: usize) -> StereoResult<u32> {
    u32::try_from(n)
        .map_err(|_| StereoError::invalid_parameter(format!("image dimension {n} exceeds u32")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
