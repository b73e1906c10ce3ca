use super::*;
use crate::Shape;

fn ramp(shape: Shape) -> Grid<u8> {
    Grid::from_col_major(shape, (0..shape.len()).map(|v| (v + 1) as u8).collect()).unwrap()
}

#[test]
fn zero_and_full_turn_are_identity() {
    let img = ramp(Shape::with_planes(5, 7, 3));
    assert_eq!(rotate_nearest(&img, 0.0), img);
    assert_eq!(rotate_nearest(&img, 360.0), img);
}

#[test]
fn half_turn_mirrors_about_the_pixel_grid_centre() {
    let img = ramp(Shape::with_planes(4, 4, 2));
    let out = rotate_nearest(&img, 180.0);
    assert_eq!(out.shape(), img.shape());
    for plane in 0..2 {
        for y in 0..4 {
            for x in 0..4 {
                let expected = if x == 0 || y == 0 {
                    0
                } else {
                    img[(4 - x, 4 - y, plane)]
                };
                assert_eq!(out[(x, y, plane)], expected, "({x}, {y}, {plane})");
            }
        }
    }
}

#[test]
fn quarter_turn_on_non_square_image_keeps_rows_and_cols_apart() {
    let img = ramp(Shape::new(3, 5));
    let out = rotate_nearest(&img, 90.0);
    assert_eq!(out.shape(), Shape::new(3, 5));

    // Row x of the output reads source column 4 - x; column y reads source row y - 1.
    for x in 0..3 {
        for y in 0..5usize {
            let expected = if y == 4 {
                0
            } else {
                img[(y.saturating_sub(1), 4 - x, 0)]
            };
            assert_eq!(out[(x, y, 0)], expected, "({x}, {y})");
        }
    }
}

#[test]
fn samples_outside_the_source_are_zero() {
    let img = Grid::filled(Shape::new(9, 9), 255u8);
    let out = rotate_nearest(&img, 45.0);
    assert_eq!(out[(0, 0, 0)], 0);
    assert_eq!(out[(8, 8, 0)], 0);
    assert_eq!(out[(4, 4, 0)], 255);
}

#[test]
fn empty_image_stays_empty() {
    let img = Grid::filled(Shape::new(0, 4), 1u8);
    assert_eq!(rotate_nearest(&img, 30.0).shape(), Shape::new(0, 4));
}
