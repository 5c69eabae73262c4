//! Shared synthetic-shape builders for unit tests.
//!
//! Several modules exercise the same kinds of annotation geometry
//! (concentric circles standing in for ring boundaries, axis-aligned
//! squares for exact-area checks), so the constructors live here rather
//! than being duplicated per test module.

use nalgebra::Point2;
use std::f64::consts::PI;

/// Regular polygon approximating a circle, as (row, col) vertices.
pub(crate) fn circle(
    center_row: f64,
    center_col: f64,
    radius: f64,
    n_points: usize,
) -> Vec<Point2<f64>> {
    (0..n_points)
        .map(|i| {
            let theta = 2.0 * PI * (i as f64) / (n_points as f64);
            Point2::new(
                center_row + radius * theta.sin(),
                center_col + radius * theta.cos(),
            )
        })
        .collect()
}

/// Axis-aligned square of the given side length, as (row, col) vertices.
pub(crate) fn square(center_row: f64, center_col: f64, side: f64) -> Vec<Point2<f64>> {
    let h = side / 2.0;
    vec![
        Point2::new(center_row - h, center_col - h),
        Point2::new(center_row - h, center_col + h),
        Point2::new(center_row + h, center_col + h),
        Point2::new(center_row + h, center_col - h),
    ]
}

/// Square sized so its area matches `area` exactly.
pub(crate) fn square_with_area(center_row: f64, center_col: f64, area: f64) -> Vec<Point2<f64>> {
    square(center_row, center_col, area.sqrt())
}
