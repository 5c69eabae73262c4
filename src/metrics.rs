// src/metrics.rs - Ring measurement extraction and the calibrated table

use nalgebra::{distance, Point2};
use std::f64::consts::PI;
use time::{Date, Duration, Month};

use crate::config::Calibration;
use crate::errors::{DendroError, Result};
use crate::rings::AnnualRing;

/// Raw per-ring properties in pixel units, extracted in pith-to-bark order.
#[derive(Debug, Clone)]
pub struct RingProperties {
    pub main_label: String,
    pub secondary_label: Option<String>,
    pub year: i32,
    pub area: f64,
    pub ew_area: f64,
    pub eccentricity_module: f64,
    pub eccentricity_phase: f64,
    pub perimeter: f64,
}

/// One calibrated row of the measurement table. Values keep full precision;
/// rounding happens when the table is written out.
#[derive(Debug, Clone)]
pub struct MetricsRow {
    pub main_label: String,
    pub secondary_label: Option<String>,
    pub year: i32,
    pub ring_area: f64,
    pub cumulative_area: f64,
    pub cumulative_radius: f64,
    pub annual_ring_width: f64,
    pub ew_area: f64,
    pub cumulative_ew_area: f64,
    pub cumulative_ew_radius: f64,
    pub ew_width: f64,
    pub lw_area: f64,
    pub lw_width: f64,
    pub lw_area_ratio: f64,
    pub lw_width_ratio: f64,
    pub eccentricity_module: f64,
    pub eccentricity_phase: f64,
    pub perimeter: f64,
    pub ring_similarity_factor: f64,
}

/// Calendar year assigned to each ring. The chronology is anchored at
/// January 1st of the base year; each ring steps the date forward 366 days
/// (plantation-anchored count) or backward 365 days (sampling-anchored
/// count).
fn ring_years(count: usize, calibration: &Calibration) -> Result<Vec<i32>> {
    let mut date = Date::from_calendar_date(calibration.year, Month::January, 1).map_err(|e| {
        DendroError::Config(format!(
            "invalid chronology base year {}: {}",
            calibration.year, e
        ))
    })?;

    let mut years = Vec::with_capacity(count);
    for i in 0..count {
        years.push(date.year());
        if i + 1 < count {
            let stepped = if calibration.plantation_date {
                date.checked_add(Duration::days(366))
            } else {
                date.checked_sub(Duration::days(365))
            };
            date = stepped.ok_or_else(|| {
                DendroError::Other(format!(
                    "ring chronology leaves the supported calendar range after year {}",
                    date.year()
                ))
            })?;
        }
    }

    Ok(years)
}

/// Angle of the pith-to-centroid vector in degrees, normalized to [0, 360).
/// Measured in the image plane with the row axis inverted, so a centroid
/// displaced towards increasing column reads 90° and one displaced towards
/// decreasing row reads 0°.
fn eccentricity_phase(pith: &Point2<f64>, centroid: &Point2<f64>) -> f64 {
    let d_row = centroid.x - pith.x;
    let d_col = centroid.y - pith.y;

    let degrees = d_col.atan2(-d_row).to_degrees();
    if degrees < 0.0 {
        degrees + 360.0
    } else {
        degrees
    }
}

/// First measurement pass: walk the ring sequence once and record each
/// ring's raw (pixel-unit) properties.
///
/// The pith is fixed as the centroid of the innermost ring and every
/// eccentricity is measured against it.
pub fn extract_ring_properties(
    rings: &[AnnualRing],
    calibration: &Calibration,
) -> Result<Vec<RingProperties>> {
    let years = ring_years(rings.len(), calibration)?;

    let mut pith = Point2::origin();
    let mut properties = Vec::with_capacity(rings.len());

    for (idx, ring) in rings.iter().enumerate() {
        if idx == 0 {
            pith = ring.centroid();
        }

        let centroid = ring.centroid();
        let module = distance(&centroid, &pith);
        let phase = if module == 0.0 {
            0.0
        } else {
            eccentricity_phase(&pith, &centroid)
        };

        properties.push(RingProperties {
            main_label: ring.main_label().to_string(),
            secondary_label: ring.secondary_label().map(str::to_string),
            year: years[idx],
            area: ring.area(),
            ew_area: ring.early_wood().map(|ew| ew.area()).unwrap_or(0.0),
            eccentricity_module: module,
            eccentricity_phase: phase,
            perimeter: ring.perimeter(),
        });
    }

    Ok(properties)
}

/// Second measurement pass: calibrate the raw properties and derive the
/// cumulative columns of the measurement table.
///
/// Areas scale by the square of `pixels_to_unit_scale`, lengths by the
/// scale itself. Cumulative radii follow the equal-area-circle model: the
/// radius of the circle whose area equals the accumulated ring area. All
/// ratio and similarity divisions are guarded; a zero denominator yields 0.
pub fn fill_rows(properties: &[RingProperties], calibration: &Calibration) -> Vec<MetricsRow> {
    let scale = calibration.pixels_to_unit_scale;
    let area_scale = scale * scale;

    let mut rows = Vec::with_capacity(properties.len());
    let mut cumulative_area = 0.0;
    let mut previous_cumulative_area = 0.0;
    let mut previous_cumulative_radius = 0.0;

    for (idx, props) in properties.iter().enumerate() {
        let ring_area = props.area * area_scale;
        cumulative_area += ring_area;
        let cumulative_radius = (cumulative_area / PI).sqrt();
        let annual_ring_width = cumulative_radius - previous_cumulative_radius;

        let ew_area = props.ew_area * area_scale;
        // The first ring has no predecessor to accumulate onto, so its
        // cumulative early-wood columns stay zero
        let (cumulative_ew_area, cumulative_ew_radius, ew_width) = if idx == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let cum_ew_area = previous_cumulative_area + ew_area;
            let cum_ew_radius = (cum_ew_area / PI).sqrt();
            (
                cum_ew_area,
                cum_ew_radius,
                cum_ew_radius - previous_cumulative_radius,
            )
        };

        let lw_area = ring_area - ew_area;
        let lw_width = annual_ring_width - ew_width;
        let lw_area_ratio = if ring_area == 0.0 {
            0.0
        } else {
            lw_area / ring_area
        };
        let lw_width_ratio = if annual_ring_width == 0.0 {
            0.0
        } else {
            lw_width / annual_ring_width
        };

        let perimeter = props.perimeter * scale;
        let ring_similarity_factor = if perimeter == 0.0 {
            0.0
        } else {
            1.0 - (perimeter - 2.0 * PI * cumulative_radius) / perimeter
        };

        rows.push(MetricsRow {
            main_label: props.main_label.clone(),
            secondary_label: props.secondary_label.clone(),
            year: props.year,
            ring_area,
            cumulative_area,
            cumulative_radius,
            annual_ring_width,
            ew_area,
            cumulative_ew_area,
            cumulative_ew_radius,
            ew_width,
            lw_area,
            lw_width,
            lw_area_ratio,
            lw_width_ratio,
            eccentricity_module: props.eccentricity_module * scale,
            eccentricity_phase: props.eccentricity_phase,
            perimeter,
            ring_similarity_factor,
        });

        previous_cumulative_area = cumulative_area;
        previous_cumulative_radius = cumulative_radius;
    }

    rows
}

/// Full measurement computation: raw extraction followed by calibration.
pub fn compute_measurements(
    rings: &[AnnualRing],
    calibration: &Calibration,
) -> Result<Vec<MetricsRow>> {
    let properties = extract_ring_properties(rings, calibration)?;
    Ok(fill_rows(&properties, calibration))
}
