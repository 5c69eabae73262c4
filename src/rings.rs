// src/rings.rs - Reconstructed annual-ring geometry

use nalgebra::Point2;

use crate::errors::{DendroError, Result};
use crate::geometry;

/// One reconstructed annual ring.
///
/// The exterior is this year's late-wood boundary. The hole, when present,
/// is the previous year's late-wood boundary, making the ring an annulus;
/// the innermost (pith) ring has no hole. In conifers each ring splits into
/// an early-wood and a late-wood band, so a ring may also carry the split
/// boundary between the two.
#[derive(Debug, Clone)]
pub struct AnnualRing {
    exterior: Vec<Point2<f64>>,
    /// Zero or one hole today; a list to leave room for fragmented samples.
    interiors: Vec<Vec<Point2<f64>>>,
    boundary: Option<Vec<Point2<f64>>>,
    main_label: String,
    secondary_label: Option<String>,
}

impl AnnualRing {
    /// Build a ring, enforcing the nesting chain hole ⊂ boundary ⊂ exterior
    /// (each inner part entirely inside the next, sharing no boundary
    /// points). Violations are `MalformedShape` errors.
    pub fn new(
        exterior: Vec<Point2<f64>>,
        hole: Option<Vec<Point2<f64>>>,
        boundary: Option<Vec<Point2<f64>>>,
        main_label: String,
        secondary_label: Option<String>,
    ) -> Result<Self> {
        if exterior.len() < 3 {
            return Err(DendroError::MalformedShape(format!(
                "ring '{}': exterior needs at least 3 vertices",
                main_label
            )));
        }

        if let Some(hole) = &hole {
            if !geometry::polygon_contains(&exterior, hole) {
                return Err(DendroError::MalformedShape(format!(
                    "ring '{}': hole is not nested inside the exterior",
                    main_label
                )));
            }
        }

        if let Some(boundary) = &boundary {
            if !geometry::polygon_contains(&exterior, boundary) {
                return Err(DendroError::MalformedShape(format!(
                    "ring '{}': early/late boundary is not nested inside the exterior",
                    main_label
                )));
            }
            if let Some(hole) = &hole {
                if !geometry::polygon_contains(boundary, hole) {
                    return Err(DendroError::MalformedShape(format!(
                        "ring '{}': hole is not nested inside the early/late boundary",
                        main_label
                    )));
                }
            }
        }

        Ok(AnnualRing {
            exterior,
            interiors: hole.into_iter().collect(),
            boundary,
            main_label,
            secondary_label,
        })
    }

    pub fn exterior(&self) -> &[Point2<f64>] {
        &self.exterior
    }

    pub fn interiors(&self) -> &[Vec<Point2<f64>>] {
        &self.interiors
    }

    /// The single hole, when present.
    pub fn hole(&self) -> Option<&[Point2<f64>]> {
        self.interiors.first().map(Vec::as_slice)
    }

    /// The early/late-wood split boundary, when one was matched.
    pub fn boundary(&self) -> Option<&[Point2<f64>]> {
        self.boundary.as_deref()
    }

    pub fn main_label(&self) -> &str {
        &self.main_label
    }

    pub fn secondary_label(&self) -> Option<&str> {
        self.secondary_label.as_deref()
    }

    /// Annular area: exterior area minus hole area.
    pub fn area(&self) -> f64 {
        let hole_area: f64 = self.interiors.iter().map(|h| geometry::polygon_area(h)).sum();
        geometry::polygon_area(&self.exterior) - hole_area
    }

    /// Centroid of the annular region (hole-aware).
    pub fn centroid(&self) -> Point2<f64> {
        geometry::annular_centroid(&self.exterior, self.hole())
    }

    /// Length of the exterior boundary. Holes are excluded: the perimeter
    /// models the outer ring boundary compared against the equal-area
    /// circle in the similarity factor.
    pub fn perimeter(&self) -> f64 {
        geometry::ring_perimeter(&self.exterior)
    }

    /// The late-wood band: the annulus between the exterior and the split
    /// boundary. `None` when the ring has no split boundary.
    pub fn late_wood(&self) -> Option<AnnualRing> {
        // Nesting was established at construction, so the sub-ring is
        // assembled directly
        self.boundary.as_ref().map(|boundary| AnnualRing {
            exterior: self.exterior.clone(),
            interiors: vec![boundary.clone()],
            boundary: None,
            main_label: format!("{}_late_wood", self.main_label),
            secondary_label: self.secondary_label.clone(),
        })
    }

    /// The early-wood band: the annulus between the split boundary and the
    /// hole (or the full split-boundary polygon for the pith ring). `None`
    /// when the ring has no split boundary.
    pub fn early_wood(&self) -> Option<AnnualRing> {
        self.boundary.as_ref().map(|boundary| AnnualRing {
            exterior: boundary.clone(),
            interiors: self.interiors.clone(),
            boundary: None,
            main_label: format!("{}_early_wood", self.main_label),
            secondary_label: self.secondary_label.clone(),
        })
    }
}
