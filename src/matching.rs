// src/matching.rs - Pairing late-wood boundaries into annual rings

use crate::geometry;
use crate::rings::AnnualRing;
use crate::shapes::Shape;

/// A late-wood boundary rejected during ring construction, kept for
/// reporting. Skipping is recovery, not failure: the remaining boundaries
/// still produce rings.
#[derive(Debug, Clone)]
pub struct SkippedBoundary {
    /// Index in the area-sorted late-wood sequence.
    pub index: usize,
    pub label: String,
    pub reason: String,
}

/// Outcome of the matching pass: rings in pith-to-bark order plus the
/// boundaries that failed nesting validation.
#[derive(Debug)]
pub struct MatchingResult {
    pub rings: Vec<AnnualRing>,
    pub skipped: Vec<SkippedBoundary>,
}

/// First early-wood boundary touching the annulus between `late` and
/// `previous`, scanning candidates in their given (area-ascending) order.
/// The innermost ring has no predecessor and therefore no search region.
fn find_boundary_within_annulus<'a>(
    late: &Shape,
    previous: Option<&Shape>,
    early: &'a [Shape],
) -> Option<&'a Shape> {
    let previous = previous?;

    early.iter().find(|candidate| {
        geometry::annulus_intersects(&late.points, &previous.points, &candidate.points)
    })
}

/// Pair consecutive late-wood boundaries into annuli and attach the first
/// early-wood boundary found inside each.
///
/// `late_boundaries` must be sorted by ascending area (pith-to-bark), as
/// the annotation loaders produce them. Matched early boundaries are not
/// consumed; under degenerate geometry the same candidate may attach to
/// more than one ring.
pub fn match_annual_rings(
    late_boundaries: &[Shape],
    early_boundaries: Option<&[Shape]>,
) -> MatchingResult {
    let mut rings = Vec::with_capacity(late_boundaries.len());
    let mut skipped = Vec::new();
    let mut previous: Option<&Shape> = None;

    for (index, late) in late_boundaries.iter().enumerate() {
        let matched = early_boundaries
            .and_then(|early| find_boundary_within_annulus(late, previous, early));

        let ring = AnnualRing::new(
            late.points.clone(),
            previous.map(|p| p.points.clone()),
            matched.map(|m| m.points.clone()),
            late.label.clone(),
            matched.map(|m| m.label.clone()),
        );

        match ring {
            Ok(ring) => rings.push(ring),
            Err(error) => skipped.push(SkippedBoundary {
                index,
                label: late.label.clone(),
                reason: error.to_string(),
            }),
        }

        // The nesting cursor advances past rejected boundaries too, so the
        // next ring nests against the outermost boundary actually seen
        previous = Some(late);
    }

    MatchingResult { rings, skipped }
}
