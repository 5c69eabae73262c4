// src/lib.rs - Library interface for DendroRingsR

pub mod annotation_io;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod matching;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod rings;
pub mod shapes;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types and functions
pub use config::{Calibration, Config};
pub use errors::{DendroError, Result};
pub use pipeline::{process_sample, SampleReport};

// Re-export the annotation adapter
pub use annotation_io::{
    find_sample_dirs, parse_annotation_document, AnnotationSet, EarlywoodAnnotations,
    LabelmeDocument, LatewoodAnnotations,
};

// Re-export ring reconstruction types
pub use matching::{match_annual_rings, MatchingResult, SkippedBoundary};
pub use rings::AnnualRing;
pub use shapes::{RawShape, Shape, ShapeType};

// Re-export measurement computation
pub use metrics::{
    compute_measurements, extract_ring_properties, fill_rows, MetricsRow, RingProperties,
};

// Re-export table output
pub use output::{write_measurements_csv, TableHeaders};

// Re-export the geometry toolkit used by the ring model
pub use geometry::{
    annular_centroid, annulus_intersects, point_in_polygon, polygon_area, polygon_centroid,
    polygon_contains, ring_perimeter, segments_intersect, signed_area,
};
