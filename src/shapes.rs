// src/shapes.rs - Typed annotation shapes and their raw serialized form

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{DendroError, Result};
use crate::geometry;

/// Kind of annotated shape, matching the annotation tool's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Polygon,
    Point,
    Linestrip,
    Line,
}

/// One annotated shape as it appears on disk. All fields are optional at
/// this stage; `Shape::from_raw` enforces which ones are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawShape {
    pub label: Option<String>,
    /// Vertex list in the annotation tool's (x, y) = (col, row) order.
    pub points: Option<Vec<[f64; 2]>>,
    pub shape_type: Option<ShapeType>,
    #[serde(default)]
    pub flags: Option<BTreeMap<String, bool>>,
}

/// A validated annotation shape in the core (row, col) convention.
#[derive(Debug, Clone)]
pub struct Shape {
    pub label: String,
    pub points: Vec<Point2<f64>>,
    pub shape_type: ShapeType,
    pub flags: BTreeMap<String, bool>,
}

impl Shape {
    /// Validate a raw record and convert its vertices to (row, col).
    pub fn from_raw(raw: RawShape) -> Result<Self> {
        let label = raw
            .label
            .ok_or_else(|| DendroError::MalformedShape("shape record has no label".to_string()))?;

        let shape_type = raw.shape_type.ok_or_else(|| {
            DendroError::MalformedShape(format!("shape '{}' has no shape_type", label))
        })?;

        let raw_points = raw
            .points
            .ok_or_else(|| DendroError::MalformedShape(format!("shape '{}' has no points", label)))?;

        if raw_points.is_empty() {
            return Err(DendroError::MalformedShape(format!(
                "shape '{}' has an empty point list",
                label
            )));
        }

        // Stored (x, y) becomes (row, col) = (y, x)
        let points = raw_points
            .iter()
            .map(|&[x, y]| Point2::new(y, x))
            .collect();

        Ok(Shape {
            label,
            points,
            shape_type,
            flags: raw.flags.unwrap_or_default(),
        })
    }

    /// Convert back to the on-disk record, restoring (x, y) vertex order.
    pub fn to_raw(&self) -> RawShape {
        RawShape {
            label: Some(self.label.clone()),
            points: Some(self.points.iter().map(|p| [p.y, p.x]).collect()),
            shape_type: Some(self.shape_type),
            flags: Some(self.flags.clone()),
        }
    }

    /// Planar area enclosed by the shape. Non-polygon kinds enclose nothing
    /// and report 0.
    pub fn area(&self) -> f64 {
        match self.shape_type {
            ShapeType::Polygon => geometry::polygon_area(&self.points),
            _ => 0.0,
        }
    }
}
