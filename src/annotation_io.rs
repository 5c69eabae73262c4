// src/annotation_io.rs - Labelme document codec and boundary set loaders

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{DendroError, Result};
use crate::shapes::{RawShape, Shape};

/// Document version written by the annotation tool this adapter targets.
const LABELME_VERSION: &str = "4.5.6";

fn default_version() -> String {
    LABELME_VERSION.to_string()
}

/// A complete labelme annotation document as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelmeDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    #[serde(default)]
    pub shapes: Vec<RawShape>,
    #[serde(rename = "imagePath", default)]
    pub image_path: String,
    #[serde(rename = "imageData")]
    pub image_data: Option<String>,
    #[serde(rename = "imageHeight", default)]
    pub image_height: u32,
    #[serde(rename = "imageWidth", default)]
    pub image_width: u32,
}

impl LabelmeDocument {
    /// Wrap a shape list in a fresh document shell (no backing image).
    pub fn from_shapes(shapes: &[Shape]) -> Self {
        LabelmeDocument {
            version: default_version(),
            flags: BTreeMap::new(),
            shapes: shapes.iter().map(Shape::to_raw).collect(),
            image_path: String::new(),
            image_data: None,
            image_height: 0,
            image_width: 0,
        }
    }
}

/// Parse a labelme document and return its shapes sorted by ascending area.
///
/// For concentric annual-ring annotations, ascending area is pith-to-bark
/// (oldest ring first) order; the matching stage depends on receiving
/// boundaries in exactly this order.
pub fn parse_annotation_document(text: &str) -> Result<Vec<Shape>> {
    let document: LabelmeDocument = serde_json::from_str(text)?;

    let mut shapes = document
        .shapes
        .into_iter()
        .map(Shape::from_raw)
        .collect::<Result<Vec<Shape>>>()?;

    shapes.sort_by(|a, b| a.area().partial_cmp(&b.area()).unwrap_or(Ordering::Equal));

    Ok(shapes)
}

fn read_shapes_from_file(path: &Path) -> Result<Vec<Shape>> {
    if !path.is_file() {
        return Err(DendroError::InvalidPath(path.to_path_buf()));
    }

    let text = fs::read_to_string(path)?;
    parse_annotation_document(&text)
}

fn write_shapes_to_file(path: &Path, shapes: &[Shape]) -> Result<()> {
    let document = LabelmeDocument::from_shapes(shapes);
    let text = serde_json::to_string_pretty(&document)?;
    fs::write(path, text)?;
    Ok(())
}

/// Collect the sample directories under a batch root: every immediate
/// subdirectory that holds the late-wood annotation file, in name order.
pub fn find_sample_dirs<P: AsRef<Path>>(
    batch_root: P,
    latewood_filename: &str,
) -> Result<Vec<PathBuf>> {
    let batch_root = batch_root.as_ref();

    if !batch_root.exists() {
        return Err(DendroError::InvalidPath(batch_root.to_path_buf()));
    }

    if !batch_root.is_dir() {
        return Err(DendroError::Config(format!(
            "{} is not a directory",
            batch_root.display()
        )));
    }

    let mut sample_dirs = Vec::new();
    for entry in fs::read_dir(batch_root).map_err(DendroError::Io)? {
        let entry = entry.map_err(DendroError::Io)?;
        let path = entry.path();
        if path.is_dir() && path.join(latewood_filename).is_file() {
            sample_dirs.push(path);
        }
    }

    sample_dirs.sort();

    Ok(sample_dirs)
}

/// A named set of boundary annotations that can be loaded and stored.
pub trait AnnotationSet {
    /// Load the boundary shapes, sorted by ascending enclosed area.
    fn read(&self) -> Result<Vec<Shape>>;

    /// Store shapes as a complete labelme document.
    fn write(&self, shapes: &[Shape]) -> Result<()>;
}

/// Late-wood boundary annotations for one sample. These close each annual
/// ring and are the primary input: every ring has one.
pub struct LatewoodAnnotations {
    path: PathBuf,
}

impl LatewoodAnnotations {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        LatewoodAnnotations { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnnotationSet for LatewoodAnnotations {
    fn read(&self) -> Result<Vec<Shape>> {
        read_shapes_from_file(&self.path)
    }

    fn write(&self, shapes: &[Shape]) -> Result<()> {
        write_shapes_to_file(&self.path, shapes)
    }
}

/// Early-wood boundary annotations for one sample. Optional input: samples
/// annotated without an early/late split simply have no such file.
pub struct EarlywoodAnnotations {
    path: PathBuf,
}

impl EarlywoodAnnotations {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        EarlywoodAnnotations { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if the annotation file exists on disk.
    pub fn is_present(&self) -> bool {
        self.path.is_file()
    }
}

impl AnnotationSet for EarlywoodAnnotations {
    fn read(&self) -> Result<Vec<Shape>> {
        read_shapes_from_file(&self.path)
    }

    fn write(&self, shapes: &[Shape]) -> Result<()> {
        write_shapes_to_file(&self.path, shapes)
    }
}
