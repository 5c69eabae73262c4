// src/pipeline.rs - Single-sample processing

use std::path::{Path, PathBuf};

use crate::annotation_io::{AnnotationSet, EarlywoodAnnotations, LatewoodAnnotations};
use crate::config::Config;
use crate::errors::{DendroError, Result};
use crate::matching::match_annual_rings;
use crate::metrics::compute_measurements;
use crate::output::write_measurements_csv;

/// Summary of one processed sample.
#[derive(Debug)]
pub struct SampleReport {
    pub sample_name: String,
    pub ring_count: usize,
    pub skipped_count: usize,
    pub output_path: PathBuf,
}

/// Process a single sample directory: load both boundary sets, reconstruct
/// the ring sequence, compute the measurement table and write it to
/// `<output_base_dir>/<sample>/measurements.csv`.
pub fn process_sample(sample_dir: &Path, config: &Config, debug: bool) -> Result<SampleReport> {
    let sample_name = sample_dir
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("sample")
        .to_string();

    // Step 1: Load the late-wood boundaries (required)
    let latewood = LatewoodAnnotations::new(sample_dir.join(&config.latewood_filename));
    let late_shapes = latewood.read()?;
    if late_shapes.is_empty() {
        return Err(DendroError::EmptyBoundarySet);
    }

    // Step 2: Load the early-wood boundaries when the sample has them
    let earlywood = EarlywoodAnnotations::new(sample_dir.join(&config.earlywood_filename));
    let early_shapes = if earlywood.is_present() {
        Some(earlywood.read()?)
    } else {
        None
    };

    if debug {
        println!(
            "Sample {}: {} late-wood boundaries, {} early-wood boundaries",
            sample_name,
            late_shapes.len(),
            early_shapes.as_ref().map_or(0, Vec::len)
        );
    }

    // Step 3: Reconstruct the annual rings
    let matching = match_annual_rings(&late_shapes, early_shapes.as_deref());
    for skipped in &matching.skipped {
        eprintln!(
            "Warning: sample {}: skipped boundary {} ('{}'): {}",
            sample_name, skipped.index, skipped.label, skipped.reason
        );
    }

    // Step 4: Compute the calibrated measurements
    let rows = compute_measurements(&matching.rings, &config.calibration())?;

    // Step 5: Write the measurement table
    let output_dir = PathBuf::from(&config.output_base_dir).join(&sample_name);
    write_measurements_csv(&rows, &output_dir, &config.unit)?;

    let output_path = output_dir.join("measurements.csv");
    if debug {
        println!(
            "Sample {}: wrote {} rows to {}",
            sample_name,
            rows.len(),
            output_path.display()
        );
    }

    Ok(SampleReport {
        sample_name,
        ring_count: matching.rings.len(),
        skipped_count: matching.skipped.len(),
        output_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Shape, ShapeType};
    use crate::test_utils::square_with_area;
    use nalgebra::Point2;
    use std::collections::BTreeMap;
    use std::fs;

    fn polygon_shape(label: &str, points: Vec<Point2<f64>>) -> Shape {
        Shape {
            label: label.to_string(),
            points,
            shape_type: ShapeType::Polygon,
            flags: BTreeMap::new(),
        }
    }

    fn write_latewood(dir: &Path, shapes: &[Shape]) {
        let set = LatewoodAnnotations::new(dir.join("latewood.json"));
        set.write(shapes).unwrap();
    }

    fn test_config(input: &Path, output: &Path) -> Config {
        let mut config = Config::default();
        config.input_path = input.to_string_lossy().to_string();
        config.output_base_dir = output.to_string_lossy().to_string();
        config.year = 2000;
        config.plantation_date = true;
        config.pixels_to_unit_scale = 0.5;
        config
    }

    #[test]
    fn test_process_sample_writes_measurements() {
        let dir = tempfile::tempdir().unwrap();
        let sample_dir = dir.path().join("C14");
        fs::create_dir_all(&sample_dir).unwrap();

        write_latewood(
            &sample_dir,
            &[
                polygon_shape("ring_1", square_with_area(50.0, 50.0, 100.0)),
                polygon_shape("ring_2", square_with_area(50.0, 50.0, 300.0)),
                polygon_shape("ring_3", square_with_area(50.0, 50.0, 700.0)),
            ],
        );

        let output = dir.path().join("output");
        let config = test_config(&sample_dir, &output);

        let report = process_sample(&sample_dir, &config, false).unwrap();

        assert_eq!(report.ring_count, 3);
        assert_eq!(report.skipped_count, 0);
        assert_eq!(report.sample_name, "C14");

        let written = fs::read_to_string(&report.output_path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("ring_1,,2000,25.00,"));
        assert!(lines[2].starts_with("ring_2,,2001,50.00,"));
        assert!(lines[3].starts_with("ring_3,,2002,100.00,"));
    }

    #[test]
    fn test_process_sample_skips_misnested_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let sample_dir = dir.path().join("sample_b");
        fs::create_dir_all(&sample_dir).unwrap();

        // The middle boundary is disjoint from the first, so its ring is
        // rejected but processing continues
        write_latewood(
            &sample_dir,
            &[
                polygon_shape("ring_1", square_with_area(50.0, 50.0, 100.0)),
                polygon_shape("ring_2", square_with_area(500.0, 500.0, 200.0)),
                polygon_shape("ring_3", square_with_area(500.0, 500.0, 700.0)),
            ],
        );

        let output = dir.path().join("output");
        let config = test_config(&sample_dir, &output);

        let report = process_sample(&sample_dir, &config, false).unwrap();
        assert_eq!(report.ring_count, 2);
        assert_eq!(report.skipped_count, 1);
    }

    #[test]
    fn test_process_sample_without_latewood_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let sample_dir = dir.path().join("empty_sample");
        fs::create_dir_all(&sample_dir).unwrap();

        let output = dir.path().join("output");
        let config = test_config(&sample_dir, &output);

        assert!(matches!(
            process_sample(&sample_dir, &config, false),
            Err(DendroError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_process_sample_with_no_boundaries_fails() {
        let dir = tempfile::tempdir().unwrap();
        let sample_dir = dir.path().join("blank_sample");
        fs::create_dir_all(&sample_dir).unwrap();
        write_latewood(&sample_dir, &[]);

        let output = dir.path().join("output");
        let config = test_config(&sample_dir, &output);

        assert!(matches!(
            process_sample(&sample_dir, &config, false),
            Err(DendroError::EmptyBoundarySet)
        ));
    }

    #[test]
    fn test_process_sample_attaches_early_boundaries() {
        let dir = tempfile::tempdir().unwrap();
        let sample_dir = dir.path().join("sample_ew");
        fs::create_dir_all(&sample_dir).unwrap();

        write_latewood(
            &sample_dir,
            &[
                polygon_shape("ring_1", square_with_area(50.0, 50.0, 100.0)),
                polygon_shape("ring_2", square_with_area(50.0, 50.0, 300.0)),
            ],
        );
        let earlywood = EarlywoodAnnotations::new(sample_dir.join("earlywood.json"));
        earlywood
            .write(&[polygon_shape("early_2", square_with_area(50.0, 50.0, 200.0))])
            .unwrap();

        let output = dir.path().join("output");
        let config = test_config(&sample_dir, &output);

        let report = process_sample(&sample_dir, &config, false).unwrap();
        assert_eq!(report.ring_count, 2);

        let written = fs::read_to_string(&report.output_path).unwrap();
        assert!(written.lines().nth(2).unwrap().starts_with("ring_2,early_2,"));
    }
}
