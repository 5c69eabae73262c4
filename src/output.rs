// src/output.rs - Measurement table CSV export

use csv::Writer;
use std::fs;
use std::path::Path;

use crate::errors::{DendroError, Result};
use crate::metrics::MetricsRow;

/// Column names of the measurement table, parameterized by physical unit.
pub struct TableHeaders {
    pub main_label: String,
    pub ew_lw_label: String,
    pub year: String,
    pub ring_area: String,
    pub cumulative_area: String,
    pub cumulative_radius: String,
    pub annual_ring_width: String,
    pub ew_area: String,
    pub cumulative_ew_area: String,
    pub cumulative_ew_radius: String,
    pub ew_width: String,
    pub lw_area: String,
    pub lw_width: String,
    pub lw_area_ratio: String,
    pub lw_width_ratio: String,
    pub eccentricity_module: String,
    pub eccentricity_phase: String,
    pub perimeter: String,
    pub ring_similarity_factor: String,
}

impl TableHeaders {
    pub fn new(unit: &str) -> Self {
        TableHeaders {
            main_label: "Annual Ring (label)".to_string(),
            ew_lw_label: "EW/LW label".to_string(),
            year: "Year".to_string(),
            ring_area: format!("Ring Area [{}2]", unit),
            cumulative_area: format!("Cumulative Area [{}2]", unit),
            cumulative_radius: format!("Cumulative Annual Radius [{}]", unit),
            annual_ring_width: format!("Annual Ring Width [{}]", unit),
            ew_area: format!("Area EW [{}2]", unit),
            cumulative_ew_area: format!("Cumulative R(n-1) + EW(n) Area [{}2]", unit),
            cumulative_ew_radius: format!("Cumulative EW Radius [{}]", unit),
            ew_width: format!("EW Width [{}]", unit),
            lw_area: format!("Area LW [{}2]", unit),
            lw_width: format!("LW Width [{}]", unit),
            lw_area_ratio: "Area LW/(LW +EW) (-)".to_string(),
            lw_width_ratio: "Width LW/(LW +EW) (-)".to_string(),
            eccentricity_module: format!("Eccentricity Module [{}]", unit),
            eccentricity_phase: "Eccentricity Phase [°]".to_string(),
            perimeter: format!("Perimeter [{}]", unit),
            ring_similarity_factor: "Ring Similarity Factor [0-1]".to_string(),
        }
    }

    /// Columns in table order.
    fn to_record(&self) -> [&str; 19] {
        [
            &self.main_label,
            &self.ew_lw_label,
            &self.year,
            &self.ring_area,
            &self.cumulative_area,
            &self.cumulative_radius,
            &self.annual_ring_width,
            &self.ew_area,
            &self.cumulative_ew_area,
            &self.cumulative_ew_radius,
            &self.ew_width,
            &self.lw_area,
            &self.lw_width,
            &self.lw_area_ratio,
            &self.lw_width_ratio,
            &self.eccentricity_module,
            &self.eccentricity_phase,
            &self.perimeter,
            &self.ring_similarity_factor,
        ]
    }
}

/// Write the measurement table to `<output_dir>/measurements.csv`, one row
/// per ring, all numeric columns rounded to 2 decimal places.
pub fn write_measurements_csv<P: AsRef<Path>>(
    rows: &[MetricsRow],
    output_dir: P,
    unit: &str,
) -> Result<()> {
    let output_dir = output_dir.as_ref();
    let output_path = output_dir.join("measurements.csv");

    // Create directory if it doesn't exist
    fs::create_dir_all(output_dir).map_err(DendroError::Io)?;

    // Create CSV writer
    let mut writer = Writer::from_path(&output_path).map_err(DendroError::CsvOutput)?;

    // Write header
    let headers = TableHeaders::new(unit);
    writer
        .write_record(headers.to_record())
        .map_err(DendroError::CsvOutput)?;

    // Write data
    for row in rows {
        writer
            .write_record(&[
                row.main_label.clone(),
                row.secondary_label.clone().unwrap_or_default(),
                row.year.to_string(),
                format!("{:.2}", row.ring_area),
                format!("{:.2}", row.cumulative_area),
                format!("{:.2}", row.cumulative_radius),
                format!("{:.2}", row.annual_ring_width),
                format!("{:.2}", row.ew_area),
                format!("{:.2}", row.cumulative_ew_area),
                format!("{:.2}", row.cumulative_ew_radius),
                format!("{:.2}", row.ew_width),
                format!("{:.2}", row.lw_area),
                format!("{:.2}", row.lw_width),
                format!("{:.2}", row.lw_area_ratio),
                format!("{:.2}", row.lw_width_ratio),
                format!("{:.2}", row.eccentricity_module),
                format!("{:.2}", row.eccentricity_phase),
                format!("{:.2}", row.perimeter),
                format!("{:.2}", row.ring_similarity_factor),
            ])
            .map_err(DendroError::CsvOutput)?;
    }

    // Flush writer
    writer
        .flush()
        .map_err(|e| DendroError::CsvOutput(csv::Error::from(e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> MetricsRow {
        MetricsRow {
            main_label: "ring_1".to_string(),
            secondary_label: None,
            year: 2000,
            ring_area: 25.0,
            cumulative_area: 25.0,
            cumulative_radius: 2.8209,
            annual_ring_width: 2.8209,
            ew_area: 0.0,
            cumulative_ew_area: 0.0,
            cumulative_ew_radius: 0.0,
            ew_width: 0.0,
            lw_area: 25.0,
            lw_width: 2.8209,
            lw_area_ratio: 1.0,
            lw_width_ratio: 1.0,
            eccentricity_module: 0.0,
            eccentricity_phase: 0.0,
            perimeter: 20.0,
            ring_similarity_factor: 0.886,
        }
    }

    #[test]
    fn test_headers_carry_the_unit() {
        let headers = TableHeaders::new("mm");
        assert_eq!(headers.ring_area, "Ring Area [mm2]");
        assert_eq!(headers.cumulative_radius, "Cumulative Annual Radius [mm]");
        assert_eq!(headers.cumulative_ew_area, "Cumulative R(n-1) + EW(n) Area [mm2]");
        assert_eq!(headers.lw_area_ratio, "Area LW/(LW +EW) (-)");
        assert_eq!(headers.ring_similarity_factor, "Ring Similarity Factor [0-1]");

        let micrometer = TableHeaders::new("micrometer");
        assert_eq!(micrometer.perimeter, "Perimeter [micrometer]");
        assert_eq!(micrometer.ew_area, "Area EW [micrometer2]");
    }

    #[test]
    fn test_write_measurements_rounds_to_two_decimals() {
        let dir = tempfile::tempdir().unwrap();
        write_measurements_csv(&[sample_row()], dir.path(), "mm").unwrap();

        let written = fs::read_to_string(dir.path().join("measurements.csv")).unwrap();
        let mut lines = written.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("Annual Ring (label),EW/LW label,Year,Ring Area [mm2]"));

        let data = lines.next().unwrap();
        assert!(data.starts_with("ring_1,,2000,25.00,25.00,2.82,2.82,"));
        assert!(data.ends_with("20.00,0.89"));
    }

    #[test]
    fn test_write_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("batch").join("sample_a");

        write_measurements_csv(&[sample_row()], &nested, "mm").unwrap();
        assert!(nested.join("measurements.csv").is_file());
    }

    #[test]
    fn test_secondary_label_written_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let mut row = sample_row();
        row.secondary_label = Some("early_1".to_string());

        write_measurements_csv(&[row], dir.path(), "mm").unwrap();
        let written = fs::read_to_string(dir.path().join("measurements.csv")).unwrap();
        assert!(written.lines().nth(1).unwrap().starts_with("ring_1,early_1,2000,"));
    }
}
