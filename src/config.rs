// src/config.rs - Run configuration and measurement calibration

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::errors::{DendroError, Result};

/// Configuration for DendroRingsR
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// A sample directory, or a batch root whose subdirectories are samples
    pub input_path: String,
    pub output_base_dir: String,

    #[serde(default = "default_latewood_filename")]
    pub latewood_filename: String,

    #[serde(default = "default_earlywood_filename")]
    pub earlywood_filename: String,

    /// Calendar year of the innermost ring (plantation year) or of the
    /// outermost ring (sampling year), selected by `plantation_date`
    pub year: i32,

    /// true: count years forward from the pith; false: count backward from
    /// the bark
    pub plantation_date: bool,

    /// Physical units per pixel
    pub pixels_to_unit_scale: f64,

    #[serde(default = "default_unit")]
    pub unit: String,

    #[serde(default = "default_parallel")]
    pub use_parallel: bool,
}

/// Calibration constants consumed by the metrics engine.
#[derive(Debug, Clone)]
pub struct Calibration {
    pub year: i32,
    pub plantation_date: bool,
    pub pixels_to_unit_scale: f64,
    pub unit: String,
}

fn default_latewood_filename() -> String {
    "latewood.json".to_string()
}

fn default_earlywood_filename() -> String {
    "earlywood.json".to_string()
}

fn default_unit() -> String {
    "mm".to_string()
}

fn default_parallel() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DendroError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| DendroError::ConfigLoad {
            source: e,
            path: path.to_path_buf(),
        })?;

        Ok(config)
    }

    /// Create default configuration
    pub fn default() -> Self {
        Self {
            input_path: "./input".to_string(),
            output_base_dir: "./output".to_string(),
            latewood_filename: default_latewood_filename(),
            earlywood_filename: default_earlywood_filename(),
            year: 2007,
            plantation_date: true,
            pixels_to_unit_scale: 1.0,
            unit: default_unit(),
            use_parallel: true,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Check input path exists
        let input_path = PathBuf::from(&self.input_path);
        if !input_path.exists() {
            return Err(DendroError::InvalidPath(input_path));
        }

        if self.latewood_filename.is_empty() {
            return Err(DendroError::Config(
                "latewood_filename must not be empty".to_string(),
            ));
        }

        if !self.pixels_to_unit_scale.is_finite() || self.pixels_to_unit_scale <= 0.0 {
            return Err(DendroError::Config(
                "pixels_to_unit_scale must be finite and > 0.0".to_string(),
            ));
        }

        if self.unit.is_empty() {
            return Err(DendroError::Config("unit must not be empty".to_string()));
        }

        // Calendar arithmetic on the chronology is bounded to 4-digit years
        if self.year < 1 || self.year > 9999 {
            return Err(DendroError::Config(
                "year must be between 1 and 9999".to_string(),
            ));
        }

        // Create the output directory if it doesn't exist
        let base_dir = PathBuf::from(&self.output_base_dir);
        fs::create_dir_all(&base_dir).map_err(|e| {
            DendroError::Io(io::Error::new(
                ErrorKind::Other,
                format!("Failed to create output directory: {}", e),
            ))
        })?;

        Ok(())
    }

    /// Extract the calibration constants for the metrics engine
    pub fn calibration(&self) -> Calibration {
        Calibration {
            year: self.year,
            plantation_date: self.plantation_date,
            pixels_to_unit_scale: self.pixels_to_unit_scale,
            unit: self.unit.clone(),
        }
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DendroError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content).map_err(DendroError::Io)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const MINIMAL_TOML: &str = r#"
        input_path = "./input"
        output_base_dir = "./output"
        year = 2000
        plantation_date = true
        pixels_to_unit_scale = 0.5
    "#;

    #[test]
    fn test_minimal_toml_fills_defaults() {
        let config: Config = toml::from_str(MINIMAL_TOML).unwrap();
        assert_eq!(config.latewood_filename, "latewood.json");
        assert_eq!(config.earlywood_filename, "earlywood.json");
        assert_eq!(config.unit, "mm");
        assert!(config.use_parallel);
        assert_approx_eq!(config.pixels_to_unit_scale, 0.5);
    }

    #[test]
    fn test_missing_required_field_fails() {
        let result: std::result::Result<Config, _> = toml::from_str(
            r#"
            input_path = "./input"
            output_base_dir = "./output"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_missing_input_path() {
        let mut config = Config::default();
        config.input_path = "/nonexistent/dendro/input".to_string();
        assert!(matches!(
            config.validate(),
            Err(DendroError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_scale() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.input_path = dir.path().to_string_lossy().to_string();
        config.output_base_dir = dir.path().join("out").to_string_lossy().to_string();
        config.pixels_to_unit_scale = 0.0;

        match config.validate() {
            Err(DendroError::Config(message)) => {
                assert!(message.contains("pixels_to_unit_scale"))
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_year() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.input_path = dir.path().to_string_lossy().to_string();
        config.output_base_dir = dir.path().join("out").to_string_lossy().to_string();
        config.year = 0;

        assert!(matches!(config.validate(), Err(DendroError::Config(_))));
    }

    #[test]
    fn test_validate_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("fresh_output");
        let mut config = Config::default();
        config.input_path = dir.path().to_string_lossy().to_string();
        config.output_base_dir = out.to_string_lossy().to_string();

        config.validate().unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn test_from_file_reports_parse_failures_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "year = \"not a number\"").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(DendroError::ConfigLoad { .. })
        ));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.year = 1983;
        config.plantation_date = false;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.year, 1983);
        assert!(!loaded.plantation_date);
        assert_eq!(loaded.unit, "mm");
    }
}
