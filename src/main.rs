mod annotation_io;
mod config;
mod errors;
mod geometry;
mod matching;
mod metrics;
mod output;
mod pipeline;
mod rings;
mod shapes;

#[cfg(test)]
mod test_utils;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use rayon::prelude::*;

use annotation_io::find_sample_dirs;
use config::Config;
use errors::{DendroError, Result};
use pipeline::process_sample;

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "DendroRingsR - Annual Ring Measurement Reconstruction"
)]
struct Args {
    /// Path to a sample directory or a batch root of sample directories
    #[clap(short, long)]
    input: Option<String>,

    /// Path to output directory
    #[clap(short, long)]
    output: Option<String>,

    /// Path to configuration file
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    /// Base year of the chronology (overwrites config)
    #[clap(short, long)]
    year: Option<i32>,

    /// Enable debug mode (print per-sample detail)
    #[clap(short, long)]
    debug: bool,
}

/// Main function
fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_file(&args.config)?;

    // Override config with command-line arguments
    if let Some(input) = args.input.clone() {
        config.input_path = input;
    }

    if let Some(output) = args.output.clone() {
        config.output_base_dir = output;
    }

    if let Some(year) = args.year {
        config.year = year;
    }

    // Validate configuration
    config.validate()?;

    // Start timing
    let start_time = Instant::now();

    let input_path = PathBuf::from(&config.input_path);

    if input_path.join(&config.latewood_filename).is_file() {
        // A directory holding the annotation files is a single sample
        println!("Processing single sample: {}", input_path.display());
        let report = process_sample(&input_path, &config, args.debug)?;
        println!(
            "Sample {}: {} rings ({} skipped)",
            report.sample_name, report.ring_count, report.skipped_count
        );
    } else if input_path.is_dir() {
        // Otherwise treat it as a batch root of sample directories
        println!("Processing batch directory: {}", input_path.display());
        let sample_dirs = find_sample_dirs(&input_path, &config.latewood_filename)?;

        println!("Found {} sample directories", sample_dirs.len());

        if sample_dirs.is_empty() {
            return Err(DendroError::Config(format!(
                "no sample directories with '{}' found under '{}'",
                config.latewood_filename,
                input_path.display()
            )));
        }

        if config.use_parallel {
            // Process samples in parallel
            sample_dirs.par_iter().for_each(|dir| {
                println!("Processing: {}", dir.display());
                match process_sample(dir, &config, args.debug) {
                    Ok(report) => println!(
                        "Sample {}: {} rings ({} skipped)",
                        report.sample_name, report.ring_count, report.skipped_count
                    ),
                    Err(e) => eprintln!("Error processing {}: {}", dir.display(), e),
                }
            });
        } else {
            // Process samples sequentially
            for dir in &sample_dirs {
                println!("Processing: {}", dir.display());
                let report = process_sample(dir, &config, args.debug)?;
                println!(
                    "Sample {}: {} rings ({} skipped)",
                    report.sample_name, report.ring_count, report.skipped_count
                );
            }
        }
    } else {
        return Err(DendroError::InvalidPath(input_path));
    }

    // Report elapsed time
    let elapsed = start_time.elapsed();
    println!("Processing completed in {:.2} seconds", elapsed.as_secs_f64());

    Ok(())
}
