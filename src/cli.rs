use crate::batch::BatchRunner;
use crate::convert::{Converter, DEFAULT_QUALITY};
use crate::error::Result;
use crate::utils;
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// How many converted files / errors to list before truncating.
const MAX_LISTED: usize = 10;

#[derive(Parser, Debug)]
#[command(
    name = "png_to_jpg_converter",
    version,
    about = "Batch convert PNG files to JPG format"
)]
pub struct Cli {
    /// Input directory containing PNG files
    pub input_dir: Option<PathBuf>,

    /// Output directory (default: same as input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JPG quality 1-100
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub quality: u8,

    /// Launch the graphical interface
    #[arg(long)]
    pub gui: bool,
}

/// Command-line conversion: progress bar while converting, then a summary
/// with truncated success/error listings.
pub fn run(input_dir: &Path, output_dir: Option<&Path>, quality: u8) -> Result<()> {
    utils::print_info(&format!("Converting PNG files in: {}", input_dir.display()));
    utils::print_info(&format!(
        "Output directory: {}",
        output_dir.unwrap_or(input_dir).display()
    ));
    utils::print_info(&format!("Quality: {}", quality));

    let pb = utils::progress_bar(0);
    let runner = BatchRunner::new(Converter::with_quality(quality));
    let outcome = runner.run(input_dir, output_dir, |index, total, filename| {
        pb.set_length(total as u64);
        pb.set_position(index as u64);
        pb.set_message(filename.to_string());
    })?;
    pb.finish_and_clear();

    utils::print_done(&format!(
        "Converted {} file(s), {} error(s)",
        outcome.converted.len(),
        outcome.errors.len()
    ));

    if !outcome.converted.is_empty() {
        for path in outcome.converted.iter().take(MAX_LISTED) {
            println!("  {} {}", "✓".green(), path.display());
        }
        if outcome.converted.len() > MAX_LISTED {
            println!("  ... and {} more", outcome.converted.len() - MAX_LISTED);
        }
    }

    if !outcome.errors.is_empty() {
        println!();
        for error in outcome.errors.iter().take(MAX_LISTED) {
            println!("  {} {}", "✗".red(), error);
        }
        if outcome.errors.len() > MAX_LISTED {
            println!("  ... and {} more errors", outcome.errors.len() - MAX_LISTED);
        }
    }

    Ok(())
}
