use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for the command-line conversion loop.
///
/// Created with length 0; the batch callback sets the real length once
/// discovery has counted the files.
pub fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// Timestamp prefix for GUI log lines.
pub fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
