use crate::convert::Converter;
use crate::error::{ConvertError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const NO_FILES_MESSAGE: &str = "No PNG files found in the specified directory";

/// Aggregate outcome of a batch run.
///
/// `converted` and `errors` are both in discovery order; every discovered
/// file lands in exactly one of the two lists.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub converted: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.converted.len() + self.errors.len()
    }
}

/// Runs the converter over every PNG file under a directory, sequentially.
pub struct BatchRunner {
    converter: Converter,
}

impl BatchRunner {
    pub fn new(converter: Converter) -> Self {
        Self { converter }
    }

    /// Convert all PNG files under `input_dir`.
    ///
    /// `on_progress` is called with `(index, total, filename)` before each
    /// file and once more at the end with `index == total`. A missing input
    /// directory is fatal; a failure on an individual file is recorded as
    /// `"filename: message"` and the batch continues. An input directory with
    /// no PNG files yields an empty success list and a single explanatory
    /// message rather than an error.
    pub fn run<F>(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        mut on_progress: F,
    ) -> Result<BatchOutcome>
    where
        F: FnMut(usize, usize, &str),
    {
        if !input_dir.is_dir() {
            return Err(ConvertError::DirectoryNotFound {
                path: input_dir.display().to_string(),
            });
        }

        let files = find_png_files(input_dir);
        if files.is_empty() {
            return Ok(BatchOutcome {
                converted: Vec::new(),
                errors: vec![NO_FILES_MESSAGE.to_string()],
            });
        }

        let total = files.len();
        let mut outcome = BatchOutcome::default();

        for (index, path) in files.iter().enumerate() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            on_progress(index, total, &name);

            match self.converter.convert_file(path, output_dir) {
                Ok(output) => outcome.converted.push(output),
                Err(e) => outcome.errors.push(format!("{}: {}", name, e)),
            }
        }

        on_progress(total, total, "Conversion complete!");

        Ok(outcome)
    }
}

/// Recursively collect files with a `png` extension in either case.
///
/// Entries are sorted by file name so the processing order is deterministic
/// across platforms.
pub fn find_png_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let img = RgbaImage::from_pixel(4, 4, Rgba([200, 100, 50, 255]));
        img.save_with_format(&path, ImageFormat::Png).unwrap();
        path
    }

    fn runner() -> BatchRunner {
        BatchRunner::new(Converter::default())
    }

    #[test]
    fn missing_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("does-not-exist");

        let err = runner().run(&missing, None, |_, _, _| {}).unwrap_err();

        assert!(matches!(err, ConvertError::DirectoryNotFound { .. }));
    }

    #[test]
    fn empty_directory_yields_single_message() {
        let tmp = TempDir::new().unwrap();

        let outcome = runner().run(tmp.path(), None, |_, _, _| {}).unwrap();

        assert!(outcome.converted.is_empty());
        assert_eq!(outcome.errors, vec![NO_FILES_MESSAGE.to_string()]);
    }

    #[test]
    fn discovers_mixed_case_and_nested_extensions() {
        let tmp = TempDir::new().unwrap();
        write_png(tmp.path(), "a.png");
        let sub = tmp.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        write_png(&sub, "b.PNG");
        std::fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let files = find_png_files(tmp.path());

        assert_eq!(files.len(), 2);
    }

    #[test]
    fn corrupt_file_does_not_halt_the_batch() {
        let tmp = TempDir::new().unwrap();
        write_png(tmp.path(), "a.png");
        write_png(tmp.path(), "b.png");
        std::fs::write(tmp.path().join("broken.png"), b"not a png").unwrap();

        let outcome = runner().run(tmp.path(), None, |_, _, _| {}).unwrap();

        assert_eq!(outcome.converted.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.total(), 3);
        assert!(outcome.errors[0].starts_with("broken.png:"));
    }

    #[test]
    fn progress_callback_runs_per_file_and_once_at_the_end() {
        let tmp = TempDir::new().unwrap();
        write_png(tmp.path(), "a.png");
        write_png(tmp.path(), "b.png");

        let mut calls: Vec<(usize, usize, String)> = Vec::new();
        runner()
            .run(tmp.path(), None, |index, total, name| {
                calls.push((index, total, name.to_string()));
            })
            .unwrap();

        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], (0, 2, "a.png".to_string()));
        assert_eq!(calls[1], (1, 2, "b.png".to_string()));
        assert_eq!(calls[2], (2, 2, "Conversion complete!".to_string()));
    }

    #[test]
    fn outputs_collect_into_the_requested_directory() {
        let tmp = TempDir::new().unwrap();
        write_png(tmp.path(), "a.png");
        let sub = tmp.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        write_png(&sub, "b.png");
        let out = tmp.path().join("out");

        let outcome = runner().run(tmp.path(), Some(&out), |_, _, _| {}).unwrap();

        assert_eq!(outcome.converted.len(), 2);
        for path in &outcome.converted {
            assert!(path.starts_with(&out));
            assert!(path.exists());
        }
    }
}
