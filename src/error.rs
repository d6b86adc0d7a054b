use thiserror::Error;

/// Unified error type for the conversion core.
///
/// `FileNotFound`/`DirectoryNotFound` on the batch root abort the whole run;
/// any variant raised while processing a single file is recorded in the batch
/// outcome and the run continues.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Failed to read file: {path}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory: {path}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },

    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: String,
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
