use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while editing, packing or converting bitmaps.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("rotate must be one of 90, 180, 270 (got {0})")]
    InvalidRotation(i32),

    #[error("pad values must be >= 0 (pad-{side} = {value})")]
    InvalidPadding { side: &'static str, value: i64 },

    #[error("unknown packing mode: {0:?} (expected 'row' or 'page')")]
    UnknownPackMode(String),

    #[error("unknown sort order: {0:?} (expected 'alpha' or 'natural')")]
    UnknownSortOrder(String),

    #[error("invalid draw: {0}")]
    InvalidDraw(String),

    #[error("draw out of bounds: ({x},{y}) for size {width}x{height}")]
    DrawOutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("image too large: {0}")]
    ImageTooLarge(String),

    #[error("malformed bit grid: {0}")]
    MalformedGrid(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Not a BMP file: {}", .0.display())]
    NotBmp(PathBuf),

    #[error("Input is not 1-bpp (bpp={bpp}): {name}. Pass --allow-threshold.")]
    NotOneBpp { name: String, bpp: u16 },

    #[error("Not a folder: {}", .0.display())]
    NotAFolder(PathBuf),

    #[error("No .bmp files found in {}", .0.display())]
    NoBmpFiles(PathBuf),

    #[error("Mixed image sizes after edits ({0}); pass --group-by-size to emit separate matrices.")]
    MixedSizes(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for ConvertError {
    fn from(e: image::ImageError) -> Self {
        ConvertError::Image(e.to_string())
    }
}
