//! # bmp2c
//!
//! Converts 1-bpp BMP images into C source arrays for embedded displays.
//!
//! Each image goes through the same steps:
//!
//! 1. decode into a [`BitGrid`] ([`bmp`])
//! 2. apply geometric edits in a fixed order ([`ops::apply_edits`])
//! 3. pack pixels into bytes, row-major or in vertical pages ([`pack`])
//! 4. render the bytes as C source ([`format`])
//!
//! [`convert`] wires these together for single files and whole folders,
//! where images of the same size are also emitted as one matrix array.
//!
//! ```
//! use bmp2c::{BitGrid, EditOptions, PackMode, Rotation, apply_edits, pack};
//!
//! let grid = BitGrid::from_fn(8, 8, |x, y| x == y);
//! let edits = EditOptions {
//!     rotate: Some(Rotation::Deg180),
//!     ..Default::default()
//! };
//! let edited = apply_edits(&grid, &edits)?;
//! assert_eq!(pack(&edited, PackMode::Row), vec![0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80]);
//! # Ok::<(), bmp2c::ConvertError>(())
//! ```

pub mod bmp;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod grid;
pub mod ops;
pub mod pack;
pub mod sort;

pub use convert::{
    ConvertOptions, FolderOptions, ImageResult, MixedSizePolicy, RenderedImage, process_folder,
    process_single_image, render_single_image,
};
pub use error::ConvertError;
pub use grid::BitGrid;
pub use ops::{Draw, DrawAction, EditOptions, Padding, Rotation, apply_edits};
pub use pack::{PackMode, bytes_per_image, pack};
pub use sort::SortOrder;
