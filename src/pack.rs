//! Bit packing of monochrome grids into byte streams.
//!
//! Two layouts are supported, both LSB-first:
//!
//! ```text
//! Row:   byte = 8 horizontal pixels, bit 0 = leftmost
//!        rows top to bottom, ceil(width / 8) bytes per row
//!
//! Page:  byte = 8 vertical pixels, bit 0 = topmost (SSD1306 style)
//!        bands of 8 rows top to bottom, one byte per column
//! ```

use crate::error::ConvertError;
use crate::grid::BitGrid;
use std::fmt;
use std::str::FromStr;

/// Byte layout used when serializing a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackMode {
    /// Row-major, 8 horizontal pixels per byte
    #[default]
    Row,
    /// Vertical 8-pixel pages, one byte per column per page
    Page,
}

impl PackMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackMode::Row => "row",
            PackMode::Page => "page",
        }
    }

    /// Human readable layout, used in generated file headers.
    pub fn description(&self) -> &'static str {
        match self {
            PackMode::Row => "Row-major, LSB-first",
            PackMode::Page => "Vertical pages (8px), LSB-first",
        }
    }
}

impl FromStr for PackMode {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "row" => Ok(PackMode::Row),
            "page" => Ok(PackMode::Page),
            _ => Err(ConvertError::UnknownPackMode(s.to_string())),
        }
    }
}

impl fmt::Display for PackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pack a grid with the given layout.
pub fn pack(grid: &BitGrid, mode: PackMode) -> Vec<u8> {
    match mode {
        PackMode::Row => pack_row_major_lsb_first(grid),
        PackMode::Page => pack_page_vertical_lsb_first(grid),
    }
}

/// Row-major packing. Bit `i` of each byte is column `group_start + i`;
/// columns past the right edge stay 0.
pub fn pack_row_major_lsb_first(grid: &BitGrid) -> Vec<u8> {
    if grid.is_empty() {
        return Vec::new();
    }

    let mut output = Vec::with_capacity(bytes_per_image(grid.width(), grid.height(), PackMode::Row));
    for row in grid.rows() {
        for group in row.chunks(8) {
            let byte = group
                .iter()
                .enumerate()
                .filter(|(_, ink)| **ink)
                .fold(0u8, |b, (i, _)| b | (1 << i));
            output.push(byte);
        }
    }
    output
}

/// Page packing. Bit `i` of each byte is row `page * 8 + i` of one column;
/// rows past the bottom edge stay 0.
pub fn pack_page_vertical_lsb_first(grid: &BitGrid) -> Vec<u8> {
    if grid.is_empty() {
        return Vec::new();
    }

    let (width, height) = grid.dimensions();
    let pages = height.div_ceil(8);
    let mut output = Vec::with_capacity(bytes_per_image(width, height, PackMode::Page));

    for page in 0..pages {
        let y0 = page * 8;
        let rows = (height - y0).min(8);
        for x in 0..width {
            let mut byte = 0u8;
            for i in 0..rows {
                if grid.get(x, y0 + i) {
                    byte |= 1 << i;
                }
            }
            output.push(byte);
        }
    }
    output
}

/// Exact packed size for an image of the given dimensions.
pub fn bytes_per_image(width: usize, height: usize, mode: PackMode) -> usize {
    match mode {
        PackMode::Row => width.div_ceil(8) * height,
        PackMode::Page => width * height.div_ceil(8),
    }
}
