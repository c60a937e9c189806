use crate::error::ConvertError;
use crate::grid::BitGrid;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use std::path::Path;

/// Luma below this is ink when thresholding non 1-bpp sources
pub const THRESHOLD: u8 = 128;

/// Bits per pixel from a BMP header (little-endian u16 at offset 28).
pub fn read_bmp_bitcount(bytes: &[u8], source: &Path) -> Result<u16, ConvertError> {
    if bytes.len() < 30 || &bytes[..2] != b"BM" {
        return Err(ConvertError::NotBmp(source.to_path_buf()));
    }
    Ok(u16::from_le_bytes([bytes[28], bytes[29]]))
}

/// Load a BMP file into a grid.
///
/// 1-bpp images map black to ink directly. Deeper images are rejected unless
/// `allow_threshold` is set, in which case they are binarized at [`THRESHOLD`].
pub fn load_bmp_file(path: &Path, allow_threshold: bool) -> Result<BitGrid, ConvertError> {
    let bytes = std::fs::read(path)?;
    decode_bmp(&bytes, allow_threshold, path)
}

pub fn decode_bmp(bytes: &[u8], allow_threshold: bool, source: &Path) -> Result<BitGrid, ConvertError> {
    let bpp = read_bmp_bitcount(bytes, source)?;
    if bpp != 1 && !allow_threshold {
        return Err(ConvertError::NotOneBpp {
            name: source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| source.display().to_string()),
            bpp,
        });
    }

    let img = image::load_from_memory_with_format(bytes, ImageFormat::Bmp)?;
    log::debug!(
        "Decoded {} ({}x{}, {} bpp)",
        source.display(),
        img.width(),
        img.height(),
        bpp
    );

    Ok(grid_from_image(&img, bpp == 1))
}

/// Binarize a decoded image. With `passthrough` only pure black is ink.
pub fn grid_from_image(img: &DynamicImage, passthrough: bool) -> BitGrid {
    let gray = img.to_luma8();
    BitGrid::from_fn(gray.width() as usize, gray.height() as usize, |x, y| {
        let luma = gray.get_pixel(x as u32, y as u32)[0];
        if passthrough { luma == 0 } else { luma < THRESHOLD }
    })
}

/// Render a grid as grayscale, ink black and background white.
pub fn grid_to_image(grid: &BitGrid) -> GrayImage {
    GrayImage::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
        if grid.get(x as usize, y as usize) {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    })
}

/// Save a grid as an 8-bit grayscale BMP.
pub fn encode_bmp(grid: &BitGrid, path: &Path) -> Result<(), ConvertError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    grid_to_image(grid).save_with_format(path, ImageFormat::Bmp)?;
    Ok(())
}
