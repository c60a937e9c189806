use crate::error::ConvertError;

/// A monochrome pixel grid, row-major with the origin at the top left.
///
/// Pixels live in a single flat buffer so every row has the same length.
/// `true` is ink (black), `false` is background (white). A grid with no rows
/// always reports a width of 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitGrid {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl BitGrid {
    /// All-white grid of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        let width = if height == 0 { 0 } else { width };
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    /// Like [`BitGrid::new`], but fails instead of panicking when the pixel
    /// count does not fit in memory.
    pub fn try_new(width: usize, height: usize) -> Result<Self, ConvertError> {
        match width.checked_mul(height) {
            Some(area) if area <= isize::MAX as usize => Ok(Self::new(width, height)),
            _ => Err(ConvertError::ImageTooLarge(format!("{}x{}", width, height))),
        }
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut grid = Self::new(width, height);
        for y in 0..grid.height {
            for x in 0..grid.width {
                grid.pixels[y * grid.width + x] = f(x, y);
            }
        }
        grid
    }

    /// Build a grid from rows of 0/1 values.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, ConvertError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut pixels = Vec::with_capacity(width * height);

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(ConvertError::MalformedGrid(format!(
                    "row {} has {} pixels, expected {}",
                    y,
                    row.len(),
                    width
                )));
            }
            for (x, &v) in row.iter().enumerate() {
                match v {
                    0 => pixels.push(false),
                    1 => pixels.push(true),
                    _ => {
                        return Err(ConvertError::MalformedGrid(format!(
                            "pixel ({},{}) is {}, expected 0 or 1",
                            x, y, v
                        )));
                    }
                }
            }
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows()
            .map(|row| row.iter().map(|&p| p as u8).collect())
            .collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// True when the grid holds no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel at (x, y). Panics when out of range.
    pub fn get(&self, x: usize, y: usize) -> bool {
        assert!(x < self.width && y < self.height, "pixel ({x},{y}) out of range");
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, ink: bool) {
        assert!(x < self.width && y < self.height, "pixel ({x},{y}) out of range");
        self.pixels[y * self.width + x] = ink;
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    pub fn row(&self, y: usize) -> &[bool] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[bool]> {
        (0..self.height).map(move |y| self.row(y))
    }

    pub fn count_ink(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    pub(crate) fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    pub(crate) fn from_parts(width: usize, height: usize, pixels: Vec<bool>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        let width = if height == 0 { 0 } else { width };
        Self {
            width,
            height,
            pixels,
        }
    }
}
