use crate::error::ConvertError;
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Ordering of images inside a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Case-insensitive by file stem
    #[default]
    Alpha,
    /// Numeric-aware, so `img2` sorts before `img10`
    Natural,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Alpha => "alpha",
            SortOrder::Natural => "natural",
        }
    }

    pub fn compare_stems(&self, a: &str, b: &str) -> Ordering {
        match self {
            SortOrder::Alpha => alpha_key(a).cmp(&alpha_key(b)),
            SortOrder::Natural => (natural_key(a), a).cmp(&(natural_key(b), b)),
        }
    }

    /// Stable sort of paths by file stem.
    pub fn sort_paths<P: AsRef<Path>>(&self, paths: &mut [P]) {
        paths.sort_by(|a, b| self.compare_stems(&stem(a.as_ref()), &stem(b.as_ref())));
    }
}

impl FromStr for SortOrder {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alpha" => Ok(SortOrder::Alpha),
            "natural" => Ok(SortOrder::Natural),
            _ => Err(ConvertError::UnknownSortOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One run of a natural sort key. Text sorts before numbers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Chunk {
    Text(String),
    /// Digits without leading zeros, compared by length then lexically
    Number(usize, String),
}

pub fn alpha_key(stem: &str) -> (String, &str) {
    (stem.to_lowercase(), stem)
}

/// Split into alternating text and digit runs.
pub fn natural_key(stem: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut text = String::new();
    let mut chars = stem.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            chunks.push(Chunk::Text(std::mem::take(&mut text).to_lowercase()));
            let mut digits = String::from(c);
            while let Some(&d) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                digits.push(d);
                chars.next();
            }
            let trimmed = digits.trim_start_matches('0').to_string();
            chunks.push(Chunk::Number(trimmed.len(), trimmed));
        } else {
            text.push(c);
        }
    }
    chunks.push(Chunk::Text(text.to_lowercase()));
    chunks
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
