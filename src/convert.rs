use crate::bmp;
use crate::error::ConvertError;
use crate::format::{generate_c_matrix, generate_c_single, sanitize_symbol};
use crate::ops::{EditOptions, apply_edits};
use crate::pack::{PackMode, pack};
use crate::sort::SortOrder;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Tool version written into generated headers
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One converted image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    pub symbol: String,
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
    pub source_path: PathBuf,
}

impl ImageResult {
    /// File name of the source image, used in matrix comments.
    pub fn source_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

/// Settings for converting a single image
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Output directory. `None` writes next to the input.
    pub out_dir: Option<PathBuf>,
    /// Symbol override. `None` uses the file stem.
    pub symbol: Option<String>,
    pub emit_dims: bool,
    pub allow_threshold: bool,
    pub edits: EditOptions,
    pub pack: PackMode,
}

/// What to do when images in a folder end up with different sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MixedSizePolicy {
    /// One matrix per distinct WxH
    #[default]
    GroupBySize,
    /// Refuse to write any matrix
    Fail,
}

/// Settings for converting a folder of images
#[derive(Debug, Clone, Default)]
pub struct FolderOptions {
    pub out_dir: Option<PathBuf>,
    /// Matrix basename override. `None` uses the folder name.
    pub matrix_basename: Option<String>,
    pub mixed_sizes: MixedSizePolicy,
    pub emit_dims: bool,
    pub allow_threshold: bool,
    pub edits: EditOptions,
    pub pack: PackMode,
    pub sort: SortOrder,
}

/// Write UTF-8 text with `\n` line endings, creating parent directories.
pub fn write_text(path: &Path, content: &str) -> Result<(), ConvertError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// A converted image and the C source that goes with it, not yet on disk
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub result: ImageResult,
    pub out_path: PathBuf,
    pub content: String,
}

impl RenderedImage {
    pub fn write(&self) -> Result<(), ConvertError> {
        write_text(&self.out_path, &self.content)?;
        log::info!(
            "Wrote {} ({} bytes)",
            self.out_path.display(),
            self.result.data.len()
        );
        Ok(())
    }
}

/// Decode, edit and pack one BMP and render its `.c` file without writing it.
pub fn render_single_image(
    input: &Path,
    options: &ConvertOptions,
) -> Result<RenderedImage, ConvertError> {
    if !input.exists() {
        return Err(ConvertError::FileNotFound(input.to_path_buf()));
    }

    let grid = bmp::load_bmp_file(input, options.allow_threshold)?;
    let grid = apply_edits(&grid, &options.edits)?;
    let (width, height) = grid.dimensions();
    let data = pack(&grid, options.pack);

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let symbol = sanitize_symbol(options.symbol.as_deref().unwrap_or(&stem));
    let content = generate_c_single(
        &symbol,
        width,
        height,
        &data,
        options.emit_dims,
        VERSION,
        options.pack,
    );

    let out_dir = match &options.out_dir {
        Some(dir) => dir.clone(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let out_path = out_dir.join(format!("{}.c", symbol));

    Ok(RenderedImage {
        result: ImageResult {
            symbol,
            width,
            height,
            data,
            source_path: input.to_path_buf(),
        },
        out_path,
        content,
    })
}

/// Convert one BMP and write `<symbol>.c`.
pub fn process_single_image(
    input: &Path,
    options: &ConvertOptions,
) -> Result<ImageResult, ConvertError> {
    let rendered = render_single_image(input, options)?;
    rendered.write()?;
    Ok(rendered.result)
}

/// `.bmp` files directly inside `dir`, in the requested order.
pub fn collect_bmp_files(dir: &Path, sort: SortOrder) -> Result<Vec<PathBuf>, ConvertError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_bmp = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("bmp"));
        if is_bmp && path.is_file() {
            paths.push(path);
        }
    }
    sort.sort_paths(&mut paths);
    Ok(paths)
}

/// Group results by size, keeping their relative order inside each group.
pub fn group_by_size(results: Vec<ImageResult>) -> BTreeMap<(usize, usize), Vec<ImageResult>> {
    let mut groups: BTreeMap<(usize, usize), Vec<ImageResult>> = BTreeMap::new();
    for result in results {
        groups.entry(result.dimensions()).or_default().push(result);
    }
    groups
}

/// Convert every BMP in `dir`, writing per-image `.c` files plus matrix files.
///
/// Returns the matrix files written.
pub fn process_folder(dir: &Path, options: &FolderOptions) -> Result<Vec<PathBuf>, ConvertError> {
    if !dir.is_dir() {
        return Err(ConvertError::NotAFolder(dir.to_path_buf()));
    }

    let paths = collect_bmp_files(dir, options.sort)?;
    if paths.is_empty() {
        return Err(ConvertError::NoBmpFiles(dir.to_path_buf()));
    }
    log::info!("Converting {} images from {}", paths.len(), dir.display());

    let out_dir = options.out_dir.clone().unwrap_or_else(|| dir.to_path_buf());
    let single = ConvertOptions {
        out_dir: Some(out_dir.clone()),
        symbol: None,
        emit_dims: options.emit_dims,
        allow_threshold: options.allow_threshold,
        edits: options.edits.clone(),
        pack: options.pack,
    };

    // Decode in parallel, write in sorted order: the first failure in that
    // order is the one reported, and a later image whose symbol collides
    // with an earlier one overwrites its file.
    let rendered: Vec<Result<RenderedImage, ConvertError>> = paths
        .par_iter()
        .map(|path| render_single_image(path, &single))
        .collect();

    let mut seen = HashSet::new();
    let mut results = Vec::with_capacity(rendered.len());
    for image in rendered {
        let image = image?;
        if !seen.insert(image.out_path.clone()) {
            log::warn!(
                "{} overwrites an earlier image with symbol {}",
                image.result.source_name(),
                image.result.symbol
            );
        }
        image.write()?;
        results.push(image.result);
    }

    let groups = group_by_size(results);
    if groups.len() > 1 && options.mixed_sizes == MixedSizePolicy::Fail {
        let sizes: Vec<String> = groups.keys().map(|(w, h)| format!("{}x{}", w, h)).collect();
        return Err(ConvertError::MixedSizes(sizes.join(", ")));
    }

    let dir_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = sanitize_symbol(options.matrix_basename.as_deref().unwrap_or(&dir_name));
    let multiple = groups.len() > 1;

    let mut written = Vec::with_capacity(groups.len());
    for ((w, h), group) in &groups {
        let name = if multiple {
            format!("{}_{}x{}", base, w, h)
        } else {
            base.clone()
        };
        let content = generate_c_matrix(&name, group, options.emit_dims, VERSION, options.pack);
        let out_path = out_dir.join(format!("{}_Matrix.c", name));
        write_text(&out_path, &content)?;
        log::info!(
            "Wrote {} ({}x{}, {} images)",
            out_path.display(),
            w,
            h,
            group.len()
        );
        written.push(out_path);
    }

    Ok(written)
}
