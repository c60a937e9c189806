//! # bmp2c CLI
//!
//! ```bash
//! # Single image, written next to the input
//! bmp2c convert logo.bmp --emit-dims
//!
//! # Rotate, trim and pack for an SSD1306
//! bmp2c convert logo.bmp --rotate 90 --trim --pack page --out-dir gen/
//!
//! # Folder of glyphs into per-size matrices, numeric-aware order
//! bmp2c folder glyphs/ --sort natural --group-by-size
//! ```

use bmp2c::config::Defaults;
use bmp2c::{
    ConvertError, ConvertOptions, Draw, EditOptions, FolderOptions, MixedSizePolicy, PackMode,
    Padding, Rotation, SortOrder, config, process_folder, process_single_image,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Convert 1-bpp BMPs into MISRA-friendly C arrays (and matrices)
#[derive(Parser, Debug)]
#[command(name = "bmp2c")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a single BMP to .c
    Convert {
        #[arg(value_name = "input.bmp")]
        input: PathBuf,

        /// Override C symbol (default: sanitized file stem)
        #[arg(long)]
        symbol: Option<String>,

        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        edits: EditArgs,
    },

    /// Process a folder of BMPs; emit per-file .c and a matrix
    Folder {
        #[arg(value_name = "dir")]
        dir: PathBuf,

        /// Basename for the matrix C file (default: sanitized folder name)
        #[arg(long)]
        matrix_basename: Option<String>,

        /// Emit separate matrices per WxH (default behavior)
        #[arg(long, conflicts_with = "fail_on_mixed_sizes")]
        group_by_size: bool,

        /// Fail if sizes differ after edits
        #[arg(long)]
        fail_on_mixed_sizes: bool,

        /// Image ordering: 'alpha' (case-insensitive) or 'natural' (numeric-aware)
        #[arg(long)]
        sort: Option<SortOrder>,

        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        edits: EditArgs,
    },
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Output directory (defaults next to input)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Allow non-1bpp BMPs; binarize with fixed threshold=128
    #[arg(long)]
    allow_threshold: bool,

    /// Emit width/height macros
    #[arg(long)]
    emit_dims: bool,

    /// Verbose logging
    #[arg(long)]
    verbose: bool,

    /// Packing mode: 'row' = row-major LSB-first (default); 'page' = vertical 8px pages LSB-first (SSD1306-style)
    #[arg(long)]
    pack: Option<PackMode>,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Invert pixels (black<->white)
    #[arg(long)]
    invert: bool,

    /// Horizontal flip
    #[arg(long)]
    flip_h: bool,

    /// Vertical flip
    #[arg(long)]
    flip_v: bool,

    /// Rotate clockwise (90, 180 or 270)
    #[arg(long, allow_negative_numbers = true)]
    rotate: Option<i32>,

    /// Trim white rows/cols
    #[arg(long)]
    trim: bool,

    /// Pad white left N
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pad_left: Option<i64>,

    /// Pad white right N
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pad_right: Option<i64>,

    /// Pad white top N
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pad_top: Option<i64>,

    /// Pad white bottom N
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pad_bottom: Option<i64>,

    /// Draw a pixel (may be repeated)
    #[arg(long, value_name = "x,y,set|clear", allow_hyphen_values = true)]
    draw: Vec<String>,
}

impl EditArgs {
    fn to_options(&self) -> Result<EditOptions, ConvertError> {
        let rotate = self.rotate.map(Rotation::try_from).transpose()?;
        let pad = Padding::new(
            self.pad_left.unwrap_or(0),
            self.pad_right.unwrap_or(0),
            self.pad_top.unwrap_or(0),
            self.pad_bottom.unwrap_or(0),
        )?;
        let draws = self
            .draw
            .iter()
            .map(|d| d.parse::<Draw>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EditOptions {
            invert: self.invert,
            flip_h: self.flip_h,
            flip_v: self.flip_v,
            rotate,
            trim: self.trim,
            pad,
            draws,
        })
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Convert { io, .. } | Commands::Folder { io, .. } => io.verbose,
    };
    init_logging(verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(2);
    }
}

/// The flag value, or the configured default when the flag is absent.
/// `load` only runs in the second case.
fn or_default<T>(
    flag: Option<T>,
    load: impl FnOnce() -> Result<Defaults, ConvertError>,
    pick: impl FnOnce(Defaults) -> T,
) -> Result<T, ConvertError> {
    match flag {
        Some(value) => Ok(value),
        None => load().map(pick),
    }
}

fn run(cli: Cli) -> Result<(), ConvertError> {
    match cli.command {
        Commands::Convert {
            input,
            symbol,
            io,
            edits,
        } => {
            let options = ConvertOptions {
                out_dir: io.out_dir,
                symbol,
                emit_dims: io.emit_dims,
                allow_threshold: io.allow_threshold,
                edits: edits.to_options()?,
                pack: or_default(io.pack, config::defaults, |d| d.pack)?,
            };
            process_single_image(&input, &options)?;
        }

        Commands::Folder {
            dir,
            matrix_basename,
            group_by_size: _,
            fail_on_mixed_sizes,
            sort,
            io,
            edits,
        } => {
            let options = FolderOptions {
                out_dir: io.out_dir,
                matrix_basename,
                mixed_sizes: if fail_on_mixed_sizes {
                    MixedSizePolicy::Fail
                } else {
                    MixedSizePolicy::GroupBySize
                },
                emit_dims: io.emit_dims,
                allow_threshold: io.allow_threshold,
                edits: edits.to_options()?,
                pack: or_default(io.pack, config::defaults, |d| d.pack)?,
                sort: or_default(sort, config::defaults, |d| d.sort)?,
            };
            let written = process_folder(&dir, &options)?;
            log::info!("{} matrix file(s) written", written.len());
        }
    }

    Ok(())
}
