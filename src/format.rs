//! C source generation for packed images and image matrices.

use crate::convert::ImageResult;
use crate::pack::{PackMode, bytes_per_image};

/// Hex values per line in generated arrays
pub const ITEMS_PER_LINE: usize = 12;

const REPO_URL: &str = "https://github.com/AlisonLuan/bmp2c";

/// Turn any name into a valid C identifier, preserving case.
pub fn sanitize_symbol(name: &str) -> String {
    if name.is_empty() {
        return "_".to_string();
    }

    let mut symbol: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if symbol.starts_with(|c: char| c.is_ascii_digit()) {
        symbol.insert(0, '_');
    }
    symbol
}

/// Upper-case macro prefix for an already sanitized symbol.
pub fn upper_macro(name: &str) -> String {
    sanitize_symbol(name).to_ascii_uppercase()
}

/// Uppercase `0xNN` items, `items_per_line` per line, each line indented.
pub fn format_bytes_as_c_array(data: &[u8], items_per_line: usize) -> String {
    data.chunks(items_per_line.max(1))
        .map(|line| {
            let items: Vec<String> = line.iter().map(|b| format!("0x{:02X}", b)).collect();
            format!("    {}", items.join(", "))
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

fn banner(file: &str, desc: &str, size: &str, version: &str) -> Vec<String> {
    vec![
        "/* =========================================================================".to_string(),
        format!(" *  File: {}", file),
        format!(" *  Desc: {}", desc),
        " *        Scan: top-left \u{2192} left-to-right, top-to-bottom. Black=1.".to_string(),
        format!(" *        {}", size),
        " *  Notes: Generated to align with MISRA C:2004/2008 guidelines (style/comments).".to_string(),
        format!(" *  Tool : bmp2c v{}", version),
        format!(" *  Repo : {}", REPO_URL),
        " *  Gen  : This file is generated \u{2014} do not edit by hand.".to_string(),
        " *  Reminder (author): Please keep the repository link in this header when sharing/redistributing.".to_string(),
        " * ========================================================================= */".to_string(),
        String::new(),
    ]
}

/// Single image source file, `<symbol>.c`.
pub fn generate_c_single(
    symbol: &str,
    width: usize,
    height: usize,
    data: &[u8],
    emit_dims: bool,
    version: &str,
    mode: PackMode,
) -> String {
    let mut lines = banner(
        &format!("{}.c", symbol),
        &format!("Auto-generated from BMP (1-bpp). Packing: {}.", mode.description()),
        &format!("Size: {}x{} px. Bytes: {}.", width, height, data.len()),
        version,
    );
    lines.push("#include <stdint.h>  /* for uint8_t */".to_string());
    lines.push(String::new());
    lines.push("/* Image data */".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out.push_str(&format!("const unsigned char {}[{}] =\n{{\n", symbol, data.len()));
    out.push_str(&format_bytes_as_c_array(data, ITEMS_PER_LINE));
    out.push_str("\n};\n");

    if emit_dims {
        let up = upper_macro(symbol);
        out.push_str("\n/* Optional (only if --emit-dims): */\n");
        out.push_str(&format!("#define {}_WIDTH   {}\n", up, width));
        out.push_str(&format!("#define {}_HEIGHT  {}\n", up, height));
    }
    out
}

/// Matrix source file, `<basename>_Matrix.c`. All entries share one size.
pub fn generate_c_matrix(
    basename: &str,
    entries: &[ImageResult],
    emit_dims: bool,
    version: &str,
    mode: PackMode,
) -> String {
    let (width, height) = entries.first().map_or((0, 0), |e| (e.width, e.height));
    debug_assert!(entries.iter().all(|e| (e.width, e.height) == (width, height)));
    let bpi = bytes_per_image(width, height, mode);

    let mut lines = banner(
        &format!("{}_Matrix.c", basename),
        &format!("Auto-generated BMP matrix. Packing: {}.", mode.description()),
        &format!(
            "Size: {}x{} px per image. Count: {}. Bytes/img: {}.",
            width,
            height,
            entries.len(),
            bpi
        ),
        version,
    );
    lines.push("#include <stdint.h>".to_string());
    lines.push(String::new());

    let mut out = lines.join("\n");
    out.push('\n');
    out.push_str(&format!(
        "const unsigned char {}_Matrix[{}][{}] =\n{{\n",
        basename,
        entries.len(),
        bpi
    ));

    let body: Vec<String> = entries
        .iter()
        .map(|e| {
            format!(
                "    /* name: {} */ {{\n{}\n    }}",
                e.source_name(),
                format_bytes_as_c_array(&e.data, ITEMS_PER_LINE)
            )
        })
        .collect();
    out.push_str(&body.join(",\n"));
    out.push_str("\n};\n");

    if emit_dims {
        let up = upper_macro(basename);
        out.push_str(&format!("\n#define {}_COUNT {}\n", up, entries.len()));
        out.push_str(&format!("#define {}_W     {}\n", up, width));
        out.push_str(&format!("#define {}_H     {}\n", up, height));
        out.push_str(&format!("#define {}_BPI   {}\n", up, bpi));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_sanitize_symbol() {
        assert_eq!(sanitize_symbol("logo"), "logo");
        assert_eq!(sanitize_symbol("my-logo v2"), "my_logo_v2");
        assert_eq!(sanitize_symbol("16x8"), "_16x8");
        assert_eq!(sanitize_symbol("Ünï"), "_n_");
        assert_eq!(sanitize_symbol(""), "_");
        assert_eq!(sanitize_symbol("_ok"), "_ok");
    }

    #[test]
    fn test_upper_macro() {
        assert_eq!(upper_macro("Example16x8"), "EXAMPLE16X8");
        assert_eq!(upper_macro("a-b"), "A_B");
    }

    #[test]
    fn test_format_bytes_line_wrapping() {
        let data: Vec<u8> = (0..14).collect();
        let text = format_bytes_as_c_array(&data, ITEMS_PER_LINE);
        assert_eq!(
            text,
            "    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B,\n    0x0C, 0x0D"
        );
        assert_eq!(format_bytes_as_c_array(&[0xab], 4), "    0xAB");
        assert_eq!(format_bytes_as_c_array(&[], 4), "");
    }

    #[test]
    fn test_generate_single() {
        let text = generate_c_single("Icon", 10, 2, &[0x03, 0x00, 0x00, 0x02], true, "0.1.0", PackMode::Row);
        assert!(text.starts_with("/* ====="));
        assert!(text.contains(" *  File: Icon.c\n"));
        assert!(text.contains("Packing: Row-major, LSB-first."));
        assert!(text.contains("Size: 10x2 px. Bytes: 4."));
        assert!(text.contains(" *  Tool : bmp2c v0.1.0\n"));
        assert!(text.contains(
            "/* Image data */\nconst unsigned char Icon[4] =\n{\n    0x03, 0x00, 0x00, 0x02\n};\n"
        ));
        assert!(text.ends_with("#define ICON_WIDTH   10\n#define ICON_HEIGHT  2\n"));
    }

    #[test]
    fn test_generate_single_without_dims() {
        let text = generate_c_single("x", 1, 1, &[0x01], false, "0.1.0", PackMode::Page);
        assert!(text.contains("Vertical pages (8px), LSB-first"));
        assert!(text.ends_with("    0x01\n};\n"));
        assert!(!text.contains("#define"));
    }

    #[test]
    fn test_generate_matrix() {
        let entries = vec![
            ImageResult {
                symbol: "a".into(),
                width: 8,
                height: 1,
                data: vec![0x01],
                source_path: PathBuf::from("dir/a.bmp"),
            },
            ImageResult {
                symbol: "b".into(),
                width: 8,
                height: 1,
                data: vec![0x80],
                source_path: PathBuf::from("dir/b.bmp"),
            },
        ];
        let text = generate_c_matrix("Glyphs", &entries, true, "0.1.0", PackMode::Row);
        assert!(text.contains(" *  File: Glyphs_Matrix.c\n"));
        assert!(text.contains("Size: 8x1 px per image. Count: 2. Bytes/img: 1."));
        assert!(text.contains(
            "#include <stdint.h>\n\nconst unsigned char Glyphs_Matrix[2][1] =\n{\n\
             \x20   /* name: a.bmp */ {\n    0x01\n    },\n\
             \x20   /* name: b.bmp */ {\n    0x80\n    }\n};\n"
        ));
        assert!(text.ends_with(
            "\n#define GLYPHS_COUNT 2\n#define GLYPHS_W     8\n#define GLYPHS_H     1\n#define GLYPHS_BPI   1\n"
        ));
    }
}
