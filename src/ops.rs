use crate::error::ConvertError;
use crate::grid::BitGrid;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Clockwise rotation angles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(&self) -> i32 {
        match self {
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

impl TryFrom<i32> for Rotation {
    type Error = ConvertError;

    fn try_from(angle: i32) -> Result<Self, Self::Error> {
        match angle {
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(ConvertError::InvalidRotation(other)),
        }
    }
}

/// White margins added around the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl Padding {
    /// Validate signed margins. Any negative value is rejected.
    pub fn new(left: i64, right: i64, top: i64, bottom: i64) -> Result<Self, ConvertError> {
        let check = |side: &'static str, value: i64| {
            usize::try_from(value).map_err(|_| ConvertError::InvalidPadding { side, value })
        };
        Ok(Self {
            left: check("left", left)?,
            right: check("right", right)?,
            top: check("top", top)?,
            bottom: check("bottom", bottom)?,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.left == 0 && self.right == 0 && self.top == 0 && self.bottom == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawAction {
    Set,
    Clear,
}

impl FromStr for DrawAction {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "set" => Ok(DrawAction::Set),
            "clear" => Ok(DrawAction::Clear),
            other => Err(ConvertError::InvalidDraw(format!(
                "invalid draw action: {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for DrawAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawAction::Set => write!(f, "set"),
            DrawAction::Clear => write!(f, "clear"),
        }
    }
}

/// A single forced pixel, addressed in the post-edit grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    pub x: i64,
    pub y: i64,
    pub action: DrawAction,
}

impl Draw {
    pub fn new(x: i64, y: i64, action: DrawAction) -> Self {
        Self { x, y, action }
    }
}

impl FromStr for Draw {
    type Err = ConvertError;

    /// Parses `"x,y,set"` or `"x,y,clear"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConvertError::InvalidDraw(format!("{:?}", s));

        let (xy, action) = s.rsplit_once(',').ok_or_else(invalid)?;
        let (xs, ys) = xy.split_once(',').ok_or_else(invalid)?;
        let x = xs.trim().parse::<i64>().map_err(|_| invalid())?;
        let y = ys.trim().parse::<i64>().map_err(|_| invalid())?;
        let action = action.parse::<DrawAction>()?;

        Ok(Draw { x, y, action })
    }
}

/// Edits applied to a grid before packing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditOptions {
    pub invert: bool,
    pub flip_h: bool,
    pub flip_v: bool,
    pub rotate: Option<Rotation>,
    pub trim: bool,
    pub pad: Padding,
    pub draws: Vec<Draw>,
}

pub fn invert(grid: &BitGrid) -> BitGrid {
    let pixels = grid.pixels().iter().map(|&p| !p).collect();
    BitGrid::from_parts(grid.width(), grid.height(), pixels)
}

pub fn flip_h(grid: &BitGrid) -> BitGrid {
    let mut pixels = Vec::with_capacity(grid.pixels().len());
    for row in grid.rows() {
        pixels.extend(row.iter().rev());
    }
    BitGrid::from_parts(grid.width(), grid.height(), pixels)
}

pub fn flip_v(grid: &BitGrid) -> BitGrid {
    let mut pixels = Vec::with_capacity(grid.pixels().len());
    for row in grid.rows().rev() {
        pixels.extend_from_slice(row);
    }
    BitGrid::from_parts(grid.width(), grid.height(), pixels)
}

/// Rotate clockwise. An empty grid comes back unchanged.
pub fn rotate(grid: &BitGrid, rotation: Rotation) -> BitGrid {
    if grid.is_empty() {
        return grid.clone();
    }

    let (w, h) = grid.dimensions();
    match rotation {
        Rotation::Deg180 => flip_v(&flip_h(grid)),
        // Source row y lands in column h-1-y, so the top row becomes the right edge
        Rotation::Deg90 => BitGrid::from_fn(h, w, |nx, ny| grid.get(ny, h - 1 - nx)),
        // Source column x lands in row w-1-x
        Rotation::Deg270 => BitGrid::from_fn(h, w, |nx, ny| grid.get(w - 1 - ny, nx)),
    }
}

/// Crop to the bounding box of all ink pixels.
///
/// A grid without ink is returned as-is so a 0x0 result is never produced.
pub fn trim(grid: &BitGrid) -> BitGrid {
    match ink_bounds(grid) {
        Some((min_x, min_y, max_x, max_y)) => {
            BitGrid::from_fn(max_x - min_x + 1, max_y - min_y + 1, |x, y| {
                grid.get(min_x + x, min_y + y)
            })
        }
        None => grid.clone(),
    }
}

/// Inclusive `(min_x, min_y, max_x, max_y)` of ink pixels.
pub fn ink_bounds(grid: &BitGrid) -> Option<(usize, usize, usize, usize)> {
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for (y, row) in grid.rows().enumerate() {
        for (x, _) in row.iter().enumerate().filter(|(_, p)| **p) {
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bounds
}

/// Add white margins. Fails if the padded size overflows.
pub fn pad(grid: &BitGrid, padding: Padding) -> Result<BitGrid, ConvertError> {
    let (w, h) = grid.dimensions();
    let too_large = || {
        ConvertError::ImageTooLarge(format!(
            "{}x{} padded by {}/{}/{}/{}",
            w, h, padding.left, padding.right, padding.top, padding.bottom
        ))
    };
    let new_w = w
        .checked_add(padding.left)
        .and_then(|n| n.checked_add(padding.right))
        .ok_or_else(too_large)?;
    let new_h = h
        .checked_add(padding.top)
        .and_then(|n| n.checked_add(padding.bottom))
        .ok_or_else(too_large)?;

    let mut out = BitGrid::try_new(new_w, new_h)?;
    for (y, row) in grid.rows().enumerate() {
        for (x, &ink) in row.iter().enumerate() {
            if ink {
                out.set(x + padding.left, y + padding.top, true);
            }
        }
    }
    Ok(out)
}

/// Apply draws in order on a copy of `grid`.
pub fn draw(grid: &BitGrid, draws: &[Draw]) -> Result<BitGrid, ConvertError> {
    let mut out = grid.clone();
    draw_in_place(&mut out, draws)?;
    Ok(out)
}

/// Apply draws in order, stopping at the first out-of-bounds one.
///
/// Draws before the failing one stay applied to `grid`.
pub fn draw_in_place(grid: &mut BitGrid, draws: &[Draw]) -> Result<(), ConvertError> {
    for d in draws {
        if !grid.contains(d.x, d.y) {
            return Err(ConvertError::DrawOutOfBounds {
                x: d.x,
                y: d.y,
                width: grid.width(),
                height: grid.height(),
            });
        }
        grid.set(d.x as usize, d.y as usize, d.action == DrawAction::Set);
    }
    Ok(())
}

/// Run the edit pipeline: invert, flip-h, flip-v, rotate, trim, pad, draws.
///
/// Stages that are switched off borrow their input, so a default
/// `EditOptions` returns `Cow::Borrowed(grid)`.
pub fn apply_edits<'a>(
    grid: &'a BitGrid,
    options: &EditOptions,
) -> Result<Cow<'a, BitGrid>, ConvertError> {
    let mut out = Cow::Borrowed(grid);

    if options.invert {
        out = Cow::Owned(invert(&out));
    }
    if options.flip_h {
        out = Cow::Owned(flip_h(&out));
    }
    if options.flip_v {
        out = Cow::Owned(flip_v(&out));
    }
    if let Some(rotation) = options.rotate {
        out = Cow::Owned(rotate(&out, rotation));
    }
    if options.trim {
        out = Cow::Owned(trim(&out));
    }
    if !options.pad.is_zero() {
        out = Cow::Owned(pad(&out, options.pad)?);
    }
    if !options.draws.is_empty() {
        draw_in_place(out.to_mut(), &options.draws)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grid(rows: &[&[u8]]) -> BitGrid {
        BitGrid::from_rows(rows).unwrap()
    }

    // 3x2
    fn sample() -> BitGrid {
        grid(&[&[0, 1, 0], &[1, 0, 1]])
    }

    // 3x2 with no symmetry so every transform is distinguishable
    fn asymmetric() -> BitGrid {
        grid(&[&[1, 1, 0], &[0, 0, 1]])
    }

    #[test]
    fn test_invert() {
        assert_eq!(invert(&sample()), grid(&[&[1, 0, 1], &[0, 1, 0]]));
    }

    #[test]
    fn test_flip_h() {
        assert_eq!(flip_h(&asymmetric()), grid(&[&[0, 1, 1], &[1, 0, 0]]));
    }

    #[test]
    fn test_flip_v() {
        assert_eq!(flip_v(&asymmetric()), grid(&[&[0, 0, 1], &[1, 1, 0]]));
    }

    #[test]
    fn test_involutions() {
        let g = asymmetric();
        assert_eq!(invert(&invert(&g)), g);
        assert_eq!(flip_h(&flip_h(&g)), g);
        assert_eq!(flip_v(&flip_v(&g)), g);
    }

    #[test]
    fn test_rotate_90_puts_top_row_on_right_edge() {
        let out = rotate(&asymmetric(), Rotation::Deg90);
        assert_eq!(out.dimensions(), (2, 3));
        assert_eq!(out, grid(&[&[0, 1], &[0, 1], &[1, 0]]));
        // top row of the source, read left to right, is the right column top to bottom
        let right: Vec<bool> = (0..3).map(|y| out.get(1, y)).collect();
        assert_eq!(right, asymmetric().row(0).to_vec());
    }

    #[test]
    fn test_rotate_270() {
        let out = rotate(&asymmetric(), Rotation::Deg270);
        assert_eq!(out.dimensions(), (2, 3));
        assert_eq!(out, grid(&[&[0, 1], &[1, 0], &[1, 0]]));
    }

    #[test]
    fn test_rotate_270_is_three_quarter_turns() {
        let g = asymmetric();
        let three = rotate(&rotate(&rotate(&g, Rotation::Deg90), Rotation::Deg90), Rotation::Deg90);
        assert_eq!(rotate(&g, Rotation::Deg270), three);
    }

    #[test]
    fn test_rotate_180() {
        let g = sample();
        assert_eq!(rotate(&g, Rotation::Deg180), flip_v(&flip_h(&g)));
        assert_eq!(rotate(&g, Rotation::Deg180), flip_h(&flip_v(&g)));
        assert_eq!(
            rotate(&asymmetric(), Rotation::Deg180),
            grid(&[&[1, 0, 0], &[0, 1, 1]])
        );
    }

    #[test]
    fn test_four_quarter_turns_identity() {
        let g = BitGrid::from_fn(5, 3, |x, y| (x * 7 + y * 3) % 4 == 0);
        let mut out = g.clone();
        for _ in 0..4 {
            out = rotate(&out, Rotation::Deg90);
        }
        assert_eq!(out, g);
    }

    #[test]
    fn test_rotate_empty_is_noop() {
        let empty = BitGrid::new(0, 3);
        assert_eq!(rotate(&empty, Rotation::Deg90), empty);
        assert_eq!(rotate(&BitGrid::default(), Rotation::Deg270), BitGrid::default());
    }

    #[test]
    fn test_rotation_from_degrees() {
        assert_eq!(Rotation::try_from(90).unwrap(), Rotation::Deg90);
        assert_eq!(Rotation::try_from(270).unwrap().degrees(), 270);
        assert!(matches!(
            Rotation::try_from(45),
            Err(ConvertError::InvalidRotation(45))
        ));
        assert!(Rotation::try_from(-90).is_err());
        assert!(Rotation::try_from(0).is_err());
    }

    #[test]
    fn test_trim_bounding_box() {
        let g = grid(&[
            &[0, 0, 0, 0],
            &[0, 1, 0, 0],
            &[0, 0, 1, 0],
            &[0, 0, 0, 0],
        ]);
        assert_eq!(trim(&g), grid(&[&[1, 0], &[0, 1]]));
        assert_eq!(ink_bounds(&g), Some((1, 1, 2, 2)));
    }

    #[test]
    fn test_trim_noop_on_all_white() {
        let white = BitGrid::new(3, 2);
        assert_eq!(trim(&white), white);
        assert_eq!(ink_bounds(&white), None);
    }

    #[test]
    fn test_trim_idempotent() {
        let g = grid(&[&[0, 0, 0], &[0, 1, 1], &[0, 0, 0]]);
        let once = trim(&g);
        assert_eq!(trim(&once), once);
        assert_eq!(once.dimensions(), (2, 1));
    }

    #[test]
    fn test_pad() {
        let out = pad(&sample(), Padding::new(1, 0, 1, 0).unwrap()).unwrap();
        assert_eq!(out.dimensions(), (4, 3));
        assert_eq!(
            out,
            grid(&[&[0, 0, 0, 0], &[0, 0, 1, 0], &[0, 1, 0, 1]])
        );
    }

    #[test]
    fn test_pad_zero_is_identity() {
        let g = sample();
        assert_eq!(pad(&g, Padding::default()).unwrap(), g);
    }

    #[test]
    fn test_pad_then_trim_recovers_ink_box() {
        let g = grid(&[&[0, 0, 0], &[0, 1, 1], &[0, 1, 0]]);
        let padded = pad(&g, Padding::new(2, 3, 1, 4).unwrap()).unwrap();
        assert_eq!(padded.dimensions(), (8, 8));
        assert_eq!(trim(&padded), trim(&g));
    }

    #[test]
    fn test_pad_empty_grid() {
        let out = pad(&BitGrid::default(), Padding::new(1, 1, 1, 1).unwrap()).unwrap();
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(out.count_ink(), 0);

        let out = pad(&BitGrid::default(), Padding::new(2, 0, 0, 0).unwrap()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_pad_overflow_is_an_error() {
        let g = sample();
        let wide = Padding {
            left: usize::MAX,
            ..Default::default()
        };
        assert!(matches!(pad(&g, wide), Err(ConvertError::ImageTooLarge(_))));

        let tall = Padding {
            top: usize::MAX - 1,
            bottom: 1,
            ..Default::default()
        };
        assert!(matches!(pad(&g, tall), Err(ConvertError::ImageTooLarge(_))));

        // each side fits, the area does not
        let huge = Padding {
            left: 1 << 40,
            top: 1 << 40,
            ..Default::default()
        };
        assert!(matches!(pad(&g, huge), Err(ConvertError::ImageTooLarge(_))));

        let options = EditOptions {
            pad: wide,
            ..Default::default()
        };
        assert!(matches!(
            apply_edits(&g, &options),
            Err(ConvertError::ImageTooLarge(_))
        ));
    }

    #[test]
    fn test_negative_padding_rejected() {
        let err = Padding::new(0, -1, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::InvalidPadding {
                side: "right",
                value: -1
            }
        ));
    }

    #[test]
    fn test_draw_parse() {
        assert_eq!(
            "3, 4, SET".parse::<Draw>().unwrap(),
            Draw::new(3, 4, DrawAction::Set)
        );
        assert_eq!(
            "0,0,clear".parse::<Draw>().unwrap(),
            Draw::new(0, 0, DrawAction::Clear)
        );
        assert!("1,2".parse::<Draw>().is_err());
        assert!("a,2,set".parse::<Draw>().is_err());
        assert!("1,2,toggle".parse::<Draw>().is_err());
    }

    #[test]
    fn test_draws_apply_in_order() {
        let g = BitGrid::new(2, 2);
        let draws = [
            Draw::new(0, 0, DrawAction::Set),
            Draw::new(0, 0, DrawAction::Clear),
            Draw::new(1, 1, DrawAction::Set),
        ];
        let out = draw(&g, &draws).unwrap();
        assert!(!out.get(0, 0));
        assert!(out.get(1, 1));
        // input untouched
        assert_eq!(g.count_ink(), 0);
    }

    #[test]
    fn test_draw_out_of_bounds() {
        let g = BitGrid::new(3, 2);
        let err = draw(&g, &[Draw::new(5, 0, DrawAction::Set)]).unwrap_err();
        assert_eq!(err.to_string(), "draw out of bounds: (5,0) for size 3x2");
        assert!(draw(&g, &[Draw::new(0, -1, DrawAction::Set)]).is_err());
    }

    #[test]
    fn test_draw_in_place_keeps_earlier_draws() {
        let mut g = BitGrid::new(3, 2);
        let draws = [
            Draw::new(1, 1, DrawAction::Set),
            Draw::new(3, 0, DrawAction::Set),
            Draw::new(0, 0, DrawAction::Set),
        ];
        assert!(draw_in_place(&mut g, &draws).is_err());
        assert!(g.get(1, 1));
        assert!(!g.get(0, 0));
    }

    #[test]
    fn test_apply_edits_default_borrows() {
        let g = sample();
        let out = apply_edits(&g, &EditOptions::default()).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(*out, g);
    }

    #[test]
    fn test_apply_edits_chain() {
        let options = EditOptions {
            invert: true,
            flip_h: true,
            pad: Padding::new(1, 0, 0, 0).unwrap(),
            ..Default::default()
        };
        let input = sample();
        let out = apply_edits(&input, &options).unwrap();
        assert_eq!(out.width(), 4);
        assert_eq!(*out, grid(&[&[0, 1, 0, 1], &[0, 0, 1, 0]]));
    }

    #[test]
    fn test_apply_edits_order_rotate_before_trim_before_pad() {
        // ink in the top-left corner of a 4x2 grid
        let g = grid(&[&[1, 0, 0, 0], &[0, 0, 0, 0]]);
        let options = EditOptions {
            rotate: Some(Rotation::Deg90),
            trim: true,
            pad: Padding::new(0, 1, 0, 0).unwrap(),
            draws: vec![Draw::new(1, 0, DrawAction::Set)],
            ..Default::default()
        };
        let out = apply_edits(&g, &options).unwrap();
        assert_eq!(*out, grid(&[&[1, 1]]));
    }

    #[test]
    fn test_apply_edits_draws_use_post_pad_coordinates() {
        let g = BitGrid::new(2, 2);
        let options = EditOptions {
            pad: Padding::new(0, 0, 0, 2).unwrap(),
            draws: vec![Draw::new(1, 3, DrawAction::Set)],
            ..Default::default()
        };
        let out = apply_edits(&g, &options).unwrap();
        assert_eq!(out.dimensions(), (2, 4));
        assert!(out.get(1, 3));
    }

    #[test]
    fn test_apply_edits_fails_on_bad_draw() {
        let options = EditOptions {
            draws: vec![Draw::new(5, 0, DrawAction::Set)],
            ..Default::default()
        };
        let err = apply_edits(&BitGrid::new(3, 2), &options).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::DrawOutOfBounds {
                x: 5,
                y: 0,
                width: 3,
                height: 2
            }
        ));
    }
}
