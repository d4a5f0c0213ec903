//! Board geometry - conversions between squares and canvas pixels, and canvas sizing.
//!
//! The canvas is laid out as: rank labels (left margin) | 8x8 squares | turn flag
//! column (right), with file labels below the squares.

use shakmaty::Square;

use crate::domain::chess::{PieceColor, file_index, rank_index, square_at};

/// Smallest square size a board can be drawn with
pub const MIN_SQUARE_SIZE: u32 = 12;
/// Largest square size a board can be drawn with
pub const MAX_SQUARE_SIZE: u32 = 96;

/// Gap between the squares and the turn flag column, as a fraction of square size
pub const TURN_FLAG_SPACING: f32 = 0.1;
/// Width of the rank label margin, as a multiple of the coordinate font size
pub const RANK_LABEL_WIDTH_FACTOR: f32 = 1.2;
/// Height of the file label margin, as a multiple of the coordinate font size
pub const FILE_LABEL_HEIGHT_FACTOR: f32 = 1.4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoardExtent {
    pub width: f32,
    pub height: f32,
}

/// Top-left corner of a square, relative to the top-left corner of the 8x8 area
pub fn square_to_pixel(square: Square, square_size: f32, flipped: bool) -> Point {
    let file = file_index(square) as f32;
    let rank = rank_index(square) as f32;
    let x = if flipped { 7.0 - file } else { file };
    let y = if flipped { rank } else { 7.0 - rank };
    Point::new(x * square_size, y * square_size)
}

/// Square under a pixel of the 8x8 area, `None` outside of it
pub fn pixel_to_square(x: f32, y: f32, square_size: f32, flipped: bool) -> Option<Square> {
    if x < 0.0 || y < 0.0 || square_size <= 0.0 {
        return None;
    }
    let col = (x / square_size).floor() as i32;
    let row = (y / square_size).floor() as i32;
    if col > 7 || row > 7 {
        return None;
    }
    let (file, rank) = if flipped { (7 - col, row) } else { (col, 7 - row) };
    square_at(file, rank)
}

/// Center of a square, relative to the 8x8 area
pub fn square_center(square: Square, square_size: f32, flipped: bool) -> Point {
    square_to_pixel(square, square_size, flipped).offset(square_size / 2.0, square_size / 2.0)
}

/// Font size of the coordinate labels
pub fn coordinate_font_size(square_size: u32) -> f32 {
    if square_size <= 32 {
        8.0
    } else {
        8.0 + 0.2 * (square_size - 32) as f32
    }
}

pub fn rank_label_width(square_size: u32) -> f32 {
    coordinate_font_size(square_size) * RANK_LABEL_WIDTH_FACTOR
}

pub fn file_label_height(square_size: u32) -> f32 {
    coordinate_font_size(square_size) * FILE_LABEL_HEIGHT_FACTOR
}

/// Width of the column holding the turn flag, spacing included
pub fn turn_flag_column_width(square_size: u32) -> f32 {
    square_size as f32 * (1.0 + TURN_FLAG_SPACING)
}

/// Total size of the canvas needed to draw a board
pub fn board_extent(square_size: u32, coordinate_visible: bool, turn_visible: bool) -> BoardExtent {
    let base = square_size as f32 * 8.0;
    let mut width = base;
    let mut height = base;
    if turn_visible {
        width += turn_flag_column_width(square_size);
    }
    if coordinate_visible {
        width += rank_label_width(square_size);
        height += file_label_height(square_size);
    }
    BoardExtent { width, height }
}

/// Largest square size within `[MIN_SQUARE_SIZE, MAX_SQUARE_SIZE]` whose board fits in the box
pub fn max_square_size_fitting(
    width: f32,
    height: f32,
    coordinate_visible: bool,
    turn_visible: bool,
) -> u32 {
    max_square_size_fitting_in(
        width,
        height,
        coordinate_visible,
        turn_visible,
        MIN_SQUARE_SIZE,
        MAX_SQUARE_SIZE,
    )
}

/// Binary search for the largest square size in `[lower, upper]` fitting the box.
///
/// Returns `lower` when even the smallest board overflows, and `upper` when the
/// largest one fits.
pub fn max_square_size_fitting_in(
    width: f32,
    height: f32,
    coordinate_visible: bool,
    turn_visible: bool,
    lower: u32,
    upper: u32,
) -> u32 {
    let fits = |size: u32| {
        let extent = board_extent(size, coordinate_visible, turn_visible);
        extent.width <= width && extent.height <= height
    };

    if upper <= lower || !fits(lower) {
        return lower;
    }
    if fits(upper) {
        return upper;
    }

    // fits(lo) && !fits(hi)
    let (mut lo, mut hi) = (lower, upper);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Position of every board element on the canvas for one square size / decoration set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    pub square_size: u32,
    pub flipped: bool,
    pub coordinate_visible: bool,
    pub turn_visible: bool,
}

impl BoardLayout {
    pub fn new(square_size: u32, flipped: bool, coordinate_visible: bool, turn_visible: bool) -> Self {
        Self {
            square_size: square_size.clamp(MIN_SQUARE_SIZE, MAX_SQUARE_SIZE),
            flipped,
            coordinate_visible,
            turn_visible,
        }
    }

    pub fn square_size_px(&self) -> f32 {
        self.square_size as f32
    }

    /// Get the total size of the board (8 squares)
    pub fn board_total_size(&self) -> f32 {
        self.square_size_px() * 8.0
    }

    pub fn extent(&self) -> BoardExtent {
        board_extent(self.square_size, self.coordinate_visible, self.turn_visible)
    }

    /// Offset of the 8x8 area within the canvas
    pub fn board_origin(&self) -> Point {
        if self.coordinate_visible {
            Point::new(rank_label_width(self.square_size), 0.0)
        } else {
            Point::new(0.0, 0.0)
        }
    }

    /// Top-left corner of a square in canvas coordinates
    pub fn square_origin(&self, square: Square) -> Point {
        let origin = self.board_origin();
        let p = square_to_pixel(square, self.square_size_px(), self.flipped);
        p.offset(origin.x, origin.y)
    }

    /// Square under a canvas pixel
    pub fn square_at_canvas(&self, x: f32, y: f32) -> Option<Square> {
        let origin = self.board_origin();
        pixel_to_square(x - origin.x, y - origin.y, self.square_size_px(), self.flipped)
    }

    /// Clamp a point of the 8x8 area so it stays within it
    pub fn clamp_to_board(&self, p: Point) -> Point {
        let max = self.board_total_size();
        Point::new(p.x.clamp(0.0, max), p.y.clamp(0.0, max))
    }

    /// Canvas position of the turn flag: next to the row of the side to move
    pub fn turn_flag_origin(&self, turn: PieceColor) -> Point {
        let origin = self.board_origin();
        let size = self.square_size_px();
        let at_bottom = (turn == PieceColor::White) != self.flipped;
        let x = origin.x + self.board_total_size() + size * TURN_FLAG_SPACING;
        let y = if at_bottom { origin.y + 7.0 * size } else { origin.y };
        Point::new(x, y)
    }

    /// Canvas position of the label of a rank (0 = rank 1), centered on its row
    pub fn rank_label_center(&self, rank: u32) -> Point {
        let size = self.square_size_px();
        let row = if self.flipped { rank } else { 7 - rank };
        Point::new(
            rank_label_width(self.square_size) / 2.0,
            (row as f32 + 0.5) * size,
        )
    }

    /// Canvas position of the label of a file (0 = file a), centered on its column
    pub fn file_label_center(&self, file: u32) -> Point {
        let origin = self.board_origin();
        let size = self.square_size_px();
        let col = if self.flipped { 7 - file } else { file };
        Point::new(
            origin.x + (col as f32 + 0.5) * size,
            self.board_total_size() + file_label_height(self.square_size) / 2.0,
        )
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::new(40, false, true, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_to_pixel() {
        assert_eq!(square_to_pixel(Square::A1, 40.0, false), Point::new(0.0, 280.0));
        assert_eq!(square_to_pixel(Square::H8, 40.0, false), Point::new(280.0, 0.0));
        assert_eq!(square_to_pixel(Square::A1, 40.0, true), Point::new(280.0, 0.0));
        assert_eq!(square_to_pixel(Square::E4, 10.0, true), Point::new(30.0, 30.0));
    }

    #[test]
    fn test_pixel_square_round_trip() {
        for flipped in [false, true] {
            for size in MIN_SQUARE_SIZE..=MAX_SQUARE_SIZE {
                let size = size as f32;
                for square in Square::ALL {
                    let p = square_to_pixel(square, size, flipped);
                    assert_eq!(pixel_to_square(p.x, p.y, size, flipped), Some(square));
                    let c = square_center(square, size, flipped);
                    assert_eq!(pixel_to_square(c.x, c.y, size, flipped), Some(square));
                }
            }
        }
    }

    #[test]
    fn test_pixel_outside_board() {
        assert_eq!(pixel_to_square(-1.0, 10.0, 40.0, false), None);
        assert_eq!(pixel_to_square(10.0, 320.0, 40.0, false), None);
        assert_eq!(pixel_to_square(320.0, 10.0, 40.0, true), None);
        assert_eq!(pixel_to_square(319.9, 319.9, 40.0, false), Some(Square::H1));
    }

    #[test]
    fn test_font_size() {
        assert_eq!(coordinate_font_size(12), 8.0);
        assert_eq!(coordinate_font_size(32), 8.0);
        assert!((coordinate_font_size(42) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_board_extent() {
        let plain = board_extent(40, false, false);
        assert_eq!(plain, BoardExtent { width: 320.0, height: 320.0 });

        let with_turn = board_extent(40, false, true);
        assert!((with_turn.width - 364.0).abs() < 1e-3);
        assert_eq!(with_turn.height, 320.0);

        let with_coords = board_extent(40, true, false);
        assert!((with_coords.width - 331.52).abs() < 1e-3);
        assert!((with_coords.height - 333.44).abs() < 1e-3);
    }

    #[test]
    fn test_max_square_size_exact_boundary() {
        assert_eq!(max_square_size_fitting(400.0, 400.0, false, false), 50);
        assert_eq!(max_square_size_fitting(399.0, 400.0, false, false), 49);
        assert_eq!(max_square_size_fitting(400.0, 399.9, false, false), 49);

        // 9.1 * 50 = 455
        assert_eq!(max_square_size_fitting(456.0, 400.0, false, true), 50);
        assert_eq!(max_square_size_fitting(454.0, 400.0, false, true), 49);

        // size 40: 331.52 x 333.44
        assert_eq!(max_square_size_fitting(332.0, 334.0, true, false), 40);
        assert_eq!(max_square_size_fitting(331.0, 334.0, true, false), 39);
        assert_eq!(max_square_size_fitting(332.0, 333.0, true, false), 39);
    }

    #[test]
    fn test_max_square_size_extremes() {
        assert_eq!(max_square_size_fitting(10.0, 10.0, true, true), MIN_SQUARE_SIZE);
        assert_eq!(max_square_size_fitting(5000.0, 5000.0, true, true), MAX_SQUARE_SIZE);
        assert_eq!(max_square_size_fitting_in(400.0, 400.0, false, false, 20, 30), 30);
    }

    #[test]
    fn test_max_square_size_monotone() {
        let mut previous = 0;
        for w in (0..1200).step_by(7) {
            let size = max_square_size_fitting(w as f32, 900.0, true, true);
            assert!(size >= previous);
            previous = size;
        }
        let mut previous = 0;
        for h in (0..1200).step_by(5) {
            let size = max_square_size_fitting(900.0, h as f32, true, false);
            assert!(size >= previous);
            previous = size;
        }
    }

    #[test]
    fn test_layout_origin_and_turn_flag() {
        let layout = BoardLayout::new(40, false, false, true);
        assert_eq!(layout.square_origin(Square::A8), Point::new(0.0, 0.0));
        assert_eq!(layout.turn_flag_origin(PieceColor::White).y, 280.0);
        assert_eq!(layout.turn_flag_origin(PieceColor::Black).y, 0.0);

        let flipped = BoardLayout::new(40, true, false, true);
        assert_eq!(flipped.turn_flag_origin(PieceColor::White).y, 0.0);
        assert_eq!(flipped.square_at_canvas(5.0, 5.0), Some(Square::H1));
    }

    #[test]
    fn test_layout_clamps_square_size() {
        assert_eq!(BoardLayout::new(4, false, true, true).square_size, MIN_SQUARE_SIZE);
        assert_eq!(BoardLayout::new(400, false, true, true).square_size, MAX_SQUARE_SIZE);
    }
}
