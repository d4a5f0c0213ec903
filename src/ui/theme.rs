//! Theme constants and colors for the chess UI: colorsets, piecesets and the
//! colors of the surrounding panels.

use gpui::{Rgba, SharedString, rgb};

use crate::domain::{AnnotationColor, Piece, PieceColor};
use crate::error::IllegalArgument;

// Layout constants
pub const BOARD_PADDING: f32 = 20.0;
pub const PIECE_SCALE: f32 = 0.98; // piece size relative to square
pub const GHOST_OPACITY: f32 = 0.4;
/// Stroke width of arrows, relative to square size
pub const ARROW_WIDTH: f32 = 0.12;
/// Width of the hovered square outline, relative to square size
pub const HOVER_OUTLINE_WIDTH: f32 = 0.06;
pub const SQUARE_MARKER_OPACITY: f32 = 0.6;
/// Text marker glyph size, relative to square size
pub const TEXT_MARKER_SCALE: f32 = 0.7;
/// Arrow head length, relative to square size
pub const ARROW_HEAD_LENGTH: f32 = 0.3;

// Initial panel sizes
pub const INITIAL_LEFT_PANEL: f32 = 450.0;
pub const INITIAL_RIGHT_PANEL: f32 = 350.0;

// Panel colors
pub const PANEL_BG: u32 = 0x2a2a2a;
pub const MOVE_LIST_BG: u32 = 0x1e1e1e;
pub const BORDER_COLOR: u32 = 0x4a4a4a;
pub const TEXT_PRIMARY: u32 = 0xffffff;
pub const TEXT_SECONDARY: u32 = 0x888888;
pub const ERROR_BG: u32 = 0x3a1e1e;
pub const ERROR_BORDER: u32 = 0xc0392b;
pub const PROMOTION_BUTTON_BG: u32 = 0xf5f5f5;

/// Board colors: square fills plus the four annotation colors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colorset {
    pub name: &'static str,
    pub light: u32,
    pub dark: u32,
    pub blue: u32,
    pub green: u32,
    pub red: u32,
    pub yellow: u32,
}

impl Colorset {
    pub fn square(&self, dark: bool) -> Rgba {
        rgb(if dark { self.dark } else { self.light })
    }

    pub fn annotation(&self, color: AnnotationColor) -> Rgba {
        rgb(match color {
            AnnotationColor::Blue => self.blue,
            AnnotationColor::Green => self.green,
            AnnotationColor::Red => self.red,
            AnnotationColor::Yellow => self.yellow,
        })
    }
}

const fn colorset(name: &'static str, light: u32, dark: u32) -> Colorset {
    Colorset {
        name,
        light,
        dark,
        blue: 0x0044ff,
        green: 0x00bb00,
        red: 0xff0000,
        yellow: 0xffdd00,
    }
}

pub const COLORSETS: [Colorset; 7] = [
    colorset("original", 0xf0dec7, 0xb5876b),
    colorset("coffee", 0xe6d3b1, 0xa67c52),
    colorset("marine", 0xe1e8f0, 0x7f97b5),
    colorset("rosy", 0xf8e1e7, 0xc98c9f),
    colorset("sandcastle", 0xf4e6c6, 0xd3a35d),
    colorset("wikipedia", 0xffce9e, 0xd18b47),
    Colorset {
        name: "scid",
        light: 0xf3f3f3,
        dark: 0x7389b6,
        blue: 0x0033cc,
        green: 0x009900,
        red: 0xcc0000,
        yellow: 0xffcc00,
    },
];

/// Piece and turn-flag images, stored as `assets/pieces/<name>/<code>.svg`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pieceset {
    pub name: &'static str,
}

/// Image codes of a pieceset: 12 pieces and the 2 turn flags
pub const PIECESET_CODES: [&str; 14] = [
    "wp", "wr", "wn", "wb", "wq", "wk", "bp", "br", "bn", "bb", "bq", "bk", "wx", "bx",
];

impl Pieceset {
    fn image(&self, code: &str) -> SharedString {
        SharedString::from(format!("assets/pieces/{}/{code}.svg", self.name))
    }

    pub fn piece(&self, piece: Piece) -> SharedString {
        self.image(piece.code())
    }

    pub fn turn_flag(&self, color: PieceColor) -> SharedString {
        self.image(match color {
            PieceColor::White => "wx",
            PieceColor::Black => "bx",
        })
    }

    /// Every image of the set, keyed by code
    pub fn images(&self) -> Vec<(&'static str, SharedString)> {
        PIECESET_CODES
            .iter()
            .map(|&code| (code, self.image(code)))
            .collect()
    }
}

pub const PIECESETS: [Pieceset; 6] = [
    Pieceset { name: "cburnett" },
    Pieceset { name: "celtic" },
    Pieceset { name: "eyes" },
    Pieceset { name: "fantasy" },
    Pieceset { name: "skulls" },
    Pieceset { name: "spatial" },
];

pub fn colorset_names() -> impl Iterator<Item = &'static str> {
    COLORSETS.iter().map(|c| c.name)
}

pub fn pieceset_names() -> impl Iterator<Item = &'static str> {
    PIECESETS.iter().map(|p| p.name)
}

/// Look up a colorset; unknown names are a caller error of `component`
pub fn find_colorset(name: &str, component: &'static str) -> Result<&'static Colorset, IllegalArgument> {
    COLORSETS
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| IllegalArgument::new(component, "colorset", format!("unknown colorset \"{name}\"")))
}

/// Look up a pieceset; unknown names are a caller error of `component`
pub fn find_pieceset(name: &str, component: &'static str) -> Result<&'static Pieceset, IllegalArgument> {
    PIECESETS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| IllegalArgument::new(component, "pieceset", format!("unknown pieceset \"{name}\"")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PieceKind;

    #[test]
    fn test_lookup() {
        assert_eq!(find_colorset("marine", "Chessboard").unwrap().name, "marine");
        assert_eq!(find_pieceset("celtic", "Chessboard").unwrap().name, "celtic");

        let err = find_colorset("neon", "Chessboard").unwrap_err();
        assert_eq!(err.attribute, "colorset");
        assert_eq!(err.component, "Chessboard");
        assert!(find_pieceset("", "Movetext").is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!(colorset_names().count(), 7);
        assert_eq!(pieceset_names().next(), Some("cburnett"));
    }

    #[test]
    fn test_pieceset_images() {
        let set = find_pieceset("cburnett", "Chessboard").unwrap();
        assert_eq!(set.images().len(), 14);
        assert_eq!(
            set.piece(Piece::new(PieceColor::Black, PieceKind::Knight)).to_string(),
            "assets/pieces/cburnett/bn.svg"
        );
        assert_eq!(
            set.turn_flag(PieceColor::White).to_string(),
            "assets/pieces/cburnett/wx.svg"
        );
    }
}
