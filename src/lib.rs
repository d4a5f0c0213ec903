//! Chessboard, movetext and navigation-board components for gpui.
//!
//! Board logic (geometry, drag gestures, interaction modes, animation, markers,
//! PGN import) lives in the gpui-free [`domain`] module; [`models`] and [`ui`]
//! put it on screen.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod ui;

pub use config::{ChessboardConfig, ConfigError};
pub use domain::geometry::{BoardExtent, MAX_SQUARE_SIZE, MIN_SQUARE_SIZE};
pub use error::{IllegalArgument, UserDataError, UserDataErrorKind};
pub use ui::theme::{colorset_names, pieceset_names};

/// Size of the canvas of a board, without mounting a view
pub fn board_size(square_size: u32, coordinate_visible: bool, turn_visible: bool) -> BoardExtent {
    domain::geometry::board_extent(square_size, coordinate_visible, turn_visible)
}

/// Largest square size whose board fits in `width` x `height`
pub fn adapt_square_size(width: f32, height: f32, coordinate_visible: bool, turn_visible: bool) -> u32 {
    domain::geometry::max_square_size_fitting(width, height, coordinate_visible, turn_visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_queries() {
        assert_eq!(MIN_SQUARE_SIZE, 12);
        assert_eq!(MAX_SQUARE_SIZE, 96);
        let extent = board_size(40, false, false);
        assert_eq!(extent.width, 320.0);
        assert_eq!(adapt_square_size(320.0, 320.0, false, false), 40);
        assert_eq!(adapt_square_size(319.0, 400.0, false, false), 39);
        assert!(colorset_names().any(|name| name == "scid"));
        assert_eq!(pieceset_names().count(), 6);
    }
}
