//! Piece rendering component.

use gpui::{SharedString, div, img, prelude::*, px};

use crate::domain::Point;
use crate::ui::theme::PIECE_SCALE;

/// Render a piece image on the square whose top-left corner is `origin`
pub fn render_piece(image: SharedString, origin: Point, square_size: f32) -> impl IntoElement {
    let piece_size = square_size * PIECE_SCALE;
    div()
        .absolute()
        .left(px(origin.x))
        .top(px(origin.y))
        .size(px(square_size))
        .flex()
        .items_center()
        .justify_center()
        .child(img(image).size(px(piece_size)))
}

