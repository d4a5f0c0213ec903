//! Square rendering components: fills, highlights, and coordinate labels.

use gpui::{Rgba, div, prelude::*, px};

use crate::domain::Point;
use crate::ui::theme::{HOVER_OUTLINE_WIDTH, SQUARE_MARKER_OPACITY};

/// Render a square fill at `origin` (canvas coordinates)
pub fn render_square(origin: Point, square_size: f32, color: Rgba) -> impl IntoElement {
    div()
        .absolute()
        .left(px(origin.x))
        .top(px(origin.y))
        .size(px(square_size))
        .bg(color)
}

/// Semi-transparent square highlight
pub fn render_square_marker(origin: Point, square_size: f32, color: Rgba) -> impl IntoElement {
    render_square(
        origin,
        square_size,
        Rgba {
            a: SQUARE_MARKER_OPACITY,
            ..color
        },
    )
}

/// Outline of the square under the pointer during a drag
pub fn render_hover_outline(origin: Point, square_size: f32, color: Rgba) -> impl IntoElement {
    div()
        .absolute()
        .left(px(origin.x))
        .top(px(origin.y))
        .size(px(square_size))
        .border(px(square_size * HOVER_OUTLINE_WIDTH))
        .border_color(color)
}

/// Text centered on `center`, in a box of `box_size`
pub fn render_centered_text(
    text: impl Into<gpui::SharedString>,
    center: Point,
    box_size: f32,
    font_size: f32,
    color: Rgba,
) -> impl IntoElement {
    div()
        .absolute()
        .left(px(center.x - box_size / 2.0))
        .top(px(center.y - box_size / 2.0))
        .size(px(box_size))
        .flex()
        .items_center()
        .justify_center()
        .text_size(px(font_size))
        .text_color(color)
        .child(text.into())
}
