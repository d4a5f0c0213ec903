//! Promotion drawer: a click-catcher over the board and one button per choice.

use gpui::{Div, Entity, MouseButton, SharedString, div, img, prelude::*, px, rgb};

use crate::domain::render_plan::PromotionOverlay;
use crate::models::BoardModel;
use crate::ui::theme::{BORDER_COLOR, PIECE_SCALE, PROMOTION_BUTTON_BG, Pieceset};

pub fn render_promotion_drawer(
    overlay: &PromotionOverlay,
    square_size: f32,
    pieceset: &Pieceset,
    model: &Entity<BoardModel>,
) -> Div {
    let model_cancel = model.clone();
    let catcher = div()
        .id("promotion-catcher")
        .absolute()
        .left(px(overlay.catcher_origin.x))
        .top(px(overlay.catcher_origin.y))
        .size(px(overlay.catcher_size))
        .on_mouse_down(MouseButton::Left, move |_, _, cx| {
            cx.stop_propagation();
            model_cancel.update(cx, |board, cx| board.cancel_promotion(cx));
        });

    let buttons = overlay.buttons.iter().map(|button| {
        let model = model.clone();
        let kind = button.kind;
        div()
            .id(SharedString::from(format!("promotion-{}", button.piece.code())))
            .absolute()
            .left(px(button.origin.x))
            .top(px(button.origin.y))
            .size(px(square_size))
            .flex()
            .items_center()
            .justify_center()
            .bg(rgb(PROMOTION_BUTTON_BG))
            .border_1()
            .border_color(rgb(BORDER_COLOR))
            .cursor_pointer()
            .hover(|s| s.bg(rgb(0xdddddd)))
            .on_mouse_down(MouseButton::Left, move |_, _, cx| {
                cx.stop_propagation();
                model.update(cx, |board, cx| board.choose_promotion(kind, cx));
            })
            .child(img(pieceset.piece(button.piece)).size(px(square_size * PIECE_SCALE)))
    });

    div()
        .absolute()
        .top_0()
        .left_0()
        .size_full()
        .child(catcher)
        .children(buttons)
}
