//! Error box drawn in place of a board or a movetext whose input was rejected.

use gpui::{Div, SharedString, div, prelude::*, px, rgb};

use crate::error::UserDataError;
use crate::ui::theme::{ERROR_BG, ERROR_BORDER, TEXT_PRIMARY, TEXT_SECONDARY};

/// Title, message, and the offending line with a caret when the position is known
pub fn render_error_box(error: &UserDataError) -> Div {
    let excerpt = error.excerpt.as_ref().map(|excerpt| {
        let line = excerpt.line();
        div()
            .mt_2()
            .flex()
            .flex_col()
            .font_family("Berkeley Mono")
            .text_sm()
            .child(
                div()
                    .text_color(rgb(TEXT_SECONDARY))
                    .child(SharedString::from(format!("Line {}:", line.line_number))),
            )
            .child(div().text_color(rgb(TEXT_PRIMARY)).child(SharedString::from(line.line)))
            .child(div().text_color(rgb(ERROR_BORDER)).child(SharedString::from(line.caret)))
    });

    div()
        .flex()
        .flex_col()
        .p_3()
        .bg(rgb(ERROR_BG))
        .border_1()
        .border_color(rgb(ERROR_BORDER))
        .rounded(px(4.0))
        .child(
            div()
                .text_color(rgb(ERROR_BORDER))
                .font_weight(gpui::FontWeight::BOLD)
                .child(error.title()),
        )
        .child(
            div()
                .text_color(rgb(TEXT_PRIMARY))
                .child(SharedString::from(error.message.clone())),
        )
        .when_some(excerpt, |el, excerpt| el.child(excerpt))
}
