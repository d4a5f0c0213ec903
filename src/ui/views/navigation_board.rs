//! Navigation board - a chessboard over a game with first/previous/next/last
//! buttons and a flip toggle.

use gpui::{App, Context, Entity, SharedString, Subscription, Window, div, prelude::*, px, rgb};

use crate::models::NavigationModel;
use crate::ui::theme::{PANEL_BG, TEXT_PRIMARY};
use crate::ui::views::ChessboardView;

const NAV_BUTTON_BG: u32 = 0x3a3a3a;
const NAV_BUTTON_HOVER_BG: u32 = 0x4a4a4a;
const NAV_BUTTON_DISABLED: u32 = 0x555555;

pub struct NavigationBoardView {
    model: Entity<NavigationModel>,
    board: Entity<ChessboardView>,
    _subscription: Subscription,
}

impl NavigationBoardView {
    pub fn new(model: Entity<NavigationModel>, cx: &mut Context<Self>) -> Self {
        let board_model = model.read(cx).board().clone();
        let board = cx.new(|cx| ChessboardView::new(board_model, cx));
        let _subscription = cx.observe(&model, |_, _, cx| cx.notify());
        Self {
            model,
            board,
            _subscription,
        }
    }

    pub fn model(&self) -> &Entity<NavigationModel> {
        &self.model
    }
}

impl Render for NavigationBoardView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let navigation = self.model.read(cx);
        let at_start = navigation.is_at_start();
        let at_end = navigation.is_at_end();

        let model_first = self.model.clone();
        let model_previous = self.model.clone();
        let model_next = self.model.clone();
        let model_last = self.model.clone();
        let model_flip = self.model.clone();

        div()
            .flex()
            .flex_col()
            .items_center()
            .gap_3()
            .p_4()
            .bg(rgb(PANEL_BG))
            .child(self.board.clone())
            .child(
                div()
                    .flex()
                    .items_center()
                    .justify_center()
                    .gap_2()
                    .child(render_nav_button("⟨⟨", !at_start, move |cx| {
                        model_first.update(cx, |nav, cx| nav.first(cx));
                    }))
                    .child(render_nav_button("⟨", !at_start, move |cx| {
                        model_previous.update(cx, |nav, cx| nav.previous(cx));
                    }))
                    .child(render_nav_button("⟩", !at_end, move |cx| {
                        model_next.update(cx, |nav, cx| nav.next(cx));
                    }))
                    .child(render_nav_button("⟩⟩", !at_end, move |cx| {
                        model_last.update(cx, |nav, cx| nav.last(cx));
                    }))
                    .child(render_nav_button("⇅", true, move |cx| {
                        model_flip.update(cx, |nav, cx| nav.flip(cx));
                    })),
            )
    }
}

fn render_nav_button(
    label: &'static str,
    enabled: bool,
    on_click: impl Fn(&mut App) + 'static,
) -> impl IntoElement {
    div()
        .id(SharedString::from(format!("nav-{label}")))
        .px_4()
        .py_2()
        .rounded(px(4.0))
        .text_color(if enabled {
            rgb(TEXT_PRIMARY)
        } else {
            rgb(NAV_BUTTON_DISABLED)
        })
        .font_weight(gpui::FontWeight::BOLD)
        .when(enabled, |el| {
            el.bg(rgb(NAV_BUTTON_BG))
                .cursor_pointer()
                .hover(|s| s.bg(rgb(NAV_BUTTON_HOVER_BG)))
                .on_click(move |_ev, _window, cx| {
                    on_click(cx);
                })
        })
        .when(!enabled, |el| el.bg(rgb(PANEL_BG)))
        .child(label)
}
