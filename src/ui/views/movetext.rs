//! Movetext view - the score of a PGN game, with headers, comments, variations,
//! embedded diagrams, and keyboard move selection.

use std::collections::HashMap;

use gpui::{
    AnyElement, App, Context, Div, Entity, EventEmitter, FocusHandle, Focusable, KeyBinding,
    SharedString, Stateful, Window, actions, div, prelude::*, px, rgb,
};
use log::warn;

use crate::config::ChessboardConfig;
use crate::domain::MoveNodeId;
use crate::domain::move_tree::MoveTree;
use crate::domain::movetext::{
    CommentSegment, LineItem, MoveDisplay, MoveSelection, SelectionKey, main_line_items,
};
use crate::domain::pgn::parse_pgn;
use crate::error::UserDataError;
use crate::models::BoardModel;
use crate::ui::components::render_error_box;
use crate::ui::theme::{BORDER_COLOR, MOVE_LIST_BG, TEXT_PRIMARY, TEXT_SECONDARY};
use crate::ui::views::ChessboardView;

const MOVE_HOVER_BG: u32 = 0x3a3a3a;
const MOVE_SELECTED_BG: u32 = 0x4a6da7;
const VARIATION_BG: u32 = 0x252525;
const VARIATION_BORDER: u32 = 0x3a3a3a;
const NAG_COLOR: u32 = 0xe0a040;

/// Headers shown above the moves, in this order
const SHOWN_HEADERS: [&str; 5] = ["Event", "Site", "Date", "Round", "Annotator"];

actions!(movetext, [SelectFirst, SelectPrevious, SelectNext, SelectLast, ExitSelection]);

const KEY_CONTEXT: &str = "Movetext";

/// Keys of a movetext with a selected move
pub fn bind_keys(cx: &mut App) {
    cx.bind_keys([
        KeyBinding::new("home", SelectFirst, Some(KEY_CONTEXT)),
        KeyBinding::new("left", SelectPrevious, Some(KEY_CONTEXT)),
        KeyBinding::new("right", SelectNext, Some(KEY_CONTEXT)),
        KeyBinding::new("end", SelectLast, Some(KEY_CONTEXT)),
        KeyBinding::new("escape", ExitSelection, Some(KEY_CONTEXT)),
    ]);
}

/// Selection changed, by a click or a key. `None` when the selection was left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveSelected(pub Option<MoveNodeId>);

pub struct MovetextView {
    game: Result<MoveTree, UserDataError>,
    items: Vec<LineItem>,
    selection: MoveSelection,
    diagrams: HashMap<MoveNodeId, Entity<ChessboardView>>,
    focus_handle: FocusHandle,
}

impl EventEmitter<MoveSelected> for MovetextView {}

impl Focusable for MovetextView {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl MovetextView {
    /// `diagram_config` sets the appearance of the diagrams embedded in comments,
    /// and must pass [`ChessboardConfig::validate`]
    pub fn new(pgn: &str, game_index: usize, diagram_config: ChessboardConfig, cx: &mut Context<Self>) -> Self {
        let game = parse_pgn(pgn, game_index);
        if let Err(e) = &game {
            warn!("movetext rejected: {e}");
        }
        let items = game.as_ref().map(main_line_items).unwrap_or_default();

        let mut diagrams = HashMap::new();
        if let Ok(tree) = &game {
            for node_id in diagram_nodes(&items) {
                let Some(node) = tree.get(node_id) else { continue };
                let config = ChessboardConfig {
                    position: node.position.to_text(),
                    played_move: None,
                    ..diagram_config.clone()
                };
                match BoardModel::new(config) {
                    Ok(board) => {
                        let model = cx.new(|_| board);
                        diagrams.insert(node_id, cx.new(|cx| ChessboardView::new(model, cx)));
                    }
                    Err(e) => warn!("diagram skipped: {e}"),
                }
            }
        }

        Self {
            game,
            items,
            selection: MoveSelection::default(),
            diagrams,
            focus_handle: cx.focus_handle(),
        }
    }

    pub fn tree(&self) -> Option<&MoveTree> {
        self.game.as_ref().ok()
    }

    pub fn selection(&self) -> Option<MoveNodeId> {
        self.selection.selected()
    }

    /// Select a move (or the start of the game with the root id); `None` leaves the selection
    pub fn select(&mut self, id: Option<MoveNodeId>, cx: &mut Context<Self>) {
        if self.selection.selected() != id {
            self.selection.select(id);
            cx.emit(MoveSelected(id));
            cx.notify();
        }
    }

    fn handle_key(&mut self, key: SelectionKey, cx: &mut Context<Self>) {
        let Ok(tree) = &self.game else { return };
        if let Some(selected) = self.selection.handle_key(key, tree) {
            cx.emit(MoveSelected(selected));
            cx.notify();
        }
    }

    fn select_first(&mut self, _: &SelectFirst, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(SelectionKey::First, cx);
    }

    fn select_previous(&mut self, _: &SelectPrevious, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(SelectionKey::Previous, cx);
    }

    fn select_next(&mut self, _: &SelectNext, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(SelectionKey::Next, cx);
    }

    fn select_last(&mut self, _: &SelectLast, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(SelectionKey::Last, cx);
    }

    fn exit_selection(&mut self, _: &ExitSelection, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(SelectionKey::Exit, cx);
    }

    fn render_headers(&self, tree: &MoveTree) -> Div {
        let players = match (tree.header("White"), tree.header("Black")) {
            (None, None) => None,
            (white, black) => Some(format!("{} - {}", white.unwrap_or("?"), black.unwrap_or("?"))),
        };
        let details = SHOWN_HEADERS.iter().filter_map(|&name| {
            let value = tree.header(name).filter(|v| !v.is_empty() && *v != "?")?;
            Some(
                div()
                    .text_sm()
                    .text_color(rgb(TEXT_SECONDARY))
                    .child(SharedString::from(format!("{name}: {value}"))),
            )
        });

        div()
            .flex()
            .flex_col()
            .pb_2()
            .mb_2()
            .border_b_1()
            .border_color(rgb(BORDER_COLOR))
            .when_some(players, |el, players| {
                el.child(
                    div()
                        .text_color(rgb(TEXT_PRIMARY))
                        .font_weight(gpui::FontWeight::BOLD)
                        .child(SharedString::from(players)),
                )
            })
            .children(details)
    }

    fn render_line(&self, items: &[LineItem], cx: &mut Context<Self>) -> Div {
        let mut segments: Vec<AnyElement> = Vec::new();
        let mut inline: Vec<AnyElement> = Vec::new();

        fn flush(inline: &mut Vec<AnyElement>, segments: &mut Vec<AnyElement>) {
            if !inline.is_empty() {
                segments.push(
                    div()
                        .flex()
                        .flex_wrap()
                        .gap_1()
                        .children(inline.drain(..).collect::<Vec<_>>())
                        .into_any_element(),
                );
            }
        }

        for item in items {
            match item {
                LineItem::Move(mv) => {
                    if let Some(number) = &mv.move_number {
                        inline.push(
                            div()
                                .text_color(rgb(TEXT_SECONDARY))
                                .child(SharedString::from(number.clone()))
                                .into_any_element(),
                        );
                    }
                    inline.push(self.render_move(mv, cx).into_any_element());
                }
                LineItem::Comment { node_id, segments: parts } => {
                    for part in parts {
                        match part {
                            CommentSegment::Text(text) => inline.push(
                                div()
                                    .italic()
                                    .text_color(rgb(TEXT_SECONDARY))
                                    .child(SharedString::from(text.clone()))
                                    .into_any_element(),
                            ),
                            CommentSegment::Diagram => {
                                if let Some(diagram) = self.diagrams.get(node_id) {
                                    flush(&mut inline, &mut segments);
                                    segments.push(
                                        div().py_2().child(diagram.clone()).into_any_element(),
                                    );
                                }
                            }
                        }
                    }
                }
                LineItem::Variations(variations) => {
                    flush(&mut inline, &mut segments);
                    let block = div().flex().flex_col().gap_1().w_full().my_1().children(
                        variations.iter().map(|variation| {
                            self.render_line(variation, cx)
                                .px_2()
                                .py_1()
                                .bg(rgb(VARIATION_BG))
                                .border_l_2()
                                .border_color(rgb(VARIATION_BORDER))
                                .rounded_sm()
                        }),
                    );
                    segments.push(block.into_any_element());
                }
            }
        }
        flush(&mut inline, &mut segments);

        div().flex().flex_col().gap_1().children(segments)
    }

    fn render_move(&self, mv: &MoveDisplay, cx: &mut Context<Self>) -> Stateful<Div> {
        let node_id = mv.node_id;
        let is_selected = self.selection.selected() == Some(node_id);
        let nags = mv.nags.concat();

        div()
            .id(SharedString::from(format!("move-node-{node_id}")))
            .flex()
            .px_1()
            .rounded(px(3.0))
            .cursor_pointer()
            .text_color(rgb(TEXT_PRIMARY))
            .when(is_selected, |el| el.bg(rgb(MOVE_SELECTED_BG)))
            .when(!is_selected, |el| el.hover(|s| s.bg(rgb(MOVE_HOVER_BG))))
            .on_click(cx.listener(move |this, _, window, cx| {
                window.focus(&this.focus_handle);
                this.select(Some(node_id), cx);
            }))
            .child(SharedString::from(mv.notation.clone()))
            .when(!nags.is_empty(), |el| {
                el.child(div().text_color(rgb(NAG_COLOR)).child(SharedString::from(nags)))
            })
    }
}

/// Nodes whose comments hold a diagram
fn diagram_nodes(items: &[LineItem]) -> Vec<MoveNodeId> {
    let mut nodes = Vec::new();
    for item in items {
        match item {
            LineItem::Comment { node_id, segments } => {
                if segments.contains(&CommentSegment::Diagram) {
                    nodes.push(*node_id);
                }
            }
            LineItem::Variations(variations) => {
                for variation in variations {
                    nodes.extend(diagram_nodes(variation));
                }
            }
            LineItem::Move(_) => {}
        }
    }
    nodes
}

impl Render for MovetextView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let body = match &self.game {
            Err(error) => div().child(render_error_box(error)),
            Ok(tree) => {
                let headers = self.render_headers(tree);
                let result = tree.result.clone();
                let moves = if self.items.is_empty() {
                    div().text_color(rgb(TEXT_SECONDARY)).child("No moves")
                } else {
                    self.render_line(&self.items, cx)
                };
                div()
                    .flex()
                    .flex_col()
                    .child(headers)
                    .child(moves)
                    .when_some(result, |el, result| {
                        el.child(
                            div()
                                .mt_2()
                                .text_color(rgb(TEXT_PRIMARY))
                                .font_weight(gpui::FontWeight::BOLD)
                                .child(SharedString::from(result)),
                        )
                    })
            }
        };

        div()
            .id("movetext")
            .track_focus(&self.focus_handle)
            .key_context(KEY_CONTEXT)
            .on_action(cx.listener(Self::select_first))
            .on_action(cx.listener(Self::select_previous))
            .on_action(cx.listener(Self::select_next))
            .on_action(cx.listener(Self::select_last))
            .on_action(cx.listener(Self::exit_selection))
            .size_full()
            .overflow_y_scroll()
            .p_4()
            .bg(rgb(MOVE_LIST_BG))
            .border_1()
            .border_color(rgb(BORDER_COLOR))
            .rounded_md()
            .child(body)
    }
}
