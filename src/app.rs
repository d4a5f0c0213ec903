//! Application setup and window creation for the demo.
//!
//! The demo plays the caller role: it owns the board inputs and applies the
//! board events back to them (moves played, pieces moved, arrows toggled).

use gpui::{
    App, Bounds, Context, Div, Entity, Pixels, Subscription, Window, WindowBounds, WindowOptions, div,
    prelude::*, px, rgb, size,
};
use gpui_component::Root;
use gpui_component::resizable::{h_resizable, resizable_panel};
use log::{debug, error, info};

use crate::config::ChessboardConfig;
use crate::domain::markers::SquareCouple;
use crate::domain::move_tree::MoveTree;
use crate::domain::pgn::parse_pgn;
use crate::domain::{BoardEvent, InteractionMode};
use crate::error::IllegalArgument;
use crate::models::{BoardModel, NavigationModel};
use crate::ui::theme::{BOARD_PADDING, INITIAL_LEFT_PANEL, INITIAL_RIGHT_PANEL, PANEL_BG};
use crate::ui::views::{ChessboardView, MoveSelected, MovetextView, NavigationBoardView, bind_keys};

/// Square size of the diagrams embedded in comments
const DIAGRAM_SQUARE_SIZE: u32 = 24;

/// What the demo window shows
pub struct DemoOptions {
    pub config: ChessboardConfig,
    /// PGN text and index of the game to show
    pub pgn: Option<(String, usize)>,
}

struct GameModels {
    pgn: String,
    game_index: usize,
    diagram_config: ChessboardConfig,
    /// Board and tree of the navigation board, absent when the game does not parse
    navigation: Option<(BoardModel, MoveTree)>,
}

/// Everything fallible, checked before the window opens
struct DemoModels {
    board: BoardModel,
    game: Option<GameModels>,
}

impl DemoModels {
    fn new(options: DemoOptions) -> Result<Self, IllegalArgument> {
        let board = BoardModel::new(options.config.clone())?;
        let game = match options.pgn {
            Some((pgn, game_index)) => {
                let defaults = ChessboardConfig::default();
                let appearance = ChessboardConfig {
                    position: defaults.position,
                    played_move: None,
                    interaction_mode: InteractionMode::None,
                    edited_arrow_color: None,
                    square_markers: defaults.square_markers,
                    text_markers: defaults.text_markers,
                    arrow_markers: defaults.arrow_markers,
                    ..options.config
                };
                let diagram_config = ChessboardConfig {
                    square_size: DIAGRAM_SQUARE_SIZE,
                    animated: false,
                    ..appearance.clone()
                };
                diagram_config.validate()?;
                let navigation = match parse_pgn(&pgn, game_index) {
                    Ok(tree) => Some((BoardModel::new(appearance)?, tree)),
                    Err(e) => {
                        debug!("no navigation board: {e}");
                        None
                    }
                };
                Some(GameModels {
                    pgn,
                    game_index,
                    diagram_config,
                    navigation,
                })
            }
            None => None,
        };
        Ok(Self { board, game })
    }
}

struct GameViews {
    navigation: Option<Entity<NavigationBoardView>>,
    movetext: Entity<MovetextView>,
}

pub struct DemoView {
    board: Entity<ChessboardView>,
    game: Option<GameViews>,
    _subscriptions: Vec<Subscription>,
}

impl DemoView {
    fn new(models: DemoModels, cx: &mut Context<Self>) -> Self {
        let board_model = cx.new(|_| models.board);
        let mut subscriptions = vec![cx.subscribe(&board_model, Self::on_board_event)];
        let board = cx.new(|cx| ChessboardView::new(board_model, cx));

        let game = models.game.map(|game| {
            let movetext = cx.new(|cx| {
                MovetextView::new(&game.pgn, game.game_index, game.diagram_config, cx)
            });
            let navigation = game.navigation.map(|(board, tree)| {
                let board = cx.new(|_| board);
                let navigation = cx.new(|cx| NavigationModel::new(tree, board, cx));
                let target = navigation.clone();
                subscriptions.push(cx.subscribe(
                    &movetext,
                    move |_, _, event: &MoveSelected, cx| {
                        if let MoveSelected(Some(id)) = event {
                            target.update(cx, |navigation, cx| navigation.go_to(*id, cx));
                        }
                    },
                ));
                cx.new(|cx| NavigationBoardView::new(navigation, cx))
            });
            GameViews { navigation, movetext }
        });

        Self {
            board,
            game,
            _subscriptions: subscriptions,
        }
    }

    fn on_board_event(&mut self, model: Entity<BoardModel>, event: &BoardEvent, cx: &mut Context<Self>) {
        info!("demo received {event:?}");
        model.update(cx, |board, cx| {
            let Ok(content) = board.content() else { return };
            let current = content.displayed_position().clone();
            match event {
                BoardEvent::MovePlayed(notation) => {
                    board.set_position(&current.to_text(), Some(notation), cx);
                }
                BoardEvent::PieceMoved { from, to } => {
                    let mut edited = current;
                    let piece = edited.piece_at(*from);
                    edited.set_square(*from, None);
                    edited.set_square(*to, piece);
                    board.set_position(&edited.to_text(), None, cx);
                }
                BoardEvent::ArrowEdited { from, to } => {
                    let Some(color) = board.config().edited_arrow_color else { return };
                    let mut arrows = board.arrow_markers().clone();
                    let couple = SquareCouple::new(*from, *to);
                    if arrows.remove(&couple).is_none() {
                        arrows.insert(couple, color);
                    }
                    board.set_arrow_markers(arrows, cx);
                }
                BoardEvent::SquareClicked(square) => info!("clicked {square}"),
            }
        });
    }
}

impl Render for DemoView {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        let board_panel = div()
            .size_full()
            .flex()
            .items_center()
            .justify_center()
            .p(px(BOARD_PADDING))
            .bg(rgb(PANEL_BG))
            .child(self.board.clone());

        let Some(game) = &self.game else {
            return div().size_full().child(board_panel);
        };

        div().size_full().child(
            h_resizable("demo-layout")
                .child(
                    resizable_panel()
                        .size(px(INITIAL_LEFT_PANEL))
                        .size_range(px(320.)..px(1200.))
                        .child(board_panel),
                )
                .child(
                    resizable_panel()
                        .size(px(INITIAL_RIGHT_PANEL))
                        .size_range(px(150.)..Pixels::MAX)
                        .child(render_game_panel(game)),
                ),
        )
    }
}

fn render_game_panel(game: &GameViews) -> Div {
    div()
        .size_full()
        .flex()
        .flex_col()
        .bg(rgb(PANEL_BG))
        .when_some(game.navigation.clone(), |el, navigation| el.child(navigation))
        .child(div().flex_1().min_h_0().child(game.movetext.clone()))
}

/// Initialize and run the demo window
pub fn run(cx: &mut App, options: DemoOptions) {
    gpui_component::init(cx);
    bind_keys(cx);

    let models = match DemoModels::new(options) {
        Ok(models) => models,
        Err(e) => {
            error!("{e}");
            cx.quit();
            return;
        }
    };

    let bounds = Bounds::centered(None, size(px(900.0), px(600.0)), cx);
    let opened = cx.open_window(
        WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            ..Default::default()
        },
        |window, cx| {
            let view = cx.new(|cx| DemoView::new(models, cx));
            cx.new(|cx| Root::new(view, window, cx))
        },
    );
    if let Err(e) = opened {
        error!("failed to open the demo window: {e}");
        cx.quit();
    }
}
