//! Board model - per-instance state of one chessboard.
//!
//! Holds the caller's configuration, the parsed position/move/markers, and the
//! transient interaction state (drag gesture, promotion drawer, animation).
//! Semantic board events are emitted through gpui's `EventEmitter`.

use std::time::Instant;

use gpui::{Context, EventEmitter};
use log::{debug, warn};
use shakmaty::Square;

use crate::config::{COMPONENT, ChessboardConfig};
use crate::domain::drag::{DragEvent, DragGesture, ListenerChange, PointerButton, PointerInput};
use crate::domain::geometry::{BoardLayout, Point};
use crate::domain::interaction::{BoardEvent, BoardInteraction, InteractionMode};
use crate::domain::markers::{AnnotationColor, ArrowMarkers, SquareMarkers, TextMarkers};
use crate::domain::render_plan::{BoardScene, PlayedMove, RenderPlan, build_render_plan};
use crate::domain::rules::{BoardPosition, MoveDescriptor, parse_position};
use crate::domain::small_screen::{ResolvedDisplay, resolve_display};
use crate::domain::{MoveAnimation, PieceKind};
use crate::error::{IllegalArgument, UserDataError};
use crate::ui::theme::{Colorset, Pieceset, find_colorset, find_pieceset};

/// Parsed position and optional move
#[derive(Clone, Debug)]
pub struct BoardContent {
    pub position: BoardPosition,
    pub played: Option<(MoveDescriptor, BoardPosition)>,
}

impl BoardContent {
    pub fn parse(position: &str, played_move: Option<&str>) -> Result<Self, UserDataError> {
        let position = parse_position(position)?;
        let played = match played_move {
            Some(text) => {
                let descriptor = position.parse_move(text)?;
                let after = position.play(&descriptor)?;
                Some((descriptor, after))
            }
            None => None,
        };
        Ok(Self { position, played })
    }

    /// Position after the move, if any
    pub fn displayed_position(&self) -> &BoardPosition {
        self.played.as_ref().map_or(&self.position, |(_, after)| after)
    }
}

pub struct BoardModel {
    config: ChessboardConfig,
    colorset: &'static Colorset,
    pieceset: &'static Pieceset,
    content: Result<BoardContent, UserDataError>,
    square_markers: SquareMarkers,
    text_markers: TextMarkers,
    arrow_markers: ArrowMarkers,
    interaction: BoardInteraction,
    gesture: DragGesture,
    animation: Option<MoveAnimation>,
    /// Square the current gesture started on
    gesture_square: Option<Square>,
    /// Measured window width, for small-screen limits
    viewport_width: f32,
    /// Window position of the board canvas top-left corner
    canvas_origin: Point,
}

impl EventEmitter<BoardEvent> for BoardModel {}

impl BoardModel {
    pub fn new(config: ChessboardConfig) -> Result<Self, IllegalArgument> {
        config.validate()?;
        let colorset = find_colorset(&config.colorset, COMPONENT)?;
        let pieceset = find_pieceset(&config.pieceset, COMPONENT)?;
        let content = BoardContent::parse(&config.position, config.played_move.as_deref());
        if let Err(e) = &content {
            warn!("chessboard content rejected: {e}");
        }
        let mut model = Self {
            square_markers: config.square_markers(),
            text_markers: config.text_markers(),
            arrow_markers: config.arrow_markers(),
            interaction: BoardInteraction::new(config.interaction_mode),
            config,
            colorset,
            pieceset,
            content,
            gesture: DragGesture::new(),
            animation: None,
            gesture_square: None,
            viewport_width: f32::INFINITY,
            canvas_origin: Point::new(0.0, 0.0),
        };
        model.rekey_animation();
        Ok(model)
    }

    pub fn config(&self) -> &ChessboardConfig {
        &self.config
    }

    pub fn colorset(&self) -> &'static Colorset {
        self.colorset
    }

    pub fn pieceset(&self) -> &'static Pieceset {
        self.pieceset
    }

    pub fn content(&self) -> Result<&BoardContent, &UserDataError> {
        self.content.as_ref()
    }

    pub fn interaction(&self) -> &BoardInteraction {
        &self.interaction
    }

    // -- caller-facing setters --

    /// Show a new position and optional move; restarts the animation
    pub fn set_position(&mut self, position: &str, played_move: Option<&str>, cx: &mut Context<Self>) {
        self.config.position = position.to_string();
        self.config.played_move = played_move.map(str::to_string);
        self.content = BoardContent::parse(position, played_move);
        if let Err(e) = &self.content {
            warn!("chessboard content rejected: {e}");
        }
        self.interaction.reset();
        self.cancel_gesture();
        self.rekey_animation();
        cx.notify();
    }

    pub fn set_markers(
        &mut self,
        square_markers: SquareMarkers,
        text_markers: TextMarkers,
        arrow_markers: ArrowMarkers,
        cx: &mut Context<Self>,
    ) {
        self.square_markers = square_markers;
        self.text_markers = text_markers;
        self.arrow_markers = arrow_markers;
        cx.notify();
    }

    pub fn arrow_markers(&self) -> &ArrowMarkers {
        &self.arrow_markers
    }

    /// Replace the arrow markers only, keeping the square and text markers
    pub fn set_arrow_markers(&mut self, arrow_markers: ArrowMarkers, cx: &mut Context<Self>) {
        self.arrow_markers = arrow_markers;
        cx.notify();
    }

    pub fn set_flipped(&mut self, flipped: bool, cx: &mut Context<Self>) {
        if self.config.flipped != flipped {
            self.config.flipped = flipped;
            cx.notify();
        }
    }

    pub fn set_interaction_mode(
        &mut self,
        mode: InteractionMode,
        edited_arrow_color: Option<AnnotationColor>,
        cx: &mut Context<Self>,
    ) -> Result<(), IllegalArgument> {
        let mut config = self.config.clone();
        config.interaction_mode = mode;
        config.edited_arrow_color = edited_arrow_color;
        config.validate()?;
        self.config = config;
        self.interaction.set_mode(mode);
        self.cancel_gesture();
        cx.notify();
        Ok(())
    }

    /// Switch theme; the animation keeps running
    pub fn set_theme(&mut self, colorset: &str, pieceset: &str, cx: &mut Context<Self>) -> Result<(), IllegalArgument> {
        self.colorset = find_colorset(colorset, COMPONENT)?;
        self.pieceset = find_pieceset(pieceset, COMPONENT)?;
        self.config.colorset = colorset.to_string();
        self.config.pieceset = pieceset.to_string();
        cx.notify();
        Ok(())
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width;
    }

    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.canvas_origin = origin;
    }

    // -- layout and rendering --

    pub fn display(&self) -> ResolvedDisplay {
        resolve_display(
            self.config.square_size,
            self.config.coordinate_visible,
            self.config.turn_visible,
            &self.config.small_screen_limits,
            self.viewport_width,
        )
    }

    pub fn layout(&self) -> BoardLayout {
        let display = self.display();
        BoardLayout::new(
            display.square_size,
            self.config.flipped,
            display.coordinate_visible,
            display.turn_visible,
        )
    }

    pub fn cursor(&self) -> f32 {
        self.animation.as_ref().map_or(1.0, MoveAnimation::cursor)
    }

    pub fn render_plan(&self) -> Result<RenderPlan, &UserDataError> {
        let content = self.content.as_ref()?;
        let scene = BoardScene {
            layout: self.layout(),
            position: &content.position,
            played: content
                .played
                .as_ref()
                .map(|(descriptor, after)| PlayedMove { descriptor, after }),
            square_markers: &self.square_markers,
            text_markers: &self.text_markers,
            arrow_markers: &self.arrow_markers,
            move_arrow_visible: self.config.move_arrow_visible,
            move_arrow_color: self.config.move_arrow_color,
            edited_arrow_color: self.config.edited_arrow_color,
            interaction: &self.interaction,
            cursor: self.cursor(),
        };
        Ok(build_render_plan(&scene))
    }

    /// Advance the move animation; returns whether another frame is needed
    pub fn advance_animation(&mut self, now: Instant) -> bool {
        match self.animation.as_mut() {
            Some(animation) if animation.needs_frame() => {
                animation.on_frame(now);
                animation.needs_frame()
            }
            _ => false,
        }
    }

    /// A fresh animation for each position+move identity
    fn rekey_animation(&mut self) {
        let animate = self.config.animated
            && matches!(&self.content, Ok(BoardContent { played: Some((mv, _)), .. }) if !mv.is_null());
        self.animation = animate.then(MoveAnimation::default);
        if animate {
            debug!("animation armed for {:?}", self.config.played_move);
        }
    }

    // -- pointer input --

    /// Whether window-wide pointer listeners must be registered
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_listening()
    }

    /// Press on the hit region of `square`, `position` in window coordinates
    pub fn pointer_down(
        &mut self,
        square: Square,
        button: PointerButton,
        position: Point,
        cx: &mut Context<Self>,
    ) {
        if self.interaction.mode() == InteractionMode::ClickSquares {
            if button == PointerButton::Primary {
                self.interaction.click_press(square);
            }
            return;
        }
        let Ok(content) = self.content.as_ref() else {
            return;
        };
        if !self.interaction.can_drag_from(square, content.displayed_position()) {
            return;
        }
        let region = self.layout().square_origin(square);
        let target_origin = region.offset(self.canvas_origin.x, self.canvas_origin.y);
        let outcome = self.gesture.handle(PointerInput::MouseDown {
            button,
            position,
            target_origin,
        });
        if outcome.event.is_some() {
            self.gesture_square = Some(square);
        }
        self.apply(outcome.event, cx);
    }

    /// Primary button released over the hit region of `square`
    pub fn square_released(&mut self, square: Square, cx: &mut Context<Self>) {
        if let Some(event) = self.interaction.click_release(Some(square)) {
            cx.emit(event);
        }
    }

    pub fn pointer_move(&mut self, position: Point, cx: &mut Context<Self>) {
        let outcome = self.gesture.handle(PointerInput::MouseMove { position });
        self.apply(outcome.event, cx);
    }

    pub fn pointer_up(&mut self, position: Point, cx: &mut Context<Self>) {
        let outcome = self.gesture.handle(PointerInput::MouseUp { position });
        self.apply(outcome.event, cx);
    }

    /// Abandon the current gesture, e.g. when the button was released outside the window
    pub fn pointer_cancel(&mut self, cx: &mut Context<Self>) {
        if self.gesture.is_dragging() {
            self.cancel_gesture();
            cx.notify();
        }
    }

    fn apply(&mut self, event: Option<DragEvent>, cx: &mut Context<Self>) {
        let Some(event) = event else { return };
        let layout = self.layout();
        let Ok(content) = self.content.as_ref() else {
            return;
        };
        let position = content.displayed_position();
        match event {
            DragEvent::Start { x, y } => {
                let accepted = self
                    .gesture_square
                    .is_some_and(|square| self.interaction.drag_start(square, Point::new(x, y), position));
                if !accepted {
                    self.cancel_gesture();
                }
            }
            DragEvent::Drag { dx, dy } => self.interaction.drag_move(dx, dy, &layout),
            DragEvent::Stop { dx, dy } => {
                self.gesture_square = None;
                if let Some(event) = self.interaction.drag_stop(dx, dy, &layout, position) {
                    cx.emit(event);
                }
            }
            DragEvent::Canceled => {
                self.gesture_square = None;
                self.interaction.drag_cancel();
            }
        }
        cx.notify();
    }

    fn cancel_gesture(&mut self) {
        if self.gesture.dispose() == ListenerChange::Detach {
            debug!("drag listeners released");
        }
        self.gesture_square = None;
        self.interaction.drag_cancel();
    }

    // -- promotion drawer --

    pub fn choose_promotion(&mut self, kind: PieceKind, cx: &mut Context<Self>) {
        let Ok(content) = self.content.as_ref() else {
            return;
        };
        if let Some(event) = self.interaction.promotion_choose(kind, content.displayed_position()) {
            cx.emit(event);
        }
        cx.notify();
    }

    pub fn cancel_promotion(&mut self, cx: &mut Context<Self>) {
        self.interaction.promotion_cancel();
        cx.notify();
    }
}
