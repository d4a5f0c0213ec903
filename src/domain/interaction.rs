//! Chessboard interaction state machine.
//!
//! Owns the transient state of one board: the drag session (dragged, hovered and
//! inhibited squares) and the promotion drawer. Drag events coming out of the
//! gesture controller are turned into semantic [`BoardEvent`]s according to the
//! active [`InteractionMode`].
//!
//! At most one of {drag session, promotion drawer} exists at any time.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use shakmaty::Square;

use crate::domain::chess::{PieceColor, PieceKind};
use crate::domain::geometry::{BoardLayout, Point, pixel_to_square, square_to_pixel};
use crate::domain::rules::{BoardPosition, MoveInfo, MoveStatus};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum InteractionMode {
    #[default]
    None,
    MovePieces,
    ClickSquares,
    EditArrows,
    PlayMoves,
}

impl InteractionMode {
    /// Whether per-square hit regions must be drawn
    pub fn has_hit_regions(self) -> bool {
        self != InteractionMode::None
    }

    /// Whether hit regions start drags (as opposed to plain clicks)
    pub fn is_draggable(self) -> bool {
        matches!(
            self,
            InteractionMode::MovePieces | InteractionMode::EditArrows | InteractionMode::PlayMoves
        )
    }
}

/// Semantic outcome of a gesture, delivered to the board's owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardEvent {
    PieceMoved { from: Square, to: Square },
    SquareClicked(Square),
    ArrowEdited { from: Square, to: Square },
    MovePlayed(String),
}

/// State of one drag, alive between drag start and drag stop/cancel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub origin: Square,
    /// Current drop target, if the pointer is over the board
    pub hovered: Option<Square>,
    /// Pointer position within the origin square at drag start
    pub grab_offset: Point,
    /// Cumulative pointer displacement
    pub displacement: Point,
}

/// Promotion piece selection, entered when a dragged pawn reaches its last rank.
#[derive(Clone, Debug)]
pub struct PromotionDrawer {
    pub from: Square,
    pub to: Square,
    pub color: PieceColor,
    pub choices: Vec<PieceKind>,
    builder: MoveInfo,
}

#[derive(Clone, Debug, Default)]
pub struct BoardInteraction {
    mode: InteractionMode,
    drag: Option<DragSession>,
    promotion: Option<PromotionDrawer>,
    /// Square pressed in click-squares mode, waiting for its release
    pressed: Option<Square>,
}

impl BoardInteraction {
    pub fn new(mode: InteractionMode) -> Self {
        Self {
            mode,
            drag: None,
            promotion: None,
            pressed: None,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Switch mode; any transient state belongs to the old mode and is dropped.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            self.mode = mode;
            self.reset();
        }
    }

    /// Back to idle
    pub fn reset(&mut self) {
        self.drag = None;
        self.promotion = None;
        self.pressed = None;
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn promotion(&self) -> Option<&PromotionDrawer> {
        self.promotion.as_ref()
    }

    pub fn dragged_square(&self) -> Option<Square> {
        self.drag.map(|d| d.origin)
    }

    pub fn hovered_square(&self) -> Option<Square> {
        self.drag.and_then(|d| d.hovered)
    }

    /// Square whose static piece glyph is hidden: the origin of a piece drag, or
    /// the origin of the pawn waiting for its promotion piece.
    pub fn inhibited_square(&self) -> Option<Square> {
        if let Some(promotion) = &self.promotion {
            return Some(promotion.from);
        }
        match (self.mode, self.drag) {
            (InteractionMode::EditArrows, _) | (_, None) => None,
            (_, Some(drag)) => Some(drag.origin),
        }
    }

    /// Whether a drag may start from `square` in the current mode
    pub fn can_drag_from(&self, square: Square, position: &BoardPosition) -> bool {
        if self.promotion.is_some() || self.drag.is_some() {
            return false;
        }
        match self.mode {
            InteractionMode::MovePieces => position.piece_at(square).is_some(),
            InteractionMode::EditArrows => true,
            InteractionMode::PlayMoves => position.can_move_from(square),
            InteractionMode::ClickSquares | InteractionMode::None => false,
        }
    }

    /// Begin a drag from `square`; `grab_offset` is the pointer position within it.
    /// Returns whether the drag was accepted.
    pub fn drag_start(&mut self, square: Square, grab_offset: Point, position: &BoardPosition) -> bool {
        if !self.can_drag_from(square, position) {
            return false;
        }
        debug!("drag start from {square} ({:?})", self.mode);
        self.drag = Some(DragSession {
            origin: square,
            hovered: Some(square),
            grab_offset,
            displacement: Point::new(0.0, 0.0),
        });
        true
    }

    pub fn drag_move(&mut self, dx: f32, dy: f32, layout: &BoardLayout) {
        if let Some(drag) = self.drag.as_mut() {
            drag.displacement = Point::new(dx, dy);
            drag.hovered = target_square(drag, layout);
        }
    }

    pub fn drag_cancel(&mut self) {
        if self.drag.take().is_some() {
            debug!("drag canceled");
        }
    }

    /// Finish a drag; returns the event to deliver, if the drop does something.
    pub fn drag_stop(
        &mut self,
        dx: f32,
        dy: f32,
        layout: &BoardLayout,
        position: &BoardPosition,
    ) -> Option<BoardEvent> {
        let mut drag = self.drag.take()?;
        drag.displacement = Point::new(dx, dy);
        let target = target_square(&drag, layout)?;
        if target == drag.origin {
            return None;
        }

        let event = match self.mode {
            InteractionMode::MovePieces => Some(BoardEvent::PieceMoved {
                from: drag.origin,
                to: target,
            }),
            InteractionMode::EditArrows => Some(BoardEvent::ArrowEdited {
                from: drag.origin,
                to: target,
            }),
            InteractionMode::PlayMoves => self.play(drag.origin, target, position),
            InteractionMode::ClickSquares | InteractionMode::None => None,
        };
        if let Some(event) = &event {
            info!("board event: {event:?}");
        }
        event
    }

    fn play(&mut self, from: Square, to: Square, position: &BoardPosition) -> Option<BoardEvent> {
        let info = position.is_move_legal(from, to)?;
        match info.status() {
            MoveStatus::Regular => {
                let descriptor = info.build(None)?;
                Some(BoardEvent::MovePlayed(position.notation(&descriptor)))
            }
            MoveStatus::Promotion => {
                debug!("promotion pending on {to}");
                self.promotion = Some(PromotionDrawer {
                    from,
                    to,
                    color: position.turn(),
                    choices: info.promotions(),
                    builder: info,
                });
                None
            }
        }
    }

    /// Press on a square hit region (click-squares mode)
    pub fn click_press(&mut self, square: Square) {
        if self.mode == InteractionMode::ClickSquares {
            self.pressed = Some(square);
        }
    }

    /// Release over `square`; a click is a press and a release on the same square
    pub fn click_release(&mut self, square: Option<Square>) -> Option<BoardEvent> {
        let pressed = self.pressed.take()?;
        if self.mode != InteractionMode::ClickSquares || square != Some(pressed) {
            return None;
        }
        info!("square clicked: {pressed}");
        Some(BoardEvent::SquareClicked(pressed))
    }

    /// Pick a piece in the promotion drawer, finalizing the move
    pub fn promotion_choose(&mut self, kind: PieceKind, position: &BoardPosition) -> Option<BoardEvent> {
        let drawer = self.promotion.take()?;
        let descriptor = drawer.builder.build(Some(kind))?;
        let event = BoardEvent::MovePlayed(position.notation(&descriptor));
        info!("board event: {event:?}");
        Some(event)
    }

    /// Click outside the drawer
    pub fn promotion_cancel(&mut self) {
        if self.promotion.take().is_some() {
            debug!("promotion canceled");
        }
    }

    /// Top-left corner of the floating piece, kept inside the 8x8 area
    pub fn floating_piece_origin(&self, layout: &BoardLayout) -> Option<Point> {
        let drag = self.drag?;
        let size = layout.square_size_px();
        let start = square_to_pixel(drag.origin, size, layout.flipped);
        let max = size * 7.0;
        Some(Point::new(
            (start.x + drag.displacement.x).clamp(0.0, max),
            (start.y + drag.displacement.y).clamp(0.0, max),
        ))
    }

    /// Pointer position during a drag, kept inside the 8x8 area
    pub fn pointer(&self, layout: &BoardLayout) -> Option<Point> {
        let drag = self.drag?;
        Some(layout.clamp_to_board(pointer_position(&drag, layout)))
    }
}

fn pointer_position(drag: &DragSession, layout: &BoardLayout) -> Point {
    let start = square_to_pixel(drag.origin, layout.square_size_px(), layout.flipped);
    start
        .offset(drag.grab_offset.x, drag.grab_offset.y)
        .offset(drag.displacement.x, drag.displacement.y)
}

fn target_square(drag: &DragSession, layout: &BoardLayout) -> Option<Square> {
    let p = pointer_position(drag, layout);
    pixel_to_square(p.x, p.y, layout.square_size_px(), layout.flipped)
}

/// Where the promotion buttons go: a column on the destination square growing
/// away from the board edge the destination is near.
pub fn promotion_button_origins(drawer: &PromotionDrawer, layout: &BoardLayout) -> Vec<(PieceKind, Point)> {
    let size = layout.square_size_px();
    let origin = square_to_pixel(drawer.to, size, layout.flipped);
    let downward = origin.y < size * 4.0;
    drawer
        .choices
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let step = i as f32 * size;
            let y = if downward { origin.y + step } else { origin.y - step };
            (*kind, Point::new(origin.x, y))
        })
        .collect()
}
