//! What a chessboard draws, and where, for one frame.
//!
//! [`build_render_plan`] turns the board inputs (position, optional move, markers,
//! interaction state, animation cursor) into positioned primitives in canvas
//! coordinates. The gpui view only paints them, layer by layer, in [`LAYER_ORDER`].

use shakmaty::Square;

use crate::domain::chess::{Piece, PieceColor, PieceKind, is_dark_square};
use crate::domain::geometry::{BoardExtent, BoardLayout, Point, square_center};
use crate::domain::interaction::{BoardInteraction, InteractionMode, promotion_button_origins};
use crate::domain::markers::{AnnotationColor, ArrowMarkers, SquareMarkers, TextMarkers};
use crate::domain::rules::{BoardPosition, MoveDescriptor};

/// Arrow tips stop short of the destination center by this fraction of the square size
pub const ARROW_TIP_OFFSET: f32 = 0.3;
/// Cursor above which a promoting pawn is drawn as the promoted piece
pub const PROMOTION_GLYPH_THRESHOLD: f32 = 0.8;
/// Cursor below which the move arrow is not drawn
pub const MOVE_ARROW_THRESHOLD: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    SquareFills,
    SquareMarkers,
    HoveredOutline,
    Pieces,
    TextMarkers,
    ArrowMarkers,
    MoveArrow,
    HitRegions,
    PromotionDrawer,
    DraggedItem,
    TurnFlag,
}

/// Paint order, bottom to top
pub const LAYER_ORDER: [Layer; 11] = [
    Layer::SquareFills,
    Layer::SquareMarkers,
    Layer::HoveredOutline,
    Layer::Pieces,
    Layer::TextMarkers,
    Layer::ArrowMarkers,
    Layer::MoveArrow,
    Layer::HitRegions,
    Layer::PromotionDrawer,
    Layer::DraggedItem,
    Layer::TurnFlag,
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquareFill {
    pub square: Square,
    pub origin: Point,
    pub dark: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateLabel {
    pub text: char,
    pub center: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighlightedSquare {
    pub origin: Point,
    pub color: AnnotationColor,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedPiece {
    pub piece: Piece,
    pub origin: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedText {
    pub center: Point,
    pub glyph: String,
    pub color: AnnotationColor,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedArrow {
    pub from: Point,
    pub to: Point,
    pub color: AnnotationColor,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRegion {
    pub square: Square,
    pub origin: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PromotionButton {
    pub kind: PieceKind,
    pub piece: Piece,
    pub origin: Point,
}

/// Piece choices plus the full-board click catcher behind them
#[derive(Clone, Debug, PartialEq)]
pub struct PromotionOverlay {
    pub catcher_origin: Point,
    pub catcher_size: f32,
    pub buttons: Vec<PromotionButton>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FloatingItem {
    Piece(PlacedPiece),
    Arrow(PlacedArrow),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnFlag {
    pub color: PieceColor,
    pub origin: Point,
}

/// A move to display, with the position it leads to
#[derive(Clone, Copy, Debug)]
pub struct PlayedMove<'a> {
    pub descriptor: &'a MoveDescriptor,
    pub after: &'a BoardPosition,
}

/// Inputs of one frame
#[derive(Clone, Copy, Debug)]
pub struct BoardScene<'a> {
    pub layout: BoardLayout,
    /// Position before `played`, or the displayed position if there is no move
    pub position: &'a BoardPosition,
    pub played: Option<PlayedMove<'a>>,
    pub square_markers: &'a SquareMarkers,
    pub text_markers: &'a TextMarkers,
    pub arrow_markers: &'a ArrowMarkers,
    pub move_arrow_visible: bool,
    pub move_arrow_color: AnnotationColor,
    pub edited_arrow_color: Option<AnnotationColor>,
    pub interaction: &'a BoardInteraction,
    /// Animation cursor, 1 when the move is not animated
    pub cursor: f32,
}

impl BoardScene<'_> {
    /// Position interactions and static rendering operate on
    pub fn displayed_position(&self) -> &BoardPosition {
        self.played.map_or(self.position, |p| p.after)
    }

    fn is_animating(&self) -> bool {
        self.cursor < 1.0 && self.played.is_some_and(|p| !p.descriptor.is_null())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderPlan {
    pub extent: BoardExtent,
    pub square_size: f32,
    pub squares: Vec<SquareFill>,
    pub coordinates: Vec<CoordinateLabel>,
    pub square_markers: Vec<HighlightedSquare>,
    pub hovered: Option<HighlightedSquare>,
    pub pieces: Vec<PlacedPiece>,
    pub text_markers: Vec<PlacedText>,
    pub arrow_markers: Vec<PlacedArrow>,
    pub move_arrow: Option<PlacedArrow>,
    pub hit_regions: Vec<HitRegion>,
    pub promotion: Option<PromotionOverlay>,
    pub floating: Option<FloatingItem>,
    pub turn_flag: Option<TurnFlag>,
}

/// Start and tip of an arrow between two square centers, relative to the 8x8 area.
/// `None` for a degenerate arrow.
pub fn arrow_endpoints(from: Square, to: Square, layout: &BoardLayout) -> Option<(Point, Point)> {
    if from == to {
        return None;
    }
    let size = layout.square_size_px();
    let start = square_center(from, size, layout.flipped);
    let end = square_center(to, size, layout.flipped);
    Some((start, shorten(start, end, ARROW_TIP_OFFSET * size)))
}

fn shorten(start: Point, end: Point, by: f32) -> Point {
    let (dx, dy) = (end.x - start.x, end.y - start.y);
    let length = (dx * dx + dy * dy).sqrt();
    if length <= by {
        return start;
    }
    let k = (length - by) / length;
    Point::new(start.x + dx * k, start.y + dy * k)
}

fn lerp(a: Point, b: Point, t: f32) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

pub fn build_render_plan(scene: &BoardScene) -> RenderPlan {
    let layout = &scene.layout;
    let size = layout.square_size_px();
    let origin = layout.board_origin();
    let to_canvas = |p: Point| p.offset(origin.x, origin.y);

    let mut plan = RenderPlan {
        extent: layout.extent(),
        square_size: size,
        ..RenderPlan::default()
    };

    plan.squares = Square::ALL
        .iter()
        .map(|&square| SquareFill {
            square,
            origin: layout.square_origin(square),
            dark: is_dark_square(square),
        })
        .collect();

    if layout.coordinate_visible {
        for i in 0..8u32 {
            plan.coordinates.push(CoordinateLabel {
                text: char::from(b'1' + i as u8),
                center: layout.rank_label_center(i),
            });
            plan.coordinates.push(CoordinateLabel {
                text: char::from(b'a' + i as u8),
                center: layout.file_label_center(i),
            });
        }
    }

    plan.square_markers = scene
        .square_markers
        .iter()
        .map(|(&square, &color)| HighlightedSquare {
            origin: layout.square_origin(square),
            color,
        })
        .collect();

    let interaction = scene.interaction;
    let mode = interaction.mode();
    plan.hovered = interaction.hovered_square().map(|square| HighlightedSquare {
        origin: layout.square_origin(square),
        color: match mode {
            InteractionMode::EditArrows => scene.edited_arrow_color.unwrap_or(scene.move_arrow_color),
            _ => scene.move_arrow_color,
        },
    });

    let inhibited = interaction.inhibited_square();
    // a drag or promotion started mid-animation shows the final position
    plan.pieces = if scene.is_animating() && inhibited.is_none() {
        animated_pieces(scene)
    } else {
        scene
            .displayed_position()
            .pieces()
            .into_iter()
            .filter(|(square, _)| Some(*square) != inhibited)
            .map(|(square, piece)| PlacedPiece {
                piece,
                origin: layout.square_origin(square),
            })
            .collect()
    };

    plan.text_markers = scene
        .text_markers
        .iter()
        .map(|(&square, marker)| PlacedText {
            center: to_canvas(square_center(square, size, layout.flipped)),
            glyph: marker.symbol.glyph(),
            color: marker.color,
        })
        .collect();

    plan.arrow_markers = scene
        .arrow_markers
        .iter()
        .filter_map(|(couple, &color)| {
            let (from, to) = arrow_endpoints(couple.from, couple.to, layout)?;
            Some(PlacedArrow {
                from: to_canvas(from),
                to: to_canvas(to),
                color,
            })
        })
        .collect();

    plan.move_arrow = move_arrow(scene).map(|arrow| PlacedArrow {
        from: to_canvas(arrow.from),
        to: to_canvas(arrow.to),
        color: arrow.color,
    });

    if mode.has_hit_regions() {
        plan.hit_regions = Square::ALL
            .iter()
            .map(|&square| HitRegion {
                square,
                origin: layout.square_origin(square),
            })
            .collect();
    }

    plan.promotion = interaction.promotion().map(|drawer| PromotionOverlay {
        catcher_origin: origin,
        catcher_size: layout.board_total_size(),
        buttons: promotion_button_origins(drawer, layout)
            .into_iter()
            .map(|(kind, p)| PromotionButton {
                kind,
                piece: Piece::new(drawer.color, kind),
                origin: to_canvas(p),
            })
            .collect(),
    });

    plan.floating = floating_item(scene).map(|item| match item {
        FloatingItem::Piece(p) => FloatingItem::Piece(PlacedPiece {
            piece: p.piece,
            origin: to_canvas(p.origin),
        }),
        FloatingItem::Arrow(a) => FloatingItem::Arrow(PlacedArrow {
            from: to_canvas(a.from),
            to: to_canvas(a.to),
            color: a.color,
        }),
    });

    if layout.turn_visible {
        let color = if scene.is_animating() {
            scene.position.turn()
        } else {
            scene.displayed_position().turn()
        };
        plan.turn_flag = Some(TurnFlag {
            color,
            origin: layout.turn_flag_origin(color),
        });
    }

    plan
}

/// Pieces at the pre-move position, the moving piece (and castling rook) slid
/// towards its destination.
fn animated_pieces(scene: &BoardScene) -> Vec<PlacedPiece> {
    let layout = &scene.layout;
    let Some(played) = scene.played else {
        return Vec::new();
    };
    let mv = played.descriptor;
    let slide = |from: Square, to: Square| {
        let a = layout.square_origin(from);
        let b = layout.square_origin(to);
        lerp(a, b, scene.cursor)
    };

    let mut fixed = Vec::new();
    let mut moving = Vec::new();
    for (square, piece) in scene.position.pieces() {
        if Some(square) == mv.from() {
            let Some(to) = mv.to() else { continue };
            let piece = match mv.colored_promotion() {
                Some(promoted) if scene.cursor > PROMOTION_GLYPH_THRESHOLD => promoted,
                _ => piece,
            };
            moving.push(PlacedPiece {
                piece,
                origin: slide(square, to),
            });
        } else if mv.is_castling() && Some(square) == mv.rook_from() {
            let Some(rook_to) = mv.rook_to() else { continue };
            moving.push(PlacedPiece {
                piece,
                origin: slide(square, rook_to),
            });
        } else {
            fixed.push(PlacedPiece {
                piece,
                origin: layout.square_origin(square),
            });
        }
    }
    fixed.extend(moving);
    fixed
}

fn move_arrow(scene: &BoardScene) -> Option<PlacedArrow> {
    if !scene.move_arrow_visible {
        return None;
    }
    let played = scene.played?;
    let (from, to) = (played.descriptor.from()?, played.descriptor.to()?);
    let (start, end) = arrow_endpoints(from, to, &scene.layout)?;
    if scene.is_animating() && scene.cursor < MOVE_ARROW_THRESHOLD {
        return None;
    }
    let end = if scene.is_animating() {
        lerp(start, end, scene.cursor)
    } else {
        end
    };
    Some(PlacedArrow {
        from: start,
        to: end,
        color: scene.move_arrow_color,
    })
}

/// Dragged piece or arrow under construction, relative to the 8x8 area
fn floating_item(scene: &BoardScene) -> Option<FloatingItem> {
    let interaction = scene.interaction;
    let layout = &scene.layout;
    let drag = interaction.drag()?;
    match interaction.mode() {
        InteractionMode::EditArrows => {
            let start = square_center(drag.origin, layout.square_size_px(), layout.flipped);
            let tip = interaction.pointer(layout)?;
            if tip == start {
                return None;
            }
            Some(FloatingItem::Arrow(PlacedArrow {
                from: start,
                to: tip,
                color: scene.edited_arrow_color.unwrap_or(scene.move_arrow_color),
            }))
        }
        _ => {
            let piece = scene.displayed_position().piece_at(drag.origin)?;
            Some(FloatingItem::Piece(PlacedPiece {
                piece,
                origin: interaction.floating_piece_origin(layout)?,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::markers::{SquareCouple, parse_arrow_markers};
    use crate::domain::rules::parse_position;

    struct Fixture {
        square_markers: SquareMarkers,
        text_markers: TextMarkers,
        arrow_markers: ArrowMarkers,
        edited_arrow_color: Option<AnnotationColor>,
        interaction: BoardInteraction,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                square_markers: SquareMarkers::new(),
                text_markers: TextMarkers::new(),
                arrow_markers: ArrowMarkers::new(),
                edited_arrow_color: None,
                interaction: BoardInteraction::new(InteractionMode::None),
            }
        }

        fn scene<'a>(
            &'a self,
            position: &'a BoardPosition,
            played: Option<PlayedMove<'a>>,
            cursor: f32,
        ) -> BoardScene<'a> {
            BoardScene {
                layout: BoardLayout::new(40, false, false, true),
                position,
                played,
                square_markers: &self.square_markers,
                text_markers: &self.text_markers,
                arrow_markers: &self.arrow_markers,
                move_arrow_visible: true,
                move_arrow_color: AnnotationColor::Blue,
                edited_arrow_color: self.edited_arrow_color,
                interaction: &self.interaction,
                cursor,
            }
        }
    }

    fn origin_of(plan: &RenderPlan, piece: Piece) -> Vec<Point> {
        plan.pieces
            .iter()
            .filter(|p| p.piece == piece)
            .map(|p| p.origin)
            .collect()
    }

    #[test]
    fn test_layer_order() {
        assert_eq!(LAYER_ORDER[0], Layer::SquareFills);
        let position = |layer| LAYER_ORDER.iter().position(|l| *l == layer).unwrap();
        assert!(position(Layer::Pieces) < position(Layer::DraggedItem));
        assert!(position(Layer::HitRegions) < position(Layer::PromotionDrawer));
        assert_eq!(LAYER_ORDER[10], Layer::TurnFlag);
    }

    #[test]
    fn test_arrow_endpoints() {
        let layout = BoardLayout::new(40, false, false, false);
        assert_eq!(arrow_endpoints(Square::E4, Square::E4, &layout), None);

        let (from, to) = arrow_endpoints(Square::E2, Square::E4, &layout).unwrap();
        assert_eq!(from, Point::new(180.0, 260.0));
        // two squares up, tip pulled back by 0.3 of a square
        assert!((to.x - 180.0).abs() < 1e-4);
        assert!((to.y - 192.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_marker_arrows_are_skipped() {
        let mut fixture = Fixture::new();
        fixture.arrow_markers = parse_arrow_markers("Ge2e2,Rd3b6");
        let position = parse_position("start").unwrap();
        let plan = build_render_plan(&fixture.scene(&position, None, 1.0));
        assert_eq!(plan.arrow_markers.len(), 1);
        assert_eq!(plan.arrow_markers[0].color, AnnotationColor::Red);
        assert!(
            fixture
                .arrow_markers
                .contains_key(&SquareCouple::new(Square::E2, Square::E2))
        );
    }

    #[test]
    fn test_static_plan() {
        let fixture = Fixture::new();
        let position = parse_position("start").unwrap();
        let plan = build_render_plan(&fixture.scene(&position, None, 1.0));
        assert_eq!(plan.squares.len(), 64);
        assert_eq!(plan.pieces.len(), 32);
        assert!(plan.hit_regions.is_empty());
        assert!(plan.coordinates.is_empty());
        assert_eq!(plan.turn_flag.unwrap().color, PieceColor::White);
        assert_eq!(plan.move_arrow, None);
    }

    #[test]
    fn test_animation_slides_moving_piece() {
        let fixture = Fixture::new();
        let position = parse_position("start").unwrap();
        let mv = position.parse_move("e4").unwrap();
        let after = position.play(&mv).unwrap();
        let played = Some(PlayedMove {
            descriptor: &mv,
            after: &after,
        });
        let pawn = Piece::new(PieceColor::White, PieceKind::Pawn);

        let plan = build_render_plan(&fixture.scene(&position, played, 0.5));
        assert!(origin_of(&plan, pawn).contains(&Point::new(160.0, 200.0)));
        // pre-move side still shown as to move
        assert_eq!(plan.turn_flag.unwrap().color, PieceColor::White);
        let arrow = plan.move_arrow.unwrap();
        assert!(arrow.to.y > 192.0 && arrow.to.y < 260.0);

        let plan = build_render_plan(&fixture.scene(&position, played, 0.05));
        assert_eq!(plan.move_arrow, None);

        let plan = build_render_plan(&fixture.scene(&position, played, 1.0));
        assert!(origin_of(&plan, pawn).contains(&Point::new(160.0, 160.0)));
        assert_eq!(plan.turn_flag.unwrap().color, PieceColor::Black);
        assert!(plan.move_arrow.is_some());
    }

    #[test]
    fn test_castling_rook_slides() {
        let fixture = Fixture::new();
        let position = parse_position("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mv = position.parse_move("O-O").unwrap();
        let after = position.play(&mv).unwrap();
        let played = Some(PlayedMove {
            descriptor: &mv,
            after: &after,
        });
        let rook = Piece::new(PieceColor::White, PieceKind::Rook);

        let plan = build_render_plan(&fixture.scene(&position, played, 0.5));
        let rooks = origin_of(&plan, rook);
        // h1 -> f1 halfway
        assert!(rooks.contains(&Point::new(240.0, 280.0)));
        assert!(rooks.contains(&Point::new(0.0, 280.0)));
    }

    #[test]
    fn test_promotion_glyph_pops_late() {
        let fixture = Fixture::new();
        let position = parse_position("8/1P6/8/8/7k/8/5K2/8 w - - 0 1").unwrap();
        let mv = position.parse_move("b8=Q").unwrap();
        let after = position.play(&mv).unwrap();
        let played = Some(PlayedMove {
            descriptor: &mv,
            after: &after,
        });
        let queen = Piece::new(PieceColor::White, PieceKind::Queen);
        let pawn = Piece::new(PieceColor::White, PieceKind::Pawn);

        let plan = build_render_plan(&fixture.scene(&position, played, 0.79));
        assert_eq!(origin_of(&plan, queen).len(), 0);
        assert_eq!(origin_of(&plan, pawn).len(), 1);

        let plan = build_render_plan(&fixture.scene(&position, played, 0.81));
        assert_eq!(origin_of(&plan, queen).len(), 1);
        assert_eq!(origin_of(&plan, pawn).len(), 0);
    }

    #[test]
    fn test_drag_inhibits_and_floats() {
        let mut fixture = Fixture::new();
        let position = parse_position("start").unwrap();
        fixture.interaction = BoardInteraction::new(InteractionMode::MovePieces);
        fixture
            .interaction
            .drag_start(Square::G1, Point::new(20.0, 20.0), &position);

        let plan = build_render_plan(&fixture.scene(&position, None, 1.0));
        assert_eq!(plan.pieces.len(), 31);
        assert_eq!(plan.hit_regions.len(), 64);
        assert!(matches!(plan.floating, Some(FloatingItem::Piece(_))));
        assert_eq!(plan.hovered.unwrap().color, AnnotationColor::Blue);
    }

    #[test]
    fn test_arrow_under_construction() {
        let mut fixture = Fixture::new();
        let position = parse_position("start").unwrap();
        fixture.edited_arrow_color = Some(AnnotationColor::Red);
        fixture.interaction = BoardInteraction::new(InteractionMode::EditArrows);
        assert!(
            fixture
                .interaction
                .drag_start(Square::D3, Point::new(20.0, 20.0), &position)
        );

        // pointer over the center of b6
        let layout = BoardLayout::new(40, false, false, true);
        fixture.interaction.drag_move(-80.0, -120.0, &layout);
        let plan = build_render_plan(&fixture.scene(&position, None, 1.0));
        assert_eq!(plan.pieces.len(), 32);
        let hovered = plan.hovered.unwrap();
        assert_eq!(hovered.origin, layout.square_origin(Square::B6));
        assert_eq!(hovered.color, AnnotationColor::Red);
        assert_eq!(
            plan.floating,
            Some(FloatingItem::Arrow(PlacedArrow {
                from: Point::new(140.0, 220.0),
                to: Point::new(60.0, 100.0),
                color: AnnotationColor::Red,
            }))
        );

        // far outside the board, the tip stays on the 8x8 area
        fixture.interaction.drag_move(1000.0, -1000.0, &layout);
        let plan = build_render_plan(&fixture.scene(&position, None, 1.0));
        assert_eq!(plan.hovered, None);
        match plan.floating {
            Some(FloatingItem::Arrow(arrow)) => assert_eq!(arrow.to, Point::new(320.0, 0.0)),
            other => panic!("unexpected floating item {other:?}"),
        }
    }

    #[test]
    fn test_drag_during_animation_shows_piece_once() {
        let mut fixture = Fixture::new();
        let position = parse_position("start").unwrap();
        let mv = position.parse_move("e4").unwrap();
        let after = position.play(&mv).unwrap();
        let played = Some(PlayedMove {
            descriptor: &mv,
            after: &after,
        });
        fixture.interaction = BoardInteraction::new(InteractionMode::MovePieces);
        assert!(
            fixture
                .interaction
                .drag_start(Square::E4, Point::new(20.0, 20.0), &after)
        );

        let plan = build_render_plan(&fixture.scene(&position, played, 0.5));
        let pawn = Piece::new(PieceColor::White, PieceKind::Pawn);
        assert_eq!(plan.pieces.len(), 31);
        assert_eq!(origin_of(&plan, pawn).len(), 7);
        assert!(!origin_of(&plan, pawn).contains(&Point::new(160.0, 200.0)));
        assert!(matches!(plan.floating, Some(FloatingItem::Piece(_))));
    }
}
