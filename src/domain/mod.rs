pub mod animation;
pub mod chess;
pub mod drag;
pub mod geometry;
pub mod interaction;
pub mod markers;
pub mod move_tree;
pub mod movetext;
pub mod pgn;
pub mod render_plan;
pub mod rules;
pub mod small_screen;

pub use animation::{AnimationState, MoveAnimation};
pub use chess::{Piece, PieceColor, PieceKind};
pub use drag::{DragEvent, DragGesture, PointerButton, PointerInput};
pub use geometry::{
    BoardExtent, BoardLayout, MAX_SQUARE_SIZE, MIN_SQUARE_SIZE, Point, board_extent,
    max_square_size_fitting,
};
pub use interaction::{BoardEvent, BoardInteraction, InteractionMode};
pub use markers::{AnnotationColor, AnnotationSymbol, ArrowMarkers, SquareMarkers, TextMarkers};
pub use move_tree::{MoveNodeId, MoveTree};
pub use rules::{BoardPosition, MoveDescriptor, parse_position};
