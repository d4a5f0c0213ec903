mod chessboard;
mod movetext;
mod navigation_board;

pub use chessboard::{ChessboardView, render_board};
pub use movetext::{
    ExitSelection, MoveSelected, MovetextView, SelectFirst, SelectLast, SelectNext, SelectPrevious,
    bind_keys,
};
pub use navigation_board::NavigationBoardView;
