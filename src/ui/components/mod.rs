mod arrow;
mod error_box;
mod piece;
mod promotion;
mod square;

pub use arrow::{ArrowShape, render_arrows};
pub use error_box::render_error_box;
pub use piece::render_piece;
pub use promotion::render_promotion_drawer;
pub use square::{render_centered_text, render_hover_outline, render_square, render_square_marker};
