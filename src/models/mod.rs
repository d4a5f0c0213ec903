pub mod board;
pub mod navigation;

pub use board::{BoardContent, BoardModel};
pub use navigation::NavigationModel;
