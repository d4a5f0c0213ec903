//! Navigation model - a game with a cursor, shown on a board.

use gpui::{Context, Entity};
use log::debug;

use crate::domain::MoveNodeId;
use crate::domain::move_tree::{MoveNode, MoveTree};
use crate::models::BoardModel;

pub struct NavigationModel {
    tree: MoveTree,
    board: Entity<BoardModel>,
}

/// Position and move strings the board shows for `node`
fn board_input(tree: &MoveTree, node: &MoveNode) -> (String, Option<String>) {
    let previous = node.parent_id.and_then(|id| tree.get(id));
    match (previous, &node.notation) {
        (Some(parent), Some(notation)) => (parent.position.to_text(), Some(notation.clone())),
        _ => (node.position.to_text(), None),
    }
}

impl NavigationModel {
    /// Show `tree` from its start on `board`, whose position and move are taken over
    pub fn new(mut tree: MoveTree, board: Entity<BoardModel>, cx: &mut Context<Self>) -> Self {
        tree.go_to_root();
        let mut navigation = Self { tree, board };
        navigation.sync_board(cx);
        navigation
    }

    pub fn tree(&self) -> &MoveTree {
        &self.tree
    }

    pub fn board(&self) -> &Entity<BoardModel> {
        &self.board
    }

    pub fn current_id(&self) -> MoveNodeId {
        self.tree.current_id()
    }

    pub fn is_at_start(&self) -> bool {
        self.tree.is_at_root()
    }

    pub fn is_at_end(&self) -> bool {
        self.tree.is_at_leaf()
    }

    pub fn first(&mut self, cx: &mut Context<Self>) {
        self.tree.go_to_root();
        self.sync_board(cx);
    }

    pub fn previous(&mut self, cx: &mut Context<Self>) {
        if self.tree.go_back() {
            self.sync_board(cx);
        }
    }

    pub fn next(&mut self, cx: &mut Context<Self>) {
        if self.tree.go_forward() {
            self.sync_board(cx);
        }
    }

    pub fn last(&mut self, cx: &mut Context<Self>) {
        self.tree.go_to_end();
        self.sync_board(cx);
    }

    pub fn go_to(&mut self, id: MoveNodeId, cx: &mut Context<Self>) {
        if self.tree.go_to(id) {
            self.sync_board(cx);
        }
    }

    pub fn flip(&mut self, cx: &mut Context<Self>) {
        self.board.update(cx, |board, cx| {
            let flipped = !board.config().flipped;
            board.set_flipped(flipped, cx);
        });
        cx.notify();
    }

    fn sync_board(&mut self, cx: &mut Context<Self>) {
        let (position, played_move) = board_input(&self.tree, self.tree.current());
        debug!("navigation at node {}", self.tree.current_id());
        self.board.update(cx, |board, cx| {
            board.set_position(&position, played_move.as_deref(), cx);
        });
        cx.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pgn::parse_pgn;
    use crate::models::board::BoardContent;

    #[test]
    fn test_board_input_replays_the_move() {
        let mut tree = parse_pgn("1. e4 e5 2. Nf3 *", 0).unwrap();
        let (position, played) = board_input(&tree, tree.current());
        assert_eq!(played, None);
        assert!(position.starts_with("regular:rnbqkbnr/pppppppp"));

        tree.go_to_end();
        let (position, played) = board_input(&tree, tree.current());
        assert_eq!(played.as_deref(), Some("Nf3"));
        let content = BoardContent::parse(&position, played.as_deref()).unwrap();
        assert_eq!(
            content.displayed_position().fen(),
            tree.current().position.fen()
        );
    }
}
