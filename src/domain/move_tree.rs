//! Move tree data structure for representing chess games with variations.
//!
//! This is a pure domain module with no GPUI dependencies.

use crate::domain::rules::{BoardPosition, MoveDescriptor};
use crate::error::UserDataError;

/// Unique identifier for a node in the move tree
pub type MoveNodeId = usize;

/// A node in the move tree representing a position after a move
#[derive(Clone, Debug)]
pub struct MoveNode {
    pub id: MoveNodeId,
    /// Parent node ID (None for root)
    pub parent_id: Option<MoveNodeId>,
    /// The position at this node
    pub position: BoardPosition,
    /// The move that led to this position (None for root)
    pub mv: Option<MoveDescriptor>,
    /// SAN with check suffix of that move
    pub notation: Option<String>,
    /// Half-moves played from the standard starting position
    pub ply: usize,
    /// Numeric annotation glyphs attached to the move
    pub nags: Vec<u8>,
    /// Comment before the move, only kept at the start of a variation
    pub comment_before: Option<String>,
    /// Comment after the move
    pub comment: Option<String>,
    /// Child node IDs - first child is the main line continuation, rest are variations
    pub children: Vec<MoveNodeId>,
}

impl MoveNode {
    fn root(position: BoardPosition) -> Self {
        Self {
            id: 0,
            parent_id: None,
            ply: position.ply(),
            position,
            mv: None,
            notation: None,
            nags: Vec::new(),
            comment_before: None,
            comment: None,
            children: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if this node has variations (more than one child)
    pub fn has_variations(&self) -> bool {
        self.children.len() > 1
    }

    /// Get the main line continuation (first child), if any
    pub fn main_line_child(&self) -> Option<MoveNodeId> {
        self.children.first().copied()
    }

    /// Get variation children (all children except the first)
    pub fn variation_children(&self) -> &[MoveNodeId] {
        if self.children.len() > 1 {
            &self.children[1..]
        } else {
            &[]
        }
    }

    /// Get the move number (1-based, for display)
    /// Returns (move_number, is_black_move)
    pub fn move_number(&self) -> (usize, bool) {
        if self.is_root() {
            return (0, false);
        }
        let played_at = self.ply - 1;
        (played_at / 2 + 1, played_at % 2 == 1)
    }
}

/// A game: tag pairs, and a tree of moves with comments and variations
#[derive(Clone, Debug)]
pub struct MoveTree {
    nodes: Vec<MoveNode>,
    /// The currently viewed node
    current_id: MoveNodeId,
    headers: Vec<(String, String)>,
    /// Comment before the first move
    pub game_comment: Option<String>,
    pub result: Option<String>,
}

impl MoveTree {
    pub fn new(initial: BoardPosition) -> Self {
        Self {
            nodes: vec![MoveNode::root(initial)],
            current_id: 0,
            headers: Vec::new(),
            game_comment: None,
            result: None,
        }
    }

    pub fn get(&self, id: MoveNodeId) -> Option<&MoveNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: MoveNodeId) -> Option<&mut MoveNode> {
        self.nodes.get_mut(id)
    }

    pub fn root(&self) -> &MoveNode {
        &self.nodes[0]
    }

    /// Get the currently viewed node
    pub fn current(&self) -> &MoveNode {
        &self.nodes[self.current_id]
    }

    pub fn current_mut(&mut self) -> &mut MoveNode {
        &mut self.nodes[self.current_id]
    }

    pub fn current_id(&self) -> MoveNodeId {
        self.current_id
    }

    /// Navigate to a specific node
    pub fn go_to(&mut self, id: MoveNodeId) -> bool {
        if id < self.nodes.len() {
            self.current_id = id;
            true
        } else {
            false
        }
    }

    pub fn go_to_root(&mut self) {
        self.current_id = 0;
    }

    /// Navigate to parent (go back one move)
    pub fn go_back(&mut self) -> bool {
        if let Some(parent_id) = self.current().parent_id {
            self.current_id = parent_id;
            true
        } else {
            false
        }
    }

    /// Navigate to main line child (go forward one move)
    pub fn go_forward(&mut self) -> bool {
        if let Some(child_id) = self.current().main_line_child() {
            self.current_id = child_id;
            true
        } else {
            false
        }
    }

    /// Navigate to the end of the line from the current position
    pub fn go_to_end(&mut self) {
        while self.go_forward() {}
    }

    pub fn is_at_root(&self) -> bool {
        self.current_id == 0
    }

    /// Check if we're at a leaf node (no children)
    pub fn is_at_leaf(&self) -> bool {
        self.current().children.is_empty()
    }

    /// Play a move from the current position and navigate to the resulting node.
    ///
    /// If a child with the same notation exists, navigates to it.
    pub fn add_move(&mut self, mv: MoveDescriptor) -> Result<MoveNodeId, UserDataError> {
        let current = &self.nodes[self.current_id];
        let notation = current.position.notation(&mv);
        if let Some(&existing) = current
            .children
            .iter()
            .find(|&&id| self.nodes[id].notation.as_deref() == Some(notation.as_str()))
        {
            self.current_id = existing;
            return Ok(existing);
        }

        let position = current.position.play(&mv)?;
        let new_id = self.nodes.len();
        let node = MoveNode {
            id: new_id,
            parent_id: Some(self.current_id),
            ply: current.ply + 1,
            position,
            mv: Some(mv),
            notation: Some(notation),
            nags: Vec::new(),
            comment_before: None,
            comment: None,
            children: Vec::new(),
        };
        self.nodes.push(node);
        self.nodes[self.current_id].children.push(new_id);
        self.current_id = new_id;
        Ok(new_id)
    }

    /// Parse SAN (or `--`) in the current position and play it
    pub fn play(&mut self, text: &str) -> Result<MoveNodeId, UserDataError> {
        let mv = self.current().position.parse_move(text)?;
        self.add_move(mv)
    }

    /// Get the main line as a sequence of node IDs (from root to end)
    pub fn main_line(&self) -> Vec<MoveNodeId> {
        self.line_from(0)
    }

    /// `start` followed by its main line continuation
    pub fn line_from(&self, start: MoveNodeId) -> Vec<MoveNodeId> {
        let mut line = Vec::new();
        let mut next = self.nodes.get(start).map(|n| n.id);
        while let Some(id) = next {
            line.push(id);
            next = self.nodes[id].main_line_child();
        }
        line
    }

    /// Get the path from root to a node
    pub fn path_to(&self, id: MoveNodeId) -> Vec<MoveNodeId> {
        let mut path = Vec::new();
        let mut next = self.nodes.get(id).map(|n| n.id);
        while let Some(id) = next {
            path.push(id);
            next = self.nodes[id].parent_id;
        }
        path.reverse();
        path
    }

    /// Whether a node is the main line continuation of its parent
    pub fn is_main_line_child(&self, id: MoveNodeId) -> bool {
        self.nodes
            .get(id)
            .and_then(|n| n.parent_id)
            .is_some_and(|p| self.nodes[p].main_line_child() == Some(id))
    }

    /// First node of the variation `id` belongs to (the root for the main line)
    pub fn variation_start(&self, id: MoveNodeId) -> MoveNodeId {
        let mut id = id.min(self.nodes.len() - 1);
        while self.is_main_line_child(id) {
            match self.nodes[id].parent_id {
                Some(parent) if !self.nodes[parent].is_root() => id = parent,
                Some(parent) => return parent,
                None => break,
            }
        }
        id
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Get the total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (only root)
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::parse_position;

    fn tree() -> MoveTree {
        MoveTree::new(parse_position("start").unwrap())
    }

    #[test]
    fn test_new_tree() {
        let tree = tree();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
        assert!(tree.is_at_root());
        assert!(tree.is_at_leaf());
    }

    #[test]
    fn test_add_move() {
        let mut tree = tree();
        assert_eq!(tree.play("e4").unwrap(), 1);
        assert_eq!(tree.play("e5").unwrap(), 2);
        assert_eq!(tree.current_id(), 2);
        assert_eq!(tree.current().notation.as_deref(), Some("e5"));
        assert_eq!(tree.current().move_number(), (1, true));
        assert!(tree.play("e5").is_err());
    }

    #[test]
    fn test_navigation() {
        let mut tree = tree();
        tree.play("e4").unwrap();
        tree.play("e5").unwrap();

        assert!(tree.go_back());
        assert_eq!(tree.current_id(), 1);
        assert!(tree.go_back());
        assert!(!tree.go_back());
        assert!(tree.go_forward());
        assert_eq!(tree.current_id(), 1);
        tree.go_to_end();
        assert_eq!(tree.current_id(), 2);
        assert!(!tree.go_to(99));
    }

    #[test]
    fn test_existing_move_navigation() {
        let mut tree = tree();
        tree.play("e4").unwrap();
        tree.go_to_root();
        assert_eq!(tree.play("e4").unwrap(), 1);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_variations() {
        let mut tree = tree();
        tree.play("e4").unwrap();
        tree.go_to_root();
        tree.play("d4").unwrap();
        tree.play("d5").unwrap();

        assert!(tree.root().has_variations());
        assert_eq!(tree.root().main_line_child(), Some(1));
        assert_eq!(tree.root().variation_children(), &[2]);
        assert_eq!(tree.main_line(), vec![0, 1]);
        assert_eq!(tree.line_from(2), vec![2, 3]);
        assert_eq!(tree.path_to(3), vec![0, 2, 3]);
        assert_eq!(tree.variation_start(3), 2);
        assert_eq!(tree.variation_start(1), 0);
    }

    #[test]
    fn test_move_numbers_follow_fen_counter() {
        let mut tree = MoveTree::new(
            parse_position("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 7").unwrap(),
        );
        tree.play("e5").unwrap();
        assert_eq!(tree.current().move_number(), (7, true));
        tree.play("Nf3").unwrap();
        assert_eq!(tree.current().move_number(), (8, false));
    }

    #[test]
    fn test_headers() {
        let mut tree = tree();
        tree.set_header("White", "Anderssen");
        tree.set_header("White", "Morphy");
        assert_eq!(tree.header("White"), Some("Morphy"));
        assert_eq!(tree.headers().len(), 1);
        assert_eq!(tree.header("Black"), None);
    }
}
