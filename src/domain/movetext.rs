//! Display model of a game score, and the move-selection state machine.
//!
//! The game is flattened into [`LineItem`]s (moves, comments, nested
//! variations) for the view. Comments may embed diagrams with `[#]`.

use crate::domain::move_tree::{MoveNodeId, MoveTree};

/// Glyph of a numeric annotation, `$n` when there is no usual symbol
pub fn nag_glyph(nag: u8) -> String {
    let glyph = match nag {
        1 => "!",
        2 => "?",
        3 => "!!",
        4 => "??",
        5 => "!?",
        6 => "?!",
        7 => "\u{25A1}",
        10 => "=",
        13 => "\u{221E}",
        14 => "\u{2A72}",
        15 => "\u{2A71}",
        16 => "\u{00B1}",
        17 => "\u{2213}",
        18 => "+-",
        19 => "-+",
        22 | 23 => "\u{2A00}",
        32 | 33 => "\u{27F3}",
        36 | 37 => "\u{2191}",
        40 | 41 => "\u{2192}",
        132 | 133 => "\u{21C6}",
        138 | 139 => "\u{2295}",
        140 => "\u{2206}",
        146 => "N",
        _ => return format!("${nag}"),
    };
    glyph.to_string()
}

/// Piece of a comment: text, or a diagram of the position at the commented move
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommentSegment {
    Text(String),
    Diagram,
}

/// Split a comment on its `[#]` diagram markers
pub fn split_comment(comment: &str) -> Vec<CommentSegment> {
    let mut segments = Vec::new();
    for (i, part) in comment.split("[#]").enumerate() {
        if i > 0 {
            segments.push(CommentSegment::Diagram);
        }
        let part = part.trim();
        if !part.is_empty() {
            segments.push(CommentSegment::Text(part.to_string()));
        }
    }
    segments
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveDisplay {
    pub node_id: MoveNodeId,
    /// `12.` or `12...`, when the move needs one
    pub move_number: Option<String>,
    pub notation: String,
    pub nags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineItem {
    Move(MoveDisplay),
    /// Comment; diagrams show the position at `node_id`
    Comment {
        node_id: MoveNodeId,
        segments: Vec<CommentSegment>,
    },
    Variations(Vec<Vec<LineItem>>),
}

/// Items of the main line, variations nested where they branch off
pub fn main_line_items(tree: &MoveTree) -> Vec<LineItem> {
    let mut items = Vec::new();
    if let Some(comment) = &tree.game_comment {
        items.push(LineItem::Comment {
            node_id: 0,
            segments: split_comment(comment),
        });
    }
    if let Some(first) = tree.root().main_line_child() {
        line_items(tree, first, &mut items);
    }
    items
}

fn line_items(tree: &MoveTree, start: MoveNodeId, items: &mut Vec<LineItem>) {
    // a move number is needed on white moves, and on black moves after an interruption
    let mut interrupted = true;
    for id in tree.line_from(start) {
        let Some(node) = tree.get(id) else { continue };

        if let Some(comment) = &node.comment_before {
            items.push(LineItem::Comment {
                node_id: node.parent_id.unwrap_or(0),
                segments: split_comment(comment),
            });
            interrupted = true;
        }

        let (number, is_black) = node.move_number();
        let move_number = match (is_black, interrupted) {
            (false, _) => Some(format!("{number}.")),
            (true, true) => Some(format!("{number}...")),
            (true, false) => None,
        };
        items.push(LineItem::Move(MoveDisplay {
            node_id: id,
            move_number,
            notation: node.notation.clone().unwrap_or_default(),
            nags: node.nags.iter().map(|&n| nag_glyph(n)).collect(),
        }));
        interrupted = false;

        if let Some(comment) = &node.comment {
            items.push(LineItem::Comment {
                node_id: id,
                segments: split_comment(comment),
            });
            interrupted = true;
        }

        let siblings = node
            .parent_id
            .and_then(|p| tree.get(p))
            .filter(|parent| parent.main_line_child() == Some(id))
            .map(|parent| parent.variation_children().to_vec())
            .unwrap_or_default();
        if !siblings.is_empty() {
            let variations = siblings
                .into_iter()
                .map(|variation| {
                    let mut nested = Vec::new();
                    line_items(tree, variation, &mut nested);
                    nested
                })
                .collect();
            items.push(LineItem::Variations(variations));
            interrupted = true;
        }
    }
}

/// Keyboard commands of a movetext with a selected move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionKey {
    First,
    Previous,
    Next,
    Last,
    Exit,
}

/// Selected move of a movetext. Root (id 0) stands for the start of the game;
/// `None` means nothing is selected and keys are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveSelection {
    selected: Option<MoveNodeId>,
}

impl MoveSelection {
    pub fn selected(&self) -> Option<MoveNodeId> {
        self.selected
    }

    pub fn select(&mut self, id: Option<MoveNodeId>) {
        self.selected = id;
    }

    /// Apply a key; returns the new selection when it changed
    pub fn handle_key(&mut self, key: SelectionKey, tree: &MoveTree) -> Option<Option<MoveNodeId>> {
        let current = self.selected?;
        let node = tree.get(current)?;
        let next = match key {
            SelectionKey::Exit => None,
            SelectionKey::Previous => Some(node.parent_id.unwrap_or(current)),
            SelectionKey::Next => Some(node.main_line_child().unwrap_or(current)),
            SelectionKey::First => {
                let start = tree.variation_start(current);
                let start_node = tree.get(start)?;
                Some(start_node.parent_id.unwrap_or(start))
            }
            SelectionKey::Last => tree.line_from(current).last().copied(),
        };
        if next == self.selected {
            return None;
        }
        self.selected = next;
        Some(next)
    }
}
