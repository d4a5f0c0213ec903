//! PGN import into a [`MoveTree`], on top of `pgn-reader`.
//!
//! Moves are replayed through the rules adapter so each node carries its
//! position and normalized notation. A move that cannot be played stops the
//! import with an `InvalidPgn` error pointing at the offending token.

use log::{debug, warn};
use pgn_reader::{BufferedReader, Nag, RawComment, RawHeader, SanPlus, Skip, Visitor};

use crate::domain::move_tree::{MoveNodeId, MoveTree};
use crate::domain::rules::{GameVariant, parse_position};
use crate::error::{UserDataError, UserDataErrorKind};

struct GameBuilder<'a> {
    text: &'a str,
    /// Search start for the next token, to locate errors in the source text
    cursor: usize,
    headers: Vec<(String, String)>,
    tree: Option<MoveTree>,
    /// Nodes to come back to at the end of each open variation
    variation_stack: Vec<MoveNodeId>,
    /// Set right after `(`, until the first move of the variation
    variation_opened: bool,
    pending_comment: Option<String>,
    error: Option<UserDataError>,
}

impl<'a> GameBuilder<'a> {
    /// `cursor` is where the previous game of the text ended
    fn new(text: &'a str, cursor: usize) -> Self {
        Self {
            text,
            cursor,
            headers: Vec::new(),
            tree: None,
            variation_stack: Vec::new(),
            variation_opened: false,
            pending_comment: None,
            error: None,
        }
    }

    /// Byte offset of `token` in the source, searching forward from the previous token
    fn locate(&mut self, token: &str) -> usize {
        match self.text.get(self.cursor..).and_then(|rest| rest.find(token)) {
            Some(offset) => {
                let start = self.cursor + offset;
                self.cursor = start + token.len();
                start
            }
            None => self.cursor,
        }
    }

    fn fail(&mut self, message: String, token: &str) {
        if self.error.is_none() {
            let offset = self.locate(token);
            let index = self.text[..offset].chars().count();
            warn!("PGN import failed: {message}");
            self.error = Some(
                UserDataError::new(UserDataErrorKind::InvalidPgn, message)
                    .with_excerpt(self.text, index),
            );
        }
    }

    fn initial_tree(&self) -> Result<MoveTree, UserDataError> {
        let header = |name: &str| {
            self.headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        };
        let variant = header("Variant")
            .and_then(|name| GameVariant::from_name(&name.to_lowercase().replace([' ', '-'], "")))
            .unwrap_or(GameVariant::Regular);
        let body = header("FEN").unwrap_or("start");
        let position = parse_position(&format!("{}:{body}", variant.name())).map_err(|e| {
            UserDataError::new(
                UserDataErrorKind::InvalidPgn,
                format!("Invalid FEN header: {}", e.message),
            )
        })?;

        let mut tree = MoveTree::new(position);
        for (key, value) in &self.headers {
            tree.set_header(key.clone(), value.clone());
        }
        Ok(tree)
    }
}

impl Visitor for GameBuilder<'_> {
    type Result = Result<MoveTree, UserDataError>;

    fn header(&mut self, key: &[u8], value: RawHeader<'_>) {
        let key = String::from_utf8_lossy(key).into_owned();
        self.locate(&key);
        self.locate(&String::from_utf8_lossy(value.as_bytes()));
        let value = value.decode_utf8_lossy().into_owned();
        self.headers.push((key, value));
    }

    fn end_headers(&mut self) -> Skip {
        match self.initial_tree() {
            Ok(tree) => self.tree = Some(tree),
            Err(e) => self.error = Some(e),
        }
        Skip(self.error.is_some())
    }

    fn san(&mut self, san_plus: SanPlus) {
        if self.error.is_some() {
            return;
        }
        let token = san_plus.to_string();
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        match tree.play(&token) {
            Ok(_) => {
                if let Some(comment) = self.pending_comment.take() {
                    tree.current_mut().comment_before = Some(comment);
                }
                self.variation_opened = false;
                self.locate(&token);
            }
            Err(e) => self.fail(e.message, &token),
        }
    }

    fn nag(&mut self, nag: Nag) {
        if let Some(tree) = self.tree.as_mut() {
            if !tree.is_at_root() {
                tree.current_mut().nags.push(nag.0);
            }
        }
    }

    fn comment(&mut self, comment: RawComment<'_>) {
        let raw = String::from_utf8_lossy(comment.as_bytes());
        self.locate(&raw);
        let text = raw.trim().to_string();
        if text.is_empty() {
            return;
        }
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        if self.variation_opened {
            self.pending_comment = Some(text);
        } else if tree.is_at_root() {
            tree.game_comment = Some(text);
        } else {
            let node = tree.current_mut();
            node.comment = Some(match node.comment.take() {
                Some(previous) => format!("{previous} {text}"),
                None => text,
            });
        }
    }

    fn begin_variation(&mut self) -> Skip {
        let Some(tree) = self.tree.as_mut() else {
            return Skip(true);
        };
        if self.error.is_some() || tree.is_at_root() {
            return Skip(true);
        }
        // the variation replaces the last move played
        self.variation_stack.push(tree.current_id());
        tree.go_back();
        self.variation_opened = true;
        Skip(false)
    }

    fn end_variation(&mut self) {
        if let (Some(tree), Some(resume)) = (self.tree.as_mut(), self.variation_stack.pop()) {
            tree.go_to(resume);
        }
        self.variation_opened = false;
        self.pending_comment = None;
    }

    fn end_game(&mut self) -> Self::Result {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        let mut tree = match self.tree.take() {
            Some(tree) => tree,
            None => self.initial_tree()?,
        };
        tree.result = tree.header("Result").map(str::to_string);
        tree.go_to_root();
        debug!("PGN game imported, {} nodes", tree.len());
        Ok(tree)
    }
}

/// Parse the game at `game_index` (0-based) of a PGN text.
pub fn parse_pgn(text: &str, game_index: usize) -> Result<MoveTree, UserDataError> {
    let mut reader = BufferedReader::new_cursor(text.as_bytes());
    let mut index = 0;
    let mut cursor = 0;
    loop {
        let mut builder = GameBuilder::new(text, cursor);
        let game = reader.read_game(&mut builder).map_err(|e| {
            UserDataError::new(UserDataErrorKind::InvalidPgn, format!("{e}."))
        })?;
        cursor = builder.cursor;
        match game {
            Some(result) if index == game_index => return result,
            Some(_) => index += 1,
            None => {
                return Err(UserDataError::new(
                    UserDataErrorKind::InvalidPgn,
                    format!("Game #{} not found.", game_index + 1),
                ));
            }
        }
    }
}

/// Number of games in a PGN text
pub fn count_games(text: &str) -> usize {
    struct Counter;
    impl Visitor for Counter {
        type Result = ();
        fn end_headers(&mut self) -> Skip {
            Skip(true)
        }
        fn end_game(&mut self) -> Self::Result {}
    }

    let mut reader = BufferedReader::new_cursor(text.as_bytes());
    let mut count = 0;
    while let Ok(Some(())) = reader.read_game(&mut Counter) {
        count += 1;
    }
    count
}
