//! Error types shared by every component.
//!
//! Bad chess data supplied by a user (FEN, SAN, PGN) never escapes a
//! component: it becomes a [`UserDataError`] which the UI draws as an error
//! box. Caller bugs (wrong attribute, unknown theme) are [`IllegalArgument`]s.

use std::fmt;

/// Which kind of user-supplied text failed to parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserDataErrorKind {
    InvalidFen,
    InvalidNotation,
    InvalidPgn,
}

impl UserDataErrorKind {
    /// Title shown at the top of the error box
    pub fn title(self) -> &'static str {
        match self {
            UserDataErrorKind::InvalidFen => "Invalid FEN string.",
            UserDataErrorKind::InvalidNotation => "Invalid move notation.",
            UserDataErrorKind::InvalidPgn => "Invalid PGN string.",
        }
    }
}

/// Offending text plus the character index where parsing failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Excerpt {
    pub text: String,
    pub index: usize,
}

/// One line of the offending text with a caret under the failing character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExcerptLine {
    /// 1-based line number
    pub line_number: usize,
    pub line: String,
    /// Line made of spaces followed by `^`
    pub caret: String,
}

impl Excerpt {
    pub fn new(text: impl Into<String>, index: usize) -> Self {
        Self {
            text: text.into(),
            index,
        }
    }

    /// Extract the line holding `index` and build the caret marker under it.
    ///
    /// An index past the end of the text points just after the last character.
    pub fn line(&self) -> ExcerptLine {
        let chars: Vec<char> = self.text.chars().collect();
        let index = self.index.min(chars.len());

        let line_start = chars[..index]
            .iter()
            .rposition(|&c| c == '\n')
            .map(|p| p + 1)
            .unwrap_or(0);
        let line_end = chars[index..]
            .iter()
            .position(|&c| c == '\n' || c == '\r')
            .map(|p| p + index)
            .unwrap_or(chars.len());
        let line_number = chars[..line_start].iter().filter(|&&c| c == '\n').count() + 1;

        let line: String = chars[line_start..line_end].iter().collect();
        let caret = format!("{}^", " ".repeat(index - line_start));
        ExcerptLine {
            line_number,
            line,
            caret,
        }
    }
}

/// Recoverable error caused by bad chess data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{} {message}", .kind.title())]
pub struct UserDataError {
    pub kind: UserDataErrorKind,
    pub message: String,
    pub excerpt: Option<Excerpt>,
}

impl UserDataError {
    pub fn new(kind: UserDataErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            excerpt: None,
        }
    }

    pub fn with_excerpt(mut self, text: impl Into<String>, index: usize) -> Self {
        self.excerpt = Some(Excerpt::new(text, index));
        self
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// Programmer error: a component received an attribute it cannot work with.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Illegal value for attribute `{attribute}` of component {component}: {reason}")]
pub struct IllegalArgument {
    pub component: &'static str,
    pub attribute: &'static str,
    pub reason: String,
}

impl IllegalArgument {
    pub fn new(component: &'static str, attribute: &'static str, reason: impl fmt::Display) -> Self {
        Self {
            component,
            attribute,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_single_line() {
        let excerpt = Excerpt::new("1. e4 e5 2. Nf9", 14);
        let line = excerpt.line();
        assert_eq!(line.line_number, 1);
        assert_eq!(line.line, "1. e4 e5 2. Nf9");
        assert_eq!(line.caret, format!("{}^", " ".repeat(14)));
    }

    #[test]
    fn test_excerpt_multi_line() {
        let excerpt = Excerpt::new("[Event \"?\"]\n\n1. e4 Ke3 *", 19);
        let line = excerpt.line();
        assert_eq!(line.line_number, 3);
        assert_eq!(line.line, "1. e4 Ke3 *");
        assert_eq!(line.caret, format!("{}^", " ".repeat(6)));
    }

    #[test]
    fn test_excerpt_index_past_end() {
        let line = Excerpt::new("abc", 10).line();
        assert_eq!(line.line, "abc");
        assert_eq!(line.caret, "   ^");
    }

    #[test]
    fn test_illegal_argument_message() {
        let err = IllegalArgument::new("Chessboard", "colorset", "unknown colorset `pink`");
        assert_eq!(
            err.to_string(),
            "Illegal value for attribute `colorset` of component Chessboard: unknown colorset `pink`"
        );
    }

    #[test]
    fn test_user_data_error_title() {
        let err = UserDataError::new(UserDataErrorKind::InvalidFen, "bad board");
        assert_eq!(err.title(), "Invalid FEN string.");
        assert!(err.excerpt.is_none());
    }
}
