//! Board annotations (square highlights, text glyphs, arrows) and their compact
//! string form, e.g. `Ge4,Rd5` or `G(plus)e4` or `Ye2e4`.
//!
//! Flattening is deterministic: invalid entries are dropped and the remaining ones
//! are sorted by key using plain string comparison. Parsing drops malformed tokens
//! and lets the last duplicate win.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use shakmaty::Square;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub enum AnnotationColor {
    #[serde(rename = "b")]
    Blue,
    #[serde(rename = "g")]
    Green,
    #[serde(rename = "r")]
    Red,
    #[serde(rename = "y")]
    Yellow,
}

impl AnnotationColor {
    pub const ALL: [AnnotationColor; 4] = [
        AnnotationColor::Blue,
        AnnotationColor::Green,
        AnnotationColor::Red,
        AnnotationColor::Yellow,
    ];

    /// Lowercase code used in maps and configuration
    pub fn code(self) -> &'static str {
        match self {
            AnnotationColor::Blue => "b",
            AnnotationColor::Green => "g",
            AnnotationColor::Red => "r",
            AnnotationColor::Yellow => "y",
        }
    }

    /// Uppercase letter used in the compact form
    pub fn letter(self) -> char {
        match self {
            AnnotationColor::Blue => 'B',
            AnnotationColor::Green => 'G',
            AnnotationColor::Red => 'R',
            AnnotationColor::Yellow => 'Y',
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "b" => Some(AnnotationColor::Blue),
            "g" => Some(AnnotationColor::Green),
            "r" => Some(AnnotationColor::Red),
            "y" => Some(AnnotationColor::Yellow),
            _ => None,
        }
    }
}

impl fmt::Display for AnnotationColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Glyph drawn by a text marker: a single letter/digit or one of the named shapes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum AnnotationSymbol {
    Char(char),
    Plus,
    Times,
    Dot,
    Circle,
}

impl AnnotationSymbol {
    /// Text drawn on the board for this symbol
    pub fn glyph(self) -> String {
        match self {
            AnnotationSymbol::Char(c) => c.to_string(),
            AnnotationSymbol::Plus => "+".to_string(),
            AnnotationSymbol::Times => "\u{00d7}".to_string(),
            AnnotationSymbol::Dot => "\u{2022}".to_string(),
            AnnotationSymbol::Circle => "\u{25cb}".to_string(),
        }
    }

    fn name(self) -> Option<&'static str> {
        match self {
            AnnotationSymbol::Char(_) => None,
            AnnotationSymbol::Plus => Some("plus"),
            AnnotationSymbol::Times => Some("times"),
            AnnotationSymbol::Dot => Some("dot"),
            AnnotationSymbol::Circle => Some("circle"),
        }
    }
}

impl FromStr for AnnotationSymbol {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => Ok(AnnotationSymbol::Char(c)),
            _ => match s {
                "plus" => Ok(AnnotationSymbol::Plus),
                "times" => Ok(AnnotationSymbol::Times),
                "dot" => Ok(AnnotationSymbol::Dot),
                "circle" => Ok(AnnotationSymbol::Circle),
                _ => Err(()),
            },
        }
    }
}

impl fmt::Display for AnnotationSymbol {
    /// Bare if single character, parenthesized otherwise (compact form)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.name()) {
            (AnnotationSymbol::Char(c), _) => write!(f, "{c}"),
            (_, Some(name)) => write!(f, "({name})"),
            (_, None) => Ok(()),
        }
    }
}

/// Ordered pair of squares identifying an arrow, e.g. `e2e4`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct SquareCouple {
    pub from: Square,
    pub to: Square,
}

impl SquareCouple {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Origin equals destination: never drawn
    pub fn is_degenerate(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for SquareCouple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl FromStr for SquareCouple {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        if !is_square_couple(s) {
            return Err(());
        }
        let from = s[..2].parse().map_err(|_| ())?;
        let to = s[2..].parse().map_err(|_| ())?;
        Ok(Self { from, to })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TextMarker {
    pub symbol: AnnotationSymbol,
    pub color: AnnotationColor,
}

pub type SquareMarkers = BTreeMap<Square, AnnotationColor>;
pub type TextMarkers = BTreeMap<Square, TextMarker>;
pub type ArrowMarkers = BTreeMap<SquareCouple, AnnotationColor>;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

static SQUARE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-h][1-8]$").unwrap());
static SQUARE_COUPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-h][1-8][a-h][1-8]$").unwrap());
static SQUARE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([BGRYbgry])([a-h][1-8])$").unwrap());
static TEXT_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([BGRYbgry])(?:([A-Za-z0-9])|\(([a-z]+)\))([a-h][1-8])$").unwrap()
});
static ARROW_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([BGRYbgry])([a-h][1-8][a-h][1-8])$").unwrap());

pub fn is_square(s: &str) -> bool {
    SQUARE_RE.is_match(s)
}

pub fn is_square_couple(s: &str) -> bool {
    SQUARE_COUPLE_RE.is_match(s)
}

pub fn is_annotation_color(s: &str) -> bool {
    AnnotationColor::from_code(s).is_some()
}

pub fn is_annotation_symbol(s: &str) -> bool {
    s.parse::<AnnotationSymbol>().is_ok()
}

fn color_from_letter(letter: &str) -> Option<AnnotationColor> {
    AnnotationColor::from_code(&letter.to_ascii_lowercase())
}

// ---------------------------------------------------------------------------
// Flatten (map -> string)
// ---------------------------------------------------------------------------

fn join_sorted(mut tokens: Vec<(String, String)>) -> String {
    tokens.sort_by(|(a, _), (b, _)| a.cmp(b));
    tokens
        .into_iter()
        .map(|(_, token)| token)
        .collect::<Vec<_>>()
        .join(",")
}

/// Flatten square markers given as `(square, color-code)` entries
pub fn flatten_square_markers<K, V>(markers: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let tokens = markers
        .into_iter()
        .filter_map(|(key, value)| {
            let (key, value) = (key.as_ref(), value.as_ref());
            let color = AnnotationColor::from_code(value).filter(|_| is_square(key))?;
            Some((key.to_string(), format!("{}{}", color.letter(), key)))
        })
        .collect();
    join_sorted(tokens)
}

/// Flatten text markers given as `(square, symbol, color-code)` entries
pub fn flatten_text_markers<K, S, C>(markers: impl IntoIterator<Item = (K, S, C)>) -> String
where
    K: AsRef<str>,
    S: AsRef<str>,
    C: AsRef<str>,
{
    let tokens = markers
        .into_iter()
        .filter_map(|(key, symbol, color)| {
            let key = key.as_ref();
            if !is_square(key) {
                return None;
            }
            let symbol: AnnotationSymbol = symbol.as_ref().parse().ok()?;
            let color = AnnotationColor::from_code(color.as_ref())?;
            Some((key.to_string(), format!("{}{}{}", color.letter(), symbol, key)))
        })
        .collect();
    join_sorted(tokens)
}

/// Flatten arrow markers given as `(square-couple, color-code)` entries
pub fn flatten_arrow_markers<K, V>(markers: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let tokens = markers
        .into_iter()
        .filter_map(|(key, value)| {
            let (key, value) = (key.as_ref(), value.as_ref());
            let color = AnnotationColor::from_code(value).filter(|_| is_square_couple(key))?;
            Some((key.to_string(), format!("{}{}", color.letter(), key)))
        })
        .collect();
    join_sorted(tokens)
}

pub fn square_markers_to_string(markers: &SquareMarkers) -> String {
    flatten_square_markers(markers.iter().map(|(sq, color)| (sq.to_string(), color.code())))
}

pub fn text_markers_to_string(markers: &TextMarkers) -> String {
    flatten_text_markers(markers.iter().map(|(sq, marker)| {
        let symbol = match marker.symbol {
            AnnotationSymbol::Char(c) => c.to_string(),
            other => other.name().unwrap_or_default().to_string(),
        };
        (sq.to_string(), symbol, marker.color.code())
    }))
}

pub fn arrow_markers_to_string(markers: &ArrowMarkers) -> String {
    flatten_arrow_markers(markers.iter().map(|(couple, color)| (couple.to_string(), color.code())))
}

// ---------------------------------------------------------------------------
// Parse (string -> map)
// ---------------------------------------------------------------------------

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|t| !t.is_empty())
}

pub fn parse_square_markers(text: &str) -> SquareMarkers {
    let mut markers = SquareMarkers::new();
    for token in tokens(text) {
        let Some(caps) = SQUARE_TOKEN_RE.captures(token) else {
            continue;
        };
        let color = color_from_letter(&caps[1]);
        let square = caps[2].parse::<Square>().ok();
        if let (Some(color), Some(square)) = (color, square) {
            markers.insert(square, color);
        }
    }
    markers
}

pub fn parse_text_markers(text: &str) -> TextMarkers {
    let mut markers = TextMarkers::new();
    for token in tokens(text) {
        let Some(caps) = TEXT_TOKEN_RE.captures(token) else {
            continue;
        };
        let color = color_from_letter(&caps[1]);
        let symbol = caps
            .get(2)
            .or_else(|| caps.get(3))
            .and_then(|m| m.as_str().parse::<AnnotationSymbol>().ok());
        let square = caps[4].parse::<Square>().ok();
        if let (Some(color), Some(symbol), Some(square)) = (color, symbol, square) {
            markers.insert(square, TextMarker { symbol, color });
        }
    }
    markers
}

pub fn parse_arrow_markers(text: &str) -> ArrowMarkers {
    let mut markers = ArrowMarkers::new();
    for token in tokens(text) {
        let Some(caps) = ARROW_TOKEN_RE.captures(token) else {
            continue;
        };
        let color = color_from_letter(&caps[1]);
        let couple = caps[2].parse::<SquareCouple>().ok();
        if let (Some(color), Some(couple)) = (color, couple) {
            markers.insert(couple, color);
        }
    }
    markers
}

// ---------------------------------------------------------------------------
// Configuration form
// ---------------------------------------------------------------------------

/// Text marker value in map form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TextMarkerSpec {
    pub symbol: String,
    pub color: String,
}

/// Marker set as supplied by a caller: compact string or map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum MarkerSpec<V> {
    Compact(String),
    Map(BTreeMap<String, V>),
}

impl<V> Default for MarkerSpec<V> {
    fn default() -> Self {
        MarkerSpec::Compact(String::new())
    }
}

impl MarkerSpec<String> {
    pub fn square_markers(&self) -> SquareMarkers {
        match self {
            MarkerSpec::Compact(text) => parse_square_markers(text),
            MarkerSpec::Map(map) => map
                .iter()
                .filter_map(|(key, value)| {
                    let square = key.parse::<Square>().ok().filter(|_| is_square(key))?;
                    Some((square, AnnotationColor::from_code(value)?))
                })
                .collect(),
        }
    }

    pub fn arrow_markers(&self) -> ArrowMarkers {
        match self {
            MarkerSpec::Compact(text) => parse_arrow_markers(text),
            MarkerSpec::Map(map) => map
                .iter()
                .filter_map(|(key, value)| {
                    let couple = key.parse::<SquareCouple>().ok()?;
                    Some((couple, AnnotationColor::from_code(value)?))
                })
                .collect(),
        }
    }
}

impl MarkerSpec<TextMarkerSpec> {
    pub fn text_markers(&self) -> TextMarkers {
        match self {
            MarkerSpec::Compact(text) => parse_text_markers(text),
            MarkerSpec::Map(map) => map
                .iter()
                .filter_map(|(key, spec)| {
                    let square = key.parse::<Square>().ok().filter(|_| is_square(key))?;
                    let symbol = spec.symbol.parse().ok()?;
                    let color = AnnotationColor::from_code(&spec.color)?;
                    Some((square, TextMarker { symbol, color }))
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_drops_invalid_entries() {
        let raw = [("e1", "r"), ("k9", "g"), ("whatever", "y")];
        assert_eq!(flatten_square_markers(raw), "Re1");

        let raw = [("e1", "purple"), ("a2", "b")];
        assert_eq!(flatten_square_markers(raw), "Ba2");
    }

    #[test]
    fn test_flatten_sorts_by_string_key() {
        let raw = [("b1", "g"), ("a8", "r"), ("a1", "y")];
        assert_eq!(flatten_square_markers(raw), "Ya1,Ra8,Gb1");

        let mut markers = SquareMarkers::new();
        markers.insert(Square::B1, AnnotationColor::Green);
        markers.insert(Square::A8, AnnotationColor::Red);
        markers.insert(Square::A1, AnnotationColor::Yellow);
        // Square ordering is a1 < b1 < a8, string ordering is a1 < a8 < b1
        assert_eq!(square_markers_to_string(&markers), "Ya1,Ra8,Gb1");
    }

    #[test]
    fn test_flatten_text_markers() {
        let raw = [
            ("e4", "plus", "g"),
            ("d5", "A", "r"),
            ("c3", "smiley", "b"),
            ("h9", "1", "b"),
        ];
        assert_eq!(flatten_text_markers(raw), "RAd5,G(plus)e4");
    }

    #[test]
    fn test_flatten_arrow_markers() {
        let raw = [("e2e4", "g"), ("a1a1", "b"), ("e2e9", "r"), ("d3b6", "x")];
        assert_eq!(flatten_arrow_markers(raw), "Ba1a1,Ge2e4");
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let markers = parse_square_markers("Ra3,Ya3");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers.get(&Square::A3), Some(&AnnotationColor::Yellow));
    }

    #[test]
    fn test_parse_trims_and_drops_bad_tokens() {
        let markers = parse_square_markers(" Ge4 , Xd5, Rz9, Bh8,, ");
        assert_eq!(markers.len(), 2);
        assert_eq!(markers.get(&Square::E4), Some(&AnnotationColor::Green));
        assert_eq!(markers.get(&Square::H8), Some(&AnnotationColor::Blue));
    }

    #[test]
    fn test_parse_lowercase_color_letter() {
        let markers = parse_square_markers("ge4");
        assert_eq!(markers.get(&Square::E4), Some(&AnnotationColor::Green));
    }

    #[test]
    fn test_parse_text_markers() {
        let markers = parse_text_markers("G(plus)e4,RAd5,Y(star)a1,B1h8,R(dot)c2");
        assert_eq!(markers.len(), 4);
        assert_eq!(
            markers.get(&Square::E4),
            Some(&TextMarker {
                symbol: AnnotationSymbol::Plus,
                color: AnnotationColor::Green
            })
        );
        assert_eq!(
            markers.get(&Square::D5).map(|m| m.symbol),
            Some(AnnotationSymbol::Char('A'))
        );
        assert_eq!(
            markers.get(&Square::H8).map(|m| m.symbol),
            Some(AnnotationSymbol::Char('1'))
        );
        assert!(!markers.contains_key(&Square::A1));
    }

    #[test]
    fn test_parse_arrow_markers() {
        let markers = parse_arrow_markers("Ge2e4, Rd3b6, Gd3b6, Ye2");
        assert_eq!(markers.len(), 2);
        assert_eq!(
            markers.get(&SquareCouple::new(Square::D3, Square::B6)),
            Some(&AnnotationColor::Green)
        );
    }

    #[test]
    fn test_round_trips() {
        let text = "Ya1,Ra8,Gb1,Bh8";
        assert_eq!(square_markers_to_string(&parse_square_markers(text)), text);

        let text = "G(circle)a1,RZa8,B0e4,Y(times)h1";
        assert_eq!(text_markers_to_string(&parse_text_markers(text)), text);

        let text = "Ga1h8,Rb1b1,Yh1a8";
        assert_eq!(arrow_markers_to_string(&parse_arrow_markers(text)), text);

        let mut markers = ArrowMarkers::new();
        for (i, from) in Square::ALL.iter().enumerate().step_by(5) {
            let to = Square::ALL[(i * 7) % 64];
            markers.insert(SquareCouple::new(*from, to), AnnotationColor::ALL[i % 4]);
        }
        assert_eq!(parse_arrow_markers(&arrow_markers_to_string(&markers)), markers);
    }

    #[test]
    fn test_every_square_round_trips() {
        let markers: SquareMarkers = Square::ALL
            .iter()
            .enumerate()
            .map(|(i, sq)| (*sq, AnnotationColor::ALL[i % 4]))
            .collect();
        let text = square_markers_to_string(&markers);
        assert!(text.split(',').all(|t| t.chars().next().unwrap().is_ascii_uppercase()));
        assert_eq!(parse_square_markers(&text), markers);
    }

    #[test]
    fn test_validation_predicates() {
        assert!(is_square("a1"));
        assert!(!is_square("A1"));
        assert!(!is_square("i1"));
        assert!(!is_square("e44"));
        assert!(is_square_couple("e2e4"));
        assert!(!is_square_couple("e2-e4"));
        assert!(is_annotation_color("y"));
        assert!(!is_annotation_color("Y"));
        assert!(is_annotation_symbol("Q"));
        assert!(is_annotation_symbol("circle"));
        assert!(!is_annotation_symbol("QQ"));
        assert!(!is_annotation_symbol("#"));
    }

    #[test]
    fn test_marker_spec_forms() {
        let compact: MarkerSpec<String> = serde_json::from_str(r#""Ge4,Rd5""#).unwrap();
        assert_eq!(compact.square_markers().len(), 2);

        let map: MarkerSpec<String> =
            serde_json::from_str(r#"{"e4": "g", "k9": "r", "d5": "purple"}"#).unwrap();
        let markers = map.square_markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers.get(&Square::E4), Some(&AnnotationColor::Green));

        let text: MarkerSpec<TextMarkerSpec> =
            serde_json::from_str(r#"{"c3": {"symbol": "dot", "color": "b"}}"#).unwrap();
        assert_eq!(
            text.text_markers().get(&Square::C3).map(|m| m.symbol),
            Some(AnnotationSymbol::Dot)
        );
    }
}
