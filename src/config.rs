//! Chessboard configuration: every attribute a caller can set on a board, with
//! its default, loadable from JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::interaction::InteractionMode;
use crate::domain::markers::{
    AnnotationColor, ArrowMarkers, MarkerSpec, SquareMarkers, TextMarkerSpec, TextMarkers,
};
use crate::domain::small_screen::SmallScreenLimit;
use crate::error::IllegalArgument;
use crate::ui::theme::{find_colorset, find_pieceset};

pub const COMPONENT: &str = "Chessboard";

/// JSON names of the [`ChessboardConfig`] attributes
pub const ATTRIBUTES: [&str; 17] = [
    "position",
    "move",
    "squareMarkers",
    "textMarkers",
    "arrowMarkers",
    "flipped",
    "squareSize",
    "coordinateVisible",
    "turnVisible",
    "moveArrowVisible",
    "moveArrowColor",
    "animated",
    "colorset",
    "pieceset",
    "smallScreenLimits",
    "interactionMode",
    "editedArrowColor",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Illegal(#[from] IllegalArgument),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ChessboardConfig {
    /// `start`, `empty`, a FEN, optionally prefixed by `<variant>:`
    pub position: String,
    /// Move played from `position`, in SAN; the board shows the resulting position
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    pub played_move: Option<String>,
    pub square_markers: MarkerSpec<String>,
    pub text_markers: MarkerSpec<TextMarkerSpec>,
    pub arrow_markers: MarkerSpec<String>,
    pub flipped: bool,
    pub square_size: u32,
    pub coordinate_visible: bool,
    pub turn_visible: bool,
    pub move_arrow_visible: bool,
    pub move_arrow_color: AnnotationColor,
    pub animated: bool,
    pub colorset: String,
    pub pieceset: String,
    pub small_screen_limits: Vec<SmallScreenLimit>,
    pub interaction_mode: InteractionMode,
    /// Color of arrows drawn in edit-arrows mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_arrow_color: Option<AnnotationColor>,
}

impl Default for ChessboardConfig {
    fn default() -> Self {
        Self {
            position: "start".to_string(),
            played_move: None,
            square_markers: MarkerSpec::default(),
            text_markers: MarkerSpec::default(),
            arrow_markers: MarkerSpec::default(),
            flipped: false,
            square_size: 40,
            coordinate_visible: true,
            turn_visible: true,
            move_arrow_visible: true,
            move_arrow_color: AnnotationColor::Blue,
            animated: false,
            colorset: "original".to_string(),
            pieceset: "cburnett".to_string(),
            small_screen_limits: Vec::new(),
            interaction_mode: InteractionMode::None,
            edited_arrow_color: None,
        }
    }
}

impl ChessboardConfig {
    /// Parse a JSON configuration. Malformed JSON and unknown attributes are
    /// parse errors; a known attribute holding a value of the wrong type is an
    /// [`IllegalArgument`] naming that attribute.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if let Some(object) = value.as_object() {
            for (key, attribute) in object {
                check_attribute(key, attribute)?;
            }
        }
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Check the attributes whose misuse is a caller bug
    pub fn validate(&self) -> Result<(), IllegalArgument> {
        find_colorset(&self.colorset, COMPONENT)?;
        find_pieceset(&self.pieceset, COMPONENT)?;
        if self.interaction_mode == InteractionMode::EditArrows && self.edited_arrow_color.is_none() {
            return Err(IllegalArgument::new(
                COMPONENT,
                "editedArrowColor",
                "required when interactionMode is editArrows",
            ));
        }
        Ok(())
    }

    pub fn square_markers(&self) -> SquareMarkers {
        self.square_markers.square_markers()
    }

    pub fn text_markers(&self) -> TextMarkers {
        self.text_markers.text_markers()
    }

    pub fn arrow_markers(&self) -> ArrowMarkers {
        self.arrow_markers.arrow_markers()
    }

    /// JSON schema of the configuration file
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(ChessboardConfig)).unwrap_or_default()
    }
}

/// Deserialize one attribute on top of the defaults
fn check_attribute(key: &str, value: &serde_json::Value) -> Result<(), IllegalArgument> {
    let Some(attribute) = ATTRIBUTES.into_iter().find(|name| *name == key) else {
        return Ok(());
    };
    let mut single = serde_json::Map::new();
    single.insert(key.to_string(), value.clone());
    serde_json::from_value::<ChessboardConfig>(serde_json::Value::Object(single))
        .map(|_| ())
        .map_err(|e| IllegalArgument::new(COMPONENT, attribute, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Square;

    #[test]
    fn test_defaults() {
        let config = ChessboardConfig::from_json("{}").unwrap();
        assert_eq!(config, ChessboardConfig::default());
        assert_eq!(config.square_size, 40);
        assert_eq!(config.move_arrow_color, AnnotationColor::Blue);
        assert!(config.square_markers().is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = ChessboardConfig::from_json(
            r#"{
                "position": "8/1P6/8/8/7k/8/5K2/8 w - - 0 1",
                "move": "b8=Q",
                "squareMarkers": "Gb8,Rh4",
                "textMarkers": {"e4": {"symbol": "plus", "color": "y"}},
                "arrowMarkers": {"b7b8": "g"},
                "flipped": true,
                "interactionMode": "editArrows",
                "editedArrowColor": "r",
                "smallScreenLimits": [{"maxWidth": 400, "squareSize": 24}]
            }"#,
        )
        .unwrap();
        assert_eq!(config.played_move.as_deref(), Some("b8=Q"));
        assert_eq!(config.square_markers().len(), 2);
        assert_eq!(config.text_markers()[&Square::E4].color, AnnotationColor::Yellow);
        assert_eq!(config.arrow_markers().len(), 1);
        assert_eq!(config.small_screen_limits[0].square_size, Some(24));
        assert_eq!(config.interaction_mode, InteractionMode::EditArrows);
    }

    #[test]
    fn test_wrong_attribute_type() {
        let err = ChessboardConfig::from_json(r#"{"flipped": true, "squareSize": "big"}"#).unwrap_err();
        match err {
            ConfigError::Illegal(e) => {
                assert_eq!(e.component, "Chessboard");
                assert_eq!(e.attribute, "squareSize");
            }
            other => panic!("unexpected error {other}"),
        }

        let err = ChessboardConfig::from_json(r#"{"moveArrowColor": "purple"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Illegal(e) if e.attribute == "moveArrowColor"));

        let err = ChessboardConfig::from_json(r#"{"squarSize": 30}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = ChessboardConfig::from_json(r#"{"flipped": tru"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_attribute_names_match_schema() {
        let schema = ChessboardConfig::json_schema();
        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), ATTRIBUTES.len());
        for name in ATTRIBUTES {
            assert!(properties.contains_key(name), "{name} missing from the schema");
        }
    }

    #[test]
    fn test_programmer_errors() {
        let err = ChessboardConfig::from_json(r#"{"colorset": "neon"}"#).unwrap_err();
        match err {
            ConfigError::Illegal(e) => assert_eq!(e.attribute, "colorset"),
            other => panic!("unexpected error {other}"),
        }

        let err = ChessboardConfig::from_json(r#"{"interactionMode": "editArrows"}"#).unwrap_err();
        match err {
            ConfigError::Illegal(e) => {
                assert_eq!(e.component, "Chessboard");
                assert_eq!(e.attribute, "editedArrowColor");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_schema_lists_attributes() {
        let schema = ChessboardConfig::json_schema().to_string();
        assert!(schema.contains("smallScreenLimits"));
        assert!(schema.contains("editedArrowColor"));
    }
}
