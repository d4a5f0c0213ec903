use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use env_logger::Env;
use gpui::{App, Application};
use log::info;

use gpui_chessboard::app::{self, DemoOptions};
use gpui_chessboard::domain::{AnnotationColor, InteractionMode};
use gpui_chessboard::ui::FileAssets;
use gpui_chessboard::ChessboardConfig;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    None,
    MovePieces,
    ClickSquares,
    EditArrows,
    PlayMoves,
}

impl From<Mode> for InteractionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::None => InteractionMode::None,
            Mode::MovePieces => InteractionMode::MovePieces,
            Mode::ClickSquares => InteractionMode::ClickSquares,
            Mode::EditArrows => InteractionMode::EditArrows,
            Mode::PlayMoves => InteractionMode::PlayMoves,
        }
    }
}

#[derive(Parser)]
#[command(name = "gpui-chessboard", version, about = "Chessboard, navigation board and movetext demo")]
struct Cli {
    /// JSON board configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// PGN file shown with a navigation board and its movetext
    #[arg(long, value_name = "FILE")]
    pgn: Option<PathBuf>,
    /// Index of the game to show in the PGN file
    #[arg(long, default_value_t = 0)]
    game: usize,
    /// Interaction mode, overriding the configuration
    #[arg(long, value_enum)]
    mode: Option<Mode>,
    /// Print the JSON schema of the configuration and exit
    #[arg(long)]
    schema: bool,
}

fn main() -> anyhow::Result<()> {
    let env = Env::default().filter_or("CHESSBOARD_LOG", "info");
    env_logger::Builder::from_env(env).init();

    let cli = Cli::parse();
    if cli.schema {
        println!("{:#}", ChessboardConfig::json_schema());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => ChessboardConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => ChessboardConfig::default(),
    };
    if let Some(mode) = cli.mode {
        config.interaction_mode = mode.into();
        if config.interaction_mode == InteractionMode::EditArrows && config.edited_arrow_color.is_none() {
            config.edited_arrow_color = Some(AnnotationColor::Green);
        }
    }
    config.validate()?;

    let pgn = match &cli.pgn {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Some((text, cli.game))
        }
        None => None,
    };
    info!("board mode {:?}", config.interaction_mode);

    let options = DemoOptions { config, pgn };
    Application::new()
        .with_assets(FileAssets::new())
        .run(move |cx: &mut App| app::run(cx, options));
    Ok(())
}
