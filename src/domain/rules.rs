//! Adapter over `shakmaty` exposing what the board components need from a rules
//! engine: position parsing, legality of a from/to pair, move descriptors and SAN.

use std::fmt;

use log::warn;
use shakmaty::fen::{Fen, LossyFenError};
use shakmaty::san::{San, SanPlus};
use shakmaty::variant::{Variant, VariantPosition};
use shakmaty::{
    Board, CastlingMode, Color as SColor, EnPassantMode, Move, Position, Role, Setup, Square,
};

use crate::domain::chess::{
    Piece, PieceColor, PieceKind, color_from_shakmaty, kind_from_role, role_from_kind,
    shakmaty_to_piece,
};
use crate::error::{UserDataError, UserDataErrorKind};

/// Game variants understood by [`parse_position`], with their prefix names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameVariant {
    Regular,
    Chess960,
    Antichess,
    Atomic,
    Horde,
    KingOfTheHill,
    RacingKings,
    ThreeCheck,
    Crazyhouse,
}

impl GameVariant {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "regular" => Some(GameVariant::Regular),
            "chess960" => Some(GameVariant::Chess960),
            "antichess" => Some(GameVariant::Antichess),
            "atomic" => Some(GameVariant::Atomic),
            "horde" => Some(GameVariant::Horde),
            "kingofthehill" => Some(GameVariant::KingOfTheHill),
            "racingkings" => Some(GameVariant::RacingKings),
            "threecheck" => Some(GameVariant::ThreeCheck),
            "crazyhouse" => Some(GameVariant::Crazyhouse),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameVariant::Regular => "regular",
            GameVariant::Chess960 => "chess960",
            GameVariant::Antichess => "antichess",
            GameVariant::Atomic => "atomic",
            GameVariant::Horde => "horde",
            GameVariant::KingOfTheHill => "kingofthehill",
            GameVariant::RacingKings => "racingkings",
            GameVariant::ThreeCheck => "threecheck",
            GameVariant::Crazyhouse => "crazyhouse",
        }
    }

    fn shakmaty(self) -> (Variant, CastlingMode) {
        match self {
            GameVariant::Regular => (Variant::Chess, CastlingMode::Standard),
            GameVariant::Chess960 => (Variant::Chess, CastlingMode::Chess960),
            GameVariant::Antichess => (Variant::Antichess, CastlingMode::Standard),
            GameVariant::Atomic => (Variant::Atomic, CastlingMode::Standard),
            GameVariant::Horde => (Variant::Horde, CastlingMode::Standard),
            GameVariant::KingOfTheHill => (Variant::KingOfTheHill, CastlingMode::Standard),
            GameVariant::RacingKings => (Variant::RacingKings, CastlingMode::Standard),
            GameVariant::ThreeCheck => (Variant::ThreeCheck, CastlingMode::Standard),
            GameVariant::Crazyhouse => (Variant::Crazyhouse, CastlingMode::Standard),
        }
    }
}

/// A displayable position. Positions that fail the legality checks of the rules
/// engine (e.g. the empty board) are kept for display but cannot be played on.
#[derive(Clone, Debug)]
pub struct BoardPosition {
    variant: GameVariant,
    board: Board,
    turn: SColor,
    legal: Option<VariantPosition>,
}

/// Parse `start`, `empty`, a FEN, or any of those prefixed by `<variant>:`.
pub fn parse_position(text: &str) -> Result<BoardPosition, UserDataError> {
    let text = text.trim();
    let (variant, body) = match text.split_once(':') {
        Some((prefix, rest)) => match GameVariant::from_name(prefix) {
            Some(variant) => (variant, rest.trim()),
            None => {
                return Err(UserDataError::new(
                    UserDataErrorKind::InvalidFen,
                    format!("Unknown game variant \"{prefix}\"."),
                ));
            }
        },
        None => (GameVariant::Regular, text),
    };
    let (shakmaty_variant, castling_mode) = variant.shakmaty();

    match body {
        "start" => {
            let position = VariantPosition::new(shakmaty_variant);
            Ok(BoardPosition::from_legal(variant, position))
        }
        "empty" => Ok(BoardPosition {
            variant,
            board: Board::empty(),
            turn: SColor::White,
            legal: None,
        }),
        fen_text => {
            let fen: Fen = fen_text.parse().map_err(|e| {
                UserDataError::new(UserDataErrorKind::InvalidFen, format!("{e}."))
            })?;
            let setup = fen.into_setup();
            let board = setup.board.clone();
            let turn = setup.turn;
            match VariantPosition::from_setup(shakmaty_variant, setup, castling_mode) {
                Ok(position) => Ok(BoardPosition::from_legal(variant, position)),
                Err(e) => {
                    warn!("position is not legal, play disabled: {e}");
                    Ok(BoardPosition {
                        variant,
                        board,
                        turn,
                        legal: None,
                    })
                }
            }
        }
    }
}

impl BoardPosition {
    fn from_legal(variant: GameVariant, position: VariantPosition) -> Self {
        Self {
            variant,
            board: position.board().clone(),
            turn: position.turn(),
            legal: Some(position),
        }
    }

    pub fn variant(&self) -> GameVariant {
        self.variant
    }

    /// Whether the rules engine accepts this position (required to play moves)
    pub fn is_legal(&self) -> bool {
        self.legal.is_some()
    }

    pub fn turn(&self) -> PieceColor {
        color_from_shakmaty(self.turn)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square).map(shakmaty_to_piece)
    }

    /// Every occupied square with its piece
    pub fn pieces(&self) -> Vec<(Square, Piece)> {
        Square::ALL
            .iter()
            .filter_map(|&sq| self.piece_at(sq).map(|p| (sq, p)))
            .collect()
    }

    /// Half-moves played before this position, from the FEN move counter
    pub fn ply(&self) -> usize {
        let fullmoves = self.legal.as_ref().map_or(1, |p| p.fullmoves().get()) as usize;
        2 * (fullmoves - 1) + usize::from(self.turn == SColor::Black)
    }

    /// FEN of the position; display-only positions keep only board and turn
    pub fn fen(&self) -> String {
        let setup = match self.legal.as_ref() {
            Some(position) => position.to_setup(EnPassantMode::Legal),
            None => {
                let mut setup = Setup::empty();
                setup.board = self.board.clone();
                setup.turn = self.turn;
                setup
            }
        };
        // lossy only for unrepresentable castling rights or pockets
        Fen::try_from_setup(setup)
            .unwrap_or_else(LossyFenError::ignore)
            .to_string()
    }

    /// `<variant>:<fen>`, accepted back by [`parse_position`]
    pub fn to_text(&self) -> String {
        format!("{}:{}", self.variant.name(), self.fen())
    }

    /// Overwrite the content of a square
    pub fn set_square(&mut self, square: Square, piece: Option<Piece>) {
        match piece {
            Some(p) => {
                let piece = shakmaty::Piece {
                    color: match p.color {
                        PieceColor::White => SColor::White,
                        PieceColor::Black => SColor::Black,
                    },
                    role: role_from_kind(p.kind),
                };
                self.board.set_piece_at(square, piece);
            }
            None => {
                self.board.remove_piece_at(square);
            }
        }
        // an edited board is display-only
        self.legal = None;
    }

    pub fn is_check(&self) -> bool {
        self.legal.as_ref().is_some_and(|p| p.is_check())
    }

    pub fn is_checkmate(&self) -> bool {
        self.legal.as_ref().is_some_and(|p| p.is_checkmate())
    }

    /// Whether a piece standing on `square` may start a move
    pub fn can_move_from(&self, square: Square) -> bool {
        self.is_legal() && self.piece_at(square).is_some_and(|p| p.color == self.turn())
    }

    /// Legality of moving whatever stands on `from` to `to`.
    ///
    /// Castling is matched both as king-to-destination and king-takes-rook.
    pub fn is_move_legal(&self, from: Square, to: Square) -> Option<MoveInfo> {
        let position = self.legal.as_ref()?;
        let candidates: Vec<Move> = position
            .legal_moves()
            .into_iter()
            .filter(|m| move_matches(m, from, to, position.turn()))
            .collect();
        if candidates.is_empty() {
            None
        } else {
            Some(MoveInfo {
                turn: position.turn(),
                candidates,
            })
        }
    }

    /// Parse SAN (or `--` for a null move) in this position.
    pub fn parse_move(&self, text: &str) -> Result<MoveDescriptor, UserDataError> {
        let text = text.trim();
        let Some(position) = self.legal.as_ref() else {
            return Err(UserDataError::new(
                UserDataErrorKind::InvalidNotation,
                "Moves cannot be played in an illegal position.",
            ));
        };
        if text == "--" {
            if position.is_check() {
                return Err(UserDataError::new(
                    UserDataErrorKind::InvalidNotation,
                    "A null move cannot be played when in check.",
                ));
            }
            return Ok(MoveDescriptor {
                mv: None,
                mover: position.turn(),
            });
        }
        let san: SanPlus = text.parse().map_err(|_| {
            UserDataError::new(
                UserDataErrorKind::InvalidNotation,
                format!("\"{text}\" is not a valid move notation."),
            )
        })?;
        let mv = san.san.to_move(position).map_err(|e| {
            UserDataError::new(
                UserDataErrorKind::InvalidNotation,
                format!("\"{text}\" cannot be played: {e}."),
            )
        })?;
        Ok(MoveDescriptor {
            mv: Some(mv),
            mover: position.turn(),
        })
    }

    /// SAN of a move, with `+` / `#` suffix
    pub fn notation(&self, descriptor: &MoveDescriptor) -> String {
        let (Some(position), Some(mv)) = (self.legal.as_ref(), descriptor.mv.as_ref()) else {
            return "--".to_string();
        };
        let san = San::from_move(position, mv.clone());
        let suffix = match position.clone().play(mv.clone()) {
            Ok(after) if after.is_checkmate() => "#",
            Ok(after) if after.is_check() => "+",
            _ => "",
        };
        format!("{san}{suffix}")
    }

    /// Position after the move
    pub fn play(&self, descriptor: &MoveDescriptor) -> Result<BoardPosition, UserDataError> {
        let Some(position) = self.legal.as_ref() else {
            return Err(UserDataError::new(
                UserDataErrorKind::InvalidNotation,
                "Moves cannot be played in an illegal position.",
            ));
        };
        let next = match descriptor.mv.as_ref() {
            Some(mv) => position.clone().play(mv.clone()).map_err(|e| {
                UserDataError::new(UserDataErrorKind::InvalidNotation, format!("{e}."))
            })?,
            None => position.clone().swap_turn().map_err(|e| {
                UserDataError::new(UserDataErrorKind::InvalidNotation, format!("{e}."))
            })?,
        };
        Ok(BoardPosition::from_legal(self.variant, next))
    }
}

fn castling_king_destination(m: &Move, turn: SColor) -> Option<Square> {
    m.castling_side().map(|side| side.king_to(turn))
}

fn move_matches(m: &Move, from: Square, to: Square, turn: SColor) -> bool {
    match m {
        Move::Normal { from: f, to: t, .. } | Move::EnPassant { from: f, to: t } => {
            *f == from && *t == to
        }
        Move::Castle { king, rook } => {
            *king == from && (*rook == to || castling_king_destination(m, turn) == Some(to))
        }
        Move::Put { .. } => false,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveStatus {
    Regular,
    Promotion,
}

/// Legal move(s) matching one from/to pair: one regular move, or one per promotion piece.
#[derive(Clone, Debug)]
pub struct MoveInfo {
    turn: SColor,
    candidates: Vec<Move>,
}

const PROMOTION_ORDER: [PieceKind; 5] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::King,
];

impl MoveInfo {
    pub fn status(&self) -> MoveStatus {
        if self.candidates.iter().any(|m| m.promotion().is_some()) {
            MoveStatus::Promotion
        } else {
            MoveStatus::Regular
        }
    }

    /// Promotion choices in display order (queen first; king only where the variant allows it)
    pub fn promotions(&self) -> Vec<PieceKind> {
        PROMOTION_ORDER
            .into_iter()
            .filter(|kind| {
                self.candidates
                    .iter()
                    .any(|m| m.promotion() == Some(role_from_kind(*kind)))
            })
            .collect()
    }

    /// Finalize the move; `promotion` is required iff the status is `Promotion`
    pub fn build(&self, promotion: Option<PieceKind>) -> Option<MoveDescriptor> {
        let wanted = promotion.map(role_from_kind);
        self.candidates
            .iter()
            .find(|m| m.promotion() == wanted)
            .map(|m| MoveDescriptor {
                mv: Some(m.clone()),
                mover: self.turn,
            })
    }
}

/// A move together with the side playing it. A `None` move is the null move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveDescriptor {
    mv: Option<Move>,
    mover: SColor,
}

impl MoveDescriptor {
    pub fn is_null(&self) -> bool {
        self.mv.is_none()
    }

    pub fn mover(&self) -> PieceColor {
        color_from_shakmaty(self.mover)
    }

    pub fn from(&self) -> Option<Square> {
        self.mv.and_then(|m| m.from())
    }

    /// Destination; the king's destination for castling moves
    pub fn to(&self) -> Option<Square> {
        let mv = self.mv.as_ref()?;
        castling_king_destination(mv, self.mover).or(Some(mv.to()))
    }

    pub fn moving_piece(&self) -> Option<Piece> {
        self.mv
            .as_ref()
            .map(|m| Piece::new(self.mover(), kind_from_role(m.role())))
    }

    pub fn is_castling(&self) -> bool {
        self.mv.is_some_and(|m| m.is_castle())
    }

    pub fn rook_from(&self) -> Option<Square> {
        match self.mv.as_ref()? {
            Move::Castle { rook, .. } => Some(*rook),
            _ => None,
        }
    }

    pub fn rook_to(&self) -> Option<Square> {
        let mv = self.mv.as_ref()?;
        mv.castling_side().map(|side| side.rook_to(self.mover))
    }

    pub fn is_en_passant(&self) -> bool {
        self.mv.is_some_and(|m| m.is_en_passant())
    }

    /// Square of the pawn captured en passant
    pub fn en_passant_square(&self) -> Option<Square> {
        match self.mv.as_ref()? {
            Move::EnPassant { from, to } => Some(Square::from_coords(to.file(), from.rank())),
            _ => None,
        }
    }

    pub fn is_promotion(&self) -> bool {
        self.mv.as_ref().is_some_and(|m| m.promotion().is_some())
    }

    pub fn colored_promotion(&self) -> Option<Piece> {
        let role: Role = self.mv.as_ref()?.promotion()?;
        Some(Piece::new(self.mover(), kind_from_role(role)))
    }
}

impl fmt::Display for MoveDescriptor {
    /// Coordinate form, e.g. `e2e4` or `b7b8r`, `--` for the null move
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from(), self.to()) {
            (Some(from), Some(to)) => {
                write!(f, "{from}{to}")?;
                if let Some(role) = self.mv.and_then(|m| m.promotion()) {
                    write!(f, "{}", role.char())?;
                }
                Ok(())
            }
            _ => f.write_str("--"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_and_empty() {
        let start = parse_position("start").unwrap();
        assert!(start.is_legal());
        assert_eq!(start.turn(), PieceColor::White);
        assert_eq!(start.pieces().len(), 32);

        let empty = parse_position("empty").unwrap();
        assert!(!empty.is_legal());
        assert!(empty.pieces().is_empty());
    }

    #[test]
    fn test_parse_invalid_fen() {
        let err = parse_position("rnbqkbnr/pppppppp/8/8 w").unwrap_err();
        assert_eq!(err.kind, UserDataErrorKind::InvalidFen);

        let err = parse_position("nosuchvariant:start").unwrap_err();
        assert_eq!(err.kind, UserDataErrorKind::InvalidFen);
    }

    #[test]
    fn test_illegal_fen_is_displayable() {
        // two white kings
        let pos = parse_position("8/8/8/8/8/8/8/K6K w - - 0 1").unwrap();
        assert!(!pos.is_legal());
        assert_eq!(pos.pieces().len(), 2);
        assert!(pos.is_move_legal(Square::A1, Square::A2).is_none());
    }

    #[test]
    fn test_regular_move() {
        let pos = parse_position("start").unwrap();
        let info = pos.is_move_legal(Square::E2, Square::E4).unwrap();
        assert_eq!(info.status(), MoveStatus::Regular);
        let mv = info.build(None).unwrap();
        assert_eq!(pos.notation(&mv), "e4");
        assert_eq!(mv.to_string(), "e2e4");
        assert!(pos.is_move_legal(Square::E2, Square::E5).is_none());
    }

    #[test]
    fn test_promotion_move() {
        let pos = parse_position("8/1P6/8/8/7k/8/5K2/8 w - - 0 1").unwrap();
        let info = pos.is_move_legal(Square::B7, Square::B8).unwrap();
        assert_eq!(info.status(), MoveStatus::Promotion);
        assert_eq!(
            info.promotions(),
            vec![PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight]
        );
        let mv = info.build(Some(PieceKind::Rook)).unwrap();
        assert_eq!(pos.notation(&mv), "b8=R");
        assert_eq!(mv.to_string(), "b7b8r");
        assert_eq!(mv.from(), Some(Square::B7));
        assert!(mv.is_promotion() && !mv.is_castling() && !mv.is_en_passant());
        assert_eq!(
            mv.colored_promotion(),
            Some(Piece::new(PieceColor::White, PieceKind::Rook))
        );
        assert!(info.build(None).is_none());
    }

    #[test]
    fn test_antichess_allows_king_promotion() {
        let pos = parse_position("antichess:8/1P6/8/8/7k/8/8/8 w - - 0 1").unwrap();
        let info = pos.is_move_legal(Square::B7, Square::B8).unwrap();
        assert_eq!(info.promotions().len(), 5);
        assert_eq!(info.promotions().last(), Some(&PieceKind::King));
    }

    #[test]
    fn test_castling_both_forms() {
        let pos = parse_position("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let by_destination = pos.is_move_legal(Square::E1, Square::G1).unwrap();
        let by_rook = pos.is_move_legal(Square::E1, Square::H1).unwrap();
        let mv = by_destination.build(None).unwrap();
        assert_eq!(mv, by_rook.build(None).unwrap());
        assert!(mv.is_castling());
        assert_eq!(mv.to(), Some(Square::G1));
        assert_eq!(mv.rook_from(), Some(Square::H1));
        assert_eq!(mv.rook_to(), Some(Square::F1));
        assert_eq!(pos.notation(&mv), "O-O");
    }

    #[test]
    fn test_en_passant_descriptor() {
        let pos = parse_position("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let mv = pos.parse_move("exd6").unwrap();
        assert!(mv.is_en_passant());
        assert_eq!(mv.en_passant_square(), Some(Square::D5));
        let after = pos.play(&mv).unwrap();
        assert!(after.piece_at(Square::D5).is_none());
    }

    #[test]
    fn test_parse_move_errors() {
        let pos = parse_position("start").unwrap();
        assert_eq!(
            pos.parse_move("Ke2").unwrap_err().kind,
            UserDataErrorKind::InvalidNotation
        );
        assert_eq!(
            pos.parse_move("hello").unwrap_err().kind,
            UserDataErrorKind::InvalidNotation
        );
    }

    #[test]
    fn test_null_move() {
        let pos = parse_position("start").unwrap();
        let mv = pos.parse_move("--").unwrap();
        assert!(mv.is_null());
        assert_eq!(pos.notation(&mv), "--");
        let after = pos.play(&mv).unwrap();
        assert_eq!(after.turn(), PieceColor::Black);
    }

    #[test]
    fn test_check_suffix() {
        let pos = parse_position("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let mv = pos.parse_move("Ra8").unwrap();
        assert_eq!(pos.notation(&mv), "Ra8+");
    }

    #[test]
    fn test_fen_output() {
        let start = parse_position("start").unwrap();
        assert_eq!(
            start.fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
        let fen = "8/1P6/8/8/7k/8/5K2/8 w - - 0 1";
        assert_eq!(parse_position(fen).unwrap().fen(), fen);

        let atomic = parse_position("atomic:start").unwrap();
        let again = parse_position(&atomic.to_text()).unwrap();
        assert_eq!(again.variant(), GameVariant::Atomic);
        assert_eq!(again.fen(), atomic.fen());
    }

    #[test]
    fn test_ply_from_move_counter() {
        assert_eq!(parse_position("start").unwrap().ply(), 0);
        let position = parse_position("8/8/8/8/8/8/8/K1k5 b - - 0 12").unwrap();
        assert_eq!(position.ply(), 23);
    }

    #[test]
    fn test_can_move_from() {
        let pos = parse_position("start").unwrap();
        assert!(pos.can_move_from(Square::G1));
        assert!(!pos.can_move_from(Square::G8));
        assert!(!pos.can_move_from(Square::E4));
    }
}
