//! Rules engine for two-player chess.
//!
//! The engine keeps the board, decides which moves are legal, applies them
//! with their side effects and recognises check, checkmate and draws. It
//! performs no rendering, notation formatting, timing or user interaction;
//! callers drive it through [`Board`] or the [`Game`] session and read back
//! [`MoveOutcome`] records.

pub mod board;
pub mod error;
pub mod executor;
pub mod game;
pub mod geometry;
pub mod movegen;
pub mod snapshot;
pub mod status;

pub use board::{Board, Color, Piece, PieceKind};
pub use error::{GameError, SnapshotError};
pub use executor::{AppliedMove, IllegalMove, MoveOutcome, PromoteTo, PromotionChooser};
pub use game::{Game, GameOptions, GameResult};
pub use geometry::{Direction, Location};
pub use movegen::{attacks, classify, enemy_attacks, legal_destinations, legal_moves, Move, MoveKind};
pub use snapshot::{Snapshot, Token};
pub use status::{checkmate, draw, game_over, game_state, in_check, DrawKind, GameState};

/// A fresh game in the standard starting position.
pub fn new_game() -> Board {
    Board::new()
}
