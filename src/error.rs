use thiserror::Error;

use crate::geometry::Location;

/// Failures reading or writing snapshot text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot text is empty")]
    Empty,

    #[error("snapshot text is {len} characters, shorter than its counters")]
    TooShort { len: usize },

    #[error("{field} counter is not a two-digit number: {text:?}")]
    BadCounter { field: &'static str, text: String },

    #[error("{field} counter {value} does not fit in two digits")]
    CounterOverflow { field: &'static str, value: u32 },

    #[error("unknown color letter {0:?}")]
    UnknownColor(char),

    #[error("unknown piece letter {0:?}")]
    UnknownKind(char),

    #[error("flag must be 't' or 'f', found {0:?}")]
    BadFlag(char),

    #[error("coordinate must be a single digit, found {0:?}")]
    BadCoordinate(char),

    #[error("piece token starting at offset {offset} is cut short")]
    TruncatedToken { offset: usize },

    #[error("square ({row}, {col}) is off the board")]
    OffBoard { row: i8, col: i8 },

    #[error("square ({row}, {col}) holds more than one piece")]
    DuplicateSquare { row: i8, col: i8 },
}

/// Requests a game session refuses. Illegal moves are not errors; they come
/// back as [`crate::executor::MoveOutcome::Illegal`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("the game is already over")]
    GameOver,

    #[error("no piece stands on {0}")]
    EmptySquare(Location),

    #[error("the piece on {0} belongs to the side not on move")]
    NotYourTurn(Location),

    #[error("no piece is selected")]
    NoPieceSelected,

    #[error("there is no move to undo")]
    NothingToUndo,

    #[error("not available before ply {required} (now at ply {ply})")]
    OptionUnavailable { ply: u32, required: u32 },

    #[error("no draw has been offered")]
    NoDrawOffer,

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
