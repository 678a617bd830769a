use log::debug;

use crate::board::{Board, Color};
use crate::movegen::{enemy_attacks, has_legal_move, legal_destinations};

/// Plies without a capture or pawn move before the fifty-move rule applies.
pub const FIFTY_MOVE_PLIES: u32 = 100;

/// Occurrences of one placement that make a threefold repetition.
pub const REPETITION_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawKind {
    /// Only two pieces are left. Other drawn material balances are not
    /// recognised.
    TwoKings,
    Stalemate,
    FiftyMove,
    ThreefoldRepetition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Ongoing,
    Check(Color),
    /// Color is the side that has been mated.
    Checkmate(Color),
    Draw(DrawKind),
}

/// Whether `color`'s king is attacked. A side without a king is never in
/// check.
pub fn in_check(board: &Board, color: Color) -> bool {
    match board.king_location(color) {
        Some(king) => enemy_attacks(board, color, king),
        None => false,
    }
}

/// The side currently in check, White first if somehow both are.
pub fn checked_color(board: &Board) -> Option<Color> {
    [Color::White, Color::Black].into_iter().find(|&c| in_check(board, c))
}

pub fn checkmate(board: &Board, color: Color) -> bool {
    let Some(king) = board.king_location(color) else {
        return false;
    };
    if !legal_destinations(board, king).is_empty() || !in_check(board, color) {
        return false;
    }
    let mated = board
        .pieces_of(color)
        .filter(|&(loc, _)| loc != king)
        .all(|(loc, _)| legal_destinations(board, loc).is_empty());
    if mated {
        debug!("{} is checkmated at ply {}", color, board.ply());
    }
    mated
}

pub fn checkmated_color(board: &Board) -> Option<Color> {
    [Color::White, Color::Black].into_iter().find(|&c| checkmate(board, c))
}

/// Whether the side to move is stalemated.
pub fn stalemate(board: &Board) -> bool {
    let color = board.color_to_move();
    !in_check(board, color) && !has_legal_move(board, color)
}

/// How many times the current placement has been reached, counting the
/// current position itself.
pub fn repetitions(board: &Board) -> usize {
    let history = board.history();
    match history.last() {
        Some(current) => history.iter().filter(|s| s.same_position(current)).count(),
        None => 0,
    }
}

/// The draw that applies to the position, if any. Rules are checked in a
/// fixed order and the first match wins.
pub fn draw(board: &Board) -> Option<DrawKind> {
    let kind = if board.piece_count() < 3 {
        Some(DrawKind::TwoKings)
    } else if stalemate(board) {
        Some(DrawKind::Stalemate)
    } else if board.half_move_clock() >= FIFTY_MOVE_PLIES {
        Some(DrawKind::FiftyMove)
    } else if repetitions(board) >= REPETITION_COUNT {
        Some(DrawKind::ThreefoldRepetition)
    } else {
        None
    };
    if let Some(kind) = kind {
        debug!("draw by {:?} at ply {}", kind, board.ply());
    }
    kind
}

pub fn game_over(board: &Board) -> bool {
    checkmated_color(board).is_some() || draw(board).is_some()
}

pub fn game_state(board: &Board) -> GameState {
    if let Some(mated) = checkmated_color(board) {
        return GameState::Checkmate(mated);
    }
    if let Some(kind) = draw(board) {
        return GameState::Draw(kind);
    }
    match checked_color(board) {
        Some(color) => GameState::Check(color),
        None => GameState::Ongoing,
    }
}
