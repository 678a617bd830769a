use log::trace;

use crate::board::{Board, Color, PieceKind};
use crate::geometry::{Direction, Location};

/// How a pseudo-legal move is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    KnightMove,
    RookMove,
    BishopMove,
    QueenMove,
    KingMove,
    KingsideCastling,
    QueensideCastling,
    PawnMove,
    PawnFirstMove,
    PawnCapture,
    EnPassant,
}

impl MoveKind {
    pub fn is_castling(&self) -> bool {
        matches!(self, MoveKind::KingsideCastling | MoveKind::QueensideCastling)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Location,
    pub to: Location,
    pub kind: MoveKind,
}

/// Offsets from the king to the castling rook.
const KINGSIDE_ROOK_OFFSET: i8 = 3;
const QUEENSIDE_ROOK_OFFSET: i8 = -4;

/// Classifies moving the piece on `from` to `to`, ignoring whether the move
/// leaves its own king in check. `None` means the move is illegal.
pub fn classify(board: &Board, from: Location, to: Location) -> Option<MoveKind> {
    let piece = board.piece_at(from)?;
    if !to.is_valid() || to == from {
        return None;
    }
    let other = board.piece_at(to);
    if other.map_or(false, |o| o.same_color(piece)) {
        return None;
    }

    let row_diff = (to.row - from.row).abs();
    let col_diff = (to.col - from.col).abs();

    match piece.kind {
        PieceKind::King => {
            if row_diff == 0 && col_diff == 2 {
                classify_castling(board, from, to)
            } else if from.is_adjacent(to) {
                Some(MoveKind::KingMove)
            } else {
                None
            }
        }
        PieceKind::Pawn => {
            let forward = (to.row - from.row).signum() == piece.color.forward();
            if !forward || row_diff > 2 || col_diff > 1 || (row_diff == 2 && col_diff > 0) {
                return None;
            }
            if row_diff == 2 {
                // Double step from the home row over an empty square
                let between = from.closer_to(to);
                let clear = board.is_empty(between) && other.is_none();
                (!piece.has_moved && clear && from.row == piece.color.pawn_row()).then_some(MoveKind::PawnFirstMove)
            } else if col_diff == 1 && other.is_some() {
                Some(MoveKind::PawnCapture)
            } else if col_diff == 1 {
                // En passant: the enemy pawn beside us must be the last piece moved
                let beside = Location::new(from.row, to.col);
                let victim = board.piece_at(beside)?;
                (victim.kind == PieceKind::Pawn && victim.has_just_moved && !victim.same_color(piece))
                    .then_some(MoveKind::EnPassant)
            } else {
                other.is_none().then_some(MoveKind::PawnMove)
            }
        }
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            if !attacks(board, from, to) {
                return None;
            }
            Some(match piece.kind {
                PieceKind::Knight => MoveKind::KnightMove,
                PieceKind::Bishop => MoveKind::BishopMove,
                PieceKind::Rook => MoveKind::RookMove,
                _ => MoveKind::QueenMove,
            })
        }
    }
}

fn classify_castling(board: &Board, from: Location, to: Location) -> Option<MoveKind> {
    let king = board.piece_at(from)?;
    if king.has_moved {
        return None;
    }
    let (direction, rook_loc, kind) = if to.col < from.col {
        (
            Direction::West,
            Location::new(from.row, from.col + QUEENSIDE_ROOK_OFFSET),
            MoveKind::QueensideCastling,
        )
    } else {
        (
            Direction::East,
            Location::new(from.row, from.col + KINGSIDE_ROOK_OFFSET),
            MoveKind::KingsideCastling,
        )
    };

    let rook = board.piece_at(rook_loc)?;
    if rook.kind != PieceKind::Rook || !rook.same_color(king) || rook.has_moved {
        return None;
    }

    // Every square from the king up to the rook must be empty and unattacked
    let mut next = from;
    while next.col != rook_loc.col {
        if (next != from && !board.is_empty(next)) || enemy_attacks(board, king.color, next) {
            return None;
        }
        next = next.farther(direction);
    }
    Some(kind)
}

/// Whether the piece on `from` threatens `target`, whether or not it could
/// legally move there.
pub fn attacks(board: &Board, from: Location, target: Location) -> bool {
    let Some(piece) = board.piece_at(from) else {
        return false;
    };
    if !target.is_valid() || target == from {
        return false;
    }
    let row_diff = (target.row - from.row).abs();
    let col_diff = (target.col - from.col).abs();

    match piece.kind {
        PieceKind::Pawn => {
            row_diff == 1 && col_diff == 1 && (target.row - from.row).signum() == piece.color.forward()
        }
        PieceKind::King => from.is_adjacent(target),
        PieceKind::Knight => row_diff > 0 && col_diff > 0 && row_diff + col_diff == 3,
        PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen => {
            let straight = row_diff == 0 || col_diff == 0;
            let diagonal = row_diff == col_diff;
            let shape = match piece.kind {
                PieceKind::Rook => straight,
                PieceKind::Bishop => diagonal,
                _ => straight || diagonal,
            };
            shape && path_is_clear(board, from, target)
        }
    }
}

/// Squares strictly between `from` and `to` are all empty.
fn path_is_clear(board: &Board, from: Location, to: Location) -> bool {
    let mut next = from.closer_to(to);
    while next != to {
        if !board.is_empty(next) {
            return false;
        }
        next = next.closer_to(to);
    }
    true
}

/// Whether any piece of the side opposing `color` threatens `square`.
pub fn enemy_attacks(board: &Board, color: Color, square: Location) -> bool {
    if !square.is_valid() {
        return false;
    }
    board
        .pieces_of(color.opposite())
        .any(|(loc, _)| attacks(board, loc, square))
}

/// Squares the piece on `from` may legally move to, in row-major order.
pub fn legal_destinations(board: &Board, from: Location) -> Vec<Location> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };
    let color = piece.color;

    // Nothing but a slider can reach further than two squares
    let candidates = if piece.kind.is_slider() {
        Location::all().collect()
    } else {
        board.locations_within(from, 2)
    };

    candidates
        .into_iter()
        .filter_map(|to| classify(board, from, to).map(|kind| (to, kind)))
        .filter(|&(to, kind)| !leaves_king_in_check(board, from, to, kind, color))
        .map(|(to, _)| to)
        .collect()
}

/// Plays the move on a scratch copy and reports whether `color`'s king is
/// then attacked.
pub(crate) fn leaves_king_in_check(board: &Board, from: Location, to: Location, kind: MoveKind, color: Color) -> bool {
    let mut scratch = board.scratch_copy();
    scratch.relocate(from, to, kind, None);
    let exposed = match scratch.king_location(color) {
        Some(king) => enemy_attacks(&scratch, color, king),
        None => false,
    };
    if exposed {
        trace!("{} -> {} rejected: leaves {} king attacked", from, to, color);
    }
    exposed
}

/// Every legal move for `color`, grouped by origin square in row-major order.
pub fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let origins: Vec<Location> = board.pieces_of(color).map(|(loc, _)| loc).collect();
    let mut moves = Vec::new();
    for from in origins {
        for to in legal_destinations(board, from) {
            if let Some(kind) = classify(board, from, to) {
                moves.push(Move { from, to, kind });
            }
        }
    }
    moves
}

/// Whether `color` has at least one legal move.
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    board
        .pieces_of(color)
        .any(|(loc, _)| !legal_destinations(board, loc).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn loc(name: &str) -> Location {
        Location::from_algebraic(name).unwrap()
    }

    fn board_with(ply: u32, pieces: &[(&str, PieceKind, Color, bool)]) -> Board {
        Board::from_pieces(
            ply,
            pieces.iter().map(|&(name, kind, color, moved)| {
                let piece = Piece::new(kind, color, loc(name));
                (loc(name), if moved { piece.moved() } else { piece })
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_position_moves() {
        let board = Board::new();
        assert_eq!(legal_moves(&board, Color::White).len(), 20);
        assert_eq!(legal_moves(&board, Color::Black).len(), 20);

        assert_eq!(classify(&board, loc("e2"), loc("e4")), Some(MoveKind::PawnFirstMove));
        assert_eq!(classify(&board, loc("e2"), loc("e3")), Some(MoveKind::PawnMove));
        assert_eq!(classify(&board, loc("g1"), loc("f3")), Some(MoveKind::KnightMove));
        assert_eq!(classify(&board, loc("e2"), loc("e5")), None);
        assert_eq!(classify(&board, loc("f1"), loc("c4")), None);
        assert_eq!(classify(&board, loc("e4"), loc("e5")), None);
    }

    #[test]
    fn test_never_captures_own_piece() {
        let board = Board::new();
        for (from, _) in board.pieces() {
            for (to, _) in board.pieces_of(board.piece_at(from).unwrap().color) {
                assert_eq!(classify(&board, from, to), None, "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_pawn_rules() {
        let board = board_with(
            0,
            &[
                ("e4", PieceKind::Pawn, Color::White, true),
                ("d5", PieceKind::Pawn, Color::Black, true),
                ("e5", PieceKind::Knight, Color::Black, false),
                ("a2", PieceKind::Pawn, Color::White, false),
                ("a3", PieceKind::Knight, Color::Black, false),
                ("h3", PieceKind::Pawn, Color::White, false),
            ],
        );
        assert_eq!(classify(&board, loc("e4"), loc("d5")), Some(MoveKind::PawnCapture));
        assert_eq!(classify(&board, loc("e4"), loc("e5")), None);
        assert_eq!(classify(&board, loc("e4"), loc("e3")), None);
        assert_eq!(classify(&board, loc("e4"), loc("f5")), None);
        // Blocked double step
        assert_eq!(classify(&board, loc("a2"), loc("a4")), None);
        // Unmoved pawn off its home row
        assert_eq!(classify(&board, loc("h3"), loc("h5")), None);
        assert_eq!(classify(&board, loc("h3"), loc("h4")), Some(MoveKind::PawnMove));
        assert_eq!(classify(&board, loc("d5"), loc("e4")), Some(MoveKind::PawnCapture));
    }

    #[test]
    fn test_en_passant_needs_just_moved_pawn() {
        let white = Piece::new(PieceKind::Pawn, Color::White, loc("e5")).moved();
        let black = Piece::new(PieceKind::Pawn, Color::Black, loc("d5"));
        let fresh = Board::from_pieces(0, [(loc("e5"), white), (loc("d5"), black.just_moved())]).unwrap();
        assert_eq!(classify(&fresh, loc("e5"), loc("d6")), Some(MoveKind::EnPassant));
        assert_eq!(classify(&fresh, loc("e5"), loc("f6")), None);

        let stale = Board::from_pieces(0, [(loc("e5"), white), (loc("d5"), black.moved())]).unwrap();
        assert_eq!(classify(&stale, loc("e5"), loc("d6")), None);
    }

    #[test]
    fn test_sliders_need_clear_path() {
        let board = board_with(
            0,
            &[
                ("a1", PieceKind::Rook, Color::White, false),
                ("a4", PieceKind::Pawn, Color::Black, true),
                ("c1", PieceKind::Bishop, Color::White, false),
                ("d1", PieceKind::Queen, Color::White, false),
                ("f3", PieceKind::Pawn, Color::White, true),
            ],
        );
        assert_eq!(classify(&board, loc("a1"), loc("a4")), Some(MoveKind::RookMove));
        assert_eq!(classify(&board, loc("a1"), loc("a5")), None);
        assert_eq!(classify(&board, loc("a1"), loc("b2")), None);
        assert_eq!(classify(&board, loc("c1"), loc("h6")), Some(MoveKind::BishopMove));
        assert_eq!(classify(&board, loc("c1"), loc("c5")), None);
        assert_eq!(classify(&board, loc("d1"), loc("h5")), None);
        assert_eq!(classify(&board, loc("d1"), loc("d8")), Some(MoveKind::QueenMove));
        assert_eq!(classify(&board, loc("d1"), loc("b1")), None);
    }

    #[test]
    fn test_attacks_differs_from_classify_for_pawns() {
        let board = board_with(0, &[("e4", PieceKind::Pawn, Color::White, true)]);
        assert!(attacks(&board, loc("e4"), loc("d5")));
        assert!(attacks(&board, loc("e4"), loc("f5")));
        assert!(!attacks(&board, loc("e4"), loc("e5")));
        assert!(!attacks(&board, loc("e4"), loc("d3")));
        assert_eq!(classify(&board, loc("e4"), loc("d5")), None);
    }

    #[test]
    fn test_castling_conditions() {
        let pieces = [
            ("e1", PieceKind::King, Color::White, false),
            ("h1", PieceKind::Rook, Color::White, false),
            ("a1", PieceKind::Rook, Color::White, false),
            ("e8", PieceKind::King, Color::Black, false),
        ];
        let board = board_with(0, &pieces);
        assert_eq!(classify(&board, loc("e1"), loc("g1")), Some(MoveKind::KingsideCastling));
        assert_eq!(classify(&board, loc("e1"), loc("c1")), Some(MoveKind::QueensideCastling));
        let dests = legal_destinations(&board, loc("e1"));
        assert!(dests.contains(&loc("g1")) && dests.contains(&loc("c1")));

        // Moved rook
        let mut moved = pieces;
        moved[1].3 = true;
        assert_eq!(classify(&board_with(0, &moved), loc("e1"), loc("g1")), None);

        // Moved king
        let mut moved = pieces;
        moved[0].3 = true;
        assert_eq!(classify(&board_with(0, &moved), loc("e1"), loc("c1")), None);

        // Occupied corridor
        let mut blocked = pieces.to_vec();
        blocked.push(("b1", PieceKind::Knight, Color::White, false));
        assert_eq!(classify(&board_with(0, &blocked), loc("e1"), loc("c1")), None);
        assert_eq!(classify(&board_with(0, &blocked), loc("e1"), loc("g1")), Some(MoveKind::KingsideCastling));

        // Attacked transit square
        let mut attacked = pieces.to_vec();
        attacked.push(("f8", PieceKind::Rook, Color::Black, false));
        assert_eq!(classify(&board_with(0, &attacked), loc("e1"), loc("g1")), None);

        // King in check
        let mut checked = pieces.to_vec();
        checked.push(("e5", PieceKind::Rook, Color::Black, false));
        assert_eq!(classify(&board_with(0, &checked), loc("e1"), loc("c1")), None);

        // An attacked b-file square also stops queenside castling
        let mut b_file = pieces.to_vec();
        b_file.push(("b8", PieceKind::Rook, Color::Black, false));
        assert_eq!(classify(&board_with(0, &b_file), loc("e1"), loc("c1")), None);

        // Attacked landing squares
        let mut landing = pieces.to_vec();
        landing.push(("g8", PieceKind::Rook, Color::Black, false));
        let board = board_with(0, &landing);
        assert_eq!(classify(&board, loc("e1"), loc("g1")), None);
        assert_eq!(classify(&board, loc("e1"), loc("c1")), Some(MoveKind::QueensideCastling));

        let mut landing = pieces.to_vec();
        landing.push(("c8", PieceKind::Rook, Color::Black, false));
        let board = board_with(0, &landing);
        assert_eq!(classify(&board, loc("e1"), loc("c1")), None);
        assert_eq!(classify(&board, loc("e1"), loc("g1")), Some(MoveKind::KingsideCastling));
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        let board = board_with(
            0,
            &[
                ("e1", PieceKind::King, Color::White, true),
                ("e2", PieceKind::Bishop, Color::White, true),
                ("e8", PieceKind::Rook, Color::Black, true),
            ],
        );
        assert!(classify(&board, loc("e2"), loc("d3")).is_some());
        assert!(legal_destinations(&board, loc("e2")).is_empty());
        assert!(!legal_destinations(&board, loc("e1")).contains(&loc("e2")));
    }

    #[test]
    fn test_king_cannot_step_into_attack() {
        let board = board_with(
            0,
            &[
                ("e1", PieceKind::King, Color::White, true),
                ("d8", PieceKind::Rook, Color::Black, true),
            ],
        );
        let dests = legal_destinations(&board, loc("e1"));
        assert!(!dests.contains(&loc("d1")) && !dests.contains(&loc("d2")));
        assert_eq!(dests, vec![loc("e2"), loc("f2"), loc("f1")]);
    }

    #[test]
    fn test_missing_king_is_tolerated() {
        let board = board_with(0, &[("d4", PieceKind::Queen, Color::White, true)]);
        assert_eq!(legal_destinations(&board, loc("d4")).len(), 27);
        assert!(legal_destinations(&board, loc("a1")).is_empty());
    }
}
