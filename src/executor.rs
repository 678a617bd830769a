use log::{debug, warn};

use crate::board::{Board, Color, Piece, PieceKind};
use crate::geometry::Location;
use crate::movegen::{classify, leaves_king_in_check, MoveKind};
use crate::status::{checkmate, draw, in_check, DrawKind};

/// Decides what a pawn becomes when it reaches the last row.
pub trait PromotionChooser {
    /// `options` lists the kinds on offer. Answers outside it fall back to
    /// a queen.
    fn choose(&mut self, at: Location, options: &[PieceKind]) -> PieceKind;
}

impl<F> PromotionChooser for F
where
    F: FnMut(Location, &[PieceKind]) -> PieceKind,
{
    fn choose(&mut self, at: Location, options: &[PieceKind]) -> PieceKind {
        self(at, options)
    }
}

/// Always promotes to the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromoteTo(pub PieceKind);

impl Default for PromoteTo {
    fn default() -> Self {
        PromoteTo(PieceKind::Queen)
    }
}

impl PromotionChooser for PromoteTo {
    fn choose(&mut self, _at: Location, _options: &[PieceKind]) -> PieceKind {
        self.0
    }
}

/// Why a move was refused. The board is left untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    EmptySquare,
    WrongTurn,
    /// Wrong shape, blocked, or onto a friendly piece.
    NotPseudoLegal,
    LeavesKingInCheck,
}

/// Everything a notation recorder needs to describe an applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub color: Color,
    /// The mover's kind before any promotion.
    pub piece: PieceKind,
    pub from: Location,
    pub to: Location,
    pub kind: MoveKind,
    /// Full-move number the move was played in.
    pub move_number: u32,
    pub captured: Option<Piece>,
    pub promotion: Option<PieceKind>,
    /// The opponent is in check after the move.
    pub check_after: bool,
    /// The side that is checkmated after the move, if any.
    pub checkmate_after: Option<Color>,
    /// Always `None` when the move mates.
    pub draw_after: Option<DrawKind>,
}

impl AppliedMove {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied(AppliedMove),
    Illegal(IllegalMove),
}

impl MoveOutcome {
    pub fn applied(&self) -> Option<&AppliedMove> {
        match self {
            MoveOutcome::Applied(applied) => Some(applied),
            MoveOutcome::Illegal(_) => None,
        }
    }

    pub fn is_legal(&self) -> bool {
        matches!(self, MoveOutcome::Applied(_))
    }
}

impl Board {
    /// Plays `from` -> `to` for the side to move. Promotions ask `chooser`,
    /// or become queens without one. Illegal requests change nothing.
    pub fn apply_move(
        &mut self,
        from: Location,
        to: Location,
        chooser: Option<&mut dyn PromotionChooser>,
    ) -> MoveOutcome {
        let Some(&piece) = self.piece_at(from) else {
            return reject(from, to, IllegalMove::EmptySquare);
        };
        if piece.color != self.color_to_move() {
            return reject(from, to, IllegalMove::WrongTurn);
        }
        let Some(kind) = classify(self, from, to) else {
            return reject(from, to, IllegalMove::NotPseudoLegal);
        };
        if leaves_king_in_check(self, from, to, kind, piece.color) {
            return reject(from, to, IllegalMove::LeavesKingInCheck);
        }

        let move_number = self.move_number();
        let breaks_fifty_move = !self.is_empty(to) || piece.kind == PieceKind::Pawn;

        let promotion = if piece.kind == PieceKind::Pawn && to.row == piece.color.promotion_row() {
            Some(choose_promotion(chooser, to))
        } else {
            None
        };

        let captured = self.relocate(from, to, kind, promotion);

        self.ply += 1;
        if breaks_fifty_move {
            self.half_move_clock = 0;
        } else {
            self.half_move_clock += 1;
        }
        let snapshot = self.to_snapshot();
        self.history.push(snapshot);

        let opponent = piece.color.opposite();
        let checkmate_after = checkmate(self, opponent).then_some(opponent);
        let draw_after = if checkmate_after.is_some() { None } else { draw(self) };
        let applied = AppliedMove {
            color: piece.color,
            piece: piece.kind,
            from,
            to,
            kind,
            move_number,
            captured,
            promotion,
            check_after: in_check(self, opponent),
            checkmate_after,
            draw_after,
        };
        debug!(
            "ply {}: {} {:?} {} -> {} ({:?}){}",
            self.ply,
            piece.color,
            piece.kind,
            from,
            to,
            kind,
            if applied.is_capture() { " capture" } else { "" }
        );
        MoveOutcome::Applied(applied)
    }

    /// Moves the piece and performs the side effects of `kind`, without
    /// touching counters or history. Returns the captured piece.
    pub(crate) fn relocate(
        &mut self,
        from: Location,
        to: Location,
        kind: MoveKind,
        promotion: Option<PieceKind>,
    ) -> Option<Piece> {
        let mut piece = self.take(from)?;
        let mut captured = self.take(to);
        piece.has_moved = true;

        if let Some(new_kind) = promotion {
            piece.kind = new_kind;
        } else {
            match kind {
                MoveKind::EnPassant => {
                    captured = self.take(Location::new(from.row, to.col));
                }
                MoveKind::KingsideCastling => {
                    self.shift_rook(Location::new(to.row, to.col + 1), Location::new(to.row, to.col - 1));
                }
                MoveKind::QueensideCastling => {
                    self.shift_rook(Location::new(to.row, to.col - 2), Location::new(to.row, to.col + 1));
                }
                _ => {}
            }
        }

        for other in self.pieces_mut() {
            other.has_just_moved = false;
        }
        piece.has_just_moved = true;
        self.put(to, piece);
        captured
    }

    fn shift_rook(&mut self, from: Location, to: Location) {
        if let Some(mut rook) = self.take(from) {
            rook.has_moved = true;
            self.put(to, rook);
        }
    }

    /// Steps back to the previous position. Returns false, changing
    /// nothing, when only the starting snapshot is left.
    pub fn undo_move(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.history.pop();
        let Some(previous) = self.history.last().cloned() else {
            return false;
        };
        self.restore(&previous);
        debug!("undo to ply {}", self.ply);
        true
    }
}

fn reject(from: Location, to: Location, reason: IllegalMove) -> MoveOutcome {
    debug!("{} -> {} refused: {:?}", from, to, reason);
    MoveOutcome::Illegal(reason)
}

fn choose_promotion(chooser: Option<&mut dyn PromotionChooser>, at: Location) -> PieceKind {
    let Some(chooser) = chooser else {
        return PieceKind::Queen;
    };
    let choice = chooser.choose(at, &PieceKind::PROMOTIONS);
    if PieceKind::PROMOTIONS.contains(&choice) {
        choice
    } else {
        warn!("cannot promote to {:?} on {}, using a queen", choice, at);
        PieceKind::Queen
    }
}
