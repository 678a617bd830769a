use std::fmt;

use crate::error::SnapshotError;
use crate::geometry::{Location, BOARD_SIZE};
use crate::snapshot::{Snapshot, Token};

const SQUARES: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// White moves on even plies, Black on odd ones.
    pub fn move_order(&self) -> u32 {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    pub fn from_ply(ply: u32) -> Color {
        if ply % 2 == Color::White.move_order() {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }

    pub fn from_letter(letter: char) -> Option<Color> {
        match letter {
            'W' => Some(Color::White),
            'B' => Some(Color::Black),
            _ => None,
        }
    }

    /// Row delta of a forward pawn step.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn back_row(&self) -> i8 {
        match self {
            Color::White => BOARD_SIZE - 1,
            Color::Black => 0,
        }
    }

    pub fn pawn_row(&self) -> i8 {
        self.back_row() + self.forward()
    }

    /// The row a pawn of this color promotes on.
    pub fn promotion_row(&self) -> i8 {
        self.opposite().back_row()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Kinds a pawn may become, in the order a chooser is offered them.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    pub fn symbol(&self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<PieceKind> {
        match symbol {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Relative worth, only ever used to order pieces.
    pub fn value(&self) -> u32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 3,
            PieceKind::Bishop => 4,
            PieceKind::Rook => 5,
            PieceKind::Queen => 10,
            PieceKind::King => 1000,
        }
    }

    pub fn is_slider(&self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }
}

/// A piece standing on the board.
///
/// `origin` is the square the piece started its current life on: the
/// starting square in a new game, or wherever it stood when a snapshot was
/// decoded. It does not follow the piece around, so pieces are tracked by
/// the square they occupy rather than by `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub origin: Location,
    pub has_moved: bool,
    /// Set only on the piece that made the last move.
    pub has_just_moved: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, origin: Location) -> Self {
        Self {
            kind,
            color,
            origin,
            has_moved: false,
            has_just_moved: false,
        }
    }

    pub fn moved(mut self) -> Self {
        self.has_moved = true;
        self
    }

    pub fn just_moved(mut self) -> Self {
        self.has_moved = true;
        self.has_just_moved = true;
        self
    }

    /// Loose identity: same kind, color and origin.
    pub fn same_identity(&self, other: &Piece) -> bool {
        self.kind == other.kind && self.color == other.color && self.origin == other.origin
    }

    pub fn same_color(&self, other: &Piece) -> bool {
        self.color == other.color
    }

    pub fn is_king(&self) -> bool {
        self.kind == PieceKind::King
    }
}

/// The position: an 8x8 grid plus the counters and the history of reached
/// positions used for undo and repetition.
#[derive(Debug, Clone)]
pub struct Board {
    squares: [Option<Piece>; SQUARES],
    pub(crate) ply: u32,
    pub(crate) half_move_clock: u32,
    pub(crate) history: Vec<Snapshot>,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// The standard starting arrangement, White to move.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            for (col, kind) in BACK_RANK.iter().enumerate() {
                let back = Location::new(color.back_row(), col as i8);
                let pawn = Location::new(color.pawn_row(), col as i8);
                board.put(back, Piece::new(*kind, color, back));
                board.put(pawn, Piece::new(PieceKind::Pawn, color, pawn));
            }
        }
        let snapshot = board.to_snapshot();
        board.history.push(snapshot);
        board
    }

    fn empty() -> Self {
        Self {
            squares: [None; SQUARES],
            ply: 0,
            half_move_clock: 0,
            history: Vec::new(),
        }
    }

    /// Builds an arbitrary position. Flags are taken from each piece; origins
    /// are reset to the square the piece is placed on.
    pub fn from_pieces<I>(ply: u32, pieces: I) -> Result<Self, SnapshotError>
    where
        I: IntoIterator<Item = (Location, Piece)>,
    {
        let placement = pieces
            .into_iter()
            .map(|(location, piece)| Token::from_piece(location, &piece))
            .collect();
        Self::from_snapshot(&Snapshot::new(ply, 0, placement))
    }

    /// Restores a position from a structured snapshot. The snapshot becomes
    /// the only entry of the new history.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        let mut board = Self::empty();
        for token in &snapshot.placement {
            let loc = token.location;
            if !loc.is_valid() {
                return Err(SnapshotError::OffBoard {
                    row: loc.row,
                    col: loc.col,
                });
            }
            if board.piece_at(loc).is_some() {
                return Err(SnapshotError::DuplicateSquare {
                    row: loc.row,
                    col: loc.col,
                });
            }
            board.put(loc, token.to_piece());
        }
        board.ply = snapshot.ply;
        board.half_move_clock = snapshot.half_move_clock;
        let snapshot = board.to_snapshot();
        board.history.push(snapshot);
        Ok(board)
    }

    /// Parses snapshot text, see [`Snapshot::decode`].
    pub fn decode(text: &str) -> Result<Self, SnapshotError> {
        Self::from_snapshot(&Snapshot::decode(text)?)
    }

    /// Snapshot text of the current position, see [`Snapshot::encode`].
    pub fn encode(&self) -> Result<String, SnapshotError> {
        self.to_snapshot().encode()
    }

    pub fn to_snapshot(&self) -> Snapshot {
        let placement = self
            .pieces()
            .map(|(location, piece)| Token::from_piece(location, piece))
            .collect();
        Snapshot::new(self.ply, self.half_move_clock, placement)
    }

    /// Replaces the grid and counters with those recorded in `snapshot`,
    /// leaving history untouched.
    pub(crate) fn restore(&mut self, snapshot: &Snapshot) {
        self.squares = [None; SQUARES];
        for token in &snapshot.placement {
            if token.location.is_valid() {
                self.put(token.location, token.to_piece());
            }
        }
        self.ply = snapshot.ply;
        self.half_move_clock = snapshot.half_move_clock;
    }

    /// A copy for speculative moves: same grid and counters, no history.
    pub(crate) fn scratch_copy(&self) -> Board {
        Board {
            squares: self.squares,
            ply: self.ply,
            half_move_clock: self.half_move_clock,
            history: Vec::new(),
        }
    }

    pub fn piece_at(&self, loc: Location) -> Option<&Piece> {
        if !loc.is_valid() {
            return None;
        }
        self.squares[loc.index()].as_ref()
    }

    pub fn is_empty(&self, loc: Location) -> bool {
        self.piece_at(loc).is_none()
    }

    pub(crate) fn put(&mut self, loc: Location, piece: Piece) {
        self.squares[loc.index()] = Some(piece);
    }

    pub(crate) fn take(&mut self, loc: Location) -> Option<Piece> {
        if !loc.is_valid() {
            return None;
        }
        self.squares[loc.index()].take()
    }

    pub(crate) fn pieces_mut(&mut self) -> impl Iterator<Item = &mut Piece> {
        self.squares.iter_mut().flatten()
    }

    /// Every occupied square in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Location, &Piece)> + '_ {
        Location::all().zip(self.squares.iter()).filter_map(|(loc, slot)| slot.as_ref().map(|p| (loc, p)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Location, &Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().flatten().count()
    }

    pub fn king_location(&self, color: Color) -> Option<Location> {
        self.pieces_of(color).find(|(_, p)| p.is_king()).map(|(loc, _)| loc)
    }

    /// On-board squares within `n` rows and columns of `loc`, including `loc`.
    pub fn locations_within(&self, loc: Location, n: i8) -> Vec<Location> {
        if !loc.is_valid() || n <= 0 {
            return Vec::new();
        }
        let n = n.min(BOARD_SIZE);
        let mut locs = Vec::new();
        for row in loc.row - n..=loc.row + n {
            for col in loc.col - n..=loc.col + n {
                let candidate = Location::new(row, col);
                if candidate.is_valid() {
                    locs.push(candidate);
                }
            }
        }
        locs
    }

    pub fn ply(&self) -> u32 {
        self.ply
    }

    pub fn half_move_clock(&self) -> u32 {
        self.half_move_clock
    }

    pub fn color_to_move(&self) -> Color {
        Color::from_ply(self.ply)
    }

    /// Full-move number as written in notation: 1 for the first pair.
    pub fn move_number(&self) -> u32 {
        self.ply / 2 + 1
    }

    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.len() > 1
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = String::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                match self.piece_at(Location::new(row, col)) {
                    Some(piece) if piece.color == Color::White => result.push(piece.kind.symbol()),
                    Some(piece) => result.push(piece.kind.symbol().to_ascii_lowercase()),
                    None => result.push('.'),
                }
                if col < BOARD_SIZE - 1 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        write!(f, "{}", result)
    }
}
