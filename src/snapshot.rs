//! Position snapshots and their text form.
//!
//! The text is `PPCC` followed by one token per occupied square in
//! row-major order. `PP` is the ply and `CC` the half-move clock, each as
//! exactly two decimal digits. A token is
//!
//! ```text
//! <color W|B><kind P|N|B|R|Q|K><moved t|f>[<just-moved t|f>, pawns only]<row><col>
//! ```
//!
//! Counters above 99 and boards wider than 9 squares cannot be written;
//! encoding fails instead of widening the format.

use std::str::FromStr;

use crate::board::{Color, Piece, PieceKind};
use crate::error::SnapshotError;
use crate::geometry::Location;

const COUNTER_LIMIT: u32 = 99;

/// One occupied square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub location: Location,
    pub color: Color,
    pub kind: PieceKind,
    pub has_moved: bool,
    /// Only recorded for pawns; always false for other kinds.
    pub has_just_moved: bool,
}

impl Token {
    pub fn from_piece(location: Location, piece: &Piece) -> Self {
        Self {
            location,
            color: piece.color,
            kind: piece.kind,
            has_moved: piece.has_moved,
            has_just_moved: piece.kind == PieceKind::Pawn && piece.has_just_moved,
        }
    }

    /// A fresh piece whose origin is the token's square.
    pub fn to_piece(&self) -> Piece {
        Piece {
            kind: self.kind,
            color: self.color,
            origin: self.location,
            has_moved: self.has_moved,
            has_just_moved: self.has_just_moved,
        }
    }
}

/// A reached position: counters plus placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub ply: u32,
    pub half_move_clock: u32,
    pub placement: Vec<Token>,
}

impl Snapshot {
    pub fn new(ply: u32, half_move_clock: u32, placement: Vec<Token>) -> Self {
        Self {
            ply,
            half_move_clock,
            placement,
        }
    }

    /// Repetition equality: placement only, counters ignored.
    pub fn same_position(&self, other: &Snapshot) -> bool {
        self.placement == other.placement
    }

    pub fn encode(&self) -> Result<String, SnapshotError> {
        let mut text = String::with_capacity(4 + self.placement.len() * 7);
        push_counter(&mut text, "ply", self.ply)?;
        push_counter(&mut text, "half-move clock", self.half_move_clock)?;
        for token in &self.placement {
            let loc = token.location;
            if !loc.is_valid() {
                return Err(SnapshotError::OffBoard {
                    row: loc.row,
                    col: loc.col,
                });
            }
            text.push(token.color.letter());
            text.push(token.kind.symbol());
            text.push(flag_letter(token.has_moved));
            if token.kind == PieceKind::Pawn {
                text.push(flag_letter(token.has_just_moved));
            }
            text.push(digit(loc.row));
            text.push(digit(loc.col));
        }
        Ok(text)
    }

    pub fn decode(text: &str) -> Result<Snapshot, SnapshotError> {
        if text.is_empty() {
            return Err(SnapshotError::Empty);
        }
        let chars: Vec<char> = text.chars().collect();
        if chars.len() < 4 {
            return Err(SnapshotError::TooShort { len: chars.len() });
        }
        let ply = parse_counter("ply", &chars[0..2])?;
        let half_move_clock = parse_counter("half-move clock", &chars[2..4])?;

        let mut placement = Vec::new();
        let mut i = 4;
        while i < chars.len() {
            let start = i;
            let mut next = || -> Result<char, SnapshotError> {
                let c = chars
                    .get(i)
                    .copied()
                    .ok_or(SnapshotError::TruncatedToken { offset: start })?;
                i += 1;
                Ok(c)
            };

            let color_letter = next()?;
            let color = Color::from_letter(color_letter).ok_or(SnapshotError::UnknownColor(color_letter))?;
            let kind_letter = next()?;
            let kind = PieceKind::from_symbol(kind_letter).ok_or(SnapshotError::UnknownKind(kind_letter))?;
            let has_moved = parse_flag(next()?)?;
            let has_just_moved = if kind == PieceKind::Pawn {
                parse_flag(next()?)?
            } else {
                false
            };
            let row = parse_coordinate(next()?)?;
            let col = parse_coordinate(next()?)?;

            let location = Location::new(row, col);
            if !location.is_valid() {
                return Err(SnapshotError::OffBoard { row, col });
            }
            placement.push(Token {
                location,
                color,
                kind,
                has_moved,
                has_just_moved,
            });
        }

        Ok(Snapshot {
            ply,
            half_move_clock,
            placement,
        })
    }
}

impl FromStr for Snapshot {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snapshot::decode(s)
    }
}

fn push_counter(text: &mut String, field: &'static str, value: u32) -> Result<(), SnapshotError> {
    if value > COUNTER_LIMIT {
        return Err(SnapshotError::CounterOverflow { field, value });
    }
    text.push_str(&format!("{:02}", value));
    Ok(())
}

fn parse_counter(field: &'static str, chars: &[char]) -> Result<u32, SnapshotError> {
    let text: String = chars.iter().collect();
    let bad = || SnapshotError::BadCounter {
        field,
        text: text.clone(),
    };
    chars.iter().try_fold(0u32, |acc, c| {
        c.to_digit(10).map(|d| acc * 10 + d).ok_or_else(bad)
    })
}

fn flag_letter(flag: bool) -> char {
    if flag {
        't'
    } else {
        'f'
    }
}

fn parse_flag(c: char) -> Result<bool, SnapshotError> {
    match c {
        't' => Ok(true),
        'f' => Ok(false),
        other => Err(SnapshotError::BadFlag(other)),
    }
}

fn digit(value: i8) -> char {
    (b'0' + value as u8) as char
}

fn parse_coordinate(c: char) -> Result<i8, SnapshotError> {
    c.to_digit(10)
        .map(|d| d as i8)
        .ok_or(SnapshotError::BadCoordinate(c))
}
