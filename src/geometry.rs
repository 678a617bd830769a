use std::fmt;

/// Side length of the board. Snapshot text stores each coordinate as one
/// decimal digit, so this must stay below 10.
pub const BOARD_SIZE: i8 = 8;

/// A square on the board. Row 0 is Black's back rank (rank 8), row 7 is
/// White's (rank 1). Ordering is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub row: i8,
    pub col: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::NorthEast,
        Direction::North,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// Unit step as `(row, col)`. North points at row 0.
    pub fn step(self) -> (i8, i8) {
        match self {
            Direction::East => (0, 1),
            Direction::NorthEast => (-1, 1),
            Direction::North => (-1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::SouthWest => (1, -1),
            Direction::South => (1, 0),
            Direction::SouthEast => (1, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::East => Direction::West,
            Direction::NorthEast => Direction::SouthWest,
            Direction::North => Direction::South,
            Direction::NorthWest => Direction::SouthEast,
            Direction::West => Direction::East,
            Direction::SouthWest => Direction::NorthEast,
            Direction::South => Direction::North,
            Direction::SouthEast => Direction::NorthWest,
        }
    }
}

impl Location {
    #[inline]
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// One square further toward `direction`. May leave the board.
    #[inline]
    pub fn farther(self, direction: Direction) -> Location {
        let (dr, dc) = direction.step();
        Location::new(self.row + dr, self.col + dc)
    }

    /// One square closer to `other`, stepping each axis independently.
    #[inline]
    pub fn closer_to(self, other: Location) -> Location {
        Location::new(
            self.row + (other.row - self.row).signum(),
            self.col + (other.col - self.col).signum(),
        )
    }

    /// All on-board neighbours, in `Direction::ALL` order.
    pub fn adjacent(self) -> impl Iterator<Item = Location> {
        Direction::ALL
            .into_iter()
            .map(move |d| self.farther(d))
            .filter(|loc| loc.is_valid())
    }

    pub fn is_adjacent(self, other: Location) -> bool {
        self != other && (self.row - other.row).abs() <= 1 && (self.col - other.col).abs() <= 1
    }

    /// Every square of the board in row-major order.
    pub fn all() -> impl Iterator<Item = Location> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Location::new(row, col)))
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }

    /// Parses `e4`-style names. Returns `None` for anything off the board.
    pub fn from_algebraic(name: &str) -> Option<Location> {
        let mut chars = name.chars();
        let file = chars.next()?;
        let rank = chars.next()?.to_digit(10)? as i8;
        if chars.next().is_some() || !file.is_ascii_lowercase() {
            return None;
        }
        let loc = Location::new(BOARD_SIZE - rank, file as i8 - b'a' as i8);
        loc.is_valid().then_some(loc)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "({}, {})", self.row, self.col);
        }
        let file = (b'a' + self.col as u8) as char;
        write!(f, "{}{}", file, BOARD_SIZE - self.row)
    }
}
