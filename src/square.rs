use std::{fmt, str::FromStr};

use crate::{
    constants::{NUM_COLS, NUM_ROWS},
    error::ChessError,
    types::Square,
};

impl Square {
    /// Panics in debug builds when out of range; use `try_new` for untrusted input.
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < NUM_ROWS as u8 && col < NUM_COLS as u8);
        Self { row, col }
    }

    pub fn try_new(row: i8, col: i8) -> Option<Self> {
        if (0..NUM_ROWS as i8).contains(&row) && (0..NUM_COLS as i8).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    pub fn iter() -> impl Iterator<Item = Square> {
        (0..NUM_ROWS as u8).flat_map(|row| (0..NUM_COLS as u8).map(move |col| Square { row, col }))
    }

    /// 0-indexed from the top (rank 8)
    pub fn row(self) -> u8 {
        self.row
    }

    /// 0-indexed from the a-file
    pub fn col(self) -> u8 {
        self.col
    }

    /// 0-indexed from rank 1
    pub fn rank(self) -> u8 {
        NUM_ROWS as u8 - 1 - self.row
    }

    /// 0-indexed from a1, rank by rank. Used for hashing.
    pub fn index(self) -> usize {
        self.rank() as usize * NUM_COLS + self.col as usize
    }

    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        Self::try_new(self.row as i8 + d_row, self.col as i8 + d_col)
    }

    /// Vertical mirror: a1 <-> a8
    pub fn flipped(self) -> Self {
        Self {
            row: NUM_ROWS as u8 - 1 - self.row,
            col: self.col,
        }
    }

    pub fn is_central(self) -> bool {
        (2..=5).contains(&self.row) && (2..=5).contains(&self.col)
    }

    /// Algebraic name, e.g. "e4"
    pub fn name(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, (b'1' + self.rank()) as char)
    }
}

impl FromStr for Square {
    type Err = ChessError;

    /// Parses an algebraic name such as "e4"
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let bytes = name.as_bytes();

        if bytes.len() != 2 {
            return Err(ChessError::InvalidSquare(name.to_string()));
        }

        let (file, rank) = (bytes[0].to_ascii_lowercase(), bytes[1]);

        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(ChessError::InvalidSquare(name.to_string()));
        }

        Ok(Square::new(NUM_ROWS as u8 - 1 - (rank - b'1'), file - b'a'))
    }
}
