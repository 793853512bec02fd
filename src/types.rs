/// A board coordinate. Row 0 is rank 8 (Black's back rank), column 0 is the a-file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub(crate) row: u8,
    pub(crate) col: u8,
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn = 0,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    White = 0,
    Black = 1,
}

/// A piece standing on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    /// Set once the piece leaves its starting square. Drives castling and
    /// pawn double-push eligibility.
    pub has_moved: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

/// Terminal outcome of a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GameResult {
    /// Holds the winner
    Checkmate(Side),
    Stalemate,
    DrawByInsufficientMaterial,
    DrawByFiftyMoveRule,
    DrawByRepetition,
}
