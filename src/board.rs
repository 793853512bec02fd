use crate::{
    constants::{
        DIAGONAL_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, NUM_COLS, NUM_ROWS, NUM_SIDES,
        ORTHOGONAL_DIRECTIONS,
    },
    moves::Move,
    types::{CastleSide, Piece, PieceKind, Side, Square},
};

pub const KING_HOME_COL: u8 = 4;

const BACK_RANK: [PieceKind; NUM_COLS] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 8x8 mailbox of optional pieces plus the en passant state of each side.
///
/// `Board` is `Copy`: a copy is a full, independent snapshot including the
/// pieces' move flags and both pawn skip squares.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; NUM_COLS]; NUM_ROWS],
    /// Square each side's pawn passed over on its last double push
    pawn_skip_squares: [Option<Square>; NUM_SIDES],
}

/// Everything needed to take back one move: at most four touched squares and
/// both pawn skip squares.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoardUndo {
    pawn_skip_squares: [Option<Square>; NUM_SIDES],
    touched: [(Square, Option<Piece>); 4],
    count: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position
    pub fn new() -> Self {
        let mut board = Self::empty();

        for side in Side::iter() {
            for (col, kind) in BACK_RANK.into_iter().enumerate() {
                board.set_piece(
                    Square::new(side.back_row(), col as u8),
                    Some(Piece::new(kind, side)),
                );
                board.set_piece(
                    Square::new(side.pawn_row(), col as u8),
                    Some(Piece::new(PieceKind::Pawn, side)),
                );
            }
        }

        board
    }

    pub fn empty() -> Self {
        Self {
            squares: [[None; NUM_COLS]; NUM_ROWS],
            pawn_skip_squares: [None; NUM_SIDES],
        }
    }

    /// Explicit deep copy
    pub fn copy(&self) -> Self {
        *self
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.row() as usize][square.col() as usize]
    }

    #[inline]
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.row() as usize][square.col() as usize] = piece;
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    pub fn pawn_skip_position(&self, side: Side) -> Option<Square> {
        self.pawn_skip_squares[side as usize]
    }

    pub fn set_pawn_skip_position(&mut self, side: Side, square: Option<Square>) {
        self.pawn_skip_squares[side as usize] = square;
    }

    /// All occupied squares owned by `side`, top row first
    pub fn piece_positions_for(&self, side: Side) -> impl Iterator<Item = Square> + '_ {
        Square::iter().filter(move |&square| self.piece_at(square).is_some_and(|p| p.side == side))
    }

    /// All occupied squares with their pieces
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(move |square| self.piece_at(square).map(|p| (square, p)))
    }

    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.kind == PieceKind::King && piece.side == side)
            .map(|(square, _)| square)
    }

    fn has_piece(&self, square: Square, side: Side, kinds: &[PieceKind]) -> bool {
        self.piece_at(square)
            .is_some_and(|piece| piece.side == side && kinds.contains(&piece.kind))
    }

    /// Whether any piece of `attacker` could capture on `square`. Castling and
    /// pawn pushes never attack; the attacker's own king safety is ignored.
    pub fn is_square_attacked(&self, square: Square, attacker: Side) -> bool {
        // A pawn attacks diagonally forward, so look one row "behind" it
        let pawn_row = -attacker.forward();
        for d_col in [-1, 1] {
            if let Some(from) = square.offset(pawn_row, d_col) {
                if self.has_piece(from, attacker, &[PieceKind::Pawn]) {
                    return true;
                }
            }
        }

        for &(d_row, d_col) in &KNIGHT_OFFSETS {
            if let Some(from) = square.offset(d_row, d_col) {
                if self.has_piece(from, attacker, &[PieceKind::Knight]) {
                    return true;
                }
            }
        }

        for &(d_row, d_col) in &KING_OFFSETS {
            if let Some(from) = square.offset(d_row, d_col) {
                if self.has_piece(from, attacker, &[PieceKind::King]) {
                    return true;
                }
            }
        }

        let sliders = [
            (&ORTHOGONAL_DIRECTIONS, [PieceKind::Rook, PieceKind::Queen]),
            (&DIAGONAL_DIRECTIONS, [PieceKind::Bishop, PieceKind::Queen]),
        ];

        for (directions, kinds) in sliders {
            for &(d_row, d_col) in directions {
                let mut current = square;

                while let Some(from) = current.offset(d_row, d_col) {
                    if let Some(piece) = self.piece_at(from) {
                        if piece.side == attacker && kinds.contains(&piece.kind) {
                            return true;
                        }
                        break;
                    }

                    current = from;
                }
            }
        }

        false
    }

    /// Whether `side` still has an unmoved king on its home square and an
    /// unmoved rook in the given corner. Attacks and blockers are not
    /// considered.
    pub fn can_castle(&self, side: Side, castle_side: CastleSide) -> bool {
        let row = side.back_row();
        let king = Square::new(row, KING_HOME_COL);
        let rook = Square::new(row, castle_side.rook_from_col());

        let unmoved = |square: Square, kind: PieceKind| {
            self.piece_at(square)
                .is_some_and(|p| p.kind == kind && p.side == side && !p.has_moved)
        };

        unmoved(king, PieceKind::King) && unmoved(rook, PieceKind::Rook)
    }

    /// The opponent's skip square, but only when a pawn of `side_to_move`
    /// stands ready to capture onto it
    pub fn en_passant_capturable(&self, side_to_move: Side) -> Option<Square> {
        let target = self.pawn_skip_position(side_to_move.opponent())?;

        [-1, 1]
            .into_iter()
            .filter_map(|d_col| target.offset(-side_to_move.forward(), d_col))
            .any(|from| self.has_piece(from, side_to_move, &[PieceKind::Pawn]))
            .then_some(target)
    }

    pub fn is_in_check(&self, side: Side) -> bool {
        self.king_square(side)
            .is_some_and(|king| self.is_square_attacked(king, side.opponent()))
    }

    /// Both sides are down to a bare king or a king and a single minor piece
    pub fn insufficient_material(&self) -> bool {
        let mut minors = [0usize; NUM_SIDES];

        for (_, piece) in self.pieces() {
            match piece.kind {
                PieceKind::King => {}
                kind if kind.is_minor() => minors[piece.side as usize] += 1,
                _ => return false,
            }
        }

        minors.iter().all(|&count| count <= 1)
    }

    /// Plays `mv` for the side owning the piece on its origin square: clears
    /// that side's stale pawn skip square, then executes the move.
    ///
    /// Returns the undo record and whether the move was a capture or a pawn
    /// move.
    pub fn make_move(&mut self, mv: &Move) -> (BoardUndo, bool) {
        let (squares, count) = mv.touched_squares();
        let mut touched = [(mv.from(), None); 4];

        for (slot, &square) in touched.iter_mut().zip(&squares[..count]) {
            *slot = (square, self.piece_at(square));
        }

        let undo = BoardUndo {
            pawn_skip_squares: self.pawn_skip_squares,
            touched,
            count,
        };

        if let Some(mover) = self.piece_at(mv.from()) {
            self.set_pawn_skip_position(mover.side, None);
        }

        let capture_or_pawn = mv.execute(self);

        (undo, capture_or_pawn)
    }

    /// Restores exactly what `make_move` recorded
    pub fn take_back_move(&mut self, undo: &BoardUndo) {
        for &(square, piece) in undo.touched[..undo.count].iter().rev() {
            self.set_piece(square, piece);
        }

        self.pawn_skip_squares = undo.pawn_skip_squares;
    }

    /// Appends the legal moves of the piece on `from` (if any belongs to
    /// `side`). Legality is settled by playing each candidate and taking it
    /// back in place.
    pub fn legal_moves_from(&mut self, from: Square, side: Side, moves: &mut Vec<Move>) {
        let Some(piece) = self.piece_at(from) else {
            return;
        };

        if piece.side != side {
            return;
        }

        let start = moves.len();
        piece.pseudo_legal_moves(from, self, moves);

        let mut kept = start;
        for index in start..moves.len() {
            let candidate = moves[index];
            if candidate.is_legal(self) {
                moves[kept] = candidate;
                kept += 1;
            }
        }

        moves.truncate(kept);
    }

    pub fn legal_moves_for(&mut self, side: Side, moves: &mut Vec<Move>) {
        for square in Square::iter() {
            self.legal_moves_from(square, side, moves);
        }
    }

    pub fn has_legal_move(&mut self, side: Side) -> bool {
        let mut moves = Vec::with_capacity(32);

        for square in Square::iter() {
            self.legal_moves_from(square, side, &mut moves);
            if !moves.is_empty() {
                return true;
            }
        }

        false
    }

    pub fn display_board(&self, flip: bool) {
        let rows: Vec<u8> = match flip {
            false => (0..NUM_ROWS as u8).collect(),
            true => (0..NUM_ROWS as u8).rev().collect(),
        };

        println!();

        for row in rows {
            print!(" {}  ", NUM_ROWS as u8 - row);

            let cols: Vec<u8> = match flip {
                false => (0..NUM_COLS as u8).collect(),
                true => (0..NUM_COLS as u8).rev().collect(),
            };

            for col in cols {
                match self.piece_at(Square::new(row, col)) {
                    Some(piece) => print!(" {}", piece.fen_char()),
                    None => print!(" ."),
                }
            }

            println!();
        }

        match flip {
            false => println!("\n     a b c d e f g h"),
            true => println!("\n     h g f e d c b a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_starting_position() {
        let board = Board::new();

        assert_eq!(board.piece_positions_for(Side::White).count(), 16);
        assert_eq!(board.piece_positions_for(Side::Black).count(), 16);
        assert_eq!(board.king_square(Side::White), Some(sq("e1")));
        assert_eq!(board.king_square(Side::Black), Some(sq("e8")));
        assert!(!board.is_in_check(Side::White));
    }

    #[test]
    fn test_copy_is_independent() {
        let board = Board::new();
        let mut copy = board.copy();

        copy.set_piece(sq("e2"), None);
        copy.set_pawn_skip_position(Side::White, Some(sq("e3")));

        assert!(board.piece_at(sq("e2")).is_some());
        assert_eq!(board.pawn_skip_position(Side::White), None);
        assert_ne!(board, copy);
    }

    #[test]
    fn test_attacks_by_each_piece_kind() {
        let mut board = Board::empty();
        board.set_piece(sq("d4"), Some(Piece::new(PieceKind::Pawn, Side::White)));
        board.set_piece(sq("b1"), Some(Piece::new(PieceKind::Knight, Side::White)));
        board.set_piece(sq("h8"), Some(Piece::new(PieceKind::Bishop, Side::Black)));
        board.set_piece(sq("a5"), Some(Piece::new(PieceKind::Rook, Side::Black)));
        board.set_piece(sq("c5"), Some(Piece::new(PieceKind::Pawn, Side::White)));

        // White pawn on d4 attacks c5 and e5, not d5
        assert!(board.is_square_attacked(sq("e5"), Side::White));
        assert!(!board.is_square_attacked(sq("d5"), Side::White));

        assert!(board.is_square_attacked(sq("c3"), Side::White), "Knight b1");
        assert!(board.is_square_attacked(sq("a1"), Side::Black), "Rook down the a-file");
        assert!(board.is_square_attacked(sq("b5"), Side::Black), "Rook along the rank");
        assert!(!board.is_square_attacked(sq("d5"), Side::Black), "Blocked by c5");
        assert!(board.is_square_attacked(sq("e5"), Side::Black), "Bishop h8");
    }

    #[test]
    fn test_make_and_take_back_en_passant() {
        let mut board = Board::empty();
        board.set_piece(sq("e5"), Some(Piece::new(PieceKind::Pawn, Side::White)));
        board.set_piece(sq("d7"), Some(Piece::new(PieceKind::Pawn, Side::Black)));

        let (_, capture_or_pawn) = board.make_move(&Move::DoublePawn {
            from: sq("d7"),
            to: sq("d5"),
        });
        assert!(capture_or_pawn);
        assert_eq!(board.pawn_skip_position(Side::Black), Some(sq("d6")));

        let before = board;
        let (undo, _) = board.make_move(&Move::EnPassant {
            from: sq("e5"),
            to: sq("d6"),
        });
        assert!(board.is_empty(sq("d5")));

        board.take_back_move(&undo);
        assert_eq!(board, before);
    }
}
