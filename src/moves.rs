use std::fmt;

use crate::{
    board::Board,
    types::{CastleSide, Piece, PieceKind, Square},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// Any piece moving or capturing by its ordinary pattern
    Normal { from: Square, to: Square },
    /// Pawn advancing two rows from its starting square
    DoublePawn { from: Square, to: Square },
    /// Pawn capturing onto the opponent's skip square
    EnPassant { from: Square, to: Square },
    /// King stepping two columns; the rook jumps over it
    Castle {
        from: Square,
        to: Square,
        castle_side: CastleSide,
    },
    PawnPromotion {
        from: Square,
        to: Square,
        promote_to: PieceKind,
    },
}

impl Move {
    pub fn from(&self) -> Square {
        match *self {
            Move::Normal { from, .. }
            | Move::DoublePawn { from, .. }
            | Move::EnPassant { from, .. }
            | Move::Castle { from, .. }
            | Move::PawnPromotion { from, .. } => from,
        }
    }

    pub fn to(&self) -> Square {
        match *self {
            Move::Normal { to, .. }
            | Move::DoublePawn { to, .. }
            | Move::EnPassant { to, .. }
            | Move::Castle { to, .. }
            | Move::PawnPromotion { to, .. } => to,
        }
    }

    pub fn promotion(&self) -> Option<PieceKind> {
        match *self {
            Move::PawnPromotion { promote_to, .. } => Some(promote_to),
            _ => None,
        }
    }

    pub fn is_promotion(&self) -> bool {
        matches!(self, Move::PawnPromotion { .. })
    }

    /// Must be asked before the move is played
    pub fn is_capture(&self, board: &Board) -> bool {
        matches!(self, Move::EnPassant { .. }) || board.piece_at(self.to()).is_some()
    }

    /// Squares whose contents change when the move is played: 2 for most
    /// moves, 3 for en passant, 4 for castling
    pub fn touched_squares(&self) -> ([Square; 4], usize) {
        let (from, to) = (self.from(), self.to());

        match *self {
            Move::EnPassant { .. } => ([from, to, Square::new(from.row(), to.col()), from], 3),
            Move::Castle { castle_side, .. } => (
                [
                    from,
                    to,
                    Square::new(from.row(), castle_side.rook_from_col()),
                    Square::new(from.row(), castle_side.rook_to_col()),
                ],
                4,
            ),
            _ => ([from, to, from, from], 2),
        }
    }

    /// Mutates the board. Returns true when the move was a capture or a pawn
    /// move, which resets the fifty-move counter.
    pub fn execute(&self, board: &mut Board) -> bool {
        let Some(piece) = board.piece_at(self.from()) else {
            return false;
        };

        match *self {
            Move::Normal { from, to } => {
                let captured = board.piece_at(to).is_some();
                relocate(board, piece, from, to);
                captured || piece.kind == PieceKind::Pawn
            }
            Move::DoublePawn { from, to } => {
                relocate(board, piece, from, to);
                let skipped = Square::new((from.row() + to.row()) / 2, from.col());
                board.set_pawn_skip_position(piece.side, Some(skipped));
                true
            }
            Move::EnPassant { from, to } => {
                relocate(board, piece, from, to);
                board.set_piece(Square::new(from.row(), to.col()), None);
                true
            }
            Move::Castle {
                from,
                to,
                castle_side,
            } => {
                relocate(board, piece, from, to);

                let rook_from = Square::new(from.row(), castle_side.rook_from_col());
                let rook_to = Square::new(from.row(), castle_side.rook_to_col());

                if let Some(rook) = board.piece_at(rook_from) {
                    relocate(board, rook, rook_from, rook_to);
                }

                false
            }
            Move::PawnPromotion {
                from,
                to,
                promote_to,
            } => {
                board.set_piece(from, None);
                board.set_piece(
                    to,
                    Some(Piece {
                        kind: promote_to,
                        side: piece.side,
                        has_moved: true,
                    }),
                );
                true
            }
        }
    }

    /// A move is legal when the mover's king is not attacked after it is
    /// played. Castling additionally may not start from or pass through an
    /// attacked square. The board is left exactly as it was.
    pub fn is_legal(&self, board: &mut Board) -> bool {
        let Some(mover) = board.piece_at(self.from()).map(|piece| piece.side) else {
            return false;
        };

        if let Move::Castle { from, to, .. } = *self {
            let passed = Square::new(from.row(), (from.col() + to.col()) / 2);

            if board.is_square_attacked(from, mover.opponent())
                || board.is_square_attacked(passed, mover.opponent())
            {
                return false;
            }
        }

        let (undo, _) = board.make_move(self);
        let legal = !board.is_in_check(mover);
        board.take_back_move(&undo);

        legal
    }

    /// Coordinate notation, e.g. "e2e4" or "e7e8q"
    pub fn to_uci(&self) -> String {
        let mut text = format!("{}{}", self.from(), self.to());

        if let Some(kind) = self.promotion() {
            text.push(kind.letter());
        }

        text
    }

    /// Short label used to match opening lines: piece letter (none for pawns)
    /// and destination, e.g. "e4", "Nf3", "Kg1"
    pub fn to_algebraic(&self, board: &Board) -> String {
        let letter = board
            .piece_at(self.from())
            .filter(|piece| piece.kind != PieceKind::Pawn)
            .map(|piece| piece.kind.letter().to_ascii_uppercase().to_string())
            .unwrap_or_default();

        format!("{}{}", letter, self.to())
    }
}

fn relocate(board: &mut Board, piece: Piece, from: Square, to: Square) {
    board.set_piece(from, None);
    board.set_piece(
        to,
        Some(Piece {
            has_moved: true,
            ..piece
        }),
    );
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}
