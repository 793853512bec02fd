use crate::{
    board::Board,
    constants::{DIAGONAL_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, NUM_ROWS, ORTHOGONAL_DIRECTIONS},
    moves::Move,
    types::{CastleSide, Piece, PieceKind, Side, Square},
};

pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

impl PieceKind {
    /// Material value in centipawns
    pub const fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 0,
        }
    }

    pub fn iter() -> impl Iterator<Item = PieceKind> {
        [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ]
        .into_iter()
    }

    /// Lowercase letter as used in FEN and UCI promotion suffixes
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_letter(letter: char) -> Option<PieceKind> {
        match letter.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub const fn is_minor(self) -> bool {
        matches!(self, PieceKind::Knight | PieceKind::Bishop)
    }
}

impl Side {
    pub const fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn iter() -> impl Iterator<Item = Side> {
        [Side::White, Side::Black].into_iter()
    }

    /// Row delta of a pawn step
    pub const fn forward(self) -> i8 {
        match self {
            Side::White => -1,
            Side::Black => 1,
        }
    }

    pub const fn back_row(self) -> u8 {
        match self {
            Side::White => NUM_ROWS as u8 - 1,
            Side::Black => 0,
        }
    }

    pub const fn pawn_row(self) -> u8 {
        match self {
            Side::White => NUM_ROWS as u8 - 2,
            Side::Black => 1,
        }
    }

    pub const fn promotion_row(self) -> u8 {
        self.opponent().back_row()
    }
}

impl Piece {
    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Self {
            kind,
            side,
            has_moved: false,
        }
    }

    /// FEN letter: uppercase for White
    pub fn fen_char(self) -> char {
        match self.side {
            Side::White => self.kind.letter().to_ascii_uppercase(),
            Side::Black => self.kind.letter(),
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Piece> {
        let side = if ch.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };

        PieceKind::from_letter(ch).map(|kind| Piece::new(kind, side))
    }

    /// Appends every move this piece could make from `from` by its movement
    /// pattern, without regard to the safety of its own king.
    pub fn pseudo_legal_moves(self, from: Square, board: &Board, moves: &mut Vec<Move>) {
        match self.kind {
            PieceKind::Pawn => self.pawn_moves(from, board, moves),
            PieceKind::Knight => self.step_moves(from, board, &KNIGHT_OFFSETS, moves),
            PieceKind::Bishop => self.slide_moves(from, board, &DIAGONAL_DIRECTIONS, moves),
            PieceKind::Rook => self.slide_moves(from, board, &ORTHOGONAL_DIRECTIONS, moves),
            PieceKind::Queen => {
                self.slide_moves(from, board, &ORTHOGONAL_DIRECTIONS, moves);
                self.slide_moves(from, board, &DIAGONAL_DIRECTIONS, moves);
            }
            PieceKind::King => {
                self.step_moves(from, board, &KING_OFFSETS, moves);
                self.castle_moves(from, board, moves);
            }
        }
    }

    fn can_land_on(self, board: &Board, to: Square) -> bool {
        board.piece_at(to).is_none_or(|other| other.side != self.side)
    }

    fn step_moves(self, from: Square, board: &Board, offsets: &[(i8, i8)], moves: &mut Vec<Move>) {
        for &(d_row, d_col) in offsets {
            if let Some(to) = from.offset(d_row, d_col) {
                if self.can_land_on(board, to) {
                    moves.push(Move::Normal { from, to });
                }
            }
        }
    }

    fn slide_moves(
        self,
        from: Square,
        board: &Board,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(d_row, d_col) in directions {
            let mut current = from;

            while let Some(to) = current.offset(d_row, d_col) {
                match board.piece_at(to) {
                    None => moves.push(Move::Normal { from, to }),
                    Some(other) => {
                        if other.side != self.side {
                            moves.push(Move::Normal { from, to });
                        }
                        break;
                    }
                }

                current = to;
            }
        }
    }

    fn push_pawn_move(self, from: Square, to: Square, moves: &mut Vec<Move>) {
        if to.row() == self.side.promotion_row() {
            for promote_to in PROMOTION_KINDS {
                moves.push(Move::PawnPromotion {
                    from,
                    to,
                    promote_to,
                });
            }
        } else {
            moves.push(Move::Normal { from, to });
        }
    }

    fn pawn_moves(self, from: Square, board: &Board, moves: &mut Vec<Move>) {
        let forward = self.side.forward();

        if let Some(one_step) = from.offset(forward, 0) {
            if board.is_empty(one_step) {
                self.push_pawn_move(from, one_step, moves);

                if !self.has_moved {
                    if let Some(two_steps) = one_step.offset(forward, 0) {
                        if board.is_empty(two_steps) {
                            moves.push(Move::DoublePawn {
                                from,
                                to: two_steps,
                            });
                        }
                    }
                }
            }
        }

        let en_passant_target = board.pawn_skip_position(self.side.opponent());

        for d_col in [-1, 1] {
            let Some(to) = from.offset(forward, d_col) else {
                continue;
            };

            match board.piece_at(to) {
                Some(other) if other.side != self.side => self.push_pawn_move(from, to, moves),
                Some(_) => {}
                None => {
                    if en_passant_target == Some(to) && self.can_capture_en_passant(from, to, board)
                    {
                        moves.push(Move::EnPassant { from, to });
                    }
                }
            }
        }
    }

    /// The pushed pawn must still be standing beside us
    fn can_capture_en_passant(self, from: Square, to: Square, board: &Board) -> bool {
        let captured = Square::new(from.row(), to.col());

        board.piece_at(captured).is_some_and(|other| {
            other.kind == PieceKind::Pawn && other.side == self.side.opponent()
        })
    }

    fn castle_moves(self, from: Square, board: &Board, moves: &mut Vec<Move>) {
        if self.has_moved {
            return;
        }

        for castle_side in [CastleSide::KingSide, CastleSide::QueenSide] {
            let rook_from = Square::new(from.row(), castle_side.rook_from_col());

            let rook_ready = board.piece_at(rook_from).is_some_and(|rook| {
                rook.kind == PieceKind::Rook && rook.side == self.side && !rook.has_moved
            });

            if !rook_ready {
                continue;
            }

            let (low, high) = if rook_from.col() < from.col() {
                (rook_from.col() + 1, from.col())
            } else {
                (from.col() + 1, rook_from.col())
            };

            let path_clear = (low..high).all(|col| board.is_empty(Square::new(from.row(), col)));

            if path_clear {
                moves.push(Move::Castle {
                    from,
                    to: Square::new(from.row(), castle_side.king_to_col()),
                    castle_side,
                });
            }
        }
    }
}

impl CastleSide {
    pub const fn rook_from_col(self) -> u8 {
        match self {
            CastleSide::KingSide => 7,
            CastleSide::QueenSide => 0,
        }
    }

    pub const fn rook_to_col(self) -> u8 {
        match self {
            CastleSide::KingSide => 5,
            CastleSide::QueenSide => 3,
        }
    }

    pub const fn king_to_col(self) -> u8 {
        match self {
            CastleSide::KingSide => 6,
            CastleSide::QueenSide => 2,
        }
    }
}
