use crate::{
    board::{Board, KING_HOME_COL},
    constants::{NUM_COLS, NUM_ROWS},
    error::FenError,
    game_state::GameState,
    types::{CastleSide, Piece, PieceKind, Side, Square},
};

/// [White kingside, White queenside, Black kingside, Black queenside]
const CASTLING_LETTERS: [(char, Side, CastleSide); 4] = [
    ('K', Side::White, CastleSide::KingSide),
    ('Q', Side::White, CastleSide::QueenSide),
    ('k', Side::Black, CastleSide::KingSide),
    ('q', Side::Black, CastleSide::QueenSide),
];

impl GameState {
    /// Loads a FEN string. Placement and active color are required; the
    /// castling, en passant and counter fields are optional.
    ///
    /// Castling rights are expressed through the pieces' move flags: a king or
    /// corner rook whose right is absent is marked as having moved. When the
    /// castling field is missing, every king and rook on its home square keeps
    /// its rights.
    ///
    /// Positions without exactly one king per side, or where the side not to
    /// move is in check, are rejected.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();

        if fields.len() < 2 {
            return Err(FenError::MissingFields(fields.len()));
        }

        let mut board = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Side::White,
            "b" => Side::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let rights = parse_castling(fields.get(2).copied())?;
        apply_move_flags(&mut board, rights);

        if let Some(target) = parse_en_passant(fields.get(3).copied(), side_to_move)? {
            // The target belongs to the side that just pushed
            board.set_pawn_skip_position(side_to_move.opponent(), Some(target));
        }

        let halfmove_clock = parse_counter(fields.get(4).copied(), 0)?;
        let fullmove_number = parse_counter(fields.get(5).copied(), 1)?;

        validate_kings(&board, side_to_move)?;

        Ok(GameState::with_counters(
            board,
            side_to_move,
            halfmove_clock,
            fullmove_number,
        ))
    }

    pub fn to_fen(&self) -> String {
        let board = self.board();
        let mut rows = Vec::with_capacity(NUM_ROWS);

        for row in 0..NUM_ROWS as u8 {
            let mut text = String::new();
            let mut empty = 0;

            for col in 0..NUM_COLS as u8 {
                match board.piece_at(Square::new(row, col)) {
                    Some(piece) => {
                        if empty > 0 {
                            text.push_str(&empty.to_string());
                            empty = 0;
                        }
                        text.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }

            if empty > 0 {
                text.push_str(&empty.to_string());
            }

            rows.push(text);
        }

        let castling: String = CASTLING_LETTERS
            .iter()
            .filter(|&&(_, side, castle_side)| board.can_castle(side, castle_side))
            .map(|&(letter, _, _)| letter)
            .collect();

        let en_passant = board
            .pawn_skip_position(self.side_to_move().opponent())
            .map(|square| square.name())
            .unwrap_or_else(|| "-".to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            match self.side_to_move() {
                Side::White => 'w',
                Side::Black => 'b',
            },
            if castling.is_empty() { "-" } else { castling.as_str() },
            en_passant,
            self.halfmove_clock(),
            self.fullmove_number()
        )
    }
}

fn parse_placement(placement: &str) -> Result<Board, FenError> {
    let rows: Vec<&str> = placement.split('/').collect();

    if rows.len() != NUM_ROWS {
        return Err(FenError::InvalidRowCount(rows.len()));
    }

    let mut board = Board::empty();

    for (row, text) in rows.iter().enumerate() {
        let mut col = 0usize;

        for ch in text.chars() {
            if let Some(skip) = ch.to_digit(10) {
                col += skip as usize;
                continue;
            }

            let piece = Piece::from_fen_char(ch).ok_or(FenError::InvalidPiece(ch))?;

            if col < NUM_COLS {
                board.set_piece(Square::new(row as u8, col as u8), Some(piece));
            }

            col += 1;
        }

        if col != NUM_COLS {
            return Err(FenError::InvalidRowWidth { row, width: col });
        }
    }

    Ok(board)
}

/// Each side needs exactly one king, and the side that just moved must not be
/// left in check.
fn validate_kings(board: &Board, side_to_move: Side) -> Result<(), FenError> {
    for side in Side::iter() {
        let count = board
            .pieces()
            .filter(|(_, piece)| piece.side == side && piece.kind == PieceKind::King)
            .count();

        if count != 1 {
            return Err(FenError::InvalidKingCount { side, count });
        }
    }

    let opponent = side_to_move.opponent();
    if board.is_in_check(opponent) {
        return Err(FenError::OpponentInCheck(opponent));
    }

    Ok(())
}

/// Indexed like `CASTLING_LETTERS`
fn parse_castling(field: Option<&str>) -> Result<[bool; 4], FenError> {
    let Some(field) = field else {
        return Ok([true; 4]);
    };

    let mut rights = [false; 4];

    if field == "-" {
        return Ok(rights);
    }

    for ch in field.chars() {
        let index = CASTLING_LETTERS
            .iter()
            .position(|&(letter, _, _)| letter == ch)
            .ok_or_else(|| FenError::InvalidCastling(field.to_string()))?;

        rights[index] = true;
    }

    Ok(rights)
}

fn has_right(rights: [bool; 4], side: Side, castle_side: CastleSide) -> bool {
    CASTLING_LETTERS
        .iter()
        .zip(rights)
        .any(|(&(_, s, c), granted)| granted && s == side && c == castle_side)
}

/// FEN does not carry move flags, so derive them: pawns off their start row
/// have moved, and kings and rooks keep their flag only with a castling right.
fn apply_move_flags(board: &mut Board, rights: [bool; 4]) {
    let pieces: Vec<(Square, Piece)> = board.pieces().collect();

    for (square, mut piece) in pieces {
        let side = piece.side;
        let at_back_row = square.row() == side.back_row();

        piece.has_moved = match piece.kind {
            PieceKind::Pawn => square.row() != side.pawn_row(),
            PieceKind::King => {
                let any_right = has_right(rights, side, CastleSide::KingSide)
                    || has_right(rights, side, CastleSide::QueenSide);
                !(at_back_row && square.col() == KING_HOME_COL && any_right)
            }
            PieceKind::Rook => {
                let corner_right = [CastleSide::KingSide, CastleSide::QueenSide]
                    .into_iter()
                    .any(|castle_side| {
                        square.col() == castle_side.rook_from_col()
                            && has_right(rights, side, castle_side)
                    });
                !(at_back_row && corner_right)
            }
            _ => false,
        };

        board.set_piece(square, Some(piece));
    }
}

fn parse_en_passant(field: Option<&str>, side_to_move: Side) -> Result<Option<Square>, FenError> {
    match field {
        None | Some("-") => Ok(None),
        Some(name) => {
            let square: Square = name
                .parse()
                .map_err(|_| FenError::InvalidEnPassant(name.to_string()))?;

            // Behind a pawn of the side that just moved
            let expected_row = (side_to_move.opponent().pawn_row() as i8
                + side_to_move.opponent().forward()) as u8;

            if square.row() != expected_row {
                return Err(FenError::InvalidEnPassant(name.to_string()));
            }

            Ok(Some(square))
        }
    }
}

fn parse_counter(field: Option<&str>, default: u32) -> Result<u32, FenError> {
    match field {
        None => Ok(default),
        Some(text) => text
            .parse()
            .map_err(|_| FenError::InvalidCounter(text.to_string())),
    }
}
