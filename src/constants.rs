/// NOTE: 1 ply = one move by a single player

pub const NUM_ROWS: usize = 8;
pub const NUM_COLS: usize = 8;
pub const NUM_SQUARES: usize = NUM_ROWS * NUM_COLS;
pub const NUM_PIECE_TYPES: usize = 6;
pub const NUM_SIDES: usize = 2;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Default iterative deepening cap (in ply).
pub const DEFAULT_MAX_DEPTH: u16 = 3;

/// Hard limit for search recursion (in ply), including quiescence.
pub const MAX_PLY: usize = 64;

// Time
pub const DEFAULT_MOVETIME_MS: u64 = 2000;
pub const DEFAULT_PLAYER_TIME_REMAINING_MS: u64 = 300_000; // 5 minutes
pub const DEFAULT_PLAYER_INCREMENT_MS: u64 = 0;

/// Nodes visited between two reads of the clock.
pub const DEFAULT_TIME_CHECK_INTERVAL: u64 = 512;

// Scores
pub const INFINITY_SCORE: i32 = 1_000_000;
pub const MATE_SCORE: i32 = INFINITY_SCORE - 1000;
/// Scores beyond this are mates.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY as i32;

/// Plies of captures/promotions/checks searched past the horizon.
pub const QUIESCENCE_MAX_DEPTH: u8 = 4;

// Evaluation
pub const KNIGHT_CENTRAL_BONUS: i32 = 10;
pub const BISHOP_CENTRAL_BONUS: i32 = 8;
pub const ROOK_CENTRAL_FILE_BONUS: i32 = 5;
pub const KING_ACTIVITY_BONUS: i32 = 20;
pub const KING_CENTER_PENALTY: i32 = 30;
pub const DOUBLED_PAWN_PENALTY: i32 = 10;

/// Combined non-pawn, non-king material (both sides) at or below which the
/// position is treated as an endgame. Two rooks' worth.
pub const ENDGAME_MATERIAL_THRESHOLD: i32 = 1000;

/// Indexed [row][col] from White's point of view, row 0 = rank 8.
/// Black reads it with the row flipped.
#[rustfmt::skip]
pub const PAWN_SCORE: [[i32; NUM_COLS]; NUM_ROWS] = [
    [ 0,   0,   0,   0,   0,   0,   0,   0],
    [ 5,  10,  10, -10, -10,  10,  10,   5],
    [ 5,  10,  20,  20,  20,  20,  10,   5],
    [ 0,   5,  10,  25,  25,  10,   5,   0],
    [ 0,   5,   5,  15,  15,   5,   5,   0],
    [ 0,   0,   0,  10,  10,   0,   0,   0],
    [ 0,   0,   0,   0,   0,   0,   0,   0],
    [ 0,   0,   0,   0,   0,   0,   0,   0],
];

/// Knight move offsets as (row, col) deltas.
#[rustfmt::skip]
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    ( 1, -2), ( 1, 2), ( 2, -1), ( 2, 1),
];

#[rustfmt::skip]
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    ( 0, -1),          ( 0, 1),
    ( 1, -1), ( 1, 0), ( 1, 1),
];

pub const ORTHOGONAL_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
