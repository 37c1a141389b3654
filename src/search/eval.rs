use cozy_chess::{Board, Color, Piece};
use crate::board::cozy::ChessPosition;

/// Centipawn-like score from the side to move's point of view.
pub type Score = i32;

// Mate scoring helpers
pub const MATE_SCORE: Score = 30_000;
pub const DRAW_SCORE: Score = 0;

/// Deepest ply the search descends to, quiescence included.
pub const MAX_PLY: usize = 64;

/// True when `score` encodes a forced mate (for either side).
pub fn is_mate_score(score: Score) -> bool {
    score.abs() > MATE_SCORE - MAX_PLY as Score
}

/// Static scoring strategy plugged into the searcher.
pub trait Evaluator<P> {
    fn evaluate(&self, position: &P) -> Score;
}

impl<P, F> Evaluator<P> for F
where
    F: Fn(&P) -> Score,
{
    fn evaluate(&self, position: &P) -> Score { self(position) }
}

const PAWN: i32 = 100;
const KNIGHT: i32 = 320;
const BISHOP: i32 = 330;
const ROOK: i32 = 500;
const QUEEN: i32 = 900;

pub fn piece_value(piece: Piece) -> Score {
    match piece {
        Piece::Pawn => PAWN,
        Piece::Knight => KNIGHT,
        Piece::Bishop => BISHOP,
        Piece::Rook => ROOK,
        Piece::Queen => QUEEN,
        Piece::King => 20_000,
    }
}

fn count_piece(board: &Board, color: Color, piece: Piece) -> i32 {
    let bb = board.colors(color) & board.pieces(piece);
    bb.into_iter().count() as i32
}

// Side-agnostic material in centipawns: positive means White has more material.
pub fn material_eval_cp_side_agnostic(board: &Board) -> Score {
    let w = Color::White;
    let b = Color::Black;
    (count_piece(board, w, Piece::Pawn) - count_piece(board, b, Piece::Pawn)) * PAWN +
    (count_piece(board, w, Piece::Knight) - count_piece(board, b, Piece::Knight)) * KNIGHT +
    (count_piece(board, w, Piece::Bishop) - count_piece(board, b, Piece::Bishop)) * BISHOP +
    (count_piece(board, w, Piece::Rook) - count_piece(board, b, Piece::Rook)) * ROOK +
    (count_piece(board, w, Piece::Queen) - count_piece(board, b, Piece::Queen)) * QUEEN
}

// Material from side-to-move perspective (negamax-friendly)
pub fn material_eval_cp(board: &Board) -> Score {
    let base = material_eval_cp_side_agnostic(board);
    if board.side_to_move() == Color::White { base } else { -base }
}

/// Plain material count for the cozy-chess collaborator.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialEvaluator;

impl Evaluator<ChessPosition> for MaterialEvaluator {
    fn evaluate(&self, position: &ChessPosition) -> Score { material_eval_cp(position.board()) }
}
