use cozy_chess::{Board as CozyBoard, Color, Move, Piece, Rank};
use thiserror::Error;
use crate::search::eval::{piece_value, Score};
use crate::search::position::{MoveHints, MoveList, Position};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("FEN error: {0}")]
    Fen(String),
    #[error("Illegal move: {0}")]
    IllegalMove(String),
}

#[derive(Clone, Debug)]
struct Frame {
    board: CozyBoard,
    /// This board was reached by passing.
    null: bool,
}

/// cozy-chess board with the make/take-back history the search needs.
#[derive(Clone, Debug)]
pub struct ChessPosition {
    board: CozyBoard,
    null: bool,
    history: Vec<Frame>,
}

impl ChessPosition {
    fn from_board(board: CozyBoard) -> Self {
        Self { board, null: false, history: Vec::with_capacity(128) }
    }

    pub fn startpos() -> Self { Self::from_board(CozyBoard::default()) }

    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        CozyBoard::from_fen(fen, false).map(Self::from_board).map_err(|e| BoardError::Fen(format!("{e:?}")))
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    /// Plies recorded since construction, game moves and search moves alike.
    pub fn history_len(&self) -> usize { self.history.len() }

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut out = Vec::with_capacity(64);
        self.board.generate_moves(|moves| { out.extend(moves); false });
        out
    }

    pub fn legal_moves_count(&self) -> usize {
        let mut ct = 0usize;
        self.board.generate_moves(|moves| { ct += moves.len(); false });
        ct
    }

    pub fn find_move(&self, mv_uci: &str) -> Option<Move> {
        self.legal_moves().into_iter().find(|m| m.to_string() == mv_uci)
    }

    /// Plays a game move. Kept in the history so repetitions reach back past the search root.
    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<(), BoardError> {
        match self.find_move(mv_uci) {
            Some(m) if self.make_move(m) => Ok(()),
            _ => Err(BoardError::IllegalMove(mv_uci.to_string())),
        }
    }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self, BoardError> {
        let mut pos = Self::startpos();
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }

    fn them(&self) -> Color {
        if self.board.side_to_move() == Color::White { Color::Black } else { Color::White }
    }

    fn is_en_passant(&self, mv: Move) -> bool {
        self.board.piece_on(mv.from) == Some(Piece::Pawn)
            && mv.from.file() != mv.to.file()
            && self.board.piece_on(mv.to).is_none()
    }

    fn victim(&self, mv: Move) -> Option<Piece> {
        if self.board.color_on(mv.to) == Some(self.them()) {
            self.board.piece_on(mv.to)
        } else if self.is_en_passant(mv) {
            Some(Piece::Pawn)
        } else {
            None
        }
    }

    fn gives_check(&self, mv: Move) -> bool {
        let mut next = self.board.clone();
        next.play_unchecked(mv);
        !next.checkers().is_empty()
    }

    // MVV-LVA: most valuable victim first, cheapest attacker breaks ties
    fn mvv_lva(&self, mv: Move) -> i32 {
        let attacker = self.board.piece_on(mv.from).map(|p| p as i32).unwrap_or(0);
        self.capture_gain(mv) * 10 - attacker
    }

    fn order_key(&self, mv: Move, hints: &MoveHints<Move>) -> i32 {
        if hints.best == Some(mv) { return i32::MAX; }
        if !self.is_quiet(mv) { return 1_000_000 + self.mvv_lva(mv); }
        if hints.killers[0] == Some(mv) { return 500_001; }
        if hints.killers[1] == Some(mv) { return 500_000; }
        0
    }

    fn ranked(&self, moves: Vec<Move>, hints: &MoveHints<Move>) -> MoveList<Move> {
        let mut scored: Vec<(i32, Move)> = moves.into_iter().map(|m| (self.order_key(m, hints), m)).collect();
        // Stable: equal keys keep generator order
        scored.sort_by_key(|&(k, _)| std::cmp::Reverse(k));
        scored.into_iter().map(|(_, m)| m).collect()
    }
}

impl Position for ChessPosition {
    type Move = Move;

    fn hash(&self) -> u64 { self.board.hash() }

    fn make_move(&mut self, mv: Move) -> bool {
        if !self.board.is_legal(mv) { return false; }
        let mut next = self.board.clone();
        next.play_unchecked(mv);
        let prev = std::mem::replace(&mut self.board, next);
        self.history.push(Frame { board: prev, null: self.null });
        self.null = false;
        true
    }

    fn take_back(&mut self, _mv: Move) {
        if let Some(frame) = self.history.pop() {
            self.board = frame.board;
            self.null = frame.null;
        }
    }

    fn make_null_move(&mut self) -> bool {
        let Some(next) = self.board.null_move() else { return false; };
        let prev = std::mem::replace(&mut self.board, next);
        self.history.push(Frame { board: prev, null: self.null });
        self.null = true;
        true
    }

    fn take_back_null_move(&mut self) {
        if let Some(frame) = self.history.pop() {
            self.board = frame.board;
            self.null = frame.null;
        }
    }

    fn is_in_check(&self) -> bool { !self.board.checkers().is_empty() }

    fn is_null(&self) -> bool { self.null }

    /// Same side to move, same hash, within the reversible stretch. A null
    /// move ends the stretch.
    fn is_repetition(&self) -> bool {
        let key = self.board.hash();
        let limit = (self.board.halfmove_clock() as usize).min(self.history.len());
        let mut null = self.null;
        for back in 1..=limit {
            if null { return false; }
            let frame = &self.history[self.history.len() - back];
            if back % 2 == 0 && frame.board.hash() == key { return true; }
            null = frame.null;
        }
        false
    }

    fn is_quiet(&self, mv: Move) -> bool {
        mv.promotion.is_none() && self.victim(mv).is_none()
    }

    fn capture_gain(&self, mv: Move) -> Score {
        let victim = self.victim(mv).map(piece_value).unwrap_or(0);
        let promo = mv.promotion.map(|p| piece_value(p) - piece_value(Piece::Pawn)).unwrap_or(0);
        victim + promo
    }

    fn has_pawn_near_promotion(&self) -> bool {
        let stm = self.board.side_to_move();
        let seventh = if stm == Color::White { Rank::Seventh } else { Rank::Second };
        (self.board.colors(stm) & self.board.pieces(Piece::Pawn)).into_iter().any(|sq| sq.rank() == seventh)
    }

    fn has_pieces(&self) -> bool {
        let b = &self.board;
        let pieces = b.pieces(Piece::Knight) | b.pieces(Piece::Bishop) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        !(b.colors(b.side_to_move()) & pieces).is_empty()
    }

    fn piece_count(&self) -> u32 { self.board.colors(self.board.side_to_move()).len() }

    fn generate_moves(&self, hints: &MoveHints<Move>) -> MoveList<Move> {
        self.ranked(self.legal_moves(), hints)
    }

    fn generate_evasions(&self) -> MoveList<Move> {
        // Legal generation in check only yields evasions
        self.ranked(self.legal_moves(), &MoveHints::default())
    }

    fn generate_captures(&self, with_checks: bool) -> MoveList<Move> {
        let moves = self.legal_moves()
            .into_iter()
            .filter(|&m| !self.is_quiet(m) || (with_checks && self.gives_check(m)))
            .collect();
        self.ranked(moves, &MoveHints::default())
    }
}
