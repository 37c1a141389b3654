//! Contracts the search requires from the board collaborator.
//!
//! The search never looks inside a position or a move. Everything it needs
//! (legality, check detection, repetition, ranked move lists) is asked for
//! through [`Position`].

use std::fmt;
use crate::search::eval::Score;

/// Board state plus move generation, mutated in strict make/take-back pairs.
pub trait Position {
    type Move: Copy + Eq + fmt::Debug + fmt::Display;

    fn hash(&self) -> u64;

    /// Plays `mv`. Returns false (leaving the position untouched) when the
    /// move turns out to be illegal.
    fn make_move(&mut self, mv: Self::Move) -> bool;
    /// Undoes the last successful `make_move(mv)`.
    fn take_back(&mut self, mv: Self::Move);
    /// Passes the turn. Returns false when passing is impossible.
    fn make_null_move(&mut self) -> bool;
    fn take_back_null_move(&mut self);

    /// Side to move is in check.
    fn is_in_check(&self) -> bool;
    /// The last move played was a null move.
    fn is_null(&self) -> bool;
    fn is_repetition(&self) -> bool;

    /// No capture and no promotion. Checks are detected by the search itself.
    fn is_quiet(&self, mv: Self::Move) -> bool;
    /// Largest material swing `mv` can produce (captured piece plus promotion).
    fn capture_gain(&self, mv: Self::Move) -> Score;
    /// Side to move has a pawn one step from promotion.
    fn has_pawn_near_promotion(&self) -> bool;
    /// Side to move has material other than king and pawns.
    fn has_pieces(&self) -> bool;
    /// Number of pieces (pawns and king included) of the side to move.
    fn piece_count(&self) -> u32;

    fn generate_moves(&self, hints: &MoveHints<Self::Move>) -> MoveList<Self::Move>;
    fn generate_evasions(&self) -> MoveList<Self::Move>;
    /// Captures and promotions, plus quiet checks when `with_checks` is set.
    fn generate_captures(&self, with_checks: bool) -> MoveList<Self::Move>;
}

/// Moves the generator should rank ahead of the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveHints<M> {
    pub best: Option<M>,
    pub killers: [Option<M>; 2],
}

impl<M> Default for MoveHints<M> {
    fn default() -> Self { Self { best: None, killers: [None, None] } }
}

impl<M: Copy + Eq> MoveHints<M> {
    pub fn best(mv: Option<M>) -> Self { Self { best: mv, killers: [None, None] } }

    pub fn is_killer(&self, mv: M) -> bool { self.killers.contains(&Some(mv)) }
}

/// Ranked moves handed out one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveList<M> {
    moves: Vec<M>,
    head: usize,
}

impl<M: Copy> MoveList<M> {
    pub fn new(moves: Vec<M>) -> Self { Self { moves, head: 0 } }

    pub fn next_move(&mut self) -> Option<M> {
        let mv = self.moves.get(self.head).copied();
        if mv.is_some() { self.head += 1; }
        mv
    }

    /// Total number of generated moves, consumed or not.
    pub fn len(&self) -> usize { self.moves.len() }

    pub fn is_empty(&self) -> bool { self.moves.is_empty() }

    pub fn as_slice(&self) -> &[M] { &self.moves }
}

impl<M: Copy> Iterator for MoveList<M> {
    type Item = M;

    fn next(&mut self) -> Option<M> { self.next_move() }
}

impl<M: Copy> FromIterator<M> for MoveList<M> {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self { Self::new(iter.into_iter().collect()) }
}
