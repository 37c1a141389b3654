use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::search::eval::Score;

/// Heuristic switches and tunables for a [`Searcher`](crate::search::alphabeta::Searcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub use_razoring: bool,
    pub use_futility: bool,
    pub use_nullmove: bool,
    pub use_iid: bool,
    pub use_lmr: bool,
    pub use_delta: bool,
    /// Extra depth taken off a null-move search (`depth - 1 - R`).
    pub nullmove_reduction: i32,
    /// Null move is tried only when the mover has more pieces than this.
    pub nullmove_min_pieces: u32,
    pub razoring_max_depth: i32,
    pub futility_max_depth: i32,
    /// Internal iterative deepening kicks in above this depth.
    pub iid_min_depth: i32,
    pub iid_reduction: i32,
    pub lmr_min_depth: i32,
    /// Quiet moves per extra ply of late-move reduction (8/16/24 by default).
    pub lmr_step: u32,
    pub delta_margin: Score,
    pub hash_mb: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            use_razoring: true,
            use_futility: true,
            use_nullmove: true,
            use_iid: true,
            use_lmr: true,
            use_delta: true,
            nullmove_reduction: 3,
            nullmove_min_pieces: 5,
            razoring_max_depth: 8,
            futility_max_depth: 14,
            iid_min_depth: 4,
            iid_reduction: 4,
            lmr_min_depth: 3,
            lmr_step: 8,
            delta_margin: 50,
            hash_mb: 16,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("null-move reduction must be at least 1, got {0}")]
    NullMoveReduction(i32),
    #[error("IID reduction {reduction} must lie within 1..={min_depth}")]
    IidReduction { reduction: i32, min_depth: i32 },
    #[error("late-move reduction needs depth >= 2 and a positive step, got depth {depth} step {step}")]
    LateMoveReduction { depth: i32, step: u32 },
    #[error("delta margin must not be negative, got {0}")]
    DeltaMargin(Score),
    #[error("transposition cache needs at least 1 MB")]
    HashSize,
}

impl SearchParams {
    /// All pruning, reduction and IID heuristics switched off: plain PVS.
    pub fn plain() -> Self {
        Self {
            use_razoring: false,
            use_futility: false,
            use_nullmove: false,
            use_iid: false,
            use_lmr: false,
            use_delta: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.nullmove_reduction < 1 { return Err(ParamsError::NullMoveReduction(self.nullmove_reduction)); }
        // IID must search strictly shallower than the node it serves
        if self.iid_reduction < 1 || self.iid_reduction > self.iid_min_depth.max(1) {
            return Err(ParamsError::IidReduction { reduction: self.iid_reduction, min_depth: self.iid_min_depth });
        }
        if self.lmr_min_depth < 2 || self.lmr_step == 0 {
            return Err(ParamsError::LateMoveReduction { depth: self.lmr_min_depth, step: self.lmr_step });
        }
        if self.delta_margin < 0 { return Err(ParamsError::DeltaMargin(self.delta_margin)); }
        if self.hash_mb == 0 { return Err(ParamsError::HashSize); }
        Ok(())
    }
}
