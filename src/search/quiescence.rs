use crate::search::alphabeta::Searcher;
use crate::search::eval::{Evaluator, Score, DRAW_SCORE, MATE_SCORE, MAX_PLY};
use crate::search::position::Position;

impl<P: Position, E: Evaluator<P>> Searcher<P, E> {
    /// Full-window quiescence value of `pos`.
    pub fn qsearch_eval_cp(&mut self, pos: &mut P) -> Score {
        self.search_quiescence(pos, -MATE_SCORE, MATE_SCORE, 0)
    }

    /// Tactical search past the horizon. `depth` is zero at the horizon (quiet
    /// checks are tried there) and negative below it (captures only).
    pub fn search_quiescence(&mut self, pos: &mut P, mut alpha: Score, beta: Score, depth: i32) -> Score {
        if self.ply >= MAX_PLY || self.stop.is_stopped() { return self.evaluate(pos); }
        self.stats.qnodes += 1;
        self.pv.clear(self.ply);

        if !pos.is_null() && pos.is_repetition() { return DRAW_SCORE; }

        // Standing pat is not an option while in check
        if pos.is_in_check() { return self.search_in_check(pos, alpha, beta, depth); }

        // Stand pat
        let stand = self.evaluate(pos);
        if stand >= beta { return stand; }
        if stand > alpha { alpha = stand; }

        let mut moves = pos.generate_captures(depth == 0);
        while let Some(mv) = moves.next_move() {
            // Delta pruning: even winning the target cannot reach alpha
            if self.params.use_delta && stand + pos.capture_gain(mv) + self.params.delta_margin < alpha { continue; }
            if !self.make(pos, mv) { continue; }
            let score = -self.search_quiescence(pos, -beta, -alpha, depth - 1);
            self.take_back(pos, mv);

            if self.stop.is_stopped() { return alpha; }
            if score > alpha {
                alpha = score;
                if alpha >= beta { break; }
            }
        }
        alpha
    }
}
