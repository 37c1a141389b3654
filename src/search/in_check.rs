use crate::search::alphabeta::Searcher;
use crate::search::eval::{Evaluator, Score, DRAW_SCORE, MATE_SCORE, MAX_PLY};
use crate::search::position::Position;

impl<P: Position, E: Evaluator<P>> Searcher<P, E> {
    /// Search for a node whose side to move is in check. Only evasions are
    /// generated and no forward pruning applies. Returns as soon as one
    /// evasion reaches `beta`.
    pub fn search_in_check(&mut self, pos: &mut P, mut alpha: Score, beta: Score, depth: i32) -> Score {
        let ply = self.ply;
        if ply >= MAX_PLY || self.stop.is_stopped() { return self.evaluate(pos); }
        self.stats.nodes += 1;
        self.pv.clear(ply);

        if pos.is_repetition() { return DRAW_SCORE; }

        // Mated unless some evasion proves otherwise
        let mut best_score = -MATE_SCORE + ply as Score;
        if best_score >= beta { return best_score; }

        let mut moves = pos.generate_evasions();
        while let Some(mv) = moves.next_move() {
            if !self.make(pos, mv) { continue; }
            let gives_check = pos.is_in_check();
            let mut reduced_depth = depth - 1;
            if gives_check && depth > 0 { reduced_depth += 1; }

            let score = if reduced_depth <= 0 {
                -self.search_quiescence(pos, -beta, -alpha, reduced_depth)
            } else if gives_check {
                -self.search_in_check(pos, -beta, -alpha, reduced_depth)
            } else {
                -self.search_tree(pos, -beta, -alpha, reduced_depth)
            };
            self.take_back(pos, mv);

            if self.stop.is_stopped() { return alpha; }
            if score > best_score {
                self.pv.save(ply, mv);
                if score >= beta { return score; }
                best_score = score;
                if score > alpha { alpha = score; }
            }
        }
        best_score
    }
}
