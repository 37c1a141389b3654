use log::{debug, trace};
use serde::Serialize;
use crate::search::eval::{is_mate_score, Evaluator, Score, DRAW_SCORE, MATE_SCORE, MAX_PLY};
use crate::search::params::{ParamsError, SearchParams};
use crate::search::position::{MoveHints, Position};
use crate::search::pv::PvTable;
use crate::search::stop::StopSignal;
use crate::search::tt::{to_absolute, to_storable, Bound, Tt};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Root, tree and check-evasion nodes.
    pub nodes: u64,
    pub qnodes: u64,
    /// Full-window re-searches after a scout search looked promising.
    pub researches: u64,
    pub cache_cutoffs: u64,
    pub beta_cutoffs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub bestmove: Option<String>,
    pub score: Score,
    pub nodes: u64,
    pub pv: Vec<String>,
}

pub fn razoring_margin(depth: i32) -> Score { 512 + 64 * (depth - 1) }

pub fn futility_margin(depth: i32) -> Score { 256 * depth }

/// Search context: everything one search mutates lives here, nothing is global.
pub struct Searcher<P: Position, E> {
    pub(crate) tt: Tt<P::Move>,
    pub(crate) eval: E,
    pub(crate) params: SearchParams,
    pub(crate) stop: StopSignal,
    pub(crate) ply: usize,
    pub(crate) pv: PvTable<P::Move>,
    killers: Vec<[Option<P::Move>; 2]>,
    pub(crate) stats: SearchStats,
}

impl<P: Position, E: Evaluator<P>> Searcher<P, E> {
    pub fn new(eval: E) -> Self {
        let params = SearchParams::default();
        let mut tt = Tt::new();
        tt.set_capacity_mb(params.hash_mb);
        Self {
            tt,
            eval,
            params,
            stop: StopSignal::new(),
            ply: 0,
            pv: PvTable::new(),
            killers: vec![[None, None]; MAX_PLY + 1],
            stats: SearchStats::default(),
        }
    }

    pub fn with_params(eval: E, params: SearchParams) -> Result<Self, ParamsError> {
        params.validate()?;
        let mut s = Self::new(eval);
        if params.hash_mb != s.params.hash_mb { s.tt.set_capacity_mb(params.hash_mb); }
        s.params = params;
        Ok(s)
    }

    pub fn params(&self) -> &SearchParams { &self.params }

    pub fn stats(&self) -> SearchStats { self.stats }

    /// Handle the driver keeps to cancel this searcher.
    pub fn stop_signal(&self) -> StopSignal { self.stop.clone() }

    pub fn set_stop_signal(&mut self, stop: StopSignal) { self.stop = stop; }

    /// Current distance from the root; zero between searches.
    pub fn ply(&self) -> usize { self.ply }

    pub fn principal_variation(&self) -> &[P::Move] { self.pv.line(0) }

    /// Prepares for a new search from the driver's side: ages the cache and
    /// forgets per-search heuristics. The cache contents survive.
    pub fn new_search(&mut self) {
        self.tt.bump_generation();
        self.killers.iter_mut().for_each(|k| *k = [None, None]);
        self.pv.clear_all();
        self.stats = SearchStats::default();
    }

    /// Fixed-depth full-window search, bypassing any iterative deepening.
    pub fn search(&mut self, pos: &mut P, depth: i32) -> SearchResult {
        self.new_search();
        let (best, score) = self.search_root(pos, -MATE_SCORE, MATE_SCORE, depth);
        let pv = self.principal_variation().iter().map(|m| m.to_string()).collect();
        SearchResult { bestmove: best.map(|m| m.to_string()), score, nodes: self.stats.nodes, pv }
    }

    pub fn search_root(&mut self, pos: &mut P, mut alpha: Score, beta: Score, depth: i32) -> (Option<P::Move>, Score) {
        let ply = self.ply;
        self.pv.clear(ply);
        self.stats.nodes += 1;

        let in_check = pos.is_in_check();
        let candidates = if in_check {
            pos.generate_evasions()
        } else {
            let best = self.tt.probe(pos.hash()).and_then(|e| e.best);
            pos.generate_moves(&MoveHints { best, killers: self.killers_at(ply) })
        };
        // Keep only moves that survive make/take back
        let mut root_moves = Vec::with_capacity(candidates.len());
        for mv in candidates {
            if self.make(pos, mv) { self.take_back(pos, mv); root_moves.push(mv); }
        }

        match root_moves.as_slice() {
            [] => return (None, if in_check { -MATE_SCORE + ply as Score } else { DRAW_SCORE }),
            &[only] => {
                // Nothing to choose from
                self.make(pos, only);
                let score = -self.evaluate(pos);
                self.take_back(pos, only);
                self.pv.clear(ply + 1);
                self.pv.save(ply, only);
                debug!("root: only move {} score {}", only, score);
                return (Some(only), score);
            }
            _ => {}
        }

        let mut best_move = root_moves[0];
        let mut best_score = alpha;
        for (move_count, &mv) in root_moves.iter().enumerate() {
            if !self.make(pos, mv) { continue; }
            let gives_check = pos.is_in_check();
            let mut reduced_depth = depth - 1;
            if gives_check { reduced_depth += 1; }

            let score = if move_count > 0 && reduced_depth > 0 {
                let scout = if gives_check {
                    -self.search_in_check(pos, -alpha - 1, -alpha, reduced_depth)
                } else {
                    -self.search_tree(pos, -alpha - 1, -alpha, reduced_depth)
                };
                if scout > alpha && !self.stop.is_stopped() {
                    self.stats.researches += 1;
                    -self.search_tree(pos, -beta, -alpha, reduced_depth)
                } else {
                    scout
                }
            } else {
                -self.search_tree(pos, -beta, -alpha, reduced_depth)
            };
            self.take_back(pos, mv);

            // An interrupted move proves nothing
            if self.stop.is_stopped() { debug!("root: stopped after {} moves", move_count); break; }
            debug!("root: depth {} move {} score {}", depth, mv, score);

            if score > best_score {
                best_score = score;
                self.pv.save(ply, mv);
                if best_score > alpha {
                    alpha = best_score;
                    best_move = mv;
                    if alpha >= beta { break; }
                }
            }
        }
        debug!("root: depth {} best {} score {} nodes {}", depth, best_move, best_score, self.stats.nodes);
        (Some(best_move), best_score)
    }

    pub fn search_tree(&mut self, pos: &mut P, mut alpha: Score, beta: Score, depth: i32) -> Score {
        let ply = self.ply;
        if ply >= MAX_PLY || self.stop.is_stopped() { return self.evaluate(pos); }
        self.stats.nodes += 1;

        self.pv.clear(ply);
        let is_null = pos.is_null();
        let in_check = pos.is_in_check();
        let is_principal = beta - alpha > 1;

        if !is_null && pos.is_repetition() { return DRAW_SCORE; }

        // Probe cache
        let mut cached_move = None;
        if let Some(entry) = self.tt.probe(pos.hash()) {
            cached_move = entry.best;
            let score = to_absolute(entry.score, ply);
            if entry.is_cutoff(score, depth, alpha, beta) {
                trace!("cache cutoff at ply {} depth {} score {}", ply, depth, score);
                self.stats.cache_cutoffs += 1;
                return score;
            }
        }

        // Quiescence search
        if !in_check && depth < 1 { return self.search_quiescence(pos, alpha, beta, depth); }

        // Razoring and futility margin pruning
        if !in_check && !is_principal {
            let static_score = self.evaluate(pos);

            // No razoring with a pawn about to promote
            if self.params.use_razoring && cached_move.is_none() && depth < self.params.razoring_max_depth
                && !pos.has_pawn_near_promotion()
            {
                let margin = razoring_margin(depth);
                if static_score + margin <= alpha {
                    let bound = if depth <= 2 { alpha } else { alpha - margin };
                    let score = self.search_quiescence(pos, bound, bound + 1, 0);
                    if self.stop.is_stopped() { return alpha; }
                    if score <= bound { return score; }
                }
            }

            // Only without a winning score yet and with pieces besides pawns
            if self.params.use_futility && !is_null && depth < self.params.futility_max_depth
                && !is_mate_score(alpha) && !is_mate_score(beta) && pos.has_pieces()
            {
                let gain = static_score - futility_margin(depth);
                if gain >= beta { return gain; }
            }
        }

        // Null move pruning
        if self.params.use_nullmove && !in_check && !is_null && depth > 1
            && pos.piece_count() > self.params.nullmove_min_pieces && self.make_null(pos)
        {
            let null_score = -self.search_tree(pos, -beta, -beta + 1, depth - 1 - self.params.nullmove_reduction);
            self.take_back_null(pos);
            if self.stop.is_stopped() { return alpha; }
            if null_score >= beta {
                // Do not trust a mate found by passing
                return if is_mate_score(null_score) { beta } else { null_score };
            }
        }

        // Internal iterative deepening
        if self.params.use_iid && cached_move.is_none() && depth > self.params.iid_min_depth {
            self.search_tree(pos, alpha, beta, depth - self.params.iid_reduction);
            if self.stop.is_stopped() { return alpha; }
            cached_move = self.pv.first(ply);
        }

        let mut moves = if in_check {
            pos.generate_evasions()
        } else {
            pos.generate_moves(&MoveHints { best: cached_move, killers: self.killers_at(ply) })
        };

        let mut best_move = None;
        let mut bound = Bound::Upper;
        let (mut move_count, mut quiet_count) = (0u32, 0u32);
        while let Some(mv) = moves.next_move() {
            let quiet = pos.is_quiet(mv);
            if !self.make(pos, mv) { continue; }
            move_count += 1;

            // Search depth extension
            let gives_check = pos.is_in_check();
            let full_depth = if gives_check { depth } else { depth - 1 };
            let mut new_depth = full_depth;

            // Late move reduction
            let mut reduced = false;
            if self.params.use_lmr && depth >= self.params.lmr_min_depth && !is_principal && !in_check
                && !gives_check && quiet
            {
                quiet_count += 1;
                if new_depth > 0 && quiet_count >= self.params.lmr_step {
                    let step = quiet_count / self.params.lmr_step;
                    new_depth = (new_depth - step.min(3) as i32).max(0);
                    reduced = true;
                }
            }

            let score = if move_count == 1 {
                -self.search_tree(pos, -beta, -alpha, new_depth)
            } else {
                let mut score = if reduced {
                    let score = -self.search_tree(pos, -alpha - 1, -alpha, new_depth);
                    // Reduction is a guess: verify at full depth
                    if score > alpha && !self.stop.is_stopped() {
                        -self.search_tree(pos, -alpha - 1, -alpha, full_depth)
                    } else {
                        score
                    }
                } else if new_depth < 2 {
                    -self.search_quiescence(pos, -alpha - 1, -alpha, 0)
                } else {
                    -self.search_tree(pos, -alpha - 1, -alpha, new_depth)
                };

                // Zero window failed: try full window
                if score > alpha && score < beta && !self.stop.is_stopped() {
                    self.stats.researches += 1;
                    score = -self.search_tree(pos, -beta, -alpha, full_depth);
                }
                score
            };
            self.take_back(pos, mv);

            if self.stop.is_stopped() { return alpha; }

            if score > alpha {
                alpha = score;
                best_move = Some(mv);
                bound = Bound::Exact;
                self.pv.save(ply, mv);
                if alpha >= beta {
                    bound = Bound::Lower;
                    self.stats.beta_cutoffs += 1;
                    break;
                }
            }
        }

        if move_count == 0 {
            alpha = if in_check { -MATE_SCORE + ply as Score } else { DRAW_SCORE };
            bound = Bound::Exact;
        } else if bound == Bound::Lower && !in_check {
            if let Some(mv) = best_move { self.update_killers(ply, mv); }
        }

        self.tt.store(pos.hash(), best_move, to_storable(alpha, ply), depth, bound);
        alpha
    }
}

impl<P: Position, E: Evaluator<P>> Searcher<P, E> {
    #[inline]
    pub(crate) fn evaluate(&self, pos: &P) -> Score { self.eval.evaluate(pos) }

    pub(crate) fn make(&mut self, pos: &mut P, mv: P::Move) -> bool {
        let ok = pos.make_move(mv);
        if ok { self.ply += 1; }
        ok
    }

    pub(crate) fn take_back(&mut self, pos: &mut P, mv: P::Move) {
        pos.take_back(mv);
        self.ply -= 1;
    }

    fn make_null(&mut self, pos: &mut P) -> bool {
        let ok = pos.make_null_move();
        if ok { self.ply += 1; }
        ok
    }

    fn take_back_null(&mut self, pos: &mut P) {
        pos.take_back_null_move();
        self.ply -= 1;
    }

    fn killers_at(&self, ply: usize) -> [Option<P::Move>; 2] {
        self.killers.get(ply).copied().unwrap_or([None, None])
    }

    fn update_killers(&mut self, ply: usize, m: P::Move) {
        let Some(slot) = self.killers.get_mut(ply) else { return; };
        if slot[0] == Some(m) { return; }
        slot[1] = slot[0];
        slot[0] = Some(m);
    }

    pub fn tt_probe(&self, pos: &P) -> Option<(i32, Bound)> {
        self.tt.probe(pos.hash()).map(|e| (e.depth, e.bound))
    }

    pub fn tt_len(&self) -> usize { self.tt.len() }

    pub fn set_tt_capacity_mb(&mut self, mb: usize) {
        self.tt.set_capacity_mb(mb);
        self.params.hash_mb = mb;
    }

    pub fn set_tt_capacity_entries(&mut self, entries: usize) { self.tt.set_capacity_entries(entries); }

    /// Direct cache write, for drivers that seed known results.
    pub fn tt_store(&mut self, pos: &P, best: Option<P::Move>, score: Score, depth: i32, bound: Bound) {
        self.tt.store(pos.hash(), best, to_storable(score, self.ply), depth, bound);
    }
}
