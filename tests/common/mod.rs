#![allow(dead_code)]
// Scripted game trees and instrumented collaborators for the search tests.

use std::cell::Cell;
use std::fmt;

use pvsearch::search::{MoveHints, MoveList, Position, Score, SearchParams, Searcher, StopSignal};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge(pub usize);

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "n{}", self.0) }
}

#[derive(Clone, Debug, Default)]
pub struct Node {
    /// Static score from the view of the side to move at this node.
    pub eval: Score,
    pub in_check: bool,
    pub repetition: bool,
    /// The edge leading into this node is a capture.
    pub capture: bool,
    pub children: Vec<usize>,
    pub null_child: Option<usize>,
}

/// Game tree spelled out node by node. Moves are child node ids.
#[derive(Clone, Debug)]
pub struct TreePosition {
    nodes: Vec<Node>,
    path: Vec<(usize, bool)>,
    visits: Vec<u32>,
    capture_generations: Cell<u32>,
    pub pieces: u32,
}

pub const ROOT: usize = 0;

impl TreePosition {
    pub fn new(root_eval: Score) -> Self {
        Self {
            nodes: vec![Node { eval: root_eval, ..Node::default() }],
            path: vec![(ROOT, false)],
            visits: vec![0],
            capture_generations: Cell::new(0),
            pieces: 16,
        }
    }

    fn push(&mut self, eval: Score) -> usize {
        self.nodes.push(Node { eval, ..Node::default() });
        self.visits.push(0);
        self.nodes.len() - 1
    }

    pub fn add(&mut self, parent: usize, eval: Score) -> usize {
        let id = self.push(eval);
        self.nodes[parent].children.push(id);
        id
    }

    pub fn add_capture(&mut self, parent: usize, eval: Score) -> usize {
        let id = self.add(parent, eval);
        self.nodes[id].capture = true;
        id
    }

    /// Node reached when `parent` passes.
    pub fn add_null(&mut self, parent: usize, eval: Score) -> usize {
        let id = self.push(eval);
        self.nodes[parent].null_child = Some(id);
        id
    }

    pub fn node_mut(&mut self, id: usize) -> &mut Node { &mut self.nodes[id] }

    pub fn current(&self) -> usize { self.path[self.path.len() - 1].0 }

    /// Plies below the root the position currently sits.
    pub fn depth(&self) -> usize { self.path.len() - 1 }

    pub fn static_eval(&self) -> Score { self.nodes[self.current()].eval }

    /// How many times the node was entered through make.
    pub fn visits(&self, id: usize) -> u32 { self.visits[id] }

    pub fn capture_generations(&self) -> u32 { self.capture_generations.get() }

    fn children(&self) -> Vec<Edge> { self.nodes[self.current()].children.iter().map(|&c| Edge(c)).collect() }

    fn enter(&mut self, id: usize, null: bool) {
        self.visits[id] += 1;
        self.path.push((id, null));
    }

    fn leave(&mut self) {
        if self.path.len() > 1 { self.path.pop(); }
    }
}

impl Position for TreePosition {
    type Move = Edge;

    fn hash(&self) -> u64 { 0x9E37_79B9_7F4A_7C15u64.wrapping_mul(self.current() as u64 + 1) }

    fn make_move(&mut self, mv: Edge) -> bool {
        if !self.nodes[self.current()].children.contains(&mv.0) { return false; }
        self.enter(mv.0, false);
        true
    }

    fn take_back(&mut self, _mv: Edge) { self.leave(); }

    fn make_null_move(&mut self) -> bool {
        let Some(id) = self.nodes[self.current()].null_child else { return false; };
        self.enter(id, true);
        true
    }

    fn take_back_null_move(&mut self) { self.leave(); }

    fn is_in_check(&self) -> bool { self.nodes[self.current()].in_check }

    fn is_null(&self) -> bool { self.path[self.path.len() - 1].1 }

    fn is_repetition(&self) -> bool { self.nodes[self.current()].repetition }

    fn is_quiet(&self, mv: Edge) -> bool { !self.nodes[mv.0].capture }

    fn capture_gain(&self, mv: Edge) -> Score { if self.nodes[mv.0].capture { 100 } else { 0 } }

    fn has_pawn_near_promotion(&self) -> bool { false }

    fn has_pieces(&self) -> bool { true }

    fn piece_count(&self) -> u32 { self.pieces }

    fn generate_moves(&self, hints: &MoveHints<Edge>) -> MoveList<Edge> {
        let mut moves = self.children();
        if let Some(pos) = hints.best.and_then(|b| moves.iter().position(|&m| m == b)) {
            let best = moves.remove(pos);
            moves.insert(0, best);
        }
        MoveList::new(moves)
    }

    fn generate_evasions(&self) -> MoveList<Edge> { MoveList::new(self.children()) }

    fn generate_captures(&self, with_checks: bool) -> MoveList<Edge> {
        self.capture_generations.set(self.capture_generations.get() + 1);
        self.children()
            .into_iter()
            .filter(|m| self.nodes[m.0].capture || (with_checks && self.nodes[m.0].in_check))
            .collect()
    }
}

pub type TreeEval = fn(&TreePosition) -> Score;

fn tree_eval(pos: &TreePosition) -> Score { pos.static_eval() }

pub fn tree_searcher(params: SearchParams) -> Searcher<TreePosition, TreeEval> {
    Searcher::with_params(tree_eval as TreeEval, params).expect("valid params")
}

/// Wraps a position, logging every successful make with the ply it was
/// played at. Optionally raises a stop signal after a number of makes.
#[derive(Clone, Debug)]
pub struct Recorder<P> {
    inner: P,
    ply: usize,
    pub log: Vec<(usize, String)>,
    pub makes: u64,
    stop_after: Option<(u64, StopSignal)>,
}

impl<P: Position> Recorder<P> {
    pub fn new(inner: P) -> Self { Self { inner, ply: 0, log: Vec::new(), makes: 0, stop_after: None } }

    pub fn stopping_after(inner: P, makes: u64, stop: StopSignal) -> Self {
        Self { stop_after: Some((makes, stop)), ..Self::new(inner) }
    }

    pub fn inner(&self) -> &P { &self.inner }

    /// Moves made at `ply`, in order.
    pub fn made_at(&self, ply: usize) -> Vec<String> {
        self.log.iter().filter(|(p, _)| *p == ply).map(|(_, m)| m.clone()).collect()
    }

    fn entered(&mut self) {
        self.ply += 1;
        self.makes += 1;
        if let Some((limit, stop)) = &self.stop_after {
            if self.makes >= *limit { stop.stop(); }
        }
    }
}

impl<P: Position> Position for Recorder<P> {
    type Move = P::Move;

    fn hash(&self) -> u64 { self.inner.hash() }

    fn make_move(&mut self, mv: P::Move) -> bool {
        if !self.inner.make_move(mv) { return false; }
        self.log.push((self.ply, mv.to_string()));
        self.entered();
        true
    }

    fn take_back(&mut self, mv: P::Move) {
        self.inner.take_back(mv);
        self.ply -= 1;
    }

    fn make_null_move(&mut self) -> bool {
        if !self.inner.make_null_move() { return false; }
        self.entered();
        true
    }

    fn take_back_null_move(&mut self) {
        self.inner.take_back_null_move();
        self.ply -= 1;
    }

    fn is_in_check(&self) -> bool { self.inner.is_in_check() }
    fn is_null(&self) -> bool { self.inner.is_null() }
    fn is_repetition(&self) -> bool { self.inner.is_repetition() }
    fn is_quiet(&self, mv: P::Move) -> bool { self.inner.is_quiet(mv) }
    fn capture_gain(&self, mv: P::Move) -> Score { self.inner.capture_gain(mv) }
    fn has_pawn_near_promotion(&self) -> bool { self.inner.has_pawn_near_promotion() }
    fn has_pieces(&self) -> bool { self.inner.has_pieces() }
    fn piece_count(&self) -> u32 { self.inner.piece_count() }

    fn generate_moves(&self, hints: &MoveHints<P::Move>) -> MoveList<P::Move> { self.inner.generate_moves(hints) }
    fn generate_evasions(&self) -> MoveList<P::Move> { self.inner.generate_evasions() }
    fn generate_captures(&self, with_checks: bool) -> MoveList<P::Move> { self.inner.generate_captures(with_checks) }
}
