mod common;

use common::{tree_searcher, Edge, TreePosition, ROOT};
use pvsearch::board::cozy::ChessPosition;
use pvsearch::search::eval::MaterialEvaluator;
use pvsearch::search::{SearchParams, Searcher, MATE_SCORE};

#[test]
fn first_evasion_reaching_beta_ends_the_node() {
    let mut pos = TreePosition::new(0);
    pos.node_mut(ROOT).in_check = true;
    let e1 = pos.add(ROOT, -500);
    let e2 = pos.add(ROOT, -900);
    let mut s = tree_searcher(SearchParams::default());
    assert!(s.search_in_check(&mut pos, -100, 100, 1) >= 100);
    assert_eq!((pos.visits(e1), pos.visits(e2)), (1, 0));
}

#[test]
fn best_evasion_wins_when_none_fails_high() {
    let mut pos = TreePosition::new(0);
    pos.node_mut(ROOT).in_check = true;
    pos.add(ROOT, 40);
    pos.add(ROOT, 20);
    pos.add(ROOT, 60);
    let mut s = tree_searcher(SearchParams::plain());
    assert_eq!(s.search_in_check(&mut pos, -100, 100, 1), -20);
}

#[test]
fn repetition_while_in_check_is_a_draw() {
    let mut pos = TreePosition::new(-300);
    pos.node_mut(ROOT).in_check = true;
    pos.node_mut(ROOT).repetition = true;
    pos.add(ROOT, 300);
    let mut s = tree_searcher(SearchParams::plain());
    assert_eq!(s.search_in_check(&mut pos, -1000, 1000, 2), 0);
}

#[test]
fn repeated_evasion_does_not_inherit_a_sibling_line() {
    // Both replies give check. x leads to a deeper line, y repeats and wins.
    let mut pos = TreePosition::new(0);
    pos.node_mut(ROOT).in_check = true;
    let x = pos.add(ROOT, 0);
    pos.node_mut(x).in_check = true;
    let x1 = pos.add(x, 0);
    pos.add(x1, 100);
    let y = pos.add(ROOT, 0);
    pos.node_mut(y).in_check = true;
    pos.node_mut(y).repetition = true;
    let mut s = tree_searcher(SearchParams::plain());
    assert_eq!(s.search_in_check(&mut pos, -1000, 1000, 2), 0);
    assert_eq!(s.principal_variation(), &[Edge(y)]);
}

#[test]
fn nullmove_disabled_in_check() {
    // Black in check from rook on a1
    let fen = "k7/8/8/8/8/8/8/R3K3 b - - 0 1";
    let mut pos = ChessPosition::from_fen(fen).unwrap();
    let mut s1 = Searcher::with_params(MaterialEvaluator, SearchParams { use_nullmove: false, ..SearchParams::default() }).unwrap();
    let r1 = s1.search(&mut pos, 3);
    let mut s2 = Searcher::new(MaterialEvaluator);
    let r2 = s2.search(&mut pos, 3);
    assert_eq!(r2.score, r1.score, "nullmove in check should not change score");
    assert!(r2.score > -MATE_SCORE);
}
