use crate::search::position::{MoveHints, Position};

/// Leaf count of the legal move tree, walked with make/take back only.
pub fn perft<P: Position>(pos: &mut P, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let mut nodes = 0u64;
    let moves = pos.generate_moves(&MoveHints::default());
    for mv in moves {
        if !pos.make_move(mv) { continue; }
        nodes += perft(pos, depth - 1);
        pos.take_back(mv);
    }
    nodes
}
