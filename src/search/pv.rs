use crate::search::eval::MAX_PLY;

/// Triangular principal-variation table: row `ply` belongs to the node
/// currently searching at that ply.
#[derive(Debug, Clone)]
pub struct PvTable<M> {
    rows: Vec<Vec<M>>,
}

impl<M: Copy> Default for PvTable<M> {
    fn default() -> Self { Self::new() }
}

impl<M: Copy> PvTable<M> {
    pub fn new() -> Self {
        Self { rows: (0..=MAX_PLY).map(|_| Vec::with_capacity(MAX_PLY)).collect() }
    }

    pub fn clear(&mut self, ply: usize) {
        if let Some(row) = self.rows.get_mut(ply) { row.clear(); }
    }

    pub fn clear_all(&mut self) { self.rows.iter_mut().for_each(Vec::clear); }

    /// Makes `mv` followed by the child's line the new line at `ply`.
    pub fn save(&mut self, ply: usize, mv: M) {
        if ply >= MAX_PLY { return; }
        let (head, tail) = self.rows.split_at_mut(ply + 1);
        let row = &mut head[ply];
        row.clear();
        row.push(mv);
        row.extend_from_slice(&tail[0]);
    }

    pub fn line(&self, ply: usize) -> &[M] {
        self.rows.get(ply).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, ply: usize) -> Option<M> { self.line(ply).first().copied() }
}
