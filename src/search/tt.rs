use crate::search::eval::{Score, MATE_SCORE, MAX_PLY};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Fail high: the true score is at least `score`.
    Lower,
    /// Fail low: the true score is at most `score`.
    Upper,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry<M> {
    pub key: u64,
    pub depth: i32,
    pub score: Score,
    pub best: Option<M>,
    pub bound: Bound,
    pub gen: u32,
}

impl<M> Entry<M> {
    /// Whether the stored result settles a node searched to `depth` with
    /// window `(alpha, beta)`. `score` must already be converted with
    /// [`to_absolute`].
    pub fn is_cutoff(&self, score: Score, depth: i32, alpha: Score, beta: Score) -> bool {
        if self.depth < depth { return false; }
        match self.bound {
            Bound::Exact => true,
            Bound::Lower => score >= beta,
            Bound::Upper => score <= alpha,
        }
    }
}

const MATE_BAND: Score = MATE_SCORE - MAX_PLY as Score;

/// Converts a root-relative mate score into a distance from the node at `ply`.
pub fn to_storable(score: Score, ply: usize) -> Score {
    let ply = ply as Score;
    if score > MATE_BAND { score + ply } else if score < -MATE_BAND { score - ply } else { score }
}

/// Inverse of [`to_storable`] for a node probing at `ply`.
pub fn to_absolute(score: Score, ply: usize) -> Score {
    let ply = ply as Score;
    if score > MATE_BAND { score - ply } else if score < -MATE_BAND { score + ply } else { score }
}

const DEFAULT_WAYS: usize = 4;

#[derive(Clone, Copy)]
struct Bucket<M> {
    slots: [Option<Entry<M>>; DEFAULT_WAYS],
}

impl<M: Copy> Bucket<M> {
    fn empty() -> Self { Self { slots: [None; DEFAULT_WAYS] } }
}

/// Bucketed transposition cache. One writer at a time.
pub struct Tt<M> {
    buckets: Vec<Bucket<M>>,
    gen: u32,
}

impl<M: Copy> Default for Tt<M> {
    fn default() -> Self { Self::new() }
}

impl<M: Copy> Tt<M> {
    pub fn new() -> Self { Self { buckets: Vec::new(), gen: 0 } }

    pub fn with_capacity_entries(cap: usize) -> Self {
        let mut tt = Self::new();
        tt.set_capacity_entries(cap);
        tt
    }

    pub fn clear(&mut self) {
        for b in &mut self.buckets { *b = Bucket::empty(); }
    }

    fn bucket_index(&self, key: u64) -> usize {
        let mixed = key ^ (key >> 32);
        (mixed as usize) % self.buckets.len().max(1)
    }

    pub fn probe(&self, key: u64) -> Option<Entry<M>> {
        if self.buckets.is_empty() { return None; }
        let bucket = &self.buckets[self.bucket_index(key)];
        bucket.slots.iter().flatten().find(|e| e.key == key).copied()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.slots.iter().filter(|s| s.is_some()).count()).sum()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn capacity(&self) -> usize { self.buckets.len() * DEFAULT_WAYS }

    pub fn set_capacity_entries(&mut self, cap: usize) {
        let entries = cap.max(DEFAULT_WAYS);
        let buckets = (entries + DEFAULT_WAYS - 1) / DEFAULT_WAYS;
        self.buckets.clear();
        self.buckets.resize(buckets, Bucket::empty());
    }

    pub fn set_capacity_mb(&mut self, mb: usize) {
        let per_entry = std::mem::size_of::<Option<Entry<M>>>().max(1);
        let entries = (mb.saturating_mul(1024 * 1024) / per_entry).max(DEFAULT_WAYS);
        self.set_capacity_entries(entries);
    }

    pub fn store(&mut self, key: u64, best: Option<M>, score: Score, depth: i32, bound: Bound) {
        if self.buckets.is_empty() { return; }
        let e = Entry { key, depth, score, best, bound, gen: self.gen };
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        // Replace same key if at least as deep, else only refresh its move
        for slot in bucket.slots.iter_mut() {
            let Some(cur) = *slot else { continue; };
            if cur.key != key { continue; }
            if depth >= cur.depth {
                *slot = Some(e);
            } else if best.is_some() {
                *slot = Some(Entry { best, gen: e.gen, ..cur });
            }
            return;
        }
        // Empty slot first
        if let Some(slot) = bucket.slots.iter_mut().find(|s| s.is_none()) {
            *slot = Some(e);
            return;
        }
        // Evict the shallowest, then the oldest
        let victim = bucket.slots.iter().enumerate()
            .filter_map(|(i, s)| s.map(|cur| (i, (cur.depth, cur.gen))))
            .min_by_key(|&(_, rank)| rank)
            .map(|(i, _)| i)
            .unwrap_or(0);
        bucket.slots[victim] = Some(e);
    }

    pub fn generation(&self) -> u32 { self.gen }

    pub fn bump_generation(&mut self) { self.gen = self.gen.wrapping_add(1); }
}
