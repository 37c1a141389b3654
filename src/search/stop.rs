use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative stop indicator shared between a searcher and its driver.
/// The search polls it; nothing is ever pushed into a running search.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self { Self::default() }

    pub fn stop(&self) { self.0.store(true, Ordering::Relaxed); }

    pub fn reset(&self) { self.0.store(false, Ordering::Relaxed); }

    #[inline]
    pub fn is_stopped(&self) -> bool { self.0.load(Ordering::Relaxed) }
}
