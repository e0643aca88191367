//! Selection among phrasing variants.

use rand::Rng;

/// Picks one of `n` variants. Injected so tests can assert exact replies.
pub trait Chooser: Send + Sync {
    /// Return an index in `0..n`. `n` is never zero.
    fn pick(&self, n: usize) -> usize;
}

/// Uniform random choice (production).
pub struct RandomChoice;

impl Chooser for RandomChoice {
    fn pick(&self, n: usize) -> usize {
        rand::thread_rng().gen_range(0..n)
    }
}

/// Always the first variant (tests, reproducible transcripts).
pub struct FirstChoice;

impl Chooser for FirstChoice {
    fn pick(&self, _n: usize) -> usize {
        0
    }
}
