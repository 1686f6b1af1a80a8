use rand::Rng;

/// Chance that a node present at level `n` is also present at level `n + 1`.
pub const BRANCH_PROBABILITY: f64 = 0.5;
/// Upper bound on the number of levels a single node may span.
pub const MAX_HEIGHT: usize = 32;

/// Tunables for level assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub p: f64,
    pub max_height: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            p: BRANCH_PROBABILITY,
            max_height: MAX_HEIGHT,
        }
    }
}

/// Draws geometrically distributed levels by flipping a biased coin until it
/// comes up tails. Level `L` is returned with probability `p^L * (1 - p)`.
pub struct LevelGenerator<R> {
    rng: R,
    p: f64,
    max_height: usize,
}

impl<R: Rng> LevelGenerator<R> {
    pub fn new(rng: R, config: Config) -> Self {
        assert!(config.max_height > 0, "max_height must be non-zero");
        assert!(
            config.p > 0.0 && config.p < 1.0,
            "p must be in (0, 1), got {}",
            config.p
        );
        Self {
            rng,
            p: config.p,
            max_height: config.max_height,
        }
    }

    /// Returns a level in `[0, max_height)`.
    pub fn random(&mut self) -> usize {
        let mut level = 0;
        while level + 1 < self.max_height && self.rng.gen_bool(self.p) {
            level += 1;
        }
        level
    }
}
