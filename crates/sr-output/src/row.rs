//! Plain data row types written by output backends.

use sr_optimize::GenerationStats;

/// Search progress after one generation.
///
/// Fitness columns hold [`Fitness::scalar`][sr_core::Fitness::scalar]: the
/// objective when feasible, the negated energy deficit (Wh) otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationRow {
    pub generation:    u64,
    pub best:          f64,
    pub best_feasible: bool,
    pub best_so_far:   f64,
    /// Mean objective over feasible individuals; `None` if there were none.
    pub mean_feasible: Option<f64>,
    pub feasible:      u64,
    pub population:    u64,
}

impl From<&GenerationStats> for GenerationRow {
    fn from(stats: &GenerationStats) -> Self {
        Self {
            generation:    stats.generation as u64,
            best:          stats.best.scalar(),
            best_feasible: stats.best.is_feasible(),
            best_so_far:   stats.best_so_far.scalar(),
            mean_feasible: stats.mean_feasible,
            feasible:      stats.feasible as u64,
            population:    stats.population as u64,
        }
    }
}
