//! Scalar fitness with a feasibility tier.
//!
//! Higher is better.  The order is total:
//!
//! ```text
//! Infeasible { deficit: large } < Infeasible { deficit: small } < Feasible(x) < Feasible(y)   for x < y
//! ```
//!
//! Every infeasible candidate ranks strictly below every feasible one, so a
//! schedule that drains the battery can never win a tournament against one
//! that does not, yet the search still has a gradient (smaller deficit is
//! better) while the whole population is infeasible.

use std::cmp::Ordering;

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fitness {
    /// Objective value of a schedule that stayed within the energy budget.
    Feasible(f64),
    /// Schedule drove raw state-of-charge out of bounds; `deficit_wh` is the
    /// largest excursion in watt-hours (always `>= 0`).
    Infeasible { deficit_wh: f64 },
}

impl Fitness {
    /// Worst representable fitness; useful as a fold seed.
    pub const WORST: Fitness = Fitness::Infeasible { deficit_wh: f64::INFINITY };

    #[inline]
    pub fn is_feasible(self) -> bool {
        matches!(self, Fitness::Feasible(_))
    }

    /// The objective value, if feasible.
    #[inline]
    pub fn value(self) -> Option<f64> {
        match self {
            Fitness::Feasible(v) => Some(v),
            Fitness::Infeasible { .. } => None,
        }
    }

    /// Signed single-number view for logs and CSV: the objective value when
    /// feasible, the negated deficit otherwise.
    #[inline]
    pub fn scalar(self) -> f64 {
        match self {
            Fitness::Feasible(v) => v,
            Fitness::Infeasible { deficit_wh } => -deficit_wh,
        }
    }

    /// The better of two fitness values (`self` wins ties).
    #[inline]
    pub fn best(self, other: Fitness) -> Fitness {
        if other > self { other } else { self }
    }
}

impl PartialEq for Fitness {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Fitness {}

impl PartialOrd for Fitness {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fitness {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Fitness::Feasible(a), Fitness::Feasible(b)) => a.total_cmp(b),
            (Fitness::Feasible(_), Fitness::Infeasible { .. }) => Ordering::Greater,
            (Fitness::Infeasible { .. }, Fitness::Feasible(_)) => Ordering::Less,
            (
                Fitness::Infeasible { deficit_wh: a },
                Fitness::Infeasible { deficit_wh: b },
            ) => b.total_cmp(a),
        }
    }
}

impl std::fmt::Display for Fitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fitness::Feasible(v) => write!(f, "{v:.4}"),
            Fitness::Infeasible { deficit_wh } => write!(f, "infeasible ({deficit_wh:.1} Wh short)"),
        }
    }
}
