//! Rollup of period statistics across weeks and months.
//!
//! Only impact and production are additive across periods. Conformance
//! percentage is a period-local quantity and is never re-derived from
//! summed buckets.

use serde::{Deserialize, Serialize};

use crate::scoring::period::PeriodStatistics;

/// Additive summary of one profile across periods.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RollupOutcome {
    pub impact: f64,
    /// Periods with positive impact.
    pub reward_periods: u64,
    /// Periods with negative impact.
    pub penalty_periods: u64,
    /// Periods with exactly zero impact.
    pub neutral_periods: u64,
}

impl RollupOutcome {
    fn absorb(&mut self, impact: f64) {
        self.impact += impact;
        if impact > 0.0 {
            self.reward_periods += 1;
        } else if impact < 0.0 {
            self.penalty_periods += 1;
        } else {
            self.neutral_periods += 1;
        }
    }
}

/// Combined statistics for a list of periods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollupStatistics {
    pub primary: RollupOutcome,
    pub alternate: RollupOutcome,
    pub total_production: f64,
    pub period_count: u64,
}

/// Sums impacts and production over `periods` and partitions each profile's
/// period count into reward, penalty, and neutral.
pub fn rollup(periods: &[PeriodStatistics]) -> RollupStatistics {
    let mut out = RollupStatistics::default();

    for period in periods {
        out.primary.absorb(period.primary.impact);
        out.alternate.absorb(period.alternate.impact);
        out.total_production += period.total_production;
        out.period_count += 1;
    }

    out
}
