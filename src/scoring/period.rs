//! Scoring of one period (typically a week) of day records.

use serde::{Deserialize, Serialize};

use crate::record::DayRecord;
use crate::scoring::aggregate::{AggregationMode, aggregate};
use crate::scoring::rules::{Profile, Severity, match_rule};
use crate::scoring::utility::pct;
use crate::scoring::weight::weight_of;

/// Acceptable-value ranges used to classify each aggregated sample,
/// independently for the primary (standard) and alternate (custom) view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub primary_min: f64,
    pub primary_max: f64,
    pub alternate_min: f64,
    pub alternate_max: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            primary_min: 260.0,
            primary_max: 310.0,
            alternate_min: 260.0,
            alternate_max: 320.0,
        }
    }
}

/// Classification counts, rounded to the nearest integer for display.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BucketCounts {
    pub in_range: u64,
    pub low: u64,
    pub high: u64,
}

/// Outcome of evaluating one profile over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileOutcome {
    /// Conformance percentage, unrounded.
    pub pct: f64,
    /// `total_production * factor / 100`, unrounded.
    pub impact: f64,
    /// Matched rule's factor; 0 when no rule matched.
    pub factor: f64,
    pub rule_label: Option<String>,
    pub severity: Option<Severity>,
    /// A factor of -100 or below voids the period contractually.
    pub rejected: bool,
    pub counts: BucketCounts,
}

/// Statistics bundle for one period, with the primary and alternate
/// profiles evaluated in parallel over the same samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodStatistics {
    pub primary: ProfileOutcome,
    pub alternate: ProfileOutcome,
    pub total_production: f64,
    /// Sum of sample weights, unrounded.
    pub total_weight: f64,
    /// `total_weight` rounded for display (a plain sample count when
    /// unweighted).
    pub total_count: u64,
}

/// Per-range weight buckets accumulated while walking the samples.
#[derive(Default)]
struct RangeBuckets {
    in_range: f64,
    low: f64,
    high: f64,
}

impl RangeBuckets {
    fn add(&mut self, value: f64, min: f64, max: f64, weight: f64) {
        if value >= min && value <= max {
            self.in_range += weight;
        } else if value < min {
            self.low += weight;
        } else {
            self.high += weight;
        }
    }

    fn counts(&self) -> BucketCounts {
        BucketCounts {
            in_range: self.in_range.round() as u64,
            low: self.low.round() as u64,
            high: self.high.round() as u64,
        }
    }
}

/// Scores `records` against both profiles.
///
/// Pure with respect to its inputs: identical arguments always produce an
/// identical bundle, and nothing is mutated or cached between calls. NaN
/// aggregates are skipped entirely; a period with zero total weight scores
/// 0% conformance rather than failing.
pub fn score_period(
    records: &[DayRecord],
    config: &ScoringConfig,
    primary: &Profile,
    alternate: &Profile,
    mode: AggregationMode,
    weighted: bool,
) -> PeriodStatistics {
    let mut total_weight = 0.0;
    let mut total_production = 0.0;
    let mut primary_buckets = RangeBuckets::default();
    let mut alternate_buckets = RangeBuckets::default();

    for record in records {
        total_production += record.production_total;

        for (idx, value) in aggregate(record, mode).iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            let weight = weight_of(record, mode, idx, weighted);
            total_weight += weight;

            // One sample lands in exactly one bucket per range; the two
            // classifications are independent views of the same weight.
            primary_buckets.add(*value, config.primary_min, config.primary_max, weight);
            alternate_buckets.add(*value, config.alternate_min, config.alternate_max, weight);
        }
    }

    let primary_pct = pct(primary_buckets.in_range, total_weight);
    let alternate_pct = pct(alternate_buckets.in_range, total_weight);

    PeriodStatistics {
        primary: resolve_outcome(primary_pct, total_production, primary, &primary_buckets),
        alternate: resolve_outcome(alternate_pct, total_production, alternate, &alternate_buckets),
        total_production,
        total_weight,
        total_count: total_weight.round() as u64,
    }
}

/// Runs the rule table for one profile and derives its financial outcome.
/// Impact is always taken from the whole-period production total, never
/// from weighted sample counts.
fn resolve_outcome(
    percentage: f64,
    total_production: f64,
    profile: &Profile,
    buckets: &RangeBuckets,
) -> ProfileOutcome {
    let matched = match_rule(percentage, profile);
    let factor = matched.map(|r| r.factor).unwrap_or(0.0);

    ProfileOutcome {
        pct: percentage,
        impact: total_production * factor / 100.0,
        factor,
        rule_label: matched.map(|r| r.label.clone()),
        severity: matched.map(|r| r.severity),
        rejected: factor <= -100.0,
        counts: buckets.counts(),
    }
}
