//! Calendar grouping and the financial report over a month range.
//!
//! The engine itself has no notion of calendars; this module is the caller
//! that partitions a dataset into the plant's week scheme, scores each
//! week, and rolls the results up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::{DayRecord, parse_date_key};
use crate::scoring::aggregate::AggregationMode;
use crate::scoring::period::{PeriodStatistics, ScoringConfig, score_period};
use crate::scoring::rollup::{RollupStatistics, rollup};
use crate::scoring::rules::Profile;

/// Day-of-month ranges of the four accounting weeks: [1-7], [8-14],
/// [15-22], [23-end].
pub const WEEK_DAY_RANGES: [(u32, u32); 4] = [(1, 7), (8, 14), (15, 22), (23, 31)];

/// Accounting week a day-of-month belongs to (0-based), if any.
pub fn week_index_of_day(day: u32) -> Option<usize> {
    WEEK_DAY_RANGES
        .iter()
        .position(|(start, end)| day >= *start && day <= *end)
}

/// Records of `(year, month)`, in dataset order.
pub fn records_in_month(records: &[DayRecord], year: i32, month: u32) -> Vec<&DayRecord> {
    records
        .iter()
        .filter(|r| {
            parse_date_key(&r.date_key).is_some_and(|(y, m, _)| y == year && m == month)
        })
        .collect()
}

/// Partitions one month's records into the four accounting weeks.
pub fn group_weeks<'a>(month_records: &[&'a DayRecord]) -> [Vec<&'a DayRecord>; 4] {
    let mut weeks: [Vec<&DayRecord>; 4] = Default::default();
    for record in month_records.iter().copied() {
        let day = parse_date_key(&record.date_key)
            .map(|(_, _, d)| d)
            .unwrap_or(record.day);
        if let Some(idx) = week_index_of_day(day) {
            weeks[idx].push(record);
        }
    }
    weeks
}

/// Inclusive month range, e.g. 1404/02 through 1404/12.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonthRange {
    pub start_year: i32,
    pub start_month: u32,
    pub end_year: i32,
    pub end_month: u32,
}

impl MonthRange {
    /// All `(year, month)` pairs in the range, in order.
    pub fn months(&self) -> Vec<(i32, u32)> {
        let mut months = Vec::new();
        let (mut year, mut month) = (self.start_year, self.start_month);
        while year < self.end_year || (year == self.end_year && month <= self.end_month) {
            months.push((year, month));
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
        months
    }
}

/// One scored week inside the report. `stats` is absent for weeks with no
/// records, which contribute nothing to the rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekEntry {
    pub year: i32,
    pub month: u32,
    /// 1-based accounting week number within the month.
    pub week: u32,
    pub label: String,
    pub stats: Option<PeriodStatistics>,
}

/// One month's row: its four weeks plus per-profile impact sums.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthRow {
    pub label: String,
    pub weeks: Vec<WeekEntry>,
    pub primary_impact: f64,
    pub alternate_impact: f64,
}

/// Financial report over a month range: week-by-week impacts, month sums,
/// and the whole-range rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialReport {
    pub generated_at: DateTime<Utc>,
    pub range: MonthRange,
    pub mode: AggregationMode,
    pub weighted: bool,
    pub months: Vec<MonthRow>,
    pub totals: RollupStatistics,
}

/// Scores every non-empty accounting week in `range` and rolls the results
/// up into a [`FinancialReport`].
pub fn financial_report(
    records: &[DayRecord],
    config: &ScoringConfig,
    primary: &Profile,
    alternate: &Profile,
    mode: AggregationMode,
    weighted: bool,
    range: MonthRange,
) -> FinancialReport {
    let mut months = Vec::new();
    let mut scored_weeks = Vec::new();

    for (year, month) in range.months() {
        let month_records = records_in_month(records, year, month);
        let weeks = group_weeks(&month_records);

        let mut primary_impact = 0.0;
        let mut alternate_impact = 0.0;
        let mut entries = Vec::with_capacity(weeks.len());

        for (idx, week_records) in weeks.iter().enumerate() {
            let label = format!("{}/{:02} W{}", year, month, idx + 1);
            let stats = if week_records.is_empty() {
                None
            } else {
                let owned: Vec<DayRecord> =
                    week_records.iter().map(|r| (*r).clone()).collect();
                let stats = score_period(&owned, config, primary, alternate, mode, weighted);
                debug!(
                    week = %label,
                    records = week_records.len(),
                    primary_pct = stats.primary.pct,
                    primary_impact = stats.primary.impact,
                    "Week scored"
                );
                primary_impact += stats.primary.impact;
                alternate_impact += stats.alternate.impact;
                scored_weeks.push(stats.clone());
                Some(stats)
            };
            entries.push(WeekEntry {
                year,
                month,
                week: (idx + 1) as u32,
                label,
                stats,
            });
        }

        months.push(MonthRow {
            label: format!("{}/{:02}", year, month),
            weeks: entries,
            primary_impact,
            alternate_impact,
        });
    }

    FinancialReport {
        generated_at: Utc::now(),
        range,
        mode,
        weighted,
        months,
        totals: rollup(&scored_weeks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{SLOT_LABELS, Sample, format_date_key};
    use crate::scoring::rules::default_profiles;

    fn record(year: i32, month: u32, day: u32, value: f64) -> DayRecord {
        DayRecord {
            day,
            date_key: format_date_key(year, month, day),
            samples: (0..12)
                .map(|i| Sample {
                    slot_label: SLOT_LABELS[i].to_string(),
                    value,
                })
                .collect(),
            production_total: 1000.0,
            production_by_shift: None,
        }
    }

    #[test]
    fn test_week_index_boundaries() {
        assert_eq!(week_index_of_day(1), Some(0));
        assert_eq!(week_index_of_day(7), Some(0));
        assert_eq!(week_index_of_day(8), Some(1));
        assert_eq!(week_index_of_day(14), Some(1));
        assert_eq!(week_index_of_day(15), Some(2));
        assert_eq!(week_index_of_day(22), Some(2));
        assert_eq!(week_index_of_day(23), Some(3));
        assert_eq!(week_index_of_day(31), Some(3));
        assert_eq!(week_index_of_day(0), None);
        assert_eq!(week_index_of_day(32), None);
    }

    #[test]
    fn test_month_range_spans_year_boundary() {
        let range = MonthRange {
            start_year: 1404,
            start_month: 11,
            end_year: 1405,
            end_month: 2,
        };
        assert_eq!(
            range.months(),
            vec![(1404, 11), (1404, 12), (1405, 1), (1405, 2)]
        );
    }

    #[test]
    fn test_group_weeks() {
        let records = vec![
            record(1404, 8, 3, 285.0),
            record(1404, 8, 14, 285.0),
            record(1404, 8, 22, 285.0),
            record(1404, 8, 30, 285.0),
        ];
        let refs = records_in_month(&records, 1404, 8);
        let weeks = group_weeks(&refs);

        assert_eq!(weeks[0].len(), 1);
        assert_eq!(weeks[1].len(), 1);
        assert_eq!(weeks[2].len(), 1);
        assert_eq!(weeks[3].len(), 1);
    }

    #[test]
    fn test_records_in_month_filters_other_months() {
        let records = vec![record(1404, 8, 3, 285.0), record(1404, 9, 3, 285.0)];
        assert_eq!(records_in_month(&records, 1404, 8).len(), 1);
        assert_eq!(records_in_month(&records, 1404, 9).len(), 1);
        assert_eq!(records_in_month(&records, 1404, 10).len(), 0);
    }

    #[test]
    fn test_financial_report_sums_weeks_into_months_and_totals() {
        let (standard, custom) = default_profiles();
        // Week 1 conformant (reward), week 3 far out of range (rejected).
        let records = vec![
            record(1404, 8, 1, 285.0),
            record(1404, 8, 2, 285.0),
            record(1404, 8, 16, 200.0),
        ];
        let report = financial_report(
            &records,
            &ScoringConfig::default(),
            &standard,
            &custom,
            AggregationMode::PerInterval,
            false,
            MonthRange {
                start_year: 1404,
                start_month: 8,
                end_year: 1404,
                end_month: 8,
            },
        );

        assert_eq!(report.months.len(), 1);
        let month = &report.months[0];
        assert_eq!(month.weeks.len(), 4);
        assert!(month.weeks[0].stats.is_some());
        assert!(month.weeks[1].stats.is_none());
        assert!(month.weeks[2].stats.is_some());
        assert!(month.weeks[3].stats.is_none());

        // Week 1: 2000 t at factor 2 => +40. Week 3: 1000 t rejected => -1000.
        assert_eq!(month.primary_impact, 40.0 - 1000.0);
        assert_eq!(report.totals.primary.impact, month.primary_impact);
        assert_eq!(report.totals.primary.reward_periods, 1);
        assert_eq!(report.totals.primary.penalty_periods, 1);
        assert_eq!(report.totals.total_production, 3000.0);
        assert_eq!(report.totals.period_count, 2);
    }
}
