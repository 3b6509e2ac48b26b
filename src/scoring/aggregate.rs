//! Reduction of a day's raw slot samples into representative values.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::record::{DayRecord, SHIFTS_PER_DAY, SLOTS_PER_SHIFT, is_valid};
use crate::scoring::utility::round1;

/// How many representative values one [`DayRecord`] yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationMode {
    /// Each 2-hour slot value stands on its own (up to 12 per day).
    #[value(name = "2h")]
    PerInterval,
    /// Average of the valid slots in each of the three shifts (3 per day).
    #[value(name = "shift")]
    PerShift,
    /// Average of all valid slots of the day (1 per day).
    #[value(name = "daily")]
    PerDay,
}

/// Reduces `record`'s raw samples into 1, 3, or 12 representative values.
///
/// Entries are `NaN` when no valid measurement exists for that
/// slot/shift/day. Shift and daily averages are rounded to one decimal
/// place; per-interval values pass through unchanged. A record with no
/// samples at all yields an empty vector in per-interval mode.
pub fn aggregate(record: &DayRecord, mode: AggregationMode) -> Vec<f64> {
    match mode {
        AggregationMode::PerInterval => record
            .samples
            .iter()
            .map(|s| if is_valid(s.value) { s.value } else { f64::NAN })
            .collect(),
        AggregationMode::PerShift => (0..SHIFTS_PER_DAY)
            .map(|shift| {
                let start = shift * SLOTS_PER_SHIFT;
                let valid: Vec<f64> = record
                    .samples
                    .iter()
                    .skip(start)
                    .take(SLOTS_PER_SHIFT)
                    .filter(|s| is_valid(s.value))
                    .map(|s| s.value)
                    .collect();
                if valid.is_empty() {
                    f64::NAN
                } else {
                    round1(valid.iter().sum::<f64>() / valid.len() as f64)
                }
            })
            .collect(),
        AggregationMode::PerDay => {
            let valid: Vec<f64> = record
                .samples
                .iter()
                .filter(|s| is_valid(s.value))
                .map(|s| s.value)
                .collect();
            if valid.is_empty() {
                vec![f64::NAN]
            } else {
                vec![round1(valid.iter().sum::<f64>() / valid.len() as f64)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{SLOT_LABELS, Sample};

    fn record_with_values(values: &[f64]) -> DayRecord {
        DayRecord {
            day: 1,
            date_key: "1404/08/01".to_string(),
            samples: values
                .iter()
                .enumerate()
                .map(|(i, v)| Sample {
                    slot_label: SLOT_LABELS[i % 12].to_string(),
                    value: *v,
                })
                .collect(),
            production_total: 1000.0,
            production_by_shift: None,
        }
    }

    #[test]
    fn test_per_interval_passes_values_through() {
        let rec = record_with_values(&[280.0, 0.0, f64::NAN, 290.5]);
        let agg = aggregate(&rec, AggregationMode::PerInterval);

        assert_eq!(agg.len(), 4);
        assert_eq!(agg[0], 280.0);
        assert!(agg[1].is_nan());
        assert!(agg[2].is_nan());
        assert_eq!(agg[3], 290.5);
    }

    #[test]
    fn test_per_interval_empty_record_yields_empty() {
        let rec = record_with_values(&[]);
        assert!(aggregate(&rec, AggregationMode::PerInterval).is_empty());
    }

    #[test]
    fn test_per_shift_averages_valid_entries_only() {
        let rec = record_with_values(&[
            280.0,
            0.0,
            290.0,
            0.0, // shift A: mean of 280, 290
            0.0,
            0.0,
            0.0,
            0.0, // shift B: no data
            301.0,
            302.0,
            303.0,
            305.0, // shift C: mean of all four
        ]);
        let agg = aggregate(&rec, AggregationMode::PerShift);

        assert_eq!(agg.len(), 3);
        assert_eq!(agg[0], 285.0);
        assert!(agg[1].is_nan());
        assert_eq!(agg[2], 302.8);
    }

    #[test]
    fn test_per_shift_always_three_entries() {
        let rec = record_with_values(&[280.0, 285.0]);
        let agg = aggregate(&rec, AggregationMode::PerShift);

        assert_eq!(agg.len(), 3);
        assert_eq!(agg[0], 282.5);
        assert!(agg[1].is_nan());
        assert!(agg[2].is_nan());
    }

    #[test]
    fn test_per_day_single_rounded_average() {
        let rec = record_with_values(&[280.0, 281.0, 0.0, 282.0]);
        let agg = aggregate(&rec, AggregationMode::PerDay);

        assert_eq!(agg, vec![281.0]);
    }

    #[test]
    fn test_per_day_nan_iff_no_valid_sample() {
        let rec = record_with_values(&[0.0, f64::NAN, 0.0]);
        let agg = aggregate(&rec, AggregationMode::PerDay);

        assert_eq!(agg.len(), 1);
        assert!(agg[0].is_nan());
    }
}
