//! Statistical weights for aggregated values.
//!
//! In weighted mode each aggregated value carries the share of production
//! quantity it represents, so a shift with one measurement and 400 t of
//! output counts for more than a shift with four measurements and 50 t.
//! Unweighted mode falls back to simple counting (weight 1).

use crate::record::{DayRecord, SLOTS_PER_SHIFT};
use crate::scoring::aggregate::AggregationMode;

/// Weight of the aggregated value at `index` within `record`.
///
/// Apportionment in weighted mode:
/// - daily: the whole day's `production_total`
/// - shift `i`: `production_by_shift[i]` when recorded and positive,
///   otherwise `production_total / 3`
/// - slot `j`: the owning shift's quantity divided by the number of valid
///   samples in that shift; without a recorded shift quantity the fallback
///   is `(production_total / 3) / valid_count`. This per-sample split is
///   the single fallback formula used everywhere, so a slot's weight never
///   depends on which caller asked for it.
///
/// `index` positions beyond the mode's range and slots whose shift has no
/// valid sample yield 0 (such values are NaN and never enter a total).
pub fn weight_of(record: &DayRecord, mode: AggregationMode, index: usize, weighted: bool) -> f64 {
    if !weighted {
        return 1.0;
    }

    match mode {
        AggregationMode::PerDay => record.production_total,
        AggregationMode::PerShift => shift_quantity(record, index),
        AggregationMode::PerInterval => {
            let shift_idx = index / SLOTS_PER_SHIFT;
            let valid_count = record.valid_count_in_shift(shift_idx);
            if valid_count == 0 {
                return 0.0;
            }
            shift_quantity(record, shift_idx) / valid_count as f64
        }
    }
}

/// Recorded quantity for shift `shift_idx`, or a third of the day's total
/// when the shift breakdown is absent or non-positive.
fn shift_quantity(record: &DayRecord, shift_idx: usize) -> f64 {
    match record.production_by_shift {
        Some(shifts) if shift_idx < shifts.len() && shifts[shift_idx] > 0.0 => shifts[shift_idx],
        _ => record.production_total / 3.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{SLOT_LABELS, Sample};

    fn record(production_total: f64, by_shift: Option<[f64; 3]>, values: &[f64]) -> DayRecord {
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
            production_total,
            production_by_shift: by_shift,
        }
    }

    #[test]
    fn test_unweighted_is_always_one() {
        let rec = record(900.0, Some([100.0, 200.0, 300.0]), &[280.0; 12]);
        for mode in [
            AggregationMode::PerInterval,
            AggregationMode::PerShift,
            AggregationMode::PerDay,
        ] {
            assert_eq!(weight_of(&rec, mode, 0, false), 1.0);
        }
    }

    #[test]
    fn test_daily_weight_is_total_production() {
        let rec = record(950.0, None, &[280.0; 12]);
        assert_eq!(weight_of(&rec, AggregationMode::PerDay, 0, true), 950.0);
    }

    #[test]
    fn test_shift_weight_uses_recorded_quantity() {
        let rec = record(900.0, Some([100.0, 200.0, 300.0]), &[280.0; 12]);
        assert_eq!(weight_of(&rec, AggregationMode::PerShift, 0, true), 100.0);
        assert_eq!(weight_of(&rec, AggregationMode::PerShift, 1, true), 200.0);
        assert_eq!(weight_of(&rec, AggregationMode::PerShift, 2, true), 300.0);
    }

    #[test]
    fn test_shift_weight_falls_back_per_shift_not_per_record() {
        // Shift B has no recorded quantity; only that shift falls back.
        let rec = record(900.0, Some([100.0, 0.0, 50.0]), &[280.0; 12]);
        assert_eq!(weight_of(&rec, AggregationMode::PerShift, 0, true), 100.0);
        assert_eq!(weight_of(&rec, AggregationMode::PerShift, 1, true), 300.0);
        assert_eq!(weight_of(&rec, AggregationMode::PerShift, 2, true), 50.0);
    }

    #[test]
    fn test_shift_weight_fallback_without_breakdown() {
        let rec = record(900.0, None, &[280.0; 12]);
        assert_eq!(weight_of(&rec, AggregationMode::PerShift, 1, true), 300.0);
    }

    #[test]
    fn test_interval_weight_splits_shift_quantity_by_valid_count() {
        // Shift A has 2 valid samples out of 4.
        let rec = record(
            900.0,
            Some([120.0, 200.0, 300.0]),
            &[280.0, 0.0, 285.0, 0.0, 290.0, 290.0, 290.0, 290.0],
        );
        assert_eq!(weight_of(&rec, AggregationMode::PerInterval, 0, true), 60.0);
        assert_eq!(weight_of(&rec, AggregationMode::PerInterval, 2, true), 60.0);
        // Shift B: 4 valid samples, 200 t.
        assert_eq!(weight_of(&rec, AggregationMode::PerInterval, 5, true), 50.0);
    }

    #[test]
    fn test_interval_weight_fallback_splits_third_of_total() {
        // No shift breakdown; shift A has 3 valid samples.
        let rec = record(900.0, None, &[280.0, 285.0, 290.0, 0.0]);
        assert_eq!(
            weight_of(&rec, AggregationMode::PerInterval, 0, true),
            100.0
        );
    }

    #[test]
    fn test_interval_weight_zero_when_shift_has_no_valid_sample() {
        let rec = record(900.0, None, &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(weight_of(&rec, AggregationMode::PerInterval, 0, true), 0.0);
    }
}
