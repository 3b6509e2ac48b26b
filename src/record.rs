//! Daily quality measurement records and sample validity.

use serde::{Deserialize, Serialize};

/// The 12 fixed measurement slots of one day, in slot order.
/// Slots 0-3 belong to shift A, 4-7 to shift B, 8-11 to shift C.
pub const SLOT_LABELS: [&str; 12] = [
    "06:00", "08:00", "10:00", "12:00", "14:00", "16:00", "18:00", "20:00", "22:00", "00:00",
    "02:00", "04:00",
];

/// Number of slots per day.
pub const SLOTS_PER_DAY: usize = 12;

/// Number of shifts per day (A, B, C), each covering 4 slots.
pub const SHIFTS_PER_DAY: usize = 3;

/// Slots covered by one shift.
pub const SLOTS_PER_SHIFT: usize = 4;

/// One raw measurement at a named time slot within a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub slot_label: String,
    pub value: f64,
}

/// One calendar day of quality samples plus production quantities.
///
/// `date_key` is the canonical zero-padded `"YYYY/MM/DD"` identifier and is
/// unique within a dataset. `production_by_shift` holds the [A, B, C]
/// breakdown when the source recorded one; the shift values should sum to
/// roughly `production_total` but are not required to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: u32,
    pub date_key: String,
    #[serde(default)]
    pub samples: Vec<Sample>,
    pub production_total: f64,
    #[serde(default)]
    pub production_by_shift: Option<[f64; 3]>,
}

impl DayRecord {
    /// Counts valid raw samples among the 4 slots of shift `shift_idx`.
    pub fn valid_count_in_shift(&self, shift_idx: usize) -> usize {
        let start = shift_idx * SLOTS_PER_SHIFT;
        self.samples
            .iter()
            .skip(start)
            .take(SLOTS_PER_SHIFT)
            .filter(|s| is_valid(s.value))
            .count()
    }
}

/// Whether a raw measurement value is usable.
///
/// Zero is treated as "no measurement", not a legitimate reading. This is
/// domain policy for the CCS source data and must not be relaxed.
pub fn is_valid(value: f64) -> bool {
    !value.is_nan() && value != 0.0
}

/// Splits a canonical `"YYYY/MM/DD"` (or `-`-separated) date key into
/// `(year, month, day)`. Returns `None` for anything unparseable.
pub fn parse_date_key(date_key: &str) -> Option<(i32, u32, u32)> {
    let mut parts = date_key.trim().split(['/', '-']);
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    Some((year, month, day))
}

/// Formats `(year, month, day)` back into the canonical zero-padded key.
pub fn format_date_key(year: i32, month: u32, day: u32) -> String {
    format!("{}/{:02}/{:02}", year, month, day)
}
