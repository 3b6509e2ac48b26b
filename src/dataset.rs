//! JSON loaders for datasets, scoring configuration, and rule profiles.
//!
//! The engine only ever sees validated, date-ordered records; all loader
//! irregularities (duplicate date keys, malformed profiles) are fatal here
//! rather than silently normalized downstream.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::{debug, info};

use crate::record::{DayRecord, SLOTS_PER_DAY, parse_date_key};
use crate::scoring::period::ScoringConfig;
use crate::scoring::rules::{Profile, format_rule_range, validate_profile};

#[derive(Debug, Deserialize)]
struct Dataset {
    records: Vec<DayRecord>,
}

/// Loads records from a dataset JSON file (`{"records": [...]}`), sorts
/// them by date key, and rejects duplicates.
pub fn load_records(path: &Path) -> Result<Vec<DayRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading dataset {}", path.display()))?;
    let dataset: Dataset = serde_json::from_str(&text)
        .with_context(|| format!("parsing dataset {}", path.display()))?;

    let mut records = dataset.records;

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.date_key.clone()) {
            bail!("duplicate date key '{}' in dataset", record.date_key);
        }
        if record.samples.len() > SLOTS_PER_DAY {
            bail!(
                "record '{}' has {} samples, a day has at most {} slots",
                record.date_key,
                record.samples.len(),
                SLOTS_PER_DAY
            );
        }
    }

    records.sort_by_key(|r| {
        parse_date_key(&r.date_key).unwrap_or((i32::MAX, u32::MAX, u32::MAX))
    });

    info!(records = records.len(), path = %path.display(), "Dataset loaded");
    Ok(records)
}

/// Loads a [`ScoringConfig`] from JSON, or the defaults when no path is
/// given.
pub fn load_config(path: Option<&Path>) -> Result<ScoringConfig> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))
        }
        None => Ok(ScoringConfig::default()),
    }
}

#[derive(Debug, Deserialize)]
struct ProfileFile {
    primary: Profile,
    alternate: Profile,
}

/// Loads the primary/alternate profile pair from JSON
/// (`{"primary": {...}, "alternate": {...}}`), or the built-in tables when
/// no path is given. Both profiles are validated either way.
pub fn load_profiles(path: Option<&Path>) -> Result<(Profile, Profile)> {
    let (primary, alternate) = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading profiles {}", path.display()))?;
            let file: ProfileFile = serde_json::from_str(&text)
                .with_context(|| format!("parsing profiles {}", path.display()))?;
            (file.primary, file.alternate)
        }
        None => crate::scoring::rules::default_profiles(),
    };

    validate_profile(&primary)?;
    validate_profile(&alternate)?;

    for profile in [&primary, &alternate] {
        for rule in &profile.rules {
            debug!(
                profile = %profile.id,
                range = %format_rule_range(rule),
                factor = rule.factor,
                "Rule loaded"
            );
        }
    }

    Ok((primary, alternate))
}
