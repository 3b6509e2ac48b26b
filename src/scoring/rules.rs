//! Piecewise rule tables mapping a conformance percentage to a
//! classification and a financial factor.
//!
//! Rules are plain data (serde round-trips them) so external tooling can
//! edit a profile without touching code. Matching walks the rules in
//! declaration order and takes the first hit; the engine does not enforce
//! that rules are non-overlapping.

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Comparison kind for one side of a rule's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundOp {
    /// Strict comparison (`>` below, `<` above).
    Exclusive,
    /// `>=` below, `<=` above.
    Inclusive,
}

/// Classification severity attached to a rule, from contractual rejection
/// down to the highest reward band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Danger,
    Warning,
    SuccessLight,
    SuccessMedium,
    SuccessHigh,
    SuccessMax,
}

/// Escape hatch for a rule whose test cannot be expressed as a bound pair.
///
/// The only condition used in practice is the `x < 65` safety net on the
/// standard profile's reject rule, whose normal bound semantics would
/// otherwise misfire exactly at the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum RawCondition {
    LessThan(f64),
}

impl RawCondition {
    fn matches(&self, value: f64) -> bool {
        match self {
            RawCondition::LessThan(threshold) => value < *threshold,
        }
    }
}

/// One piecewise band of a profile.
///
/// `factor` is in percentage points of the period's production quantity;
/// a factor of -100 or below marks the terminal "rejected" classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeRule {
    pub lower: f64,
    pub lower_op: BoundOp,
    pub upper: f64,
    pub upper_op: BoundOp,
    pub label: String,
    pub severity: Severity,
    pub factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_condition: Option<RawCondition>,
}

impl RangeRule {
    /// Whether `value` falls in this rule's band. A `raw_condition`
    /// replaces the bound pair entirely.
    pub fn matches(&self, value: f64) -> bool {
        if let Some(cond) = &self.raw_condition {
            return cond.matches(value);
        }
        let lower_ok = match self.lower_op {
            BoundOp::Exclusive => value > self.lower,
            BoundOp::Inclusive => value >= self.lower,
        };
        let upper_ok = match self.upper_op {
            BoundOp::Exclusive => value < self.upper,
            BoundOp::Inclusive => value <= self.upper,
        };
        lower_ok && upper_ok
    }
}

/// A named, ordered rule table. Two profiles participate in every scoring
/// call: the contractual standard table and a user-tunable custom one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub rules: Vec<RangeRule>,
}

/// Returns the first rule in declaration order that matches `percentage`.
pub fn match_rule(percentage: f64, profile: &Profile) -> Option<&RangeRule> {
    profile.rules.iter().find(|r| r.matches(percentage))
}

/// Rejects a profile with non-finite bounds or factors.
///
/// Malformed rule tables are fatal configuration errors and are surfaced
/// immediately rather than silently defaulted.
pub fn validate_profile(profile: &Profile) -> Result<()> {
    ensure!(
        !profile.rules.is_empty(),
        "profile '{}' has no rules",
        profile.id
    );
    for (i, rule) in profile.rules.iter().enumerate() {
        ensure!(
            rule.lower.is_finite() && rule.upper.is_finite(),
            "profile '{}' rule {} has non-finite bounds",
            profile.id,
            i
        );
        ensure!(
            rule.factor.is_finite(),
            "profile '{}' rule {} has non-finite factor",
            profile.id,
            i
        );
    }
    Ok(())
}

/// Renders a rule's range as text for logs and reports, e.g. `85 <= x < 90`
/// or `x < 65` for a raw condition.
pub fn format_rule_range(rule: &RangeRule) -> String {
    if let Some(RawCondition::LessThan(t)) = &rule.raw_condition {
        return format!("x < {}", t);
    }
    let lower_op = match rule.lower_op {
        BoundOp::Exclusive => "<",
        BoundOp::Inclusive => "<=",
    };
    let upper_op = match rule.upper_op {
        BoundOp::Exclusive => "<",
        BoundOp::Inclusive => "<=",
    };
    if rule.upper >= 1000.0 {
        let op = match rule.lower_op {
            BoundOp::Exclusive => ">",
            BoundOp::Inclusive => ">=",
        };
        return format!("x {} {}", op, rule.lower);
    }
    if rule.lower <= 0.0 {
        return format!("x {} {}", upper_op, rule.upper);
    }
    format!(
        "{} {} x {} {}",
        rule.lower, lower_op, upper_op, rule.upper
    )
}

fn rule(
    lower: f64,
    lower_op: BoundOp,
    upper: f64,
    upper_op: BoundOp,
    label: &str,
    severity: Severity,
    factor: f64,
) -> RangeRule {
    RangeRule {
        lower,
        lower_op,
        upper,
        upper_op,
        label: label.to_string(),
        severity,
        factor,
        raw_condition: None,
    }
}

/// The contractual standard profile and the tunable custom profile, ported
/// from the plant's rule tables.
pub fn default_profiles() -> (Profile, Profile) {
    use BoundOp::{Exclusive, Inclusive};
    use Severity::*;

    let standard = Profile {
        id: "ccs_standard".to_string(),
        name: "Standard rules (contractual)".to_string(),
        rules: vec![
            RangeRule {
                raw_condition: Some(RawCondition::LessThan(65.0)),
                ..rule(
                    65.0,
                    Exclusive,
                    65.0,
                    Exclusive,
                    "Rejected (REj)",
                    Danger,
                    -100.0,
                )
            },
            rule(
                65.0,
                Exclusive,
                70.0,
                Inclusive,
                "2% production penalty",
                Warning,
                -2.0,
            ),
            rule(
                70.0,
                Exclusive,
                73.0,
                Inclusive,
                "1% production penalty",
                Warning,
                -1.0,
            ),
            rule(
                73.0,
                Exclusive,
                75.0,
                Inclusive,
                "0.5% production penalty",
                Warning,
                -0.5,
            ),
            rule(
                80.0,
                Inclusive,
                83.0,
                Exclusive,
                "0.5% production reward",
                SuccessLight,
                0.5,
            ),
            rule(
                83.0,
                Inclusive,
                85.0,
                Exclusive,
                "1% production reward",
                SuccessMedium,
                1.0,
            ),
            rule(
                85.0,
                Inclusive,
                90.0,
                Exclusive,
                "1.5% production reward",
                SuccessHigh,
                1.5,
            ),
            rule(
                90.0,
                Inclusive,
                1000.0,
                Exclusive,
                "2% production reward",
                SuccessMax,
                2.0,
            ),
        ],
    };

    let custom = Profile {
        id: "ccs_custom".to_string(),
        name: "New rules (custom)".to_string(),
        rules: vec![
            rule(
                0.0,
                Inclusive,
                60.0,
                Exclusive,
                "2% production penalty",
                Danger,
                -2.0,
            ),
            rule(
                60.0,
                Inclusive,
                65.0,
                Inclusive,
                "1.5% production penalty",
                Danger,
                -1.5,
            ),
            rule(
                65.0,
                Exclusive,
                70.0,
                Inclusive,
                "1% production penalty",
                Warning,
                -1.0,
            ),
            rule(
                70.0,
                Exclusive,
                73.0,
                Inclusive,
                "0.5% production penalty",
                Warning,
                -0.5,
            ),
            rule(
                80.0,
                Inclusive,
                83.0,
                Exclusive,
                "0.5% production reward",
                SuccessLight,
                0.5,
            ),
            rule(
                83.0,
                Inclusive,
                85.0,
                Exclusive,
                "1% production reward",
                SuccessMedium,
                1.0,
            ),
            rule(
                85.0,
                Inclusive,
                90.0,
                Exclusive,
                "1.5% production reward",
                SuccessHigh,
                1.5,
            ),
            rule(
                90.0,
                Inclusive,
                1000.0,
                Exclusive,
                "2% production reward",
                SuccessMax,
                2.0,
            ),
        ],
    };

    (standard, custom)
}
