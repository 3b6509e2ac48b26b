//! Conformance scoring and financial impact engine.
//!
//! This module reduces raw per-slot samples into representative values,
//! weights them by their share of production, classifies the resulting
//! conformance percentage against piecewise rule profiles, and rolls
//! per-period statistics up across weeks and months.

pub mod aggregate;
pub mod period;
pub mod report;
pub mod rollup;
pub mod rules;
pub mod utility;
pub mod weight;
