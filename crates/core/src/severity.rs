//! Threshold-crossing classification for the alert pipeline.
//!
//! Pure logic -- no database access. The alert engine fetches the reading,
//! the subscriber set, and the thresholds, then calls [`classify_crossing`]
//! per threshold to decide whether and how severely a boundary was crossed.

use serde::Serialize;

/// Severity assigned to a confirmed threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    /// Database representation (`alerts.severity` column).
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

/// Which boundary of the threshold was crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingKind {
    AboveMax,
    BelowMin,
}

/// A confirmed crossing: the violated limit and the severity to record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub kind: CrossingKind,
    pub severity: AlertSeverity,
    /// The threshold boundary that was violated (max or min value).
    pub limit: f64,
}

/// Classify a measured value against an optional min/max threshold pair.
///
/// Returns `None` when no boundary is crossed. Comparisons are strict: a
/// value exactly equal to `max` or `min` does not cross.
///
/// Severity policy:
/// - `value > max`: escalates with percentage overshoot -- >50% CRITICAL,
///   >25% HIGH, >10% MEDIUM, otherwise LOW.
/// - `value < min`: fixed MEDIUM. The asymmetry is inherited behavior,
///   kept as-is pending a product decision.
pub fn classify_crossing(value: f64, min: Option<f64>, max: Option<f64>) -> Option<Crossing> {
    if let Some(max) = max {
        if value > max {
            return Some(Crossing {
                kind: CrossingKind::AboveMax,
                severity: overshoot_severity(value, max),
                limit: max,
            });
        }
    }

    if let Some(min) = min {
        if value < min {
            return Some(Crossing {
                kind: CrossingKind::BelowMin,
                severity: AlertSeverity::Medium,
                limit: min,
            });
        }
    }

    None
}

/// Map percentage overshoot above `max` onto a severity.
///
/// Boundaries are strict (`>`), so an overshoot of exactly 10% stays LOW
/// and exactly 50% stays HIGH. A zero `max` cannot yield a percentage;
/// any overshoot above it is treated as unbounded and escalates straight
/// to CRITICAL.
fn overshoot_severity(value: f64, max: f64) -> AlertSeverity {
    let pct = if max == 0.0 {
        f64::INFINITY
    } else {
        (value - max) * 100.0 / max.abs()
    };

    if pct > 50.0 {
        AlertSeverity::Critical
    } else if pct > 25.0 {
        AlertSeverity::High
    } else if pct > 10.0 {
        AlertSeverity::Medium
    } else {
        AlertSeverity::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_equal_to_max_does_not_cross() {
        assert_eq!(classify_crossing(100.0, None, Some(100.0)), None);
    }

    #[test]
    fn value_equal_to_min_does_not_cross() {
        assert_eq!(classify_crossing(10.0, Some(10.0), None), None);
    }

    #[test]
    fn no_thresholds_never_cross() {
        assert_eq!(classify_crossing(1e9, None, None), None);
    }

    #[test]
    fn overshoot_of_51_percent_is_critical() {
        let crossing = classify_crossing(151.0, None, Some(100.0)).expect("should cross");
        assert_eq!(crossing.kind, CrossingKind::AboveMax);
        assert_eq!(crossing.severity, AlertSeverity::Critical);
        assert_eq!(crossing.limit, 100.0);
    }

    #[test]
    fn overshoot_of_exactly_10_percent_is_low() {
        // Boundary is strict: 10% overshoot does not escalate to MEDIUM.
        let crossing = classify_crossing(110.0, None, Some(100.0)).expect("should cross");
        assert_eq!(crossing.severity, AlertSeverity::Low);
    }

    #[test]
    fn overshoot_just_above_10_percent_is_medium() {
        let crossing = classify_crossing(110.5, None, Some(100.0)).expect("should cross");
        assert_eq!(crossing.severity, AlertSeverity::Medium);
    }

    #[test]
    fn overshoot_between_25_and_50_percent_is_high() {
        let crossing = classify_crossing(130.0, None, Some(100.0)).expect("should cross");
        assert_eq!(crossing.severity, AlertSeverity::High);
    }

    #[test]
    fn overshoot_of_exactly_50_percent_stays_high() {
        let crossing = classify_crossing(150.0, None, Some(100.0)).expect("should cross");
        assert_eq!(crossing.severity, AlertSeverity::High);
    }

    #[test]
    fn undershoot_is_fixed_medium_regardless_of_depth() {
        let shallow = classify_crossing(9.9, Some(10.0), None).expect("should cross");
        let deep = classify_crossing(-500.0, Some(10.0), None).expect("should cross");
        assert_eq!(shallow.severity, AlertSeverity::Medium);
        assert_eq!(deep.severity, AlertSeverity::Medium);
        assert_eq!(deep.kind, CrossingKind::BelowMin);
    }

    #[test]
    fn max_takes_precedence_when_both_bounds_set() {
        // A value above max with both bounds configured reports the max crossing.
        let crossing = classify_crossing(200.0, Some(50.0), Some(100.0)).expect("should cross");
        assert_eq!(crossing.kind, CrossingKind::AboveMax);
    }

    #[test]
    fn zero_max_escalates_to_critical() {
        let crossing = classify_crossing(5.0, None, Some(0.0)).expect("should cross");
        assert_eq!(crossing.severity, AlertSeverity::Critical);
    }

    #[test]
    fn negative_max_uses_absolute_denominator() {
        // max = -10, value = -4: overshoot is 60% of |max| -> CRITICAL.
        let crossing = classify_crossing(-4.0, None, Some(-10.0)).expect("should cross");
        assert_eq!(crossing.severity, AlertSeverity::Critical);
    }

    #[test]
    fn within_bounds_reports_nothing() {
        assert_eq!(classify_crossing(50.0, Some(10.0), Some(100.0)), None);
    }
}
