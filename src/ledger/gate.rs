use chrono::NaiveDate;
use serde::Serialize;

use super::record::UsageRecord;

pub const FREE_USES: i64 = 5;
pub const RESET_WINDOW_DAYS: i64 = 30;

/// Free-trial limits. Fixed at 5 uses per 30-day window; carried as a value rather than globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialPolicy {
    pub max_free_uses: i64,
    pub reset_window_days: i64,
}

impl Default for TrialPolicy {
    fn default() -> Self {
        Self {
            max_free_uses: FREE_USES,
            reset_window_days: RESET_WINDOW_DAYS,
        }
    }
}

impl TrialPolicy {
    /// True when `last_used` lies strictly more than the window before `today`.
    pub fn window_elapsed(&self, last_used: NaiveDate, today: NaiveDate) -> bool {
        today.signed_duration_since(last_used).num_days() > self.reset_window_days
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    /// `remaining` is `None` for paid records.
    Allowed { remaining: Option<i64> },
    Blocked,
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed { .. })
    }

    /// Uses left before the gate closes. `None` means unlimited.
    pub fn remaining_uses(&self) -> Option<i64> {
        match self {
            GateDecision::Allowed { remaining } => *remaining,
            GateDecision::Blocked => Some(0),
        }
    }
}

pub fn can_use(record: &UsageRecord, policy: &TrialPolicy) -> bool {
    record.is_paid || record.usage_count < policy.max_free_uses
}

pub fn evaluate(record: &UsageRecord, policy: &TrialPolicy) -> GateDecision {
    if record.is_paid {
        GateDecision::Allowed { remaining: None }
    } else if can_use(record, policy) {
        GateDecision::Allowed {
            remaining: Some(policy.max_free_uses - record.usage_count),
        }
    } else {
        GateDecision::Blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(usage_count: i64, is_paid: bool) -> UsageRecord {
        UsageRecord {
            identifier: "198.51.100.4".into(),
            usage_count,
            last_used_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            is_paid,
            contact_email: None,
        }
    }

    #[test]
    fn unpaid_under_limit_is_allowed() {
        let policy = TrialPolicy::default();
        for count in 0..5 {
            assert!(can_use(&record(count, false), &policy), "count {count}");
        }
        assert_eq!(
            evaluate(&record(3, false), &policy),
            GateDecision::Allowed { remaining: Some(2) }
        );
    }

    #[test]
    fn unpaid_at_or_over_limit_is_blocked() {
        let policy = TrialPolicy::default();
        assert!(!can_use(&record(5, false), &policy));
        assert!(!can_use(&record(12, false), &policy));
        assert_eq!(evaluate(&record(5, false), &policy), GateDecision::Blocked);
    }

    #[test]
    fn paid_is_always_allowed() {
        let policy = TrialPolicy::default();
        for count in [0, 5, 1_000] {
            assert!(can_use(&record(count, true), &policy));
            assert_eq!(
                evaluate(&record(count, true), &policy),
                GateDecision::Allowed { remaining: None }
            );
        }
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let policy = TrialPolicy::default();
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let thirty_days = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        let thirty_one_days = NaiveDate::from_ymd_opt(2024, 5, 30).unwrap();

        assert!(!policy.window_elapsed(thirty_days, today));
        assert!(policy.window_elapsed(thirty_one_days, today));
        assert!(!policy.window_elapsed(today, today));
    }
}
