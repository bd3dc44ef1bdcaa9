use chrono::NaiveDate;
use serde::Serialize;

use crate::ledger::{TrialPolicy, UsageRecord, evaluate};

#[derive(Debug, Serialize)]
pub struct TrialStatusResponse {
    pub identifier: String,
    pub usage_count: i64,
    pub last_used_date: NaiveDate,
    pub is_paid: bool,
    pub can_use: bool,
    /// `None` once paid.
    pub remaining_uses: Option<i64>,
    pub payment_link: Option<String>,
}

impl TrialStatusResponse {
    pub fn new(record: UsageRecord, policy: &TrialPolicy, payment_link: Option<String>) -> Self {
        let decision = evaluate(&record, policy);
        Self {
            identifier: record.identifier,
            usage_count: record.usage_count,
            last_used_date: record.last_used_date,
            is_paid: record.is_paid,
            can_use: decision.is_allowed(),
            remaining_uses: decision.remaining_uses(),
            payment_link,
        }
    }
}
