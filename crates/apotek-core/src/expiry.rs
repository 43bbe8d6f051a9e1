//! # Expiry Prioritization
//!
//! Urgency ordering for product lots, used to sort lot lists for operator
//! review during allocation.
//!
//! ## Bucket Ladder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  days until expiry      bucket        shown as                          │
//! │  ─────────────────      ──────────    ─────────────                     │
//! │  < 0                    Expired       "expired"        ← most urgent    │
//! │  0                      Today         "expires today"                   │
//! │  1                      Tomorrow      "expires tomorrow"                │
//! │  2..=3                  ThreeDays     "≤ 3 days"                        │
//! │  4..=7                  Week          "≤ 7 days"                        │
//! │  8..=14                 TwoWeeks      "≤ 14 days"                       │
//! │  15..=30                Month         "≤ 30 days"                       │
//! │  31..=90                Quarter       "≤ 90 days"                       │
//! │  > 90                   Later         "> 90 days"                       │
//! │  (no expiry date)       NoExpiry      "no expiry"      ← least urgent   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ordering is advisory: it drives a badge and a default sort order in
//! lot pickers, and never overrides an operator's explicit lot choice.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::ProductLot;

// =============================================================================
// Days Until Expiry
// =============================================================================

/// Whole days from `today` to `expiry`. Negative when the lot is overdue.
#[inline]
pub fn days_until(expiry: NaiveDate, today: NaiveDate) -> i64 {
    (expiry - today).num_days()
}

/// Monotonic urgency sort key. Lots with no expiry date sort last
/// (treated as infinite shelf life, lowest urgency).
#[inline]
pub fn urgency_key(expiry: Option<NaiveDate>, today: NaiveDate) -> i64 {
    match expiry {
        Some(date) => days_until(date, today),
        None => i64::MAX,
    }
}

// =============================================================================
// Expiry Bucket
// =============================================================================

/// Urgency bucket for a lot's expiry date, in ascending rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryBucket {
    Expired,
    Today,
    Tomorrow,
    ThreeDays,
    Week,
    TwoWeeks,
    Month,
    Quarter,
    Later,
    NoExpiry,
}

impl ExpiryBucket {
    /// Classifies a days-until-expiry value into its bucket.
    pub fn classify(days: Option<i64>) -> Self {
        match days {
            None => ExpiryBucket::NoExpiry,
            Some(d) if d < 0 => ExpiryBucket::Expired,
            Some(0) => ExpiryBucket::Today,
            Some(1) => ExpiryBucket::Tomorrow,
            Some(d) if d <= 3 => ExpiryBucket::ThreeDays,
            Some(d) if d <= 7 => ExpiryBucket::Week,
            Some(d) if d <= 14 => ExpiryBucket::TwoWeeks,
            Some(d) if d <= 30 => ExpiryBucket::Month,
            Some(d) if d <= 90 => ExpiryBucket::Quarter,
            Some(_) => ExpiryBucket::Later,
        }
    }

    /// Classifies a lot directly.
    pub fn for_lot(lot: &ProductLot, today: NaiveDate) -> Self {
        Self::classify(lot.expiry_date.map(|d| days_until(d, today)))
    }

    /// Ascending urgency rank (0 = most urgent).
    pub const fn rank(&self) -> u8 {
        match self {
            ExpiryBucket::Expired => 0,
            ExpiryBucket::Today => 1,
            ExpiryBucket::Tomorrow => 2,
            ExpiryBucket::ThreeDays => 3,
            ExpiryBucket::Week => 4,
            ExpiryBucket::TwoWeeks => 5,
            ExpiryBucket::Month => 6,
            ExpiryBucket::Quarter => 7,
            ExpiryBucket::Later => 8,
            ExpiryBucket::NoExpiry => 9,
        }
    }

    /// Badge label for lot pickers.
    pub const fn label(&self) -> &'static str {
        match self {
            ExpiryBucket::Expired => "expired",
            ExpiryBucket::Today => "expires today",
            ExpiryBucket::Tomorrow => "expires tomorrow",
            ExpiryBucket::ThreeDays => "≤ 3 days",
            ExpiryBucket::Week => "≤ 7 days",
            ExpiryBucket::TwoWeeks => "≤ 14 days",
            ExpiryBucket::Month => "≤ 30 days",
            ExpiryBucket::Quarter => "≤ 90 days",
            ExpiryBucket::Later => "> 90 days",
            ExpiryBucket::NoExpiry => "no expiry",
        }
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Sorts lots most-urgent-first: soonest expiry first, no-expiry last,
/// lot number as tiebreak so the order is deterministic for display.
pub fn sort_by_urgency(lots: &mut [ProductLot], today: NaiveDate) {
    lots.sort_by(|a, b| {
        urgency_key(a.expiry_date, today)
            .cmp(&urgency_key(b.expiry_date, today))
            .then_with(|| a.lot_number.cmp(&b.lot_number))
    });
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lot(lot_number: &str, expiry: Option<NaiveDate>) -> ProductLot {
        ProductLot {
            id: format!("lot-{lot_number}"),
            product_id: "p-1".to_string(),
            warehouse_id: "w-1".to_string(),
            lot_number: lot_number.to_string(),
            batch_code: None,
            expiry_date: expiry,
            quantity: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_days_until() {
        let today = date(2024, 6, 15);
        assert_eq!(days_until(date(2024, 6, 15), today), 0);
        assert_eq!(days_until(date(2024, 6, 17), today), 2);
        assert_eq!(days_until(date(2024, 6, 14), today), -1);
    }

    #[test]
    fn test_classify_buckets() {
        assert_eq!(ExpiryBucket::classify(Some(-5)), ExpiryBucket::Expired);
        assert_eq!(ExpiryBucket::classify(Some(-1)), ExpiryBucket::Expired);
        assert_eq!(ExpiryBucket::classify(Some(0)), ExpiryBucket::Today);
        assert_eq!(ExpiryBucket::classify(Some(1)), ExpiryBucket::Tomorrow);
        assert_eq!(ExpiryBucket::classify(Some(2)), ExpiryBucket::ThreeDays);
        assert_eq!(ExpiryBucket::classify(Some(3)), ExpiryBucket::ThreeDays);
        assert_eq!(ExpiryBucket::classify(Some(7)), ExpiryBucket::Week);
        assert_eq!(ExpiryBucket::classify(Some(14)), ExpiryBucket::TwoWeeks);
        assert_eq!(ExpiryBucket::classify(Some(30)), ExpiryBucket::Month);
        assert_eq!(ExpiryBucket::classify(Some(90)), ExpiryBucket::Quarter);
        assert_eq!(ExpiryBucket::classify(Some(91)), ExpiryBucket::Later);
        assert_eq!(ExpiryBucket::classify(None), ExpiryBucket::NoExpiry);
    }

    #[test]
    fn test_bucket_ranks_are_monotonic() {
        let ladder = [
            ExpiryBucket::Expired,
            ExpiryBucket::Today,
            ExpiryBucket::Tomorrow,
            ExpiryBucket::ThreeDays,
            ExpiryBucket::Week,
            ExpiryBucket::TwoWeeks,
            ExpiryBucket::Month,
            ExpiryBucket::Quarter,
            ExpiryBucket::Later,
            ExpiryBucket::NoExpiry,
        ];
        for pair in ladder.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
            assert!(pair[0] < pair[1]);
        }
    }

    /// -1 day sorts before 0 days, before 5 days, before no expiry.
    #[test]
    fn test_urgency_ordering_is_monotonic() {
        let today = date(2024, 6, 15);
        let overdue = urgency_key(Some(date(2024, 6, 14)), today);
        let today_key = urgency_key(Some(date(2024, 6, 15)), today);
        let five_days = urgency_key(Some(date(2024, 6, 20)), today);
        let never = urgency_key(None, today);

        assert!(overdue < today_key);
        assert!(today_key < five_days);
        assert!(five_days < never);
    }

    #[test]
    fn test_sort_by_urgency() {
        let today = date(2024, 6, 15);
        let mut lots = vec![
            lot("C", None),
            lot("B", Some(date(2024, 6, 20))),
            lot("A", Some(date(2024, 6, 14))),
            lot("D", Some(date(2024, 6, 15))),
        ];

        sort_by_urgency(&mut lots, today);

        let order: Vec<&str> = lots.iter().map(|l| l.lot_number.as_str()).collect();
        assert_eq!(order, vec!["A", "D", "B", "C"]);
    }

    #[test]
    fn test_sort_tiebreak_on_lot_number() {
        let today = date(2024, 6, 15);
        let expiry = Some(date(2024, 7, 1));
        let mut lots = vec![lot("B2", expiry), lot("A1", expiry)];

        sort_by_urgency(&mut lots, today);

        assert_eq!(lots[0].lot_number, "A1");
        assert_eq!(lots[1].lot_number, "B2");
    }
}
