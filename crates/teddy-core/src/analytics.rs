//! # Report Analytics
//!
//! Pure aggregations over report summaries for the reports and analytics
//! views: range statistics, per-weekday profit, and the phone-versus-
//! accessory split. Everything is computed from the denormalized totals -
//! no entry lists are deserialized.

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::ReportSummary;

// =============================================================================
// Range Statistics
// =============================================================================

/// Headline figures for a date range of reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RangeStats {
    pub report_count: usize,
    pub phone_profit_cents: i64,
    pub accessory_profit_cents: i64,
    pub total_profit_cents: i64,
    pub thabrew_total_cents: i64,
    pub kelan_total_cents: i64,
}

/// Sums a range of report summaries.
pub fn range_stats(reports: &[ReportSummary]) -> RangeStats {
    let phone: Money = reports
        .iter()
        .map(|r| Money::from_cents(r.phone_profit_cents))
        .sum();
    let accessory: Money = reports
        .iter()
        .map(|r| Money::from_cents(r.accessory_profit_cents))
        .sum();

    RangeStats {
        report_count: reports.len(),
        phone_profit_cents: phone.cents(),
        accessory_profit_cents: accessory.cents(),
        total_profit_cents: (phone + accessory).cents(),
        thabrew_total_cents: reports.iter().map(|r| r.thabrew_total_cents).sum(),
        kelan_total_cents: reports.iter().map(|r| r.kelan_total_cents).sum(),
    }
}

// =============================================================================
// Weekday Profile
// =============================================================================

/// Profit aggregate for one weekday across a range of reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeekdayProfit {
    /// English weekday name ("Monday" .. "Sunday").
    pub weekday: String,
    pub report_count: usize,
    pub total_profit_cents: i64,
    /// Total divided by count, zero when the weekday has no reports.
    pub average_profit_cents: i64,
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Buckets report profits by weekday, Monday through Sunday.
///
/// Always returns seven rows; weekdays without reports show zeros. Shows
/// which days actually earn - shop hours planning data.
pub fn weekday_profits(reports: &[ReportSummary]) -> Vec<WeekdayProfit> {
    WEEKDAYS
        .iter()
        .map(|&day| {
            let mut count = 0usize;
            let mut total = Money::zero();

            for report in reports.iter().filter(|r| r.report_date.weekday() == day) {
                count += 1;
                total += report.total_profit();
            }

            WeekdayProfit {
                weekday: weekday_name(day).to_string(),
                report_count: count,
                total_profit_cents: total.cents(),
                average_profit_cents: if count == 0 {
                    0
                } else {
                    total.cents() / count as i64
                },
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn report(y: i32, m: u32, d: u32, phone: i64, accessory: i64) -> ReportSummary {
        ReportSummary {
            id: format!("{y}-{m}-{d}"),
            report_date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            phone_profit_cents: Money::from_rupees(phone).cents(),
            accessory_profit_cents: Money::from_rupees(accessory).cents(),
            thabrew_total_cents: Money::from_rupees(phone * 8 / 10).cents(),
            kelan_total_cents: Money::from_rupees(phone * 2 / 10).cents(),
        }
    }

    #[test]
    fn test_range_stats_sums() {
        // 2026-07-13 is a Monday
        let reports = [
            report(2026, 7, 13, 20_000, 1_000),
            report(2026, 7, 14, 10_000, 500),
        ];

        let stats = range_stats(&reports);
        assert_eq!(stats.report_count, 2);
        assert_eq!(stats.phone_profit_cents, Money::from_rupees(30_000).cents());
        assert_eq!(stats.accessory_profit_cents, Money::from_rupees(1_500).cents());
        assert_eq!(stats.total_profit_cents, Money::from_rupees(31_500).cents());
        assert_eq!(stats.kelan_total_cents, Money::from_rupees(6_000).cents());
    }

    #[test]
    fn test_range_stats_empty() {
        assert_eq!(range_stats(&[]), RangeStats::default());
    }

    #[test]
    fn test_weekday_buckets_and_averages() {
        // Two Mondays and one Tuesday
        let reports = [
            report(2026, 7, 13, 10_000, 0),
            report(2026, 7, 20, 30_000, 0),
            report(2026, 7, 14, 5_000, 0),
        ];

        let profile = weekday_profits(&reports);
        assert_eq!(profile.len(), 7);

        let monday = &profile[0];
        assert_eq!(monday.weekday, "Monday");
        assert_eq!(monday.report_count, 2);
        assert_eq!(monday.total_profit_cents, Money::from_rupees(40_000).cents());
        assert_eq!(monday.average_profit_cents, Money::from_rupees(20_000).cents());

        let tuesday = &profile[1];
        assert_eq!(tuesday.report_count, 1);
        assert_eq!(tuesday.average_profit_cents, Money::from_rupees(5_000).cents());

        // Quiet weekdays report zeros rather than disappearing
        let sunday = &profile[6];
        assert_eq!(sunday.report_count, 0);
        assert_eq!(sunday.average_profit_cents, 0);
    }
}
