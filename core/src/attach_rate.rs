//! Attach-rate resolution over monthly and daily sales records.
//!
//! Resolution rules:
//!   1. A stored `attach_pct` on a month entry is the ingestion pipeline's
//!      authoritative reading: scale it to a 0-100 percentage and use it
//!      as-is. Only when it is absent is the rate derived from counts
//!      (plan / device x 100).
//!   2. Multiple records for the same store+brand (different category
//!      pairings) contribute one reading each; the combined rate is the
//!      average over the readings actually present, never diluted by
//!      records with no data for the month.
//!   3. Short trailing windows sum daily entries inside the window. A
//!      record with no daily data in the window falls back to its monthly
//!      reading (rate) and `monthly x window_days / 30` (totals).
//!   4. Missing data at any level resolves to 0 - an expected outcome,
//!      not an error.

use crate::{
    error::{EngineError, RagResult},
    model::{MonthlySales, SalesRecord},
};
use chrono::{Datelike, Duration, NaiveDate};

/// Current- and previous-period attach rates, as 0-100 percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePair {
    pub current: f64,
    pub previous: f64,
}

/// Summed volume figures for one period.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodTotals {
    pub device_sales: i64,
    pub plan_sales: i64,
    pub revenue: f64,
}

/// The month preceding (year, month), rolling January back into December
/// of the prior year.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn entry_reading(entry: &MonthlySales) -> f64 {
    match entry.attach_pct {
        Some(frac) => frac * 100.0,
        None if entry.device_sales > 0 => {
            entry.plan_sales as f64 / entry.device_sales as f64 * 100.0
        }
        None => 0.0,
    }
}

/// Average attach rate across the records that have a reading for the
/// given month. Records without a matching month entry contribute nothing
/// to the denominator.
fn monthly_rate(records: &[&SalesRecord], year: i32, month: u32) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for record in records.iter().filter(|r| r.year == year) {
        if let Some(entry) = record.month_entry(month) {
            sum += entry_reading(entry);
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Current and previous attach rates for a calendar month, with the
/// December rollover handled for January.
pub fn monthly_attach_rates(records: &[&SalesRecord], year: i32, month: u32) -> RagResult<RatePair> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::InvalidMonth { month });
    }
    let (prev_year, prev_month) = previous_month(year, month);
    Ok(RatePair {
        current: monthly_rate(records, year, month),
        previous: monthly_rate(records, prev_year, prev_month),
    })
}

/// Summed device/plan/revenue figures for one calendar month.
pub fn month_totals(records: &[&SalesRecord], year: i32, month: u32) -> PeriodTotals {
    let mut totals = PeriodTotals::default();
    for record in records.iter().filter(|r| r.year == year) {
        if let Some(entry) = record.month_entry(month) {
            totals.device_sales += entry.device_sales;
            totals.plan_sales += entry.plan_sales;
            totals.revenue += entry.revenue;
        }
    }
    totals
}

/// Attach rate over a trailing window per record: daily sums when daily
/// data covers the window, monthly fallback otherwise, None when the
/// record has no data at all for the period.
fn record_window_reading(
    record: &SalesRecord,
    start: NaiveDate,
    end: NaiveDate,
) -> Option<f64> {
    let mut device = 0i64;
    let mut plan = 0i64;
    let mut pct_sum = 0.0;
    let mut pct_count = 0usize;
    let mut seen = false;

    for day in record.daily.values().flatten() {
        if day.date < start || day.date > end {
            continue;
        }
        seen = true;
        device += day.device_sales;
        plan += day.plan_sales;
        if let Some(frac) = day.attach_pct {
            pct_sum += frac * 100.0;
            pct_count += 1;
        }
    }

    if seen {
        if device > 0 {
            Some(plan as f64 / device as f64 * 100.0)
        } else if pct_count > 0 {
            Some(pct_sum / pct_count as f64)
        } else {
            Some(0.0)
        }
    } else {
        // No granular data in the window: fall back to the monthly reading
        // for the month the window ends in.
        record
            .month_entry(end.month())
            .filter(|_| record.year == end.year())
            .map(entry_reading)
    }
}

/// Attach rates for the trailing `window_days` window ending on
/// `reference_date` (inclusive) and the equal-length window before it.
pub fn window_attach_rates(
    records: &[&SalesRecord],
    reference_date: NaiveDate,
    window_days: u32,
) -> RatePair {
    let days = window_days.max(1) as i64;
    let cur_start = reference_date - Duration::days(days - 1);
    let prev_end = cur_start - Duration::days(1);
    let prev_start = prev_end - Duration::days(days - 1);

    RatePair {
        current: average_window_readings(records, cur_start, reference_date),
        previous: average_window_readings(records, prev_start, prev_end),
    }
}

fn average_window_readings(records: &[&SalesRecord], start: NaiveDate, end: NaiveDate) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for record in records {
        if let Some(reading) = record_window_reading(record, start, end) {
            sum += reading;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Volume totals for a trailing window. Daily sums where daily data
/// exists; otherwise the month's totals scaled by `window_days / 30`.
pub fn window_totals(
    records: &[&SalesRecord],
    reference_date: NaiveDate,
    window_days: u32,
) -> PeriodTotals {
    let days = window_days.max(1) as i64;
    let start = reference_date - Duration::days(days - 1);
    let mut totals = PeriodTotals::default();

    for record in records {
        let mut seen = false;
        for day in record.daily.values().flatten() {
            if day.date < start || day.date > reference_date {
                continue;
            }
            seen = true;
            totals.device_sales += day.device_sales;
            totals.plan_sales += day.plan_sales;
            totals.revenue += day.revenue;
        }
        if !seen && record.year == reference_date.year() {
            if let Some(entry) = record.month_entry(reference_date.month()) {
                let scale = days as f64 / 30.0;
                totals.device_sales += (entry.device_sales as f64 * scale).round() as i64;
                totals.plan_sales += (entry.plan_sales as f64 * scale).round() as i64;
                totals.revenue += entry.revenue * scale;
            }
        }
    }
    totals
}
