use chrono::NaiveDate;
use retailrag_core::attach_rate::{
    month_totals, monthly_attach_rates, previous_month, window_attach_rates, window_totals,
};
use retailrag_core::model::{DailySales, MonthlySales, SalesRecord};
use std::collections::BTreeMap;

fn record(category: &str, year: i32) -> SalesRecord {
    SalesRecord {
        store_id: "s-1".into(),
        brand_id: "b-1".into(),
        category_id: category.into(),
        year,
        monthly: Vec::new(),
        daily: BTreeMap::new(),
    }
}

fn month(month: u32, device: i64, plan: i64, attach_pct: Option<f64>) -> MonthlySales {
    MonthlySales {
        month,
        device_sales: device,
        plan_sales: plan,
        attach_pct,
        revenue: device as f64 * 100.0,
    }
}

fn day(date: &str, device: i64, plan: i64) -> DailySales {
    DailySales {
        date: date.parse::<NaiveDate>().unwrap(),
        device_sales: device,
        plan_sales: plan,
        attach_pct: None,
        revenue: device as f64 * 100.0,
    }
}

#[test]
fn stored_attach_pct_is_authoritative() {
    // The counts would give 50%, but the stored reading says 18%.
    let mut rec = record("phones", 2025);
    rec.monthly.push(month(6, 100, 50, Some(0.18)));

    let rates = monthly_attach_rates(&[&rec], 2025, 6).unwrap();
    assert_eq!(rates.current, 18.0);
}

#[test]
fn rate_is_computed_from_counts_when_reading_is_absent() {
    let mut rec = record("phones", 2025);
    rec.monthly.push(month(6, 100, 25, None));

    let rates = monthly_attach_rates(&[&rec], 2025, 6).unwrap();
    assert_eq!(rates.current, 25.0);
}

#[test]
fn averaging_skips_records_without_a_reading() {
    // Two category pairings; only one has June data. The average must be
    // over one reading, not diluted to half by the empty record.
    let mut with_data = record("phones", 2025);
    with_data.monthly.push(month(6, 80, 16, Some(0.20)));
    let no_data = record("tablets", 2025);

    let rates = monthly_attach_rates(&[&with_data, &no_data], 2025, 6).unwrap();
    assert_eq!(rates.current, 20.0);
}

#[test]
fn averaging_combines_readings_across_categories() {
    let mut a = record("phones", 2025);
    a.monthly.push(month(6, 100, 10, Some(0.10)));
    let mut b = record("tablets", 2025);
    b.monthly.push(month(6, 100, 30, Some(0.30)));

    let rates = monthly_attach_rates(&[&a, &b], 2025, 6).unwrap();
    assert_eq!(rates.current, 20.0);
}

#[test]
fn january_previous_rolls_into_prior_december() {
    assert_eq!(previous_month(2025, 1), (2024, 12));
    assert_eq!(previous_month(2025, 7), (2025, 6));

    let mut jan = record("phones", 2025);
    jan.monthly.push(month(1, 100, 15, Some(0.15)));
    let mut dec = record("phones", 2024);
    dec.monthly.push(month(12, 100, 22, Some(0.22)));

    let rates = monthly_attach_rates(&[&jan, &dec], 2025, 1).unwrap();
    assert_eq!(rates.current, 15.0);
    assert_eq!(rates.previous, 22.0);
}

#[test]
fn missing_data_resolves_to_zero() {
    let rec = record("phones", 2025);
    let rates = monthly_attach_rates(&[&rec], 2025, 6).unwrap();
    assert_eq!(rates.current, 0.0);
    assert_eq!(rates.previous, 0.0);

    let rates = monthly_attach_rates(&[], 2025, 6).unwrap();
    assert_eq!(rates.current, 0.0);
}

#[test]
fn invalid_month_is_rejected() {
    assert!(monthly_attach_rates(&[], 2025, 0).is_err());
    assert!(monthly_attach_rates(&[], 2025, 13).is_err());
}

#[test]
fn month_totals_sum_across_categories() {
    let mut a = record("phones", 2025);
    a.monthly.push(month(6, 100, 10, None));
    let mut b = record("tablets", 2025);
    b.monthly.push(month(6, 50, 5, None));

    let totals = month_totals(&[&a, &b], 2025, 6);
    assert_eq!(totals.device_sales, 150);
    assert_eq!(totals.plan_sales, 15);
    assert_eq!(totals.revenue, 15_000.0);
}

#[test]
fn trailing_window_sums_daily_entries() {
    let mut rec = record("phones", 2025);
    let days = rec.daily.entry(6).or_default();
    // Current 7-day window ending 2025-06-14: device 40, plan 10 -> 25%.
    days.push(day("2025-06-10", 20, 4));
    days.push(day("2025-06-13", 20, 6));
    // Previous window (June 1-7): device 20, plan 8 -> 40%.
    days.push(day("2025-06-03", 20, 8));
    // Outside both windows.
    days.push(day("2025-05-20", 100, 0));

    let reference = "2025-06-14".parse::<NaiveDate>().unwrap();
    let rates = window_attach_rates(&[&rec], reference, 7);
    assert_eq!(rates.current, 25.0);
    assert_eq!(rates.previous, 40.0);
}

#[test]
fn window_spans_a_month_boundary() {
    let mut rec = record("phones", 2025);
    rec.daily.entry(5).or_default().push(day("2025-05-31", 10, 5));
    rec.daily.entry(6).or_default().push(day("2025-06-02", 10, 1));

    let reference = "2025-06-03".parse::<NaiveDate>().unwrap();
    let rates = window_attach_rates(&[&rec], reference, 7);
    assert_eq!(rates.current, 30.0);
}

#[test]
fn window_falls_back_to_scaled_monthly_data() {
    // No daily granularity at all: the rate comes from the monthly
    // reading and the totals are scaled by window_days / 30.
    let mut rec = record("phones", 2025);
    rec.monthly.push(month(6, 90, 18, Some(0.20)));

    let reference = "2025-06-15".parse::<NaiveDate>().unwrap();
    let rates = window_attach_rates(&[&rec], reference, 7);
    assert_eq!(rates.current, 20.0);

    let totals = window_totals(&[&rec], reference, 7);
    assert_eq!(totals.device_sales, 21); // 90 * 7/30
    assert_eq!(totals.plan_sales, 4); // 18 * 7/30, rounded
}
