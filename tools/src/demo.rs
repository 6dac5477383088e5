//! Deterministic demo dataset seeding.
//!
//! RULE: nothing here calls a platform RNG. All randomness flows through
//! a single PCG stream derived from the master seed, so the same seed
//! always produces the same dataset (and therefore the same report).

use crate::store::SalesDb;
use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use retailrag_core::model::{Brand, DailySales, MonthlySales, SalesRecord};
use std::collections::BTreeMap;
use uuid::Uuid;

const BRANDS: [(&str, &str); 4] = [
    ("b-aurev", "Aurev"),
    ("b-nimbra", "Nimbra"),
    ("b-voltaic", "Voltaic"),
    ("b-zephta", "Zephta"),
];

const CITIES: [&str; 4] = ["Pune", "Mumbai", "Nagpur", "Nashik"];

const STORE_NAMES: [&str; 10] = [
    "Koregaon Park",
    "Baner Road",
    "Aundh Central",
    "Viman Nagar",
    "Andheri West",
    "Bandra Galleria",
    "Sitabuldi",
    "Dharampeth",
    "College Road",
    "Gangapur Plaza",
];

const TIERS: [&str; 5] = ["A+", "A", "B", "C", "D"];

/// Demo RNG over a single deterministic PCG stream.
struct DemoRng {
    inner: Pcg64Mcg,
}

impl DemoRng {
    fn new(master_seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(master_seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Uniform float in [lo, hi).
    fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}

/// Seed brands, stores, and a year-to-date sales history ending on
/// `reference_date`.
pub fn seed(db: &SalesDb, master_seed: u64, reference_date: NaiveDate) -> Result<()> {
    let mut rng = DemoRng::new(master_seed);

    for (id, name) in BRANDS {
        db.insert_brand(&Brand {
            id: id.into(),
            name: name.into(),
        })?;
    }

    for (idx, store_name) in STORE_NAMES.iter().enumerate() {
        let store_id = format!("s-{:03}", idx + 1);
        let city = CITIES[idx % CITIES.len()];

        // Each store carries 2-4 brands with a tier per pairing. One store
        // in ten gets an empty tier label to exercise the lenient
        // missing-tier path downstream.
        let brand_count = 2 + rng.next_u64_below(3) as usize;
        let mut pairings = Vec::with_capacity(brand_count);
        for brand_idx in 0..brand_count {
            let (brand_id, _) = BRANDS[(idx + brand_idx) % BRANDS.len()];
            let tier = if idx == 9 && brand_idx == 0 {
                ""
            } else {
                TIERS[rng.next_u64_below(TIERS.len() as u64) as usize]
            };
            pairings.push((brand_id.to_string(), tier.to_string()));
        }
        db.insert_store(&store_id, store_name, city, &pairings)?;

        for (brand_id, _) in &pairings {
            let record = build_record(&mut rng, &store_id, brand_id, reference_date);
            let record_id = Uuid::new_v4().to_string();
            db.insert_sales_record(&record_id, &record)?;
        }
    }

    Ok(())
}

/// One record with monthly history from January through the reference
/// month, plus daily granularity for the trailing two weeks.
fn build_record(
    rng: &mut DemoRng,
    store_id: &str,
    brand_id: &str,
    reference_date: NaiveDate,
) -> SalesRecord {
    let year = reference_date.year();
    let ref_month = reference_date.month();

    // A per-pairing baseline attach rate with a drift term, so some
    // pairings decline month over month and pick up the trend penalty.
    let baseline = rng.range_f64(0.04, 0.28);
    let drift = rng.range_f64(-0.015, 0.015);

    let mut monthly = Vec::new();
    for month in 1..=ref_month {
        let device_sales = 60 + rng.next_u64_below(140) as i64;
        let attach = (baseline + drift * month as f64 + rng.range_f64(-0.01, 0.01))
            .clamp(0.0, 0.60);
        let plan_sales = (device_sales as f64 * attach).round() as i64;
        monthly.push(MonthlySales {
            month,
            device_sales,
            plan_sales,
            attach_pct: Some(attach),
            revenue: device_sales as f64 * rng.range_f64(9_000.0, 14_000.0),
        });
    }

    let mut daily: BTreeMap<u32, Vec<DailySales>> = BTreeMap::new();
    for offset in 0..14 {
        let date = reference_date - Duration::days(offset);
        let device_sales = 2 + rng.next_u64_below(8) as i64;
        let attach = (baseline + rng.range_f64(-0.03, 0.03)).clamp(0.0, 0.60);
        let plan_sales = (device_sales as f64 * attach).round() as i64;
        daily.entry(date.month()).or_default().push(DailySales {
            date,
            device_sales,
            plan_sales,
            attach_pct: Some(attach),
            revenue: device_sales as f64 * rng.range_f64(9_000.0, 14_000.0),
        });
    }

    SalesRecord {
        store_id: store_id.into(),
        brand_id: brand_id.into(),
        category_id: "smartphones".into(),
        year,
        monthly,
        daily,
    }
}
