//! rag-runner: headless store/brand RAG classification runner.
//!
//! Usage:
//!   rag-runner --db sales.db --ref-date 2025-06-15 --window month
//!   rag-runner --seed-demo --seed 42 --window 7d --city Pune --json
//!
//! The runner plays the caller's role around the pure engine: it owns the
//! database read, the scoping decision (org-wide vs. an assigned store
//! set), and the presentation of the report.

mod demo;
mod store;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use retailrag_core::engine::{
    evaluate, EngineOptions, EvaluationFilter, EvaluationParams, TimeWindow,
};
use retailrag_core::model::BrandTier;
use retailrag_core::report::RagReport;
use retailrag_core::status::RagStatus;
use std::env;
use store::SalesDb;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db_path = str_arg(&args, "--db").unwrap_or_else(|| ":memory:".to_string());
    let seed = parse_arg(&args, "--seed", 42u64);
    let seed_demo = args.iter().any(|a| a == "--seed-demo") || db_path == ":memory:";
    let json_output = args.iter().any(|a| a == "--json");

    // The engine takes the reference date as an explicit option; the
    // runner is the one place wall-clock time may enter.
    let reference_date: NaiveDate = match str_arg(&args, "--ref-date") {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid --ref-date '{raw}' (expected YYYY-MM-DD)"))?,
        None => chrono::Local::now().date_naive(),
    };

    let window = match str_arg(&args, "--window") {
        Some(raw) => TimeWindow::parse(&raw)
            .with_context(|| format!("invalid --window '{raw}' (today|7d|30d|month)"))?,
        None => TimeWindow::CalendarMonth,
    };

    let mut options = EngineOptions::new(reference_date);
    if let Some(raw) = str_arg(&args, "--missing-tier-default") {
        options = options.with_missing_tier_default(raw.parse::<BrandTier>()?);
    }

    let db = SalesDb::open(&db_path)?;
    db.migrate()?;
    if seed_demo {
        log::info!("seeding demo dataset (seed {seed})");
        demo::seed(&db, seed, reference_date)?;
    }

    let brands = db.load_brands()?;
    let mut stores = db.load_stores()?;
    let sales = db.load_sales_records()?;
    log::info!(
        "loaded {} stores, {} brands, {} sales records",
        stores.len(),
        brands.len(),
        sales.len()
    );

    // Identity scoping is a pre-filter on the store set; the engine is
    // invoked identically either way.
    if let Some(raw) = str_arg(&args, "--scope-stores") {
        let assigned: Vec<&str> = raw.split(',').map(str::trim).collect();
        stores.retain(|s| assigned.contains(&s.id.as_str()));
    }

    let mut filter = EvaluationFilter {
        city: str_arg(&args, "--city"),
        ..Default::default()
    };
    if let Some(raw) = str_arg(&args, "--tier") {
        filter.tier = Some(raw.parse::<BrandTier>()?);
    }
    if let Some(raw) = str_arg(&args, "--status") {
        filter.status = Some(
            RagStatus::parse(&raw)
                .with_context(|| format!("invalid --status '{raw}' (green|amber|red)"))?,
        );
    }
    if let Some(raw) = str_arg(&args, "--brand") {
        // Accept a brand id directly, or resolve a display name to its id.
        let resolved = brands
            .iter()
            .find(|b| b.id == raw || b.name.eq_ignore_ascii_case(&raw))
            .map(|b| b.id.clone());
        match resolved {
            Some(id) => filter.brand_id = Some(id),
            None => bail!("unknown brand '{raw}'"),
        }
    }

    let params = EvaluationParams { window, filter };
    let report = evaluate(&stores, &sales, &options, &params);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &RagReport) {
    let s = &report.summary;
    println!("=== PORTFOLIO SUMMARY ===");
    println!("  stores evaluated: {}", s.total_stores);
    println!("  green:            {}", s.green_count);
    println!("  amber:            {}", s.amber_count);
    println!("  red:              {}", s.red_count);
    println!("  avg attach rate:  {:.1}%", s.avg_attach_rate);
    println!("  improving stores: {}", s.improving_stores);

    println!();
    println!("=== STORES (priority order) ===");
    for row in &report.stores {
        let tier = row.tier.map(|t| t.as_str()).unwrap_or("-");
        println!(
            "  [{:5}] {:<18} {:<8} tier {:<2} | attach {:5.1}% (prev {:5.1}%, {}) | plans {} / devices {}",
            row.final_status.as_str(),
            row.store_name,
            row.city,
            tier,
            row.attach_rate,
            row.previous_attach_rate,
            row.trend,
            row.plan_sales,
            row.device_sales,
        );
    }

    println!();
    println!("=== INSIGHTS ===");
    for insight in &report.insights {
        println!("  {} — {}", insight.title, insight.message);
    }

    if !report.faults.is_empty() {
        println!();
        println!("=== DATA FAULTS ===");
        for fault in &report.faults {
            let brand = fault.brand_id.as_deref().unwrap_or("-");
            println!("  store {} / brand {}: {}", fault.store_id, brand, fault.reason);
        }
    }
}

fn str_arg(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
