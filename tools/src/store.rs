//! SQLite-backed sales data access for the runner.
//!
//! This layer is the *caller's* side of the engine boundary: it owns the
//! storage read, materializes the engine's input types, and hands them
//! over. The engine itself never sees a connection. Store/brand pairings
//! are persisted in the legacy index-aligned shape (position-ordered
//! rows) and funneled through `Store::from_parallel_lists`, which
//! tolerates the known length drift between the two lists.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use retailrag_core::model::{Brand, DailySales, MonthlySales, SalesRecord, Store};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;

pub struct SalesDb {
    conn: Connection,
}

impl SalesDb {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS brand (
                brand_id TEXT PRIMARY KEY,
                name     TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS store (
                store_id TEXT PRIMARY KEY,
                name     TEXT NOT NULL,
                city     TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS store_brand (
                store_id TEXT NOT NULL REFERENCES store(store_id),
                position INTEGER NOT NULL,
                brand_id TEXT NOT NULL,
                tier     TEXT NOT NULL DEFAULT '',
                PRIMARY KEY (store_id, position)
             );
             CREATE TABLE IF NOT EXISTS sales_record (
                record_id   TEXT PRIMARY KEY,
                store_id    TEXT NOT NULL,
                brand_id    TEXT NOT NULL,
                category_id TEXT NOT NULL,
                year        INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS monthly_sales (
                record_id    TEXT NOT NULL REFERENCES sales_record(record_id),
                month        INTEGER NOT NULL,
                device_sales INTEGER NOT NULL,
                plan_sales   INTEGER NOT NULL,
                attach_pct   REAL,
                revenue      REAL NOT NULL,
                PRIMARY KEY (record_id, month)
             );
             CREATE TABLE IF NOT EXISTS daily_sales (
                record_id    TEXT NOT NULL REFERENCES sales_record(record_id),
                date         TEXT NOT NULL,
                device_sales INTEGER NOT NULL,
                plan_sales   INTEGER NOT NULL,
                attach_pct   REAL,
                revenue      REAL NOT NULL,
                PRIMARY KEY (record_id, date)
             );",
        )?;
        Ok(())
    }

    // ── Writes (demo seeding) ────────────────────────────────────────

    pub fn insert_brand(&self, brand: &Brand) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO brand (brand_id, name) VALUES (?1, ?2)",
            params![brand.id, brand.name],
        )?;
        Ok(())
    }

    pub fn insert_store(
        &self,
        store_id: &str,
        name: &str,
        city: &str,
        pairings: &[(String, String)],
    ) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO store (store_id, name, city) VALUES (?1, ?2, ?3)",
            params![store_id, name, city],
        )?;
        for (position, (brand_id, tier)) in pairings.iter().enumerate() {
            self.conn.execute(
                "INSERT OR REPLACE INTO store_brand (store_id, position, brand_id, tier)
                 VALUES (?1, ?2, ?3, ?4)",
                params![store_id, position as i64, brand_id, tier],
            )?;
        }
        Ok(())
    }

    pub fn insert_sales_record(&self, record_id: &str, record: &SalesRecord) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO sales_record
                (record_id, store_id, brand_id, category_id, year)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record_id,
                record.store_id,
                record.brand_id,
                record.category_id,
                record.year
            ],
        )?;
        for m in &record.monthly {
            self.conn.execute(
                "INSERT OR REPLACE INTO monthly_sales
                    (record_id, month, device_sales, plan_sales, attach_pct, revenue)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record_id,
                    m.month,
                    m.device_sales,
                    m.plan_sales,
                    m.attach_pct,
                    m.revenue
                ],
            )?;
        }
        for day in record.daily.values().flatten() {
            self.conn.execute(
                "INSERT OR REPLACE INTO daily_sales
                    (record_id, date, device_sales, plan_sales, attach_pct, revenue)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record_id,
                    day.date.to_string(),
                    day.device_sales,
                    day.plan_sales,
                    day.attach_pct,
                    day.revenue
                ],
            )?;
        }
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn load_brands(&self) -> Result<Vec<Brand>> {
        let mut stmt = self
            .conn
            .prepare("SELECT brand_id, name FROM brand ORDER BY brand_id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Brand {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn load_stores(&self) -> Result<Vec<Store>> {
        let mut stmt = self
            .conn
            .prepare("SELECT store_id, name, city FROM store ORDER BY store_id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut pairing_stmt = self.conn.prepare(
            "SELECT brand_id, tier FROM store_brand
             WHERE store_id = ?1 ORDER BY position",
        )?;

        let mut stores = Vec::new();
        for row in rows {
            let (store_id, name, city) = row?;
            let mut brand_ids = Vec::new();
            let mut tier_labels = Vec::new();
            let pairings = pairing_stmt.query_map(params![store_id], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?;
            for pairing in pairings {
                let (brand_id, tier) = pairing?;
                brand_ids.push(brand_id);
                tier_labels.push(tier);
            }
            // A garbage tier label on one store must not abort the whole
            // read; skip it, mirroring the engine's per-entity tolerance.
            match Store::from_parallel_lists(store_id.clone(), name, city, brand_ids, tier_labels)
            {
                Ok(store) => stores.push(store),
                Err(err) => log::warn!("skipping store {store_id}: {err}"),
            }
        }
        Ok(stores)
    }

    pub fn load_sales_records(&self) -> Result<Vec<SalesRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT record_id, store_id, brand_id, category_id, year
             FROM sales_record ORDER BY record_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                SalesRecord {
                    store_id: row.get(1)?,
                    brand_id: row.get(2)?,
                    category_id: row.get(3)?,
                    year: row.get(4)?,
                    monthly: Vec::new(),
                    daily: BTreeMap::new(),
                },
            ))
        })?;

        let mut monthly_stmt = self.conn.prepare(
            "SELECT month, device_sales, plan_sales, attach_pct, revenue
             FROM monthly_sales WHERE record_id = ?1 ORDER BY month",
        )?;
        let mut daily_stmt = self.conn.prepare(
            "SELECT date, device_sales, plan_sales, attach_pct, revenue
             FROM daily_sales WHERE record_id = ?1 ORDER BY date",
        )?;

        let mut records = Vec::new();
        for row in rows {
            let (record_id, mut record) = row?;

            let monthly = monthly_stmt.query_map(params![record_id], |r| {
                Ok(MonthlySales {
                    month: r.get(0)?,
                    device_sales: r.get(1)?,
                    plan_sales: r.get(2)?,
                    attach_pct: r.get(3)?,
                    revenue: r.get(4)?,
                })
            })?;
            for entry in monthly {
                record.monthly.push(entry?);
            }

            let daily = daily_stmt.query_map(params![record_id], |r| {
                let date: String = r.get(0)?;
                Ok((
                    date,
                    r.get::<_, i64>(1)?,
                    r.get::<_, i64>(2)?,
                    r.get::<_, Option<f64>>(3)?,
                    r.get::<_, f64>(4)?,
                ))
            })?;
            for entry in daily {
                let (date, device_sales, plan_sales, attach_pct, revenue) = entry?;
                let date: NaiveDate = date.parse()?;
                record.daily.entry(date.month()).or_default().push(DailySales {
                    date,
                    device_sales,
                    plan_sales,
                    attach_pct,
                    revenue,
                });
            }

            records.push(record);
        }
        Ok(records)
    }
}
