//! Statistics command

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};

use tally_core::stats;

use super::open_db;

pub fn cmd_stats(db_path: &Path, from: &str, to: &str, no_encrypt: bool) -> Result<()> {
    let from_date = NaiveDate::parse_from_str(from, "%Y-%m-%d")
        .with_context(|| format!("Invalid --from date: {} (use YYYY-MM-DD)", from))?;
    let to_date = NaiveDate::parse_from_str(to, "%Y-%m-%d")
        .with_context(|| format!("Invalid --to date: {} (use YYYY-MM-DD)", to))?;

    let start = from_date
        .and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap())
        .and_utc();
    let end = to_date
        .and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap())
        .and_utc();

    let db = open_db(db_path, no_encrypt)?;
    let summary = stats::summarize(&db, start, end)?;

    println!("📊 {} to {}", from_date, to_date);
    println!("   Expenses: {}", summary.total_expenses);
    println!("   Income:   {}", summary.total_income);
    println!("   Net:      {}", summary.net_amount);

    if !summary.by_category.is_empty() {
        println!();
        println!("   Spending by category:");
        for entry in &summary.by_category {
            println!(
                "   {:<20} {:>12}",
                entry.category.display_name(),
                entry.total.to_string()
            );
        }
    }

    Ok(())
}
