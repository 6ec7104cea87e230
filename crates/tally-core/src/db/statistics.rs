//! Amount aggregation queries
//!
//! Amounts come back as decimal strings and are summed with `rust_decimal`
//! in Rust. SQLite's SUM would coerce the TEXT column to binary floats and
//! introduce cent-level drift over enough rows.

use chrono::{DateTime, Utc};
use rusqlite::params;
use rust_decimal::Decimal;

use super::{format_datetime, Database};
use crate::error::Result;
use crate::models::{TransactionCategory, TransactionType};

impl Database {
    /// Sum amounts of one transaction type over an inclusive date window
    ///
    /// Zero when nothing matches (including a reversed window).
    pub fn sum_amount_by_type(
        &self,
        tx_type: TransactionType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Decimal> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT amount FROM transactions \
             WHERE tx_type = ? AND transaction_date BETWEEN ? AND ?",
        )?;

        let amounts = stmt.query_map(
            params![
                tx_type.as_str(),
                format_datetime(start),
                format_datetime(end)
            ],
            |row| row.get::<_, String>(0),
        )?;

        let mut total = Decimal::ZERO;
        for amount in amounts {
            total += amount?.parse::<Decimal>().unwrap_or_default();
        }
        Ok(total)
    }

    /// Sum EXPENSE amounts per category over an inclusive date window
    ///
    /// Categories with no matching records are absent, so no zero-valued
    /// entries appear. Ordered by descending total.
    pub fn sum_expenses_by_category(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(TransactionCategory, Decimal)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT category, amount FROM transactions \
             WHERE tx_type = ? AND transaction_date BETWEEN ? AND ?",
        )?;

        let rows = stmt.query_map(
            params![
                TransactionType::Expense.as_str(),
                format_datetime(start),
                format_datetime(end)
            ],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;

        let mut totals: std::collections::HashMap<TransactionCategory, Decimal> =
            std::collections::HashMap::new();
        for row in rows {
            let (category_str, amount_str) = row?;
            let category: TransactionCategory = category_str.parse().unwrap_or_default();
            let amount: Decimal = amount_str.parse().unwrap_or_default();
            *totals.entry(category).or_insert(Decimal::ZERO) += amount;
        }

        let mut result: Vec<(TransactionCategory, Decimal)> = totals.into_iter().collect();
        result.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        Ok(result)
    }
}
