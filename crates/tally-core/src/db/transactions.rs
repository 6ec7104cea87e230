//! Transaction operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{format_datetime, parse_datetime, Database};
use crate::error::Result;
use crate::models::{NewTransactionRecord, Transaction, TransactionCategory};

/// Column list shared by every SELECT that maps through `row_to_transaction`
const TRANSACTION_COLUMNS: &str = "id, amount, tx_type, category, scenario, description, \
     merchant, location, transaction_date, created_at, updated_at, ai_analysis, source, external_id";

impl Database {
    /// Insert a fully-classified transaction, returning its new id
    pub fn insert_transaction(&self, record: &NewTransactionRecord) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (amount, tx_type, category, scenario, description, merchant,
                                      location, transaction_date, ai_analysis, source, external_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                record.amount.to_string(),
                record.tx_type.as_str(),
                record.category.as_str(),
                record.scenario.as_str(),
                record.description,
                record.merchant,
                record.location,
                format_datetime(record.transaction_date),
                record.ai_analysis,
                record.source,
                record.external_id,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a single transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let tx = conn
            .query_row(
                &format!("SELECT {} FROM transactions WHERE id = ?", TRANSACTION_COLUMNS),
                params![id],
                Self::row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    /// Overwrite a transaction's mutable fields
    ///
    /// Provenance (`source`, `external_id`) and `created_at` are immutable;
    /// `updated_at` is refreshed here, never by the caller. Returns false when
    /// no row has the given id.
    pub fn update_transaction(&self, id: i64, record: &NewTransactionRecord) -> Result<bool> {
        let conn = self.conn()?;

        let changed = conn.execute(
            r#"
            UPDATE transactions
            SET amount = ?, tx_type = ?, category = ?, scenario = ?, description = ?,
                merchant = ?, location = ?, transaction_date = ?, ai_analysis = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            params![
                record.amount.to_string(),
                record.tx_type.as_str(),
                record.category.as_str(),
                record.scenario.as_str(),
                record.description,
                record.merchant,
                record.location,
                format_datetime(record.transaction_date),
                record.ai_analysis,
                id,
            ],
        )?;

        Ok(changed > 0)
    }

    /// Delete a transaction by ID
    ///
    /// Returns false when the id does not exist; absence is not an error.
    pub fn delete_transaction(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }

    /// Check whether a feed-supplied external id was already recorded
    pub fn exists_by_external_id(&self, external_id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE external_id = ?",
            params![external_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Find a transaction by its feed-supplied external id
    pub fn find_by_external_id(&self, external_id: &str) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let tx = conn
            .query_row(
                &format!(
                    "SELECT {} FROM transactions WHERE external_id = ?",
                    TRANSACTION_COLUMNS
                ),
                params![external_id],
                Self::row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    /// List transactions, newest economic event first
    pub fn list_transactions(&self, limit: i64, offset: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions ORDER BY transaction_date DESC, id DESC LIMIT ? OFFSET ?",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![limit, offset], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    /// Count total transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// List the most recent transactions
    pub fn list_recent(&self, limit: i64) -> Result<Vec<Transaction>> {
        self.list_transactions(limit, 0)
    }

    /// List transactions in a category, newest first
    pub fn list_by_category(
        &self,
        category: TransactionCategory,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE category = ? \
             ORDER BY transaction_date DESC, id DESC LIMIT ? OFFSET ?",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(
                params![category.as_str(), limit, offset],
                Self::row_to_transaction,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    /// Count transactions in a category
    pub fn count_by_category(&self, category: TransactionCategory) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE category = ?",
            params![category.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// List transactions with `transaction_date` in the inclusive window
    pub fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE transaction_date BETWEEN ? AND ? \
             ORDER BY transaction_date DESC, id DESC",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(
                params![format_datetime(start), format_datetime(end)],
                Self::row_to_transaction,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    /// Search transactions by keyword over description and merchant
    ///
    /// Case-insensitive substring match; a record matching both fields
    /// appears once because the match is a single OR predicate, keyed by id.
    pub fn search_transactions(&self, keyword: &str) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions \
             WHERE description LIKE ? COLLATE NOCASE OR merchant LIKE ? COLLATE NOCASE \
             ORDER BY transaction_date DESC, id DESC",
            TRANSACTION_COLUMNS
        ))?;

        let pattern = format!("%{}%", keyword.trim());
        let transactions = stmt
            .query_map(params![pattern, pattern], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let amount_str: String = row.get(1)?;
        let tx_type_str: String = row.get(2)?;
        let category_str: String = row.get(3)?;
        let scenario_str: String = row.get(4)?;
        let transaction_date_str: String = row.get(8)?;
        let created_at_str: String = row.get(9)?;
        let updated_at_str: String = row.get(10)?;

        Ok(Transaction {
            id: row.get(0)?,
            amount: amount_str.parse().unwrap_or_default(),
            tx_type: tx_type_str.parse().unwrap_or_default(),
            category: category_str.parse().unwrap_or_default(),
            scenario: scenario_str.parse().unwrap_or_default(),
            description: row.get(5)?,
            merchant: row.get(6)?,
            location: row.get(7)?,
            transaction_date: parse_datetime(&transaction_date_str),
            created_at: parse_datetime(&created_at_str),
            updated_at: parse_datetime(&updated_at_str),
            ai_analysis: row.get(11)?,
            source: row.get(12)?,
            external_id: row.get(13)?,
        })
    }
}
