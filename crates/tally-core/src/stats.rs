//! Aggregate statistics over stored transactions
//!
//! Pure function of the store contents and the requested window. All sums are
//! exact decimal; two-decimal-place amounts add without rounding drift.

use chrono::{DateTime, Utc};

use crate::db::Database;
use crate::error::Result;
use crate::models::{CategoryTotal, StatisticsSummary, TransactionType};

/// Compute income/expense/net totals and the expense-by-category breakdown
/// over an inclusive date window
///
/// A window containing no records (including a reversed one where
/// `start > end`) yields an all-zero summary, not an error.
pub fn summarize(
    db: &Database,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<StatisticsSummary> {
    let total_expenses = db.sum_amount_by_type(TransactionType::Expense, start, end)?;
    let total_income = db.sum_amount_by_type(TransactionType::Income, start, end)?;

    let by_category = db
        .sum_expenses_by_category(start, end)?
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();

    Ok(StatisticsSummary {
        net_amount: total_income - total_expenses,
        total_expenses,
        total_income,
        start_date: start,
        end_date: end,
        by_category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        NewTransactionRecord, TransactionCategory, TransactionScenario, TransactionType,
    };
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, d, 12, 0, 0).unwrap()
    }

    fn insert(
        db: &Database,
        amount: &str,
        tx_type: TransactionType,
        category: TransactionCategory,
        day: u32,
    ) {
        db.insert_transaction(&NewTransactionRecord {
            amount: dec(amount),
            tx_type,
            category,
            scenario: TransactionScenario::Regular,
            description: None,
            merchant: None,
            location: None,
            transaction_date: date(day),
            ai_analysis: None,
            source: None,
            external_id: None,
        })
        .unwrap();
    }

    #[test]
    fn test_summarize_expense_and_income() {
        let db = Database::in_memory().unwrap();
        insert(&db, "100.00", TransactionType::Expense, TransactionCategory::Shopping, 1);
        insert(&db, "40.00", TransactionType::Income, TransactionCategory::Other, 2);

        let summary = summarize(&db, date(1), date(2)).unwrap();
        assert_eq!(summary.total_expenses, dec("100.00"));
        assert_eq!(summary.total_income, dec("40.00"));
        assert_eq!(summary.net_amount, dec("-60.00"));
    }

    #[test]
    fn test_net_is_income_minus_expenses() {
        let db = Database::in_memory().unwrap();
        insert(&db, "10.25", TransactionType::Expense, TransactionCategory::Snacks, 1);
        insert(&db, "10.30", TransactionType::Income, TransactionCategory::Other, 1);
        insert(&db, "5.00", TransactionType::Transfer, TransactionCategory::Transfer, 1);

        let summary = summarize(&db, date(1), date(1)).unwrap();
        assert_eq!(
            summary.net_amount,
            summary.total_income - summary.total_expenses
        );
        // Transfers count toward neither side
        assert_eq!(summary.net_amount, dec("0.05"));
    }

    #[test]
    fn test_empty_window_is_all_zero() {
        let db = Database::in_memory().unwrap();
        insert(&db, "10.00", TransactionType::Expense, TransactionCategory::Other, 15);

        let summary = summarize(&db, date(1), date(2)).unwrap();
        assert_eq!(summary.total_expenses, Decimal::ZERO);
        assert_eq!(summary.total_income, Decimal::ZERO);
        assert_eq!(summary.net_amount, Decimal::ZERO);
        assert!(summary.by_category.is_empty());
    }

    #[test]
    fn test_reversed_window_is_all_zero() {
        let db = Database::in_memory().unwrap();
        insert(&db, "10.00", TransactionType::Expense, TransactionCategory::Other, 5);

        let summary = summarize(&db, date(10), date(1)).unwrap();
        assert_eq!(summary.total_expenses, Decimal::ZERO);
        assert_eq!(summary.net_amount, Decimal::ZERO);
    }

    #[test]
    fn test_breakdown_groups_and_orders() {
        let db = Database::in_memory().unwrap();
        insert(&db, "4.50", TransactionType::Expense, TransactionCategory::CoffeeTea, 1);
        insert(&db, "3.50", TransactionType::Expense, TransactionCategory::CoffeeTea, 2);
        insert(&db, "1200.00", TransactionType::Expense, TransactionCategory::Rent, 1);
        insert(&db, "40.00", TransactionType::Income, TransactionCategory::Other, 1);

        let summary = summarize(&db, date(1), date(30)).unwrap();
        assert_eq!(summary.by_category.len(), 2);
        assert_eq!(summary.by_category[0].category, TransactionCategory::Rent);
        assert_eq!(summary.by_category[0].total, dec("1200.00"));
        assert_eq!(summary.by_category[1].category, TransactionCategory::CoffeeTea);
        assert_eq!(summary.by_category[1].total, dec("8.00"));
    }
}
