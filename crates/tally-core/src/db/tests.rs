//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn record(amount: &str, tx_type: TransactionType, when: chrono::DateTime<Utc>) -> NewTransactionRecord {
        NewTransactionRecord {
            amount: dec(amount),
            tx_type,
            category: TransactionCategory::Other,
            scenario: TransactionScenario::Regular,
            description: None,
            merchant: None,
            location: None,
            transaction_date: when,
            ai_analysis: None,
            source: Some("manual entry".to_string()),
            external_id: None,
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.count_transactions().unwrap(), 0);
    }

    #[test]
    fn test_transactions_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('transactions') WHERE name IN \
                 ('id', 'amount', 'tx_type', 'category', 'scenario', 'description', 'merchant', \
                  'location', 'transaction_date', 'created_at', 'updated_at', 'ai_analysis', \
                  'source', 'external_id')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 14, "transactions table should have 14 expected columns");
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let db = Database::in_memory().unwrap();

        let mut rec = record("25.50", TransactionType::Expense, date(2024, 6, 1));
        rec.category = TransactionCategory::CoffeeTea;
        rec.scenario = TransactionScenario::Regular;
        rec.description = Some("morning latte".to_string());
        rec.merchant = Some("Blue Bottle".to_string());
        rec.ai_analysis = Some("coffee purchase".to_string());

        let id = db.insert_transaction(&rec).unwrap();
        assert!(id > 0);

        let tx = db.get_transaction(id).unwrap().unwrap();
        assert_eq!(tx.amount, dec("25.50"));
        assert_eq!(tx.tx_type, TransactionType::Expense);
        assert_eq!(tx.category, TransactionCategory::CoffeeTea);
        assert_eq!(tx.description.as_deref(), Some("morning latte"));
        assert_eq!(tx.merchant.as_deref(), Some("Blue Bottle"));
        assert_eq!(tx.source.as_deref(), Some("manual entry"));
        assert_eq!(tx.transaction_date, date(2024, 6, 1));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let db = Database::in_memory().unwrap();
        assert!(db.get_transaction(999).unwrap().is_none());
    }

    #[test]
    fn test_update_transaction() {
        let db = Database::in_memory().unwrap();
        let id = db
            .insert_transaction(&record("10.00", TransactionType::Expense, date(2024, 6, 1)))
            .unwrap();

        let mut updated = record("9.99", TransactionType::Expense, date(2024, 6, 2));
        updated.category = TransactionCategory::PublicTransport;
        updated.description = Some("train ticket".to_string());

        assert!(db.update_transaction(id, &updated).unwrap());

        let tx = db.get_transaction(id).unwrap().unwrap();
        assert_eq!(tx.amount, dec("9.99"));
        assert_eq!(tx.category, TransactionCategory::PublicTransport);
        assert_eq!(tx.description.as_deref(), Some("train ticket"));
        assert_eq!(tx.transaction_date, date(2024, 6, 2));
    }

    #[test]
    fn test_update_missing_returns_false() {
        let db = Database::in_memory().unwrap();
        let rec = record("10.00", TransactionType::Expense, date(2024, 6, 1));
        assert!(!db.update_transaction(42, &rec).unwrap());
        assert_eq!(db.count_transactions().unwrap(), 0);
    }

    #[test]
    fn test_update_preserves_provenance() {
        let db = Database::in_memory().unwrap();
        let mut rec = record("10.00", TransactionType::Expense, date(2024, 6, 1));
        rec.source = Some("bank feed".to_string());
        rec.external_id = Some("feed-1".to_string());
        let id = db.insert_transaction(&rec).unwrap();

        let mut updated = record("11.00", TransactionType::Expense, date(2024, 6, 1));
        updated.source = Some("something else".to_string());
        updated.external_id = Some("feed-2".to_string());
        db.update_transaction(id, &updated).unwrap();

        let tx = db.get_transaction(id).unwrap().unwrap();
        assert_eq!(tx.source.as_deref(), Some("bank feed"));
        assert_eq!(tx.external_id.as_deref(), Some("feed-1"));
    }

    #[test]
    fn test_delete_semantics() {
        let db = Database::in_memory().unwrap();
        let id = db
            .insert_transaction(&record("10.00", TransactionType::Expense, date(2024, 6, 1)))
            .unwrap();

        assert!(db.delete_transaction(id).unwrap());
        assert!(!db.delete_transaction(id).unwrap());
        assert!(!db.delete_transaction(9999).unwrap());
    }

    #[test]
    fn test_external_id_lookup() {
        let db = Database::in_memory().unwrap();
        let mut rec = record("10.00", TransactionType::Expense, date(2024, 6, 1));
        rec.external_id = Some("wx-20240601-001".to_string());
        let id = db.insert_transaction(&rec).unwrap();

        assert!(db.exists_by_external_id("wx-20240601-001").unwrap());
        assert!(!db.exists_by_external_id("wx-20240601-002").unwrap());

        let found = db.find_by_external_id("wx-20240601-001").unwrap().unwrap();
        assert_eq!(found.id, id);
    }

    #[test]
    fn test_list_ordered_by_date_desc() {
        let db = Database::in_memory().unwrap();
        db.insert_transaction(&record("1.00", TransactionType::Expense, date(2024, 6, 1)))
            .unwrap();
        db.insert_transaction(&record("2.00", TransactionType::Expense, date(2024, 6, 3)))
            .unwrap();
        db.insert_transaction(&record("3.00", TransactionType::Expense, date(2024, 6, 2)))
            .unwrap();

        let all = db.list_transactions(10, 0).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].amount, dec("2.00"));
        assert_eq!(all[1].amount, dec("3.00"));
        assert_eq!(all[2].amount, dec("1.00"));

        let page = db.list_transactions(1, 1).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].amount, dec("3.00"));

        let recent = db.list_recent(2).unwrap();
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn test_list_by_category() {
        let db = Database::in_memory().unwrap();
        let mut coffee = record("4.50", TransactionType::Expense, date(2024, 6, 1));
        coffee.category = TransactionCategory::CoffeeTea;
        db.insert_transaction(&coffee).unwrap();
        db.insert_transaction(&record("10.00", TransactionType::Expense, date(2024, 6, 1)))
            .unwrap();

        let found = db
            .list_by_category(TransactionCategory::CoffeeTea, 10, 0)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].amount, dec("4.50"));
        assert_eq!(db.count_by_category(TransactionCategory::CoffeeTea).unwrap(), 1);
        assert_eq!(db.count_by_category(TransactionCategory::Rent).unwrap(), 0);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let db = Database::in_memory().unwrap();
        db.insert_transaction(&record("1.00", TransactionType::Expense, date(2024, 6, 1)))
            .unwrap();
        db.insert_transaction(&record("2.00", TransactionType::Expense, date(2024, 6, 2)))
            .unwrap();
        db.insert_transaction(&record("3.00", TransactionType::Expense, date(2024, 6, 3)))
            .unwrap();

        let window = db
            .list_by_date_range(date(2024, 6, 1), date(2024, 6, 2))
            .unwrap();
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_search_matches_description_or_merchant_once() {
        let db = Database::in_memory().unwrap();

        let mut both = record("5.00", TransactionType::Expense, date(2024, 6, 1));
        both.description = Some("oat milk latte".to_string());
        both.merchant = Some("Latte Labs".to_string());
        db.insert_transaction(&both).unwrap();

        let mut desc_only = record("6.00", TransactionType::Expense, date(2024, 6, 2));
        desc_only.description = Some("LATTE and croissant".to_string());
        db.insert_transaction(&desc_only).unwrap();

        let mut neither = record("7.00", TransactionType::Expense, date(2024, 6, 3));
        neither.description = Some("groceries".to_string());
        db.insert_transaction(&neither).unwrap();

        let hits = db.search_transactions("latte").unwrap();
        assert_eq!(hits.len(), 2, "record matching both fields must appear once");
    }

    #[test]
    fn test_sum_amount_by_type() {
        let db = Database::in_memory().unwrap();
        db.insert_transaction(&record("100.00", TransactionType::Expense, date(2024, 6, 1)))
            .unwrap();
        db.insert_transaction(&record("40.00", TransactionType::Income, date(2024, 6, 2)))
            .unwrap();
        db.insert_transaction(&record("999.00", TransactionType::Expense, date(2024, 7, 1)))
            .unwrap();

        let expenses = db
            .sum_amount_by_type(TransactionType::Expense, date(2024, 6, 1), date(2024, 6, 30))
            .unwrap();
        assert_eq!(expenses, dec("100.00"));

        let income = db
            .sum_amount_by_type(TransactionType::Income, date(2024, 6, 1), date(2024, 6, 30))
            .unwrap();
        assert_eq!(income, dec("40.00"));

        // Reversed window matches nothing
        let none = db
            .sum_amount_by_type(TransactionType::Expense, date(2024, 6, 30), date(2024, 6, 1))
            .unwrap();
        assert_eq!(none, Decimal::ZERO);
    }

    #[test]
    fn test_sum_is_exact_decimal() {
        let db = Database::in_memory().unwrap();
        // 0.10 summed ten times is exactly 1.00 in decimal; floats drift
        for _ in 0..10 {
            db.insert_transaction(&record("0.10", TransactionType::Expense, date(2024, 6, 1)))
                .unwrap();
        }
        let total = db
            .sum_amount_by_type(TransactionType::Expense, date(2024, 6, 1), date(2024, 6, 1))
            .unwrap();
        assert_eq!(total, dec("1.00"));
    }

    #[test]
    fn test_sum_expenses_by_category_omits_zero_entries() {
        let db = Database::in_memory().unwrap();

        let mut coffee = record("4.50", TransactionType::Expense, date(2024, 6, 1));
        coffee.category = TransactionCategory::CoffeeTea;
        db.insert_transaction(&coffee).unwrap();

        let mut coffee2 = record("3.50", TransactionType::Expense, date(2024, 6, 2));
        coffee2.category = TransactionCategory::CoffeeTea;
        db.insert_transaction(&coffee2).unwrap();

        let mut rent = record("1200.00", TransactionType::Expense, date(2024, 6, 1));
        rent.category = TransactionCategory::Rent;
        db.insert_transaction(&rent).unwrap();

        // Income must not show up in the expense breakdown
        let mut salary = record("5000.00", TransactionType::Income, date(2024, 6, 1));
        salary.category = TransactionCategory::Other;
        db.insert_transaction(&salary).unwrap();

        let breakdown = db
            .sum_expenses_by_category(date(2024, 6, 1), date(2024, 6, 30))
            .unwrap();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0], (TransactionCategory::Rent, dec("1200.00")));
        assert_eq!(breakdown[1], (TransactionCategory::CoffeeTea, dec("8.00")));
    }

    #[test]
    fn test_reset_clears_transactions() {
        let db = Database::in_memory().unwrap();
        db.insert_transaction(&record("10.00", TransactionType::Expense, date(2024, 6, 1)))
            .unwrap();
        db.reset().unwrap();
        assert_eq!(db.count_transactions().unwrap(), 0);
    }
}
