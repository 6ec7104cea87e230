//! Transaction orchestration
//!
//! Owns the lifecycle of a transaction record: validate, classify, persist.
//! The classifier is advisory (its failure degrades to the fallback
//! classification); the record store is authoritative (its failure fails the
//! operation).

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::classifier::Classifier;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{NewTransaction, NewTransactionRecord, Transaction, TransactionCategory};

/// Default `source` for records created without provenance
const DEFAULT_SOURCE: &str = "manual entry";

/// Outcome of a create call
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    /// A new record was classified and persisted
    Created(Transaction),
    /// The external id was already recorded; the existing record is returned
    /// untouched and no classification runs
    Duplicate(Transaction),
}

impl CreateOutcome {
    /// The record, regardless of whether it was just created
    pub fn record(&self) -> &Transaction {
        match self {
            Self::Created(tx) | Self::Duplicate(tx) => tx,
        }
    }

    pub fn into_record(self) -> Transaction {
        match self {
            Self::Created(tx) | Self::Duplicate(tx) => tx,
        }
    }
}

/// Transaction service coordinating the classifier and the record store
#[derive(Clone)]
pub struct TransactionService {
    db: Database,
    classifier: Classifier,
}

impl TransactionService {
    pub fn new(db: Database, classifier: Classifier) -> Self {
        Self { db, classifier }
    }

    /// The underlying store (for statistics and maintenance paths)
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The classifier (for health reporting)
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Create a transaction from raw input
    ///
    /// Validation happens before classification so an invalid amount never
    /// costs an LLM call. When the input carries an `external_id` that was
    /// already recorded, the existing record is returned as a duplicate.
    pub async fn create(&self, input: NewTransaction) -> Result<CreateOutcome> {
        let amount = validate_amount(input.amount)?;

        if let Some(ref external_id) = input.external_id {
            if let Some(existing) = self.db.find_by_external_id(external_id)? {
                warn!(external_id = %external_id, id = existing.id, "Duplicate external id, returning existing record");
                return Ok(CreateOutcome::Duplicate(existing));
            }
        }

        let analysis = self
            .classifier
            .classify(
                amount,
                input.description.as_deref(),
                input.merchant.as_deref(),
                input.location.as_deref(),
            )
            .await;

        let record = NewTransactionRecord {
            amount,
            tx_type: analysis.tx_type,
            category: analysis.category,
            scenario: analysis.scenario,
            description: Some(analysis.description),
            merchant: Some(analysis.merchant),
            location: input.location,
            transaction_date: input.transaction_date.unwrap_or_else(Utc::now),
            ai_analysis: Some(analysis.analysis),
            source: input.source.or_else(|| Some(DEFAULT_SOURCE.to_string())),
            external_id: input.external_id,
        };

        let id = self.db.insert_transaction(&record)?;
        let created = self
            .db
            .get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {} vanished after insert", id)))?;

        info!(
            id = created.id,
            category = %created.category,
            amount = %created.amount,
            "Transaction created"
        );
        Ok(CreateOutcome::Created(created))
    }

    /// Update a transaction, re-running classification against the new input
    ///
    /// Classification always re-runs, even when only non-semantic fields
    /// changed, so category correctness tracks the latest description and
    /// merchant. Returns None (with no store write) when the id is unknown.
    pub async fn update(&self, id: i64, input: NewTransaction) -> Result<Option<Transaction>> {
        let amount = validate_amount(input.amount)?;

        let Some(existing) = self.db.get_transaction(id)? else {
            return Ok(None);
        };

        let analysis = self
            .classifier
            .classify(
                amount,
                input.description.as_deref(),
                input.merchant.as_deref(),
                input.location.as_deref(),
            )
            .await;

        let record = NewTransactionRecord {
            amount,
            tx_type: analysis.tx_type,
            category: analysis.category,
            scenario: analysis.scenario,
            description: input.description,
            merchant: input.merchant,
            location: input.location,
            transaction_date: input.transaction_date.unwrap_or(existing.transaction_date),
            ai_analysis: Some(analysis.analysis),
            // Provenance is immutable; the store ignores these on update
            source: existing.source.clone(),
            external_id: existing.external_id.clone(),
        };

        self.db.update_transaction(id, &record)?;
        let updated = self
            .db
            .get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {} vanished after update", id)))?;

        info!(id, category = %updated.category, "Transaction updated");
        Ok(Some(updated))
    }

    /// Delete a transaction by id
    ///
    /// Returns whether a record existed and was removed; deleting an unknown
    /// id reports false rather than an error.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let deleted = self.db.delete_transaction(id)?;
        if deleted {
            info!(id, "Transaction deleted");
        }
        Ok(deleted)
    }

    /// Get a transaction by id
    pub fn get(&self, id: i64) -> Result<Option<Transaction>> {
        self.db.get_transaction(id)
    }

    /// List transactions, newest first, with the total count for paging
    pub fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Transaction>, i64)> {
        let transactions = self.db.list_transactions(limit, offset)?;
        let total = self.db.count_transactions()?;
        Ok((transactions, total))
    }

    /// List the most recent transactions (default 10)
    pub fn list_recent(&self, limit: Option<i64>) -> Result<Vec<Transaction>> {
        self.db.list_recent(limit.unwrap_or(10))
    }

    /// List transactions in a category, newest first
    pub fn list_by_category(
        &self,
        category: TransactionCategory,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Transaction>, i64)> {
        let transactions = self.db.list_by_category(category, limit, offset)?;
        let total = self.db.count_by_category(category)?;
        Ok((transactions, total))
    }

    /// List transactions in an inclusive date window, newest first
    pub fn list_by_date_range(
        &self,
        start: chrono::DateTime<Utc>,
        end: chrono::DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        self.db.list_by_date_range(start, end)
    }

    /// Search by keyword over description and merchant
    ///
    /// Case-insensitive; records matching both fields appear once.
    pub fn search(&self, keyword: &str) -> Result<Vec<Transaction>> {
        self.db.search_transactions(keyword)
    }
}

/// Reject non-positive amounts and normalize to two decimal places
///
/// Rescaling pins the exact currency precision, so "25.5" and "25.50" are the
/// same stored value and render the same on the wire.
fn validate_amount(amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidData(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    let mut normalized = amount.round_dp(2);
    normalized.rescale(2);
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AIClient, MockBackend};
    use crate::models::{TransactionScenario, TransactionType};
    use chrono::TimeZone;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn service() -> TransactionService {
        TransactionService::new(
            Database::in_memory().unwrap(),
            Classifier::new(AIClient::mock()),
        )
    }

    fn service_with_dead_classifier() -> TransactionService {
        TransactionService::new(
            Database::in_memory().unwrap(),
            Classifier::new(AIClient::Mock(MockBackend::failing())),
        )
    }

    #[tokio::test]
    async fn test_create_classifies_and_persists() {
        let svc = service();
        let input = NewTransaction {
            amount: dec("25.50"),
            description: Some("team lunch".to_string()),
            merchant: Some("Chipotle".to_string()),
            ..Default::default()
        };

        let outcome = svc.create(input).await.unwrap();
        let tx = match outcome {
            CreateOutcome::Created(tx) => tx,
            CreateOutcome::Duplicate(_) => panic!("expected a new record"),
        };

        assert_eq!(tx.amount, dec("25.50"));
        assert_eq!(tx.category, TransactionCategory::FoodDining);
        assert_eq!(tx.source.as_deref(), Some("manual entry"));
        assert!(tx.ai_analysis.is_some());
    }

    #[tokio::test]
    async fn test_create_with_dead_classifier_uses_fallback() {
        let svc = service_with_dead_classifier();
        let outcome = svc
            .create(NewTransaction::from_amount(dec("25.50")))
            .await
            .unwrap();
        let tx = outcome.into_record();

        assert_eq!(tx.amount, dec("25.50"));
        assert_eq!(tx.tx_type, TransactionType::Expense);
        assert_eq!(tx.category, TransactionCategory::Other);
        assert_eq!(tx.scenario, TransactionScenario::Regular);
        assert_eq!(tx.merchant.as_deref(), Some("unknown merchant"));
        assert_eq!(tx.description.as_deref(), Some("transaction"));
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_amount() {
        let svc = service();
        for bad in ["0", "-5.00"] {
            let err = svc
                .create(NewTransaction::from_amount(dec(bad)))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidData(_)));
        }
        assert_eq!(svc.db().count_transactions().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_normalizes_amount_precision() {
        let svc = service();
        let tx = svc
            .create(NewTransaction::from_amount(dec("9.999")))
            .await
            .unwrap()
            .into_record();
        assert_eq!(tx.amount, dec("10.00"));
        // Scale is pinned to 2 so the wire format always shows cents
        assert_eq!(tx.amount.to_string(), "10.00");
    }

    #[tokio::test]
    async fn test_create_deduplicates_by_external_id() {
        let svc = service();
        let input = NewTransaction {
            amount: dec("12.00"),
            external_id: Some("feed-001".to_string()),
            source: Some("bank feed".to_string()),
            ..Default::default()
        };

        let first = svc.create(input.clone()).await.unwrap();
        assert!(matches!(first, CreateOutcome::Created(_)));

        let second = svc.create(input).await.unwrap();
        let CreateOutcome::Duplicate(dup) = second else {
            panic!("expected duplicate outcome");
        };
        assert_eq!(dup.id, first.record().id);
        assert_eq!(svc.db().count_transactions().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_reclassifies_from_new_input() {
        let svc = service();

        // First classified as dining
        let created = svc
            .create(NewTransaction {
                amount: dec("30.00"),
                description: Some("dinner".to_string()),
                ..Default::default()
            })
            .await
            .unwrap()
            .into_record();
        assert_eq!(created.category, TransactionCategory::FoodDining);

        // New description must drive a fresh classification
        let updated = svc
            .update(
                created.id,
                NewTransaction {
                    amount: dec("9.99"),
                    description: Some("train ticket".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.amount, dec("9.99"));
        assert_eq!(updated.category, TransactionCategory::PublicTransport);
        assert_eq!(updated.description.as_deref(), Some("train ticket"));
    }

    #[tokio::test]
    async fn test_update_unknown_id_writes_nothing() {
        let svc = service();
        let result = svc
            .update(12345, NewTransaction::from_amount(dec("1.00")))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(svc.db().count_transactions().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let svc = service();
        let tx = svc
            .create(NewTransaction::from_amount(dec("5.00")))
            .await
            .unwrap()
            .into_record();

        assert!(svc.delete(tx.id).unwrap());
        assert!(!svc.delete(tx.id).unwrap());
    }

    #[tokio::test]
    async fn test_search_union_without_duplicates() {
        let svc = service();
        svc.create(NewTransaction {
            amount: dec("4.50"),
            description: Some("oat latte".to_string()),
            merchant: Some("Latte Labs".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
        svc.create(NewTransaction {
            amount: dec("7.00"),
            description: Some("groceries".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

        let hits = svc.search("latte").unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_transaction_date_defaults_to_now() {
        let svc = service();
        let before = Utc::now();
        let tx = svc
            .create(NewTransaction::from_amount(dec("5.00")))
            .await
            .unwrap()
            .into_record();
        // Stored with second precision, so allow a small window
        assert!(tx.transaction_date >= before - chrono::Duration::seconds(2));
        assert!(tx.transaction_date <= Utc::now() + chrono::Duration::seconds(2));
    }

    #[tokio::test]
    async fn test_explicit_transaction_date_passes_through() {
        let svc = service();
        let when = Utc.with_ymd_and_hms(2023, 11, 5, 8, 30, 0).unwrap();
        let tx = svc
            .create(NewTransaction {
                amount: dec("5.00"),
                transaction_date: Some(when),
                ..Default::default()
            })
            .await
            .unwrap()
            .into_record();
        assert_eq!(tx.transaction_date, when);
    }
}
