//! Mock backend for testing
//!
//! Keyword heuristics stand in for the model so unit tests and development
//! work without a running LLM server.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{TransactionCategory, TransactionScenario, TransactionType};

use super::types::AnalysisResult;
use super::AIBackend;

/// Mock AI backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// When set, analyze_transaction always errors (exercises fallback paths)
    pub failing: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            failing: false,
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            failing: false,
        }
    }

    /// Create a mock backend whose analysis calls always fail
    pub fn failing() -> Self {
        Self {
            healthy: true,
            failing: true,
        }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn analyze_transaction(
        &self,
        _amount: Decimal,
        description: Option<&str>,
        merchant: Option<&str>,
        _location: Option<&str>,
    ) -> Result<AnalysisResult> {
        if self.failing {
            return Err(Error::InvalidData("mock backend configured to fail".into()));
        }

        let text = format!(
            "{} {}",
            description.unwrap_or(""),
            merchant.unwrap_or("")
        )
        .to_uppercase();

        let (tx_type, category) = if text.contains("SALARY") || text.contains("PAYCHECK") {
            (TransactionType::Income, TransactionCategory::Other)
        } else if text.contains("COFFEE") || text.contains("STARBUCKS") || text.contains("LATTE") {
            (TransactionType::Expense, TransactionCategory::CoffeeTea)
        } else if text.contains("LUNCH") || text.contains("DINNER") || text.contains("RESTAURANT") {
            (TransactionType::Expense, TransactionCategory::FoodDining)
        } else if text.contains("UBER") || text.contains("LYFT") || text.contains("TAXI") {
            (TransactionType::Expense, TransactionCategory::TaxiRideshare)
        } else if text.contains("TRAIN") || text.contains("METRO") || text.contains("BUS") {
            (TransactionType::Expense, TransactionCategory::PublicTransport)
        } else if text.contains("NETFLIX") || text.contains("SPOTIFY") {
            (TransactionType::Expense, TransactionCategory::Entertainment)
        } else if text.contains("GROCERY") || text.contains("SUPERMARKET") {
            (TransactionType::Expense, TransactionCategory::Groceries)
        } else if text.contains("RENT") {
            (TransactionType::Expense, TransactionCategory::Rent)
        } else {
            (TransactionType::Expense, TransactionCategory::Other)
        };

        let scenario = if text.contains("NETFLIX") || text.contains("SPOTIFY") {
            TransactionScenario::Subscription
        } else if text.contains("REFUND") {
            TransactionScenario::Refund
        } else {
            TransactionScenario::Regular
        };

        Ok(AnalysisResult {
            tx_type,
            category,
            scenario,
            merchant: merchant.unwrap_or("unknown merchant").to_string(),
            description: description.unwrap_or("transaction").to_string(),
            analysis: format!("Mock classification as {}", category.display_name()),
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount() -> Decimal {
        "10.00".parse().unwrap()
    }

    #[tokio::test]
    async fn test_mock_classifies_coffee() {
        let mock = MockBackend::new();
        let result = mock
            .analyze_transaction(amount(), Some("morning latte"), Some("Blue Bottle"), None)
            .await
            .unwrap();
        assert_eq!(result.category, TransactionCategory::CoffeeTea);
        assert_eq!(result.tx_type, TransactionType::Expense);
        assert_eq!(result.merchant, "Blue Bottle");
    }

    #[tokio::test]
    async fn test_mock_classifies_subscription() {
        let mock = MockBackend::new();
        let result = mock
            .analyze_transaction(amount(), None, Some("NETFLIX.COM"), None)
            .await
            .unwrap();
        assert_eq!(result.scenario, TransactionScenario::Subscription);
    }

    #[tokio::test]
    async fn test_mock_unknown_input_defaults() {
        let mock = MockBackend::new();
        let result = mock
            .analyze_transaction(amount(), None, None, None)
            .await
            .unwrap();
        assert_eq!(result.category, TransactionCategory::Other);
        assert_eq!(result.merchant, "unknown merchant");
    }

    #[tokio::test]
    async fn test_mock_failing_errors() {
        let mock = MockBackend::failing();
        assert!(mock
            .analyze_transaction(amount(), None, None, None)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        assert!(MockBackend::new().health_check().await);
        assert!(!MockBackend::unhealthy().health_check().await);
    }
}
