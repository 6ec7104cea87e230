//! AI backend response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::{Deserialize, Serialize};

use crate::models::{TransactionCategory, TransactionScenario, TransactionType};

/// Result of transaction analysis
///
/// Every field is populated: either by the model's validated response or by
/// the deterministic fallback. Never persisted directly; the orchestrator
/// merges it into a transaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub category: TransactionCategory,
    pub scenario: TransactionScenario,
    pub merchant: String,
    pub description: String,
    /// Free-text explanation of the classification
    pub analysis: String,
}

impl AnalysisResult {
    /// Deterministic default classification
    ///
    /// Used whenever the provider errors, times out, or returns anything that
    /// does not validate against the response schema.
    pub fn fallback() -> Self {
        Self {
            tx_type: TransactionType::Expense,
            category: TransactionCategory::Other,
            scenario: TransactionScenario::Regular,
            merchant: "unknown merchant".to_string(),
            description: "transaction".to_string(),
            analysis: "AI analysis unavailable, default classification applied".to_string(),
        }
    }
}
