//! JSON parsing for AI backend responses
//!
//! Models often wrap the JSON payload in prose, so the first balanced JSON
//! object is brace-extracted before deserialization. Validation is
//! all-or-nothing: a missing field or an out-of-vocabulary enum value fails
//! the whole parse, and the caller falls back to the default classification.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{TransactionCategory, TransactionScenario, TransactionType};

use super::types::AnalysisResult;

/// String-typed response shape, validated before enum mapping
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(rename = "type")]
    tx_type: String,
    category: String,
    scenario: String,
    merchant: String,
    description: String,
    analysis: String,
}

/// Parse a transaction analysis from raw model output
pub fn parse_analysis(response: &str) -> Result<AnalysisResult> {
    let json_str = extract_json_object(response)?;

    let raw: RawAnalysis = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid analysis JSON from AI: {} | Raw: {}",
            e,
            truncate(json_str, 200)
        ))
    })?;

    let tx_type: TransactionType = raw.tx_type.parse().map_err(Error::InvalidData)?;
    let category: TransactionCategory = raw.category.parse().map_err(Error::InvalidData)?;
    let scenario: TransactionScenario = raw.scenario.parse().map_err(Error::InvalidData)?;

    Ok(AnalysisResult {
        tx_type,
        category,
        scenario,
        merchant: raw.merchant,
        description: raw.description,
        analysis: raw.analysis,
    })
}

/// Find the first balanced JSON object in the response
fn extract_json_object(response: &str) -> Result<&str> {
    let response = response.trim();

    if let Some(start) = response.find('{') {
        let mut depth = 0;
        for (i, c) in response[start..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(&response[start..=start + i]);
                    }
                }
                _ => {}
            }
        }
    }

    Err(Error::InvalidData(format!(
        "No JSON found in AI response | Raw: {}",
        truncate(response, 200)
    )))
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analysis() {
        let response = r#"{
            "type": "EXPENSE",
            "category": "COFFEE_TEA",
            "scenario": "REGULAR",
            "merchant": "Starbucks",
            "description": "morning coffee",
            "analysis": "Coffee shop purchase at a known chain"
        }"#;
        let result = parse_analysis(response).unwrap();
        assert_eq!(result.tx_type, TransactionType::Expense);
        assert_eq!(result.category, TransactionCategory::CoffeeTea);
        assert_eq!(result.scenario, TransactionScenario::Regular);
        assert_eq!(result.merchant, "Starbucks");
    }

    #[test]
    fn test_parse_analysis_with_surrounding_text() {
        let response = r#"Here's the classification:
{"type": "INCOME", "category": "REIMBURSEMENT", "scenario": "REIMBURSEMENT", "merchant": "Acme Corp", "description": "expense reimbursement", "analysis": "Incoming payment from employer"}
Done!"#;
        let result = parse_analysis(response).unwrap();
        assert_eq!(result.tx_type, TransactionType::Income);
        assert_eq!(result.category, TransactionCategory::Reimbursement);
    }

    #[test]
    fn test_parse_analysis_case_insensitive_enums() {
        let response = r#"{"type": "expense", "category": "food_dining", "scenario": "regular", "merchant": "m", "description": "d", "analysis": "a"}"#;
        let result = parse_analysis(response).unwrap();
        assert_eq!(result.category, TransactionCategory::FoodDining);
    }

    #[test]
    fn test_parse_analysis_rejects_missing_field() {
        // no "scenario"
        let response = r#"{"type": "EXPENSE", "category": "OTHER", "merchant": "m", "description": "d", "analysis": "a"}"#;
        assert!(parse_analysis(response).is_err());
    }

    #[test]
    fn test_parse_analysis_rejects_unknown_category() {
        let response = r#"{"type": "EXPENSE", "category": "CRYPTO_YOLO", "scenario": "REGULAR", "merchant": "m", "description": "d", "analysis": "a"}"#;
        assert!(parse_analysis(response).is_err());
    }

    #[test]
    fn test_parse_analysis_rejects_non_json() {
        assert!(parse_analysis("I cannot classify this transaction.").is_err());
        assert!(parse_analysis("").is_err());
    }

    #[test]
    fn test_extract_first_balanced_object() {
        let response = r#"{"a": {"b": 1}} trailing {"c": 2}"#;
        assert_eq!(extract_json_object(response).unwrap(), r#"{"a": {"b": 1}}"#);
    }
}
