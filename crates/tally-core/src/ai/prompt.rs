//! Prompt construction for transaction analysis
//!
//! One prompt per classification call. The prompt pins the full closed
//! vocabulary for type/category/scenario so the model cannot invent values,
//! and demands a bare JSON object so `parsing` can brace-extract it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{TransactionCategory, TransactionScenario, TransactionType};

/// Build the analysis prompt for a raw transaction
///
/// `now` is the wall-clock context the model uses for cues like "late night"
/// or "weekday lunch"; callers pass `Utc::now()` outside of tests.
pub fn build_analysis_prompt(
    amount: Decimal,
    description: Option<&str>,
    merchant: Option<&str>,
    location: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let types = join_wire_names(TransactionType::all().iter().map(|t| (t.as_str(), t.display_name())));
    let categories =
        join_wire_names(TransactionCategory::all().iter().map(|c| (c.as_str(), c.display_name())));
    let scenarios =
        join_wire_names(TransactionScenario::all().iter().map(|s| (s.as_str(), s.display_name())));

    format!(
        r#"Analyze this financial transaction and respond with a single JSON object.

Amount: {amount}
Description: {description}
Merchant: {merchant}
Location: {location}
Current time: {time}

Rules:
1. "type" must be one of: {types}
2. "category" must be one of: {categories}
3. "scenario" must be one of: {scenarios}
4. "merchant": extract or infer the merchant name
5. "description": a short description of the transaction
6. "analysis": one or two sentences explaining the classification

Respond with exactly this JSON shape and nothing else:
{{
    "type": "EXPENSE",
    "category": "FOOD_DINING",
    "scenario": "REGULAR",
    "merchant": "merchant name",
    "description": "transaction description",
    "analysis": "why this classification"
}}"#,
        amount = amount,
        description = description.unwrap_or(""),
        merchant = merchant.unwrap_or(""),
        location = location.unwrap_or(""),
        time = now.format("%Y-%m-%d %H:%M:%S UTC"),
        types = types,
        categories = categories,
        scenarios = scenarios,
    )
}

fn join_wire_names<'a>(items: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    items
        .map(|(wire, label)| format!("{} ({})", wire, label))
        .collect::<Vec<_>>()
        .join(", ")
}
