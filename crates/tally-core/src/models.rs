//! Domain models for Tally

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction type - direction of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    #[default]
    Expense,
    Income,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "EXPENSE",
            Self::Income => "INCOME",
            Self::Transfer => "TRANSFER",
        }
    }

    /// Human-readable label for display
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Transfer => "transfer",
        }
    }

    pub fn all() -> &'static [TransactionType] {
        &[Self::Expense, Self::Income, Self::Transfer]
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EXPENSE" => Ok(Self::Expense),
            "INCOME" => Ok(Self::Income),
            "TRANSFER" => Ok(Self::Transfer),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction category - closed set the classifier picks from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionCategory {
    // Food
    FoodDining,
    CoffeeTea,
    Snacks,
    // Transport
    Transportation,
    PublicTransport,
    TaxiRideshare,
    Fuel,
    Parking,
    // Shopping
    Shopping,
    Clothing,
    Electronics,
    Books,
    Groceries,
    // Entertainment
    Entertainment,
    Movies,
    Games,
    Sports,
    Travel,
    // Living
    Utilities,
    Rent,
    Insurance,
    Healthcare,
    Education,
    // Work
    WorkExpenses,
    Reimbursement,
    // Catch-all
    #[default]
    Other,
    Refund,
    Transfer,
}

impl TransactionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoodDining => "FOOD_DINING",
            Self::CoffeeTea => "COFFEE_TEA",
            Self::Snacks => "SNACKS",
            Self::Transportation => "TRANSPORTATION",
            Self::PublicTransport => "PUBLIC_TRANSPORT",
            Self::TaxiRideshare => "TAXI_RIDESHARE",
            Self::Fuel => "FUEL",
            Self::Parking => "PARKING",
            Self::Shopping => "SHOPPING",
            Self::Clothing => "CLOTHING",
            Self::Electronics => "ELECTRONICS",
            Self::Books => "BOOKS",
            Self::Groceries => "GROCERIES",
            Self::Entertainment => "ENTERTAINMENT",
            Self::Movies => "MOVIES",
            Self::Games => "GAMES",
            Self::Sports => "SPORTS",
            Self::Travel => "TRAVEL",
            Self::Utilities => "UTILITIES",
            Self::Rent => "RENT",
            Self::Insurance => "INSURANCE",
            Self::Healthcare => "HEALTHCARE",
            Self::Education => "EDUCATION",
            Self::WorkExpenses => "WORK_EXPENSES",
            Self::Reimbursement => "REIMBURSEMENT",
            Self::Other => "OTHER",
            Self::Refund => "REFUND",
            Self::Transfer => "TRANSFER",
        }
    }

    /// Human-readable label for display
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::FoodDining => "dining",
            Self::CoffeeTea => "coffee & tea",
            Self::Snacks => "snacks",
            Self::Transportation => "transport",
            Self::PublicTransport => "public transport",
            Self::TaxiRideshare => "taxi & rideshare",
            Self::Fuel => "fuel",
            Self::Parking => "parking",
            Self::Shopping => "shopping",
            Self::Clothing => "clothing",
            Self::Electronics => "electronics",
            Self::Books => "books",
            Self::Groceries => "groceries",
            Self::Entertainment => "entertainment",
            Self::Movies => "movies",
            Self::Games => "games",
            Self::Sports => "sports",
            Self::Travel => "travel",
            Self::Utilities => "utilities",
            Self::Rent => "rent",
            Self::Insurance => "insurance",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::WorkExpenses => "work expenses",
            Self::Reimbursement => "reimbursement",
            Self::Other => "other",
            Self::Refund => "refund",
            Self::Transfer => "transfer",
        }
    }

    pub fn all() -> &'static [TransactionCategory] {
        &[
            Self::FoodDining,
            Self::CoffeeTea,
            Self::Snacks,
            Self::Transportation,
            Self::PublicTransport,
            Self::TaxiRideshare,
            Self::Fuel,
            Self::Parking,
            Self::Shopping,
            Self::Clothing,
            Self::Electronics,
            Self::Books,
            Self::Groceries,
            Self::Entertainment,
            Self::Movies,
            Self::Games,
            Self::Sports,
            Self::Travel,
            Self::Utilities,
            Self::Rent,
            Self::Insurance,
            Self::Healthcare,
            Self::Education,
            Self::WorkExpenses,
            Self::Reimbursement,
            Self::Other,
            Self::Refund,
            Self::Transfer,
        ]
    }
}

impl std::str::FromStr for TransactionCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        Self::all()
            .iter()
            .find(|c| c.as_str() == normalized)
            .copied()
            .ok_or_else(|| format!("Unknown transaction category: {}", s))
    }
}

impl std::fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction scenario - special handling semantics, orthogonal to category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionScenario {
    #[default]
    Regular,
    Reimbursement,
    Refund,
    Subscription,
    Recurring,
    SplitPayment,
    Gift,
    BusinessExpense,
    PersonalExpense,
}

impl TransactionScenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "REGULAR",
            Self::Reimbursement => "REIMBURSEMENT",
            Self::Refund => "REFUND",
            Self::Subscription => "SUBSCRIPTION",
            Self::Recurring => "RECURRING",
            Self::SplitPayment => "SPLIT_PAYMENT",
            Self::Gift => "GIFT",
            Self::BusinessExpense => "BUSINESS_EXPENSE",
            Self::PersonalExpense => "PERSONAL_EXPENSE",
        }
    }

    /// Human-readable label for display
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Reimbursement => "reimbursement",
            Self::Refund => "refund",
            Self::Subscription => "subscription",
            Self::Recurring => "recurring",
            Self::SplitPayment => "split payment",
            Self::Gift => "gift",
            Self::BusinessExpense => "business expense",
            Self::PersonalExpense => "personal expense",
        }
    }

    pub fn all() -> &'static [TransactionScenario] {
        &[
            Self::Regular,
            Self::Reimbursement,
            Self::Refund,
            Self::Subscription,
            Self::Recurring,
            Self::SplitPayment,
            Self::Gift,
            Self::BusinessExpense,
            Self::PersonalExpense,
        ]
    }
}

impl std::str::FromStr for TransactionScenario {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "REGULAR" => Ok(Self::Regular),
            "REIMBURSEMENT" => Ok(Self::Reimbursement),
            "REFUND" => Ok(Self::Refund),
            "SUBSCRIPTION" => Ok(Self::Subscription),
            "RECURRING" => Ok(Self::Recurring),
            "SPLIT_PAYMENT" => Ok(Self::SplitPayment),
            "GIFT" => Ok(Self::Gift),
            "BUSINESS_EXPENSE" => Ok(Self::BusinessExpense),
            "PERSONAL_EXPENSE" => Ok(Self::PersonalExpense),
            _ => Err(format!("Unknown transaction scenario: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    /// Always positive; direction is carried by `tx_type`
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub category: TransactionCategory,
    pub scenario: TransactionScenario,
    pub description: Option<String>,
    pub merchant: Option<String>,
    pub location: Option<String>,
    /// When the money actually moved (not when the record was created)
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Classifier explanation, human-readable only
    pub ai_analysis: Option<String>,
    /// Where this record came from ("manual entry", bank feed name, ...)
    pub source: Option<String>,
    /// External-system id for feed de-duplication
    pub external_id: Option<String>,
}

/// Raw input for creating or updating a transaction
///
/// Only `amount` is required; everything else is inferred by the classifier
/// or defaulted at persistence time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub description: Option<String>,
    pub merchant: Option<String>,
    pub location: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub source: Option<String>,
    pub external_id: Option<String>,
}

impl NewTransaction {
    /// Amount-only input, used by quick capture
    pub fn from_amount(amount: Decimal) -> Self {
        Self {
            amount,
            ..Default::default()
        }
    }
}

/// Fully-classified record ready for persistence
///
/// Built by the orchestrator after classification (or fallback) completes;
/// the store assigns `id`, `created_at`, and `updated_at`.
#[derive(Debug, Clone)]
pub struct NewTransactionRecord {
    pub amount: Decimal,
    pub tx_type: TransactionType,
    pub category: TransactionCategory,
    pub scenario: TransactionScenario,
    pub description: Option<String>,
    pub merchant: Option<String>,
    pub location: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub ai_analysis: Option<String>,
    pub source: Option<String>,
    pub external_id: Option<String>,
}

/// Expense total for a single category within a statistics window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: TransactionCategory,
    pub total: Decimal,
}

/// Aggregate totals over an inclusive date window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub total_expenses: Decimal,
    pub total_income: Decimal,
    /// total_income - total_expenses; negative when spending exceeds income
    pub net_amount: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// EXPENSE totals per category, zero categories omitted
    pub by_category: Vec<CategoryTotal>,
}
