//! Tally Core Library
//!
//! Shared functionality for the Tally AI-assisted expense tracker:
//! - Domain models (transaction types, categories, scenarios)
//! - Pluggable AI backends (Ollama, OpenAI-compatible) behind one trait
//! - Classifier with deterministic fallback when the model is unavailable
//! - SQLite record store with optional encryption at rest
//! - Transaction orchestration (validate, classify, persist)
//! - Exact-decimal aggregate statistics

pub mod ai;
pub mod classifier;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
pub mod stats;

/// Test utilities including mock LLM server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, AnalysisResult, MockBackend, OllamaBackend, OpenAICompatibleBackend};
pub use classifier::Classifier;
pub use db::Database;
pub use error::{Error, Result};
pub use models::{
    CategoryTotal, NewTransaction, NewTransactionRecord, StatisticsSummary, Transaction,
    TransactionCategory, TransactionScenario, TransactionType,
};
pub use service::{CreateOutcome, TransactionService};
