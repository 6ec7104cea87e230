//! Request handlers
//!
//! Organized by domain:
//! - `transactions` - Transaction CRUD, search, and list endpoints
//! - `statistics` - Aggregate statistics endpoint

mod statistics;
mod transactions;

pub use statistics::get_statistics;
pub use transactions::{
    create_transaction, delete_transaction, get_transaction, list_transactions,
    quick_create_transaction, recent_transactions, search_transactions,
    transactions_by_category, transactions_by_date_range, update_transaction,
};

use axum::Json;

/// GET /api/health - Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
