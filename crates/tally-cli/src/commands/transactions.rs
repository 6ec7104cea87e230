//! Transaction commands (add, quick, list, search)

use std::path::Path;

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;

use tally_core::{Classifier, NewTransaction, Transaction, TransactionService};

use super::{open_db, truncate};

pub async fn cmd_add(
    db_path: &Path,
    amount: &str,
    description: Option<String>,
    merchant: Option<String>,
    location: Option<String>,
    no_encrypt: bool,
) -> Result<()> {
    let amount: Decimal = amount
        .trim()
        .parse()
        .with_context(|| format!("Invalid amount: {}", amount))?;

    let db = open_db(db_path, no_encrypt)?;
    let service = TransactionService::new(db, Classifier::from_env());

    let outcome = service
        .create(NewTransaction {
            amount,
            description,
            merchant,
            location,
            ..Default::default()
        })
        .await?;

    let tx = outcome.record();
    println!(
        "✅ Recorded #{}: {} {} ({} / {})",
        tx.id,
        tx.amount,
        tx.tx_type.display_name(),
        tx.category.display_name(),
        tx.scenario.display_name()
    );
    if let Some(analysis) = &tx.ai_analysis {
        println!("   {}", analysis);
    }
    Ok(())
}

pub fn cmd_list(db_path: &Path, limit: i64, no_encrypt: bool) -> Result<()> {
    if limit < 1 {
        bail!("--limit must be at least 1");
    }

    let db = open_db(db_path, no_encrypt)?;
    let transactions = db.list_recent(limit)?;

    if transactions.is_empty() {
        println!("No transactions recorded yet. Try: tally quick 4.50");
        return Ok(());
    }

    print_table(&transactions);
    Ok(())
}

pub fn cmd_search(db_path: &Path, keyword: &str, no_encrypt: bool) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;
    let transactions = db.search_transactions(keyword)?;

    if transactions.is_empty() {
        println!("No transactions match \"{}\"", keyword);
        return Ok(());
    }

    print_table(&transactions);
    Ok(())
}

fn print_table(transactions: &[Transaction]) {
    println!(
        "{:>5}  {:<10}  {:>10}  {:<16}  {:<24}  {}",
        "ID", "DATE", "AMOUNT", "CATEGORY", "MERCHANT", "DESCRIPTION"
    );
    for tx in transactions {
        println!(
            "{:>5}  {:<10}  {:>10}  {:<16}  {:<24}  {}",
            tx.id,
            tx.transaction_date.format("%Y-%m-%d"),
            format!("{} {}", tx.amount, sign_of(tx)),
            truncate(tx.category.display_name(), 16),
            truncate(tx.merchant.as_deref().unwrap_or("-"), 24),
            truncate(tx.description.as_deref().unwrap_or("-"), 40),
        );
    }
}

fn sign_of(tx: &Transaction) -> &'static str {
    match tx.tx_type {
        tally_core::TransactionType::Expense => "-",
        tally_core::TransactionType::Income => "+",
        tally_core::TransactionType::Transfer => "~",
    }
}
