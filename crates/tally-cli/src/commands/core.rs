//! Core commands (init, status) and shared utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use tally_core::ai::AIBackend;
use tally_core::{Classifier, Database};

/// Resolve the database path: explicit flag, or tally.db in the data dir
pub fn resolve_db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let data_dir = dirs::data_dir()
        .map(|d| d.join("tally"))
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    Ok(data_dir.join("tally.db"))
}

pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path.to_str().unwrap();
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: enabled (key from TALLY_DB_KEY)");
    }
    println!("   Transactions recorded: {}", db.count_transactions()?);
    println!("Done.");
    Ok(())
}

pub async fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    println!("📒 Tally status");
    println!("   Database: {}", db.path());
    println!(
        "   Encrypted: {}",
        if db.is_encrypted()? { "yes" } else { "no" }
    );
    println!("   Transactions: {}", db.count_transactions()?);

    let classifier = Classifier::from_env();
    match classifier.backend() {
        Some(client) => {
            let healthy = client.health_check().await;
            println!(
                "   AI backend: {} (model: {}) - {}",
                client.host(),
                client.model(),
                if healthy { "✅ reachable" } else { "⚠️  not responding" }
            );
            if !healthy {
                println!("      New transactions will get the default classification.");
            }
        }
        None => {
            println!("   AI backend: not configured (set OLLAMA_HOST to enable classification)");
        }
    }

    Ok(())
}
