//! Balance lookup example.
//!
//! Reads `BANK_API_URL` (and the optional timeout overrides) from the
//! environment. When `BANK_FALLBACK_URL` is set, balance reads that the primary
//! backend cannot answer are served by that mirror.
//!
//! ```text
//! BANK_API_URL=http://localhost:8080 cargo run --example balance -- 42
//! ```

use std::sync::Arc;

use bank_client::observability::{LogFormat, LogLevel};
use bank_client::{BankClient, BankConfig, HttpFallbackSource, LoggingConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    LoggingConfig::default()
        .with_level(LogLevel::Debug)
        .with_format(LogFormat::Compact)
        .init()?;

    let customer_id: u64 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(1);

    let mut builder = BankClient::builder().config(BankConfig::from_env()?);
    if let Ok(mirror) = std::env::var("BANK_FALLBACK_URL") {
        builder = builder.fallback(Arc::new(HttpFallbackSource::new(mirror)?));
    }
    let client = builder.build()?;

    match client.customers().get_balance(customer_id).await {
        Ok(balance) => println!("Balance for customer {}: {}", customer_id, balance),
        Err(err) => {
            eprintln!("Balance lookup failed: {}", err);
            eprintln!("Details: {}", err.body());
        }
    }

    match client.transactions().get_transactions(customer_id).await {
        Ok(history) => println!("Transactions: {}", history),
        Err(err) => eprintln!("History lookup failed: {}", err.body()),
    }

    Ok(())
}
