//! Stock dashboard demo.
//!
//! Loads the stock list, shows the available items page by page, then writes
//! the filtered list to a CSV file.
//!
//! # Running
//!
//! ```bash
//! # Set environment variables
//! export STAFFDESK_URL="http://127.0.0.1:8000/api/"
//! export STAFFDESK_TOKEN="your-token-here"
//!
//! # Run the demo
//! cargo run -p staffdesk-demos --bin stock_dashboard
//! ```
//!
//! Without a token, set `STAFFDESK_EMAIL` and `STAFFDESK_PASSWORD` to log in.

use std::env;

use staffdesk::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // URL, token and page size come from STAFFDESK_* variables
    let client = Client::from_env()?;

    let role = match (env::var("STAFFDESK_EMAIL"), env::var("STAFFDESK_PASSWORD")) {
        (Ok(email), Ok(password)) => client.login(&email, &password).await?.current_role(),
        _ => Role::Standard,
    };

    let stock = client.stock_items(role);
    let fetched = stock.refresh().await?;
    println!("Fetched {fetched} stock lines");

    stock.set_filter(StockFilter::Status, StockStatus::Available.as_str());
    stock.set_sort(StockSortKey::Quantity);

    loop {
        let slice = stock.visible_slice();
        println!(
            "\n-- page {}/{} ({} available) --",
            slice.current_page, slice.total_pages, slice.total_matches
        );
        for item in &slice.records {
            println!("{:>5}  {:<24} {:>5}  {}", item.id, item.name, item.quantity, item.store);
        }
        if slice.current_page == slice.total_pages {
            break;
        }
        stock.next_page();
    }

    let encoder = CsvEncoder::new();
    let sheet = stock.export_sheet();
    let file_name = sheet.file_name(&encoder);
    std::fs::write(&file_name, stock.export_visible(&encoder)?)?;
    println!("\nWrote {} rows to {file_name}", sheet.len());

    Ok(())
}
