//! Security audit demo.
//!
//! Prints the session policy from the security settings and the most recent
//! failed logins.
//!
//! # Running
//!
//! ```bash
//! export STAFFDESK_URL="http://127.0.0.1:8000/api/"
//! export STAFFDESK_TOKEN="your-token-here"
//!
//! cargo run -p staffdesk-demos --bin security_audit
//! ```

use staffdesk::prelude::*;
use staffdesk::AuthLogFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::from_env()?;

    let settings = client.security_settings(Role::Standard);
    settings.refresh().await?;
    let records = settings.records();
    let policy = SecuritySettings::new(&records);
    println!("Two-factor authentication: {}", if policy.two_factor_enabled() { "on" } else { "off" });
    println!("Session timeout: {} minutes", policy.session_timeout().as_secs() / 60);

    let logs = client.auth_logs(Role::Standard);
    logs.refresh().await?;
    logs.set_filter(AuthLogFilter::Action, "Failed Login");
    // Default sort is by timestamp; selecting it again shows newest first.
    logs.set_sort(AuthLogSortKey::Timestamp);

    let slice = logs.visible_slice();
    println!("\n{} failed logins, newest first:", slice.total_matches);
    for entry in &slice.records {
        println!("{}  {:<16} {}", entry.timestamp.to_rfc3339(), entry.user, entry.ip_address);
    }

    let json = logs.export_visible(&JsonEncoder::pretty())?;
    println!("\n{}", String::from_utf8_lossy(&json));

    Ok(())
}
