//! Metadata endpoints: status messages and member-state availability.
//!
//! Run with: `cargo run --example api_info`

use evatr::client::{ClientConfig, EvatrClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = EvatrClient::new(ClientConfig::from_env()?)?;

    let messages = client.status_messages().await?;
    println!("{} status messages", messages.len());
    for msg in messages.iter().filter(|m| m.category.is_none()) {
        println!("  uncategorized: {}", msg.status);
    }

    let states = client.eu_member_states().await?;
    println!("{} member states", states.len());
    let unavailable: Vec<_> = states
        .iter()
        .filter(|s| !s.available)
        .map(|s| format!("{} ({})", s.code, s.name))
        .collect();
    if unavailable.is_empty() {
        println!("all available");
    } else {
        println!("unavailable: {}", unavailable.join(", "));
    }
    Ok(())
}
