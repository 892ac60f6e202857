//! Simple confirmation request against the live service.
//!
//! Run with: `cargo run --example simple -- DE123456789 ATU12345678`

use evatr::client::{ClientConfig, EvatrClient};
use evatr::core::SimpleRequest;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let own = args.next().unwrap_or_else(|| "DE123456789".into());
    let foreign = args.next().unwrap_or_else(|| "ATU12345678".into());

    let client = EvatrClient::new(ClientConfig::from_env()?)?;

    match client.validate_simple(SimpleRequest::new(&own, &foreign)).await {
        Ok(result) => {
            println!("status:    {}", result.status);
            println!("timestamp: {}", result.timestamp);
            println!("valid:     {}", client.is_success_status(&result.status));
            if let Some(msg) = client.status_message(&result.status) {
                println!("message:   {}", msg.message);
            }
        }
        Err(e) => eprintln!("request failed: {e}"),
    }

    let extended = client
        .validate_simple_extended(SimpleRequest::new(&own, &foreign))
        .await?;
    println!("\nextended: {}", serde_json::to_string_pretty(&extended)?);
    Ok(())
}
