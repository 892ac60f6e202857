//! Qualified confirmation request with company data.
//!
//! Run with: `cargo run --example qualified`

use evatr::client::{ClientConfig, EvatrClient};
use evatr::core::QualifiedRequest;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = EvatrClient::new(ClientConfig::from_env()?)?;

    let request = QualifiedRequest::new(
        "DE123456789",
        "ATU12345678",
        "Musterhaus GmbH & Co KG",
        "musterort",
    )
    .street("Musterstrasse 22")
    .zip("12345")
    .include_raw(true);

    let result = client.validate_qualified(request).await?;
    println!("status: {}", result.status);

    let fields = [
        ("company", result.company),
        ("location", result.location),
        ("street", result.street),
        ("zip", result.zip),
    ];
    for (name, code) in fields {
        match code {
            Some(code) => println!("{name:<9} {} {}", code.as_str(), code.explain()),
            None => println!("{name:<9} -"),
        }
    }

    if let Some(raw) = result.raw {
        println!("\nraw: {raw}");
    }
    Ok(())
}
