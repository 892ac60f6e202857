//! Legacy result shapes for code written against the XML-RPC interface.
//!
//! Run with: `cargo run --example migration --features migration`

use evatr::migration::{LegacyClient, LegacyQualifiedParams, LegacySimpleParams};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let legacy = LegacyClient::with_defaults()?;

    let simple = legacy
        .check_simple(&LegacySimpleParams::new("DE123456789", "ATU12345678"))
        .await;
    println!("{}", serde_json::to_string_pretty(&simple)?);

    let params = LegacyQualifiedParams::new("DE123456789", "ATU12345678", "Musterhaus GmbH", "Wien")
        .zip("1010")
        .include_raw(true);
    let qualified = legacy.check_qualified(&params).await;
    println!(
        "code {} on {} {}: name {:?}, city {:?}",
        qualified.simple.error_code,
        qualified.simple.date,
        qualified.simple.time,
        qualified.result_name_description,
        qualified.result_city_description,
    );
    Ok(())
}
