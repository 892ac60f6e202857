//! Offline checks: normalization, syntax, check digit, status messages.
//!
//! Run with: `cargo run --example syntax_check`

use evatr::core::*;

fn main() {
    for raw in ["de 123 456 788", "ATU12345678", "nl123456789b01", "CHE-123.456.789"] {
        println!(
            "{raw:<20} -> {:<16} syntax ok: {:<5} country: {}",
            normalize_vat_id(raw),
            check_vat_id_syntax(raw),
            countries::country_name(&country_code(raw)).unwrap_or("unsupported"),
        );
    }

    let own = "DE123456788";
    println!(
        "\n{own}: check digit ok: {}, may request FR: {}",
        has_valid_german_check_digit(own),
        can_request(own, "FR"),
    );

    let registry = StatusRegistry::global();
    for code in ["evatr-0000", "evatr-2002", "evatr-0004"] {
        if let Some(msg) = registry.get(code) {
            println!(
                "{code}: success={} warning={} error={} -- {}",
                registry.is_success(code),
                registry.is_warning(code),
                registry.is_error(code),
                msg.message
            );
        }
    }

    let stats = registry.statistics();
    println!("\n{} status messages, by category: {:?}", stats.total, stats.by_category);
}
