//! # evatr
//!
//! Typed client for the eVatR REST API of the German Federal Central Tax
//! Office (BZSt), used to confirm foreign EU VAT-IDs.
//!
//! Besides the client the crate offers offline helpers: VAT-ID normalization
//! and syntax checks for all member states, the check digit of German
//! VAT-IDs, and the catalogue of eVatR status messages. A compatibility layer
//! keeps code written against the retired XML-RPC interface working.
//!
//! ## Quick Start
//!
//! ```rust
//! use evatr::core::*;
//!
//! assert_eq!(normalize_vat_id("de 123.456-788"), "DE123456788");
//! assert!(check_vat_id_syntax("ATU12345678"));
//! assert!(can_request("DE123456789", "fr"));
//! assert_eq!(german_check_digit("123456788").unwrap(), 8);
//!
//! let registry = StatusRegistry::global();
//! assert!(registry.is_success("evatr-0000"));
//! assert!(registry.is_warning("evatr-2002"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | VAT-ID syntax, check digit, status messages, data model |
//! | `client` (default) | Async HTTP client for the eVatR REST API |
//! | `migration` | Legacy result shapes of the XML-RPC interface |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "migration")]
pub mod migration;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;

#[cfg(feature = "client")]
pub use crate::client::{ClientConfig, EvatrClient};
