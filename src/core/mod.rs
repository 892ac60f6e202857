//! VAT-ID syntax, check digits, status messages and the data model.
//!
//! Everything in here is pure and synchronous; the HTTP client lives in
//! [`crate::client`].

pub mod checksum;
pub mod countries;
mod error;
mod status;
mod types;
mod vat_id;
pub mod wire;

pub use checksum::{german_check_digit, has_valid_german_check_digit};
pub use countries::is_eu_member_state;
pub use error::*;
pub use status::*;
pub use types::*;
#[cfg(feature = "migration")]
pub(crate) use types::parse_timestamp;
pub use vat_id::*;
