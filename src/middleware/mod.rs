mod error_handler;
mod identity;

pub use error_handler::log_errors;
pub use identity::{ClientIdentity, LOOPBACK_PLACEHOLDER, identify_client, resolve_identifier};
