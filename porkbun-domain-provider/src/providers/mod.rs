//! Registrar implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod porkbun;

pub use porkbun::{
    DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT, MAX_RENEWAL_YEARS, PorkbunClient,
    PorkbunClientBuilder,
};
