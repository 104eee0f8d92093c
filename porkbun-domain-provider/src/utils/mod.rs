//! Utility modules.

/// Date/time serialization helpers for Porkbun timestamps.
pub mod datetime;

/// Log sanitization utilities to prevent credential and payload exposure.
pub mod log_sanitizer;
