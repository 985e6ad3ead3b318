//! Middleware for the transfer gateway.

pub mod security;

pub use security::security_headers;
