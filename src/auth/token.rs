//! Access-token records, token endpoint payloads, and redacted secret wrappers.

pub mod record;
pub mod response;
pub mod secret;
