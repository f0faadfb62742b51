//! Credentials, access-token models, and the token manager that keeps one token fresh.

pub mod id;
pub mod manager;
pub mod token;

pub use id::*;
pub use manager::*;
pub use token::{record::*, response::*, secret::*};
