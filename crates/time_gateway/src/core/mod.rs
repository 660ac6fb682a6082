//! # Time core
//!
//! Timezone-aware operations behind the two MCP tools.
//!
//! - `error`: tool error type and its mapping onto MCP errors
//! - `models`: request and response structures
//! - `provider`: timezone resolution and conversion
//! - `utils`: formatting helpers

pub mod error;
pub mod models;
pub mod provider;
pub mod utils;
