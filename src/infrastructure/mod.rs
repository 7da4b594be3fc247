//! Infrastructure layer - transport, credentials, search and observability

pub mod auth;
pub mod http;
pub mod logging;
pub mod observability;
pub mod search;
