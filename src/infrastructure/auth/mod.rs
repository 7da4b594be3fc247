//! Credential caching and the HTTP credential endpoint

mod http_token_source;
mod token_cache;

pub use http_token_source::HttpTokenSource;
pub use token_cache::{DEFAULT_REFRESH_BUFFER, TokenCache};
