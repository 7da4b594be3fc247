//! Credential domain: the cached bearer token and the seams used to refresh it

mod credential;
mod source;

pub use credential::{Credential, TokenGrant};
pub use source::{Clock, ManualClock, SystemClock, TokenSource};

#[cfg(test)]
pub use source::mock;
