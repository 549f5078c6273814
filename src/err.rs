use crate::endpoint::Endpoint;
use std::io;
use std::time::Duration;

/// Unrecoverable conditions. These end the relay.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to configure socket for {endpoint}: {source}")]
    Configure { endpoint: Endpoint, source: io::Error },

    #[error("Failed to resolve hostname {}: {source}", .endpoint.host())]
    Resolve { endpoint: Endpoint, source: io::Error },

    #[error("Can't find any IPv4 address for {}", .endpoint.host())]
    NoAddress { endpoint: Endpoint },
}

/// Why an established connection stopped being usable. Always answered by reconnecting.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("connection closed by peer")]
    Closed,

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error(transparent)]
    Io(#[from] io::Error),
}
