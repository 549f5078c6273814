use std::time::Duration;

pub const CHUNK_SIZE: usize = 1024;

pub const IO_TIMEOUT: Duration = Duration::from_secs(5);
pub const RETRY_INTERVAL: Duration = Duration::from_secs(1);

pub const DEFAULT_SOURCE_PORT: u16 = 30002;
pub const DEFAULT_DESTINATION_PORT: u16 = 30001;
