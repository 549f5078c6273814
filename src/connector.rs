use crate::config::{IO_TIMEOUT, RETRY_INTERVAL};
use crate::connection::Connection;
use crate::endpoint::Endpoint;
use crate::err::Error;
use crate::tcp::Transport;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;
use tokio::time::{sleep, timeout};

#[derive(Copy, Clone, Debug)]
pub struct Settings {
    pub io_timeout: Duration,
    pub retry_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            io_timeout: IO_TIMEOUT,
            retry_interval: RETRY_INTERVAL,
        }
    }
}

pub struct Connector<T> {
    transport: T,
    settings: Settings,
}

impl<T: Transport> Connector<T> {
    pub fn new(transport: T, settings: Settings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Connects to `endpoint`, retrying transient failures forever.
    ///
    /// Only returns an error if the endpoint can never be reached as configured:
    /// the socket can't be configured, or the hostname has no IPv4 address.
    pub async fn connect(&self, endpoint: &Endpoint) -> Result<Connection<T::Stream>, Error> {
        let mut resolved = None;

        loop {
            let socket = self.allocate(endpoint).await;

            self.transport
                .configure(&socket)
                .map_err(|source| Error::Configure {
                    endpoint: endpoint.clone(),
                    source,
                })?;

            let ip = match resolved {
                Some(ip) => ip,
                None => *resolved.insert(self.resolve(endpoint).await?),
            };
            let addr = SocketAddrV4::new(ip, endpoint.port());

            match timeout(self.settings.io_timeout, self.transport.connect(socket, addr)).await {
                Ok(Ok(stream)) => {
                    log::info!("Connected to {} ({})", endpoint, addr);
                    return Ok(Connection::new(
                        stream,
                        endpoint.clone(),
                        self.settings.io_timeout,
                    ));
                }
                Ok(Err(e)) => {
                    log::warn!("Failed to connect to {}, retrying: {}", endpoint, e)
                }
                Err(_) => log::warn!(
                    "Timed out connecting to {} after {:?}, retrying",
                    endpoint,
                    self.settings.io_timeout
                ),
            }
            sleep(self.settings.retry_interval).await;
        }
    }

    async fn allocate(&self, endpoint: &Endpoint) -> T::Socket {
        loop {
            match self.transport.allocate() {
                Ok(socket) => return socket,
                Err(e) => {
                    log::warn!("Failed to create socket for {}, retrying: {}", endpoint, e);
                    sleep(self.settings.retry_interval).await;
                }
            }
        }
    }

    async fn resolve(&self, endpoint: &Endpoint) -> Result<Ipv4Addr, Error> {
        let addrs = self
            .transport
            .resolve(endpoint.host())
            .await
            .map_err(|source| Error::Resolve {
                endpoint: endpoint.clone(),
                source,
            })?;

        match addrs.as_slice() {
            [] => Err(Error::NoAddress {
                endpoint: endpoint.clone(),
            }),
            [first] => Ok(*first),
            [first, ..] => {
                log::warn!(
                    "Hostname {} has more than one IPv4 address, using the first one: {}",
                    endpoint.host(),
                    first
                );
                Ok(*first)
            }
        }
    }
}
