use crate::config::CHUNK_SIZE;
use crate::connection::Connection;
use crate::connector::Connector;
use crate::endpoint::Endpoint;
use crate::err::Error;
use crate::tcp::Transport;
use std::convert::Infallible;

/// Outcome of a single read-then-write cycle.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Forwarded(usize),
    /// The source failed and was replaced; nothing was written.
    SourceLost,
    /// The destination failed and was replaced; the chunk in flight was dropped.
    DestinationLost,
}

struct Side<S> {
    role: &'static str,
    endpoint: Endpoint,
    connection: Option<Connection<S>>,
}

impl<S> Side<S> {
    fn new(role: &'static str, endpoint: Endpoint) -> Self {
        Self {
            role,
            endpoint,
            connection: None,
        }
    }

    async fn establish<T>(&mut self, connector: &Connector<T>) -> Result<&mut Connection<S>, Error>
    where
        T: Transport<Stream = S>,
    {
        let connection = match self.connection.take() {
            Some(connection) => connection,
            None => {
                log::info!("Connecting to {} {}", self.role, self.endpoint);
                connector.connect(&self.endpoint).await?
            }
        };
        Ok(self.connection.insert(connection))
    }

    fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            log::info!(
                "Closing {} {} ({} bytes transferred)",
                self.role,
                connection.endpoint(),
                connection.transferred()
            );
        }
    }

    /// Closes the current connection, then opens a new one to the same endpoint.
    async fn replace<T>(&mut self, connector: &Connector<T>) -> Result<(), Error>
    where
        T: Transport<Stream = S>,
    {
        self.close();
        self.establish(connector).await?;
        Ok(())
    }
}

/// Pumps bytes from source to destination, replacing whichever side fails.
pub struct Forwarder<T: Transport> {
    connector: Connector<T>,
    source: Side<T::Stream>,
    destination: Side<T::Stream>,
    chunk: Box<[u8]>,
}

impl<T: Transport> Forwarder<T> {
    pub fn new(connector: Connector<T>, source: Endpoint, destination: Endpoint) -> Self {
        Self {
            connector,
            source: Side::new("source", source),
            destination: Side::new("destination", destination),
            chunk: vec![0; CHUNK_SIZE].into_boxed_slice(),
        }
    }

    /// Relays forever. Returns only if a connection can never be established.
    pub async fn run(mut self) -> Result<Infallible, Error> {
        loop {
            self.step().await?;
        }
    }

    pub async fn step(&mut self) -> Result<Step, Error> {
        // destination first, so nothing is read before it has somewhere to go
        let destination = self.destination.establish(&self.connector).await?;
        let source = self.source.establish(&self.connector).await?;

        let n = match source.read(&mut self.chunk).await {
            Ok(n) => n,
            Err(e) => {
                log::warn!("Failed to read from source {}: {}", source.endpoint(), e);
                self.source.replace(&self.connector).await?;
                return Ok(Step::SourceLost);
            }
        };

        match destination.write_all(&self.chunk[..n]).await {
            Ok(()) => Ok(Step::Forwarded(n)),
            Err(e) => {
                log::warn!(
                    "Failed to write to destination {}, dropping {} bytes: {}",
                    destination.endpoint(),
                    n,
                    e
                );
                self.destination.replace(&self.connector).await?;
                Ok(Step::DestinationLost)
            }
        }
    }
}
