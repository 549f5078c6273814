use crate::endpoint::Endpoint;
use crate::err::LinkError;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

pub struct Connection<S> {
    stream: S,
    endpoint: Endpoint,
    read_timeout: Duration,
    write_timeout: Duration,
    transferred: u64,
}

impl<S> Connection<S> {
    pub fn new(stream: S, endpoint: Endpoint, io_timeout: Duration) -> Self {
        Self {
            stream,
            endpoint,
            read_timeout: io_timeout,
            write_timeout: io_timeout,
            transferred: 0,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn transferred(&self) -> u64 {
        self.transferred
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        match timeout(self.read_timeout, self.stream.read(buf)).await {
            Ok(Ok(0)) => Err(LinkError::Closed),
            Ok(Ok(n)) => {
                self.transferred += n as u64;
                Ok(n)
            }
            Ok(Err(e)) => Err(LinkError::Io(e)),
            Err(_) => Err(LinkError::TimedOut(self.read_timeout)),
        }
    }

    pub async fn write_all(&mut self, buf: &[u8]) -> Result<(), LinkError> {
        match timeout(self.write_timeout, self.stream.write_all(buf)).await {
            Ok(Ok(())) => {
                self.transferred += buf.len() as u64;
                Ok(())
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::WriteZero => Err(LinkError::Closed),
            Ok(Err(e)) => Err(LinkError::Io(e)),
            Err(_) => Err(LinkError::TimedOut(self.write_timeout)),
        }
    }
}
