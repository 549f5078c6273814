use std::future::Future;
use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{lookup_host, TcpSocket, TcpStream};

pub trait Transport {
    type Socket: Send;
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    fn allocate(&self) -> io::Result<Self::Socket>;

    // failure here is fatal, unlike allocate and connect
    fn configure(&self, socket: &Self::Socket) -> io::Result<()>;

    fn resolve(&self, host: &str) -> impl Future<Output = io::Result<Vec<Ipv4Addr>>> + Send;

    fn connect(
        &self,
        socket: Self::Socket,
        addr: SocketAddrV4,
    ) -> impl Future<Output = io::Result<Self::Stream>> + Send;
}

pub struct TcpTransport;

impl Transport for TcpTransport {
    type Socket = TcpSocket;
    type Stream = TcpStream;

    fn allocate(&self) -> io::Result<TcpSocket> {
        TcpSocket::new_v4()
    }

    fn configure(&self, socket: &TcpSocket) -> io::Result<()> {
        socket.set_nodelay(true)?;
        socket.set_keepalive(true)?;
        Ok(())
    }

    async fn resolve(&self, host: &str) -> io::Result<Vec<Ipv4Addr>> {
        // port is irrelevant, lookup_host just requires one
        let addrs = lookup_host((host, 0)).await?;
        Ok(addrs
            .filter_map(|addr| match addr {
                SocketAddr::V4(v4) => Some(*v4.ip()),
                SocketAddr::V6(_) => None,
            })
            .collect())
    }

    async fn connect(&self, socket: TcpSocket, addr: SocketAddrV4) -> io::Result<TcpStream> {
        socket.connect(SocketAddr::V4(addr)).await
    }
}
