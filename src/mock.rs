//! Scripted in-memory `Transport` for exercising reconnect policy without a network.

use crate::tcp::Transport;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Connect(u16),
    Read(u16, Vec<u8>),
    Write(u16, Vec<u8>),
    Close(u16),
}

enum Step {
    Data(Vec<u8>),
    Eof,
    Fail(io::ErrorKind),
}

/// What one accepted connection will do when read from and written to.
/// Once the reads run out, further reads never complete.
#[derive(Default)]
pub struct Script {
    reads: VecDeque<Step>,
    fail_writes: bool,
    stall_writes: bool,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, bytes: &[u8]) -> Self {
        self.reads.push_back(Step::Data(bytes.to_vec()));
        self
    }

    pub fn eof(mut self) -> Self {
        self.reads.push_back(Step::Eof);
        self
    }

    pub fn fail(mut self, kind: io::ErrorKind) -> Self {
        self.reads.push_back(Step::Fail(kind));
        self
    }

    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Writes never complete, like a peer that stopped reading.
    pub fn stall_writes(mut self) -> Self {
        self.stall_writes = true;
        self
    }
}

#[derive(Default)]
struct State {
    hosts: HashMap<String, Vec<Ipv4Addr>>,
    offers: HashMap<u16, VecDeque<Script>>,
    events: Vec<Event>,
    dialed: Vec<SocketAddrV4>,
    lookups: usize,
    allocated: usize,
    allocation_failures: usize,
    connect_failures: usize,
    connect_stalls: usize,
    configure_fails: bool,
}

#[derive(Clone, Default)]
pub struct MockTransport(Arc<Mutex<State>>);

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.0.lock().unwrap()
    }

    pub fn host(&self, name: &str, addrs: &[Ipv4Addr]) {
        self.state().hosts.insert(name.to_owned(), addrs.to_vec());
    }

    /// Queues a connection to be handed out by the next successful dial to `port`.
    pub fn offer(&self, port: u16, script: Script) {
        self.state().offers.entry(port).or_default().push_back(script);
    }

    pub fn fail_allocations(&self, n: usize) {
        self.state().allocation_failures = n;
    }

    pub fn fail_connects(&self, n: usize) {
        self.state().connect_failures = n;
    }

    pub fn stall_connects(&self, n: usize) {
        self.state().connect_stalls = n;
    }

    pub fn fail_configure(&self) {
        self.state().configure_fails = true;
    }

    pub fn events(&self) -> Vec<Event> {
        self.state().events.clone()
    }

    pub fn dialed(&self) -> Vec<SocketAddrV4> {
        self.state().dialed.clone()
    }

    pub fn lookups(&self) -> usize {
        self.state().lookups
    }

    pub fn allocated(&self) -> usize {
        self.state().allocated
    }

    /// Every chunk written to `port`, across all of its connections.
    pub fn written(&self, port: u16) -> Vec<Vec<u8>> {
        self.state()
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Write(p, bytes) if *p == port => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }
}

pub struct MockSocket;

enum Dial {
    Refuse,
    Stall,
    Accept(MockStream),
}

impl Transport for MockTransport {
    type Socket = MockSocket;
    type Stream = MockStream;

    fn allocate(&self) -> io::Result<MockSocket> {
        let mut state = self.state();
        if state.allocation_failures > 0 {
            state.allocation_failures -= 1;
            return Err(io::Error::other("too many open files"));
        }
        state.allocated += 1;
        Ok(MockSocket)
    }

    fn configure(&self, _: &MockSocket) -> io::Result<()> {
        match self.state().configure_fails {
            true => Err(io::Error::new(io::ErrorKind::InvalidInput, "bad option")),
            false => Ok(()),
        }
    }

    async fn resolve(&self, host: &str) -> io::Result<Vec<Ipv4Addr>> {
        let mut state = self.state();
        state.lookups += 1;
        match state.hosts.get(host) {
            Some(addrs) => Ok(addrs.clone()),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "unknown host")),
        }
    }

    async fn connect(&self, _: MockSocket, addr: SocketAddrV4) -> io::Result<MockStream> {
        let dial = {
            let mut state = self.state();
            state.dialed.push(addr);
            if state.connect_failures > 0 {
                state.connect_failures -= 1;
                Dial::Refuse
            } else if state.connect_stalls > 0 {
                state.connect_stalls -= 1;
                Dial::Stall
            } else {
                let port = addr.port();
                let offered = state.offers.get_mut(&port).and_then(VecDeque::pop_front);
                match offered {
                    Some(script) => {
                        state.events.push(Event::Connect(port));
                        Dial::Accept(MockStream {
                            port,
                            script,
                            state: Arc::clone(&self.0),
                        })
                    }
                    None => Dial::Refuse,
                }
            }
        };

        match dial {
            Dial::Accept(stream) => Ok(stream),
            Dial::Refuse => Err(io::ErrorKind::ConnectionRefused.into()),
            Dial::Stall => std::future::pending().await,
        }
    }
}

pub struct MockStream {
    port: u16,
    script: Script,
    state: Arc<Mutex<State>>,
}

impl MockStream {
    fn record(&self, event: Event) {
        if let Ok(mut state) = self.state.lock() {
            state.events.push(event);
        }
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.script.reads.pop_front() {
            Some(Step::Data(mut bytes)) => {
                if bytes.len() > buf.remaining() {
                    let rest = bytes.split_off(buf.remaining());
                    self.script.reads.push_front(Step::Data(rest));
                }
                buf.put_slice(&bytes);
                self.record(Event::Read(self.port, bytes));
                Poll::Ready(Ok(()))
            }
            Some(Step::Eof) => Poll::Ready(Ok(())),
            Some(Step::Fail(kind)) => Poll::Ready(Err(kind.into())),
            None => Poll::Pending,
        }
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.script.fail_writes {
            return Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()));
        }
        if self.script.stall_writes {
            return Poll::Pending;
        }
        self.record(Event::Write(self.port, buf.to_vec()));
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl Drop for MockStream {
    fn drop(&mut self) {
        self.record(Event::Close(self.port));
    }
}
