use std::collections::VecDeque;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::config::ClientConfig;

/// Largest datagram accepted, matching a typical Ethernet MTU.
pub const MAX_DATAGRAM_SIZE: usize = 1500;
/// One spare byte lets a receive detect datagrams that would not fit.
pub const RECEIVE_BUFFER_SIZE: usize = MAX_DATAGRAM_SIZE + 1;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },
    #[error("could not resolve {addr}")]
    Resolve { addr: String },
    #[error("datagram larger than {max} bytes rejected")]
    Oversize { max: usize },
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

/// Connectionless datagram channel polled once per frame.
pub trait Transport {
    /// Non-blocking. `Ok(0)` means nothing was waiting.
    fn receive(&mut self, buffer: &mut [u8; RECEIVE_BUFFER_SIZE]) -> Result<usize, TransportError>;

    fn send(&mut self, bytes: &[u8]) -> Result<usize, TransportError>;
}

pub struct UdpTransport {
    socket: UdpSocket,
    local_addr: SocketAddr,
    remote_addr: SocketAddr,
}

impl UdpTransport {
    pub fn bind(config: &ClientConfig) -> Result<Self, TransportError> {
        let local = format!("{}:{}", config.local_address, config.local_port);
        let local_candidate = resolve(&local, None)?;
        let socket = UdpSocket::bind(local_candidate).map_err(|source| TransportError::Bind {
            addr: local.clone(),
            source,
        })?;
        socket.set_nonblocking(true)?;
        let local_addr = socket.local_addr()?;

        let remote = format!("{}:{}", config.host_address, config.host_port);
        let remote_addr = resolve(&remote, Some(local_addr))?;

        log::info!("DIS transport bound to {local_addr}, remote {remote_addr}");

        Ok(Self {
            socket,
            local_addr,
            remote_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub fn set_remote(&mut self, addr: SocketAddr) {
        self.remote_addr = addr;
    }
}

impl Transport for UdpTransport {
    fn receive(&mut self, buffer: &mut [u8; RECEIVE_BUFFER_SIZE]) -> Result<usize, TransportError> {
        match self.socket.recv_from(buffer) {
            Ok((size, _)) if size > MAX_DATAGRAM_SIZE => Err(TransportError::Oversize {
                max: MAX_DATAGRAM_SIZE,
            }),
            Ok((size, from)) => {
                log::trace!("Received {size} bytes from {from}");
                Ok(size)
            }
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(e) => Err(TransportError::Io(e)),
        }
    }

    fn send(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
        if bytes.len() > MAX_DATAGRAM_SIZE {
            return Err(TransportError::Oversize {
                max: MAX_DATAGRAM_SIZE,
            });
        }
        Ok(self.socket.send_to(bytes, self.remote_addr)?)
    }
}

/// Resolves `addr`, preferring the address family of `family_of` when given.
fn resolve(addr: &str, family_of: Option<SocketAddr>) -> Result<SocketAddr, TransportError> {
    let candidates: Vec<SocketAddr> = addr
        .to_socket_addrs()
        .map_err(|_| TransportError::Resolve {
            addr: addr.to_string(),
        })?
        .collect();

    let preferred = family_of.and_then(|local| {
        candidates
            .iter()
            .copied()
            .find(|candidate| candidate.is_ipv4() == local.is_ipv4())
    });

    preferred
        .or_else(|| candidates.first().copied())
        .ok_or_else(|| TransportError::Resolve {
            addr: addr.to_string(),
        })
}

/// In-process transport fed by the caller, for replaying captures and tests.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    inbound: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_inbound(&mut self, datagram: Vec<u8>) {
        self.inbound.push_back(datagram);
    }

    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }
}

impl Transport for MemoryTransport {
    fn receive(&mut self, buffer: &mut [u8; RECEIVE_BUFFER_SIZE]) -> Result<usize, TransportError> {
        let Some(datagram) = self.inbound.pop_front() else {
            return Ok(0);
        };
        if datagram.len() > MAX_DATAGRAM_SIZE {
            return Err(TransportError::Oversize {
                max: MAX_DATAGRAM_SIZE,
            });
        }
        buffer[..datagram.len()].copy_from_slice(&datagram);
        Ok(datagram.len())
    }

    fn send(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
        if bytes.len() > MAX_DATAGRAM_SIZE {
            return Err(TransportError::Oversize {
                max: MAX_DATAGRAM_SIZE,
            });
        }
        self.sent.push(bytes.to_vec());
        Ok(bytes.len())
    }
}
