//! Datagram transport seam
//!
//! The runner talks to a [`Transport`] so tests can capture datagrams in
//! memory while the binary sends real UDP multicast.

use std::io;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

use tracing::info;

/// Sink for finished datagrams.
pub trait Transport {
    fn send(&mut self, datagram: &[u8]) -> io::Result<()>;
}

/// Unconnected UDP socket sending to the multicast group.
pub struct UdpTransport {
    socket: UdpSocket,
    dest: SocketAddrV4,
}

impl UdpTransport {
    pub fn new(group: Ipv4Addr, port: u16) -> io::Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        if group.is_multicast() {
            // Local consumers on the same host must see our datagrams.
            socket.set_multicast_loop_v4(true)?;
        }

        let dest = SocketAddrV4::new(group, port);
        info!(%dest, "producer transport ready");
        Ok(Self { socket, dest })
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, datagram: &[u8]) -> io::Result<()> {
        self.socket.send_to(datagram, self.dest)?;
        Ok(())
    }
}

/// In-memory transport for tests.
#[derive(Debug, Default)]
pub struct CaptureTransport {
    pub datagrams: Vec<Vec<u8>>,
}

impl CaptureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_bytes(&self) -> usize {
        self.datagrams.iter().map(Vec::len).sum()
    }
}

impl Transport for CaptureTransport {
    fn send(&mut self, datagram: &[u8]) -> io::Result<()> {
        self.datagrams.push(datagram.to_vec());
        Ok(())
    }
}
