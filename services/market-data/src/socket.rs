//! Multicast socket construction
//!
//! The raw socket is configured with socket2 (address reuse must be set
//! before bind, and the multicast join happens on the raw handle), then
//! handed to tokio as a nonblocking `UdpSocket`.

use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};
use tracing::info;

use crate::error::FeedError;

/// Build a datagram socket bound to `(listen, port)`, with address reuse
/// enabled, joined to `group`, and set nonblocking for the reactor.
pub fn join_multicast(
    group: Ipv4Addr,
    port: u16,
    listen: Ipv4Addr,
) -> Result<UdpSocket, FeedError> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;

    let bind_addr = SocketAddrV4::new(listen, port);
    socket
        .bind(&bind_addr.into())
        .map_err(|source| FeedError::Bind {
            addr: listen,
            port,
            source,
        })?;

    socket
        .join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)
        .map_err(|source| FeedError::JoinGroup { group, source })?;

    socket.set_nonblocking(true)?;

    info!(%group, port, %listen, "joined multicast group");
    Ok(socket.into())
}
