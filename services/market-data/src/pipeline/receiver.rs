//! Stage 1: multicast receiver
//!
//! Owns the joined socket inside a current-thread reactor. Each receive is
//! bounded by a short timeout so the loop observes the running flag even on
//! a silent group. A full Q1 means the packet is dropped and counted; the
//! receiver never waits on downstream stages.

use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, error, warn};

use spsc::Producer;
use types::clock::Clock;

use super::messages::RawPacket;
use super::PipelineCounters;

/// How long one receive may block before the loop re-checks shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct Receiver {
    reactor: tokio::runtime::Runtime,
    socket: UdpSocket,
    tx: Producer<RawPacket>,
    counters: Arc<PipelineCounters>,
    running: Arc<AtomicBool>,
}

impl Receiver {
    pub fn new(
        reactor: tokio::runtime::Runtime,
        socket: UdpSocket,
        tx: Producer<RawPacket>,
        counters: Arc<PipelineCounters>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            reactor,
            socket,
            tx,
            counters,
            running,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        thread::Builder::new()
            .name("feed-receiver".into())
            .spawn(move || self.run())
            .expect("spawn receiver thread")
    }

    fn run(self) {
        let Receiver {
            reactor,
            socket,
            mut tx,
            counters,
            running,
        } = self;

        reactor.block_on(async move {
            let socket = match tokio::net::UdpSocket::from_std(socket) {
                Ok(socket) => socket,
                Err(err) => {
                    error!(%err, "could not register socket with reactor");
                    return;
                }
            };

            let mut packet = RawPacket::empty();
            while running.load(Ordering::Acquire) {
                match timeout(POLL_INTERVAL, socket.recv_from(&mut packet.bytes)).await {
                    Ok(Ok((len, _from))) => {
                        packet.len = len as u16;
                        packet.receive_ts = Clock::monotonic_ns();

                        counters.packets_received.fetch_add(1, Ordering::Relaxed);
                        counters
                            .bytes_received
                            .fetch_add(len as u64, Ordering::Relaxed);

                        if !tx.try_push(packet) {
                            // Q1 full: drop at the packet boundary, no retry.
                            let dropped =
                                counters.packets_dropped.fetch_add(1, Ordering::Relaxed) + 1;
                            if dropped.is_power_of_two() {
                                warn!(dropped, "packet queue full, dropping datagrams");
                            }
                        }
                    }
                    Ok(Err(err)) => {
                        warn!(%err, "datagram receive failed");
                    }
                    Err(_elapsed) => {
                        // Timed poll: nothing arrived, loop to observe shutdown.
                    }
                }
            }
            debug!("receiver loop exited");
        });
    }
}
