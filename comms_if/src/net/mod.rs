//! # Network Module
//!
//! This module provides the best-effort telemetry link between the robot and
//! the operator console. The link is a connected UDP socket pair: datagrams
//! may be lost, duplicated or reordered by the radio bridge and no
//! acknowledgement, retry or ordering is provided here. The only service
//! guarantees are:
//!
//! - outbound sends are paced to a minimum inter-send interval, with early
//!   calls silently dropped (no queue, no backlog),
//! - the most recently received well-formed frame is available through a
//!   thread-safe whole-frame accessor, so the superloop never observes a
//!   torn read spanning two datagrams,
//! - a health flag records the outcome of the most recent transmission
//!   attempt only, for status indication, never for flow control.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::warn;
use serde::Deserialize;
use std::{
    net::UdpSocket,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread,
    time::{Duration, Instant},
};

use crate::frame::WireFrame;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Receive timeout used by the background thread so that it can poll the
/// shutdown flag while no traffic is arriving.
const RECV_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Largest datagram the receive thread will accept. Anything bigger than the
/// expected frame is rejected by the frame decoder anyway.
const RECV_BUF_SIZE: usize = 256;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Network parameters for both ends of the link, loaded from `net.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetParams {
    /// Link parameters for the robot end.
    pub bot: LinkParams,

    /// Link parameters for the operator console end.
    pub remote: LinkParams,
}

/// Parameters for one end of the telemetry link.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkParams {
    /// Local address to bind the socket to.
    pub bind_addr: String,

    /// Address of the peer at the other end of the link.
    pub peer_addr: String,

    /// Minimum interval between two outbound sends.
    ///
    /// Units: milliseconds
    pub min_send_interval_ms: u64,

    /// Length of the one-time gain synchronisation window after boot.
    ///
    /// Units: milliseconds
    pub gain_sync_window_ms: u64,
}

/// Send pacing gate.
///
/// Enforces the minimum inter-send interval: [`SendPacer::ready`] returns
/// true at most once per interval, callers arriving early are expected to
/// drop their frame.
pub struct SendPacer {
    interval: Duration,
    last_send: Option<Instant>,
}

/// One end of the telemetry link.
///
/// Type parameter `R` is the frame type received at this end. Frames of any
/// [`WireFrame`] type can be sent.
pub struct TelemLink<R: WireFrame> {
    socket: UdpSocket,

    pacer: SendPacer,

    /// Outcome of the most recent transmission attempt.
    last_send_ok: bool,

    /// Latest well-formed received frame, written by the receive thread.
    shadow: Arc<Mutex<Option<R>>>,

    shutdown: Arc<AtomicBool>,

    join_handle: Option<thread::JoinHandle<()>>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("Could not bind the link socket to {0}: {1}")]
    BindError(String, std::io::Error),

    #[error("Could not set the peer address to {0}: {1}")]
    ConnectError(String, std::io::Error),

    #[error("Could not configure the link socket: {0}")]
    SocketOptionError(std::io::Error),

    #[error("Could not clone the link socket for the receive thread: {0}")]
    CloneError(std::io::Error),
}

/// Outcome of a single call to [`TelemLink::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    /// The frame was handed to the socket.
    Sent,

    /// The call arrived before the minimum send interval elapsed and the
    /// frame was dropped. Not an error.
    Paced,

    /// The transmission attempt failed. Recorded in the health flag, the
    /// frame is not retried.
    Failed,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SendPacer {
    /// Create a new pacer with the given minimum inter-send interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_send: None,
        }
    }

    /// Returns true if a send is allowed at `now`, and if so starts the next
    /// pacing window.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last_send {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last_send = Some(now);
                true
            }
        }
    }
}

impl<R: WireFrame> TelemLink<R> {
    /// Open one end of the link.
    ///
    /// Binds the local socket, sets the peer, and spawns the background
    /// receive thread which keeps the latest-frame shadow up to date.
    pub fn new(params: &LinkParams) -> Result<Self, LinkError> {
        let socket = UdpSocket::bind(&params.bind_addr)
            .map_err(|e| LinkError::BindError(params.bind_addr.clone(), e))?;

        socket
            .connect(&params.peer_addr)
            .map_err(|e| LinkError::ConnectError(params.peer_addr.clone(), e))?;

        socket
            .set_read_timeout(Some(RECV_POLL_TIMEOUT))
            .map_err(LinkError::SocketOptionError)?;

        let recv_socket = socket.try_clone().map_err(LinkError::CloneError)?;

        let shadow = Arc::new(Mutex::new(None));
        let shutdown = Arc::new(AtomicBool::new(false));

        // Spawn the receive thread
        let shadow_clone = shadow.clone();
        let shutdown_clone = shutdown.clone();
        let join_handle =
            thread::spawn(move || recv_thread::<R>(recv_socket, shadow_clone, shutdown_clone));

        Ok(Self {
            socket,
            pacer: SendPacer::new(Duration::from_millis(params.min_send_interval_ms)),
            last_send_ok: false,
            shadow,
            shutdown,
            join_handle: Some(join_handle),
        })
    }

    /// Attempt to send a frame to the peer.
    ///
    /// Calls arriving before the minimum send interval has elapsed are
    /// silently dropped ([`SendStatus::Paced`]), the caller's newest frame
    /// will go out on the next eligible call. Transmission failures are
    /// recorded in the health flag only, there is no retry.
    pub fn send<F: WireFrame>(&mut self, frame: &F) -> SendStatus {
        if !self.pacer.ready(Instant::now()) {
            return SendStatus::Paced;
        }

        let bytes = match frame.to_bytes() {
            Ok(b) => b,
            Err(e) => {
                warn!("Could not encode outbound frame: {}", e);
                self.last_send_ok = false;
                return SendStatus::Failed;
            }
        };

        match self.socket.send(&bytes) {
            Ok(_) => {
                self.last_send_ok = true;
                SendStatus::Sent
            }
            Err(_) => {
                self.last_send_ok = false;
                SendStatus::Failed
            }
        }
    }

    /// Get a copy of the latest well-formed frame received from the peer, or
    /// `None` if nothing has arrived yet.
    ///
    /// The whole frame is copied out under the lock so the caller never
    /// observes fields from two different datagrams.
    pub fn latest(&self) -> Option<R> {
        match self.shadow.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        }
    }

    /// True if the most recent transmission attempt succeeded.
    ///
    /// For status indication (LED/display) only, never for flow control.
    pub fn healthy(&self) -> bool {
        self.last_send_ok
    }
}

impl<R: WireFrame> Drop for TelemLink<R> {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        if let Some(jh) = self.join_handle.take() {
            jh.join().ok();
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Receive thread main function.
///
/// This is the one asynchronous context in the system: it replaces the shadow
/// frame wholesale inside a short critical section, and discards malformed
/// datagrams without touching the previous shadow state.
fn recv_thread<R: WireFrame>(
    socket: UdpSocket,
    shadow: Arc<Mutex<Option<R>>>,
    shutdown: Arc<AtomicBool>,
) {
    let mut buf = [0u8; RECV_BUF_SIZE];

    while !shutdown.load(Ordering::Relaxed) {
        let len = match socket.recv(&mut buf) {
            Ok(len) => len,
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                continue
            }
            // Transient socket errors (e.g. ICMP unreachable bounced back by
            // the OS) are part of normal lossy-link operation
            Err(_) => continue,
        };

        match R::from_bytes(&buf[..len]) {
            Ok(frame) => {
                if let Ok(mut guard) = shadow.lock() {
                    *guard = Some(frame);
                }
            }
            Err(e) => warn!("Discarding inbound frame: {}", e),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_send_pacing() {
        let mut pacer = SendPacer::new(Duration::from_millis(2));
        let base = Instant::now();

        // First call always passes
        assert!(pacer.ready(base));

        // Sub-interval calls are dropped
        assert!(!pacer.ready(base + Duration::from_micros(500)));
        assert!(!pacer.ready(base + Duration::from_micros(1000)));
        assert!(!pacer.ready(base + Duration::from_micros(1500)));

        // Next window opens exactly at the interval
        assert!(pacer.ready(base + Duration::from_millis(2)));

        // And closes again immediately after
        assert!(!pacer.ready(base + Duration::from_millis(3)));
        assert!(pacer.ready(base + Duration::from_millis(4)));
    }

    #[test]
    fn test_at_most_one_send_per_window() {
        let mut pacer = SendPacer::new(Duration::from_millis(2));
        let base = Instant::now();

        // Issue sends every 0.5 ms for 10 ms, count how many pass
        let mut sent = 0;
        for i in 0..20 {
            if pacer.ready(base + Duration::from_micros(500 * i)) {
                sent += 1;
            }
        }

        // 10 ms of 2 ms windows allows at most 5 sends
        assert_eq!(sent, 5);
    }
}
