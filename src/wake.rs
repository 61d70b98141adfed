use std::io;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use pnet::util::MacAddr;
use thiserror::Error;

use crate::mac;

pub const DEFAULT_BROADCAST: &str = "255.255.255.255";
pub const DEFAULT_PORT: u16 = 7;

const SYNC_STREAM: [u8; 6] = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
const MAC_REPETITIONS: usize = 16;
const MAGIC_PACKET_LEN: usize = SYNC_STREAM.len() + 6 * MAC_REPETITIONS;

#[derive(Debug, Error)]
pub enum WakeError {
    #[error("incorrect MAC address format {0:?}")]
    InvalidAddressFormat(String),

    #[error("failed to send magic packet: {0}")]
    Transmission(#[from] io::Error),
}

/// The 102-byte magic packet payload: six 0xff synchronization bytes followed
/// by the target MAC repeated 16 times. The payload is the entire datagram
/// body, nothing is added beyond what UDP itself frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicPacket([u8; MAGIC_PACKET_LEN]);

impl MagicPacket {
    pub fn new(target: MacAddr) -> Self {
        let mut payload = [0u8; MAGIC_PACKET_LEN];
        payload[..6].copy_from_slice(&SYNC_STREAM);
        for repetition in payload[6..].chunks_exact_mut(6) {
            repetition.copy_from_slice(&target.octets());
        }
        Self(payload)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Resolves the destination address and port. A malformed address string
/// surfaces as [`WakeError::Transmission`], the same as any other transport
/// fault.
pub fn resolve_target(broadcast: &str, port: u16) -> Result<SocketAddr, WakeError> {
    let mut addrs = (broadcast, port).to_socket_addrs()?;
    addrs.next().ok_or_else(|| {
        WakeError::Transmission(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("destination '{}' did not resolve", broadcast),
        ))
    })
}

/// Sends the payload as a single best-effort broadcast datagram. The socket
/// lives for this one call; it is dropped on every exit path. Wake-on-LAN has
/// no feedback channel, so there is no retry and no delivery confirmation.
pub fn send(packet: &MagicPacket, broadcast: &str, port: u16) -> Result<(), WakeError> {
    let target = resolve_target(broadcast, port)?;
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.set_broadcast(true)?;
    socket.send_to(packet.as_bytes(), target)?;
    Ok(())
}

/// Full pipeline: normalize the address, build the payload, broadcast it.
pub fn wake(mac_str: &str, broadcast: &str, port: u16) -> Result<(), WakeError> {
    let target = mac::normalize(mac_str)?;
    let packet = MagicPacket::new(target);

    log::debug!("sending magic packet for {} to {}:{}", target, broadcast, port);
    send(&packet, broadcast, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_packet_layout() {
        let packet = MagicPacket::new(MacAddr::new(0x00, 0xca, 0xfe, 0xba, 0xbe, 0x00));
        let bytes = packet.as_bytes();

        assert_eq!(bytes.len(), 102);
        assert_eq!(&bytes[..6], &[0xff; 6]);
        for repetition in bytes[6..].chunks(6) {
            assert_eq!(repetition, &[0x00, 0xca, 0xfe, 0xba, 0xbe, 0x00]);
        }
    }

    #[test]
    fn test_magic_packet_deterministic() {
        let mac = MacAddr::new(0x00, 0x11, 0x22, 0x33, 0x44, 0x55);
        assert_eq!(MagicPacket::new(mac), MagicPacket::new(mac));
        assert_eq!(
            MagicPacket::new(mac).as_bytes(),
            MagicPacket::new(mac).as_bytes()
        );
    }

    #[test]
    fn test_resolve_target() {
        let target = resolve_target(DEFAULT_BROADCAST, DEFAULT_PORT).unwrap();
        assert_eq!(target, "255.255.255.255:7".parse().unwrap());

        let target = resolve_target("192.168.1.255", 9).unwrap();
        assert_eq!(target, "192.168.1.255:9".parse().unwrap());
    }

    #[test]
    fn test_resolve_target_failure_is_transmission_error() {
        let result = resolve_target("not a broadcast address", DEFAULT_PORT);
        match result {
            Err(WakeError::Transmission(_)) => {}
            other => panic!("expected Transmission error, got {:?}", other),
        }
    }

    #[test]
    fn test_wake_rejects_bad_mac_before_any_send() {
        // an unresolvable destination would fail too, but the address check
        // must come first
        match wake("00:CA:FE:BA:BE:GG", "not a broadcast address", 9) {
            Err(WakeError::InvalidAddressFormat(s)) => assert_eq!(s, "00:CA:FE:BA:BE:GG"),
            other => panic!("expected InvalidAddressFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_wake_send_failure_propagates() {
        match wake("00:CA:FE:BA:BE:00", "not a broadcast address", 9) {
            Err(WakeError::Transmission(_)) => {}
            other => panic!("expected Transmission error, got {:?}", other),
        }
    }
}
