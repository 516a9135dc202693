//! Minimal rtnetlink client for a single `RTM_GETLINK` exchange.
//!
//! The codec half (message and attribute iterators, request construction, response parsing)
//! is plain byte manipulation and builds on every platform. Only [`query_link`] touches a
//! socket and is therefore Linux-only.
//!
//! All integers on the wire are in host byte order.
#![cfg_attr(not(target_os = "linux"), allow(dead_code))]

mod attr;
mod error;
mod link;
mod message;
#[cfg(target_os = "linux")]
mod socket;

pub use attr::{Attribute, Attributes};
pub use error::DecodeError;
pub use link::{LinkHeader, LinkStats64, build_request, parse_response};
pub use message::{Message, MessageHeader, Messages};

/// Netlink messages and route attributes are both aligned to 4 bytes.
const ALIGNTO: usize = 4;

/// Rounds `len` up to the next multiple of [`ALIGNTO`].
pub(crate) const fn align(len: usize) -> usize {
    (len + ALIGNTO - 1) & !(ALIGNTO - 1)
}

/// Size of the receive buffer. A single link answer is a few KiB at most.
#[cfg(target_os = "linux")]
const RECV_BUFFER_LEN: usize = 32 * 1024;

/// Runs one link-information request for `name` and decodes the answer.
///
/// The socket is closed before returning, on success and on every error path.
#[cfg(target_os = "linux")]
pub(crate) fn query_link(name: &str) -> crate::Result<crate::net::InterfaceStats> {
    let request = build_request(name)?;
    let socket = socket::RouteSocket::open()?;
    socket.send(&request)?;

    let mut buf = vec![0u8; RECV_BUFFER_LEN];
    let len = socket.recv(&mut buf)?;
    log::trace!("rtnetlink: received {len} bytes for link `{name}`");

    parse_response(&buf[..len])
}

fn read_array<const N: usize>(buf: &[u8], at: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[at..at + N]);
    out
}

pub(crate) fn read_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_ne_bytes(read_array(buf, at))
}

pub(crate) fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_ne_bytes(read_array(buf, at))
}

pub(crate) fn read_i32(buf: &[u8], at: usize) -> i32 {
    i32::from_ne_bytes(read_array(buf, at))
}

pub(crate) fn read_u64(buf: &[u8], at: usize) -> u64 {
    u64::from_ne_bytes(read_array(buf, at))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align() {
        assert_eq!(align(0), 0);
        assert_eq!(align(1), 4);
        assert_eq!(align(4), 4);
        assert_eq!(align(5), 8);
        assert_eq!(align(16), 16);
    }

    #[test]
    fn test_read_helpers() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&7u16.to_ne_bytes());
        buf.extend_from_slice(&0xdead_beefu32.to_ne_bytes());
        buf.extend_from_slice(&(-19i32).to_ne_bytes());
        buf.extend_from_slice(&u64::MAX.to_ne_bytes());

        assert_eq!(read_u16(&buf, 0), 7);
        assert_eq!(read_u32(&buf, 2), 0xdead_beef);
        assert_eq!(read_i32(&buf, 6), -19);
        assert_eq!(read_u64(&buf, 10), u64::MAX);
    }
}
