//! Route attributes (`struct rtattr`): a length-prefixed, 4-byte aligned TLV stream.

use super::{DecodeError, align, read_u16};

/// Size of `struct rtattr`.
pub const RTA_HDRLEN: usize = 4;

pub const IFLA_IFNAME: u16 = 3;
pub const IFLA_MTU: u16 = 4;
pub const IFLA_STATS64: u16 = 23;

/// The two high bits of `rta_type` are flags (nested, network byte order).
const RTA_TYPE_MASK: u16 = 0x3fff;

/// One attribute borrowed from a message payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub kind: u16,
    pub payload: &'a [u8],
}

/// Lazy, non-restartable iterator over an attribute stream.
///
/// Stops after the first decode error, which it yields instead of silently ending.
#[derive(Debug, Clone)]
pub struct Attributes<'a> {
    buf: &'a [u8],
}

impl<'a> Attributes<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }
}

impl<'a> Iterator for Attributes<'a> {
    type Item = Result<Attribute<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buf.is_empty() {
            return None;
        }

        if self.buf.len() < RTA_HDRLEN {
            let available = self.buf.len();
            self.buf = &[];
            return Some(Err(DecodeError::Truncated {
                what: "route attribute header",
                needed: RTA_HDRLEN,
                available,
            }));
        }

        let len = read_u16(self.buf, 0) as usize;
        let kind = read_u16(self.buf, 2) & RTA_TYPE_MASK;
        if len < RTA_HDRLEN || len > self.buf.len() {
            let available = self.buf.len();
            self.buf = &[];
            return Some(Err(DecodeError::BadLength {
                what: "route attribute",
                len,
                available,
            }));
        }

        let payload = &self.buf[RTA_HDRLEN..len];
        self.buf = &self.buf[align(len).min(self.buf.len())..];

        Some(Ok(Attribute { kind, payload }))
    }
}

/// Appends one attribute to `buf`, padding it to the attribute alignment.
pub fn write_attribute(buf: &mut Vec<u8>, kind: u16, payload: &[u8]) {
    let len = (RTA_HDRLEN + payload.len()) as u16;
    buf.extend_from_slice(&len.to_ne_bytes());
    buf.extend_from_slice(&kind.to_ne_bytes());
    buf.extend_from_slice(payload);
    buf.resize(buf.len() + align(len as usize) - len as usize, 0);
}
