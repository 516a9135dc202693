//! Netlink message framing (`struct nlmsghdr`).

use super::{DecodeError, align, read_u16, read_u32};

/// Size of `struct nlmsghdr`.
pub const NLMSG_HDRLEN: usize = 16;

pub const NLMSG_NOOP: u16 = 1;
pub const NLMSG_ERROR: u16 = 2;
pub const NLMSG_DONE: u16 = 3;

pub const RTM_NEWLINK: u16 = 16;
pub const RTM_GETLINK: u16 = 18;

pub const NLM_F_REQUEST: u16 = 0x1;

/// Decoded `struct nlmsghdr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageHeader {
    /// Length of the message including this header, excluding trailing padding.
    pub len: u32,
    pub kind: u16,
    pub flags: u16,
    pub seq: u32,
    pub pid: u32,
}

impl MessageHeader {
    pub fn parse(buf: &[u8]) -> Result<Self, DecodeError> {
        if buf.len() < NLMSG_HDRLEN {
            return Err(DecodeError::Truncated {
                what: "netlink message header",
                needed: NLMSG_HDRLEN,
                available: buf.len(),
            });
        }

        Ok(Self {
            len: read_u32(buf, 0),
            kind: read_u16(buf, 4),
            flags: read_u16(buf, 6),
            seq: read_u32(buf, 8),
            pid: read_u32(buf, 12),
        })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.len.to_ne_bytes());
        buf.extend_from_slice(&self.kind.to_ne_bytes());
        buf.extend_from_slice(&self.flags.to_ne_bytes());
        buf.extend_from_slice(&self.seq.to_ne_bytes());
        buf.extend_from_slice(&self.pid.to_ne_bytes());
    }
}

/// One netlink message borrowed from a receive buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message<'a> {
    pub header: MessageHeader,
    /// Bytes following the header, up to `header.len`.
    pub payload: &'a [u8],
}

impl Message<'_> {
    /// Decodes the `error` field of an `NLMSG_ERROR` payload (`struct nlmsgerr`).
    ///
    /// The kernel stores a negated errno here.
    pub fn error_code(&self) -> Result<i32, DecodeError> {
        if self.payload.len() < 4 {
            return Err(DecodeError::Truncated {
                what: "NLMSG_ERROR payload",
                needed: 4,
                available: self.payload.len(),
            });
        }
        Ok(super::read_i32(self.payload, 0))
    }
}

/// Iterator over the netlink messages packed into a buffer.
///
/// Yields `Err` at most once, for the first truncated or mis-sized message, and then stops.
#[derive(Debug, Clone)]
pub struct Messages<'a> {
    buf: &'a [u8],
}

impl<'a> Messages<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }
}

impl<'a> Iterator for Messages<'a> {
    type Item = Result<Message<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buf.is_empty() {
            return None;
        }

        let header = match MessageHeader::parse(self.buf) {
            Ok(header) => header,
            Err(err) => {
                self.buf = &[];
                return Some(Err(err));
            }
        };

        let len = header.len as usize;
        if len < NLMSG_HDRLEN || len > self.buf.len() {
            let available = self.buf.len();
            self.buf = &[];
            return Some(Err(DecodeError::BadLength {
                what: "netlink message",
                len,
                available,
            }));
        }

        let payload = &self.buf[NLMSG_HDRLEN..len];
        self.buf = &self.buf[align(len).min(self.buf.len())..];

        Some(Ok(Message { header, payload }))
    }
}
