//! `RTM_GETLINK` request construction and `RTM_NEWLINK` response decoding.

use std::io;

use super::attr::{Attributes, IFLA_IFNAME, IFLA_MTU, IFLA_STATS64, write_attribute};
use super::message::{
    MessageHeader, Messages, NLM_F_REQUEST, NLMSG_DONE, NLMSG_ERROR, NLMSG_HDRLEN, RTM_GETLINK,
    RTM_NEWLINK,
};
use super::{DecodeError, align, read_i32, read_u16, read_u32, read_u64};
use crate::net::{InterfaceStats, decode_name};
use crate::{Error, Result};

/// Size of `struct ifinfomsg`.
pub const IFINFOMSG_LEN: usize = 16;

/// Kernel limit on interface names, including the terminating NUL.
pub const IFNAMSIZ: usize = 16;

const AF_UNSPEC: u8 = 0;

/// Decoded `struct ifinfomsg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkHeader {
    pub family: u8,
    /// ARPHRD_* device type.
    pub link_type: u16,
    pub index: i32,
    /// IFF_* flags.
    pub flags: u32,
    pub change: u32,
}

impl LinkHeader {
    pub fn parse(buf: &[u8]) -> std::result::Result<Self, DecodeError> {
        if buf.len() < IFINFOMSG_LEN {
            return Err(DecodeError::Truncated {
                what: "ifinfomsg",
                needed: IFINFOMSG_LEN,
                available: buf.len(),
            });
        }

        Ok(Self {
            family: buf[0],
            link_type: read_u16(buf, 2),
            index: read_i32(buf, 4),
            flags: read_u32(buf, 8),
            change: read_u32(buf, 12),
        })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(self.family);
        buf.push(0);
        buf.extend_from_slice(&self.link_type.to_ne_bytes());
        buf.extend_from_slice(&self.index.to_ne_bytes());
        buf.extend_from_slice(&self.flags.to_ne_bytes());
        buf.extend_from_slice(&self.change.to_ne_bytes());
    }
}

/// Leading counters of `struct rtnl_link_stats64`.
///
/// Newer kernels append more fields; only the ones below are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkStats64 {
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub rx_dropped: u64,
    pub tx_dropped: u64,
    pub multicast: u64,
    pub collisions: u64,
}

impl LinkStats64 {
    pub const LEN: usize = 10 * 8;

    pub fn parse(buf: &[u8]) -> std::result::Result<Self, DecodeError> {
        if buf.len() < Self::LEN {
            return Err(DecodeError::Truncated {
                what: "IFLA_STATS64",
                needed: Self::LEN,
                available: buf.len(),
            });
        }

        Ok(Self {
            rx_packets: read_u64(buf, 0),
            tx_packets: read_u64(buf, 8),
            rx_bytes: read_u64(buf, 16),
            tx_bytes: read_u64(buf, 24),
            rx_errors: read_u64(buf, 32),
            tx_errors: read_u64(buf, 40),
            rx_dropped: read_u64(buf, 48),
            tx_dropped: read_u64(buf, 56),
            multicast: read_u64(buf, 64),
            collisions: read_u64(buf, 72),
        })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        for value in [
            self.rx_packets,
            self.tx_packets,
            self.rx_bytes,
            self.tx_bytes,
            self.rx_errors,
            self.tx_errors,
            self.rx_dropped,
            self.tx_dropped,
            self.multicast,
            self.collisions,
        ] {
            buf.extend_from_slice(&value.to_ne_bytes());
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.len() >= IFNAMSIZ {
        "name is longer than 15 bytes"
    } else if name.as_bytes().contains(&0) {
        "name contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(Error::InvalidName {
        name: name.to_owned(),
        reason,
    })
}

/// Builds the `RTM_GETLINK` request for the interface called `name`.
///
/// The name travels as a NUL-terminated `IFLA_IFNAME` attribute. The returned buffer is the
/// exact byte sequence to send; its length equals the `nlmsg_len` it carries.
pub fn build_request(name: &str) -> Result<Vec<u8>> {
    validate_name(name)?;

    let mut ifname = Vec::with_capacity(name.len() + 1);
    ifname.extend_from_slice(name.as_bytes());
    ifname.push(0);

    let len = NLMSG_HDRLEN + align(IFINFOMSG_LEN) + align(super::attr::RTA_HDRLEN + ifname.len());
    let mut buf = Vec::with_capacity(len);
    MessageHeader {
        len: len as u32,
        kind: RTM_GETLINK,
        flags: NLM_F_REQUEST,
        seq: 0,
        pid: 0,
    }
    .write_to(&mut buf);
    LinkHeader {
        family: AF_UNSPEC,
        ..Default::default()
    }
    .write_to(&mut buf);
    write_attribute(&mut buf, IFLA_IFNAME, &ifname);

    debug_assert_eq!(buf.len(), len);
    Ok(buf)
}

/// Fields captured from one `RTM_NEWLINK` message.
#[derive(Debug, Default)]
struct LinkMessage {
    header: Option<LinkHeader>,
    name: Option<String>,
    stats: Option<LinkStats64>,
    mtu: Option<u32>,
}

impl LinkMessage {
    fn parse(payload: &[u8]) -> std::result::Result<Self, DecodeError> {
        let header = LinkHeader::parse(payload)?;
        let mut link = LinkMessage {
            header: Some(header),
            ..Default::default()
        };

        for attr in Attributes::new(&payload[align(IFINFOMSG_LEN)..]) {
            let attr = attr?;
            match attr.kind {
                IFLA_IFNAME => link.name = Some(decode_name(attr.payload)),
                IFLA_MTU => {
                    if attr.payload.len() < 4 {
                        return Err(DecodeError::Truncated {
                            what: "IFLA_MTU",
                            needed: 4,
                            available: attr.payload.len(),
                        });
                    }
                    link.mtu = Some(read_u32(attr.payload, 0));
                }
                IFLA_STATS64 => link.stats = Some(LinkStats64::parse(attr.payload)?),
                _ => {}
            }
        }

        Ok(link)
    }

    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.header.is_none() {
            missing.push("link header");
        }
        if self.name.is_none() {
            missing.push("IFLA_IFNAME");
        }
        if self.stats.is_none() {
            missing.push("IFLA_STATS64");
        }
        if self.mtu.is_none() {
            missing.push("IFLA_MTU");
        }
        missing
    }

    /// Converts into [`InterfaceStats`] if every required field was seen.
    fn into_stats(self) -> std::result::Result<InterfaceStats, Self> {
        match self {
            LinkMessage {
                header: Some(header),
                name: Some(name),
                stats: Some(stats),
                mtu: Some(mtu),
            } => {
                // Send-queue metrics, baud rate and output multicast have no rtnetlink counterpart.
                Ok(InterfaceStats {
                    name,
                    flags: header.flags,
                    send_length: 0,
                    max_send_length: 0,
                    send_drops: 0,
                    mtu,
                    baudrate: 0,
                    input_packets: stats.rx_packets,
                    output_packets: stats.tx_packets,
                    input_errors: stats.rx_errors,
                    output_errors: stats.tx_errors,
                    collisions: stats.collisions,
                    input_bytes: stats.rx_bytes,
                    output_bytes: stats.tx_bytes,
                    input_mcast: stats.multicast,
                    output_mcast: 0,
                    input_dropped: stats.rx_dropped,
                    output_dropped: stats.tx_dropped,
                })
            }
            other => Err(other),
        }
    }
}

/// Decodes the kernel's answer to a [`build_request`] message.
///
/// Returns the first `RTM_NEWLINK` that carries the link header, name, 64-bit stats and MTU.
///
/// # Errors
///
/// - [`Error::Os`] for any `NLMSG_ERROR`, carrying its negated code as errno. The request does
///   not ask for acknowledgements, so a zero code fails as well.
/// - [`Error::Os`] of kind [`io::ErrorKind::NotFound`] if `NLMSG_DONE` arrives first.
/// - [`Error::Decode`] for truncated or mis-sized messages and attributes.
/// - [`Error::Incomplete`] if the buffer ends without a complete link message.
pub fn parse_response(buf: &[u8]) -> Result<InterfaceStats> {
    let mut partial: Option<LinkMessage> = None;

    for message in Messages::new(buf) {
        let message = message?;
        match message.header.kind {
            NLMSG_ERROR => {
                let code = message.error_code()?;
                return Err(Error::from_errno("rtnetlink", code.wrapping_neg()));
            }
            NLMSG_DONE => {
                return Err(Error::Os {
                    op: "rtnetlink",
                    source: io::Error::new(
                        io::ErrorKind::NotFound,
                        "end of dump before any link was reported",
                    ),
                });
            }
            RTM_NEWLINK => match LinkMessage::parse(message.payload)?.into_stats() {
                Ok(stats) => {
                    log::debug!("rtnetlink: decoded link `{}`", stats.name);
                    return Ok(stats);
                }
                Err(link) => {
                    log::trace!("rtnetlink: link message without {:?}", link.missing());
                    partial = Some(link);
                }
            },
            other => log::trace!("rtnetlink: skipping message type {other}"),
        }
    }

    Err(Error::Incomplete {
        missing: partial.unwrap_or_default().missing(),
    })
}
