//! Network interface statistics.
//!
//! Two backends produce the same [`InterfaceStats`] record:
//!
//! - FreeBSD reads the interface MIB table (`net.link.generic.ifdata.<index>.general`) with
//!   [`stats_by_index`]; [`interface_count`] returns the table size.
//! - Linux sends one `RTM_GETLINK` request over a `NETLINK_ROUTE` socket with
//!   [`stats_by_name`].
//!
//! On any other combination of platform and backend the functions return
//! [`Error::Unsupported`](crate::Error::Unsupported) without touching the kernel.

#[cfg(target_os = "freebsd")]
mod ifmib;
pub mod netlink;
mod stats;

pub use stats::InterfaceStats;
pub(crate) use stats::decode_name;

use crate::Result;

/// Returns the number of interfaces in the kernel's MIB-indexed interface table.
///
/// Valid indices for [`stats_by_index`] are `1..=count`.
///
/// # Errors
///
/// [`Error::Os`](crate::Error::Os) named `sysctl` if the kernel query fails.
pub fn interface_count() -> Result<u32> {
    #[cfg(target_os = "freebsd")]
    {
        ifmib::interface_count()
    }
    #[cfg(not(target_os = "freebsd"))]
    {
        Err(crate::Error::Unsupported {
            op: "sysctl_ifcount",
        })
    }
}

/// Reads the statistics of the interface at MIB `index`.
///
/// # Errors
///
/// [`Error::Os`](crate::Error::Os) named `sysctl` if the kernel query fails (e.g. `ENOENT`
/// for an index without an interface).
pub fn stats_by_index(index: u32) -> Result<InterfaceStats> {
    #[cfg(target_os = "freebsd")]
    {
        ifmib::stats_by_index(index)
    }
    #[cfg(not(target_os = "freebsd"))]
    {
        let _ = index;
        Err(crate::Error::Unsupported { op: "sysctl_ifdata" })
    }
}

/// Reads the statistics of the interface called `name` over rtnetlink.
///
/// # Errors
///
/// - [`Error::InvalidName`](crate::Error::InvalidName) if `name` cannot be sent to the kernel.
/// - [`Error::Os`](crate::Error::Os) if the socket calls fail or the kernel reports an error
///   (`ENODEV` for an unknown interface).
/// - [`Error::ShortSend`](crate::Error::ShortSend), [`Error::Decode`](crate::Error::Decode) or
///   [`Error::Incomplete`](crate::Error::Incomplete) if the exchange yields no usable answer.
pub fn stats_by_name(name: &str) -> Result<InterfaceStats> {
    #[cfg(target_os = "linux")]
    {
        netlink::query_link(name)
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = name;
        Err(crate::Error::Unsupported { op: "rtnetlink" })
    }
}
