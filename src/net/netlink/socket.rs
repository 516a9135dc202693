use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

use crate::{Error, Result};

/// A `NETLINK_ROUTE` datagram socket, closed when dropped.
#[derive(Debug)]
pub(crate) struct RouteSocket {
    fd: OwnedFd,
}

impl RouteSocket {
    pub(crate) fn open() -> Result<Self> {
        let fd = unsafe {
            libc::socket(
                libc::AF_NETLINK,
                libc::SOCK_DGRAM | libc::SOCK_CLOEXEC,
                libc::NETLINK_ROUTE,
            )
        };
        if fd == -1 {
            return Err(Error::last_os_error("socket"));
        }

        // SAFETY: `fd` was just returned by socket(2) and is owned by nobody else.
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        Ok(Self { fd })
    }

    /// Sends `buf` as one datagram. Anything short of the whole buffer is an error.
    pub(crate) fn send(&self, buf: &[u8]) -> Result<()> {
        let sent = unsafe { libc::send(self.fd.as_raw_fd(), buf.as_ptr().cast(), buf.len(), 0) };
        if sent < 0 {
            return Err(Error::last_os_error("send"));
        }

        let sent = sent as usize;
        if sent != buf.len() {
            return Err(Error::ShortSend {
                sent,
                expected: buf.len(),
            });
        }
        Ok(())
    }

    /// Receives one datagram into `buf` and returns its length.
    pub(crate) fn recv(&self, buf: &mut [u8]) -> Result<usize> {
        let received =
            unsafe { libc::recv(self.fd.as_raw_fd(), buf.as_mut_ptr().cast(), buf.len(), 0) };
        if received < 0 {
            return Err(Error::last_os_error("recv"));
        }
        Ok(received as usize)
    }
}
