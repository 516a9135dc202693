//! Error type shared by every reader in this crate.
//!
//! Failures fall into a small taxonomy (see [`ErrorKind`]):
//!
//! - **OS errors** carry the name of the failing syscall or library call together with the
//!   [`std::io::Error`] built from the system error code. They are never retried.
//! - **Validation errors** mean the kernel answered, but the decoded record violated an
//!   invariant (e.g. a timestamp whose microseconds are out of range).
//! - **Not-found errors** mean an identifier could not be handed to the kernel at all.
//! - **Unsupported errors** are returned, without issuing a syscall, on platforms that do not
//!   implement the requested mechanism.
//! - **Protocol errors** only occur on the rtnetlink path: the exchange ended without a
//!   kernel-reported error but also without a usable answer.

use std::io;

use crate::net::netlink::DecodeError;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Os,
    Validation,
    NotFound,
    Unsupported,
    Protocol,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{op} failed: {source}")]
    Os {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{op}: {field} has sub-second part {usec} outside of [0, {max}]", max = crate::process::MAX_USEC)]
    InvalidTimestamp {
        op: &'static str,
        field: &'static str,
        usec: i64,
    },

    #[error("{op}: {field} is negative: {value}")]
    NegativeValue {
        op: &'static str,
        field: &'static str,
        value: i64,
    },

    #[error("{op}: expected a record of {expected} bytes, kernel returned {actual}")]
    MalformedRecord {
        op: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid interface name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("hypervisor exported {names} counter names but {values} counter values")]
    CounterMismatch { names: usize, values: usize },

    #[error("identifier {identifier:?} cannot be passed to the kernel")]
    NotFound { identifier: String },

    #[error("{op} is not supported on this platform")]
    Unsupported { op: &'static str },

    #[error("rtnetlink: short send, {sent} of {expected} bytes written")]
    ShortSend { sent: usize, expected: usize },

    #[error("rtnetlink: {0}")]
    Decode(#[from] DecodeError),

    #[error("rtnetlink: response did not contain {}", .missing.join(", "))]
    Incomplete { missing: Vec<&'static str> },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Builds an [`Error::Os`] from the calling thread's current `errno`.
    ///
    /// Must be called right after the failing call, before anything else can clobber `errno`.
    pub(crate) fn last_os_error(op: &'static str) -> Self {
        Error::Os {
            op,
            source: io::Error::last_os_error(),
        }
    }

    pub(crate) fn from_errno(op: &'static str, errno: i32) -> Self {
        Error::Os {
            op,
            source: io::Error::from_raw_os_error(errno),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Os { .. } => ErrorKind::Os,
            Error::InvalidTimestamp { .. }
            | Error::NegativeValue { .. }
            | Error::MalformedRecord { .. }
            | Error::InvalidName { .. }
            | Error::CounterMismatch { .. } => ErrorKind::Validation,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Unsupported { .. } => ErrorKind::Unsupported,
            Error::ShortSend { .. } | Error::Decode(_) | Error::Incomplete { .. } => {
                ErrorKind::Protocol
            }
        }
    }

    /// Returns the system error code of an [`Error::Os`], if the kernel reported one.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Error::Os { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    /// Name of the syscall or library call that failed, if any.
    pub fn op(&self) -> Option<&'static str> {
        match self {
            Error::Os { op, .. }
            | Error::InvalidTimestamp { op, .. }
            | Error::NegativeValue { op, .. }
            | Error::MalformedRecord { op, .. }
            | Error::Unsupported { op } => Some(op),
            _ => None,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err.kind() {
            ErrorKind::Os => match err {
                Error::Os { source, .. } => source,
                other => io::Error::other(other),
            },
            ErrorKind::NotFound => io::Error::new(io::ErrorKind::NotFound, err),
            ErrorKind::Unsupported => io::Error::new(io::ErrorKind::Unsupported, err),
            ErrorKind::Validation | ErrorKind::Protocol => {
                io::Error::new(io::ErrorKind::InvalidData, err)
            }
        }
    }
}

pub trait ResultOkLogExt<T, E> {
    fn ok_log(self) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log(self) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::error!("{err}");
                None
            }
        }
    }
}
