//! Per-process accounting via `sysctl kern.proc.pid.<pid>`.
//!
//! [`query`] returns two snapshots decoded from one `struct kinfo_proc`: the size and runtime
//! accounting ([`ProcessAccounting`]) and the embedded `struct rusage` ([`ResourceUsage`]).
//! Only FreeBSD implements this query; elsewhere it fails with
//! [`Error::Unsupported`](crate::Error::Unsupported).

#[cfg(target_os = "freebsd")]
mod freebsd;
mod record;

pub use record::{MAX_USEC, ProcessAccounting, ResourceUsage, Timeval};

use crate::Result;

/// Reads the accounting record of process `pid`.
///
/// # Errors
///
/// - [`Error::Os`](crate::Error::Os) named `sysctl ctl_kern.kern_proc.kern_proc_pid` if the
///   query fails or no such process exists. An empty answer is reported the same way, with
///   `ESRCH`.
/// - [`Error::MalformedRecord`](crate::Error::MalformedRecord) if the kernel returned a record
///   of unexpected size. Unlike an empty answer this is a validation error
///   ([`ErrorKind::Validation`](crate::ErrorKind::Validation)) with no errno, since the syscall
///   itself succeeded.
/// - [`Error::InvalidTimestamp`](crate::Error::InvalidTimestamp) or
///   [`Error::NegativeValue`](crate::Error::NegativeValue) if a decoded field is out of range.
pub fn query(pid: i32) -> Result<(ProcessAccounting, ResourceUsage)> {
    #[cfg(target_os = "freebsd")]
    {
        freebsd::query(pid)
    }
    #[cfg(not(target_os = "freebsd"))]
    {
        let _ = pid;
        Err(crate::Error::Unsupported {
            op: "sysctl_kinfo_proc",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_os = "freebsd"))]
    fn test_unsupported_platform() {
        let err = query(1).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Unsupported);
        assert_eq!(err.op(), Some("sysctl_kinfo_proc"));
    }
}
