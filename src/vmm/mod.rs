//! Hypervisor statistics channel of one bhyve virtual machine.
//!
//! A [`VmHandle`] owns an open `vmmapi` context for the VM's device (as named under
//! `/dev/vmm/`). The kernel exports a fixed set of named counters per VM; names and values are
//! read as two parallel sequences whose indices line up.
//!
//! Two ways to manage the handle's lifetime:
//!
//! - [`with_vm`] opens a handle, runs a closure and closes it on every exit path.
//! - [`VmHandle::open`] and [`VmHandle::close`] for callers that keep one handle across many
//!   reads. A handle that is dropped without `close` is released as well.
//!
//! # Example
//!
//! ```no_run
//! let counters = vmstats::vmm::with_vm("guest0", |vm| vm.counters())?;
//! for (name, value) in counters.iter() {
//!     println!("{name}: {value}");
//! }
//! # Ok::<(), vmstats::Error>(())
//! ```

mod counters;
#[cfg(target_os = "freebsd")]
mod freebsd;
#[cfg(not(target_os = "freebsd"))]
mod unsupported;

use std::ffi::CString;

pub use counters::VmCounters;
#[cfg(target_os = "freebsd")]
use freebsd::Context;
#[cfg(not(target_os = "freebsd"))]
use unsupported::Context;

use crate::{Error, Result};

/// Exclusive session on one VM's management device.
///
/// The handle is `Send` but not `Sync`: move it to the thread that uses it, or guard it with a
/// mutex.
#[derive(Debug)]
pub struct VmHandle {
    device: String,
    ctx: Context,
}

impl VmHandle {
    /// Opens the management device of the VM called `device`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `device` is empty or contains a NUL byte. No syscall is made.
    /// - [`Error::Os`] named `vm_open` if the device cannot be opened (missing VM, permissions).
    /// - [`Error::Unsupported`] on platforms without `vmmapi`.
    pub fn open(device: &str) -> Result<Self> {
        let name = match CString::new(device) {
            Ok(name) if !device.is_empty() => name,
            _ => {
                return Err(Error::NotFound {
                    identifier: device.to_owned(),
                });
            }
        };

        let ctx = Context::open(&name)?;
        log::debug!("opened vmm device `{device}`");
        Ok(Self {
            device: device.to_owned(),
            ctx,
        })
    }

    /// Releases the device descriptor and context memory.
    pub fn close(self) {
        let VmHandle { device, ctx } = self;
        drop(ctx);
        log::debug!("closed vmm device `{device}`");
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// Descriptions of the exported counters, in kernel order.
    ///
    /// Empty if the hypervisor exports no counters.
    ///
    /// # Errors
    ///
    /// [`Error::Os`] named `vm_get_stats` or `vm_get_stat_desc` if either call fails, e.g. for
    /// a VM destroyed after it was opened.
    pub fn counter_names(&self) -> Result<Vec<String>> {
        self.ctx.counter_names()
    }

    /// Current counter values, index-aligned with [`counter_names`](Self::counter_names).
    ///
    /// # Errors
    ///
    /// [`Error::Os`] named `vm_get_stats` if the read fails.
    pub fn counter_values(&self) -> Result<Vec<u64>> {
        self.ctx.counter_values()
    }

    /// Reads names and values back to back and pairs them.
    ///
    /// # Errors
    ///
    /// Besides read failures, returns [`Error::CounterMismatch`] if the two reads disagree on
    /// the number of counters.
    pub fn counters(&self) -> Result<VmCounters> {
        let names = self.counter_names()?;
        let values = self.counter_values()?;
        log::trace!("vmm `{}`: read {} counters", self.device, values.len());
        VmCounters::new(names, values)
    }
}

/// Opens `device`, runs `f` on the handle and closes it, also when `f` fails.
pub fn with_vm<T>(device: &str, f: impl FnOnce(&VmHandle) -> Result<T>) -> Result<T> {
    let handle = VmHandle::open(device)?;
    let result = f(&handle);
    handle.close();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_embedded_nul_is_not_found() {
        let err = VmHandle::open("guest\0evil").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(matches!(err, Error::NotFound { identifier } if identifier == "guest\0evil"));
    }

    #[test]
    fn test_empty_name_is_not_found() {
        let err = VmHandle::open("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_with_vm_propagates_open_failure() {
        let mut called = false;
        let result = with_vm("a\0b", |_| {
            called = true;
            Ok(())
        });
        assert!(result.is_err());
        assert!(!called);
    }

    #[test]
    #[cfg(not(target_os = "freebsd"))]
    fn test_unsupported_platform() {
        let err = VmHandle::open("guest0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert_eq!(err.op(), Some("vm_open"));
    }

    #[test]
    #[cfg(target_os = "freebsd")]
    fn test_missing_device_is_os_error() {
        let err = VmHandle::open("vmstats-no-such-vm").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Os);
        assert_eq!(err.op(), Some("vm_open"));
    }
}
