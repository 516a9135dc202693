//! `libvmmapi` bindings.

use std::ffi::{CStr, c_char, c_int, c_void};
use std::ptr::{self, NonNull};

use super::counters::{copy_description, copy_values};
use crate::{Error, Result};

#[repr(C)]
#[allow(non_camel_case_types)]
struct vmctx {
    _private: [u8; 0],
}

#[link(name = "vmmapi")]
unsafe extern "C" {
    fn vm_open(name: *const c_char) -> *mut vmctx;
    fn vm_get_device_fd(ctx: *mut vmctx) -> c_int;
    fn vm_get_stats(
        ctx: *mut vmctx,
        vcpu: c_int,
        ret_tv: *mut libc::timeval,
        ret_entries: *mut c_int,
    ) -> *mut u64;
    fn vm_get_stat_desc(ctx: *mut vmctx, index: c_int) -> *const c_char;
}

/// An open `vmctx`; closed and freed on drop.
#[derive(Debug)]
pub(super) struct Context {
    ctx: NonNull<vmctx>,
}

// SAFETY: a vmctx is not bound to the thread that opened it. Concurrent use is prevented by
// `&mut`/ownership at the `VmHandle` level, since `Context` is not `Sync`.
unsafe impl Send for Context {}

impl Context {
    pub(super) fn open(name: &CStr) -> Result<Self> {
        let ctx = unsafe { vm_open(name.as_ptr()) };
        NonNull::new(ctx)
            .map(|ctx| Self { ctx })
            .ok_or_else(|| Error::last_os_error("vm_open"))
    }

    /// Copies the counter values of vCPU 0. Empty when the kernel exports none.
    fn stats(&self) -> Result<Vec<u64>> {
        let mut entries: c_int = 0;
        let stats =
            unsafe { vm_get_stats(self.ctx.as_ptr(), 0, ptr::null_mut(), &mut entries) };
        // SAFETY: libvmmapi returns a buffer of `entries` counters that stays valid until the
        // next vm_get_stats call on this context; it is copied out before returning.
        unsafe { copy_values(stats, entries) }
    }

    pub(super) fn counter_names(&self) -> Result<Vec<String>> {
        let count = self.stats()?.len();
        (0..count)
            .map(|index| {
                let desc = unsafe { vm_get_stat_desc(self.ctx.as_ptr(), index as c_int) };
                // SAFETY: descriptions are static NUL-terminated strings inside libvmmapi.
                unsafe { copy_description(desc) }
            })
            .collect()
    }

    pub(super) fn counter_values(&self) -> Result<Vec<u64>> {
        self.stats()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        // SAFETY: `ctx` came from vm_open, which allocates it with malloc, and is released
        // exactly once here.
        unsafe {
            libc::close(vm_get_device_fd(self.ctx.as_ptr()));
            libc::free(self.ctx.as_ptr().cast::<c_void>());
        }
    }
}
