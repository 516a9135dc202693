//! Fixed-size reads through `sysctl(3)` on numeric MIB paths.

use std::mem::{MaybeUninit, size_of};
use std::ptr;

use libc::{c_int, c_uint};

use crate::{Error, Result};

/// Reads the value at `mib` into a `T` and returns it with the length the kernel reported.
///
/// `op` names the query in the error returned when `sysctl` fails.
///
/// # Safety
///
/// `T` must be plain old data: every bit pattern, including all zeroes, must be a valid `T`.
pub(crate) unsafe fn read<T: Copy>(op: &'static str, mib: &[c_int]) -> Result<(T, usize)> {
    let mut value = MaybeUninit::<T>::zeroed();
    let mut len = size_of::<T>();

    let rc = unsafe {
        libc::sysctl(
            mib.as_ptr(),
            mib.len() as c_uint,
            value.as_mut_ptr().cast(),
            &mut len,
            ptr::null(),
            0,
        )
    };
    if rc != 0 {
        return Err(Error::last_os_error(op));
    }

    log::trace!("{op}: kernel returned {len} of {} bytes", size_of::<T>());
    // SAFETY: zero-initialized above and `T` is plain old data per the caller's contract.
    Ok((unsafe { value.assume_init() }, len))
}

/// Like [`read`], but rejects answers that do not fill the whole record.
///
/// # Safety
///
/// Same contract as [`read`].
pub(crate) unsafe fn read_exact<T: Copy>(op: &'static str, mib: &[c_int]) -> Result<T> {
    let (value, len) = unsafe { read::<T>(op, mib)? };
    if len != size_of::<T>() {
        return Err(Error::MalformedRecord {
            op,
            expected: size_of::<T>(),
            actual: len,
        });
    }
    Ok(value)
}
