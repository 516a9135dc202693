use std::ffi::{CStr, c_char, c_int};

use crate::{Error, Result};

/// Hypervisor counters as two index-aligned sequences, in kernel order.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct VmCounters {
    names: Vec<String>,
    values: Vec<u64>,
}

impl VmCounters {
    /// Pairs `names` with `values`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CounterMismatch`] if the two sequences differ in length, which happens
    /// when the counter set changed between the two reads.
    pub fn new(names: Vec<String>, values: Vec<u64>) -> Result<Self> {
        if names.len() != values.len() {
            return Err(Error::CounterMismatch {
                names: names.len(),
                values: values.len(),
            });
        }
        Ok(Self { names, values })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates `(name, value)` pairs in kernel order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Value of the first counter called `name`.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

/// Copies the buffer returned by `vm_get_stats`.
///
/// NULL means the `VM_STATS` ioctl failed and `errno` is set. A VM without counters answers
/// with a non-NULL buffer and `entries == 0`.
///
/// # Safety
///
/// A non-NULL `buf` must point to at least `entries` readable values.
#[cfg_attr(not(target_os = "freebsd"), allow(dead_code))]
pub(super) unsafe fn copy_values(buf: *const u64, entries: c_int) -> Result<Vec<u64>> {
    if buf.is_null() {
        return Err(Error::last_os_error("vm_get_stats"));
    }
    if entries <= 0 {
        return Ok(Vec::new());
    }
    Ok(unsafe { std::slice::from_raw_parts(buf, entries as usize) }.to_vec())
}

/// Copies the string returned by `vm_get_stat_desc`, where NULL means the ioctl failed.
///
/// # Safety
///
/// A non-NULL `desc` must point to a NUL-terminated string.
#[cfg_attr(not(target_os = "freebsd"), allow(dead_code))]
pub(super) unsafe fn copy_description(desc: *const c_char) -> Result<String> {
    if desc.is_null() {
        return Err(Error::last_os_error("vm_get_stat_desc"));
    }
    Ok(unsafe { CStr::from_ptr(desc) }.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters() -> VmCounters {
        VmCounters::new(
            vec![
                "vm exits due to external interrupt".to_owned(),
                "number of times hlt was intercepted".to_owned(),
            ],
            vec![42, 7],
        )
        .unwrap()
    }

    #[test]
    fn test_pairs_in_order() {
        let counters = counters();
        assert_eq!(counters.len(), 2);
        let pairs: Vec<_> = counters.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("vm exits due to external interrupt", 42),
                ("number of times hlt was intercepted", 7),
            ]
        );
        assert_eq!(counters.get("number of times hlt was intercepted"), Some(7));
        assert_eq!(counters.get("missing"), None);
    }

    #[test]
    fn test_length_mismatch() {
        let err = VmCounters::new(vec!["a".to_owned()], vec![]).unwrap_err();
        assert!(matches!(
            err,
            Error::CounterMismatch {
                names: 1,
                values: 0
            }
        ));
    }

    #[test]
    fn test_empty() {
        let counters = VmCounters::new(Vec::new(), Vec::new()).unwrap();
        assert!(counters.is_empty());
        assert_eq!(counters.iter().count(), 0);
    }

    #[test]
    fn test_copy_values() {
        let buf = [5u64, 6, 7];
        let values = unsafe { copy_values(buf.as_ptr(), 3) }.unwrap();
        assert_eq!(values, vec![5, 6, 7]);
    }

    #[test]
    fn test_zero_counters_are_empty() {
        let buf = [0u64; 1];
        assert!(unsafe { copy_values(buf.as_ptr(), 0) }.unwrap().is_empty());
        assert!(unsafe { copy_values(buf.as_ptr(), -1) }.unwrap().is_empty());

        let counters = VmCounters::new(Vec::new(), Vec::new()).unwrap();
        assert!(counters.names().is_empty());
        assert!(counters.values().is_empty());
    }

    #[test]
    fn test_null_values_are_os_error() {
        let err = unsafe { copy_values(std::ptr::null(), 4) }.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Os);
        assert_eq!(err.op(), Some("vm_get_stats"));
    }

    #[test]
    fn test_copy_description() {
        let desc = c"number of times hlt was intercepted";
        let name = unsafe { copy_description(desc.as_ptr()) }.unwrap();
        assert_eq!(name, "number of times hlt was intercepted");

        let err = unsafe { copy_description(std::ptr::null()) }.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Os);
        assert_eq!(err.op(), Some("vm_get_stat_desc"));
    }
}
