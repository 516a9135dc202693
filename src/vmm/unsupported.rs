use std::ffi::CStr;

use crate::{Error, Result};

/// Uninhabited: no hypervisor statistics channel exists on this platform.
#[derive(Debug)]
pub(super) enum Context {}

impl Context {
    pub(super) fn open(_name: &CStr) -> Result<Self> {
        Err(Error::Unsupported { op: "vm_open" })
    }

    pub(super) fn counter_names(&self) -> Result<Vec<String>> {
        match *self {}
    }

    pub(super) fn counter_values(&self) -> Result<Vec<u64>> {
        match *self {}
    }
}
