#![cfg_attr(not(target_os = "freebsd"), allow(dead_code))]

use std::time::Duration;

use crate::{Error, Result};

/// Largest sub-second value a decoded [`Timeval`] may carry.
pub const MAX_USEC: i64 = 999_999_999;

pub(crate) const OP: &str = "sysctl ctl_kern.kern_proc.kern_proc_pid";

/// A point in time or a duration, as seconds plus microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct Timeval {
    pub sec: i64,
    /// Always within `0..=MAX_USEC`.
    pub usec: u32,
}

impl Timeval {
    /// Returns `None` for negative seconds.
    pub fn as_duration(&self) -> Option<Duration> {
        let sec = u64::try_from(self.sec).ok()?;
        Some(Duration::from_secs(sec) + Duration::from_micros(u64::from(self.usec)))
    }
}

/// Memory, CPU and size accounting of one process (`struct kinfo_proc`).
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct ProcessAccounting {
    /// Virtual size in bytes.
    pub virtual_size: u64,
    /// Resident set size in pages.
    pub resident_size: u64,
    /// Text size in pages.
    pub text_size: u64,
    /// Data size in pages.
    pub data_size: u64,
    /// Stack size in pages.
    pub stack_size: u64,
    /// Real time spent running, in microseconds.
    pub runtime: u64,
    /// Copy-on-write faults.
    pub cow_faults: u64,
    /// Process start time.
    pub start: Timeval,
}

/// Resource usage of one process (`struct rusage`).
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct ResourceUsage {
    pub user_time: Timeval,
    pub system_time: Timeval,
    /// Maximum resident set size in KiB.
    pub max_rss: u64,
    pub shared_memory: u64,
    pub unshared_data: u64,
    pub unshared_stack: u64,
    pub minor_faults: u64,
    pub major_faults: u64,
    pub swaps: u64,
    pub block_inputs: u64,
    pub block_outputs: u64,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub signals: u64,
    pub voluntary_switches: u64,
    pub involuntary_switches: u64,
}

/// `struct timeval` widened to 64-bit fields.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RawTimeval {
    pub sec: i64,
    pub usec: i64,
}

/// `struct rusage` widened to 64-bit fields.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RawRusage {
    pub utime: RawTimeval,
    pub stime: RawTimeval,
    pub maxrss: i64,
    pub ixrss: i64,
    pub idrss: i64,
    pub isrss: i64,
    pub minflt: i64,
    pub majflt: i64,
    pub nswap: i64,
    pub inblock: i64,
    pub oublock: i64,
    pub msgsnd: i64,
    pub msgrcv: i64,
    pub nsignals: i64,
    pub nvcsw: i64,
    pub nivcsw: i64,
}

/// The `struct kinfo_proc` fields this crate reports, widened to 64-bit.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RawKinfoProc {
    pub size: u64,
    pub rssize: i64,
    pub tsize: i64,
    pub dsize: i64,
    pub ssize: i64,
    pub runtime: u64,
    pub cow: u32,
    pub start: RawTimeval,
    pub rusage: RawRusage,
}

fn timeval(field: &'static str, raw: RawTimeval) -> Result<Timeval> {
    if !(0..=MAX_USEC).contains(&raw.usec) {
        return Err(Error::InvalidTimestamp {
            op: OP,
            field,
            usec: raw.usec,
        });
    }
    Ok(Timeval {
        sec: raw.sec,
        usec: raw.usec as u32,
    })
}

fn count(field: &'static str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| Error::NegativeValue {
        op: OP,
        field,
        value,
    })
}

impl RawKinfoProc {
    /// Validates the record and splits it into the two public snapshots.
    pub(crate) fn decode(&self) -> Result<(ProcessAccounting, ResourceUsage)> {
        let accounting = ProcessAccounting {
            virtual_size: self.size,
            resident_size: count("ki_rssize", self.rssize)?,
            text_size: count("ki_tsize", self.tsize)?,
            data_size: count("ki_dsize", self.dsize)?,
            stack_size: count("ki_ssize", self.ssize)?,
            runtime: self.runtime,
            cow_faults: u64::from(self.cow),
            start: timeval("ki_start", self.start)?,
        };

        let ru = &self.rusage;
        let usage = ResourceUsage {
            user_time: timeval("ru_utime", ru.utime)?,
            system_time: timeval("ru_stime", ru.stime)?,
            max_rss: count("ru_maxrss", ru.maxrss)?,
            shared_memory: count("ru_ixrss", ru.ixrss)?,
            unshared_data: count("ru_idrss", ru.idrss)?,
            unshared_stack: count("ru_isrss", ru.isrss)?,
            minor_faults: count("ru_minflt", ru.minflt)?,
            major_faults: count("ru_majflt", ru.majflt)?,
            swaps: count("ru_nswap", ru.nswap)?,
            block_inputs: count("ru_inblock", ru.inblock)?,
            block_outputs: count("ru_oublock", ru.oublock)?,
            messages_sent: count("ru_msgsnd", ru.msgsnd)?,
            messages_received: count("ru_msgrcv", ru.msgrcv)?,
            signals: count("ru_nsignals", ru.nsignals)?,
            voluntary_switches: count("ru_nvcsw", ru.nvcsw)?,
            involuntary_switches: count("ru_nivcsw", ru.nivcsw)?,
        };

        Ok((accounting, usage))
    }
}
