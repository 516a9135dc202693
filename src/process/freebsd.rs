use std::mem::size_of;

use super::record::{OP, RawKinfoProc, RawRusage, RawTimeval};
use super::{ProcessAccounting, ResourceUsage};
use crate::{Error, Result, sysctl};

impl From<&libc::timeval> for RawTimeval {
    fn from(tv: &libc::timeval) -> Self {
        Self {
            sec: tv.tv_sec as i64,
            usec: tv.tv_usec as i64,
        }
    }
}

impl From<&libc::rusage> for RawRusage {
    fn from(ru: &libc::rusage) -> Self {
        Self {
            utime: RawTimeval::from(&ru.ru_utime),
            stime: RawTimeval::from(&ru.ru_stime),
            maxrss: ru.ru_maxrss as i64,
            ixrss: ru.ru_ixrss as i64,
            idrss: ru.ru_idrss as i64,
            isrss: ru.ru_isrss as i64,
            minflt: ru.ru_minflt as i64,
            majflt: ru.ru_majflt as i64,
            nswap: ru.ru_nswap as i64,
            inblock: ru.ru_inblock as i64,
            oublock: ru.ru_oublock as i64,
            msgsnd: ru.ru_msgsnd as i64,
            msgrcv: ru.ru_msgrcv as i64,
            nsignals: ru.ru_nsignals as i64,
            nvcsw: ru.ru_nvcsw as i64,
            nivcsw: ru.ru_nivcsw as i64,
        }
    }
}

impl From<&libc::kinfo_proc> for RawKinfoProc {
    fn from(kp: &libc::kinfo_proc) -> Self {
        Self {
            size: kp.ki_size as u64,
            rssize: kp.ki_rssize as i64,
            tsize: kp.ki_tsize as i64,
            dsize: kp.ki_dsize as i64,
            ssize: kp.ki_ssize as i64,
            runtime: kp.ki_runtime,
            cow: kp.ki_cow as u32,
            start: RawTimeval::from(&kp.ki_start),
            rusage: RawRusage::from(&kp.ki_rusage),
        }
    }
}

pub(super) fn query(pid: i32) -> Result<(ProcessAccounting, ResourceUsage)> {
    let mib = [libc::CTL_KERN, libc::KERN_PROC, libc::KERN_PROC_PID, pid];
    // SAFETY: kinfo_proc is a C struct of integers, arrays and nested C structs.
    let (kp, len) = unsafe { sysctl::read::<libc::kinfo_proc>(OP, &mib)? };

    // A vanished process can yield an empty answer instead of ESRCH.
    if len == 0 {
        return Err(Error::from_errno(OP, libc::ESRCH));
    }
    if len != size_of::<libc::kinfo_proc>() {
        return Err(Error::MalformedRecord {
            op: OP,
            expected: size_of::<libc::kinfo_proc>(),
            actual: len,
        });
    }

    log::trace!("{OP}: decoded record of pid {pid}");
    RawKinfoProc::from(&kp).decode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_process() {
        let (accounting, usage) = query(1).unwrap();
        assert!(accounting.virtual_size > 0);
        assert!(accounting.start.sec > 0);
        assert!(i64::from(usage.user_time.usec) <= super::super::MAX_USEC);
    }

    #[test]
    fn test_own_process() {
        let pid = std::process::id() as i32;
        let (accounting, _) = query(pid).unwrap();
        assert!(accounting.resident_size > 0);
    }

    #[test]
    fn test_missing_process() {
        let err = query(i32::MAX).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Os);
    }
}
