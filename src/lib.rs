//! vmstats: one-shot kernel statistics for bhyve hosts.
//!
//! The library wraps three kernel interfaces behind typed, validated records:
//!
//! - [`process`]: per-process size, runtime and resource usage accounting (FreeBSD `sysctl`).
//! - [`vmm`]: named hypervisor counters of a bhyve virtual machine (FreeBSD `vmmapi`).
//! - [`net`]: per-interface traffic counters, from the FreeBSD interface MIB or from Linux
//!   rtnetlink.
//!
//! Every reader returns a [`Result`] whose error carries the name of the failing call; nothing
//! is retried or cached. [`run`] is the driver behind the `vmstats` binary.

use std::io::{self, Write};

use config::{Config, InterfaceTarget};
use error::ResultOkLogExt;
use report::Record;

pub mod config;
pub mod error;
pub mod net;
pub mod process;
mod report;
#[cfg(target_os = "freebsd")]
mod sysctl;
pub mod vmm;

pub use error::{Error, ErrorKind, Result};

/// Collects one snapshot of every configured target and writes it to stdout as JSON lines.
///
/// Targets are read from the environment (see [`config`]). A target that cannot be read is
/// logged and skipped.
///
/// # Errors
///
/// Fails on invalid configuration or when stdout cannot be written.
pub fn run() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for &pid in &config.pids {
        match process::query(pid) {
            Ok((accounting, usage)) => report::write_record(
                &mut out,
                &Record::Process {
                    pid,
                    accounting: &accounting,
                    usage: &usage,
                },
            )?,
            Err(err) => log::error!("pid {pid}: {err}"),
        }
    }

    for device in &config.vm_devices {
        match vmm::with_vm(device, |vm| vm.counters()) {
            Ok(counters) => report::write_record(
                &mut out,
                &Record::Vm {
                    device,
                    counters: &counters,
                },
            )?,
            Err(err) => log::error!("vm `{device}`: {err}"),
        }
    }

    let interfaces = match config.interfaces {
        Some(targets) => targets,
        None => all_interfaces(),
    };
    for target in &interfaces {
        let stats = match target {
            InterfaceTarget::Index(index) => net::stats_by_index(*index),
            InterfaceTarget::Name(name) => net::stats_by_name(name),
        };
        match stats {
            Ok(stats) => report::write_record(&mut out, &Record::Interface { stats: &stats })?,
            Err(err) => log::error!("interface {target:?}: {err}"),
        }
    }

    out.flush()?;
    Ok(())
}

/// Every row of the MIB interface table, or nothing where the table cannot be enumerated.
fn all_interfaces() -> Vec<InterfaceTarget> {
    if cfg!(not(target_os = "freebsd")) {
        log::debug!(
            "`{}` unset and interface enumeration unavailable, skipping interfaces",
            config::INTERFACES_VAR
        );
        return Vec::new();
    }
    net::interface_count()
        .ok_log()
        .map(|count| (1..=count).map(InterfaceTarget::Index).collect())
        .unwrap_or_default()
}
