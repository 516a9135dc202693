//! JSON-lines output of collected snapshots.

use std::io::{self, Write};

use crate::net::InterfaceStats;
use crate::process::{ProcessAccounting, ResourceUsage};
use crate::vmm::VmCounters;

/// One output line.
#[derive(Debug, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum Record<'a> {
    Process {
        pid: i32,
        accounting: &'a ProcessAccounting,
        usage: &'a ResourceUsage,
    },
    Vm {
        device: &'a str,
        counters: &'a VmCounters,
    },
    Interface {
        #[serde(flatten)]
        stats: &'a InterfaceStats,
    },
}

pub(crate) fn write_record<W: Write>(out: &mut W, record: &Record<'_>) -> io::Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Timeval;

    fn line(record: &Record<'_>) -> serde_json::Value {
        let mut buf = Vec::new();
        write_record(&mut buf, record).unwrap();
        assert_eq!(buf.last(), Some(&b'\n'));
        assert_eq!(buf.iter().filter(|&&b| b == b'\n').count(), 1);
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn test_process_record() {
        let accounting = ProcessAccounting {
            virtual_size: 4096,
            start: Timeval {
                sec: 10,
                usec: 20,
            },
            ..Default::default()
        };
        let usage = ResourceUsage {
            max_rss: 12,
            ..Default::default()
        };
        let value = line(&Record::Process {
            pid: 7,
            accounting: &accounting,
            usage: &usage,
        });

        assert_eq!(value["kind"], "process");
        assert_eq!(value["pid"], 7);
        assert_eq!(value["accounting"]["virtual_size"], 4096);
        assert_eq!(value["accounting"]["start"]["usec"], 20);
        assert_eq!(value["usage"]["max_rss"], 12);
    }

    #[test]
    fn test_vm_record() {
        let counters = VmCounters::new(vec!["exits".to_owned()], vec![3]).unwrap();
        let value = line(&Record::Vm {
            device: "guest0",
            counters: &counters,
        });

        assert_eq!(value["kind"], "vm");
        assert_eq!(value["device"], "guest0");
        assert_eq!(value["counters"]["names"][0], "exits");
        assert_eq!(value["counters"]["values"][0], 3);
    }

    #[test]
    fn test_interface_record_is_flat() {
        let stats = InterfaceStats {
            name: "lo".to_owned(),
            mtu: 65536,
            ..Default::default()
        };
        let value = line(&Record::Interface { stats: &stats });

        assert_eq!(value["kind"], "interface");
        assert_eq!(value["name"], "lo");
        assert_eq!(value["mtu"], 65536);
        assert!(value.get("stats").is_none());
    }
}
