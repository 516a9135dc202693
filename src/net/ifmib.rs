//! FreeBSD interface MIB (`net.link.generic`), see `ifmib(4)`.

use libc::c_int;

use super::{InterfaceStats, decode_name};
use crate::{Result, sysctl};

const NETLINK_GENERIC: c_int = 0;
const IFMIB_SYSTEM: c_int = 1;
const IFMIB_IFDATA: c_int = 2;
const IFMIB_IFCOUNT: c_int = 1;
const IFDATA_GENERAL: c_int = 1;

const IFNAMSIZ: usize = 16;

/// `struct if_data` from `<net/if.h>` (FreeBSD 11 and later).
#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
struct IfData {
    ifi_type: u8,
    ifi_physical: u8,
    ifi_addrlen: u8,
    ifi_hdrlen: u8,
    ifi_link_state: u8,
    ifi_vhid: u8,
    ifi_datalen: u16,
    ifi_mtu: u32,
    ifi_metric: u32,
    ifi_baudrate: u64,
    ifi_ipackets: u64,
    ifi_ierrors: u64,
    ifi_opackets: u64,
    ifi_oerrors: u64,
    ifi_collisions: u64,
    ifi_ibytes: u64,
    ifi_obytes: u64,
    ifi_imcasts: u64,
    ifi_omcasts: u64,
    ifi_iqdrops: u64,
    ifi_oqdrops: u64,
    ifi_noproto: u64,
    ifi_hwassist: u64,
    ifi_epoch: u64,
    ifi_lastchange: [u64; 2],
}

/// `struct ifmibdata` from `<net/if_mib.h>`.
#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
struct IfMibData {
    ifmd_name: [u8; IFNAMSIZ],
    ifmd_pcount: c_int,
    ifmd_flags: c_int,
    ifmd_snd_len: c_int,
    ifmd_snd_maxlen: c_int,
    ifmd_snd_drops: c_int,
    ifmd_filler: [c_int; 4],
    ifmd_data: IfData,
}

impl From<&IfMibData> for InterfaceStats {
    fn from(mib: &IfMibData) -> Self {
        let data = &mib.ifmd_data;
        InterfaceStats {
            name: decode_name(&mib.ifmd_name),
            flags: mib.ifmd_flags as u32,
            send_length: mib.ifmd_snd_len as u32,
            max_send_length: mib.ifmd_snd_maxlen as u32,
            send_drops: mib.ifmd_snd_drops as u32,
            mtu: data.ifi_mtu,
            baudrate: data.ifi_baudrate,
            input_packets: data.ifi_ipackets,
            output_packets: data.ifi_opackets,
            input_errors: data.ifi_ierrors,
            output_errors: data.ifi_oerrors,
            collisions: data.ifi_collisions,
            input_bytes: data.ifi_ibytes,
            output_bytes: data.ifi_obytes,
            input_mcast: data.ifi_imcasts,
            output_mcast: data.ifi_omcasts,
            input_dropped: data.ifi_iqdrops,
            output_dropped: data.ifi_oqdrops,
        }
    }
}

pub(super) fn interface_count() -> Result<u32> {
    let mib = [
        libc::CTL_NET,
        libc::AF_LINK,
        NETLINK_GENERIC,
        IFMIB_SYSTEM,
        IFMIB_IFCOUNT,
    ];
    // SAFETY: c_int is plain old data.
    let count = unsafe { sysctl::read_exact::<c_int>("sysctl", &mib)? };
    log::debug!("interface table holds {count} entries");
    Ok(count.max(0) as u32)
}

pub(super) fn stats_by_index(index: u32) -> Result<InterfaceStats> {
    let mib = [
        libc::CTL_NET,
        libc::AF_LINK,
        NETLINK_GENERIC,
        IFMIB_IFDATA,
        index as c_int,
        IFDATA_GENERAL,
    ];
    // SAFETY: IfMibData consists of integers and integer arrays only.
    let data = unsafe { sysctl::read_exact::<IfMibData>("sysctl", &mib)? };
    Ok(InterfaceStats::from(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_record_layout() {
        assert_eq!(offset_of!(IfData, ifi_mtu), 8);
        assert_eq!(offset_of!(IfData, ifi_baudrate), 16);
        assert_eq!(size_of::<IfData>(), 152);
        assert_eq!(offset_of!(IfMibData, ifmd_data), 52 + 4);
        assert_eq!(size_of::<IfMibData>(), 208);
    }

    #[test]
    fn test_decode_record() {
        // SAFETY: all-zero is a valid IfMibData.
        let mut mib: IfMibData = unsafe { std::mem::zeroed() };
        mib.ifmd_name[..3].copy_from_slice(b"em0");
        mib.ifmd_flags = 0x8843;
        mib.ifmd_snd_len = 3;
        mib.ifmd_snd_maxlen = 1024;
        mib.ifmd_snd_drops = 7;
        mib.ifmd_data.ifi_mtu = 1500;
        mib.ifmd_data.ifi_baudrate = 1_000_000_000;
        mib.ifmd_data.ifi_ipackets = 11;
        mib.ifmd_data.ifi_opackets = 12;
        mib.ifmd_data.ifi_omcasts = 13;
        mib.ifmd_data.ifi_oqdrops = 14;

        let stats = InterfaceStats::from(&mib);
        assert_eq!(stats.name, "em0");
        assert_eq!(stats.flags, 0x8843);
        assert_eq!(stats.send_length, 3);
        assert_eq!(stats.max_send_length, 1024);
        assert_eq!(stats.send_drops, 7);
        assert_eq!(stats.mtu, 1500);
        assert_eq!(stats.baudrate, 1_000_000_000);
        assert_eq!(stats.input_packets, 11);
        assert_eq!(stats.output_packets, 12);
        assert_eq!(stats.output_mcast, 13);
        assert_eq!(stats.output_dropped, 14);
    }

    #[test]
    fn test_loopback_is_listed() {
        let count = interface_count().unwrap();
        assert!(count > 0);
        let names: Vec<_> = (1..=count)
            .filter_map(|index| stats_by_index(index).ok())
            .map(|stats| stats.name)
            .collect();
        assert!(names.iter().any(|name| name == "lo0"), "{names:?}");
    }
}
