//! End-to-end reads against the running kernel.

use vmstats::{ErrorKind, net, process, vmm};

#[test]
#[cfg(target_os = "linux")]
fn test_loopback_by_name() {
    let stats = net::stats_by_name("lo").unwrap();
    assert_eq!(stats.name, "lo");
    assert!(stats.mtu > 0);
    assert_eq!(stats.input_errors, 0);
    assert_eq!(stats.output_errors, 0);
    assert_eq!(stats.collisions, 0);
}

#[test]
#[cfg(target_os = "linux")]
fn test_unknown_interface() {
    let err = net::stats_by_name("vmstats-nx0").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Os);
    assert!(err.raw_os_error().is_some());
}

#[test]
#[cfg(target_os = "linux")]
fn test_freebsd_only_readers_are_unsupported() {
    assert_eq!(process::query(1).unwrap_err().kind(), ErrorKind::Unsupported);
    assert_eq!(
        vmm::VmHandle::open("guest0").unwrap_err().kind(),
        ErrorKind::Unsupported
    );
    assert_eq!(
        net::interface_count().unwrap_err().kind(),
        ErrorKind::Unsupported
    );
}

#[test]
#[cfg(target_os = "freebsd")]
fn test_init_accounting() {
    let (accounting, usage) = process::query(1).unwrap();
    assert!(accounting.virtual_size > 0);
    assert!(accounting.start.sec > 0);
    assert!(i64::from(usage.user_time.usec) <= process::MAX_USEC);
}

#[test]
#[cfg(target_os = "freebsd")]
fn test_loopback_by_index() {
    let count = net::interface_count().unwrap();
    let lo = (1..=count)
        .filter_map(|index| net::stats_by_index(index).ok())
        .find(|stats| stats.name == "lo0")
        .unwrap();
    assert!(lo.mtu > 0);
}

#[test]
#[cfg(target_os = "freebsd")]
fn test_missing_vm() {
    let err = vmm::with_vm("vmstats-no-such-vm", |vm| vm.counters()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Os);
}

#[test]
fn test_nul_vm_name_is_not_found() {
    let err = vmm::VmHandle::open("a\0b").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
