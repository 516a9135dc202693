/// Normalized per-interface counters.
///
/// Both backends fill the same shape. Fields a platform does not expose are `0`:
/// the rtnetlink path has no send-queue metrics, baud rate or output multicast count.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct InterfaceStats {
    /// Interface name, e.g. `lo0` or `eth0`.
    pub name: String,
    /// Interface flags (`IFF_*`).
    pub flags: u32,
    /// Current send-queue length.
    pub send_length: u32,
    /// Maximum send-queue length.
    pub max_send_length: u32,
    /// Packets dropped because the send queue was full.
    pub send_drops: u32,
    pub mtu: u32,
    /// Link speed in bits per second.
    pub baudrate: u64,
    pub input_packets: u64,
    pub output_packets: u64,
    pub input_errors: u64,
    pub output_errors: u64,
    pub collisions: u64,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub input_mcast: u64,
    pub output_mcast: u64,
    pub input_dropped: u64,
    pub output_dropped: u64,
}

/// Decodes a kernel interface name stored NUL-terminated (or NUL-padded) in `bytes`.
///
/// Everything from the first NUL on is ignored; invalid UTF-8 is replaced.
pub(crate) fn decode_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
