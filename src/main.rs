/// Entry point of the `vmstats` tool.
///
/// Prints one JSON line per configured process, virtual machine and network interface.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug VMSTATS_PIDS=1 VMSTATS_VM_DEVICES=guest0 vmstats
/// ```
fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    vmstats::run()
}
