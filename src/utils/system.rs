// src/utils/system.rs: System functions

use anyhow::{anyhow, Result};
use log::{debug, warn};
use sysinfo::{MemoryRefreshKind, RefreshKind, System};

const BYTES_PER_GIB: u64 = 1_073_741_824;


/// Determines number of cores handed to the workflow engine
///
/// # Arguments
///
/// * `requested` - `--cores`, if given.
///
/// # Returns
///
/// requested cores, else physical cores (at least 1)
pub fn detect_cores(requested: Option<usize>) -> usize {
    match requested {
        Some(cores) => cores.max(1),
        None => {
            let physical_cores = System::physical_core_count().unwrap_or(1);
            debug!("Detected {} physical cores", physical_cores);
            physical_cores.max(1)
        }
    }
}


/// Finds the amount of total and available RAM, keyed to OS
///
/// # Returns
///
/// Result<u64, u64> total ram, available ram
pub fn detect_ram() -> Result<(u64, u64)> {
    let (total_ram, available_ram) = if cfg!(target_os = "macos") {
        let refresh_kind = RefreshKind::nothing().with_memory(MemoryRefreshKind::everything());
        let mut system = System::new_with_specifics(refresh_kind);
        system.refresh_memory_specifics(MemoryRefreshKind::everything());
        let total = system.total_memory();
        let used = system.used_memory();
        (total, total.saturating_sub(used))
    } else {
        let mut system = System::new();
        system.refresh_memory();
        (system.total_memory(), system.available_memory())
    };

    if total_ram == 0 || available_ram == 0 {
        return Err(anyhow!("Failed to detect valid RAM values"));
    }

    Ok((total_ram, available_ram))
}


/// Warns when the `--memory` budget is more than the host has. Whether the
/// budget suffices is left to the workflow engine.
pub fn check_memory_budget(memory_gb: u32) {
    match detect_ram() {
        Ok((total_ram, available_ram)) => {
            debug!(
                "Total RAM ~{} GiB, available ~{} GiB",
                total_ram / BYTES_PER_GIB,
                available_ram / BYTES_PER_GIB
            );
            if u64::from(memory_gb) * BYTES_PER_GIB > total_ram {
                warn!(
                    "Memory budget of {} GB exceeds total RAM (~{} GiB)",
                    memory_gb,
                    total_ram / BYTES_PER_GIB
                );
            }
        }
        Err(e) => warn!("Could not check memory budget: {}", e),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_cores_honours_request() {
        assert_eq!(detect_cores(Some(20)), 20);
        assert_eq!(detect_cores(Some(0)), 1);
        assert!(detect_cores(None) >= 1);
    }
}
