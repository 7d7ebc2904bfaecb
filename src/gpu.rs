//! GPU metrics collection for bottleneck-rs.
//!
//! Reads utilization, VRAM usage, and temperature from the amdgpu sysfs
//! interface under `/sys/class/drm`. The device is probed once at startup;
//! when no card exposes the busy-percent file, GPU metrics stay at their
//! zero sentinels and the UI reports the GPU as unavailable.

use std::path::{Path, PathBuf};

/// One GPU reading. Fields degrade to zero when a value cannot be read.
#[derive(Clone, Copy, Debug, Default)]
pub struct GpuSample {
    /// GPU utilization (0-100)
    pub utilization_pct: f64,
    /// VRAM usage (0-100)
    pub memory_pct: f64,
    /// VRAM in use in GB
    pub memory_used_gb: f64,
    /// Edge temperature in Celsius
    pub temperature_c: f64,
}

/// Handle to a GPU exposing busy/VRAM/temperature files under sysfs.
#[derive(Clone, Debug)]
pub struct GpuDevice {
    device: PathBuf,
}

impl GpuDevice {
    /// Probe `/sys/class/drm` for the first card with a busy-percent file.
    ///
    /// Only primary card nodes are considered (`card0`, `card1`, ...), not
    /// connector entries like `card0-DP-1`.
    pub fn probe() -> Option<Self> {
        Self::probe_in(Path::new("/sys/class/drm"))
    }

    fn probe_in(drm_root: &Path) -> Option<Self> {
        let entries = std::fs::read_dir(drm_root).ok()?;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with("card") || name.contains('-') {
                continue;
            }

            let device = entry.path().join("device");
            if device.join("gpu_busy_percent").exists() {
                return Some(Self { device });
            }
        }
        None
    }

    /// Read current GPU metrics. Any unreadable file degrades to zero for
    /// that metric only.
    pub fn read(&self) -> GpuSample {
        let utilization_pct = read_sysfs_u64(&self.device.join("gpu_busy_percent")) as f64;

        let vram_used = read_sysfs_u64(&self.device.join("mem_info_vram_used"));
        let vram_total = read_sysfs_u64(&self.device.join("mem_info_vram_total"));
        let memory_pct = if vram_total > 0 {
            vram_used as f64 / vram_total as f64 * 100.0
        } else {
            0.0
        };
        let memory_used_gb = vram_used as f64 / (1024.0 * 1024.0 * 1024.0);

        GpuSample {
            utilization_pct,
            memory_pct,
            memory_used_gb,
            temperature_c: self.read_temperature(),
        }
    }

    /// Edge temperature from the card's hwmon directory, in Celsius.
    fn read_temperature(&self) -> f64 {
        if let Ok(entries) = std::fs::read_dir(self.device.join("hwmon")) {
            for entry in entries.flatten() {
                let temp_path = entry.path().join("temp1_input");
                if let Ok(temp_str) = std::fs::read_to_string(&temp_path) {
                    if let Ok(temp_millic) = temp_str.trim().parse::<i64>() {
                        return temp_millic as f64 / 1000.0;
                    }
                }
            }
        }
        0.0
    }
}

/// Parse a sysfs file holding a single integer; 0 on any failure.
fn read_sysfs_u64(path: &Path) -> u64 {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_skips_connector_nodes_and_cards_without_busy_file() {
        let root = std::env::temp_dir().join(format!("bottleneck-rs-drm-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);

        // Connector node and a card without the busy file must be skipped.
        std::fs::create_dir_all(root.join("card0-DP-1/device")).unwrap();
        std::fs::create_dir_all(root.join("card0/device")).unwrap();
        assert!(GpuDevice::probe_in(&root).is_none());

        // A card exposing gpu_busy_percent is picked up.
        std::fs::create_dir_all(root.join("card1/device")).unwrap();
        std::fs::write(root.join("card1/device/gpu_busy_percent"), "42\n").unwrap();
        let device = GpuDevice::probe_in(&root).expect("card1 should be detected");

        std::fs::write(root.join("card1/device/mem_info_vram_used"), "2147483648\n").unwrap();
        std::fs::write(root.join("card1/device/mem_info_vram_total"), "8589934592\n").unwrap();

        let sample = device.read();
        assert_eq!(sample.utilization_pct, 42.0);
        assert_eq!(sample.memory_pct, 25.0);
        assert_eq!(sample.memory_used_gb, 2.0);
        // No hwmon directory: temperature degrades to zero.
        assert_eq!(sample.temperature_c, 0.0);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn unreadable_files_degrade_to_zero() {
        let device = GpuDevice {
            device: PathBuf::from("/nonexistent/bottleneck-rs"),
        };
        let sample = device.read();
        assert_eq!(sample.utilization_pct, 0.0);
        assert_eq!(sample.memory_pct, 0.0);
        assert_eq!(sample.memory_used_gb, 0.0);
        assert_eq!(sample.temperature_c, 0.0);
    }
}
