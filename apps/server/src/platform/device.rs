use std::fs;
use std::path::{Path, PathBuf};

use goldwallet_core::errors::{Error as CoreError, Result as CoreResult};
use goldwallet_core::power::{PowerManager, PowerState};
use goldwallet_core::sync::DeviceProbe;
use sysinfo::Disks;
use tracing::debug;

const LOW_POWER_PROFILE: &str = "low-power";

/// Reads device conditions from the host: battery and power profile from
/// sysfs, free space from the volume holding the data directory.
pub struct HostDeviceProbe {
    sysfs_root: PathBuf,
    data_dir: PathBuf,
    blockchain_file: PathBuf,
    network_metered: bool,
}

impl HostDeviceProbe {
    pub fn new(
        sysfs_root: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
        blockchain_file: impl Into<PathBuf>,
        network_metered: bool,
    ) -> Self {
        Self {
            sysfs_root: sysfs_root.into(),
            data_dir: data_dir.into(),
            blockchain_file: blockchain_file.into(),
            network_metered,
        }
    }

    fn power_supply_dir(&self) -> PathBuf {
        self.sysfs_root.join("class").join("power_supply")
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|content| content.trim().to_string())
}

/// Free bytes of the mount point that is the longest prefix of `path`.
fn volume_free_bytes<'a>(
    volumes: impl IntoIterator<Item = (&'a Path, u64)>,
    path: &Path,
) -> Option<u64> {
    volumes
        .into_iter()
        .filter(|(mount, _)| path.starts_with(mount))
        .max_by_key(|(mount, _)| mount.as_os_str().len())
        .map(|(_, available)| available)
}

impl DeviceProbe for HostDeviceProbe {
    fn battery_percent(&self) -> Option<u8> {
        let supplies = fs::read_dir(self.power_supply_dir()).ok()?;
        supplies
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|dir| read_trimmed(&dir.join("type")).as_deref() == Some("Battery"))
            .find_map(|dir| read_trimmed(&dir.join("capacity"))?.parse::<u8>().ok())
            .map(|percent| percent.min(100))
    }

    fn free_storage_bytes(&self) -> CoreResult<u64> {
        let path = fs::canonicalize(&self.data_dir).unwrap_or_else(|_| self.data_dir.clone());
        let disks = Disks::new_with_refreshed_list();
        let volumes = disks
            .list()
            .iter()
            .map(|disk| (disk.mount_point(), disk.available_space()));

        volume_free_bytes(volumes, &path).ok_or_else(|| {
            CoreError::Device(format!("no volume found for {}", path.display()))
        })
    }

    fn is_network_metered(&self) -> bool {
        self.network_metered
    }

    fn blockchain_file_bytes(&self) -> u64 {
        fs::metadata(&self.blockchain_file)
            .map(|meta| meta.len())
            .unwrap_or(0)
    }
}

impl PowerManager for HostDeviceProbe {
    fn power_state(&self) -> Option<PowerState> {
        let profile_path = self
            .sysfs_root
            .join("firmware")
            .join("acpi")
            .join("platform_profile");
        let profile = read_trimmed(&profile_path)?;
        debug!("Platform power profile: {}", profile);

        Some(PowerState {
            power_save_mode: profile == LOW_POWER_PROFILE,
            device_idle: false,
            ignoring_battery_optimizations: false,
        })
    }
}
