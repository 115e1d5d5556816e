//! Configuration file.
//!
//! A TOML file with one optional section per collector; a section that is
//! present enables its collector. Allow-lists default to empty, which
//! allows everything.
//!
//! ```toml
//! [host]
//! zone_name = "global"
//!
//! [disk_health]
//! devices = ["sd6"]
//! fields = ["Hard Errors", "Soft Errors", "Transport Errors", "Illegal Request"]
//! tags = ["Vendor", "Serial No", "Product", "Revision"]
//!
//! [zpool]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::select::AllowList;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Host facts to use instead of asking the system.
    #[serde(default)]
    pub host: HostConfig,

    pub cpu: Option<CpuConfig>,
    pub memory: Option<MemoryConfig>,
    pub disk_health: Option<DiskHealthConfig>,
    pub io: Option<IoConfig>,
    pub network: Option<NetworkConfig>,
    pub nfs_client: Option<NfsConfig>,
    pub nfs_server: Option<NfsConfig>,
    pub zpool: Option<ZpoolConfig>,
    pub fma: Option<FmaConfig>,
    pub smf: Option<SmfConfig>,
    pub zones: Option<ZonesConfig>,
    pub zone_caps: Option<ZoneCapsConfig>,
}

/// Overrides for facts otherwise resolved once at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    pub page_size: Option<u64>,
    pub zone_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CpuConfig {
    /// Statistics of `cpu:N:sys`, e.g. `cpu_nsec_kernel`.
    pub fields: AllowList,
    /// Emit `cpu.info` clock speed metrics.
    pub cpu_info_stats: bool,
    /// Emit `cpu.zone` per-zone CPU time metrics.
    pub zone_cpu_stats: bool,
    /// Sum all CPUs into one metric.
    pub aggregate: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryConfig {
    /// Any of `kernel`, `arcsize`, `freelist`.
    pub fields: AllowList,
    /// Statistics of `unix:0:vminfo`. Empty disables `memory.vminfo`.
    pub vminfo_fields: AllowList,
    /// Statistics of `cpu:N:vm`.
    pub cpu_vm_fields: AllowList,
    /// Report `cpu_vm_fields` per CPU instead of summed.
    pub per_cpu_vm: bool,
    /// Any of `allocated`, `reserved`, `used`, `available`. Empty disables
    /// `memory.swap`.
    pub swap_fields: AllowList,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiskHealthConfig {
    pub devices: AllowList,
    pub fields: AllowList,
    pub tags: AllowList,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IoConfig {
    /// Kstat modules, e.g. `sd` or `zfs`.
    pub modules: AllowList,
    pub devices: AllowList,
    pub fields: AllowList,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    pub fields: AllowList,
    pub vnics: AllowList,
    pub zones: AllowList,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NfsConfig {
    /// `v2`, `v3`, `v4`.
    pub nfs_versions: AllowList,
    pub fields: AllowList,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZpoolConfig {
    pub fields: AllowList,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FmaConfig {
    pub fmstat: bool,
    pub fmstat_modules: AllowList,
    pub fmstat_fields: AllowList,
    pub fmadm: bool,
}

impl Default for FmaConfig {
    fn default() -> Self {
        Self {
            fmstat: true,
            fmstat_modules: AllowList::all(),
            fmstat_fields: AllowList::all(),
            fmadm: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmfConfig {
    pub svc_states: AllowList,
    pub zones: AllowList,
    /// Emit one `errors` metric per service not online.
    pub generate_details: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZonesConfig {
    /// States to count. Listed states are reported even when zero.
    pub zone_states: Vec<String>,
    /// Brands to count. Listed brands are reported even when zero.
    pub zone_brands: Vec<String>,
    /// Emit a per-zone up/down metric.
    pub zone_properties: bool,
    /// Emit the number of zones.
    pub zone_count: bool,
}

impl Default for ZonesConfig {
    fn default() -> Self {
        Self {
            zone_states: Vec::new(),
            zone_brands: Vec::new(),
            zone_properties: false,
            zone_count: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoneCapsConfig {
    /// Cap names: `cpucaps`, `swapresv`, `lockedmem`, `nprocs`, ...
    pub names: AllowList,
    pub cpucaps_fields: AllowList,
    pub memory_cap_fields: AllowList,
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks what the types alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.page_size == Some(0) {
            return Err(ConfigError::Invalid("host.page_size must be positive".into()));
        }
        if let Some(zone) = &self.host.zone_name
            && zone.trim().is_empty()
        {
            return Err(ConfigError::Invalid("host.zone_name must not be empty".into()));
        }
        if let Some(disk) = &self.disk_health
            && let Some(name) = disk.fields.iter().find(|f| disk.tags.names(f))
        {
            return Err(ConfigError::Invalid(format!(
                "disk_health: '{name}' is listed both as a field and as a tag"
            )));
        }
        if self.enabled().is_empty() {
            return Err(ConfigError::Invalid("no collector is configured".into()));
        }
        Ok(())
    }

    /// Names of the configured collectors, in a fixed order.
    pub fn enabled(&self) -> Vec<&'static str> {
        [
            ("cpu", self.cpu.is_some()),
            ("memory", self.memory.is_some()),
            ("disk_health", self.disk_health.is_some()),
            ("io", self.io.is_some()),
            ("network", self.network.is_some()),
            ("nfs_client", self.nfs_client.is_some()),
            ("nfs_server", self.nfs_server.is_some()),
            ("zpool", self.zpool.is_some()),
            ("fma", self.fma.is_some()),
            ("smf", self.smf.is_some()),
            ("zones", self.zones.is_some()),
            ("zone_caps", self.zone_caps.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }
}
