//! Facts about the host that cannot change while the process runs.
//!
//! Resolved once at startup and passed by value to every collector; they
//! are never re-read during a poll.

use tracing::debug;

use crate::config::HostConfig;
use crate::error::HostError;
use crate::source::traits::CommandRunner;

const PAGESIZE: &str = "/usr/bin/pagesize";
const ZONENAME: &str = "/usr/bin/zonename";

/// Page size and the name of the zone this process runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    page_size: u64,
    zone_name: String,
}

impl HostContext {
    pub fn new(page_size: u64, zone_name: impl Into<String>) -> Result<Self, HostError> {
        let zone_name = zone_name.into();
        if page_size == 0 {
            return Err(HostError::PageSize(page_size.to_string()));
        }
        if zone_name.trim().is_empty() {
            return Err(HostError::ZoneName);
        }
        Ok(Self {
            page_size,
            zone_name,
        })
    }

    /// Takes overrides from the configuration and asks the system for the
    /// rest with `pagesize(1)` and `zonename(1)`.
    pub fn resolve(runner: &dyn CommandRunner, overrides: &HostConfig) -> Result<Self, HostError> {
        let page_size = match overrides.page_size {
            Some(size) => size,
            None => {
                let out = runner.run(PAGESIZE, &[])?;
                out.trim()
                    .parse()
                    .map_err(|_| HostError::PageSize(out.trim().to_string()))?
            }
        };
        let zone_name = match &overrides.zone_name {
            Some(name) => name.clone(),
            None => runner.run(ZONENAME, &[])?.trim().to_string(),
        };

        let host = Self::new(page_size, zone_name)?;
        debug!(page_size = host.page_size, zone = %host.zone_name, "host facts resolved");
        Ok(host)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn zone_name(&self) -> &str {
        &self.zone_name
    }
}
