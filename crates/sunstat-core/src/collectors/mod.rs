//! Concrete collectors for Illumos and SmartOS hosts.
//!
//! Each collector is a thin configuration of the engine: it picks a source,
//! turns what it reads into entities and hands them to an
//! [`Assembler`](crate::assemble::Assembler)
//! together with its allow-lists, unit rules, naming and aggregation mode.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      dyn Collector                          │
//! │  cpu  memory  disk_health  io  network  nfs_*  zone_caps    │
//! │  zpool  fma  smf  zones                                     │
//! └──────────┬─────────────────────────────────┬────────────────┘
//!            │ entities                        │ PollEnv
//!     ┌──────▼──────┐                 ┌────────▼────────┐
//!     │  Assembler  │                 │   HostContext   │
//!     │ select      │                 │   KstatSource   │ (trait)
//!     │ convert     │                 │  CommandRunner  │ (trait)
//!     │ correlate   │                 └────────┬────────┘
//!     │ aggregate   │                          │
//!     └──────┬──────┘          ┌───────────────┼───────────────┐
//!            │          ┌──────▼──────┐ ┌──────▼──────┐ ┌──────▼──────┐
//!       Vec<Metric>     │ RealRunner  │ │ MockRunner  │ │  Scenarios  │
//!                       │ (Illumos)   │ │ (Testing)   │ │ (Fixtures)  │
//!                       └─────────────┘ └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use sunstat_core::collectors::{PollEnv, from_config, poll};
//! use sunstat_core::config::{Config, ZpoolConfig};
//! use sunstat_core::host::HostContext;
//! use sunstat_core::source::{CommandKstat, mock::MockRunner};
//!
//! let runner = MockRunner::smartos_host();
//! let kstat = CommandKstat::new(&runner);
//! let host = HostContext::new(4096, "global").unwrap();
//! let env = PollEnv { host: &host, kstat: &kstat, runner: &runner };
//!
//! let config = Config { zpool: Some(ZpoolConfig::default()), ..Config::default() };
//! let metrics = poll(&from_config(&config), &env);
//! assert_eq!(metrics.len(), 3);
//! ```

mod cpu;
mod disk_health;
mod fma;
mod io;
mod memory;
mod network;
mod nfs;
mod smf;
mod zone_caps;
mod zones;
mod zpool;

use std::time::Instant;

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::CollectError;
use crate::host::HostContext;
use crate::model::Metric;
use crate::source::traits::{CommandRunner, KstatSource};

#[allow(unused_imports)]
pub use cpu::CpuCollector;
#[allow(unused_imports)]
pub use disk_health::DiskHealthCollector;
#[allow(unused_imports)]
pub use fma::FmaCollector;
#[allow(unused_imports)]
pub use io::IoCollector;
#[allow(unused_imports)]
pub use memory::MemoryCollector;
#[allow(unused_imports)]
pub use network::NetworkCollector;
#[allow(unused_imports)]
pub use nfs::{NfsCollector, NfsSide};
#[allow(unused_imports)]
pub use smf::SmfCollector;
#[allow(unused_imports)]
pub use zone_caps::ZoneCapsCollector;
#[allow(unused_imports)]
pub use zones::ZonesCollector;
#[allow(unused_imports)]
pub use zpool::ZpoolCollector;

/// Everything a collector may read during one poll.
#[derive(Clone, Copy)]
pub struct PollEnv<'a> {
    pub host: &'a HostContext,
    pub kstat: &'a dyn KstatSource,
    pub runner: &'a dyn CommandRunner,
}

/// One source of metrics.
///
/// `gather` keeps no state between calls. A kstat session is opened at most
/// once per call and dropped before it returns.
pub trait Collector: Send + Sync {
    /// Name of the configuration section this collector comes from.
    fn name(&self) -> &'static str;

    fn gather(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError>;
}

/// Builds the collectors enabled in `config`, in [`Config::enabled`] order.
pub fn from_config(config: &Config) -> Vec<Box<dyn Collector>> {
    let mut collectors: Vec<Box<dyn Collector>> = Vec::new();
    if let Some(c) = &config.cpu {
        collectors.push(Box::new(CpuCollector::new(c.clone())));
    }
    if let Some(c) = &config.memory {
        collectors.push(Box::new(MemoryCollector::new(c.clone())));
    }
    if let Some(c) = &config.disk_health {
        collectors.push(Box::new(DiskHealthCollector::new(c.clone())));
    }
    if let Some(c) = &config.io {
        collectors.push(Box::new(IoCollector::new(c.clone())));
    }
    if let Some(c) = &config.network {
        collectors.push(Box::new(NetworkCollector::new(c.clone())));
    }
    if let Some(c) = &config.nfs_client {
        collectors.push(Box::new(NfsCollector::new(NfsSide::Client, c.clone())));
    }
    if let Some(c) = &config.nfs_server {
        collectors.push(Box::new(NfsCollector::new(NfsSide::Server, c.clone())));
    }
    if let Some(c) = &config.zpool {
        collectors.push(Box::new(ZpoolCollector::new(c.clone())));
    }
    if let Some(c) = &config.fma {
        collectors.push(Box::new(FmaCollector::new(c.clone())));
    }
    if let Some(c) = &config.smf {
        collectors.push(Box::new(SmfCollector::new(c.clone())));
    }
    if let Some(c) = &config.zones {
        collectors.push(Box::new(ZonesCollector::new(c.clone())));
    }
    if let Some(c) = &config.zone_caps {
        collectors.push(Box::new(ZoneCapsCollector::new(c.clone())));
    }
    collectors
}

/// Runs one pass of every collector and concatenates their metrics.
///
/// A collector that fails is logged and contributes nothing to this pass;
/// the others still run.
pub fn poll(collectors: &[Box<dyn Collector>], env: &PollEnv<'_>) -> Vec<Metric> {
    let mut metrics = Vec::new();
    for collector in collectors {
        let start = Instant::now();
        match collector.gather(env) {
            Ok(gathered) => {
                debug!(
                    collector = collector.name(),
                    metrics = gathered.len(),
                    elapsed_us = start.elapsed().as_micros() as u64,
                    "collector finished"
                );
                metrics.extend(gathered);
            }
            Err(error) => {
                warn!(collector = collector.name(), %error, "collector failed, skipping this poll");
            }
        }
    }
    metrics
}

/// Gathers from a mock host in `zone` and sorts the result.
#[cfg(test)]
pub(crate) fn gather_in_zone(
    collector: &dyn Collector,
    runner: &crate::source::mock::MockRunner,
    zone: &str,
) -> Result<Vec<Metric>, CollectError> {
    let kstat = crate::source::traits::CommandKstat::new(runner);
    let host = HostContext::new(4096, zone).expect("test host facts");
    let env = PollEnv {
        host: &host,
        kstat: &kstat,
        runner,
    };
    let mut metrics = collector.gather(&env)?;
    crate::model::sort_metrics(&mut metrics);
    Ok(metrics)
}

#[cfg(test)]
pub(crate) fn gather_sorted(
    collector: &dyn Collector,
    runner: &crate::source::mock::MockRunner,
) -> Result<Vec<Metric>, CollectError> {
    gather_in_zone(collector, runner, "global")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FmaConfig, SmfConfig, ZpoolConfig};
    use crate::source::mock::MockRunner;
    use crate::source::traits::CommandKstat;

    #[test]
    fn test_from_config_follows_enabled_order() {
        let config = Config {
            zpool: Some(ZpoolConfig::default()),
            smf: Some(SmfConfig::default()),
            nfs_server: Some(Default::default()),
            cpu: Some(Default::default()),
            ..Config::default()
        };
        let names: Vec<&str> = from_config(&config).iter().map(|c| c.name()).collect();
        assert_eq!(names, config.enabled());
        assert_eq!(names, vec!["cpu", "nfs_server", "zpool", "smf"]);
    }

    #[test]
    fn test_failing_collector_does_not_stop_the_pass() {
        let mut runner = MockRunner::smartos_host();
        runner.remove("/usr/sbin/zpool list");
        let kstat = CommandKstat::new(&runner);
        let host = HostContext::new(4096, "global").unwrap();
        let env = PollEnv {
            host: &host,
            kstat: &kstat,
            runner: &runner,
        };

        let config = Config {
            zpool: Some(ZpoolConfig::default()),
            fma: Some(FmaConfig {
                fmadm: false,
                ..FmaConfig::default()
            }),
            ..Config::default()
        };
        let collectors = from_config(&config);
        assert!(collectors[0].gather(&env).is_err());

        let metrics = poll(&collectors, &env);
        assert!(!metrics.is_empty());
        assert!(metrics.iter().all(|m| m.name == "fma.fmstat"));
    }
}
