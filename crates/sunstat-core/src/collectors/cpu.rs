//! CPU time, clock speed and per-zone CPU usage from kstats.

use tracing::debug;

use crate::aggregate::AggregationMode;
use crate::assemble::{Assembler, Entity, Naming};
use crate::config::CpuConfig;
use crate::error::CollectError;
use crate::model::Metric;
use crate::select::AllowList;
use crate::source::KstatSession;

use super::{Collector, PollEnv};

const CPU_INFO_NAMING: &[(&str, &str)] = &[
    ("current_clock_Hz", "speed"),
    ("core_id", "coreID"),
    ("chip_id", "chipID"),
    ("clock_MHz", "clockMhz"),
];

const ZONE_NAMING: &[(&str, &str)] = &[("nsec_sys", "sys"), ("nsec_user", "user")];

/// `cpu_nsec_kernel` → `nsec.kernel`.
fn field_path(stat: &str) -> String {
    stat.replacen("cpu_", "", 1).replacen('_', ".", 1)
}

pub struct CpuCollector {
    config: CpuConfig,
}

impl CpuCollector {
    pub fn new(config: CpuConfig) -> Self {
        Self { config }
    }

    fn cpu_info(&self, session: &KstatSession) -> Vec<Metric> {
        let fields = AllowList::new(["current_clock_Hz"]);
        let tags = AllowList::new(["core_id", "chip_id", "state", "clock_MHz"]);
        let entities = session
            .module("cpu_info")
            .map(|g| Entity::from_group(g.id.instance.to_string(), g));

        Assembler::new("cpu.info")
            .fields(&fields)
            .tags(&tags)
            .naming(Naming::Map(CPU_INFO_NAMING))
            .assemble(entities)
    }

    fn zone_cpu(&self, session: &KstatSession) -> Vec<Metric> {
        let fields = AllowList::new(["nsec_sys", "nsec_user"]);
        let entities = session
            .module("zones")
            .filter(|g| {
                let complete = g.get("nsec_sys").is_some() && g.get("nsec_user").is_some();
                if !complete {
                    debug!(zone = %g.id.name, "zone without CPU time stats");
                }
                complete
            })
            .map(|g| Entity::from_group(g.id.name.as_str(), g).with_tag("zone", g.id.name.as_str()));

        Assembler::new("cpu.zone")
            .fields(&fields)
            .naming(Naming::Map(ZONE_NAMING))
            .assemble(entities)
    }
}

impl Collector for CpuCollector {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn gather(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError> {
        let session = env.kstat.open()?;
        let mut metrics = Vec::new();

        if self.config.cpu_info_stats {
            metrics.extend(self.cpu_info(&session));
        }

        let mode = if self.config.aggregate {
            AggregationMode::Aggregate
        } else {
            AggregationMode::PerEntity
        };
        let entities = session
            .module("cpu")
            .filter(|g| g.id.name == "sys")
            .map(|g| {
                let id = g.id.instance.to_string();
                Entity::from_group(id.as_str(), g).with_tag("coreID", id)
            });
        metrics.extend(
            Assembler::new("cpu")
                .fields(&self.config.fields)
                .naming(Naming::With(field_path))
                .mode(mode)
                .assemble(entities),
        );

        if self.config.zone_cpu_stats {
            metrics.extend(self.zone_cpu(&session));
        }

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::gather_sorted;
    use crate::model::Number;
    use crate::source::mock::MockRunner;

    fn gather(config: CpuConfig) -> Vec<Metric> {
        gather_sorted(&CpuCollector::new(config), &MockRunner::smartos_host()).unwrap()
    }

    #[test]
    fn test_field_path() {
        assert_eq!(field_path("cpu_nsec_kernel"), "nsec.kernel");
        assert_eq!(field_path("cpu_ticks_idle"), "ticks.idle");
        assert_eq!(field_path("crtime"), "crtime");
        assert_eq!(field_path("iowait"), "iowait");
    }

    #[test]
    fn test_per_cpu() {
        let metrics = gather(CpuConfig {
            fields: AllowList::new(["cpu_nsec_kernel", "cpu_nsec_user"]),
            ..CpuConfig::default()
        });
        let expected = vec![
            Metric::new("cpu")
                .with_field("nsec.kernel", 1500u64)
                .with_field("nsec.user", 500u64)
                .with_tag("coreID", "0"),
            Metric::new("cpu")
                .with_field("nsec.kernel", 2500u64)
                .with_field("nsec.user", 800u64)
                .with_tag("coreID", "1"),
        ];
        assert_eq!(metrics, expected);
    }

    #[test]
    fn test_aggregate() {
        let metrics = gather(CpuConfig {
            fields: AllowList::new(["cpu_nsec_idle", "cpu_nsec_intr"]),
            aggregate: true,
            ..CpuConfig::default()
        });
        let expected = vec![
            Metric::new("cpu")
                .with_field("nsec.idle", 15000u64)
                .with_field("nsec.intr", 50u64),
        ];
        assert_eq!(metrics, expected);
    }

    #[test]
    fn test_cpu_info_and_zones() {
        let metrics = gather(CpuConfig {
            fields: AllowList::new(["cpu_nsec_user"]),
            cpu_info_stats: true,
            zone_cpu_stats: true,
            aggregate: true,
        });

        let info: Vec<&Metric> = metrics.iter().filter(|m| m.name == "cpu.info").collect();
        assert_eq!(info.len(), 2);
        assert_eq!(
            *info[0],
            Metric::new("cpu.info")
                .with_field("speed", 2600000000u64)
                .with_tag("coreID", "0")
                .with_tag("chipID", "0")
                .with_tag("state", "on-line")
                .with_tag("clockMhz", "2600")
        );
        assert_eq!(info[1].field("speed"), Some(Number::Unsigned(1200000000)));
        assert_eq!(info[1].tag("coreID"), Some("1"));

        // cube-ws has no nsec_sys and is left out.
        let zones: Vec<Metric> = metrics
            .iter()
            .filter(|m| m.name == "cpu.zone")
            .cloned()
            .collect();
        assert_eq!(
            zones,
            vec![
                Metric::new("cpu.zone")
                    .with_field("sys", 300u64)
                    .with_field("user", 200u64)
                    .with_tag("zone", "cube-media"),
                Metric::new("cpu.zone")
                    .with_field("sys", 9000u64)
                    .with_field("user", 4000u64)
                    .with_tag("zone", "global"),
            ]
        );
    }

    #[test]
    fn test_empty_kstat_chain() {
        let config = CpuConfig {
            cpu_info_stats: true,
            zone_cpu_stats: true,
            ..CpuConfig::default()
        };
        let metrics = gather_sorted(&CpuCollector::new(config), &MockRunner::idle_host()).unwrap();
        assert!(metrics.is_empty());
    }
}
