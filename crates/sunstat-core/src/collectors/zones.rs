//! Zone states and brands from `zoneadm list -cp`.

use crate::aggregate::AggregationMode;
use crate::assemble::{Assembler, Entity};
use crate::config::ZonesConfig;
use crate::correlate::{Correlation, Fallback, ZoneInfo, parse_zones, zone_table};
use crate::error::CollectError;
use crate::model::{Metric, RawStat, TypedValue, ValueKind};

use super::{Collector, PollEnv};

const ZONEADM: &str = "/usr/sbin/zoneadm";

fn gauge(name: String, value: u64) -> RawStat {
    RawStat::new(name, TypedValue::Unsigned(value), ValueKind::Gauge)
}

pub struct ZonesCollector {
    config: ZonesConfig,
}

impl ZonesCollector {
    pub fn new(config: ZonesConfig) -> Self {
        Self { config }
    }

    /// Every configured state and brand at zero, so they are reported even
    /// when no zone has them.
    fn zeroes(&self) -> Entity<'static> {
        let mut stats: Vec<RawStat> = self
            .config
            .zone_states
            .iter()
            .map(|s| gauge(format!("state.{s}"), 0))
            .chain(self.config.zone_brands.iter().map(|b| gauge(format!("brand.{b}"), 0)))
            .collect();
        if self.config.zone_count {
            stats.push(gauge("count".to_string(), 0));
        }
        Entity::from_stats("", stats)
    }

    fn counted(&self, zone: &ZoneInfo) -> Entity<'static> {
        let mut stats = Vec::new();
        if self.config.zone_states.contains(&zone.status) {
            stats.push(gauge(format!("state.{}", zone.status), 1));
        }
        if self.config.zone_brands.contains(&zone.brand) {
            stats.push(gauge(format!("brand.{}", zone.brand), 1));
        }
        if self.config.zone_count {
            stats.push(gauge("count".to_string(), 1));
        }
        Entity::from_stats(zone.name.as_str(), stats)
    }
}

impl Collector for ZonesCollector {
    fn name(&self) -> &'static str {
        "zones"
    }

    fn gather(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError> {
        let output = env.runner.run(ZONEADM, &["list", "-cp"])?;
        let zones = parse_zones(&output);

        let counts = std::iter::once(self.zeroes()).chain(zones.iter().map(|z| self.counted(z)));
        let mut metrics = Assembler::new("zones")
            .mode(AggregationMode::Aggregate)
            .assemble(counts);

        if self.config.zone_properties {
            let table = zone_table(&zones);
            let properties = zones.iter().map(|zone| {
                let up = u64::from(zone.status == "running");
                Entity::from_stats(zone.name.as_str(), vec![gauge("properties".to_string(), up)])
                    .with_tag("name", zone.name.as_str())
            });
            metrics.extend(
                Assembler::new("zones")
                    .correlate(Correlation::new(&table, Fallback::none()))
                    .assemble(properties),
            );
        }

        Ok(metrics)
    }
}
