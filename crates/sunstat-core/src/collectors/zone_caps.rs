//! Resource caps of SmartOS zones: kstat class `zone_caps` and module
//! `memory_cap`.
//!
//! Inside a zone only that zone's caps are visible and a single metric comes
//! out. In the global zone there is one metric per zone.

use crate::assemble::{Assembler, Entity};
use crate::config::ZoneCapsConfig;
use crate::error::CollectError;
use crate::model::{Metric, RawStat, StatGroup};
use crate::select::want;

use super::{Collector, PollEnv};

/// Stats of one zone, gathered from several groups sharing its instance.
#[derive(Debug, Default)]
struct ZoneCaps {
    instance: u32,
    zone: Option<String>,
    stats: Vec<RawStat>,
}

impl ZoneCaps {
    fn for_instance(zones: &mut Vec<ZoneCaps>, instance: u32) -> &mut ZoneCaps {
        let idx = match zones.iter().position(|z| z.instance == instance) {
            Some(idx) => idx,
            None => {
                zones.push(ZoneCaps {
                    instance,
                    ..ZoneCaps::default()
                });
                zones.len() - 1
            }
        };
        &mut zones[idx]
    }

    /// Takes the zone name from `zonename` and the `keep` stats as
    /// `<prefix>.<stat>`.
    fn absorb(&mut self, group: &StatGroup, prefix: &str, keep: impl Fn(&str) -> bool) {
        for stat in group.stats() {
            if stat.name == "zonename" {
                if let Some(zone) = stat.value.as_text() {
                    self.zone = Some(zone.to_string());
                }
                continue;
            }
            if stat.value.is_numeric() && keep(&stat.name) {
                self.stats.push(RawStat::new(
                    format!("{prefix}.{}", stat.name),
                    stat.value.clone(),
                    stat.kind,
                ));
            }
        }
    }
}

pub struct ZoneCapsCollector {
    config: ZoneCapsConfig,
}

impl ZoneCapsCollector {
    pub fn new(config: ZoneCapsConfig) -> Self {
        Self { config }
    }
}

impl Collector for ZoneCapsCollector {
    fn name(&self) -> &'static str {
        "zone_caps"
    }

    fn gather(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError> {
        let session = env.kstat.open()?;
        let mut zones: Vec<ZoneCaps> = Vec::new();

        for group in session.class("zone_caps") {
            // cpucaps_zone_42 → cpucaps
            let cap = group.id.name.split('_').next().unwrap_or_default();
            if !want(cap, &self.config.names) {
                continue;
            }
            let cpucaps = cap == "cpucaps";
            ZoneCaps::for_instance(&mut zones, group.id.instance).absorb(group, cap, |stat| {
                stat == "usage"
                    || stat == "value"
                    || (cpucaps && want(stat, &self.config.cpucaps_fields))
            });
        }

        for group in session.module("memory_cap") {
            ZoneCaps::for_instance(&mut zones, group.id.instance).absorb(
                group,
                "memory_cap",
                |stat| want(stat, &self.config.memory_cap_fields),
            );
        }

        let entities = zones.into_iter().map(|caps| {
            let entity = Entity::from_stats(caps.instance.to_string(), caps.stats);
            match caps.zone {
                Some(zone) => entity.with_tag("zone", zone),
                None => entity,
            }
        });
        Ok(Assembler::new("smartos_zone").assemble(entities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::gather_sorted;
    use crate::select::AllowList;
    use crate::source::mock::MockRunner;

    #[test]
    fn test_selected_caps() {
        let config = ZoneCapsConfig {
            names: AllowList::new(["cpucaps", "nprocs"]),
            cpucaps_fields: AllowList::new(["above_sec", "nwait"]),
            memory_cap_fields: AllowList::new(["rss", "swap"]),
        };
        let metrics =
            gather_sorted(&ZoneCapsCollector::new(config), &MockRunner::smartos_host()).unwrap();
        let expected = vec![
            Metric::new("smartos_zone")
                .with_field("cpucaps.usage", 30u64)
                .with_field("cpucaps.value", 400u64)
                .with_field("cpucaps.above_sec", 10u64)
                .with_field("cpucaps.nwait", 0u64)
                .with_field("nprocs.usage", 41u64)
                .with_field("nprocs.value", 2000u64)
                .with_field("memory_cap.rss", 1048576000u64)
                .with_field("memory_cap.swap", 123456u64)
                .with_tag("zone", "cube-media"),
        ];
        assert_eq!(metrics, expected);
    }

    #[test]
    fn test_everything() {
        let metrics = gather_sorted(
            &ZoneCapsCollector::new(ZoneCapsConfig::default()),
            &MockRunner::smartos_host(),
        )
        .unwrap();
        assert_eq!(metrics.len(), 1);
        let metric = &metrics[0];
        // 8 cpucaps stats, usage and value of 3 other caps, 6 memory_cap stats.
        assert_eq!(metric.fields().len(), 8 + 6 + 6);
        assert_eq!(metric.tag("zone"), Some("cube-media"));
        assert!(metric.field("memory_cap.zonename").is_none());
        assert!(metric.field("lockedmem.value").is_some());
    }

    #[test]
    fn test_no_caps() {
        let metrics = gather_sorted(
            &ZoneCapsCollector::new(ZoneCapsConfig::default()),
            &MockRunner::idle_host(),
        )
        .unwrap();
        assert!(metrics.is_empty());
    }
}
