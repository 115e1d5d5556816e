//! Disk error counters from kstat class `device_error`.

use crate::assemble::{Assembler, Entity, Naming};
use crate::config::DiskHealthConfig;
use crate::error::CollectError;
use crate::model::Metric;

use super::{Collector, PollEnv};

/// `sd6,err` → `sd6`.
pub(super) fn device_name(group_name: &str) -> &str {
    group_name
        .split_once(',')
        .map_or(group_name, |(device, _)| device)
}

pub struct DiskHealthCollector {
    config: DiskHealthConfig,
}

impl DiskHealthCollector {
    pub fn new(config: DiskHealthConfig) -> Self {
        Self { config }
    }
}

impl Collector for DiskHealthCollector {
    fn name(&self) -> &'static str {
        "disk_health"
    }

    fn gather(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError> {
        let session = env.kstat.open()?;
        let entities = session.class("device_error").map(|g| {
            let device = device_name(&g.id.name);
            Entity::from_group(device, g).with_dim("device", device)
        });

        Ok(Assembler::new("diskHealth")
            .fields(&self.config.fields)
            .tags(&self.config.tags)
            .naming(Naming::CamelCase)
            .filter("device", &self.config.devices)
            .assemble(entities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::gather_sorted;
    use crate::model::Number;
    use crate::select::AllowList;
    use crate::source::mock::MockRunner;

    fn config() -> DiskHealthConfig {
        DiskHealthConfig {
            devices: AllowList::new(["sd6"]),
            fields: AllowList::new([
                "Hard Errors",
                "Soft Errors",
                "Transport Errors",
                "Illegal Request",
            ]),
            tags: AllowList::new(["Vendor", "Serial No", "Product", "Revision"]),
        }
    }

    #[test]
    fn test_device_name() {
        assert_eq!(device_name("sd6,err"), "sd6");
        assert_eq!(device_name("sd6"), "sd6");
    }

    #[test]
    fn test_single_device() {
        let metrics =
            gather_sorted(&DiskHealthCollector::new(config()), &MockRunner::smartos_host())
                .unwrap();
        let expected = vec![
            Metric::new("diskHealth")
                .with_field("hardErrors", 0u64)
                .with_field("softErrors", 0u64)
                .with_field("transportErrors", 0u64)
                .with_field("illegalRequest", 1148u64)
                .with_tag("vendor", "WD")
                .with_tag("serialNo", "WXP1E7916Z6K")
                .with_tag("product", "My Passport 2627"),
        ];
        assert_eq!(metrics, expected);
    }

    #[test]
    fn test_all_devices_all_stats() {
        let config = DiskHealthConfig::default();
        let metrics =
            gather_sorted(&DiskHealthCollector::new(config), &MockRunner::smartos_host())
                .unwrap();
        assert_eq!(metrics.len(), 2);

        let sd0 = metrics
            .iter()
            .find(|m| m.tag("serialNo") == Some("S3Z9NB0K"))
            .unwrap();
        assert_eq!(sd0.tag("revision"), Some("RVT0"));
        assert_eq!(sd0.field("size"), Some(Number::Unsigned(500107862016)));
        assert_eq!(sd0.field("illegalRequest"), Some(Number::Unsigned(6)));
        assert_eq!(sd0.tag("device"), None);
    }

    #[test]
    fn test_numeric_looking_identity_stays_a_tag() {
        let mut runner = MockRunner::new();
        runner.add_output(
            "/usr/bin/kstat -p",
            "\
sderr:6:sd6,err:class\tdevice_error
sderr:6:sd6,err:Hard Errors\t0
sderr:6:sd6,err:Product\tWD
sderr:6:sd6,err:Revision\t0100
sderr:6:sd6,err:Serial No\t000123
",
        );
        let metrics = gather_sorted(
            &DiskHealthCollector::new(DiskHealthConfig::default()),
            &runner,
        )
        .unwrap();
        let expected = vec![
            Metric::new("diskHealth")
                .with_field("hardErrors", 0u64)
                .with_tag("product", "WD")
                .with_tag("revision", "0100")
                .with_tag("serialNo", "000123"),
        ];
        assert_eq!(metrics, expected);
    }

    #[test]
    fn test_text_stat_as_field_skips_device() {
        let config = DiskHealthConfig {
            fields: AllowList::new(["Hard Errors", "Revision"]),
            ..DiskHealthConfig::default()
        };
        let metrics =
            gather_sorted(&DiskHealthCollector::new(config), &MockRunner::smartos_host())
                .unwrap();
        // sd0 carries a text Revision, sd6 has none.
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].tag("vendor"), Some("WD"));
    }
}
