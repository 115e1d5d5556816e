//! ZFS pool capacity and health from `zpool list`.

use crate::assemble::{Assembler, Entity, UnitTable};
use crate::config::ZpoolConfig;
use crate::convert::{Conversion, ZPOOL_HEALTH};
use crate::error::CollectError;
use crate::model::Metric;
use crate::select::AllowList;
use crate::source::Table;

use super::{Collector, PollEnv};

const ZPOOL: &str = "/usr/sbin/zpool";

/// Columns of `zpool list` that carry a number once converted.
const COLUMNS: [&str; 7] = ["size", "alloc", "free", "frag", "cap", "dedup", "health"];

fn units() -> UnitTable {
    UnitTable::new()
        .with("size", Conversion::SizeSuffixToBytes)
        .with("alloc", Conversion::SizeSuffixToBytes)
        .with("free", Conversion::SizeSuffixToBytes)
        .with("frag", Conversion::PercentSuffix)
        .with("cap", Conversion::PercentSuffix)
        .with("dedup", Conversion::MultiplierSuffix)
        .with("health", Conversion::Ordinal(ZPOOL_HEALTH))
}

pub struct ZpoolCollector {
    config: ZpoolConfig,
}

impl ZpoolCollector {
    pub fn new(config: ZpoolConfig) -> Self {
        Self { config }
    }
}

impl Collector for ZpoolCollector {
    fn name(&self) -> &'static str {
        "zpool"
    }

    fn gather(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError> {
        let output = env.runner.run(ZPOOL, &["list"])?;
        let table = Table::parse(&output);
        table.report_errors("zpool list");

        let groups = table.to_groups("zpool", "name", &AllowList::new(COLUMNS));
        let entities = groups
            .iter()
            .map(|g| Entity::from_group(g.id.name.as_str(), g).with_tag("name", g.id.name.as_str()));

        Ok(Assembler::new("zpool")
            .fields(&self.config.fields)
            .units(units())
            .assemble(entities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::gather_sorted;
    use crate::convert::size_suffix_to_bytes;
    use crate::model::Number;
    use crate::source::mock::MockRunner;

    fn bytes(text: &str) -> f64 {
        size_suffix_to_bytes(text).unwrap()
    }

    #[test]
    fn test_all_fields() {
        let metrics = gather_sorted(
            &ZpoolCollector::new(ZpoolConfig::default()),
            &MockRunner::smartos_host(),
        )
        .unwrap();

        let pool = |name: &str, size: &str, alloc: &str, free: &str, frag: i64, cap: i64| {
            Metric::new("zpool")
                .with_field("size", bytes(size))
                .with_field("alloc", bytes(alloc))
                .with_field("free", bytes(free))
                .with_field("frag", frag)
                .with_field("cap", cap)
                .with_field("dedup", 1.0)
                .with_field("health", 0u64)
                .with_tag("name", name)
        };
        let expected = vec![
            pool("big", "3.62T", "2.69T", "959G", 2, 74),
            pool("fast", "262G", "104G", "158G", 25, 39),
            pool("rpool", "199G", "57.1G", "142G", 63, 28),
        ];
        assert_eq!(metrics, expected);
        assert_eq!(metrics[0].field("size"), Some(Number::Float(3.98023209254912e12)));
        assert_eq!(metrics[1].field("size"), Some(Number::Float(2.81320357888e11)));
    }

    #[test]
    fn test_selected_fields() {
        let config = ZpoolConfig {
            fields: AllowList::new(["cap", "health"]),
        };
        let metrics =
            gather_sorted(&ZpoolCollector::new(config), &MockRunner::smartos_host()).unwrap();
        let got: Vec<(Option<&str>, Option<Number>, Option<Number>)> = metrics
            .iter()
            .map(|m| (m.tag("name"), m.field("cap"), m.field("health")))
            .collect();
        assert_eq!(
            got,
            vec![
                (Some("big"), Some(Number::Signed(74)), Some(Number::Unsigned(0))),
                (Some("fast"), Some(Number::Signed(39)), Some(Number::Unsigned(0))),
                (Some("rpool"), Some(Number::Signed(28)), Some(Number::Unsigned(0))),
            ]
        );
        assert!(metrics.iter().all(|m| m.fields().len() == 2));
    }

    #[test]
    fn test_degraded_and_malformed_pools() {
        let mut runner = MockRunner::new();
        runner.add_output(
            "/usr/sbin/zpool list",
            "\
NAME    SIZE  ALLOC   FREE  CKPOINT  EXPANDSZ   FRAG    CAP  DEDUP  HEALTH  ALTROOT
tank   1.81T  1.20T   620G        -         -    12%    66%  1.00x  DEGRADED  -
odd    1.81T  1.20T
scratch 100G  1.00G  99.0G        -         -     0%     1%  1.00x  SOMETHING  -
",
        );
        let config = ZpoolConfig {
            fields: AllowList::new(["health"]),
        };
        let metrics = gather_sorted(&ZpoolCollector::new(config), &runner).unwrap();
        let health: Vec<(Option<&str>, Option<Number>)> = metrics
            .iter()
            .map(|m| (m.tag("name"), m.field("health")))
            .collect();
        assert_eq!(
            health,
            vec![
                (Some("scratch"), Some(Number::Unsigned(99))),
                (Some("tank"), Some(Number::Unsigned(1))),
            ]
        );
    }

    #[test]
    fn test_unavailable_pool_reports_health() {
        let mut runner = MockRunner::new();
        runner.add_output(
            "/usr/sbin/zpool list",
            "\
NAME    SIZE  ALLOC   FREE  CKPOINT  EXPANDSZ   FRAG    CAP  DEDUP  HEALTH  ALTROOT
rpool   199G  57.1G   142G        -         -    63%    28%  1.00x  ONLINE  -
tank       -      -      -        -         -      -      -      -  UNAVAIL  -
",
        );
        let metrics = gather_sorted(
            &ZpoolCollector::new(ZpoolConfig::default()),
            &runner,
        )
        .unwrap();
        assert_eq!(metrics.len(), 2);
        let tank = vec![
            Metric::new("zpool")
                .with_field("health", 3u64)
                .with_tag("name", "tank"),
        ];
        assert_eq!(metrics[1..], tank[..]);
        assert_eq!(metrics[0].fields().len(), 7);
    }

    #[test]
    fn test_no_pools() {
        let metrics = gather_sorted(
            &ZpoolCollector::new(ZpoolConfig::default()),
            &MockRunner::idle_host(),
        )
        .unwrap();
        assert!(metrics.is_empty());
    }
}
