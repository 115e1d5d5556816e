//! SMF service states, counted per zone.

use crate::assemble::{Assembler, Entity};
use crate::config::SmfConfig;
use crate::error::CollectError;
use crate::model::{Metric, RawStat, TypedValue, ValueKind};
use crate::source::{Row, Table};

use super::{Collector, PollEnv};

const SVCS: &str = "/bin/svcs";
const SVCS_ARGS: &[&str] = &["-aHZ", "-ozone,state,fmri"];
const COLUMNS: &[&str] = &["zone", "state", "fmri"];

fn one(name: &str) -> Vec<RawStat> {
    vec![RawStat::new(name, TypedValue::Unsigned(1), ValueKind::Gauge)]
}

/// The zone, state and FMRI of a `svcs` row.
fn service(row: &Row) -> (&str, &str, &str) {
    (
        row.get("zone").unwrap_or_default(),
        row.get("state").unwrap_or_default(),
        row.get("fmri").unwrap_or_default(),
    )
}

pub struct SmfCollector {
    config: SmfConfig,
}

impl SmfCollector {
    pub fn new(config: SmfConfig) -> Self {
        Self { config }
    }

    fn assembler(&self) -> Assembler<'_> {
        Assembler::new("smf")
            .filter("zone", &self.config.zones)
            .filter("state", &self.config.svc_states)
    }
}

impl Collector for SmfCollector {
    fn name(&self) -> &'static str {
        "smf"
    }

    fn gather(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError> {
        let output = env.runner.run(SVCS, SVCS_ARGS)?;
        let table = Table::parse_headerless(&output, COLUMNS);
        table.report_errors("svcs");

        // Rows of the same zone and state share an entity and are summed.
        let counts = table.rows().iter().map(|row| {
            let (zone, state, _) = service(row);
            Entity::from_stats(format!("{zone}\t{state}"), one("states"))
                .with_tag("zone", zone)
                .with_tag("state", state)
        });
        let mut metrics = self.assembler().assemble(counts);

        if self.config.generate_details {
            let details = table
                .rows()
                .iter()
                .filter(|row| row.get("state") != Some("online"))
                .map(|row| {
                    let (zone, state, fmri) = service(row);
                    Entity::from_stats(format!("{zone}\t{fmri}"), one("errors"))
                        .with_tag("zone", zone)
                        .with_tag("state", state)
                        .with_tag("fmri", fmri)
                });
            metrics.extend(self.assembler().assemble(details));
        }

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::gather_sorted;
    use crate::select::AllowList;
    use crate::source::mock::MockRunner;

    #[test]
    fn test_counts_and_details() {
        let config = SmfConfig {
            svc_states: AllowList::new(["online", "maintenance"]),
            zones: AllowList::new(["global", "cube-pkgsrc"]),
            generate_details: true,
        };
        let metrics =
            gather_sorted(&SmfCollector::new(config), &MockRunner::smartos_host()).unwrap();

        let expected = vec![
            Metric::new("smf")
                .with_field("errors", 1u64)
                .with_tag("zone", "cube-pkgsrc")
                .with_tag("state", "maintenance")
                .with_tag("fmri", "svc:/system/filesystem/local:default"),
            Metric::new("smf")
                .with_field("states", 1u64)
                .with_tag("zone", "cube-pkgsrc")
                .with_tag("state", "maintenance"),
            Metric::new("smf")
                .with_field("states", 4u64)
                .with_tag("zone", "cube-pkgsrc")
                .with_tag("state", "online"),
            Metric::new("smf")
                .with_field("states", 2u64)
                .with_tag("zone", "global")
                .with_tag("state", "online"),
        ];
        assert_eq!(metrics, expected);
    }

    #[test]
    fn test_everything_counted_without_details() {
        let metrics = gather_sorted(
            &SmfCollector::new(SmfConfig::default()),
            &MockRunner::smartos_host(),
        )
        .unwrap();
        // cube-pkgsrc: maintenance, online, disabled; cube-cron: legacy_run,
        // online, disabled; global: legacy_run, online, disabled.
        assert_eq!(metrics.len(), 9);
        assert!(metrics.iter().all(|m| m.field("errors").is_none()));
        let legacy = metrics
            .iter()
            .find(|m| m.tag("zone") == Some("global") && m.tag("state") == Some("legacy_run"))
            .unwrap();
        assert_eq!(legacy.field("states"), Some(crate::model::Number::Unsigned(3)));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let mut runner = MockRunner::new();
        runner.add_output(
            "/bin/svcs -aHZ -ozone,state,fmri",
            "global online svc:/a:default\nglobal\nglobal online svc:/b:default\n",
        );
        let metrics = gather_sorted(&SmfCollector::new(SmfConfig::default()), &runner).unwrap();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].field("states"), Some(crate::model::Number::Unsigned(2)));
    }
}
