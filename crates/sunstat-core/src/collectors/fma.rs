//! Fault management: per-module `fmstat` statistics and counts of the
//! problem classes `fmadm faulty` reports.

use crate::aggregate::AggregationMode;
use crate::assemble::{Assembler, Entity, UnitTable};
use crate::config::FmaConfig;
use crate::convert::Conversion;
use crate::error::CollectError;
use crate::model::{Metric, RawStat, TypedValue, ValueKind};
use crate::select::AllowList;
use crate::source::Table;

use super::{Collector, PollEnv};

const FMSTAT: &str = "/usr/sbin/fmstat";
const FMADM: &str = "/usr/sbin/fmadm";

/// Problem classes of `fmadm faulty`, one per `Problem class : ...` line,
/// with dots replaced so they can be field names.
fn problem_classes(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| line.contains("Problem class"))
        .filter_map(|line| line.split_once(" : "))
        .map(|(_, class)| class.trim().replace('.', "_"))
        .filter(|class| !class.is_empty())
        .collect()
}

pub struct FmaCollector {
    config: FmaConfig,
}

impl FmaCollector {
    pub fn new(config: FmaConfig) -> Self {
        Self { config }
    }

    fn fmstat(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError> {
        let output = env.runner.run_privileged(FMSTAT, &[])?;
        let table = Table::parse(&output);
        table.report_errors("fmstat");

        let groups = table.to_groups("fmstat", "module", &AllowList::all());
        let entities = groups
            .iter()
            .map(|g| Entity::from_group(g.id.name.as_str(), g).with_tag("module", g.id.name.as_str()));
        let units = UnitTable::new()
            .with("memsz", Conversion::SizeSuffixToBytes)
            .with("bufsz", Conversion::SizeSuffixToBytes)
            .otherwise(Conversion::Float);

        Ok(Assembler::new("fma.fmstat")
            .fields(&self.config.fmstat_fields)
            .units(units)
            .filter("module", &self.config.fmstat_modules)
            .assemble(entities))
    }

    fn fmadm(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError> {
        let output = env.runner.run_privileged(FMADM, &["faulty"])?;
        let entities = problem_classes(&output).into_iter().map(|class| {
            let stat = RawStat::new(class.as_str(), TypedValue::Unsigned(1), ValueKind::Gauge);
            Entity::from_stats(class, vec![stat])
        });

        Ok(Assembler::new("fma.fmadm")
            .mode(AggregationMode::Aggregate)
            .assemble(entities))
    }
}

impl Collector for FmaCollector {
    fn name(&self) -> &'static str {
        "fma"
    }

    fn gather(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError> {
        let mut metrics = Vec::new();
        if self.config.fmstat {
            metrics.extend(self.fmstat(env)?);
        }
        if self.config.fmadm {
            metrics.extend(self.fmadm(env)?);
        }
        Ok(metrics)
    }
}
