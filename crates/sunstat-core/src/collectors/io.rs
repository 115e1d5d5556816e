//! Cumulative disk and pool I/O from kstat class `disk`.

use tracing::debug;

use crate::assemble::{Assembler, Entity};
use crate::config::IoConfig;
use crate::correlate::{Attributes, Correlation, CorrelationTable, Fallback};
use crate::error::CollectError;
use crate::model::{Metric, RawStat, TypedValue, ValueKind};
use crate::source::KstatSession;

use super::disk_health::device_name;
use super::{Collector, PollEnv};

/// Product and serial number of every device with an error kstat, keyed by
/// device name.
fn disk_identities(session: &KstatSession) -> CorrelationTable {
    let mut table = CorrelationTable::new();
    for group in session.class("device_error") {
        let mut attributes = Attributes::new();
        for (stat, tag) in [("Product", "product"), ("Serial No", "ser_no")] {
            if let Some(value) = group.value(stat).and_then(TypedValue::as_text)
                && !value.is_empty()
            {
                attributes.insert(tag.to_string(), value.to_string());
            }
        }
        table.insert(device_name(&group.id.name), attributes);
    }
    table
}

pub struct IoCollector {
    config: IoConfig,
}

impl IoCollector {
    pub fn new(config: IoConfig) -> Self {
        Self { config }
    }
}

impl Collector for IoCollector {
    fn name(&self) -> &'static str {
        "io"
    }

    fn gather(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError> {
        let session = env.kstat.open()?;
        let identities = disk_identities(&session);

        let entities = session.class("disk").filter_map(|g| {
            let Some(io) = g.io() else {
                debug!(group = %g.id, "disk kstat without I/O counters");
                return None;
            };
            let stats = io
                .fields()
                .into_iter()
                .map(|(name, value)| {
                    let kind = match name {
                        "wcnt" | "rcnt" => ValueKind::Gauge,
                        _ => ValueKind::Counter,
                    };
                    RawStat::new(name, TypedValue::Unsigned(value), kind)
                })
                .collect();
            Some(
                Entity::from_stats(g.id.name.as_str(), stats)
                    .with_tag("module", g.id.module.as_str())
                    .with_tag("device", g.id.name.as_str()),
            )
        });

        Ok(Assembler::new("io")
            .fields(&self.config.fields)
            .correlate(Correlation::new(&identities, Fallback::none()))
            .filter("module", &self.config.modules)
            .filter("device", &self.config.devices)
            .assemble(entities))
    }
}
