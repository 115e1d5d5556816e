//! Network link counters from kstat module `link`, tagged with the zone
//! that owns each VNIC.

use tracing::warn;

use crate::assemble::{Assembler, Entity};
use crate::config::NetworkConfig;
use crate::correlate::{Correlation, CorrelationTable, Fallback, parse_vnics};
use crate::error::CollectError;
use crate::model::Metric;

use super::{Collector, PollEnv};

const DLADM: &str = "/usr/sbin/dladm";
const SHOW_VNIC: &[&str] = &["show-vnic", "-p", "-o", "link,over,speed,zone"];

pub struct NetworkCollector {
    config: NetworkConfig,
}

impl NetworkCollector {
    pub fn new(config: NetworkConfig) -> Self {
        Self { config }
    }

    /// The VNIC table, or an empty one where `dladm` may not run (inside a
    /// non-global zone every link then belongs to the local zone).
    fn vnics(&self, env: &PollEnv<'_>) -> CorrelationTable {
        match env.runner.run(DLADM, SHOW_VNIC) {
            Ok(output) => parse_vnics(&output),
            Err(error) => {
                warn!(%error, "cannot list VNICs, attributing links to the local zone");
                CorrelationTable::new()
            }
        }
    }
}

impl Collector for NetworkCollector {
    fn name(&self) -> &'static str {
        "network"
    }

    fn gather(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError> {
        let vnics = self.vnics(env);
        let fallback = Fallback::new([
            ("zone", env.host.zone_name()),
            ("link", "none"),
            ("speed", "unknown"),
        ])?
        .with_key_as("name");

        let session = env.kstat.open()?;
        let entities = session
            .module("link")
            .map(|g| Entity::from_group(g.id.name.as_str(), g).with_dim("vnic", g.id.name.as_str()));

        Ok(Assembler::new("net")
            .fields(&self.config.fields)
            .correlate(Correlation::new(&vnics, fallback))
            .filter("vnic", &self.config.vnics)
            .filter("zone", &self.config.zones)
            .assemble(entities))
    }
}
