//! NFS call counters per protocol version from kstat module `nfs`.

use crate::assemble::{Assembler, Entity};
use crate::config::NfsConfig;
use crate::error::CollectError;
use crate::model::{Metric, TypedValue};

use super::{Collector, PollEnv};

/// Which end of NFS to report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NfsSide {
    Client,
    Server,
}

impl NfsSide {
    /// Group name prefix, followed by the version number.
    fn group_prefix(self) -> &'static str {
        match self {
            NfsSide::Client => "rfsreqcnt_v",
            NfsSide::Server => "rfsproccnt_v",
        }
    }

    fn metric(self) -> &'static str {
        match self {
            NfsSide::Client => "nfs.client",
            NfsSide::Server => "nfs.server",
        }
    }
}

pub struct NfsCollector {
    side: NfsSide,
    config: NfsConfig,
}

impl NfsCollector {
    pub fn new(side: NfsSide, config: NfsConfig) -> Self {
        Self { side, config }
    }
}

impl Collector for NfsCollector {
    fn name(&self) -> &'static str {
        match self.side {
            NfsSide::Client => "nfs_client",
            NfsSide::Server => "nfs_server",
        }
    }

    fn gather(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError> {
        let session = env.kstat.open()?;
        let prefix = self.side.group_prefix();

        let entities = session.module("nfs").filter_map(|g| {
            let number = g.id.name.strip_prefix(prefix)?;
            let version = format!("v{number}");
            let stats = g
                .stats()
                .iter()
                .filter(|s| matches!(s.value, TypedValue::Unsigned(_) | TypedValue::Signed(_)))
                .cloned()
                .collect();
            Some(Entity::from_stats(version.as_str(), stats).with_tag("nfsVersion", version))
        });

        Ok(Assembler::new(self.side.metric())
            .fields(&self.config.fields)
            .filter("nfsVersion", &self.config.nfs_versions)
            .assemble(entities))
    }
}
