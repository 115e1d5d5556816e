//! Memory: kernel and ARC size, free list, vminfo, per-CPU paging and swap.

use tracing::debug;

use crate::aggregate::AggregationMode;
use crate::assemble::{Assembler, Entity, UnitTable};
use crate::config::MemoryConfig;
use crate::convert::Conversion;
use crate::error::CollectError;
use crate::model::{Metric, RawStat, TypedValue, ValueKind};
use crate::source::KstatSession;

use super::{Collector, PollEnv};

const SWAP: &str = "/usr/sbin/swap";

/// Names given to the four sizes `swap -s` prints, in order.
const SWAP_FIELDS: [&str; 4] = ["allocated", "reserved", "used", "available"];

/// Page counts of `unix:0:vminfo`.
const VMINFO_PAGES: [&str; 5] = ["freemem", "swap_alloc", "swap_avail", "swap_free", "swap_resv"];

/// Parses `swap -s`:
///
/// ```text
/// total: 2852796k bytes allocated + 413860k reserved = 3266656k used, 12044664k available
/// ```
///
/// Sizes stay text; the `k` suffix is converted by the unit rules.
fn parse_swap(content: &str) -> Result<Vec<RawStat>, CollectError> {
    let line = content.trim();
    let sizes: Vec<&str> = line
        .split_whitespace()
        .map(|token| token.trim_end_matches(','))
        .filter(|token| token.ends_with('k') && token.starts_with(|c: char| c.is_ascii_digit()))
        .collect();

    if !line.starts_with("total:") || sizes.len() != SWAP_FIELDS.len() {
        return Err(CollectError::Output {
            command: format!("{SWAP} -s"),
            message: format!("cannot parse '{line}'"),
        });
    }

    Ok(SWAP_FIELDS
        .iter()
        .zip(sizes)
        .map(|(name, size)| RawStat::new(*name, TypedValue::Text(size.to_string()), ValueKind::Gauge))
        .collect())
}

pub struct MemoryCollector {
    config: MemoryConfig,
}

impl MemoryCollector {
    pub fn new(config: MemoryConfig) -> Self {
        Self { config }
    }

    fn misc(&self, session: &KstatSession, pages: Conversion) -> Vec<Metric> {
        let mut stats = Vec::new();
        for (name, path) in [
            ("kernel", "unix:0:system_pages:pp_kernel"),
            ("arcsize", "zfs:0:arcstats:size"),
            ("freelist", "unix:0:system_pages:pagesfree"),
        ] {
            match session.stat(path) {
                Some(value) => stats.push(RawStat::new(name, value.clone(), ValueKind::Gauge)),
                None => debug!(stat = path, "kstat not found"),
            }
        }

        Assembler::new("memory")
            .fields(&self.config.fields)
            .units(UnitTable::new().with("kernel", pages).with("freelist", pages))
            .assemble([Entity::from_stats("memory", stats)])
    }

    fn cpu_vm(&self, session: &KstatSession) -> Vec<Metric> {
        let (mode, prefix) = if self.config.per_cpu_vm {
            (AggregationMode::Flattened, "cpu.vm")
        } else {
            (AggregationMode::Aggregate, "vm")
        };
        let entities = session
            .module("cpu")
            .filter(|g| g.id.name == "vm")
            .map(|g| Entity::from_group(g.id.instance.to_string(), g));

        Assembler::new("memory")
            .fields(&self.config.cpu_vm_fields)
            .mode(mode)
            .prefix(prefix)
            .assemble(entities)
    }

    fn vminfo(&self, session: &KstatSession, pages: Conversion) -> Vec<Metric> {
        let Some(group) = session.group("unix", 0, "vminfo") else {
            debug!("kstat unix:0:vminfo not found");
            return Vec::new();
        };
        let units = VMINFO_PAGES
            .into_iter()
            .fold(UnitTable::new(), |units, name| units.with(name, pages));

        Assembler::new("memory.vminfo")
            .fields(&self.config.vminfo_fields)
            .units(units)
            .assemble([Entity::from_group("vminfo", group)])
    }

    fn swap(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError> {
        let output = env.runner.run(SWAP, &["-s"])?;
        let stats = parse_swap(&output)?;

        Ok(Assembler::new("memory.swap")
            .fields(&self.config.swap_fields)
            .units(UnitTable::new().otherwise(Conversion::KSuffixToBytes))
            .assemble([Entity::from_stats("swap", stats)]))
    }
}

impl Collector for MemoryCollector {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn gather(&self, env: &PollEnv<'_>) -> Result<Vec<Metric>, CollectError> {
        let pages = Conversion::PagesToBytes {
            page_size: env.host.page_size(),
        };
        let mut metrics = Vec::new();
        {
            let session = env.kstat.open()?;
            metrics.extend(self.misc(&session, pages));
            metrics.extend(self.cpu_vm(&session));
            if !self.config.vminfo_fields.is_empty() {
                metrics.extend(self.vminfo(&session, pages));
            }
        }
        if !self.config.swap_fields.is_empty() {
            metrics.extend(self.swap(env)?);
        }
        Ok(metrics)
    }
}
