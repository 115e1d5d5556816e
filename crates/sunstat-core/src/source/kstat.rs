//! Hierarchical stat source: the kernel statistics chain.
//!
//! A kstat is addressed as `module:instance:name:statistic`. `kstat -p`
//! prints one statistic per line, key and value separated by a tab:
//!
//! ```text
//! cpu:0:sys:cpu_nsec_kernel	31203774025847
//! sderr:6:sd6,err:Vendor	WD
//! ```
//!
//! The pseudo-statistic `class` becomes the group's class instead of a stat.
//! Groups of class `disk` additionally expose their counters as [`IoStats`].
//!
//! [`IoStats`]: crate::model::IoStats

use std::collections::HashMap;

use tracing::{trace, warn};

use crate::error::ParseError;
use crate::model::{GroupId, RawStat, StatGroup, TypedValue, ValueKind};

/// Integer statistics that describe current state rather than counting events.
const GAUGES: &[&str] = &[
    "availrmem",
    "clock_MHz",
    "current_clock_Hz",
    "freemem",
    "nproc",
    "pagesfree",
    "pagestotal",
    "physcap",
    "physmem",
    "pp_kernel",
    "rcnt",
    "rss",
    "size",
    "swap",
    "swapcap",
    "usage",
    "value",
    "wcnt",
];

/// Statistics that are strings even when they read as numbers, such as a
/// serial number of `000123` or a revision of `0100`.
const TEXT: &[&str] = &[
    "Model",
    "Product",
    "Revision",
    "Serial No",
    "Vendor",
    "brand",
    "cpu_type",
    "fpu_type",
    "implementation",
    "vendor_id",
    "zonename",
];

/// Parses `kstat -p` output into stat groups, in the order groups first appear.
///
/// Lines that cannot be parsed are returned as errors alongside the groups;
/// they never abort the parse.
pub fn parse_kstat_text(content: &str) -> (Vec<StatGroup>, Vec<ParseError>) {
    let mut groups: Vec<StatGroup> = Vec::new();
    let mut index: HashMap<GroupId, usize> = HashMap::new();
    let mut errors = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }

        let Some((key, raw_value)) = line.split_once('\t') else {
            errors.push(ParseError::new(line_no, "missing tab between key and value"));
            continue;
        };

        let parts: Vec<&str> = key.splitn(4, ':').collect();
        let [module, instance, name, statistic] = parts[..] else {
            errors.push(ParseError::new(
                line_no,
                format!("expected module:instance:name:statistic, got '{key}'"),
            ));
            continue;
        };

        let Ok(instance) = instance.parse::<u32>() else {
            errors.push(ParseError::new(
                line_no,
                format!("invalid instance '{instance}'"),
            ));
            continue;
        };

        let id = GroupId::new(module, instance, name);
        let idx = *index.entry(id.clone()).or_insert_with(|| {
            groups.push(StatGroup::new(id, ""));
            groups.len() - 1
        });
        let group = &mut groups[idx];

        if statistic == "class" {
            group.class = raw_value.trim().to_string();
            continue;
        }

        let value = if TEXT.contains(&statistic) {
            TypedValue::Text(raw_value.trim().to_string())
        } else {
            TypedValue::infer(raw_value)
        };
        let kind = value_kind(statistic, &value);
        if !group.push(RawStat::new(statistic, value, kind)) {
            errors.push(ParseError::new(
                line_no,
                format!("duplicate statistic {}:{statistic}", group.id),
            ));
        }
    }

    for group in &mut groups {
        group.seal();
    }

    (groups, errors)
}

fn value_kind(statistic: &str, value: &TypedValue) -> ValueKind {
    match value {
        TypedValue::Unsigned(_) | TypedValue::Signed(_) if !GAUGES.contains(&statistic) => {
            ValueKind::Counter
        }
        _ => ValueKind::Gauge,
    }
}

/// A snapshot of the kstat chain, valid for one poll.
///
/// Dropping the session releases it; collectors open one at the start of a
/// poll and let it fall out of scope on every exit path.
#[derive(Debug)]
pub struct KstatSession {
    groups: Vec<StatGroup>,
}

impl KstatSession {
    pub fn new(groups: Vec<StatGroup>) -> Self {
        trace!(groups = groups.len(), "kstat session opened");
        Self { groups }
    }

    /// Builds a session from `kstat -p` text, reporting and skipping bad lines.
    pub fn from_text(content: &str) -> Self {
        let (groups, errors) = parse_kstat_text(content);
        for error in &errors {
            warn!(line = error.line, error = %error.message, "skipping kstat line");
        }
        Self::new(groups)
    }

    /// All groups of a module, e.g. `cpu` or `link`.
    pub fn module<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a StatGroup> + 'a {
        self.groups.iter().filter(move |g| g.id.module == module)
    }

    /// All groups of a class, e.g. `disk` or `device_error`.
    pub fn class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a StatGroup> + 'a {
        self.groups.iter().filter(move |g| g.class == class)
    }

    pub fn group(&self, module: &str, instance: u32, name: &str) -> Option<&StatGroup> {
        self.groups
            .iter()
            .find(|g| g.id.module == module && g.id.instance == instance && g.id.name == name)
    }

    /// Looks up a single statistic by its full `module:instance:name:statistic` path.
    pub fn stat(&self, path: &str) -> Option<&TypedValue> {
        let parts: Vec<&str> = path.splitn(4, ':').collect();
        let [module, instance, name, statistic] = parts[..] else {
            return None;
        };
        let instance = instance.parse().ok()?;
        self.group(module, instance, name)?.value(statistic)
    }

    pub fn groups(&self) -> &[StatGroup] {
        &self.groups
    }
}

impl Drop for KstatSession {
    fn drop(&mut self) {
        trace!(groups = self.groups.len(), "kstat session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IoStats;

    const SDERR: &str = "\
sderr:6:sd6,err:class\tdevice_error
sderr:6:sd6,err:Device Not Ready\t0
sderr:6:sd6,err:Hard Errors\t0
sderr:6:sd6,err:Illegal Request\t1148
sderr:6:sd6,err:Media Error\t0
sderr:6:sd6,err:No Device\t0
sderr:6:sd6,err:Predictive Failure Analysis\t0
sderr:6:sd6,err:Product\tMy Passport 2627
sderr:6:sd6,err:Recoverable\t0
sderr:6:sd6,err:Revision\t4008
sderr:6:sd6,err:Serial No\tWXP1E7916Z6K
sderr:6:sd6,err:Size\t2000365289472
sderr:6:sd6,err:Soft Errors\t0
sderr:6:sd6,err:Transport Errors\t0
sderr:6:sd6,err:Vendor\tWD
sderr:6:sd6,err:crtime\t28.410858027
sderr:6:sd6,err:snaptime\t2041913.412061448
";

    #[test]
    fn test_parse_named_group() {
        let (groups, errors) = parse_kstat_text(SDERR);
        assert!(errors.is_empty());
        assert_eq!(groups.len(), 1);

        let group = &groups[0];
        assert_eq!(group.id, GroupId::new("sderr", 6, "sd6,err"));
        assert_eq!(group.class, "device_error");
        assert_eq!(group.stats().len(), 16);
        assert_eq!(
            group.value("Illegal Request"),
            Some(&TypedValue::Unsigned(1148))
        );
        assert_eq!(
            group.value("Vendor"),
            Some(&TypedValue::Text("WD".to_string()))
        );
        assert_eq!(
            group.value("Revision"),
            Some(&TypedValue::Text("4008".to_string()))
        );
        assert_eq!(group.value("crtime"), Some(&TypedValue::Float(28.410858027)));
        assert_eq!(group.get("Hard Errors").unwrap().kind, ValueKind::Counter);
        assert_eq!(group.get("Vendor").unwrap().kind, ValueKind::Gauge);
    }

    #[test]
    fn test_identity_strings_keep_leading_zeroes() {
        let content = "\
sderr:6:sd6,err:Serial No\t000123
sderr:6:sd6,err:Revision\t0100
sderr:6:sd6,err:Hard Errors\t0
";
        let session = KstatSession::from_text(content);
        let group = session.group("sderr", 6, "sd6,err").unwrap();
        assert_eq!(
            group.value("Serial No"),
            Some(&TypedValue::Text("000123".to_string()))
        );
        assert_eq!(
            group.value("Revision"),
            Some(&TypedValue::Text("0100".to_string()))
        );
        assert_eq!(group.value("Hard Errors"), Some(&TypedValue::Unsigned(0)));
    }

    #[test]
    fn test_bad_lines_are_reported_not_fatal() {
        let content = "\
cpu:0:sys:cpu_nsec_user\t100
this line has no tab
cpu:x:sys:cpu_nsec_user\t100
cpu:0:sys\t5
cpu:0:sys:cpu_nsec_user\t200
cpu:0:sys:cpu_nsec_kernel\t300
";
        let (groups, errors) = parse_kstat_text(content);
        let lines: Vec<usize> = errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 3, 4, 5]);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].value("cpu_nsec_user"),
            Some(&TypedValue::Unsigned(100))
        );
        assert_eq!(
            groups[0].value("cpu_nsec_kernel"),
            Some(&TypedValue::Unsigned(300))
        );
    }

    #[test]
    fn test_disk_groups_expose_io_record() {
        let mut content = String::from("sd:0:sd0:class\tdisk\n");
        for (i, name) in IoStats::FIELDS.iter().enumerate() {
            content.push_str(&format!("sd:0:sd0:{name}\t{}\n", i * 10));
        }
        let session = KstatSession::from_text(&content);
        let group = session.class("disk").next().unwrap();
        let io = group.io().unwrap();
        assert_eq!(io.nwritten, 10);
        assert_eq!(io.rcnt, 110);
        // The flat view is still there.
        assert_eq!(group.value("reads"), Some(&TypedValue::Unsigned(20)));
    }

    #[test]
    fn test_session_lookups() {
        let content = "\
unix:0:system_pages:pp_kernel\t52000
unix:0:system_pages:pagesfree\t1000
cpu:0:vm:pgin\t3
cpu:1:vm:pgin\t5
cpu:0:sys:cpu_nsec_user\t7
";
        let session = KstatSession::from_text(content);
        assert_eq!(
            session.stat("unix:0:system_pages:pp_kernel"),
            Some(&TypedValue::Unsigned(52000))
        );
        assert_eq!(session.stat("unix:0:system_pages:missing"), None);
        assert_eq!(session.stat("unix:zero:system_pages:pp_kernel"), None);
        assert_eq!(session.stat("nonsense"), None);
        assert_eq!(session.module("cpu").count(), 3);
        assert!(session.group("cpu", 1, "vm").is_some());
        assert_eq!(
            session.group("unix", 0, "system_pages").unwrap().get("pagesfree").unwrap().kind,
            ValueKind::Gauge
        );
    }
}
