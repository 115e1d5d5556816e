//! Raw stats as they come out of a source, before any selection or conversion.

use std::fmt;

use super::metric::Number;

/// A single raw value. Sources decide the variant at their boundary; nothing
/// downstream probes types at runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl TypedValue {
    /// Types a value read from text output.
    ///
    /// Integers that fit in 64 bits stay integers, anything else that parses as
    /// a float becomes a float, and the rest is kept as (trimmed) text.
    pub fn infer(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(v) = raw.parse::<u64>() {
            TypedValue::Unsigned(v)
        } else if let Ok(v) = raw.parse::<i64>() {
            TypedValue::Signed(v)
        } else if let Some(v) = parse_finite(raw) {
            TypedValue::Float(v)
        } else {
            TypedValue::Text(raw.to_string())
        }
    }

    /// `-`, which tabular tools print for a value they do not have.
    pub fn is_absent(&self) -> bool {
        matches!(self, TypedValue::Text(s) if s == "-")
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, TypedValue::Text(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TypedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a field number, keeping its width. `None` for text.
    pub fn as_number(&self) -> Option<Number> {
        match *self {
            TypedValue::Unsigned(v) => Some(Number::Unsigned(v)),
            TypedValue::Signed(v) => Some(Number::Signed(v)),
            TypedValue::Float(v) => Some(Number::Float(v)),
            TypedValue::Text(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            TypedValue::Unsigned(v) => Some(v),
            TypedValue::Signed(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Unsigned(v) => write!(f, "{v}"),
            TypedValue::Signed(v) => write!(f, "{v}"),
            TypedValue::Float(v) => write!(f, "{v}"),
            TypedValue::Text(s) => f.write_str(s),
        }
    }
}

// "inf" and "nan" parse as floats but are never meant as numbers in stat output.
fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whether a value only ever grows (since boot or creation) or reflects the
/// current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Counter,
    Gauge,
}

/// One named value inside a [`StatGroup`].
#[derive(Clone, Debug, PartialEq)]
pub struct RawStat {
    pub name: String,
    pub value: TypedValue,
    pub kind: ValueKind,
}

impl RawStat {
    pub fn new(name: impl Into<String>, value: TypedValue, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            value,
            kind,
        }
    }
}

/// Address of a stat group: `module:instance:name`, as kstat(1M) prints it.
///
/// Tabular sources use the table name as module, the row's line number as
/// instance and the row's key column as name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId {
    pub module: String,
    pub instance: u32,
    pub name: String,
}

impl GroupId {
    pub fn new(module: impl Into<String>, instance: u32, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            instance,
            name: name.into(),
        }
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.module, self.instance, self.name)
    }
}

/// A named, keyed bag of raw stats. Within a group every stat name is unique.
#[derive(Clone, Debug, PartialEq)]
pub struct StatGroup {
    pub id: GroupId,
    pub class: String,
    stats: Vec<RawStat>,
    io: Option<IoStats>,
}

impl StatGroup {
    pub fn new(id: GroupId, class: impl Into<String>) -> Self {
        Self {
            id,
            class: class.into(),
            stats: Vec::new(),
            io: None,
        }
    }

    /// Adds a stat. Returns `false` and leaves the group untouched if a stat
    /// with the same name is already present.
    pub fn push(&mut self, stat: RawStat) -> bool {
        if self.get(&stat.name).is_some() {
            return false;
        }
        self.stats.push(stat);
        true
    }

    pub fn get(&self, name: &str) -> Option<&RawStat> {
        self.stats.iter().find(|s| s.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&TypedValue> {
        self.get(name).map(|s| &s.value)
    }

    /// Stats in the order the source produced them.
    pub fn stats(&self) -> &[RawStat] {
        &self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Pre-structured I/O counters, present for `disk` class groups.
    pub fn io(&self) -> Option<&IoStats> {
        self.io.as_ref()
    }

    /// Builds the I/O record from the flat stats if this is an I/O group.
    pub fn seal(&mut self) {
        if self.class == "disk" {
            self.io = IoStats::from_stats(self);
        }
    }
}

/// Cumulative I/O counters of a `disk` class kstat (`kstat_io_t`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IoStats {
    pub nread: u64,
    pub nwritten: u64,
    pub reads: u64,
    pub writes: u64,
    pub wtime: u64,
    pub wlentime: u64,
    pub wlastupdate: u64,
    pub rtime: u64,
    pub rlentime: u64,
    pub rlastupdate: u64,
    pub wcnt: u64,
    pub rcnt: u64,
}

impl IoStats {
    pub const FIELDS: [&'static str; 12] = [
        "nread",
        "nwritten",
        "reads",
        "writes",
        "wtime",
        "wlentime",
        "wlastupdate",
        "rtime",
        "rlentime",
        "rlastupdate",
        "wcnt",
        "rcnt",
    ];

    fn from_stats(group: &StatGroup) -> Option<Self> {
        let get = |name: &str| group.value(name).and_then(TypedValue::as_u64);
        Some(Self {
            nread: get("nread")?,
            nwritten: get("nwritten")?,
            reads: get("reads")?,
            writes: get("writes")?,
            wtime: get("wtime")?,
            wlentime: get("wlentime")?,
            wlastupdate: get("wlastupdate")?,
            rtime: get("rtime")?,
            rlentime: get("rlentime")?,
            rlastupdate: get("rlastupdate")?,
            wcnt: get("wcnt")?,
            rcnt: get("rcnt")?,
        })
    }

    /// The counters as `(name, value)` pairs, in [`IoStats::FIELDS`] order.
    pub fn fields(&self) -> [(&'static str, u64); 12] {
        [
            ("nread", self.nread),
            ("nwritten", self.nwritten),
            ("reads", self.reads),
            ("writes", self.writes),
            ("wtime", self.wtime),
            ("wlentime", self.wlentime),
            ("wlastupdate", self.wlastupdate),
            ("rtime", self.rtime),
            ("rlentime", self.rlentime),
            ("rlastupdate", self.rlastupdate),
            ("wcnt", self.wcnt),
            ("rcnt", self.rcnt),
        ]
    }
}
