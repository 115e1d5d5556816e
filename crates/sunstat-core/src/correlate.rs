//! Correlation tables: key → attributes lookups built from a second source.
//!
//! A table is built fresh on every poll (zones come and go, VNICs move) and
//! dropped with it. A lookup that misses falls back to a [`Fallback`] rather
//! than losing the entity.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::error::ConfigError;

/// Descriptive attributes of one entity, e.g. `zone`, `link`, `speed`.
pub type Attributes = BTreeMap<String, String>;

/// One entry of a [`CorrelationTable`].
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationEntry {
    pub key: String,
    pub attributes: Attributes,
}

/// Insertion-ordered key → attributes map.
#[derive(Clone, Debug, Default)]
pub struct CorrelationTable {
    entries: Vec<CorrelationEntry>,
    index: HashMap<String, usize>,
}

impl CorrelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing the attributes of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, attributes: Attributes) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&idx) => self.entries[idx].attributes = attributes,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(CorrelationEntry { key, attributes });
            }
        }
    }

    pub fn lookup(&self, key: &str) -> Option<&Attributes> {
        self.index.get(key).map(|&idx| &self.entries[idx].attributes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CorrelationEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Attributes used when a key is not in the table.
///
/// Values are never empty. The missing key itself can be copied into one
/// attribute, so a VNIC nobody owns still reports its own name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fallback {
    attributes: Attributes,
    key_attribute: Option<String>,
}

impl Fallback {
    /// A fallback that adds nothing: the entity is kept without attributes.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new<I, K, V>(attributes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Attributes::new();
        for (k, v) in attributes {
            let (k, v) = (k.into(), v.into());
            if v.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "fallback attribute '{k}' has an empty value"
                )));
            }
            map.insert(k, v);
        }
        Ok(Self {
            attributes: map,
            key_attribute: None,
        })
    }

    /// Copies the looked-up key into `attribute`.
    pub fn with_key_as(mut self, attribute: impl Into<String>) -> Self {
        self.key_attribute = Some(attribute.into());
        self
    }

    fn attributes_for(&self, key: &str) -> Attributes {
        let mut attributes = self.attributes.clone();
        if let Some(attr) = &self.key_attribute
            && !key.is_empty()
        {
            attributes.insert(attr.clone(), key.to_string());
        }
        attributes
    }
}

/// A table paired with the fallback policy for its misses.
#[derive(Clone, Debug)]
pub struct Correlation<'t> {
    table: &'t CorrelationTable,
    fallback: Fallback,
}

impl<'t> Correlation<'t> {
    pub fn new(table: &'t CorrelationTable, fallback: Fallback) -> Self {
        Self { table, fallback }
    }

    /// The attributes for `key`, or the fallback's if the table has no entry.
    pub fn resolve(&self, key: &str) -> Attributes {
        match self.table.lookup(key) {
            Some(attributes) => attributes.clone(),
            None => {
                debug!(key, "no correlation entry, using fallback");
                self.fallback.attributes_for(key)
            }
        }
    }
}

/// Builds the VNIC table from `dladm show-vnic -p -o link,over,speed,zone`.
///
/// Keyed by VNIC name; attributes are `zone`, `link` (the physical link the
/// VNIC sits on), `speed` (`<n>mbit`) and `name`. A VNIC assigned to no zone
/// is left out, so lookups for it take the fallback.
pub fn parse_vnics(content: &str) -> CorrelationTable {
    let mut table = CorrelationTable::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.trim().split(':').collect();
        let [name, over, speed, zone] = parts[..] else {
            warn!(line = i + 1, content = line, "skipping malformed dladm line");
            continue;
        };
        if zone.is_empty() {
            debug!(vnic = name, "vnic without a zone");
            continue;
        }
        table.insert(
            name,
            Attributes::from([
                ("zone".to_string(), zone.to_string()),
                ("link".to_string(), over.to_string()),
                ("speed".to_string(), format!("{speed}mbit")),
                ("name".to_string(), name.to_string()),
            ]),
        );
    }
    table
}

/// One line of `zoneadm list -cp`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneInfo {
    /// `None` for zones that are not running (`-` in the output).
    pub id: Option<u32>,
    pub name: String,
    pub status: String,
    pub path: String,
    pub uuid: String,
    pub brand: String,
    pub ip_type: String,
}

/// Parses `zoneadm list -cp` output:
/// `id:name:status:path:uuid:brand:ip-type[:debugid]`.
pub fn parse_zones(content: &str) -> Vec<ZoneInfo> {
    let mut zones = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.trim().split(':').collect();
        if parts.len() < 7 {
            warn!(line = i + 1, content = line, "skipping malformed zoneadm line");
            continue;
        }
        zones.push(ZoneInfo {
            id: parts[0].parse().ok(),
            name: parts[1].to_string(),
            status: parts[2].to_string(),
            path: parts[3].to_string(),
            uuid: parts[4].to_string(),
            brand: parts[5].to_string(),
            ip_type: parts[6].to_string(),
        });
    }
    zones
}

/// The zone list as a table keyed by zone name, with `status`, `brand` and
/// `ipType` attributes.
pub fn zone_table(zones: &[ZoneInfo]) -> CorrelationTable {
    let mut table = CorrelationTable::new();
    for zone in zones {
        table.insert(
            zone.name.as_str(),
            Attributes::from([
                ("status".to_string(), zone.status.clone()),
                ("brand".to_string(), zone.brand.clone()),
                ("ipType".to_string(), zone.ip_type.clone()),
            ]),
        );
    }
    table
}

/// Builds the contract → service table from `svcs -vHo ctid,fmri`.
///
/// Services without a contract print `-` and are left out.
pub fn parse_contracts(content: &str) -> CorrelationTable {
    let mut table = CorrelationTable::new();
    for (i, line) in content.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let (Some(ctid), Some(fmri), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            if !line.trim().is_empty() {
                warn!(line = i + 1, content = line, "skipping malformed svcs line");
            }
            continue;
        };
        if ctid.parse::<u64>().is_err() {
            continue;
        }
        table.insert(ctid, Attributes::from([("fmri".to_string(), fmri.to_string())]));
    }
    table
}
