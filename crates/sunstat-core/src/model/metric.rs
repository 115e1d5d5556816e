//! The normalized output shape: a name, numeric fields and string tags.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::debug;

/// A numeric field value in its native width.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Number {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl Number {
    /// Adds two values without narrowing.
    ///
    /// Integer sums stay integers as long as they fit in 64 bits; only an
    /// overflowing sum falls back to a float.
    pub fn add(self, other: Number) -> Number {
        use Number::*;
        match (self, other) {
            (Unsigned(a), Unsigned(b)) => match a.checked_add(b) {
                Some(sum) => Unsigned(sum),
                None => {
                    debug!(a, b, "unsigned sum overflows u64, promoting to float");
                    Float(a as f64 + b as f64)
                }
            },
            (Signed(a), Signed(b)) => match a.checked_add(b) {
                Some(sum) => Signed(sum),
                None => Float(a as f64 + b as f64),
            },
            (Unsigned(u), Signed(s)) | (Signed(s), Unsigned(u)) => {
                let sum = u as i128 + s as i128;
                if let Ok(v) = i64::try_from(sum) {
                    Signed(v)
                } else if let Ok(v) = u64::try_from(sum) {
                    Unsigned(v)
                } else {
                    Float(sum as f64)
                }
            }
            (a, b) => Float(a.as_f64() + b.as_f64()),
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Unsigned(v) => v as f64,
            Number::Signed(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Unsigned(v) => write!(f, "{v}"),
            Number::Signed(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<u64> for Number {
    fn from(v: u64) -> Self {
        Number::Unsigned(v)
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Signed(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

/// Structured field key: optional prefix, optional entity, field name.
///
/// `cpu.vm.3.pgin` is `FieldKey { prefix: "cpu.vm", entity: "3", name: "pgin" }`;
/// the dotted string only exists once the metric is serialized.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub prefix: Option<String>,
    pub entity: Option<String>,
    pub name: String,
}

impl FieldKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            prefix: None,
            entity: None,
            name: name.into(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, "{prefix}.")?;
        }
        if let Some(entity) = &self.entity {
            write!(f, "{entity}.")?;
        }
        f.write_str(&self.name)
    }
}

/// One output record. The engine builds it at the end of a poll pass and
/// hands it over; it keeps no history.
///
/// A key is never both a field and a tag: [`Metric::insert_field`] and
/// [`Metric::insert_tag`] refuse a key the other map already holds.
#[derive(Clone, Debug, PartialEq)]
pub struct Metric {
    pub name: String,
    fields: BTreeMap<FieldKey, Number>,
    tags: BTreeMap<String, String>,
}

impl Metric {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
            tags: BTreeMap::new(),
        }
    }

    /// Inserts or replaces a field. Returns `false` if a tag already uses the
    /// rendered key.
    pub fn insert_field(&mut self, key: FieldKey, value: impl Into<Number>) -> bool {
        if self.tags.contains_key(&key.to_string()) {
            return false;
        }
        self.fields.insert(key, value.into());
        true
    }

    /// Inserts or replaces a tag. Returns `false` if a field already renders
    /// to the same key.
    pub fn insert_tag(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.fields.keys().any(|k| k.to_string() == key) {
            return false;
        }
        self.tags.insert(key, value.into());
        true
    }

    /// Builder-style [`Metric::insert_field`] for a plain field name.
    pub fn with_field(mut self, name: &str, value: impl Into<Number>) -> Self {
        self.insert_field(FieldKey::new(name), value);
        self
    }

    /// Builder-style [`Metric::insert_tag`].
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.insert_tag(key, value);
        self
    }

    /// Looks a field up by its rendered name.
    pub fn field(&self, rendered: &str) -> Option<Number> {
        self.fields
            .iter()
            .find(|(k, _)| k.to_string() == rendered)
            .map(|(_, v)| *v)
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<FieldKey, Number> {
        &self.fields
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Fields keyed by their rendered names.
    pub fn flat_fields(&self) -> BTreeMap<String, Number> {
        self.fields
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Metric", 3)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("fields", &self.flat_fields())?;
        s.serialize_field("tags", &self.tags)?;
        s.end()
    }
}

/// Sorts metrics by name, then tags. The engine emits in source order; this
/// is for consumers that need a stable order.
pub fn sort_metrics(metrics: &mut [Metric]) {
    metrics.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.tags.cmp(&b.tags)));
}
