//! Folding per-entity values into buckets.
//!
//! Sums start from zero on every pass; the engine reports raw counter values
//! and leaves rates to whoever consumes the metrics.

use std::collections::{BTreeMap, HashMap};

use crate::model::Number;

/// How per-entity values leave the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AggregationMode {
    /// One metric per entity.
    #[default]
    PerEntity,
    /// One metric holding every entity's fields, keyed by entity.
    Flattened,
    /// One metric; each field is the sum over all entities.
    Aggregate,
}

/// Per-pass accumulator. `key` is `None` for the aggregate bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregationBucket {
    pub key: Option<String>,
    pub sums: BTreeMap<String, Number>,
}

/// Collects field values into buckets according to an [`AggregationMode`].
///
/// Buckets come out in the order their entity was first seen.
#[derive(Debug)]
pub struct Aggregator {
    mode: AggregationMode,
    buckets: Vec<AggregationBucket>,
    index: HashMap<Option<String>, usize>,
}

impl Aggregator {
    pub fn new(mode: AggregationMode) -> Self {
        Self {
            mode,
            buckets: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    /// Adds `value` to `field` of `entity`'s bucket (or of the single
    /// aggregate bucket).
    pub fn add(&mut self, entity: &str, field: &str, value: Number) {
        let bucket = self.bucket(entity);
        bucket
            .sums
            .entry(field.to_string())
            .and_modify(|sum| *sum = sum.add(value))
            .or_insert(value);
    }

    fn bucket(&mut self, entity: &str) -> &mut AggregationBucket {
        let key = match self.mode {
            AggregationMode::Aggregate => None,
            AggregationMode::PerEntity | AggregationMode::Flattened => Some(entity.to_string()),
        };
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.buckets.push(AggregationBucket {
                    key: key.clone(),
                    sums: BTreeMap::new(),
                });
                self.index.insert(key, self.buckets.len() - 1);
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[idx]
    }

    pub fn finish(self) -> Vec<AggregationBucket> {
        self.buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(mode: AggregationMode) -> Vec<AggregationBucket> {
        let mut agg = Aggregator::new(mode);
        agg.add("cpu0", "f", Number::Unsigned(3));
        agg.add("cpu1", "f", Number::Unsigned(5));
        agg.add("cpu2", "f", Number::Unsigned(7));
        agg.finish()
    }

    #[test]
    fn test_aggregate_sums_entities() {
        let buckets = feed(AggregationMode::Aggregate);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].key, None);
        assert_eq!(buckets[0].sums.get("f"), Some(&Number::Unsigned(15)));
    }

    #[test]
    fn test_per_entity_keeps_values_apart() {
        let buckets = feed(AggregationMode::PerEntity);
        let got: Vec<_> = buckets
            .iter()
            .map(|b| (b.key.as_deref().unwrap(), b.sums["f"]))
            .collect();
        assert_eq!(
            got,
            vec![
                ("cpu0", Number::Unsigned(3)),
                ("cpu1", Number::Unsigned(5)),
                ("cpu2", Number::Unsigned(7)),
            ]
        );
    }

    #[test]
    fn test_aggregate_uses_64_bit_width() {
        let mut agg = Aggregator::new(AggregationMode::Aggregate);
        let big = u64::from(u32::MAX) + 10;
        agg.add("cpu0", "pgin", Number::Unsigned(big));
        agg.add("cpu1", "pgin", Number::Unsigned(big));
        let buckets = agg.finish();
        assert_eq!(buckets[0].sums["pgin"], Number::Unsigned(big * 2));
    }

    #[test]
    fn test_each_pass_starts_from_zero() {
        assert_eq!(feed(AggregationMode::Aggregate), feed(AggregationMode::Aggregate));
    }
}
