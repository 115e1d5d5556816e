//! Metric assembly.
//!
//! An [`Assembler`] is one collector's recipe: metric name, field and tag
//! allow-lists, per-field unit rules, naming, aggregation mode, entity
//! filters and an optional correlation. Given the entities of one poll it
//! runs, for each entity in source order:
//!
//! 1. correlation lookup (or fallback), merged into the entity's tags;
//! 2. entity filters, skipping the whole entity on the first miss. They run
//!    after the lookup so they can match correlated attributes, such as the
//!    zone owning a VNIC;
//! 3. routing of every stat to a field, a tag, or nowhere;
//! 4. unit conversion of the selected fields;
//! 5. aggregation;
//!
//! and finally emits one metric per entity or bucket. Nothing survives
//! between calls.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace, warn};

use crate::aggregate::{AggregationMode, Aggregator};
use crate::convert::Conversion;
use crate::correlate::Correlation;
use crate::error::AssembleError;
use crate::model::{FieldKey, Metric, Number, RawStat, StatGroup};
use crate::select::{AllowList, want};

static ALLOW_ALL: AllowList = AllowList::all();

/// How raw stat names become field and tag names.
#[derive(Clone, Copy, Debug, Default)]
pub enum Naming {
    #[default]
    Verbatim,
    /// `Hard Errors` → `hardErrors`.
    CamelCase,
    /// Listed names are renamed, the rest kept.
    Map(&'static [(&'static str, &'static str)]),
    With(fn(&str) -> String),
}

impl Naming {
    pub fn apply(&self, name: &str) -> String {
        match self {
            Naming::Verbatim => name.to_string(),
            Naming::CamelCase => camel_case(name),
            Naming::Map(pairs) => pairs
                .iter()
                .find(|(from, _)| *from == name)
                .map_or_else(|| name.to_string(), |(_, to)| to.to_string()),
            Naming::With(f) => f(name),
        }
    }
}

/// Lower-cases a space-separated name and joins the words camel-style.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, word) in name.split_whitespace().enumerate() {
        let word = word.to_lowercase();
        if i == 0 {
            out.push_str(&word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Per-field conversion rules, looked up by raw stat name.
#[derive(Clone, Debug, Default)]
pub struct UnitTable {
    rules: Vec<(&'static str, Conversion)>,
    otherwise: Option<Conversion>,
}

impl UnitTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &'static str, rule: Conversion) -> Self {
        self.rules.push((field, rule));
        self
    }

    /// Rule for every field without one of its own.
    pub fn otherwise(mut self, rule: Conversion) -> Self {
        self.otherwise = Some(rule);
        self
    }

    pub fn rule(&self, field: &str) -> Option<Conversion> {
        self.rules
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, rule)| *rule)
            .or(self.otherwise)
    }
}

/// One entity of a poll: a CPU, a device, a zone, a pool.
///
/// Dimensions are what entity filters look at; tags go straight onto the
/// entity's metric. Filters also see tags, so correlated attributes can be
/// filtered on.
#[derive(Clone, Debug)]
pub struct Entity<'g> {
    key: String,
    stats: Cow<'g, [RawStat]>,
    tags: Vec<(String, String)>,
    dims: Vec<(String, String)>,
}

impl<'g> Entity<'g> {
    pub fn from_group(key: impl Into<String>, group: &'g StatGroup) -> Self {
        Self::new(key.into(), Cow::Borrowed(group.stats()))
    }

    pub fn from_stats(key: impl Into<String>, stats: Vec<RawStat>) -> Self {
        Self::new(key.into(), Cow::Owned(stats))
    }

    fn new(key: String, stats: Cow<'g, [RawStat]>) -> Self {
        Self {
            key,
            stats,
            tags: Vec::new(),
            dims: Vec::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    pub fn with_dim(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dims.push((key.into(), value.into()));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn dimension(&self, name: &str) -> Option<&str> {
        self.dims
            .iter()
            .chain(self.tags.iter())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug)]
struct EntityFilter<'a> {
    dimension: &'static str,
    allow: &'a AllowList,
}

/// An entity after routing and conversion.
#[derive(Debug, Default)]
struct Shaped {
    fields: Vec<(String, Number)>,
    tags: BTreeMap<String, String>,
}

/// A collector's assembly recipe. See the module documentation.
#[derive(Clone, Debug)]
pub struct Assembler<'a> {
    metric: String,
    fields: &'a AllowList,
    tags: Option<&'a AllowList>,
    units: UnitTable,
    naming: Naming,
    mode: AggregationMode,
    prefix: Option<String>,
    filters: Vec<EntityFilter<'a>>,
    correlation: Option<Correlation<'a>>,
}

impl<'a> Assembler<'a> {
    /// A recipe that keeps every numeric stat as a field and makes no tags
    /// from stats.
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            fields: &ALLOW_ALL,
            tags: None,
            units: UnitTable::new(),
            naming: Naming::Verbatim,
            mode: AggregationMode::PerEntity,
            prefix: None,
            filters: Vec::new(),
            correlation: None,
        }
    }

    pub fn fields(mut self, allow: &'a AllowList) -> Self {
        self.fields = allow;
        self
    }

    /// Lets stats not kept as fields become tags when `allow` wants them.
    pub fn tags(mut self, allow: &'a AllowList) -> Self {
        self.tags = Some(allow);
        self
    }

    pub fn units(mut self, units: UnitTable) -> Self {
        self.units = units;
        self
    }

    pub fn naming(mut self, naming: Naming) -> Self {
        self.naming = naming;
        self
    }

    pub fn mode(mut self, mode: AggregationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Prefix for field keys, e.g. `vm` for `vm.pgin`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Skips entities whose `dimension` is not wanted by `allow`.
    pub fn filter(mut self, dimension: &'static str, allow: &'a AllowList) -> Self {
        self.filters.push(EntityFilter { dimension, allow });
        self
    }

    pub fn correlate(mut self, correlation: Correlation<'a>) -> Self {
        self.correlation = Some(correlation);
        self
    }

    /// Runs one pass over `entities` and returns the metrics in source order.
    ///
    /// Entities that fail to assemble are logged and skipped; they never
    /// abort the pass.
    pub fn assemble<'g>(&self, entities: impl IntoIterator<Item = Entity<'g>>) -> Vec<Metric> {
        let mut aggregator = Aggregator::new(self.mode);
        let mut entity_tags: HashMap<String, BTreeMap<String, String>> = HashMap::new();

        for mut entity in entities {
            if let Some(correlation) = &self.correlation {
                entity.tags.extend(correlation.resolve(&entity.key));
            }

            if let Some(filter) = self
                .filters
                .iter()
                .find(|f| !want(entity.dimension(f.dimension).unwrap_or_default(), f.allow))
            {
                debug!(metric = %self.metric, entity = %entity.key, dimension = filter.dimension, "entity filtered out");
                continue;
            }

            let shaped = match self.shape(&entity) {
                Ok(shaped) => shaped,
                Err(error) => {
                    warn!(metric = %self.metric, entity = %entity.key, %error, "skipping entity");
                    continue;
                }
            };
            if shaped.fields.is_empty() {
                debug!(metric = %self.metric, entity = %entity.key, "entity has no fields");
                continue;
            }

            for (name, value) in shaped.fields {
                aggregator.add(&entity.key, &name, value);
            }
            let mut tags = shaped.tags;
            tags.extend(entity.tags);
            entity_tags.entry(entity.key).or_insert(tags);
        }

        let buckets = aggregator.finish();
        match self.mode {
            AggregationMode::PerEntity => buckets
                .into_iter()
                .filter_map(|bucket| {
                    let key = bucket.key?;
                    let mut metric = Metric::new(self.metric.as_str());
                    for (name, value) in bucket.sums {
                        self.insert_field(&mut metric, self.field_key(name, None), value);
                    }
                    for (k, v) in entity_tags.remove(&key).unwrap_or_default() {
                        self.insert_tag(&mut metric, k, v);
                    }
                    Some(metric)
                })
                .collect(),
            AggregationMode::Flattened | AggregationMode::Aggregate => {
                if buckets.is_empty() {
                    return Vec::new();
                }
                let mut metric = Metric::new(self.metric.as_str());
                for bucket in buckets {
                    for (name, value) in bucket.sums {
                        let key = self.field_key(name, bucket.key.as_deref());
                        self.insert_field(&mut metric, key, value);
                    }
                }
                vec![metric]
            }
        }
    }

    /// Routes and converts the stats of one entity.
    ///
    /// A stat with a unit rule, or with a numeric value, is numeric. Numeric
    /// stats wanted by the field list become fields, except those printed as
    /// `-` which are left out; everything else may become a tag. A text stat named explicitly in the field list is a type
    /// mismatch and fails the entity.
    fn shape(&self, entity: &Entity<'_>) -> Result<Shaped, AssembleError> {
        let mut shaped = Shaped::default();

        for stat in entity.stats.iter() {
            let rule = self.units.rule(&stat.name);
            let numeric = rule.is_some() || stat.value.is_numeric();

            if numeric && want(&stat.name, self.fields) {
                if stat.value.is_absent() {
                    trace!(metric = %self.metric, entity = %entity.key, field = %stat.name, "value absent");
                    continue;
                }
                let value = match rule {
                    Some(rule) => rule.apply(&stat.value).map_err(|source| {
                        AssembleError::Conversion {
                            entity: entity.key.clone(),
                            field: stat.name.clone(),
                            source,
                        }
                    })?,
                    None => match stat.value.as_number() {
                        Some(value) => value,
                        None => continue,
                    },
                };
                shaped.fields.push((self.naming.apply(&stat.name), value));
            } else if !numeric && self.fields.names(&stat.name) {
                return Err(AssembleError::TypeMismatch {
                    entity: entity.key.clone(),
                    field: stat.name.clone(),
                    value: stat.value.to_string(),
                });
            } else if let Some(tags) = self.tags
                && want(&stat.name, tags)
            {
                let value = stat.value.to_string();
                if value.is_empty() {
                    debug!(metric = %self.metric, entity = %entity.key, stat = %stat.name, "empty tag value dropped");
                    continue;
                }
                shaped.tags.insert(self.naming.apply(&stat.name), value);
            }
        }

        Ok(shaped)
    }

    fn field_key(&self, name: String, entity: Option<&str>) -> FieldKey {
        let mut key = FieldKey::new(name);
        if let Some(prefix) = &self.prefix {
            key = key.with_prefix(prefix.as_str());
        }
        if self.mode == AggregationMode::Flattened
            && let Some(entity) = entity
        {
            key = key.with_entity(entity);
        }
        key
    }

    fn insert_field(&self, metric: &mut Metric, key: FieldKey, value: Number) {
        if !metric.insert_field(key.clone(), value) {
            warn!(metric = %self.metric, field = %key, "field collides with a tag, dropped");
        }
    }

    fn insert_tag(&self, metric: &mut Metric, key: String, value: String) {
        if !metric.insert_tag(key.as_str(), value) {
            warn!(metric = %self.metric, tag = %key, "tag collides with a field, dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ZPOOL_HEALTH;
    use crate::correlate::{CorrelationTable, Fallback};
    use crate::model::{GroupId, TypedValue, ValueKind};

    fn stat(name: &str, value: TypedValue) -> RawStat {
        RawStat::new(name, value, ValueKind::Gauge)
    }

    fn sd6_err() -> StatGroup {
        let mut group = StatGroup::new(GroupId::new("sderr", 6, "sd6,err"), "device_error");
        for s in [
            stat("Hard Errors", TypedValue::Unsigned(0)),
            stat("Illegal Request", TypedValue::Unsigned(1148)),
            stat("Media Error", TypedValue::Unsigned(0)),
            stat("Product", TypedValue::Text("My Passport 2627".into())),
            stat("Serial No", TypedValue::Text("WXP1E7916Z6K".into())),
            stat("Size", TypedValue::Unsigned(2000365289472)),
            stat("Soft Errors", TypedValue::Unsigned(0)),
            stat("Transport Errors", TypedValue::Unsigned(0)),
            stat("Vendor", TypedValue::Text("WD".into())),
        ] {
            group.push(s);
        }
        group
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("Hard Errors"), "hardErrors");
        assert_eq!(camel_case("Serial No"), "serialNo");
        assert_eq!(camel_case("One tWo three"), "oneTwoThree");
        assert_eq!(camel_case("Predictive Failure Analysis"), "predictiveFailureAnalysis");
        assert_eq!(camel_case("crtime"), "crtime");
    }

    #[test]
    fn test_disk_error_end_to_end() {
        let group = sd6_err();
        let fields = AllowList::new([
            "Hard Errors",
            "Soft Errors",
            "Transport Errors",
            "Illegal Request",
        ]);
        let tags = AllowList::new(["Vendor", "Serial No", "Product", "Revision"]);
        let metrics = Assembler::new("diskHealth")
            .fields(&fields)
            .tags(&tags)
            .naming(Naming::CamelCase)
            .assemble([Entity::from_group("sd6", &group)]);

        assert_eq!(metrics.len(), 1);
        let expected = Metric::new("diskHealth")
            .with_field("hardErrors", 0u64)
            .with_field("softErrors", 0u64)
            .with_field("transportErrors", 0u64)
            .with_field("illegalRequest", 1148u64)
            .with_tag("vendor", "WD")
            .with_tag("serialNo", "WXP1E7916Z6K")
            .with_tag("product", "My Passport 2627");
        assert_eq!(metrics[0], expected);
        assert_eq!(metrics[0].tag("revision"), None);
    }

    #[test]
    fn test_numeric_stat_listed_as_tag_is_rendered() {
        let group = sd6_err();
        let fields = AllowList::new(["Hard Errors"]);
        let tags = AllowList::new(["Size"]);
        let metrics = Assembler::new("diskHealth")
            .fields(&fields)
            .tags(&tags)
            .naming(Naming::CamelCase)
            .assemble([Entity::from_group("sd6", &group)]);
        assert_eq!(metrics[0].tag("size"), Some("2000365289472"));
        assert_eq!(metrics[0].field("size"), None);
    }

    #[test]
    fn test_text_stat_selected_as_field_skips_entity() {
        let bad = sd6_err();
        let mut good = StatGroup::new(GroupId::new("sderr", 0, "sd0,err"), "device_error");
        good.push(stat("Hard Errors", TypedValue::Unsigned(2)));
        good.push(stat("Vendor", TypedValue::Unsigned(7)));

        let fields = AllowList::new(["Hard Errors", "Vendor"]);
        let metrics = Assembler::new("diskHealth")
            .fields(&fields)
            .assemble([
                Entity::from_group("sd6", &bad),
                Entity::from_group("sd0", &good),
            ]);
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].field("Hard Errors"), Some(Number::Unsigned(2)));
    }

    #[test]
    fn test_no_key_is_both_field_and_tag() {
        let group = sd6_err();
        let tags = AllowList::all();
        let metrics = Assembler::new("diskHealth")
            .tags(&tags)
            .assemble([Entity::from_group("sd6", &group)]);
        let metric = &metrics[0];
        for key in metric.flat_fields().keys() {
            assert!(metric.tag(key).is_none(), "{key} is both field and tag");
        }
        assert_eq!(metric.field("Size"), Some(Number::Unsigned(2000365289472)));
        assert_eq!(metric.tag("Vendor"), Some("WD"));
    }

    #[test]
    fn test_unit_rules_and_conversion_failure() {
        let pools = [
            ("big", "3.62T", "74%", "1.00x", "ONLINE"),
            ("broken", "lots", "1%", "1.00x", "ONLINE"),
            ("rpool", "199G", "28%", "1.00x", "NONSENSE"),
        ];
        let entities = pools.iter().map(|(name, size, cap, dedup, health)| {
            Entity::from_stats(
                *name,
                vec![
                    stat("size", TypedValue::Text(size.to_string())),
                    stat("cap", TypedValue::Text(cap.to_string())),
                    stat("dedup", TypedValue::Text(dedup.to_string())),
                    stat("health", TypedValue::Text(health.to_string())),
                ],
            )
            .with_tag("name", *name)
        });
        let units = UnitTable::new()
            .with("size", Conversion::SizeSuffixToBytes)
            .with("cap", Conversion::PercentSuffix)
            .with("dedup", Conversion::MultiplierSuffix)
            .with("health", Conversion::Ordinal(ZPOOL_HEALTH));

        let metrics = Assembler::new("zpool").units(units).assemble(entities);

        let names: Vec<&str> = metrics.iter().filter_map(|m| m.tag("name")).collect();
        assert_eq!(names, vec!["big", "rpool"]);
        assert_eq!(metrics[0].field("size"), Some(Number::Float(3.98023209254912e12)));
        assert_eq!(metrics[0].field("cap"), Some(Number::Signed(74)));
        assert_eq!(metrics[0].field("dedup"), Some(Number::Float(1.0)));
        assert_eq!(metrics[0].field("health"), Some(Number::Unsigned(0)));
        assert_eq!(metrics[1].field("health"), Some(Number::Unsigned(99)));
    }

    #[test]
    fn test_absent_values_keep_the_entity() {
        let entity = Entity::from_stats(
            "tank",
            vec![
                stat("size", TypedValue::Text("-".into())),
                stat("cap", TypedValue::Text("-".into())),
                stat("health", TypedValue::Text("UNAVAIL".into())),
            ],
        )
        .with_tag("name", "tank");
        let units = UnitTable::new()
            .with("size", Conversion::SizeSuffixToBytes)
            .with("cap", Conversion::PercentSuffix)
            .with("health", Conversion::Ordinal(ZPOOL_HEALTH));

        let metrics = Assembler::new("zpool").units(units).assemble([entity]);
        let expected = vec![
            Metric::new("zpool")
                .with_field("health", 3u64)
                .with_tag("name", "tank"),
        ];
        assert_eq!(metrics, expected);
    }

    fn vm_entities() -> Vec<Entity<'static>> {
        [3u64, 5, 7]
            .iter()
            .enumerate()
            .map(|(cpu, v)| {
                Entity::from_stats(
                    cpu.to_string(),
                    vec![
                        stat("f", TypedValue::Unsigned(*v)),
                        stat("g", TypedValue::Unsigned(1)),
                    ],
                )
                .with_tag("coreID", cpu.to_string())
            })
            .collect()
    }

    #[test]
    fn test_aggregate_mode() {
        let fields = AllowList::new(["f"]);
        let metrics = Assembler::new("memory")
            .fields(&fields)
            .mode(AggregationMode::Aggregate)
            .prefix("vm")
            .assemble(vm_entities());
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].field("vm.f"), Some(Number::Unsigned(15)));
        assert_eq!(metrics[0].fields().len(), 1);
        assert!(metrics[0].tags().is_empty());
    }

    #[test]
    fn test_per_entity_mode() {
        let fields = AllowList::new(["f"]);
        let metrics = Assembler::new("cpu").fields(&fields).assemble(vm_entities());
        let got: Vec<(Option<&str>, Option<Number>)> = metrics
            .iter()
            .map(|m| (m.tag("coreID"), m.field("f")))
            .collect();
        assert_eq!(
            got,
            vec![
                (Some("0"), Some(Number::Unsigned(3))),
                (Some("1"), Some(Number::Unsigned(5))),
                (Some("2"), Some(Number::Unsigned(7))),
            ]
        );
    }

    #[test]
    fn test_flattened_mode_keys_fields_by_entity() {
        let fields = AllowList::new(["f"]);
        let metrics = Assembler::new("memory")
            .fields(&fields)
            .mode(AggregationMode::Flattened)
            .prefix("cpu.vm")
            .assemble(vm_entities());
        assert_eq!(metrics.len(), 1);
        let flat = metrics[0].flat_fields();
        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["cpu.vm.0.f", "cpu.vm.1.f", "cpu.vm.2.f"]);
        assert_eq!(flat["cpu.vm.2.f"], Number::Unsigned(7));
    }

    #[test]
    fn test_entity_filters_run_first() {
        let fields = AllowList::new(["f"]);
        let cpus = AllowList::new(["0", "2"]);
        let metrics = Assembler::new("cpu")
            .fields(&fields)
            .filter("coreID", &cpus)
            .assemble(vm_entities());
        let ids: Vec<&str> = metrics.iter().filter_map(|m| m.tag("coreID")).collect();
        assert_eq!(ids, vec!["0", "2"]);
    }

    #[test]
    fn test_correlation_fallback_tag() {
        let mut table = CorrelationTable::new();
        table.insert(
            "cube_ws0",
            [("zone".to_string(), "cube-ws".to_string())].into(),
        );
        let fallback = Fallback::new([("zone", "global")]).unwrap();
        let entities = ["cube_ws0", "rge0"].map(|link| {
            Entity::from_stats(link, vec![stat("obytes64", TypedValue::Unsigned(10))])
        });

        let metrics = Assembler::new("net")
            .correlate(Correlation::new(&table, fallback))
            .assemble(entities);
        assert_eq!(metrics[0].tag("zone"), Some("cube-ws"));
        assert_eq!(metrics[1].tag("zone"), Some("global"));
    }

    #[test]
    fn test_filters_see_correlated_attributes() {
        let mut table = CorrelationTable::new();
        table.insert(
            "cube_ws0",
            [("zone".to_string(), "cube-ws".to_string())].into(),
        );
        let zones = AllowList::new(["cube-ws"]);
        let entities = ["cube_ws0", "rge0"].map(|link| {
            Entity::from_stats(link, vec![stat("obytes64", TypedValue::Unsigned(10))])
        });
        let metrics = Assembler::new("net")
            .correlate(Correlation::new(
                &table,
                Fallback::new([("zone", "global")]).unwrap(),
            ))
            .filter("zone", &zones)
            .assemble(entities);
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].tag("zone"), Some("cube-ws"));
    }

    #[test]
    fn test_renaming_and_empty_output() {
        let entity = Entity::from_stats(
            "global",
            vec![
                stat("nsec_sys", TypedValue::Unsigned(9)),
                stat("nsec_user", TypedValue::Unsigned(4)),
                stat("zonename", TypedValue::Text("global".into())),
            ],
        );
        let metrics = Assembler::new("cpu.zone")
            .naming(Naming::Map(&[("nsec_sys", "sys"), ("nsec_user", "user")]))
            .assemble([entity]);
        assert_eq!(metrics[0].field("sys"), Some(Number::Unsigned(9)));
        assert_eq!(metrics[0].field("user"), Some(Number::Unsigned(4)));
        assert!(metrics[0].tags().is_empty());

        let none = AllowList::new(["missing"]);
        let empty = Assembler::new("cpu.zone")
            .fields(&none)
            .assemble(vm_entities());
        assert!(empty.is_empty());
        let aggregated = Assembler::new("cpu.zone")
            .fields(&none)
            .mode(AggregationMode::Aggregate)
            .assemble(vm_entities());
        assert!(aggregated.is_empty());
    }

    #[test]
    fn test_empty_tag_values_are_dropped() {
        let entity = Entity::from_stats(
            "sd1",
            vec![
                stat("Hard Errors", TypedValue::Unsigned(0)),
                stat("Vendor", TypedValue::Text(String::new())),
            ],
        );
        let tags = AllowList::all();
        let metrics = Assembler::new("diskHealth").tags(&tags).assemble([entity]);
        assert!(metrics[0].tags().is_empty());
    }
}
