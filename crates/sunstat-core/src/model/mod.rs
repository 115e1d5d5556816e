//! Data model shared by sources, the engine and its consumers.

pub mod metric;
pub mod raw;

pub use metric::{FieldKey, Metric, Number, sort_metrics};
pub use raw::{GroupId, IoStats, RawStat, StatGroup, TypedValue, ValueKind};
