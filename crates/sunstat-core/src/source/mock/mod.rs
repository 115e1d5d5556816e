//! Mock command runner and canned host scenarios for tests.

mod runner;
mod scenarios;

pub use runner::MockRunner;
pub use scenarios::smartos_kstat_text;
