//! Raw stat sources: the kstat chain and tabular command output.

pub mod kstat;
pub mod mock;
pub mod tabular;
pub mod traits;

pub use kstat::{KstatSession, parse_kstat_text};
pub use tabular::{Row, Table, parse_header};
pub use traits::{CommandKstat, CommandRunner, FileKstat, KstatSource, RealRunner, command_line};
