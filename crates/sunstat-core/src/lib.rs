//! sunstat-core - telemetry normalization for Illumos and SmartOS hosts.
//!
//! Provides:
//! - `model` - raw stats as sources produce them, and output metrics
//! - `source` - the kstat chain and tabular command output, behind mockable traits
//! - `convert` - unit conversion (pages, size suffixes, percentages, states)
//! - `select` - allow-lists
//! - `aggregate` - per-entity, flattened and summed metrics
//! - `correlate` - lookup tables that enrich entities (VNIC → zone, zones)
//! - `assemble` - turns one poll's entities into metrics
//! - `collectors` - cpu, memory, disks, network, NFS, ZFS, FMA, SMF, zones
//! - `config`, `host`, `error` - configuration, startup facts, error types

pub mod aggregate;
pub mod assemble;
pub mod collectors;
pub mod config;
pub mod convert;
pub mod correlate;
pub mod error;
pub mod host;
pub mod model;
pub mod select;
pub mod source;
