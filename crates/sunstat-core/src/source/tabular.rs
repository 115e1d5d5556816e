//! Tabular stat source: whitespace-separated command output.
//!
//! The first line is a header naming the columns (`zpool list`, `fmstat`);
//! headerless output (`svcs -H`) is parsed against caller-supplied columns.
//! Header names are lower-cased and a leading `%` becomes `pc_`, so `%w`
//! reads as `pc_w`.

use tracing::warn;

use crate::error::RowError;
use crate::model::{GroupId, RawStat, StatGroup, TypedValue, ValueKind};
use crate::select::{AllowList, want};

/// Turns a header line into column identifiers.
pub fn parse_header(line: &str) -> Vec<String> {
    line.split_whitespace()
        .map(|name| {
            let name = name.to_lowercase();
            match name.strip_prefix('%') {
                Some(rest) => format!("pc_{rest}"),
                None => name,
            }
        })
        .collect()
}

/// One data row, cells paired with their column identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based line number in the original output.
    pub line: usize,
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    /// The row's first token, conventionally the entity name.
    pub fn first(&self) -> &str {
        self.cells.first().map(|(_, v)| v.as_str()).unwrap_or("")
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }
}

/// Parsed tabular output. Rows whose cell count does not match the columns
/// are kept out of `rows` and listed in `errors`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
    errors: Vec<RowError>,
}

impl Table {
    /// Parses output whose first non-blank line is a header.
    ///
    /// Blank output is an empty table, not an error.
    pub fn parse(content: &str) -> Self {
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());

        let Some((_, header)) = lines.next() else {
            return Self::default();
        };

        let mut table = Self {
            columns: parse_header(header),
            ..Self::default()
        };
        for (i, line) in lines {
            table.push_line(i + 1, line);
        }
        table
    }

    /// Parses output without a header against known column identifiers.
    pub fn parse_headerless(content: &str, columns: &[&str]) -> Self {
        let mut table = Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            ..Self::default()
        };
        for (i, line) in content.lines().enumerate() {
            if !line.trim().is_empty() {
                table.push_line(i + 1, line);
            }
        }
        table
    }

    fn push_line(&mut self, line_no: usize, line: &str) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != self.columns.len() {
            self.errors.push(RowError::ColumnCount {
                line: line_no,
                expected: self.columns.len(),
                found: tokens.len(),
            });
            return;
        }
        self.rows.push(Row {
            line: line_no,
            cells: self
                .columns
                .iter()
                .cloned()
                .zip(tokens.into_iter().map(str::to_string))
                .collect(),
        });
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn errors(&self) -> &[RowError] {
        &self.errors
    }

    /// Logs every malformed row under the given source name.
    pub fn report_errors(&self, source: &str) {
        for error in &self.errors {
            warn!(source, %error, "skipping malformed row");
        }
    }

    /// Turns each row into a stat group named after its `key_column` cell.
    ///
    /// Only the columns in `declared` (all non-key columns if it is empty)
    /// become stats. Values stay text; the assembler's unit rules type them.
    pub fn to_groups(&self, module: &str, key_column: &str, declared: &AllowList) -> Vec<StatGroup> {
        self.rows
            .iter()
            .map(|row| {
                let key = row.get(key_column).unwrap_or_default();
                let instance = u32::try_from(row.line).unwrap_or(u32::MAX);
                let mut group = StatGroup::new(GroupId::new(module, instance, key), module);
                for (column, value) in row.cells() {
                    if column == key_column || !want(column, declared) {
                        continue;
                    }
                    group.push(RawStat::new(
                        column,
                        TypedValue::Text(value.to_string()),
                        ValueKind::Gauge,
                    ));
                }
                group
            })
            .collect()
    }
}
