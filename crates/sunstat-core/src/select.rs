//! Allow-list selection.
//!
//! One primitive decides every "do we keep this?" question: which fields,
//! which tags, which devices, zones, modules or NFS versions. An empty list
//! allows everything.

use serde::{Deserialize, Serialize};

/// An ordered set of exact, case-sensitive names. Empty means "allow all".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList(Vec<String>);

impl AllowList {
    /// The list that allows everything.
    pub const fn all() -> Self {
        Self(Vec::new())
    }

    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Vec::new();
        for name in names {
            let name = name.into();
            if !list.contains(&name) {
                list.push(name);
            }
        }
        Self(list)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `name` is explicitly listed. Unlike [`want`], an empty list
    /// lists nothing.
    pub fn names(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// True iff `allow` is empty or contains `candidate`.
pub fn want(candidate: &str, allow: &AllowList) -> bool {
    allow.is_empty() || allow.names(candidate)
}
