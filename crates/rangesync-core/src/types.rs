//! Strong type definitions for range reconciliation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A logical dataset subject to independent reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Component {
    Fim,
    Packages,
    Hotfixes,
    Processes,
    Ports,
    NetworkInterfaces,
    NetworkProtocols,
    NetworkAddresses,
    Hardware,
    OsInfo,
}

impl Component {
    pub const ALL: [Component; 10] = [
        Component::Fim,
        Component::Packages,
        Component::Hotfixes,
        Component::Processes,
        Component::Ports,
        Component::NetworkInterfaces,
        Component::NetworkProtocols,
        Component::NetworkAddresses,
        Component::Hardware,
        Component::OsInfo,
    ];

    /// Name used on the wire and in storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Component::Fim => "fim",
            Component::Packages => "packages",
            Component::Hotfixes => "hotfixes",
            Component::Processes => "processes",
            Component::Ports => "ports",
            Component::NetworkInterfaces => "network_iface",
            Component::NetworkProtocols => "network_protocol",
            Component::NetworkAddresses => "network_address",
            Component::Hardware => "hwinfo",
            Component::OsInfo => "osinfo",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Component {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Component::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::UnknownComponent(s.to_string()))
    }
}

impl TryFrom<String> for Component {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Component> for &'static str {
    fn from(c: Component) -> Self {
        c.as_str()
    }
}

/// Inclusive key bounds. An empty bound is unbounded on that side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyRange {
    pub begin: String,
    pub end: String,
}

impl KeyRange {
    pub fn new(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            begin: begin.into(),
            end: end.into(),
        }
    }

    /// The range covering every key.
    pub fn full() -> Self {
        Self::default()
    }

    /// Everything up to and including `end`.
    pub fn up_to(end: impl Into<String>) -> Self {
        Self::new(String::new(), end)
    }

    pub fn begin_bound(&self) -> Option<&str> {
        (!self.begin.is_empty()).then_some(self.begin.as_str())
    }

    pub fn end_bound(&self) -> Option<&str> {
        (!self.end.is_empty()).then_some(self.end.as_str())
    }

    pub fn is_full(&self) -> bool {
        self.begin.is_empty() && self.end.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.begin_bound().map_or(true, |b| key >= b) && self.end_bound().map_or(true, |e| key <= e)
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?}]", self.begin, self.end)
    }
}

/// The three-way reconciliation verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Classification {
    /// No local rows in the range.
    Empty = 0,
    /// Rows exist but the aggregate differs from the peer's claim.
    Mismatch = 1,
    /// Aggregate agrees with the peer's claim.
    Match = 2,
}

impl Classification {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Classification::Empty),
            1 => Some(Classification::Mismatch),
            2 => Some(Classification::Match),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Classification::Empty => "empty",
            Classification::Mismatch => "mismatch",
            Classification::Match => "match",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
