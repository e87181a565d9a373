//! Requested agent versions.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::consts::RETCODE_PASSTHROUGH_VERSION;

/// The agent version a configuration asks for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AgentVersion {
  /// Whatever the install strategy provides.
  #[default]
  Latest,
  /// An exact release such as `2017.7.0` or `0.17.5`.
  Exact(String),
}

impl AgentVersion {
  pub fn parse(s: &str) -> Self {
    if s == "latest" {
      AgentVersion::Latest
    } else {
      AgentVersion::Exact(s.to_string())
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      AgentVersion::Latest => "latest",
      AgentVersion::Exact(v) => v,
    }
  }

  pub fn is_latest(&self) -> bool {
    matches!(self, AgentVersion::Latest)
  }

  /// Whether `salt-call --retcode-passthrough` can be trusted for this version.
  ///
  /// Only exact versions newer than [`RETCODE_PASSTHROUGH_VERSION`] qualify;
  /// `latest` is unknown until install time and never does.
  pub fn supports_retcode_passthrough(&self) -> bool {
    match self {
      AgentVersion::Latest => false,
      AgentVersion::Exact(v) => compare_versions(v, RETCODE_PASSTHROUGH_VERSION) == Ordering::Greater,
    }
  }
}

impl fmt::Display for AgentVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for AgentVersion {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for AgentVersion {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    // `salt_version: 2018.3` is a YAML float, not a string
    match serde_yaml::Value::deserialize(deserializer)? {
      serde_yaml::Value::String(s) => Ok(AgentVersion::parse(&s)),
      serde_yaml::Value::Number(n) => Ok(AgentVersion::parse(&n.to_string())),
      other => Err(serde::de::Error::custom(format!(
        "expected a version string, found {:?}",
        other
      ))),
    }
  }
}

/// Compare two dotted version strings.
///
/// Components are compared numerically when both parse as integers and as
/// text otherwise. A version with extra trailing components sorts after its
/// prefix (`2014.1.1` > `2014.1`).
pub fn compare_versions(left: &str, right: &str) -> Ordering {
  let mut left = left.split('.');
  let mut right = right.split('.');

  loop {
    match (left.next(), right.next()) {
      (None, None) => return Ordering::Equal,
      (Some(_), None) => return Ordering::Greater,
      (None, Some(_)) => return Ordering::Less,
      (Some(l), Some(r)) => {
        let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
          (Ok(l), Ok(r)) => l.cmp(&r),
          _ => l.cmp(r),
        };
        if ordering != Ordering::Equal {
          return ordering;
        }
      }
    }
  }
}
