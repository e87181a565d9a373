//! Configuration value tree.
//!
//! Host configuration reaches the provisioner as a tree of scalars, sequences
//! and mappings. Mapping keys can arrive in two encodings: plain strings and
//! symbols (written `:name` in YAML), and occasionally as integers or
//! booleans. The agent only understands string keys, so every tree is passed
//! through [`normalize`] before it is rendered.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;

/// A mapping key in one of the encodings the host configuration may use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
  /// A plain string key. The only encoding left after normalization.
  String(String),
  /// A symbolic key, written `:name` in YAML.
  Symbol(String),
  Integer(i64),
  Boolean(bool),
}

impl Key {
  /// Returns true if this key is already a plain string.
  pub fn is_string(&self) -> bool {
    matches!(self, Key::String(_))
  }

  /// Converts the key to its plain string form.
  pub fn to_plain(&self) -> Key {
    match self {
      Key::String(s) => Key::String(s.clone()),
      other => Key::String(other.to_string()),
    }
  }

  fn from_yaml(value: Value) -> Key {
    match value {
      Value::String(s) => match s.strip_prefix(':') {
        Some(symbol) if !symbol.is_empty() => Key::Symbol(symbol.to_string()),
        _ => Key::String(s),
      },
      Value::Bool(b) => Key::Boolean(b),
      Value::Number(n) => n.as_i64().map_or_else(|| Key::String(n.to_string()), Key::Integer),
      Value::Null => Key::String(String::new()),
      Value::Tagged(tagged) => Key::from_yaml(tagged.value),
      other => Key::String(
        serde_yaml::to_string(&other)
          .map(|s| s.trim_end().to_string())
          .unwrap_or_default(),
      ),
    }
  }
}

impl fmt::Display for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Key::String(s) | Key::Symbol(s) => f.write_str(s),
      Key::Integer(i) => write!(f, "{}", i),
      Key::Boolean(b) => write!(f, "{}", b),
    }
  }
}

impl From<&str> for Key {
  fn from(s: &str) -> Self {
    Key::String(s.to_string())
  }
}

impl From<String> for Key {
  fn from(s: String) -> Self {
    Key::String(s)
  }
}

impl Serialize for Key {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for Key {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    Value::deserialize(deserializer).map(Key::from_yaml)
  }
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
  Null,
  Bool(bool),
  Integer(i64),
  Float(f64),
  String(String),
}

/// A configuration tree: scalars, ordered sequences and ordered mappings.
///
/// Mapping keys are unique. Insertion order is preserved so rendered
/// documents follow the order the host wrote them in.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
  Scalar(Scalar),
  Sequence(Vec<ConfigValue>),
  Mapping(IndexMap<Key, ConfigValue>),
}

impl Default for ConfigValue {
  fn default() -> Self {
    ConfigValue::Mapping(IndexMap::new())
  }
}

impl ConfigValue {
  /// Returns the entries if this value is a mapping.
  pub fn as_mapping(&self) -> Option<&IndexMap<Key, ConfigValue>> {
    match self {
      ConfigValue::Mapping(map) => Some(map),
      _ => None,
    }
  }

  /// Looks up a plain string key in a mapping.
  pub fn get(&self, key: &str) -> Option<&ConfigValue> {
    self.as_mapping()?.get(&Key::from(key))
  }

  pub fn is_null(&self) -> bool {
    matches!(self, ConfigValue::Scalar(Scalar::Null))
  }

  /// Returns true if every mapping key in the tree is a plain string.
  pub fn is_normalized(&self) -> bool {
    match self {
      ConfigValue::Mapping(map) => map.iter().all(|(k, v)| k.is_string() && v.is_normalized()),
      ConfigValue::Sequence(items) => items.iter().all(ConfigValue::is_normalized),
      ConfigValue::Scalar(_) => true,
    }
  }
}

/// Converts every mapping key in the tree to its plain string form.
///
/// Sequences keep their order and length; scalars are returned unchanged.
/// When two keys collapse to the same string (`:a` and `"a"`), the entry
/// that comes later wins and the earlier position is kept.
pub fn normalize(value: &ConfigValue) -> ConfigValue {
  match value {
    ConfigValue::Mapping(map) => ConfigValue::Mapping(map.iter().map(|(k, v)| (k.to_plain(), normalize(v))).collect()),
    ConfigValue::Sequence(items) => ConfigValue::Sequence(items.iter().map(normalize).collect()),
    ConfigValue::Scalar(_) => value.clone(),
  }
}

impl From<Value> for ConfigValue {
  fn from(value: Value) -> Self {
    match value {
      Value::Null => ConfigValue::Scalar(Scalar::Null),
      Value::Bool(b) => ConfigValue::Scalar(Scalar::Bool(b)),
      Value::Number(n) => {
        let scalar = match n.as_i64() {
          Some(i) => Scalar::Integer(i),
          None => n.as_f64().map_or_else(|| Scalar::String(n.to_string()), Scalar::Float),
        };
        ConfigValue::Scalar(scalar)
      }
      Value::String(s) => ConfigValue::Scalar(Scalar::String(s)),
      Value::Sequence(items) => ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect()),
      Value::Mapping(map) => ConfigValue::Mapping(
        map
          .into_iter()
          .map(|(k, v)| (Key::from_yaml(k), ConfigValue::from(v)))
          .collect(),
      ),
      Value::Tagged(tagged) => ConfigValue::from(tagged.value),
    }
  }
}

impl From<&str> for ConfigValue {
  fn from(s: &str) -> Self {
    ConfigValue::Scalar(Scalar::String(s.to_string()))
  }
}

impl Serialize for ConfigValue {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      ConfigValue::Scalar(Scalar::Null) => serializer.serialize_unit(),
      ConfigValue::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
      ConfigValue::Scalar(Scalar::Integer(i)) => serializer.serialize_i64(*i),
      ConfigValue::Scalar(Scalar::Float(f)) => serializer.serialize_f64(*f),
      ConfigValue::Scalar(Scalar::String(s)) => serializer.serialize_str(s),
      ConfigValue::Sequence(items) => serializer.collect_seq(items),
      ConfigValue::Mapping(map) => {
        let mut state = serializer.serialize_map(Some(map.len()))?;
        for (key, value) in map {
          state.serialize_entry(key, value)?;
        }
        state.end()
      }
    }
  }
}

impl<'de> Deserialize<'de> for ConfigValue {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    Value::deserialize(deserializer).map(ConfigValue::from)
  }
}
