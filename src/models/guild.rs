use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw JSON mapping backing a guild configuration
pub type ConfigMap = Map<String, Value>;

/// Top-level key holding levelling data, hidden from the settings UI
pub const RESERVED_KEY: &str = "level";

/// Guild (Server) specific configuration, stored as free-form JSON
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct GuildConfig(ConfigMap);

impl GuildConfig {
    pub fn new(map: ConfigMap) -> Self {
        Self(map)
    }

    /// Fill in every key the template has and this config lacks.
    /// Returns the dotted paths that were added.
    pub fn backfill(&mut self, template: &GuildConfig) -> Vec<String> {
        let before = leaf_paths(&self.0);
        self.0 = merge(std::mem::take(&mut self.0), &template.0);
        leaf_paths(&self.0)
            .into_iter()
            .filter(|path| !before.contains(path))
            .collect()
    }

    /// Config as shown to users, without the reserved key
    pub fn display_view(&self) -> ConfigMap {
        self.0
            .iter()
            .filter(|(key, _)| key.as_str() != RESERVED_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Flattened `(dotted.path, value)` pairs for every scalar the UI may edit
    pub fn editable_entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        collect_scalars(&self.display_view(), None, &mut entries);
        entries
    }
}

/// Recursively add the keys of `template` missing from `existing`.
///
/// Existing values always win over template defaults. When the template holds
/// a mapping where `existing` holds anything else, the existing value is
/// replaced by the merged mapping. Keys only present in `existing` are kept.
pub fn merge(mut existing: ConfigMap, template: &ConfigMap) -> ConfigMap {
    for (key, default) in template {
        match default {
            Value::Object(nested) => {
                let slot = existing
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                let current = match slot.take() {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                *slot = Value::Object(merge(current, nested));
            }
            _ => {
                existing.entry(key.clone()).or_insert_with(|| default.clone());
            }
        }
    }
    existing
}

fn leaf_paths(map: &ConfigMap) -> Vec<String> {
    let mut paths = Vec::new();
    collect_leaf_paths(map, "", &mut paths);
    paths
}

fn collect_leaf_paths(map: &ConfigMap, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in map {
        let path = join_path(prefix, key);
        match value {
            Value::Object(nested) if !nested.is_empty() => collect_leaf_paths(nested, &path, out),
            _ => out.push(path),
        }
    }
}

fn collect_scalars(map: &ConfigMap, prefix: Option<&str>, out: &mut Vec<(String, String)>) {
    for (key, value) in map {
        let path = join_path(prefix.unwrap_or_default(), key);
        match value {
            Value::Object(nested) => collect_scalars(nested, Some(path.as_str()), out),
            Value::String(s) => out.push((path, s.clone())),
            other => out.push((path, other.to_string())),
        }
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}
