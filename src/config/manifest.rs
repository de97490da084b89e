//! Package manifest (pack.json) data structures
//!
//! Dependencies may be declared either as a mapping of name to optional
//! constraint, or as a list of `{ "name": ..., "version": ... }` objects.
//! Both forms are normalised to [`Dependency`] values sorted by name.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use crate::error::{BranchpackError, Result};
use crate::version::Version;

/// Manifest file name at the root of every package
pub const MANIFEST_FILE: &str = "pack.json";

/// Package manifest (pack.json)
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Manifest {
    /// Package name
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: Option<String>,

    /// Package version (semantic version string)
    #[serde(default)]
    pub version: Option<String>,

    /// Declared dependencies
    #[serde(default, deserialize_with = "deserialize_dependencies")]
    pub dependencies: Vec<Dependency>,

    /// Post-install scripts keyed by ordinal
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,

    // Free-form metadata below never fails parsing; unusable shapes read as absent.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub author: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub author_email: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub license: Option<String>,

    #[serde(default, deserialize_with = "deserialize_keywords")]
    pub keywords: Vec<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub homepage: Option<String>,
}

/// A dependency edge declared in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Dependency package (branch) name
    pub name: String,

    /// Optional version constraint
    pub constraint: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DependencySpec {
    Table(BTreeMap<String, Option<String>>),
    List(Vec<ListedDependency>),
}

#[derive(Deserialize)]
struct ListedDependency {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

fn deserialize_dependencies<'de, D>(deserializer: D) -> std::result::Result<Vec<Dependency>, D::Error>
where
    D: Deserializer<'de>,
{
    let spec = Option::<DependencySpec>::deserialize(deserializer)?;

    let mut dependencies: Vec<Dependency> = match spec {
        None => Vec::new(),
        Some(DependencySpec::Table(table)) => table
            .into_iter()
            .map(|(name, constraint)| Dependency { name, constraint })
            .collect(),
        Some(DependencySpec::List(list)) => list
            .into_iter()
            .filter_map(|dep| {
                dep.name.map(|name| Dependency {
                    name,
                    constraint: dep.version,
                })
            })
            .collect(),
    };

    dependencies.sort_by(|a, b| a.name.cmp(&b.name));
    if let Some(pair) = dependencies.windows(2).find(|pair| pair[0].name == pair[1].name) {
        return Err(de::Error::custom(format!(
            "dependency '{}' is declared more than once",
            pair[0].name
        )));
    }
    Ok(dependencies)
}

/// A string, or the `name` of an object such as `{"name": ..., "email": ...}`
fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Object(mut object) => match object.remove("name") {
            Some(Value::String(text)) => Some(text),
            _ => None,
        },
        _ => None,
    })
}

/// A list of strings, or a single comma-separated string
fn deserialize_keywords<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text
            .split(',')
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(keyword) => Some(keyword),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

impl Manifest {
    /// Parse a manifest from raw pack.json bytes
    pub fn from_slice(package: &str, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| BranchpackError::InvalidManifest {
            package: package.to_string(),
            reason: e.to_string(),
        })
    }

    /// The declared version, parsed
    pub fn parsed_version(&self, package: &str) -> Result<Version> {
        let version = self
            .version
            .as_deref()
            .ok_or_else(|| BranchpackError::MissingVersion {
                package: package.to_string(),
            })?;
        Version::parse(version)
    }

    /// Scripts in ascending ordinal order
    pub fn ordered_scripts(&self, package: &str) -> Result<Vec<(u64, &str)>> {
        let mut scripts = self
            .scripts
            .iter()
            .map(|(key, command)| {
                key.trim()
                    .parse::<u64>()
                    .map(|ordinal| (ordinal, command.as_str()))
                    .map_err(|_| BranchpackError::InvalidManifest {
                        package: package.to_string(),
                        reason: format!("script key '{key}' is not a non-negative integer"),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        scripts.sort_by_key(|(ordinal, _)| *ordinal);
        Ok(scripts)
    }
}
