//! The declarative variable model
//!
//! A variables document has three nested levels of scope. Each level declares
//! literal variables and three lists of secret declarations:
//!
//! ```yaml
//! vars:
//!   FOO: bar
//! secrets:
//!   API_TOKEN: kv/api            # simple: reads field "value"
//! kv_secrets:
//!   - path: kv2/db
//!     vars:
//!       DB_USER: username
//! kv1_secrets:
//!   - path: legacy/db
//!     vars:
//!       DB_PASS: password
//! environments:
//!   dev:
//!     vars: { ENV: dev }
//!     dcs:
//!       us-east-1:
//!         vars: { DC: us-east-1 }
//! ```

use crate::constants::{GLOBAL_SCOPE_COMMENT, SIMPLE_SECRET_FIELD};
use crate::types::output::{Output, OutputList};
use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;

/// Literal variables, in declaration order
pub type LiteralVars = IndexMap<String, String>;

/// A key left empty (`vars:` with every entry commented out) reads as empty
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Literal values may be written as any YAML scalar (`PORT: 8080`)
fn scalar_vars<'de, D>(deserializer: D) -> Result<LiteralVars, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: IndexMap<String, serde_yaml::Value> = null_as_empty(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Null => String::new(),
                _ => {
                    return Err(de::Error::custom(format!(
                        "variable '{key}' must be a scalar value"
                    )))
                }
            };
            Ok((key, value))
        })
        .collect()
}

/// A secret whose fields are exported under chosen variable names
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SecretRef {
    pub path: String,
    /// Output variable name to remote field name
    #[serde(default, rename = "vars", deserialize_with = "null_as_empty")]
    pub field_map: HashMap<String, String>,
}

impl SecretRef {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            field_map: HashMap::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, output_name: impl Into<String>, field: impl Into<String>) -> Self {
        self.field_map.insert(output_name.into(), field.into());
        self
    }

    /// `(output_name, field_name)` pairs sorted by output name
    #[must_use]
    pub fn sorted_fields(&self) -> Vec<(&str, &str)> {
        let mut fields: Vec<(&str, &str)> = self
            .field_map
            .iter()
            .map(|(output, field)| (output.as_str(), field.as_str()))
            .collect();
        fields.sort_unstable_by(|a, b| a.0.cmp(b.0));
        fields
    }
}

/// One secret, one variable: reads the `value` field at `path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleSecretRef {
    pub output_name: String,
    pub path: String,
}

impl From<&SimpleSecretRef> for SecretRef {
    fn from(simple: &SimpleSecretRef) -> Self {
        SecretRef::new(simple.path.clone()).field(simple.output_name.clone(), SIMPLE_SECRET_FIELD)
    }
}

/// Declarations at one level of the hierarchy
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Scope {
    #[serde(default, deserialize_with = "scalar_vars")]
    pub vars: LiteralVars,
    /// Output variable name to secret path
    #[serde(default, deserialize_with = "null_as_empty")]
    pub secrets: IndexMap<String, String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub kv_secrets: Vec<SecretRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub kv1_secrets: Vec<SecretRef>,
}

impl Scope {
    /// Literal variables as outputs, in declaration order
    #[must_use]
    pub fn literal_outputs(&self) -> OutputList {
        self.vars
            .iter()
            .map(|(key, value)| Output::variable(key, value))
            .collect()
    }

    pub fn simple_secrets(&self) -> impl Iterator<Item = SimpleSecretRef> + '_ {
        self.secrets.iter().map(|(output_name, path)| SimpleSecretRef {
            output_name: output_name.clone(),
            path: path.clone(),
        })
    }

    #[must_use]
    pub fn has_secrets(&self) -> bool {
        !(self.secrets.is_empty() && self.kv_secrets.is_empty() && self.kv1_secrets.is_empty())
    }
}

/// A named environment, optionally split into datacenters
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Environment {
    #[serde(flatten)]
    pub scope: Scope,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dcs: HashMap<String, Scope>,
}

/// A whole variables document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Variables {
    #[serde(flatten)]
    pub scope: Scope,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub environments: HashMap<String, Environment>,
}

impl Variables {
    #[must_use]
    pub fn environment(&self, name: &str) -> Option<&Environment> {
        self.environments.get(name)
    }

    #[must_use]
    pub fn datacenter(&self, environment: &str, datacenter: &str) -> Option<&Scope> {
        self.environment(environment)
            .and_then(|env| env.dcs.get(datacenter))
    }
}

/// Which level of the hierarchy a set of outputs came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Environment(String),
    Datacenter(String),
}

impl ScopeKind {
    /// Comment emitted at the start of this scope's outputs
    #[must_use]
    pub fn comment(&self) -> String {
        match self {
            ScopeKind::Global => GLOBAL_SCOPE_COMMENT.to_string(),
            ScopeKind::Environment(name) => format!("Environment: {name}"),
            ScopeKind::Datacenter(name) => format!("Datacenter: {name}"),
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Global => write!(f, "global"),
            ScopeKind::Environment(name) => write!(f, "environment '{name}'"),
            ScopeKind::Datacenter(name) => write!(f, "datacenter '{name}'"),
        }
    }
}

/// The declaration list a secret came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretCategory {
    /// `secrets`
    Secrets,
    /// `kv_secrets`
    KvSecrets,
    /// `kv1_secrets`
    Kv1Secrets,
}

impl fmt::Display for SecretCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretCategory::Secrets => write!(f, "secret"),
            SecretCategory::KvSecrets => write!(f, "kv secret"),
            SecretCategory::Kv1Secrets => write!(f, "kv1 secret"),
        }
    }
}
