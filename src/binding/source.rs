//! Flat string sources that configuration is bound from

use crate::config::EnvManager;
use crate::error::Result;
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::path::Path;

/// A flat, read-only string map
pub trait ConfigSource {
    /// Value stored under `name`; `Some("")` is an explicit empty value
    fn get(&self, name: &str) -> Option<String>;
}

impl<S: std::hash::BuildHasher> ConfigSource for HashMap<String, String, S> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        BTreeMap::get(self, name).cloned()
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

/// Snapshot of the process environment
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    vars: HashMap<String, String>,
}

impl EnvSource {
    /// Capture the current process environment; non-unicode entries are skipped
    pub fn capture() -> Self {
        let vars = env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    /// Source built from explicit pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Overlay variables from a `.env` file; variables already present win
    pub fn with_env_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        for (key, value) in EnvManager::load_env_file(path.as_ref())? {
            self.vars.entry(key).or_insert(value);
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl ConfigSource for EnvSource {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
