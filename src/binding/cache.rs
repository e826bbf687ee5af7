//! Process-wide cache of bound configuration objects
//!
//! Each (namespace, type) key owns a `OnceCell` slot. The map lock is held
//! only long enough to find or create the slot; the build itself runs under
//! the slot, so concurrent first callers for one key wait for a single
//! construction while other keys proceed.

use super::binder::EnvConfig;
use super::source::{ConfigSource, EnvSource};
use crate::defaults::DEFAULT_NAMESPACE;
use crate::error::Result;
use once_cell::sync::{Lazy, OnceCell};
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Identity of a cached configuration object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: String,
    type_name: &'static str,
}

impl CacheKey {
    /// Key for `T` under `prefix`; no prefix (or an empty one) is the default namespace
    pub fn of<T: 'static>(prefix: Option<&str>) -> Self {
        let namespace = match prefix.filter(|p| !p.is_empty()) {
            Some(prefix) => prefix.to_uppercase(),
            None => DEFAULT_NAMESPACE.to_string(),
        };
        Self {
            namespace,
            type_name: type_name::<T>(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.namespace, self.type_name)
    }
}

type Slot = Arc<OnceCell<Arc<dyn Any + Send + Sync>>>;

/// At most one successful construction per key
#[derive(Default)]
pub struct ConfigCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &CacheKey) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    /// Cached value for `key`, building it with `build` on first access
    ///
    /// A failed build is not cached; the next caller tries again.
    pub fn get_or_try_build<T, F>(&self, key: &CacheKey, build: F) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Result<T>,
    {
        let slot = self.slot(key);
        let stored = slot.get_or_try_init(|| build().map(|value| Arc::new(value) as Arc<dyn Any + Send + Sync>))?;
        Arc::clone(stored)
            .downcast::<T>()
            .map_err(|_| crate::error::ConfigError::config(format!("cache entry {} holds another type", key)))
    }

    /// Cached value for `key`, if one was built
    pub fn get<T: Send + Sync + 'static>(&self, key: &CacheKey) -> Option<Arc<T>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let stored = slots.get(key)?.get()?;
        Arc::clone(stored).downcast::<T>().ok()
    }

    /// Forget one key; returns whether it held a built value
    pub fn remove(&self, key: &CacheKey) -> bool {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(key).is_some_and(|slot| slot.get().is_some())
    }

    pub fn clear(&self) {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Number of built entries
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ConfigCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigCache").field("entries", &self.len()).finish()
    }
}

static GLOBAL: Lazy<ConfigCache> = Lazy::new(ConfigCache::new);

/// `T` bound from the process environment, built once per process
pub fn from_env<T: EnvConfig + Send + Sync + 'static>() -> Result<Arc<T>> {
    GLOBAL.get_or_try_build(&CacheKey::of::<T>(None), || T::from_source(&EnvSource::capture()))
}

/// `T` bound from the process environment under `prefix`, built once per prefix
pub fn from_env_with_prefix<T: EnvConfig + Send + Sync + 'static>(prefix: &str) -> Result<Arc<T>> {
    GLOBAL.get_or_try_build(&CacheKey::of::<T>(Some(prefix)), || {
        T::from_source_with_prefix(&EnvSource::capture(), prefix)
    })
}

/// `T` bound from `source`; a cached value wins over the source
pub fn from_source<T, S>(source: &S) -> Result<Arc<T>>
where
    T: EnvConfig + Send + Sync + 'static,
    S: ConfigSource + ?Sized,
{
    GLOBAL.get_or_try_build(&CacheKey::of::<T>(None), || T::from_source(source))
}

/// `T` bound from `source` under `prefix`; a cached value wins over the source
pub fn from_source_with_prefix<T, S>(source: &S, prefix: &str) -> Result<Arc<T>>
where
    T: EnvConfig + Send + Sync + 'static,
    S: ConfigSource + ?Sized,
{
    GLOBAL.get_or_try_build(&CacheKey::of::<T>(Some(prefix)), || T::from_source_with_prefix(source, prefix))
}

/// Drop the cached `T` for `prefix` so the next access binds again
pub fn clear<T: 'static>(prefix: Option<&str>) -> bool {
    GLOBAL.remove(&CacheKey::of::<T>(prefix))
}

pub fn clear_all() {
    GLOBAL.clear();
}
