use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    expires: Instant,
}

impl<V> Entry<V> {
    fn new(value: V, life: Duration) -> Entry<V> {
        Entry {
            value,
            expires: Instant::now() + life,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires
    }
}

/// Simple map cache where every entry lives for a fixed duration.
/// NOTE: expired entries are not removed actively, so this won't free up
/// memory on its own.
pub struct ExpiringCache<K, V> {
    inner: Mutex<HashMap<K, Entry<V>>>,
    life: Duration,
}

impl<K: Eq + Hash, V: Clone> ExpiringCache<K, V> {
    pub fn new(life: Duration) -> ExpiringCache<K, V> {
        ExpiringCache {
            inner: Mutex::new(HashMap::new()),
            life,
        }
    }

    pub fn one_minute() -> ExpiringCache<K, V> {
        Self::new(Duration::from_secs(60))
    }

    pub fn five_minutes() -> ExpiringCache<K, V> {
        Self::new(Duration::from_secs(60 * 5))
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let inner = self.inner.lock().expect("cache lock poisoned");
        match inner.get(key) {
            Some(entry) if !entry.is_expired() => Some(entry.value.clone()),
            _ => None,
        }
    }

    /// stores a value, returning the previous one if it hadn't expired yet
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        match inner.insert(key, Entry::new(value, self.life)) {
            Some(existing) if !existing.is_expired() => Some(existing.value),
            _ => None,
        }
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        match inner.remove(key) {
            Some(existing) if !existing.is_expired() => Some(existing.value),
            _ => None,
        }
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.clear();
    }
}

/// single-slot variant, for callers caching one computed value
pub struct ExpiringValue<T> {
    inner: Mutex<Option<Entry<T>>>,
    life: Duration,
}

impl<T: Clone> ExpiringValue<T> {
    pub fn new(life: Duration) -> ExpiringValue<T> {
        ExpiringValue {
            inner: Mutex::new(None),
            life,
        }
    }

    pub fn one_minute() -> ExpiringValue<T> {
        Self::new(Duration::from_secs(60))
    }

    pub fn five_minutes() -> ExpiringValue<T> {
        Self::new(Duration::from_secs(60 * 5))
    }

    pub fn get(&self) -> Option<T> {
        let inner = self.inner.lock().expect("cache lock poisoned");
        match inner.as_ref() {
            Some(entry) if !entry.is_expired() => Some(entry.value.clone()),
            _ => None,
        }
    }

    pub fn set(&self, value: T) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        *inner = Some(Entry::new(value, self.life));
    }
}

/// membership variant of [`ExpiringCache`]
pub struct ExpiringSet<V> {
    inner: ExpiringCache<V, ()>,
}

impl<V: Eq + Hash> ExpiringSet<V> {
    pub fn new(life: Duration) -> ExpiringSet<V> {
        ExpiringSet {
            inner: ExpiringCache::new(life),
        }
    }

    /// adds the value, returning true if it was not already a live member
    pub fn insert(&self, value: V) -> bool {
        self.inner.put(value, ()).is_none()
    }

    pub fn contains(&self, value: &V) -> bool {
        self.inner.get(value).is_some()
    }

    pub fn remove(&self, value: &V) -> bool {
        self.inner.remove(value).is_some()
    }

    pub fn clear(&self) {
        self.inner.clear();
    }
}
