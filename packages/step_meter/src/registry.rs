use std::cell::RefCell;
use std::hash::Hash;
use std::sync::{Arc, Mutex, RwLock, Weak};

use foldhash::HashMap;

use crate::{Config, ERR_POISONED_LOCK, Meter};

/// Hands out one [`Meter`] per execution context key.
///
/// The registry only holds weak references: a meter lives as long as some caller holds the
/// `Arc` returned by [`get_or_create()`](Self::get_or_create). Entries of dropped meters
/// are pruned whenever a new meter is registered, or on demand with [`prune()`](Self::prune).
///
/// Lookups of a live meter take a shared lock. Creation takes the exclusive lock and checks
/// again, so concurrent callers with the same key always receive the same meter.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use step_meter::Registry;
///
/// let registry = Registry::new();
///
/// let meter = registry.get_or_create(thread::current().id());
/// let again = registry.get_or_create(thread::current().id());
/// assert!(Arc::ptr_eq(&meter, &again));
///
/// let mut meter = meter.lock().unwrap();
/// meter.start();
/// meter.beat_log("step");
/// meter.finish();
/// ```
#[derive(Debug)]
pub struct Registry<K> {
    meters: RwLock<HashMap<K, Weak<Mutex<Meter>>>>,

    // Every meter created by this registry starts with a copy of this configuration.
    config: Config,
}

impl<K> Registry<K>
where
    K: Eq + Hash,
{
    /// Creates an empty registry whose meters use the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty registry whose meters start with `config`.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            meters: RwLock::new(HashMap::default()),
            config,
        }
    }

    /// Returns the live meter registered for `key`, creating one if there is none.
    pub fn get_or_create(&self, key: K) -> Arc<Mutex<Meter>> {
        if let Some(meter) = self.get(&key) {
            return meter;
        }

        let mut meters = self.meters.write().expect(ERR_POISONED_LOCK);

        // Someone else may have created it while we were waiting for the exclusive lock.
        if let Some(meter) = meters.get(&key).and_then(Weak::upgrade) {
            return meter;
        }

        meters.retain(|_, meter| meter.strong_count() > 0);

        let meter = Arc::new(Mutex::new(Meter::with_config(self.config.clone())));
        meters.insert(key, Arc::downgrade(&meter));

        tracing::debug!(registered = meters.len(), "meter created");

        meter
    }

    /// Returns the live meter registered for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<Arc<Mutex<Meter>>> {
        self.meters
            .read()
            .expect(ERR_POISONED_LOCK)
            .get(key)
            .and_then(Weak::upgrade)
    }

    /// Forgets the meter registered for `key`.
    ///
    /// Callers that still hold the meter can keep using it; the next
    /// [`get_or_create()`](Self::get_or_create) for the key creates a new one.
    ///
    /// Returns whether an entry was removed.
    pub fn deregister(&self, key: &K) -> bool {
        self.meters
            .write()
            .expect(ERR_POISONED_LOCK)
            .remove(key)
            .is_some()
    }

    /// Removes the entries of meters that have been dropped. Returns how many were removed.
    pub fn prune(&self) -> usize {
        let mut meters = self.meters.write().expect(ERR_POISONED_LOCK);

        let before = meters.len();
        meters.retain(|_, meter| meter.strong_count() > 0);
        let pruned = before.saturating_sub(meters.len());

        if pruned > 0 {
            tracing::debug!(pruned, "dropped meters pruned");
        }

        pruned
    }

    /// Number of registered entries, including those of dropped meters not pruned yet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meters.read().expect(ERR_POISONED_LOCK).len()
    }

    /// Whether no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K> Default for Registry<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    // Dropped with the thread, together with any sessions still open on it.
    static THREAD_METER: RefCell<Meter> = RefCell::new(Meter::new());
}

/// Runs `f` with the meter of the current thread.
///
/// Every thread gets its own meter on first use. The meter lives until the thread exits.
///
/// # Panics
///
/// Panics if called from within `f`.
///
/// # Examples
///
/// ```
/// use step_meter::with_thread_meter;
///
/// with_thread_meter(|meter| {
///     meter.start_log("request");
///     meter.beat_log("decode");
/// });
///
/// // Later, somewhere else on the same thread.
/// let depth = with_thread_meter(|meter| {
///     meter.beat_log("respond");
///     meter.finish();
///     meter.depth()
/// });
///
/// assert_eq!(depth, 0);
/// ```
pub fn with_thread_meter<R>(f: impl FnOnce(&mut Meter) -> R) -> R {
    THREAD_METER.with_borrow_mut(f)
}
