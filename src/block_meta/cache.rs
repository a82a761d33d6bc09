use std::collections::hash_map::Entry;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use fnv::FnvHashMap;
use lru::LruCache;

use crate::catalog::partition::{Partition, PartitionID};
use crate::errors::LoadError;
use crate::observability::metrics::{
    BLOCK_MD_CACHE_EVICTION_COUNT, BLOCK_MD_CACHE_HIT_COUNT, BLOCK_MD_CACHE_MISS_COUNT,
    BLOCK_MD_LOAD_COUNT, BLOCK_MD_LOAD_ERROR_COUNT,
};

use super::loader::BlockMetadataLoader;
use super::records::PartitionBlockMetadata;

const ORDERING: Ordering = Ordering::SeqCst;

type LoadOutcome = Result<Arc<PartitionBlockMetadata>, LoadError>;

#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// Maximum number of cached partitions. Must be nonzero;
    /// `PartitionBlockCache::new` panics otherwise.
    pub capacity: usize,
    /// Entries are retired this long after they were loaded, regardless of
    /// access pattern.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> CacheConfig {
        CacheConfig {
            capacity: 32 * 1024,
            ttl: Duration::from_secs(60 * 60),
        }
    }
}

/// Snapshot of cumulative cache statistics. Advisory, not part of the
/// correctness contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub load_failures: u64,
    pub evictions: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    loads: AtomicU64,
    load_failures: AtomicU64,
    evictions: AtomicU64,
}

struct CachedEntry {
    metadata: Arc<PartitionBlockMetadata>,
    loaded_at: Instant,
}

/// Shared slot for a load in progress. The loading thread publishes the
/// outcome exactly once; every other thread interested in the same key
/// blocks on the condvar and clones the shared outcome.
struct InFlight {
    outcome: Mutex<Option<LoadOutcome>>,
    complete: Condvar,
}

enum Role {
    Leader(Arc<InFlight>),
    Waiter(Arc<InFlight>),
}

struct Inner {
    entries: LruCache<PartitionID, CachedEntry>,
    loading: FnvHashMap<PartitionID, Arc<InFlight>>,
}

/// Bounded, expiring cache of partition block metadata.
///
/// Computing block metadata takes multiple round trips to the storage
/// service per file, so results are cached per partition and each key is
/// loaded at most once no matter how many planning threads request it
/// concurrently. A failed load is delivered to every waiter but never
/// cached; the next request retries.
pub struct PartitionBlockCache {
    loader: BlockMetadataLoader,
    inner: Mutex<Inner>,
    ttl: Duration,
    counters: Counters,
}

impl PartitionBlockCache {
    /// Panics if `config.capacity` is zero.
    pub fn new(loader: BlockMetadataLoader, config: CacheConfig) -> PartitionBlockCache {
        let capacity = NonZeroUsize::new(config.capacity).expect("cache capacity must be nonzero");
        PartitionBlockCache {
            loader,
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                loading: FnvHashMap::default(),
            }),
            ttl: config.ttl,
            counters: Counters::default(),
        }
    }

    /// Block metadata for each partition, in input order. The first fatal
    /// load failure aborts the call; the failed key remains uncached.
    pub fn get(
        &self,
        partitions: &[Arc<Partition>],
    ) -> Result<Vec<Arc<PartitionBlockMetadata>>, LoadError> {
        partitions.iter().map(|p| self.get_or_load(p)).collect()
    }

    pub fn loader(&self) -> &BlockMetadataLoader {
        &self.loader
    }

    /// Number of cached entries, counting entries whose TTL has lapsed but
    /// which have not been looked up since.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(ORDERING),
            misses: self.counters.misses.load(ORDERING),
            loads: self.counters.loads.load(ORDERING),
            load_failures: self.counters.load_failures.load(ORDERING),
            evictions: self.counters.evictions.load(ORDERING),
        }
    }

    fn get_or_load(&self, partition: &Arc<Partition>) -> LoadOutcome {
        let key = partition.id();
        let role = {
            let mut inner = self.inner.lock().unwrap();
            if let Some(entry) = inner.entries.get(&key) {
                if entry.loaded_at.elapsed() < self.ttl {
                    self.counters.hits.fetch_add(1, ORDERING);
                    BLOCK_MD_CACHE_HIT_COUNT.inc();
                    return Ok(entry.metadata.clone());
                }
                inner.entries.pop(&key);
                self.counters.evictions.fetch_add(1, ORDERING);
                BLOCK_MD_CACHE_EVICTION_COUNT.inc();
                debug!("block metadata for partition {} expired", key);
            }
            self.counters.misses.fetch_add(1, ORDERING);
            BLOCK_MD_CACHE_MISS_COUNT.inc();
            match inner.loading.entry(key) {
                Entry::Occupied(flight) => Role::Waiter(flight.get().clone()),
                Entry::Vacant(slot) => {
                    let flight = Arc::new(InFlight {
                        outcome: Mutex::new(None),
                        complete: Condvar::new(),
                    });
                    slot.insert(flight.clone());
                    Role::Leader(flight)
                }
            }
        };

        match role {
            Role::Waiter(flight) => {
                let mut outcome = flight.outcome.lock().unwrap();
                while outcome.is_none() {
                    outcome = flight.complete.wait(outcome).unwrap();
                }
                outcome.clone().unwrap()
            }
            Role::Leader(flight) => {
                self.counters.loads.fetch_add(1, ORDERING);
                BLOCK_MD_LOAD_COUNT.inc();
                let result = self.loader.load(partition).map(Arc::new);
                {
                    let mut inner = self.inner.lock().unwrap();
                    inner.loading.remove(&key);
                    match &result {
                        Ok(metadata) => {
                            let evicted = inner.entries.push(
                                key,
                                CachedEntry {
                                    metadata: metadata.clone(),
                                    loaded_at: Instant::now(),
                                },
                            );
                            if let Some((evicted_key, _)) = evicted {
                                if evicted_key != key {
                                    self.counters.evictions.fetch_add(1, ORDERING);
                                    BLOCK_MD_CACHE_EVICTION_COUNT.inc();
                                    debug!(
                                        "evicted block metadata for partition {}",
                                        evicted_key
                                    );
                                }
                            }
                        }
                        Err(err) => {
                            self.counters.load_failures.fetch_add(1, ORDERING);
                            BLOCK_MD_LOAD_ERROR_COUNT.inc();
                            error!("block metadata load for partition {} failed: {}", key, err);
                        }
                    }
                }
                *flight.outcome.lock().unwrap() = Some(result.clone());
                flight.complete.notify_all();
                result
            }
        }
    }
}
