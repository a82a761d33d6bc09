use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use fnv::FnvHashSet;

use crate::observability::metrics::INTERNED_STRING_BYTES;

/// Set of canonical string instances shared by all partitions of a table.
///
/// Block metadata references the same small set of host:port strings over and
/// over; interning them keeps memory proportional to the number of distinct
/// strings rather than the number of block replicas. The pool grows
/// monotonically and is never compacted.
#[derive(Default)]
pub struct StringInternPool {
    strings: Mutex<FnvHashSet<Arc<str>>>,
    total_bytes: AtomicU64,
}

impl StringInternPool {
    pub fn new() -> StringInternPool {
        StringInternPool::default()
    }

    /// Returns the canonical instance of `value`, inserting it if absent.
    pub fn intern(&self, value: &str) -> Arc<str> {
        let mut strings = self.strings.lock().unwrap();
        if let Some(canonical) = strings.get(value) {
            return canonical.clone();
        }
        let canonical: Arc<str> = Arc::from(value);
        strings.insert(canonical.clone());
        self.total_bytes.fetch_add(value.len() as u64, Ordering::Relaxed);
        INTERNED_STRING_BYTES.add(value.len() as f64);
        canonical
    }

    /// Number of distinct interned strings.
    pub fn len(&self) -> usize {
        self.strings.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cumulative byte length of all interned strings. Advisory, used for
    /// memory-usage reporting only.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_intern_idempotent() {
        let pool = StringInternPool::new();
        let a = pool.intern("10.0.0.1:50010");
        let b = pool.intern("10.0.0.1:50010");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.total_bytes(), "10.0.0.1:50010".len() as u64);
    }

    #[test]
    fn test_distinct_strings() {
        let pool = StringInternPool::new();
        pool.intern("host1:50010");
        pool.intern("host2:50010");
        pool.intern("host1:50010");
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_concurrent_interning() {
        let pool = Arc::new(StringInternPool::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        pool.intern(&format!("host{}:50010", i % 10));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(pool.len(), 10);
    }
}
