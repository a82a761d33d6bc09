use prometheus::{register_counter, register_gauge};
use prometheus::{Counter, Gauge};

lazy_static! {
    pub static ref BLOCK_MD_CACHE_HIT_COUNT: Counter = register_counter!(
        "block_md_cache_hit_count",
        "Number of block metadata cache lookups served from the cache"
    )
    .unwrap();
    pub static ref BLOCK_MD_CACHE_MISS_COUNT: Counter = register_counter!(
        "block_md_cache_miss_count",
        "Number of block metadata cache lookups that required a load"
    )
    .unwrap();
    pub static ref BLOCK_MD_LOAD_COUNT: Counter = register_counter!(
        "block_md_load_count",
        "Number of partition block metadata loads executed"
    )
    .unwrap();
    pub static ref BLOCK_MD_LOAD_ERROR_COUNT: Counter = register_counter!(
        "block_md_load_error_count",
        "Number of partition block metadata loads that failed"
    )
    .unwrap();
    pub static ref BLOCK_MD_CACHE_EVICTION_COUNT: Counter = register_counter!(
        "block_md_cache_eviction_count",
        "Number of block metadata cache entries evicted or expired"
    )
    .unwrap();
    pub static ref INTERNED_STRING_BYTES: Gauge = register_gauge!(
        "interned_string_bytes",
        "Cumulative byte length of interned file path and host:port strings"
    )
    .unwrap();
}
