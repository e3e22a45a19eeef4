use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("relay_requests_total", "Total number of generate requests").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("relay_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("relay_cache_misses_total", "Total cache misses").unwrap();
    pub static ref UPSTREAM_ERRORS: Counter =
        register_counter!("relay_upstream_errors_total", "Failed or empty upstream completions").unwrap();
    pub static ref CACHE_EVICTIONS: Counter =
        register_counter!("relay_cache_evictions_total", "Expired entries removed by the sweeper").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "relay_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("relay_cache_size", "Current number of items in cache").unwrap();
}
