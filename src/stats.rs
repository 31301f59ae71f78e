use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub struct Stats {
    start_ms: AtomicU64,
    last_log_ms: AtomicU64,

    cycles: AtomicU64,
    failed_cycles: AtomicU64,

    pages_fetched: AtomicU64,
    page_errors: AtomicU64,
    listings_fetched: AtomicU64,
    listings_malformed: AtomicU64,
    listings_kept: AtomicU64,

    offers_published: AtomicU64,
}

impl Stats {
    pub fn new(now_ms: u64) -> Arc<Self> {
        let s = Arc::new(Self::default());
        s.start_ms.store(now_ms, Ordering::Relaxed);
        s.last_log_ms.store(now_ms, Ordering::Relaxed);
        s
    }

    pub fn inc_cycle(&self) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failed_cycle(&self) {
        self.failed_cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_page(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_page_error(&self) {
        self.page_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_listings(&self, fetched: u64, malformed: u64, kept: u64) {
        self.listings_fetched.fetch_add(fetched, Ordering::Relaxed);
        self.listings_malformed.fetch_add(malformed, Ordering::Relaxed);
        self.listings_kept.fetch_add(kept, Ordering::Relaxed);
    }

    pub fn add_offers(&self, n: u64) {
        self.offers_published.fetch_add(n, Ordering::Relaxed);
    }

    pub fn should_log(&self, now_ms: u64, every_sec: u64) -> bool {
        if every_sec == 0 { return false; }
        let last = self.last_log_ms.load(Ordering::Relaxed);
        now_ms.saturating_sub(last) >= every_sec.saturating_mul(1000)
    }

    pub fn mark_logged(&self, now_ms: u64) {
        self.last_log_ms.store(now_ms, Ordering::Relaxed);
    }

    pub fn snapshot(&self, now_ms: u64) -> StatsSnapshot {
        let start = self.start_ms.load(Ordering::Relaxed);
        StatsSnapshot {
            now_ms,
            up_sec: now_ms.saturating_sub(start) / 1000,
            cycles: self.cycles.load(Ordering::Relaxed),
            failed_cycles: self.failed_cycles.load(Ordering::Relaxed),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            page_errors: self.page_errors.load(Ordering::Relaxed),
            listings_fetched: self.listings_fetched.load(Ordering::Relaxed),
            listings_malformed: self.listings_malformed.load(Ordering::Relaxed),
            listings_kept: self.listings_kept.load(Ordering::Relaxed),
            offers_published: self.offers_published.load(Ordering::Relaxed),
        }
    }

    pub fn log(&self, now_ms: u64) -> StatsSnapshot {
        let ss = self.snapshot(now_ms);
        self.mark_logged(now_ms);
        tracing::info!(
            up_sec = ss.up_sec,
            cycles = ss.cycles,
            failed_cycles = ss.failed_cycles,
            pages_fetched = ss.pages_fetched,
            page_errors = ss.page_errors,
            listings_fetched = ss.listings_fetched,
            listings_malformed = ss.listings_malformed,
            listings_kept = ss.listings_kept,
            offers_published = ss.offers_published,
            "stats"
        );
        ss
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub now_ms: u64,
    pub up_sec: u64,
    pub cycles: u64,
    pub failed_cycles: u64,
    pub pages_fetched: u64,
    pub page_errors: u64,
    pub listings_fetched: u64,
    pub listings_malformed: u64,
    pub listings_kept: u64,
    pub offers_published: u64,
}
