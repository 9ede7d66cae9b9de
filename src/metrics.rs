use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Operation counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub menus_created: Arc<AtomicU64>,
    pub menus_updated: Arc<AtomicU64>,
    pub menus_deleted: Arc<AtomicU64>,
    pub menus_moved: Arc<AtomicU64>,
    pub menus_reordered: Arc<AtomicU64>,
    pub tree_reads: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            menus_created: Arc::new(AtomicU64::new(0)),
            menus_updated: Arc::new(AtomicU64::new(0)),
            menus_deleted: Arc::new(AtomicU64::new(0)),
            menus_moved: Arc::new(AtomicU64::new(0)),
            menus_reordered: Arc::new(AtomicU64::new(0)),
            tree_reads: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_created(&self) {
        self.menus_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_updated(&self) {
        self.menus_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_deleted(&self) {
        self.menus_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_moved(&self) {
        self.menus_moved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_reordered(&self) {
        self.menus_reordered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_tree_reads(&self) {
        self.tree_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            menus_created: self.menus_created.load(Ordering::Relaxed),
            menus_updated: self.menus_updated.load(Ordering::Relaxed),
            menus_deleted: self.menus_deleted.load(Ordering::Relaxed),
            menus_moved: self.menus_moved.load(Ordering::Relaxed),
            menus_reordered: self.menus_reordered.load(Ordering::Relaxed),
            tree_reads: self.tree_reads.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub menus_created: u64,
    pub menus_updated: u64,
    pub menus_deleted: u64,
    pub menus_moved: u64,
    pub menus_reordered: u64,
    pub tree_reads: u64,
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    /// Prometheus text exposition format.
    pub fn to_prometheus(&self) -> String {
        let counters = [
            ("menus_created", "Menus created", self.menus_created),
            ("menus_updated", "Menus updated", self.menus_updated),
            ("menus_deleted", "Menus deleted (subtree roots)", self.menus_deleted),
            ("menus_moved", "Menus moved to another parent", self.menus_moved),
            ("menus_reordered", "Menus reordered within their group", self.menus_reordered),
            ("tree_reads", "Full tree reads", self.tree_reads),
        ];
        let mut out = String::new();
        for (name, help, value) in counters {
            out.push_str(&format!(
                "# HELP menutree_{name} {help}\n# TYPE menutree_{name} counter\nmenutree_{name} {value}\n"
            ));
        }
        out.push_str(&format!(
            "# HELP menutree_uptime_seconds Uptime seconds\n# TYPE menutree_uptime_seconds gauge\nmenutree_uptime_seconds {}\n",
            self.uptime_seconds
        ));
        out
    }
}
