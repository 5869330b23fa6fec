use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::debug;

use crate::core::PeriodKey;
use crate::modules::overview::models::{EvolutionSeries, OverviewTrend};

/// Entries kept per map before it is emptied and refilled
pub const MAX_CACHED_ENTRIES: usize = 64;

/// Memoized dashboard payloads.
///
/// Only complete results are stored. Cleared on explicit refresh and after
/// every management write. Callers take a [`generation`](Self::generation)
/// before reading storage and hand it back when storing; a result computed
/// before an invalidation is dropped.
#[derive(Default)]
pub struct DashboardCache {
    generation: AtomicU64,
    overviews: RwLock<HashMap<PeriodKey, OverviewTrend>>,
    evolutions: RwLock<HashMap<(PeriodKey, usize), EvolutionSeries>>,
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token identifying the current cache contents
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn overview(&self, period: PeriodKey) -> Option<OverviewTrend> {
        self.overviews.read().await.get(&period).cloned()
    }

    pub async fn store_overview(&self, generation: u64, trend: &OverviewTrend) {
        if trend.is_degraded() {
            return;
        }
        let mut overviews = self.overviews.write().await;
        self.insert_current(&mut *overviews, generation, trend.current.period, trend.clone());
    }

    /// Series of `window` months ending at `anchor`
    pub async fn evolution(&self, anchor: PeriodKey, window: usize) -> Option<EvolutionSeries> {
        self.evolutions.read().await.get(&(anchor, window)).cloned()
    }

    pub async fn store_evolution(&self, generation: u64, anchor: PeriodKey, series: &EvolutionSeries) {
        if series.is_degraded() {
            return;
        }
        let mut evolutions = self.evolutions.write().await;
        self.insert_current(&mut *evolutions, generation, (anchor, series.window), series.clone());
    }

    pub async fn invalidate(&self) {
        let mut overviews = self.overviews.write().await;
        let mut evolutions = self.evolutions.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        overviews.clear();
        evolutions.clear();
        debug!("Dashboard cache cleared");
    }

    // Called with the map's write lock held, which `invalidate` also takes
    // before bumping the generation.
    fn insert_current<K: Eq + Hash, V>(&self, map: &mut HashMap<K, V>, generation: u64, key: K, value: V) {
        if generation != self.generation() {
            debug!("Dropping dashboard result computed before the last write");
            return;
        }
        if map.len() >= MAX_CACHED_ENTRIES && !map.contains_key(&key) {
            map.clear();
        }
        map.insert(key, value);
    }
}
