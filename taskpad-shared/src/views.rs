/// Cached views and their invalidation
///
/// Mutating commands announce "the dashboard of owner X is stale" through
/// the [`ViewInvalidator`] port and know nothing else about caching.
///
/// - [`NoopInvalidator`]: for callers with no cached views to keep fresh
/// - [`DashboardCache`]: per-owner cache of the rendered dashboard list

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::todo::Todo;

/// Route of the dashboard view whose cache mutations invalidate
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// Receives "this view is stale" signals after successful mutations
#[async_trait]
pub trait ViewInvalidator: Send + Sync {
    /// Marks `view` stale for `owner_id`
    async fn invalidate(&self, owner_id: &str, view: &str);
}

/// Invalidator that ignores every signal
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInvalidator;

#[async_trait]
impl ViewInvalidator for NoopInvalidator {
    async fn invalidate(&self, _owner_id: &str, _view: &str) {}
}

/// Rendered dashboard for one owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Owner's todos, newest first
    pub todos: Vec<Todo>,

    /// When this view was computed
    pub rendered_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct CacheState {
    /// Bumped on every dashboard invalidation, for any owner
    epoch: u64,
    views: HashMap<String, DashboardView>,
}

/// Per-owner dashboard cache
///
/// Holds an entry only for owners with a fresh rendered view; invalidation
/// removes the entry, so owners who never render leave nothing behind.
///
/// A render started before an invalidation must not be stored after it, so
/// renders are bracketed by [`DashboardCache::begin_render`] and
/// [`DashboardCache::store`]. The token is a cache-wide epoch: a render that
/// overlaps any invalidation is served but not cached.
#[derive(Debug, Default)]
pub struct DashboardCache {
    state: RwLock<CacheState>,
}

impl DashboardCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached view for `owner_id`, if still fresh
    pub async fn get(&self, owner_id: &str) -> Option<DashboardView> {
        self.state.read().await.views.get(owner_id).cloned()
    }

    /// Token to pass to [`DashboardCache::store`]
    pub async fn begin_render(&self) -> u64 {
        self.state.read().await.epoch
    }

    /// Caches `view` unless a dashboard was invalidated since `generation`
    /// was taken; returns whether it was stored
    pub async fn store(&self, owner_id: &str, generation: u64, view: DashboardView) -> bool {
        let mut state = self.state.write().await;

        if state.epoch != generation {
            tracing::debug!(owner_id = %owner_id, "Discarding dashboard render invalidated mid-flight");
            return false;
        }

        state.views.insert(owner_id.to_string(), view);
        true
    }

    /// Number of owners with a cached view
    pub async fn len(&self) -> usize {
        self.state.read().await.views.len()
    }

    /// Whether no view is cached
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.views.is_empty()
    }
}

#[async_trait]
impl ViewInvalidator for DashboardCache {
    async fn invalidate(&self, owner_id: &str, view: &str) {
        if view != DASHBOARD_VIEW {
            tracing::debug!(view = %view, "No cache for view");
            return;
        }

        let mut state = self.state.write().await;
        state.epoch += 1;
        let evicted = state.views.remove(owner_id).is_some();

        tracing::debug!(owner_id = %owner_id, epoch = state.epoch, evicted, "Dashboard view invalidated");
    }
}
