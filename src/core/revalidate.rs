//! Cached views and their invalidation
//!
//! A [`Revalidator`] is told which logical path is stale after a successful
//! mutation. [`ViewCache`] is the in-process implementation: it keeps one
//! rendered value per path, drops it on revalidation and announces the
//! revalidation on the [`EventBus`].

use crate::core::events::{DashboardEvent, EventBus};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Marks cached renderings of a path as stale
///
/// Must be idempotent; callers issue it without synchronisation.
pub trait Revalidator: Send + Sync {
    fn revalidate_path(&self, path: &str);
}

/// Per-path cache of rendered views
#[derive(Clone, Default)]
pub struct ViewCache {
    views: Arc<DashMap<String, Value>>,
    /// Bumped by every revalidation; renders that straddle one are not stored.
    generation: Arc<AtomicU64>,
    events: Option<EventBus>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce every revalidation on `bus`
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn event_bus(&self) -> Option<&EventBus> {
        self.events.as_ref()
    }

    pub fn get(&self, path: &str) -> Option<Value> {
        self.views.get(path).map(|v| v.value().clone())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.views.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Serve `path` from cache, rendering and storing it on a miss.
    ///
    /// A render that overlaps a revalidation is returned but not cached.
    pub async fn get_or_render<F, Fut, E>(&self, path: &str, render: F) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        if let Some(view) = self.get(path) {
            tracing::debug!(path, "view cache hit");
            return Ok(view);
        }

        let started_at = self.generation.load(Ordering::Acquire);
        let view = render().await?;

        // Checked under the entry lock that `revalidate_path` also takes, so a
        // revalidation cannot slip in between the check and the insert.
        let entry = self.views.entry(path.to_string());
        if self.generation.load(Ordering::Acquire) == started_at {
            entry.insert(view.clone());
        }
        tracing::debug!(path, "view cache miss");
        Ok(view)
    }
}

impl Revalidator for ViewCache {
    fn revalidate_path(&self, path: &str) {
        let entry = self.views.entry(path.to_string());
        self.generation.fetch_add(1, Ordering::AcqRel);
        if let Entry::Occupied(entry) = entry {
            entry.remove();
        }
        tracing::debug!(path, "revalidated");

        if let Some(bus) = &self.events {
            bus.publish(DashboardEvent::Revalidated {
                path: path.to_string(),
            });
        }
    }
}
