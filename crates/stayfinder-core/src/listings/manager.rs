//! Listings state manager.

use super::view::ListingsView;
use crate::gateway::RemoteGateway;
use crate::place::Place;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Owns the shared [`ListingsView`].
///
/// The manager is the single storage owner, but write access is delegated:
/// the [`SearchCoordinator`](super::SearchCoordinator) updates the same view
/// through the public mutators instead of keeping state of its own.
///
/// Every fetch is tagged with a monotonically increasing request ticket at
/// issue time; a resolution is applied only while its ticket is still the
/// newest issued one. A slow initial `fetch_all` that lands after a faster
/// subsequent search is discarded instead of clobbering the search result.
pub struct ListingsManager {
    gateway: Arc<dyn RemoteGateway>,
    view: RwLock<ListingsView>,
    issued: AtomicU64,
    activated: AtomicBool,
}

impl ListingsManager {
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self {
            gateway,
            // Loading starts true: the initial fetch is issued on activation
            // and consumers should not render an empty list as "no results".
            view: RwLock::new(ListingsView {
                items: Vec::new(),
                loading: true,
            }),
            issued: AtomicU64::new(0),
            activated: AtomicBool::new(false),
        }
    }

    /// Runs the initial [`fetch_all`](Self::fetch_all) exactly once; later
    /// activations are no-ops.
    pub async fn activate(&self) {
        if self.activated.swap(true, Ordering::SeqCst) {
            return;
        }
        self.fetch_all().await;
    }

    /// Fetches the full place collection via `GET /places` and replaces the
    /// view, guarded by a request ticket. A failed fetch keeps the current
    /// items and still clears the loading flag.
    pub async fn fetch_all(&self) {
        let ticket = self.begin_request();
        self.set_loading(true).await;

        match self.gateway.fetch_places().await {
            Ok(places) => {
                self.finish_request(ticket, Some(places)).await;
            }
            Err(e) => {
                tracing::warn!("listings fetch failed: {}", e);
                self.finish_request(ticket, None).await;
            }
        }
    }

    /// A copy of the current view. Callers must treat it as a snapshot;
    /// mutating the copy has no effect on shared state.
    pub async fn snapshot(&self) -> ListingsView {
        self.view.read().await.clone()
    }

    /// Replaces the displayed items atomically.
    pub async fn replace_items(&self, items: Vec<Place>) {
        self.view.write().await.items = items;
    }

    /// Sets the loading flag.
    pub async fn set_loading(&self, loading: bool) {
        self.view.write().await.loading = loading;
    }

    /// Issues a new request ticket, invalidating all earlier ones.
    pub fn begin_request(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Applies a resolution for `ticket`: replaces the items (when the
    /// request produced any) and clears the loading flag.
    ///
    /// A stale ticket is discarded in full, items and loading both, because
    /// a newer outstanding request owns the loading flag by then. Returns
    /// whether the resolution was applied.
    pub async fn finish_request(&self, ticket: u64, items: Option<Vec<Place>>) -> bool {
        let mut view = self.view.write().await;
        if ticket != self.issued.load(Ordering::SeqCst) {
            tracing::debug!("discarding stale listings response (ticket {})", ticket);
            return false;
        }
        if let Some(items) = items {
            view.items = items;
        }
        view.loading = false;
        true
    }
}
