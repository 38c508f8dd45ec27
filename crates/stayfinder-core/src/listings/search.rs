//! Destination search workflow.

use super::manager::ListingsManager;
use crate::gateway::RemoteGateway;
use std::sync::Arc;

/// UI-triggered search that writes into the shared listings view.
///
/// The coordinator never owns listings storage: it calls the gateway and
/// funnels every write through [`ListingsManager`]'s delegated mutators.
pub struct SearchCoordinator {
    gateway: Arc<dyn RemoteGateway>,
    listings: Arc<ListingsManager>,
}

impl SearchCoordinator {
    pub fn new(gateway: Arc<dyn RemoteGateway>, listings: Arc<ListingsManager>) -> Self {
        Self { gateway, listings }
    }

    /// Searches places by destination via `GET /places/search/:text`.
    ///
    /// The input is trimmed and passed through even when empty: clearing the
    /// search box re-queries with the empty string, and whether that means
    /// "everything" or "nothing" is the backend's contract.
    ///
    /// A failed search is swallowed here (logged, not returned): the items
    /// keep their last known value, since a stale-but-valid result beats an
    /// empty list. Loading is cleared on every exit path, guarded by the
    /// manager's request ticket so a stale response cannot disturb a newer
    /// fetch.
    pub async fn search(&self, destination: &str) {
        let query = destination.trim();
        let ticket = self.listings.begin_request();
        self.listings.set_loading(true).await;

        match self.gateway.search_places(query).await {
            Ok(places) => {
                self.listings.finish_request(ticket, Some(places)).await;
            }
            Err(e) => {
                tracing::warn!("destination search for {:?} failed: {}", query, e);
                self.listings.finish_request(ticket, None).await;
            }
        }
    }
}
