//! Listings state: the shared view of currently displayed places, its
//! owning manager, and the search workflow that writes through it.

pub mod manager;
pub mod search;
pub mod view;

pub use manager::ListingsManager;
pub use search::SearchCoordinator;
pub use view::ListingsView;
