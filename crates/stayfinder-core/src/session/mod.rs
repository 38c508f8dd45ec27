//! Session state: the authenticated user, its durable persistence, and the
//! manager that owns the whole lifecycle.

pub mod manager;
pub mod model;
pub mod store;

pub use manager::{AuthSessionManager, Outcome, UpdateOutcome, UploadOutcome, UserUpdate};
pub use model::Session;
pub use store::SessionStore;
