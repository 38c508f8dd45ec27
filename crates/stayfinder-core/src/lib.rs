pub mod config;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod listings;
pub mod place;
pub mod session;
pub mod user;

// Re-export common error type
pub use error::{Result, StayError};
