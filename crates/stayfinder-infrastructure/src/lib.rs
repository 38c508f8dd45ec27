//! Concrete collaborators for the stayfinder client: the reqwest-backed
//! gateway, the file-backed session store, configuration loading, and
//! unified path resolution.

pub mod config_storage;
pub mod file_session_store;
pub mod http_gateway;
pub mod paths;

pub use config_storage::ConfigStorage;
pub use file_session_store::FileSessionStore;
pub use http_gateway::HttpGateway;
pub use paths::StayPaths;
