pub mod config;
pub mod fetch;
pub mod http_cache;
pub mod http_client;
pub mod library;
pub mod lineup;
pub mod loader;
pub mod logging;
pub mod pool;
pub mod pool_cache;
pub mod provider;
pub mod roster_csv;
pub mod search;
pub mod state;
