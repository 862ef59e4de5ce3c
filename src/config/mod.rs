//! Configuration loading for the SGK gateway.
//!
//! Endpoint sets, timeouts, the rate ceiling, the batch size, penalty bands
//! and extra catalog entries come from YAML files. Credentials never do:
//! the caller's storage layer resolves them.
//!
//! # Example
//!
//! ```no_run
//! use sgk_gateway::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/sgk").unwrap();
//! println!("Max batch size: {}", loader.config().max_batch_size);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{ErrorCodesConfig, GatewayConfig, RateLimitConfig};
