//! Configuration types.
//!
//! Loading and merging configuration files is the host application's job;
//! this module defines the keys the transport reads and an environment
//! fallback.

mod settings;

pub use settings::{ConfigOverrides, TransportConfig, ENV_API_KEY, ENV_HOST, ENV_SSL_VERIFY};
