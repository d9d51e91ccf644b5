//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements    | Connects to                    |
//! |-----------------|---------------|--------------------------------|
//! | `log_sink`      | EventSink     | Serial log output              |
//! | `server_config` | ConfigSource  | Coordination server JSON body  |
//!
//! The pump adapter lives in [`crate::drivers::pump`].

pub mod log_sink;
pub mod server_config;
