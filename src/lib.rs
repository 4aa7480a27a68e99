// Redis-compatible keyspace server with sorted set commands

pub mod commands;
pub mod config;
pub mod protocol;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use commands::{CommandError, Dispatcher};
pub use config::StaticConfig;
pub use protocol::{RespParser, RespSerializer, RespValue};
pub use server::{RedisServer, ServerConfig};
pub use storage::{Keyspace, RedisValue, ZSet};
