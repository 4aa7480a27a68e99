// Server module - TCP server and connection handling

pub mod config;
pub mod connection;
pub mod listener;

pub use config::ServerConfig;
pub use connection::Connection;
pub use listener::RedisServer;
