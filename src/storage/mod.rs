// Storage module - Keyspace and data structures

pub mod db;
pub mod types;
pub mod zset;

pub use db::Keyspace;
pub use types::{RedisValue, ValueType};
pub use zset::{ScoreRange, ZAddFlags, ZAddOutcome, ZSet};
