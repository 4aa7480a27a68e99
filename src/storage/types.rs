// Redis value types

use super::zset::ZSet;
use bytes::Bytes;
use std::fmt;

/// Type tag of a stored value, as reported by `TYPE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    ZSet,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::ZSet => "zset",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RedisValue {
    String(Bytes),
    ZSet(ZSet),
}

impl RedisValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            RedisValue::String(_) => ValueType::String,
            RedisValue::ZSet(_) => ValueType::ZSet,
        }
    }

    pub fn as_string(&self) -> Option<&Bytes> {
        match self {
            RedisValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_zset(&self) -> Option<&ZSet> {
        match self {
            RedisValue::ZSet(z) => Some(z),
            _ => None,
        }
    }

    pub fn as_zset_mut(&mut self) -> Option<&mut ZSet> {
        match self {
            RedisValue::ZSet(z) => Some(z),
            _ => None,
        }
    }
}
