// Keyspace implementation

use super::types::{RedisValue, ValueType};
use super::zset::ZSet;
use crate::commands::CommandError;
use bytes::Bytes;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Key -> typed value map shared by every connection.
///
/// Accessors that look at a value assert its type first: an absent key and a
/// key of the wrong type are always reported differently. Mutations run inside
/// a single `DashMap` entry guard, so each command sees and leaves a key in a
/// consistent state.
#[derive(Debug, Default)]
pub struct Keyspace {
    data: DashMap<Bytes, RedisValue>,
}

impl Keyspace {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    pub fn value_type(&self, key: &[u8]) -> Option<ValueType> {
        self.data.get(key).map(|v| v.value().value_type())
    }

    /// Overwrite `key` regardless of what it held before
    pub fn set(&self, key: Bytes, value: RedisValue) {
        self.data.insert(key, value);
    }

    /// Store a string only if the presence of `key` matches `must_exist`.
    /// Returns whether the write happened.
    pub fn set_string_if(&self, key: Bytes, value: Bytes, must_exist: bool) -> bool {
        match self.data.entry(key) {
            Entry::Occupied(mut entry) if must_exist => {
                entry.insert(RedisValue::String(value));
                true
            }
            Entry::Vacant(entry) if !must_exist => {
                entry.insert(RedisValue::String(value));
                true
            }
            _ => false,
        }
    }

    pub fn get_string(&self, key: &[u8]) -> Result<Option<Bytes>, CommandError> {
        match self.data.get(key) {
            Some(entry) => entry
                .value()
                .as_string()
                .map(|s| Some(s.clone()))
                .ok_or(CommandError::WrongType),
            None => Ok(None),
        }
    }

    /// Run `f` against the sorted set at `key` without copying it.
    /// `Ok(None)` if the key is absent.
    pub fn read_zset<R>(
        &self,
        key: &[u8],
        f: impl FnOnce(&ZSet) -> R,
    ) -> Result<Option<R>, CommandError> {
        match self.data.get(key) {
            Some(entry) => {
                let zset = entry.value().as_zset().ok_or(CommandError::WrongType)?;
                Ok(Some(f(zset)))
            }
            None => Ok(None),
        }
    }

    /// Mutate the sorted set at `key` atomically.
    ///
    /// With `create` an absent key starts out as an empty set; without it the
    /// call returns `Ok(None)`. A set left empty by `f` is evicted, so the
    /// keyspace never holds an empty sorted set. A key of another type is
    /// rejected before `f` runs.
    pub fn update_zset<R>(
        &self,
        key: &[u8],
        create: bool,
        f: impl FnOnce(&mut ZSet) -> R,
    ) -> Result<Option<R>, CommandError> {
        // Fast path: don't allocate an owned key for lookups that won't insert
        if !create && !self.data.contains_key(key) {
            return Ok(None);
        }

        match self.data.entry(Bytes::copy_from_slice(key)) {
            Entry::Occupied(mut entry) => {
                let zset = entry
                    .get_mut()
                    .as_zset_mut()
                    .ok_or(CommandError::WrongType)?;
                let result = f(zset);
                if zset.is_empty() {
                    entry.remove();
                }
                Ok(Some(result))
            }
            Entry::Vacant(entry) => {
                if !create {
                    return Ok(None);
                }
                let mut zset = ZSet::new();
                let result = f(&mut zset);
                if !zset.is_empty() {
                    entry.insert(RedisValue::ZSet(zset));
                }
                Ok(Some(result))
            }
        }
    }

    /// Remove every listed key, returning how many existed
    pub fn delete<K: AsRef<[u8]>>(&self, keys: &[K]) -> usize {
        keys.iter()
            .filter(|key| self.data.remove(key.as_ref()).is_some())
            .count()
    }

    /// Count listed keys that exist; duplicates count each time
    pub fn exists<K: AsRef<[u8]>>(&self, keys: &[K]) -> usize {
        keys.iter()
            .filter(|key| self.data.contains_key(key.as_ref()))
            .count()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&self) {
        self.data.clear();
    }
}
