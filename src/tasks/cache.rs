//! # Receive-side shadow cache.
//!
//! Tasks that accept shadow records embed a [`ShadowCache`] and call
//! [`absorb`](ShadowCache::absorb) first thing in `receive_shadow`. The
//! cache clones the payload on the way in — `serde_json::Value::clone` is a
//! deep copy — so the sender mutating its value afterwards cannot corrupt
//! the receiver's view.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::messages::ShadowRecord;

/// String-keyed cache of shadow payloads.
#[derive(Debug, Default)]
pub struct ShadowCache {
    slots: Mutex<HashMap<String, Value>>,
}

impl ShadowCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the record's payload under its key, deep-copied.
    ///
    /// An absent payload is stored as `Value::Null` — the key's presence is
    /// the signal.
    pub fn absorb(&self, record: &ShadowRecord) {
        let value = record.info().cloned().unwrap_or(Value::Null);
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.insert(record.key().to_string(), value);
    }

    /// Copies the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.get(key).cloned()
    }

    /// True when a value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.contains_key(key)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
