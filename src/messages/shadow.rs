//! # Shadow records: targeted state hand-offs between tasks.
//!
//! A [`ShadowRecord`] carries a value produced by one task into the private
//! cache of the task named as its destination, keyed by a string.
//!
//! ## Ownership
//! The producer owns `info` until delivery; the receiving side takes a deep
//! copy on receipt (see `ShadowCache`), so later mutation by the sender
//! cannot corrupt the receiver's cache.
//!
//! ## Delivery
//! If the destination is not registered at delivery time, the record is
//! silently dropped — a task that arrives later must be re-sent state rather
//! than rely on buffering.

use serde_json::Value;

use crate::error::RecordError;

/// A value routed from one task into another task's private cache.
#[derive(Debug, Clone)]
pub struct ShadowRecord {
    destination: String,
    key: String,
    info: Option<Value>,
}

impl ShadowRecord {
    /// Creates a record with no payload; attach one with
    /// [`with_info`](Self::with_info).
    ///
    /// Destination and key must be non-empty.
    pub fn new(
        destination: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<Self, RecordError> {
        let destination = destination.into();
        let key = key.into();
        if destination.is_empty() {
            return Err(RecordError::EmptyDestination);
        }
        if key.is_empty() {
            return Err(RecordError::EmptyKey);
        }
        Ok(Self {
            destination,
            key,
            info: None,
        })
    }

    /// Attaches the payload value.
    pub fn with_info(mut self, info: Value) -> Self {
        self.info = Some(info);
        self
    }

    /// Name of the task this record is addressed to.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Cache key the payload is stored under on receipt.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The payload, if any.
    pub fn info(&self) -> Option<&Value> {
        self.info.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_empty_fields() {
        assert_eq!(
            ShadowRecord::new("", "score").unwrap_err(),
            RecordError::EmptyDestination
        );
        assert_eq!(
            ShadowRecord::new("standings", "").unwrap_err(),
            RecordError::EmptyKey
        );
    }

    #[test]
    fn payload_is_optional() {
        let bare = ShadowRecord::new("standings", "scores").unwrap();
        assert!(bare.info().is_none());

        let full = ShadowRecord::new("standings", "scores")
            .unwrap()
            .with_info(json!({"home": 3, "away": 1}));
        assert_eq!(full.info().unwrap()["home"], 3);
    }
}
