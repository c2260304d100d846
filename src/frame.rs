//! Frame — the envelope every websocket message travels in.
//!
//! ARCHITECTURE
//! ============
//! Clients and server exchange JSON frames over a single websocket. The
//! `syscall` field names the logical channel (`stroke:begin`, `op:commit`,
//! ...) and `data` carries that channel's payload. The transport never
//! inspects `data`; decoding into typed events happens in `protocol`.
//!
//! DESIGN
//! ======
//! - Flat data: payload is always a string-keyed map of JSON values.
//! - Inbound frames only need `syscall`. The other envelope fields are never
//!   read by a handler, so a missing or ill-typed `id`, `ts`, `from`, or
//!   `data` falls back to its default instead of costing the whole event.
//! - There is no reply/status lifecycle. Every frame is a one-way event.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

/// Flat key-value payload. Alias to reduce noise in signatures.
pub type Data = HashMap<String, Value>;

/// The universal message type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient_id")]
    pub id: Uuid,
    /// Milliseconds since Unix epoch. Set automatically at construction.
    #[serde(default, deserialize_with = "lenient_ts")]
    pub ts: i64,
    #[serde(default, deserialize_with = "lenient_from")]
    pub from: Option<String>,
    pub syscall: String,
    #[serde(default, deserialize_with = "lenient_data")]
    pub data: Data,
}

// =============================================================================
// CONSTRUCTORS
// =============================================================================

/// Current time as milliseconds since Unix epoch.
pub(crate) fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

impl Frame {
    /// Create an event frame on the given channel.
    pub fn event(syscall: impl Into<String>, data: Data) -> Self {
        Self { id: Uuid::new_v4(), ts: now_ms(), from: None, syscall: syscall.into(), data }
    }
}

// =============================================================================
// BUILDERS
// =============================================================================

impl Frame {
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// The payload as a JSON object, for typed decoding with serde.
    #[must_use]
    pub fn data_object(&self) -> Value {
        Value::Object(
            self.data
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

// =============================================================================
// LENIENT ENVELOPE
// =============================================================================

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match value.as_str().map(Uuid::parse_str) {
        Some(Ok(id)) => Ok(id),
        _ => Ok(Uuid::new_v4()),
    }
}

fn lenient_ts<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_i64().unwrap_or_default())
}

fn lenient_from<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned))
}

fn lenient_data<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Data, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Object(fields) => Ok(fields.into_iter().collect()),
        _ => Ok(Data::new()),
    }
}

// =============================================================================
// ROUTING
// =============================================================================

impl Frame {
    /// Extract the syscall prefix (everything before the first ':').
    #[must_use]
    pub fn prefix(&self) -> &str {
        let Some((prefix, _)) = self.syscall.split_once(':') else {
            return &self.syscall;
        };
        prefix
    }
}

#[cfg(test)]
#[path = "frame_test.rs"]
mod tests;
