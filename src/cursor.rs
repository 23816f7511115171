// Cursor codec: opaque tokens carrying a prior counter snapshot.
//
// A cursor is URL-safe base64 (no padding) over a JSON payload. Tokens
// cross a trust boundary: anything that fails to decode is treated as
// "no prior sample", never as an error.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{DeviceCounters, InterfaceCounters};

/// Encode a cursor payload into an opaque token.
pub fn encode<T: Serialize>(payload: &T) -> String {
    match serde_json::to_vec(payload) {
        Ok(bytes) => URL_SAFE_NO_PAD.encode(bytes),
        Err(_) => String::new(),
    }
}

/// Decode a caller-supplied token. Malformed, truncated or empty tokens
/// yield `None`.
pub fn decode<T: DeserializeOwned>(token: &str) -> Option<T> {
    if token.is_empty() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Current wall-clock time in milliseconds since the Unix epoch, as
/// stamped into every cursor.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// CPU cursor payload: whole-machine and per-core 8-component time
/// vectors at capture time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuCursor {
    pub total: Vec<f64>,
    pub cores: Vec<Vec<f64>>,
    pub timestamp_ms: i64,
}

/// One entry of the process cursor: exactly one per process that made it
/// into the previous response's limited result set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessCursorEntry {
    pub pid: i32,
    pub ticks: f64,
    pub timestamp_ms: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkCursor {
    pub timestamp_ms: i64,
    pub interfaces: BTreeMap<String, InterfaceCounters>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskCursor {
    pub timestamp_ms: i64,
    pub devices: BTreeMap<String, DeviceCounters>,
}
