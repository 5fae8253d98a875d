use serde_json::Value;

use super::{Engine, JSON_ENGINE};
use crate::error::CodecResult;

/// JSON documents through `serde_json`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonEngine;

impl Engine<Value> for JsonEngine {
    fn name(&self) -> &'static str {
        JSON_ENGINE
    }

    fn encode(&self, value: &Value) -> CodecResult<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<Value> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
