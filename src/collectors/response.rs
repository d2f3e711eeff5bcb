//! Validation of decoded vendor utility output
//!
//! Every storcli JSON document wraps its payload as
//! `{"Controllers": [{"Command Status": {..}, "Response Data": <payload>}]}`.
//! The payload is checked here once; everything downstream works on typed
//! structs and never walks the raw document again.

use crate::error::{CheckError, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

const RESPONSE_DATA: &str = "Response Data";
const CONTROLLER_COUNT: &str = "Number of Controllers";

#[derive(Debug, Clone)]
pub struct CommandResponse {
    command: String,
    data: Value,
}

impl CommandResponse {
    /// Decode raw output of a per-controller command. Undecodable output or
    /// an empty payload is treated as the command being unavailable.
    pub fn decode(command: &str, raw: &[u8]) -> Result<Self> {
        Self::validate(command, decode_json(command, raw)?)
    }

    pub fn decode_enumeration(command: &str, raw: &[u8]) -> Result<Self> {
        Self::validate_enumeration(command, decode_json(command, raw)?)
    }

    pub fn validate(command: &str, document: Value) -> Result<Self> {
        match response_data(&document) {
            Some(data) if !is_empty(data) => Ok(Self {
                command: command.to_string(),
                data: data.clone(),
            }),
            _ => Err(CheckError::unavailable(
                command,
                format!("Controllers[0].{} is missing or empty", RESPONSE_DATA),
            )),
        }
    }

    /// Validate the controller enumeration document. A document that decodes
    /// but lacks the controller count means the output format changed, and
    /// that is fatal.
    pub fn validate_enumeration(command: &str, document: Value) -> Result<Self> {
        let count = response_data(&document).and_then(|data| data.get(CONTROLLER_COUNT));

        match count {
            Some(_) => Self::validate(command, document),
            None => Err(CheckError::Schema {
                command: command.to_string(),
                path: format!("Controllers[0].{}['{}']", RESPONSE_DATA, CONTROLLER_COUNT),
            }),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Deserialize the payload into its typed shape
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.data.clone()).map_err(|e| {
            debug!("{}: payload did not match expected shape: {}", self.command, e);
            CheckError::unavailable(&self.command, format!("unexpected payload: {}", e))
        })
    }

    /// Deserialize a value found somewhere inside the payload
    pub fn parse_value<T: DeserializeOwned>(&self, value: &Value) -> Result<T> {
        serde_json::from_value(value.clone())
            .map_err(|e| CheckError::unavailable(&self.command, format!("unexpected payload: {}", e)))
    }
}

fn decode_json(command: &str, raw: &[u8]) -> Result<Value> {
    serde_json::from_slice(raw)
        .map_err(|e| CheckError::unavailable(command, format!("invalid JSON: {}", e)))
}

fn response_data(document: &Value) -> Option<&Value> {
    document
        .get("Controllers")?
        .get(0)?
        .get(RESPONSE_DATA)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
