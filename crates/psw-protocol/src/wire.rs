//! JSON wire form of the protocol
//!
//! The host environment transports opaque strings; these helpers are the
//! only legitimate way on or off the wire. A payload that does not decode
//! into the closed message set is rejected here, before any processing.

use crate::messages::{ControlEvent, UiRequest};

/// Wire-level protocol failure
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Incoming request text is not a valid `UiRequest`
    #[error("malformed request payload: {0}")]
    MalformedRequest(String),

    /// Incoming event text is not a valid `ControlEvent`
    #[error("malformed event payload: {0}")]
    MalformedEvent(String),

    /// Outgoing message could not be encoded
    #[error("failed to encode message: {0}")]
    Encode(String),
}

/// Decode one request off the wire
pub fn decode_request(raw: &str) -> Result<UiRequest, ProtocolError> {
    serde_json::from_str(raw).map_err(|error| ProtocolError::MalformedRequest(error.to_string()))
}

/// Encode one request for the wire
pub fn encode_request(request: &UiRequest) -> Result<String, ProtocolError> {
    serde_json::to_string(request).map_err(|error| ProtocolError::Encode(error.to_string()))
}

/// Decode one event off the wire
pub fn decode_event(raw: &str) -> Result<ControlEvent, ProtocolError> {
    serde_json::from_str(raw).map_err(|error| ProtocolError::MalformedEvent(error.to_string()))
}

/// Encode one event for the wire
pub fn encode_event(event: &ControlEvent) -> Result<String, ProtocolError> {
    serde_json::to_string(event).map_err(|error| ProtocolError::Encode(error.to_string()))
}
