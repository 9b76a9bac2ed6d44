//! # Quill Shared
//!
//! Wire types of the HTTP API: validated request payloads, list query
//! parameters, and the JSON envelopes every response is wrapped in.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, FieldViolation};
