use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// Outcome of one dispatched call, carried as the `Code` field of the
/// response envelope. Application-level outcomes never surface through the
/// HTTP status line; they live here.
#[repr(u8)]
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum ResponseCode {
    /// The method ran to completion; `outs` holds its encoded outputs.
    Ok = 0,
    /// No method with the requested name is registered; `info` echoes the
    /// name.
    UnknownMethod = 1,
    /// The method panicked during invocation; `info` carries the panic
    /// description. Contained at the request boundary.
    Panic = 2,
    /// The transport answered with a non-success HTTP status. Produced on
    /// the client side only; the dispatcher never emits it.
    ServerError = 3,
}

/// The JSON response envelope.
///
/// `outs` is double-encoded: the envelope itself is JSON, and every entry is
/// the JSON text of one output value. This keeps each output independently
/// decodable without the envelope knowing any output types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEnvelope {
    #[serde(rename = "Code")]
    pub code: ResponseCode,
    #[serde(rename = "Info", default)]
    pub info: String,
    #[serde(rename = "Outs", default)]
    pub outs: Vec<String>,
}

impl WireEnvelope {
    /// Build a success envelope from already-encoded output slots.
    pub fn ok(outs: Vec<String>) -> Self {
        Self {
            code: ResponseCode::Ok,
            info: String::new(),
            outs,
        }
    }

    /// Build an `UnknownMethod` envelope echoing the requested name.
    pub fn unknown_method(method: &str) -> Self {
        Self {
            code: ResponseCode::UnknownMethod,
            info: method.to_string(),
            outs: Vec::new(),
        }
    }

    /// Build a `Panic` envelope carrying the fault description.
    pub fn panic(info: impl Into<String>) -> Self {
        Self {
            code: ResponseCode::Panic,
            info: info.into(),
            outs: Vec::new(),
        }
    }

    /// Build a `ServerError` envelope. Used by callers to represent a
    /// non-success transport status in envelope form.
    pub fn server_error(info: impl Into<String>) -> Self {
        Self {
            code: ResponseCode::ServerError,
            info: info.into(),
            outs: Vec::new(),
        }
    }
}
