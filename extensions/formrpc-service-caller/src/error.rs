use formrpc::{ResponseCode, ValueDecodeError};
use std::fmt;

/// Transport-level failure, as reported by the underlying HTTP client.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can go wrong with one call, from the caller's
/// perspective. Each failure mode is a distinct variant so callers can
/// tell local failures, transport failures, and remote outcomes apart.
#[derive(Debug)]
pub enum RpcCallError {
    /// An input value could not be serialized to JSON. No request was
    /// sent.
    EncodeArgs(serde_json::Error),
    /// The round trip itself failed (connection, I/O). No wire code
    /// applies.
    Transport(TransportError),
    /// The transport answered with a non-success HTTP status. The
    /// dispatcher never does this, so the failure happened in front of it.
    Status { status: u16 },
    /// The response body did not parse as a wire envelope.
    DecodeEnvelope(serde_json::Error),
    /// The server answered with a non-`Ok` envelope code.
    Remote { code: ResponseCode, info: String },
    /// An output slot could not be decoded into the caller's declared
    /// output type. Slots before the failing one decoded fine; slots
    /// after it were never touched.
    DecodeOutput(ValueDecodeError),
}

impl RpcCallError {
    /// The wire-code equivalent of this failure, when one exists.
    ///
    /// `Remote` carries the server's own code and `Status` maps to
    /// [`ResponseCode::ServerError`]; purely local failures have none.
    pub fn code(&self) -> Option<ResponseCode> {
        match self {
            RpcCallError::Remote { code, .. } => Some(*code),
            RpcCallError::Status { .. } => Some(ResponseCode::ServerError),
            _ => None,
        }
    }
}

impl fmt::Display for RpcCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcCallError::EncodeArgs(source) => {
                write!(f, "cannot encode argument: {}", source)
            }
            RpcCallError::Transport(source) => write!(f, "transport error: {}", source),
            RpcCallError::Status { status } => {
                write!(f, "server answered with non-success status {}", status)
            }
            RpcCallError::DecodeEnvelope(source) => {
                write!(f, "cannot decode response envelope: {}", source)
            }
            RpcCallError::Remote { code, info } => {
                write!(f, "rpc failed with code {:?}: {}", code, info)
            }
            RpcCallError::DecodeOutput(source) => {
                write!(f, "cannot decode output: {}", source)
            }
        }
    }
}

impl std::error::Error for RpcCallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RpcCallError::EncodeArgs(source) => Some(source),
            RpcCallError::Transport(source) => Some(source.as_ref()),
            RpcCallError::DecodeEnvelope(source) => Some(source),
            RpcCallError::DecodeOutput(source) => Some(source),
            RpcCallError::Status { .. } | RpcCallError::Remote { .. } => None,
        }
    }
}
