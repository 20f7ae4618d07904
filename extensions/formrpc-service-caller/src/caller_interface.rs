use crate::error::{RpcCallError, TransportError};
use formrpc::{FormRequest, FromJsonValues, ResponseCode, ToJsonValues, WireEnvelope};

/// The raw result of one HTTP round trip: transport status plus response
/// body, before any envelope interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Defines a generic capability for making RPC calls.
///
/// Implementors supply only the transport hook ([`round_trip`]); the call
/// protocol itself — argument encoding, envelope interpretation, output
/// decoding — is provided by the trait and therefore identical across
/// transports.
///
/// [`round_trip`]: RpcServiceCallerInterface::round_trip
#[async_trait::async_trait]
pub trait RpcServiceCallerInterface: Send + Sync {
    /// Sends one encoded request to the service path and returns the
    /// transport status and raw body. Implementations must not interpret
    /// the body.
    async fn round_trip(&self, request: &FormRequest) -> Result<RawResponse, TransportError>;

    /// Performs one call.
    ///
    /// `inputs` is a tuple of the method's positional arguments; the output
    /// tuple type `O` fixes how many slots are decoded from the response.
    /// Inputs are encoded element-wise and fail fast: the first
    /// unserializable value aborts the call before anything is sent.
    ///
    /// Failure modes, in the order they are detected: local encode,
    /// transport, non-success status, envelope decode, remote code,
    /// per-slot output decode. See [`RpcCallError`].
    async fn call<I, O>(&self, method: &str, inputs: I) -> Result<O, RpcCallError>
    where
        I: ToJsonValues + Send,
        O: FromJsonValues + Send,
    {
        let ins = inputs.to_json_values().map_err(RpcCallError::EncodeArgs)?;
        let request = FormRequest::new(method, ins);

        let response = self
            .round_trip(&request)
            .await
            .map_err(RpcCallError::Transport)?;
        if !response.is_success() {
            return Err(RpcCallError::Status {
                status: response.status,
            });
        }

        let envelope: WireEnvelope =
            serde_json::from_slice(&response.body).map_err(RpcCallError::DecodeEnvelope)?;
        if envelope.code != ResponseCode::Ok {
            return Err(RpcCallError::Remote {
                code: envelope.code,
                info: envelope.info,
            });
        }

        O::from_json_values(&envelope.outs).map_err(RpcCallError::DecodeOutput)
    }
}
