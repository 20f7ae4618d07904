use formrpc::{DEFAULT_RPC_PATH, FormRequest};
use formrpc_service_caller::{RawResponse, RpcServiceCallerInterface, TransportError};

/// An RPC client: a reqwest handle plus the fixed target URL.
///
/// Stateless across calls; cloning is cheap and clones share the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http_client: reqwest::Client,
    endpoint_url: String,
}

impl RpcClient {
    /// Creates a client for a service registered under the default path.
    /// `host` is scheme + authority, e.g. `"http://localhost:1235"`.
    pub fn new(host: &str) -> RpcClient {
        Self::with_path(host, DEFAULT_RPC_PATH)
    }

    /// Creates a client for a service registered under a specific path.
    pub fn with_path(host: &str, path: &str) -> RpcClient {
        Self::with_http_client(reqwest::Client::new(), host, path)
    }

    /// Creates a client reusing a caller-configured `reqwest::Client`,
    /// e.g. one carrying default headers or timeouts.
    pub fn with_http_client(http_client: reqwest::Client, host: &str, path: &str) -> RpcClient {
        RpcClient {
            http_client,
            endpoint_url: format!("{host}{path}"),
        }
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

#[async_trait::async_trait]
impl RpcServiceCallerInterface for RpcClient {
    async fn round_trip(&self, request: &FormRequest) -> Result<RawResponse, TransportError> {
        tracing::debug!(method = %request.method, url = %self.endpoint_url, "sending rpc call");
        let response = self
            .http_client
            .post(&self.endpoint_url)
            .form(&request.to_pairs())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(RawResponse { status, body })
    }
}
