//! Note: This `RpcServer` is a reference implementation and does not include
//! authentication or authorization mechanisms. It is best suited for trusted,
//! internal network communication. Any transport that can hand a parsed
//! [`FormRequest`] and a [`RequestContext`] to a [`ServiceEndpoint`] can
//! serve formrpc calls; this implementation does so over plain HTTP using
//! the Axum web framework.

use axum::{
    Json, Router,
    extract::{ConnectInfo, FromRequest, RawForm, Request},
    http::{HeaderMap, Uri},
    routing::post,
};
use formrpc::{DEFAULT_RPC_PATH, FormRequest, WireEnvelope};
use formrpc_service_endpoint::{ServiceEndpoint, ServiceEndpointBuilder};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, ToSocketAddrs};

/// Transport-level facts about the inbound request.
///
/// This is the server binding's context type: methods registered with a
/// leading `&RequestContext` parameter observe the originating request
/// without the caller supplying anything for it.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Peer address, when the listener was set up to record it. All the
    /// `serve*` entry points do; a router mounted by hand may not.
    pub remote_addr: Option<SocketAddr>,
    pub uri: Uri,
    pub headers: HeaderMap,
}

/// An RPC server that answers formrpc calls on a single registered path.
pub struct RpcServer<S> {
    endpoint: Arc<ServiceEndpoint<S, RequestContext>>,
    path: String,
}

impl<S> RpcServer<S>
where
    S: Send + Sync + 'static,
{
    /// Starts a registry builder whose context type is fixed to
    /// [`RequestContext`].
    pub fn builder(service: S) -> ServiceEndpointBuilder<S, RequestContext> {
        ServiceEndpoint::builder(service)
    }

    /// Wraps an endpoint, registering it under [`DEFAULT_RPC_PATH`].
    pub fn new(endpoint: ServiceEndpoint<S, RequestContext>) -> Self {
        Self::with_path(endpoint, DEFAULT_RPC_PATH)
    }

    /// Wraps an endpoint under a caller-chosen path.
    pub fn with_path(
        endpoint: ServiceEndpoint<S, RequestContext>,
        path: impl Into<String>,
    ) -> Self {
        RpcServer {
            endpoint: Arc::new(endpoint),
            path: path.into(),
        }
    }

    /// Returns an `Arc` clone of the underlying service endpoint, e.g. for
    /// introspection of the registered methods.
    pub fn endpoint(&self) -> Arc<ServiceEndpoint<S, RequestContext>> {
        self.endpoint.clone()
    }

    /// Builds the router serving this RPC path.
    ///
    /// The router is returned to the caller rather than registered against
    /// any process-wide state, so it can be merged into a larger
    /// application or served standalone.
    pub fn into_router(self) -> Router {
        let RpcServer { endpoint, path } = self;
        Router::new().route(
            &path,
            post(move |request: Request| Self::rpc_handler(endpoint, request)),
        )
    }

    /// Binds to an address and starts the RPC server.
    ///
    /// The address can be any type that implements `ToSocketAddrs`, such as
    /// a string "127.0.0.1:8080" or a `SocketAddr`.
    pub async fn serve<A: ToSocketAddrs>(self, addr: A) -> Result<SocketAddr, axum::BoxError> {
        let listener = TcpListener::bind(addr).await?;
        self.serve_with_listener(listener).await
    }

    /// Starts the RPC server on a specific host and port.
    ///
    /// This is a convenience wrapper around `serve`. The host can be an IP
    /// address or a hostname.
    pub async fn serve_on(self, host: &str, port: u16) -> Result<SocketAddr, axum::BoxError> {
        let addr = format!("{host}:{port}");
        self.serve(addr).await
    }

    /// Starts the RPC server with a pre-bound `TcpListener`.
    ///
    /// This is useful for cases like binding to an ephemeral port (port 0)
    /// and then retrieving the actual address.
    pub async fn serve_with_listener(
        self,
        listener: TcpListener,
    ) -> Result<SocketAddr, axum::BoxError> {
        let address = listener.local_addr()?;
        let app = self.into_router();
        tracing::info!("Server running on {:?}", address);
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(address)
    }

    /// Answers one inbound request.
    ///
    /// The envelope is the entire outcome: the HTTP status is always 200,
    /// including for unknown methods and contained panics.
    async fn rpc_handler(
        endpoint: Arc<ServiceEndpoint<S, RequestContext>>,
        request: Request,
    ) -> Json<WireEnvelope> {
        let context = RequestContext {
            remote_addr: request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|connect_info| connect_info.0),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
        };

        // A body that is not form-encoded carries no method field; it
        // dispatches as an empty name and misses the registry.
        let request = match RawForm::from_request(request, &()).await {
            Ok(RawForm(body)) => FormRequest::parse(&body),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "request body is not a form");
                FormRequest::default()
            }
        };

        tracing::debug!(method = %request.method, inputs = request.ins.len(), "dispatching rpc call");
        Json(endpoint.dispatch(&context, &request))
    }
}
