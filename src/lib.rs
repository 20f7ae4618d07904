//! Transport-agnostic core of the formrpc protocol.
//!
//! A formrpc call is an HTTP POST of a form-encoded body carrying a `method`
//! field and zero or more repeated `in` fields, each holding one positional
//! argument as JSON text. The response is a single JSON envelope with a
//! result code, a diagnostic string, and the outputs — each output slot
//! again independently JSON-encoded.
//!
//! This crate defines the wire shapes shared by servers and clients:
//!
//! - [`WireEnvelope`] and [`ResponseCode`] — the response envelope.
//! - [`FormRequest`] — the request body codec.
//! - [`ToJsonValues`] / [`FromJsonValues`] — positional tuple encoding of
//!   inputs and outputs.
//!
//! Servers are built with `formrpc-service-endpoint` (method registry and
//! dispatch) plus an HTTP binding such as `formrpc-tokio-server`; clients
//! with `formrpc-service-caller` plus `formrpc-tokio-client`.
//!
//! ```ignore
//! // Server
//! let endpoint = RpcServer::builder(Arith)
//!     .method("Add", |_: &Arith, a: i64, b: i64| (a + b,))
//!     .build();
//! RpcServer::new(endpoint).serve("127.0.0.1:1235").await?;
//!
//! // Client
//! let client = RpcClient::new("http://localhost:1235");
//! let (sum,): (i64,) = client.call("Add", (1, 2)).await?;
//! ```

pub mod constants;
pub use constants::*;
mod envelope;
pub use envelope::*;
mod form;
pub use form::*;
mod values;
pub use values::*;
