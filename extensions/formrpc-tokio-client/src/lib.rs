mod rpc_client;
pub use rpc_client::RpcClient;

// Callers need the interface trait in scope to invoke `call`, and the
// error type to match on outcomes.
pub use formrpc_service_caller::{RpcCallError, RpcServiceCallerInterface};
