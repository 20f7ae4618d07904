mod rpc_server;
pub use rpc_server::{RequestContext, RpcServer};

// Re-exported so server users can register methods and tune the policy
// without naming the endpoint crate.
pub use formrpc_service_endpoint::{ArgPolicy, ServiceEndpoint, ServiceEndpointBuilder};
