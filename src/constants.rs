/// The path a service is registered under when the caller does not choose
/// one. Servers and clients constructed without an explicit path both use
/// this, so they agree by default.
pub const DEFAULT_RPC_PATH: &str = "/_http_rpc";

/// Form field carrying the target method name.
pub const METHOD_FIELD: &str = "method";

/// Repeated form field carrying the positional JSON-encoded arguments.
/// One occurrence per non-context input, in declaration order.
pub const IN_FIELD: &str = "in";
