use crate::method::{ArgPolicy, IntoMethod, MethodDescriptor};
use formrpc::{FormRequest, WireEnvelope};
use std::any::Any;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// A concrete RPC service endpoint, generic over a context type `C`.
///
/// The endpoint owns the service instance and the name → descriptor map.
/// Both are fixed at [`build`](ServiceEndpointBuilder::build) time; because
/// nothing mutates after construction, any number of concurrent dispatches
/// may read the registry without locking.
pub struct ServiceEndpoint<S, C> {
    service: Arc<S>,
    methods: HashMap<String, MethodDescriptor<S, C>>,
    policy: ArgPolicy,
}

impl<S, C> ServiceEndpoint<S, C> {
    /// Starts a registry for `service`. Method registration happens on the
    /// returned builder; the endpoint itself is immutable.
    pub fn builder(service: S) -> ServiceEndpointBuilder<S, C> {
        ServiceEndpointBuilder {
            service: Arc::new(service),
            methods: HashMap::new(),
            policy: ArgPolicy::default(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn arg_policy(&self) -> ArgPolicy {
        self.policy
    }

    /// Metadata for one registered method, if present.
    pub fn descriptor(&self, method: &str) -> Option<&MethodDescriptor<S, C>> {
        self.methods.get(method)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Answers one inbound call.
    ///
    /// Looks the method up by exact name, decodes the positional arguments
    /// per the registry's [`ArgPolicy`], invokes the method inside a panic
    /// containment boundary, and encodes the outputs. Every outcome is an
    /// envelope; this function never panics and never returns an error to
    /// the transport.
    pub fn dispatch(&self, ctx: &C, request: &FormRequest) -> WireEnvelope {
        let Some(descriptor) = self.methods.get(&request.method) else {
            tracing::warn!(method = %request.method, "unknown rpc method");
            return WireEnvelope::unknown_method(&request.method);
        };

        // The boundary is per invocation: a panicking method body unwinds
        // to here and no further. Other in-flight calls share nothing with
        // this one except the read-only registry.
        let result = catch_unwind(AssertUnwindSafe(|| {
            descriptor.invoke(&self.service, ctx, &request.ins, self.policy)
        }));

        match result {
            Ok(Ok(outs)) => WireEnvelope::ok(outs),
            Ok(Err(err)) => {
                tracing::error!(method = %request.method, error = %err, "rpc invocation failed");
                WireEnvelope::panic(err.to_string())
            }
            Err(payload) => {
                let info = panic_message(payload);
                tracing::error!(method = %request.method, panic = %info, "rpc method panicked");
                WireEnvelope::panic(info)
            }
        }
    }
}

/// Extract a printable description from a panic payload.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic".to_string()
    }
}

/// Accumulates method registrations, then freezes them into a
/// [`ServiceEndpoint`].
pub struct ServiceEndpointBuilder<S, C> {
    service: Arc<S>,
    methods: HashMap<String, MethodDescriptor<S, C>>,
    policy: ArgPolicy,
}

impl<S, C> ServiceEndpointBuilder<S, C> {
    /// Registers a method under `name`.
    ///
    /// The closure takes the service by reference, optionally a `&C`
    /// context as its next parameter, then the positional arguments, and
    /// returns its outputs as a tuple (see [`IntoMethod`]). Registering a
    /// name twice replaces the earlier method; registration itself never
    /// fails.
    pub fn method<F, M>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: IntoMethod<S, C, M>,
    {
        self.methods.insert(name.into(), handler.into_method());
        self
    }

    /// Overrides the argument decode policy. Defaults to
    /// [`ArgPolicy::UseDefault`].
    pub fn arg_policy(mut self, policy: ArgPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> ServiceEndpoint<S, C> {
        ServiceEndpoint {
            service: self.service,
            methods: self.methods,
            policy: self.policy,
        }
    }
}
