use crate::error::DispatchError;
use formrpc::ToJsonValues;
use serde::de::DeserializeOwned;

/// What the dispatcher does when one positional argument fails to decode
/// (or is absent). Applies per argument, not per call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ArgPolicy {
    /// Substitute the parameter type's `Default::default()` and keep going.
    /// The call proceeds as if the argument had been supplied as that
    /// value.
    #[default]
    UseDefault,
    /// Fail the call, naming the offending position.
    Reject,
}

pub(crate) type InvokeFn<S, C> =
    Box<dyn Fn(&S, &C, &[String], ArgPolicy) -> Result<Vec<String>, DispatchError> + Send + Sync>;

/// Immutable per-method metadata: the type-erased invoke adapter plus the
/// shape facts the dispatcher and introspection need. Built once at
/// registration, exclusively owned by the registry.
pub struct MethodDescriptor<S, C> {
    invoke: InvokeFn<S, C>,
    needs_context: bool,
    input_count: usize,
    output_count: usize,
}

impl<S, C> MethodDescriptor<S, C> {
    /// Whether the method declared a leading `&C` context parameter. Such a
    /// parameter is supplied by the transport binding and never counted
    /// toward the caller-visible inputs.
    pub fn needs_context(&self) -> bool {
        self.needs_context
    }

    /// Number of positional inputs callers must supply.
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Number of output slots the method produces.
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    pub(crate) fn invoke(
        &self,
        service: &S,
        ctx: &C,
        ins: &[String],
        policy: ArgPolicy,
    ) -> Result<Vec<String>, DispatchError> {
        (self.invoke)(service, ctx, ins, policy)
    }
}

/// Marker for methods without a context parameter.
pub struct NoContext;
/// Marker for methods whose first parameter after the service is `&C`.
pub struct WithContext;

/// Conversion of a typed method closure into a [`MethodDescriptor`].
///
/// Implemented for `Fn(&S, A0..An) -> Out` and `Fn(&S, &C, A0..An) -> Out`
/// up to four positional arguments. Argument types decode from positional
/// JSON and must be `Deserialize + Default` (the `Default` feeds
/// [`ArgPolicy::UseDefault`]); `Out` is a tuple of 0..=4 `Serialize`
/// values, one per output slot.
///
/// The marker parameter `M` only disambiguates the closure shapes; callers
/// never name it.
pub trait IntoMethod<S, C, M> {
    fn into_method(self) -> MethodDescriptor<S, C>;
}

fn decode_arg<T: DeserializeOwned + Default>(
    ins: &[String],
    index: usize,
    policy: ArgPolicy,
) -> Result<T, DispatchError> {
    match ins.get(index) {
        Some(raw) => match serde_json::from_str(raw) {
            Ok(value) => Ok(value),
            Err(source) => match policy {
                ArgPolicy::UseDefault => Ok(T::default()),
                ArgPolicy::Reject => Err(DispatchError::BadArgument { index, source }),
            },
        },
        None => match policy {
            ArgPolicy::UseDefault => Ok(T::default()),
            ArgPolicy::Reject => Err(DispatchError::MissingArgument { index }),
        },
    }
}

macro_rules! impl_into_method {
    ($count:expr; $($arg:ident => $idx:tt),*) => {
        impl<S, C, F, Out, $($arg,)*> IntoMethod<S, C, (NoContext, ($($arg,)*), Out)> for F
        where
            F: Fn(&S, $($arg),*) -> Out + Send + Sync + 'static,
            Out: ToJsonValues + 'static,
            $($arg: DeserializeOwned + Default + 'static,)*
        {
            fn into_method(self) -> MethodDescriptor<S, C> {
                MethodDescriptor {
                    invoke: Box::new(
                        move |service: &S, _ctx: &C, _ins: &[String], _policy: ArgPolicy|
                              -> Result<Vec<String>, DispatchError> {
                            let outs =
                                self(service, $(decode_arg::<$arg>(_ins, $idx, _policy)?),*);
                            outs.to_json_values().map_err(DispatchError::EncodeOutput)
                        },
                    ),
                    needs_context: false,
                    input_count: $count,
                    output_count: Out::COUNT,
                }
            }
        }

        impl<S, C, F, Out, $($arg,)*> IntoMethod<S, C, (WithContext, ($($arg,)*), Out)> for F
        where
            F: Fn(&S, &C, $($arg),*) -> Out + Send + Sync + 'static,
            Out: ToJsonValues + 'static,
            $($arg: DeserializeOwned + Default + 'static,)*
        {
            fn into_method(self) -> MethodDescriptor<S, C> {
                MethodDescriptor {
                    invoke: Box::new(
                        move |service: &S, ctx: &C, _ins: &[String], _policy: ArgPolicy|
                              -> Result<Vec<String>, DispatchError> {
                            let outs =
                                self(service, ctx, $(decode_arg::<$arg>(_ins, $idx, _policy)?),*);
                            outs.to_json_values().map_err(DispatchError::EncodeOutput)
                        },
                    ),
                    needs_context: true,
                    input_count: $count,
                    output_count: Out::COUNT,
                }
            }
        }
    };
}

impl_into_method!(0;);
impl_into_method!(1; A0 => 0);
impl_into_method!(2; A0 => 0, A1 => 1);
impl_into_method!(3; A0 => 0, A1 => 1, A2 => 2);
impl_into_method!(4; A0 => 0, A1 => 1, A2 => 2, A3 => 3);
