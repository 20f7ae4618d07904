use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// A tuple of values that encodes element-wise into positional JSON slots.
///
/// Clients use this for inputs, servers for outputs. Encoding is fail-fast:
/// the first element that cannot be serialized aborts the whole encode.
pub trait ToJsonValues {
    /// Number of positional slots this tuple produces.
    const COUNT: usize;

    fn to_json_values(self) -> Result<Vec<String>, serde_json::Error>;
}

/// A tuple of values decoded element-wise from positional JSON slots.
///
/// Decoding stops at the first failing slot; the error names the slot index.
pub trait FromJsonValues: Sized {
    /// Number of positional slots this tuple consumes.
    const COUNT: usize;

    fn from_json_values(values: &[String]) -> Result<Self, ValueDecodeError>;
}

/// Failure to decode one positional slot.
#[derive(Debug)]
pub enum ValueDecodeError {
    /// Fewer slots were present than the tuple declares.
    Missing { index: usize },
    /// The slot at `index` held JSON that does not decode into the declared
    /// type.
    Decode {
        index: usize,
        source: serde_json::Error,
    },
}

impl fmt::Display for ValueDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueDecodeError::Missing { index } => {
                write!(f, "missing positional value at index {}", index)
            }
            ValueDecodeError::Decode { index, source } => {
                write!(f, "cannot decode positional value at index {}: {}", index, source)
            }
        }
    }
}

impl std::error::Error for ValueDecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ValueDecodeError::Decode { source, .. } => Some(source),
            ValueDecodeError::Missing { .. } => None,
        }
    }
}

fn decode_slot<T: DeserializeOwned>(values: &[String], index: usize) -> Result<T, ValueDecodeError> {
    let raw = values
        .get(index)
        .ok_or(ValueDecodeError::Missing { index })?;
    serde_json::from_str(raw).map_err(|source| ValueDecodeError::Decode { index, source })
}

macro_rules! impl_json_values {
    ($count:expr; $($ty:ident => $idx:tt),*) => {
        impl<$($ty: Serialize),*> ToJsonValues for ($($ty,)*) {
            const COUNT: usize = $count;

            #[allow(non_snake_case, unused_variables)]
            fn to_json_values(self) -> Result<Vec<String>, serde_json::Error> {
                let ($($ty,)*) = self;
                Ok(vec![$(serde_json::to_string(&$ty)?),*])
            }
        }

        impl<$($ty: DeserializeOwned),*> FromJsonValues for ($($ty,)*) {
            const COUNT: usize = $count;

            #[allow(unused_variables)]
            fn from_json_values(values: &[String]) -> Result<Self, ValueDecodeError> {
                Ok(($(decode_slot::<$ty>(values, $idx)?,)*))
            }
        }
    };
}

impl_json_values!(0;);
impl_json_values!(1; T0 => 0);
impl_json_values!(2; T0 => 0, T1 => 1);
impl_json_values!(3; T0 => 0, T1 => 1, T2 => 2);
impl_json_values!(4; T0 => 0, T1 => 1, T2 => 2, T3 => 3);
