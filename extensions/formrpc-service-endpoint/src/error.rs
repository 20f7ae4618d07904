use std::fmt;

/// A failure raised by the stored invoke adapter rather than by the method
/// body itself. All variants are per-call; none of them terminate the
/// serving worker.
#[derive(Debug)]
pub enum DispatchError {
    /// A positional argument held JSON that does not decode into the
    /// declared parameter type. Only raised under [`ArgPolicy::Reject`];
    /// the default policy substitutes the type's default value instead.
    ///
    /// [`ArgPolicy::Reject`]: crate::ArgPolicy::Reject
    BadArgument {
        index: usize,
        source: serde_json::Error,
    },
    /// Fewer positional arguments arrived than the method declares. Only
    /// raised under `ArgPolicy::Reject`.
    MissingArgument { index: usize },
    /// A returned value could not be serialized to JSON.
    EncodeOutput(serde_json::Error),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::BadArgument { index, source } => {
                write!(f, "invalid argument at position {}: {}", index, source)
            }
            DispatchError::MissingArgument { index } => {
                write!(f, "missing argument at position {}", index)
            }
            DispatchError::EncodeOutput(source) => {
                write!(f, "cannot encode output value: {}", source)
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::BadArgument { source, .. } => Some(source),
            DispatchError::EncodeOutput(source) => Some(source),
            DispatchError::MissingArgument { .. } => None,
        }
    }
}
