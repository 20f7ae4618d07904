use crate::constants::{IN_FIELD, METHOD_FIELD};

/// One decoded request body: the target method name and the positional
/// JSON-encoded arguments, in wire order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormRequest {
    pub method: String,
    pub ins: Vec<String>,
}

impl FormRequest {
    pub fn new(method: impl Into<String>, ins: Vec<String>) -> Self {
        Self {
            method: method.into(),
            ins,
        }
    }

    /// Decode an `application/x-www-form-urlencoded` body.
    ///
    /// Parsing never fails: an absent `method` field yields an empty name,
    /// which then misses the registry like any other unknown name. Repeated
    /// `in` fields are collected in body order; unknown fields are ignored.
    pub fn parse(body: &[u8]) -> Self {
        let mut method = None;
        let mut ins = Vec::new();
        for (key, value) in form_urlencoded::parse(body) {
            match key.as_ref() {
                METHOD_FIELD => {
                    // First occurrence wins.
                    if method.is_none() {
                        method = Some(value.into_owned());
                    }
                }
                IN_FIELD => ins.push(value.into_owned()),
                _ => {}
            }
        }
        Self {
            method: method.unwrap_or_default(),
            ins,
        }
    }

    /// Encode back into a form body.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair(METHOD_FIELD, &self.method);
        for arg in &self.ins {
            serializer.append_pair(IN_FIELD, arg);
        }
        serializer.finish()
    }

    /// Borrowed key/value pairs, suitable for HTTP clients that serialize
    /// form bodies themselves.
    pub fn to_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::with_capacity(self.ins.len() + 1);
        pairs.push((METHOD_FIELD, self.method.as_str()));
        for arg in &self.ins {
            pairs.push((IN_FIELD, arg.as_str()));
        }
        pairs
    }
}
