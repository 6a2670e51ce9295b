use serde_json::Value;
use thiserror::Error;

use super::registry::{TaggedUnion, TypeRegistry};

/// Wire key carrying the type discriminator in a polymorphic JSON object.
pub const TYPE_KEY: &str = "@type";

#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("envelope must be a JSON object")]
    NotAnObject,

    #[error("missing \"@type\" discriminator")]
    MissingType,

    #[error("unknown type discriminator: {0}")]
    UnknownType(String),

    #[error("variant fields failed to decode: {0}")]
    VariantDecode(serde_json::Error),

    #[error("variant failed to encode: {0}")]
    VariantEncode(serde_json::Error),

    #[error("no codec registered for variant {0}")]
    UnregisteredVariant(&'static str),

    #[error("value does not hold the registered variant")]
    VariantMismatch,
}

/// Decode a typed envelope `{"@type": <discriminator>, ...fields}` into the
/// union value it represents. Decoding is all-or-nothing: any failure leaves
/// no partially populated variant behind. Variants that embed further typed
/// envelopes recurse over the same registered variant set.
pub fn decode<U: TaggedUnion + 'static>(registry: &TypeRegistry<U>, raw: &Value) -> Result<U, EnvelopeError> {
    let object = raw.as_object().ok_or(EnvelopeError::NotAnObject)?;

    let discriminator = object
        .get(TYPE_KEY)
        .and_then(Value::as_str)
        .ok_or(EnvelopeError::MissingType)?;

    let codec = registry
        .lookup(discriminator)
        .ok_or_else(|| EnvelopeError::UnknownType(discriminator.to_string()))?;

    let mut fields = object.clone();
    fields.remove(TYPE_KEY);
    (codec.decode)(Value::Object(fields))
}

/// Encode a union value into its typed envelope, injecting `"@type"`.
/// Encoding a variant with no registry entry is a programming error, not a
/// recoverable request failure.
pub fn encode<U: TaggedUnion + 'static>(registry: &TypeRegistry<U>, value: &U) -> Result<Value, EnvelopeError> {
    let discriminator = value.discriminator();
    let codec = registry
        .lookup(discriminator)
        .ok_or(EnvelopeError::UnregisteredVariant(discriminator))?;

    let mut fields = (codec.encode)(value)?;
    fields.insert(TYPE_KEY.to_string(), Value::String(discriminator.to_string()));
    Ok(Value::Object(fields))
}
