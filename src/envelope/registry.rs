use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::codec::EnvelopeError;

/// A value that holds exactly one variant of a closed polymorphic slot.
/// Implemented by the union enums in `crate::models`.
pub trait TaggedUnion: Sized {
    /// Wire discriminator of the variant this value holds.
    fn discriminator(&self) -> &'static str;
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("duplicate type discriminator: {0}")]
    DuplicateDiscriminator(String),
}

type DecodeFn<U> = Box<dyn Fn(Value) -> Result<U, EnvelopeError> + Send + Sync>;
type EncodeFn<U> = Box<dyn Fn(&U) -> Result<Map<String, Value>, EnvelopeError> + Send + Sync>;

/// Decode/encode pair registered for one concrete variant.
pub struct VariantCodec<U> {
    pub(crate) decode: DecodeFn<U>,
    pub(crate) encode: EncodeFn<U>,
}

/// Immutable mapping from a type discriminator to the codec for one variant
/// of the union `U`. Built once at startup and shared behind an `Arc` with no
/// interior mutability, so request-time lookups need no locking.
pub struct TypeRegistry<U> {
    entries: HashMap<String, VariantCodec<U>>,
}

impl<U: TaggedUnion + 'static> TypeRegistry<U> {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Register a variant under its wire discriminator. `wrap` lifts the
    /// decoded variant into the union; `unwrap` projects it back out for
    /// encoding. Registering the same discriminator twice is a startup
    /// configuration fault, not something to paper over.
    pub fn register<T>(
        &mut self,
        discriminator: &str,
        wrap: fn(T) -> U,
        unwrap: fn(&U) -> Option<&T>,
    ) -> Result<(), RegistryError>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        if self.entries.contains_key(discriminator) {
            return Err(RegistryError::DuplicateDiscriminator(discriminator.to_string()));
        }

        let codec = VariantCodec {
            decode: Box::new(move |fields| {
                let variant: T =
                    serde_json::from_value(fields).map_err(EnvelopeError::VariantDecode)?;
                Ok(wrap(variant))
            }),
            encode: Box::new(move |value| {
                let variant = unwrap(value).ok_or(EnvelopeError::VariantMismatch)?;
                match serde_json::to_value(variant).map_err(EnvelopeError::VariantEncode)? {
                    Value::Object(map) => Ok(map),
                    _ => Err(EnvelopeError::NotAnObject),
                }
            }),
        };

        tracing::debug!("Registered envelope variant '{}'", discriminator);
        self.entries.insert(discriminator.to_string(), codec);
        Ok(())
    }

    /// O(1) lookup by discriminator.
    pub fn lookup(&self, discriminator: &str) -> Option<&VariantCodec<U>> {
        self.entries.get(discriminator)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<U: TaggedUnion + 'static> Default for TypeRegistry<U> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::{content_registry, APP_TYPE};

    #[test]
    fn duplicate_registration_fails_fast() {
        use crate::models::content::ContentItem;

        let mut registry = content_registry().unwrap();
        let result = registry.register(APP_TYPE, ContentItem::App, |item| match item {
            ContentItem::App(v) => Some(v),
            _ => None,
        });
        assert!(matches!(result, Err(RegistryError::DuplicateDiscriminator(d)) if d == APP_TYPE));
    }

    #[test]
    fn lookup_misses_unregistered_discriminators() {
        let registry = content_registry().unwrap();
        assert!(registry.lookup(APP_TYPE).is_some());
        assert!(registry.lookup("not.registered").is_none());
    }
}
