pub mod codec;
pub mod registry;

pub use codec::{decode, encode, EnvelopeError, TYPE_KEY};
pub use registry::{RegistryError, TaggedUnion, TypeRegistry, VariantCodec};
