//! Byte encoding of the `.model` artifact.
//!
//! Whatever a fitted Lasso needs to predict again (weights, intercept, the
//! selected alpha and its CV error path) is stored as bincode. Any serde type
//! gets [`SerializableParams`] for free, so new artifact layouts need no
//! extra code here.

use std::error::Error;

/// Artifact payload that round-trips through a byte buffer.
///
/// Payloads own their data (`Vec<f64>`, scalars); borrowed views cannot be
/// written to disk.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}
