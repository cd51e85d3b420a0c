// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Save/restore of engines as plain descriptors, with a CBOR byte form.
//!
//! Engines are compiled from descriptors and can hand the same descriptor
//! back, so an instance can be shipped to a worker process and rebuilt there.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{KernelError, KernelResult};

/// An engine that round-trips through a plain descriptor.
pub trait Restorable: Sized {
    /// Serializable form the engine is compiled from.
    type Descriptor: Serialize + DeserializeOwned;

    /// Returns the descriptor this instance was built from.
    fn save(&self) -> Self::Descriptor;

    /// Compiles a fresh instance, validating the descriptor.
    fn from_descriptor(descriptor: Self::Descriptor) -> KernelResult<Self>;

    /// Replaces `self` with the instance compiled from `descriptor`.
    ///
    /// On error `self` is left untouched.
    fn restore(&mut self, descriptor: Self::Descriptor) -> KernelResult<()> {
        *self = Self::from_descriptor(descriptor)?;
        Ok(())
    }

    /// CBOR bytes of [`Restorable::save`].
    fn to_bytes(&self) -> KernelResult<Vec<u8>> {
        encode_cbor(&self.save())
    }

    /// Decodes a descriptor from CBOR bytes and compiles it.
    fn from_bytes(bytes: &[u8]) -> KernelResult<Self> {
        Self::from_descriptor(decode_cbor(bytes)?)
    }
}

/// Encodes any serializable value as CBOR.
pub fn encode_cbor<T: Serialize>(value: &T) -> KernelResult<Vec<u8>> {
    let mut bytes = Vec::new();
    ciborium::into_writer(value, &mut bytes).map_err(|err| KernelError::Encode(err.to_string()))?;
    Ok(bytes)
}

/// Decodes a CBOR value.
pub fn decode_cbor<T: DeserializeOwned>(bytes: &[u8]) -> KernelResult<T> {
    ciborium::from_reader(bytes).map_err(|err| KernelError::Decode(err.to_string()))
}
