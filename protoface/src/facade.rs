//! The [`Facade`] trait implemented by every generated message type.

use bytes::{Buf, BufMut};
use prost::Message;

use crate::error::{DecodeError, EncodeError, UnknownEnumValue};
use crate::handle::Handle;

/// A typed facade over a prost message.
///
/// Implementations are generated by [`message`](crate::message); each one is
/// a single [`Handle`] onto the storage message, plus accessors. Everything
/// touching the wire goes through the storage type's [`prost::Message`] impl,
/// so bytes produced here are exactly the bytes prost produces for the same
/// field values.
pub trait Facade: Sized {
    /// The library-native message this facade wraps.
    type Storage: Message + Default + Clone + PartialEq + 'static;

    /// Name of the facade type, used in errors and logs.
    const NAME: &'static str;

    /// Builds a facade over an existing handle, without copying.
    fn from_handle(handle: Handle<Self::Storage>) -> Self;

    /// The handle this facade reads and writes through.
    fn handle(&self) -> &Handle<Self::Storage>;

    /// Takes ownership of `storage` and wraps it.
    ///
    /// No validation or copying takes place.
    fn wrap(storage: Self::Storage) -> Self {
        Self::from_handle(Handle::new(storage))
    }

    /// Returns a deep copy of the wrapped storage.
    fn to_storage(&self) -> Self::Storage {
        self.handle().snapshot()
    }

    /// Returns a new, independent facade over a deep copy of the storage.
    fn detach(&self) -> Self {
        Self::wrap(self.to_storage())
    }

    /// Returns `true` if both facades read and write the same storage.
    fn shares_storage_with(&self, other: &Self) -> bool {
        self.handle().same_storage(other.handle())
    }

    /// Encodes the message into a new buffer.
    fn serialize(&self) -> Vec<u8> {
        let bytes = self.handle().read(Message::encode_to_vec);
        tracing::trace!(facade = Self::NAME, len = bytes.len(), "serialized message");
        bytes
    }

    /// Encodes the message into `buf`.
    ///
    /// Fails without writing anything if `buf` lacks the capacity.
    fn encode<B: BufMut>(&self, buf: &mut B) -> Result<(), EncodeError> {
        self.handle()
            .read(|storage| storage.encode(buf))
            .map_err(|source| EncodeError::new(Self::NAME, source))
    }

    /// Length in bytes of the encoded message.
    fn encoded_len(&self) -> usize {
        self.handle().read(Message::encoded_len)
    }

    /// Decodes a message from `buf`.
    ///
    /// Unknown fields are skipped. On failure no facade is produced.
    fn parse<B: Buf>(buf: B) -> Result<Self, DecodeError> {
        let len = buf.remaining();
        match <Self::Storage as Message>::decode(buf) {
            Ok(storage) => {
                tracing::trace!(facade = Self::NAME, len, "parsed message");
                Ok(Self::wrap(storage))
            }
            Err(source) => {
                tracing::debug!(facade = Self::NAME, len, error = %source, "failed to parse message");
                Err(DecodeError::new(Self::NAME, source))
            }
        }
    }

    /// Merges the message encoded in `buf` into this one.
    ///
    /// Singular fields present in `buf` overwrite, repeated fields append and
    /// sub-messages merge recursively. The merge happens on a copy which
    /// replaces the storage only once decoding succeeded, so a failure leaves
    /// the message exactly as it was.
    ///
    /// Empty input is an empty message and leaves the storage alone. Any
    /// other input merged into an unset sub-message creates it, like every
    /// other write through a sub-message facade.
    fn merge<B: Buf>(&self, buf: B) -> Result<(), DecodeError> {
        if !buf.has_remaining() {
            return Ok(());
        }
        let mut merged = self.to_storage();
        if let Err(source) = merged.merge(buf) {
            tracing::debug!(facade = Self::NAME, error = %source, "failed to merge message");
            return Err(DecodeError::new(Self::NAME, source));
        }
        self.handle().replace(merged);
        Ok(())
    }

    /// Resets every field to its default and clears all presence.
    ///
    /// Clearing an unset sub-message leaves it unset.
    fn clear(&self) {
        self.handle().write_if_present(Message::clear);
    }
}

/// Converts an enum's `i32` wire value into its symbolic type.
///
/// Used by generated enum accessors; fails for values the enum does not
/// declare.
pub fn enum_from_wire<E: TryFrom<i32>>(
    enumeration: &'static str,
    value: i32,
) -> Result<E, UnknownEnumValue> {
    E::try_from(value).map_err(|_| {
        tracing::debug!(enumeration, value, "unknown enum value");
        UnknownEnumValue { enumeration, value }
    })
}
