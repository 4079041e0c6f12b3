//! Errors surfaced by facades.
//!
//! Absence is never an error: unset optional fields and inactive oneof cases
//! read as `None`. The types here cover the codec boundary and the conversion
//! from a wire integer to a closed enumeration.

/// Decoding bytes into a facade's storage failed.
///
/// A failed decode never produces a facade, and a failed [`merge`] leaves the
/// target storage untouched.
///
/// [`merge`]: crate::Facade::merge
#[derive(Debug, thiserror::Error)]
#[error("failed to decode message `{message}`: {source}")]
pub struct DecodeError {
    message: &'static str,
    #[source]
    source: prost::DecodeError,
}

impl DecodeError {
    pub(crate) fn new(message: &'static str, source: prost::DecodeError) -> Self {
        DecodeError { message, source }
    }

    /// Name of the message that failed to decode.
    pub fn message_name(&self) -> &'static str {
        self.message
    }

    /// The error reported by the codec.
    pub fn codec_error(&self) -> &prost::DecodeError {
        &self.source
    }
}

/// Encoding a facade into a caller-provided buffer failed.
///
/// The only failure the codec reports is a buffer without enough remaining
/// capacity; [`serialize`](crate::Facade::serialize) allocates and cannot fail.
#[derive(Debug, thiserror::Error)]
#[error("failed to encode message `{message}`: {source}")]
pub struct EncodeError {
    message: &'static str,
    #[source]
    source: prost::EncodeError,
}

impl EncodeError {
    pub(crate) fn new(message: &'static str, source: prost::EncodeError) -> Self {
        EncodeError { message, source }
    }

    /// Name of the message that failed to encode.
    pub fn message_name(&self) -> &'static str {
        self.message
    }

    /// Bytes the encoded message needs.
    pub fn required_capacity(&self) -> usize {
        self.source.required_capacity()
    }

    /// Bytes that were left in the buffer.
    pub fn remaining(&self) -> usize {
        self.source.remaining()
    }
}

/// An enum field held an integer with no matching variant.
///
/// Storage keeps enum fields as their `i32` wire value, so a message decoded
/// from a newer schema can carry values this build does not know about.
/// Accessors fail instead of guessing; the raw value stays readable through
/// the generated `<field>_raw` accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{value} is not a known value of enum `{enumeration}`")]
pub struct UnknownEnumValue {
    /// Name of the enum type.
    pub enumeration: &'static str,
    /// The wire value that failed to convert.
    pub value: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_decode_error_display() {
        // A varint key whose continuation bit is set on the last byte.
        let source = i64::decode(&[0x80][..]).unwrap_err();
        let err = DecodeError::new("Test", source);

        assert_eq!(err.message_name(), "Test");
        let rendered = err.to_string();
        assert!(rendered.starts_with("failed to decode message `Test`: "), "{rendered}");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_unknown_enum_value_display() {
        let err = UnknownEnumValue {
            enumeration: "TestEnum",
            value: 7,
        };
        assert_eq!(err.to_string(), "7 is not a known value of enum `TestEnum`");
    }
}
