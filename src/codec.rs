//! Conversion of secret material between Base32, hexadecimal and plain text.
//!
//! Base32 follows [rfc-4648 §6](https://www.rfc-editor.org/rfc/rfc4648#section-6):
//! output is upper case and padded with `=` to a multiple of 8 characters,
//! input is accepted in any case, with or without padding, and whitespace is ignored.
//!
//! # Examples
//!
//! ```
//! use otp_engine::{decode_base32, encode_to_base32, Detection, Encoding};
//!
//! let encoded = encode_to_base32("48656c6c6f", Encoding::Hex, Detection::Heuristic).unwrap();
//! assert_eq!(encoded, "JBSWY3DP");
//! assert_eq!(decode_base32("jbsw y3dp").unwrap(), b"Hello".to_vec());
//! ```

use base32::Alphabet;
use core::fmt;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use crate::FormatError;

/// Characters ignored between hex digit pairs
pub const HEX_SEPARATORS: [char; 3] = ['-', ':', ' '];

const RFC4648_PADDED: Alphabet = Alphabet::Rfc4648 { padding: true };
const RFC4648_UNPADDED: Alphabet = Alphabet::Rfc4648 { padding: false };

/// Textual encodings a secret can be supplied in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub enum Encoding {
    /// Rfc4648 Base32, `A-Z2-7` with optional `=` padding
    Base32,
    /// Pairs of hex digits, optionally separated by `-`, `:` or spaces
    Hex,
    /// Arbitrary UTF-8, used as its raw bytes
    Text,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Base32 => f.write_str("Base32"),
            Encoding::Hex => f.write_str("Hex"),
            Encoding::Text => f.write_str("Text"),
        }
    }
}

/// How much to trust the declared [Encoding] of an input.
///
/// Provisioning tools historically treated any string made only of `A-Z2-7`
/// (optionally followed by `=`) as Base32, whatever the caller declared.
/// A hex secret such as `"ABCDEF23"` is therefore read as Base32 under
/// [Detection::Heuristic]. Use [Detection::Declared] to turn that off.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub enum Detection {
    /// Inputs matching `^[A-Z2-7]+=*$` are Base32 regardless of the declared encoding.
    #[default]
    Heuristic,
    /// The declared encoding is always used.
    Declared,
}

fn is_base32_char(c: char) -> bool {
    c.is_ascii_uppercase() || ('2'..='7').contains(&c)
}

/// Whether `input` matches `^[A-Z2-7]+=*$`, the canonical Base32 shape.
pub fn looks_like_base32(input: &str) -> bool {
    let body = input.trim_end_matches('=');
    !body.is_empty() && body.chars().all(is_base32_char)
}

/// The encoding `input` will actually be read as.
pub fn resolve_encoding(input: &str, declared: Encoding, detection: Detection) -> Encoding {
    match (declared, detection) {
        (Encoding::Base32, _) => Encoding::Base32,
        (declared, Detection::Heuristic) if looks_like_base32(input) => {
            tracing::debug!(
                %declared,
                "secret only uses the base32 alphabet, reading it as base32"
            );
            Encoding::Base32
        }
        (declared, _) => declared,
    }
}

/// Pack bytes into padded Rfc4648 Base32.
pub fn bytes_to_base32(bytes: &[u8]) -> String {
    base32::encode(RFC4648_PADDED, bytes)
}

/// Decode hex digits, ignoring the `-`, `:` and space separators.
///
/// # Errors
///
/// [FormatError::OddHexLength] when the digits don't make whole bytes,
/// [FormatError::InvalidHexCharacter] on anything else than `0-9a-fA-F`.
/// Reported positions are relative to the input with separators removed.
pub fn hex_to_bytes(input: &str) -> Result<Vec<u8>, FormatError> {
    let digits: String = input
        .chars()
        .filter(|c| !HEX_SEPARATORS.contains(c))
        .collect();
    hex::decode(&digits).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, index } => {
            FormatError::InvalidHexCharacter { c, index }
        }
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            FormatError::OddHexLength(digits.len())
        }
    })
}

/// Convert `input` to padded Base32.
///
/// Under [Detection::Heuristic], an input declared as Base32 or looking like
/// Base32 is returned unchanged. Under [Detection::Declared], Base32 input is
/// validated and re-encoded in canonical form.
///
/// # Errors
///
/// Will return a [FormatError] for malformed hex, or for malformed Base32
/// when it has to be decoded.
pub fn encode_to_base32(
    input: &str,
    encoding: Encoding,
    detection: Detection,
) -> Result<String, FormatError> {
    match resolve_encoding(input, encoding, detection) {
        Encoding::Base32 => match detection {
            Detection::Heuristic => Ok(input.to_string()),
            Detection::Declared => decode_base32(input).map(|bytes| bytes_to_base32(&bytes)),
        },
        Encoding::Hex => hex_to_bytes(input).map(|bytes| bytes_to_base32(&bytes)),
        Encoding::Text => Ok(bytes_to_base32(input.as_bytes())),
    }
}

/// Upper-case, drop whitespace and trailing padding, and check the alphabet.
fn normalize_base32(input: &str) -> Result<String, FormatError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let body = compact.trim_end_matches('=');
    let mut normalized = String::with_capacity(body.len());
    for (index, c) in body.chars().enumerate() {
        let upper = c.to_ascii_uppercase();
        if !is_base32_char(upper) {
            return Err(FormatError::InvalidBase32Character { c, index });
        }
        normalized.push(upper);
    }
    Ok(normalized)
}

/// Decode Base32 into raw bytes.
///
/// Trailing bits that don't fill a whole byte are padding and get dropped.
///
/// # Errors
///
/// [FormatError::InvalidBase32Character] for anything outside `A-Z2-7`
/// (case-insensitive) once whitespace and trailing `=` are removed.
pub fn decode_base32(input: &str) -> Result<Vec<u8>, FormatError> {
    let normalized = normalize_base32(input)?;
    base32::decode(RFC4648_UNPADDED, &normalized).ok_or(FormatError::ParseBase32)
}

/// Decode Base32 and present the bytes as lowercase hex.
pub fn decode_base32_to_hex(input: &str) -> Result<String, FormatError> {
    decode_base32(input).map(hex::encode)
}

/// Decode Base32 and present the bytes as UTF-8 text.
pub fn decode_base32_to_text(input: &str) -> Result<String, FormatError> {
    String::from_utf8(decode_base32(input)?).map_err(|_| FormatError::InvalidUtf8)
}
