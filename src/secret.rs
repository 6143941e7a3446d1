//! Representation of a secret, either "raw" bytes or text in one of the supported [Encoding]s
//!
//! The declared encoding is resolved once, when the secret is parsed; code
//! generation only ever sees the tagged value.
//!
//! # Examples
//!
//! - Generate a code from a hex secret
//! ```
//! use otp_engine::{Detection, Encoding, Otp, OtpParameters, Secret};
//!
//! let secret = Secret::parse(
//!     "31:32:33:34:35:36:37:38:39:30:31:32:33:34:35:36:37:38:39:30",
//!     Encoding::Hex,
//!     Detection::Declared,
//! );
//! let params = OtpParameters::default().with_digits(8).unwrap();
//! let otp = Otp::new(params, &secret).unwrap();
//!
//! assert_eq!(otp.generate(59), "94287082");
//! ```
//!
//! - Convert a text secret to Base32
//! ```
//! use otp_engine::Secret;
//!
//! let secret = Secret::Text("TestSecretSuperSecret".to_string());
//! assert_eq!(
//!     secret.to_base32().unwrap(),
//!     Secret::Base32("KRSXG5CTMVRXEZLUKN2XAZLSKNSWG4TFOQ======".to_string())
//! );
//! ```

use constant_time_eq::constant_time_eq;

use crate::codec::{self, Detection, Encoding};
use crate::FormatError;

/// Shared secret between the token and the verifier.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "zeroize", derive(zeroize::Zeroize, zeroize::ZeroizeOnDrop))]
pub enum Secret {
    /// Non-encoded "raw" secret.
    Raw(Vec<u8>),
    /// Base32 encoded secret.
    Base32(String),
    /// Hex encoded secret, separators allowed.
    Hex(String),
    /// Text secret, used as its UTF-8 bytes.
    Text(String),
}

impl PartialEq for Secret {
    /// Will check that to_bytes() returns the same.
    /// Secrets that fail to decode are never equal.
    fn eq(&self, other: &Self) -> bool {
        match (self.to_bytes(), other.to_bytes()) {
            (Ok(left), Ok(right)) => constant_time_eq(&left, &right),
            _ => false,
        }
    }
}

#[cfg(feature = "gen_secret")]
#[cfg_attr(docsrs, doc(cfg(feature = "gen_secret")))]
impl Default for Secret {
    fn default() -> Self {
        Secret::generate_secret()
    }
}

impl Secret {
    /// Tag `input` with the encoding it will be read as, see [Detection].
    pub fn parse(input: &str, encoding: Encoding, detection: Detection) -> Secret {
        match codec::resolve_encoding(input, encoding, detection) {
            Encoding::Base32 => Secret::Base32(input.to_string()),
            Encoding::Hex => Secret::Hex(input.to_string()),
            Encoding::Text => Secret::Text(input.to_string()),
        }
    }

    /// Textual encoding of the secret, `None` for raw bytes.
    pub fn encoding(&self) -> Option<Encoding> {
        match self {
            Secret::Raw(_) => None,
            Secret::Base32(_) => Some(Encoding::Base32),
            Secret::Hex(_) => Some(Encoding::Hex),
            Secret::Text(_) => Some(Encoding::Text),
        }
    }

    /// Get the decoded secret as a Vec of bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        match self {
            Secret::Raw(bytes) => Ok(bytes.to_vec()),
            Secret::Base32(s) => codec::decode_base32(s),
            Secret::Hex(s) => codec::hex_to_bytes(s),
            Secret::Text(s) => Ok(s.as_bytes().to_vec()),
        }
    }

    /// Try to transform any secret into a `Secret::Raw`
    pub fn to_raw(&self) -> Result<Self, FormatError> {
        match self {
            Secret::Raw(_) => Ok(self.clone()),
            _ => self.to_bytes().map(Secret::Raw),
        }
    }

    /// Try to transform any secret into a canonical, padded `Secret::Base32`.
    pub fn to_base32(&self) -> Result<Self, FormatError> {
        self.to_bytes()
            .map(|bytes| Secret::Base32(codec::bytes_to_base32(&bytes)))
    }

    /// Generate a CSPRNG binary value of 160 bits,
    /// the recomended size from [rfc-4226](https://www.rfc-editor.org/rfc/rfc4226#section-4).
    ///
    /// > The length of the shared secret MUST be at least 128 bits.
    /// > This document RECOMMENDs a shared secret length of 160 bits.
    ///
    /// ⚠️ The generated secret is not guaranteed to be a valid UTF-8 sequence.
    #[cfg(feature = "gen_secret")]
    #[cfg_attr(docsrs, doc(cfg(feature = "gen_secret")))]
    pub fn generate_secret() -> Secret {
        use rand::Rng;

        let mut rng = rand::rng();
        let mut secret: [u8; 20] = Default::default();
        rng.fill(&mut secret[..]);
        Secret::Raw(secret.to_vec())
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Secret::Raw(bytes) => {
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            Secret::Base32(s) | Secret::Hex(s) | Secret::Text(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Secret;
    use crate::{Detection, Encoding, FormatError};

    const BASE32: &str = "OBWGC2LOFVZXI4TJNZTS243FMNZGK5BNGEZDG===";
    const BYTES: [u8; 23] = [
        0x70, 0x6c, 0x61, 0x69, 0x6e, 0x2d, 0x73, 0x74, 0x72, 0x69, 0x6e, 0x67, 0x2d, 0x73, 0x65,
        0x63, 0x72, 0x65, 0x74, 0x2d, 0x31, 0x32, 0x33,
    ];
    const BYTES_DISPLAY: &str = "706c61696e2d737472696e672d7365637265742d313233";
    const TEXT: &str = "plain-string-secret-123";

    #[test]
    fn secret_display() {
        let secret_raw = Secret::Raw(BYTES.to_vec());
        let secret_base32 = Secret::Base32(BASE32.to_string());
        assert_eq!(secret_raw.to_string(), BYTES_DISPLAY.to_string());
        assert_eq!(secret_base32.to_string(), BASE32.to_string());
    }

    #[test]
    fn secret_convert_base32_raw() {
        let secret_raw = Secret::Raw(BYTES.to_vec());
        let secret_base32 = Secret::Base32(BASE32.to_string());

        assert_eq!(&secret_raw.to_base32().unwrap(), &secret_base32);
        assert_eq!(&secret_raw.to_raw().unwrap(), &secret_raw);

        assert_eq!(&secret_base32.to_raw().unwrap(), &secret_raw);
        assert_eq!(&secret_base32.to_base32().unwrap(), &secret_base32);
    }

    #[test]
    fn secret_as_bytes() {
        assert_eq!(
            Secret::Raw(BYTES.to_vec()).to_bytes().unwrap(),
            BYTES.to_vec()
        );
        assert_eq!(
            Secret::Base32(BASE32.to_string()).to_bytes().unwrap(),
            BYTES.to_vec()
        );
        assert_eq!(
            Secret::Hex(BYTES_DISPLAY.to_string()).to_bytes().unwrap(),
            BYTES.to_vec()
        );
        assert_eq!(
            Secret::Text(TEXT.to_string()).to_bytes().unwrap(),
            BYTES.to_vec()
        );
    }

    #[test]
    fn secret_equality_across_encodings() {
        assert_eq!(
            Secret::Text(TEXT.to_string()),
            Secret::Hex(BYTES_DISPLAY.to_uppercase())
        );
        assert_ne!(
            Secret::Text(TEXT.to_string()),
            Secret::Text("another-secret".to_string())
        );
        // undecodable secrets never compare equal, not even to themselves
        let broken = Secret::Hex("abc".to_string());
        assert_ne!(broken, broken.clone());
    }

    #[test]
    fn secret_parse_resolves_encoding() {
        assert!(matches!(
            Secret::parse("ABCDEF23", Encoding::Hex, Detection::Heuristic),
            Secret::Base32(_)
        ));
        assert!(matches!(
            Secret::parse("ABCDEF23", Encoding::Hex, Detection::Declared),
            Secret::Hex(_)
        ));
        assert!(matches!(
            Secret::parse("abcdef23", Encoding::Hex, Detection::Heuristic),
            Secret::Hex(_)
        ));
        assert_eq!(
            Secret::parse(TEXT, Encoding::Text, Detection::Heuristic).encoding(),
            Some(Encoding::Text)
        );
        assert_eq!(Secret::Raw(vec![1]).encoding(), None);
    }

    #[test]
    fn secret_decode_errors() {
        assert_eq!(
            Secret::Hex("abc".to_string()).to_bytes(),
            Err(FormatError::OddHexLength(3))
        );
        assert!(matches!(
            Secret::Base32("KRSX0".to_string()).to_raw(),
            Err(FormatError::InvalidBase32Character { c: '0', index: 4 })
        ));
        assert!(Secret::Base32("💖".to_string()).to_base32().is_err());
    }

    #[test]
    #[cfg(feature = "gen_secret")]
    fn secret_gen_secret() {
        let sec = Secret::generate_secret();

        assert!(matches!(sec, Secret::Raw(_)));
        assert_eq!(sec.to_bytes().unwrap().len(), 20);
    }

    #[test]
    #[cfg(feature = "gen_secret")]
    fn secret_gen_default() {
        let sec = Secret::default();

        assert!(matches!(sec, Secret::Raw(_)));
        assert_eq!(sec.to_bytes().unwrap().len(), 20);
    }
}
