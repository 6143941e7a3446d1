//! This library generates and verifies the one-time codes of hardware authentication tokens,
//! per HOTP ([rfc-4226](https://tools.ietf.org/html/rfc4226)) and TOTP ([rfc-6238](https://tools.ietf.org/html/rfc6238)),
//! with configurable digits, time step, algorithm and verification window.
//! Token secrets are accepted as Base32, hex or plain text, and can be normalized to Base32.
//!
//! Everything is a pure function of the secret, the parameters and the reference time:
//! nothing is cached or shared between calls.
//!
//! # Examples
//!
//! ```rust
//! use otp_engine::{generate_otp, verify_otp, Algorithm, Codes, OtpParameters, Secret};
//!
//! let secret = Secret::Text("12345678901234567890".to_string());
//! let params = OtpParameters::new(Algorithm::SHA1, 8, 30, 1).unwrap();
//!
//! let codes = generate_otp(&secret, &params, Some(59)).unwrap();
//! assert_eq!(codes, Codes::Single("94287082".to_string()));
//! assert!(verify_otp(&secret, "94287082", &params, Some(59)).unwrap());
//! ```
//!
//! ```rust
//! use otp_engine::{encode_to_base32, Detection, Encoding};
//!
//! let base32 = encode_to_base32("48656c6c6f20576f726c6421", Encoding::Hex, Detection::Declared).unwrap();
//! assert_eq!(base32, "JBSWY3DPEBLW64TMMQQQ====");
//! ```

pub mod codec;
mod error;
mod otp;
mod params;
mod secret;

pub use codec::{
    decode_base32, decode_base32_to_hex, decode_base32_to_text, encode_to_base32, Detection,
    Encoding,
};
pub use error::{FormatError, OtpError, ParameterError};
pub use otp::{Codes, Otp, OtpResult};
pub use params::{
    OtpParameters, DEFAULT_DIGITS, DEFAULT_STEP, DEFAULT_WINDOW, DIGITS_RANGE, STEP_RANGE,
    WINDOW_RANGE,
};
pub use secret::Secret;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use core::fmt;
use core::str::FromStr;

use hmac::Mac;
use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

type HmacSha1 = hmac::Hmac<sha1::Sha1>;
type HmacSha256 = hmac::Hmac<sha2::Sha256>;
type HmacSha512 = hmac::Hmac<sha2::Sha512>;

/// Algorithm enum holds the three standards algorithms for TOTP as per the [reference implementation](https://tools.ietf.org/html/rfc6238#appendix-A)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub enum Algorithm {
    #[default]
    SHA1,
    SHA256,
    SHA512,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::SHA1 => f.write_str("SHA1"),
            Algorithm::SHA256 => f.write_str("SHA256"),
            Algorithm::SHA512 => f.write_str("SHA512"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ParameterError;

    /// Case-insensitive, `SHA-256` is accepted as well as `SHA256`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "").to_ascii_uppercase().as_str() {
            "SHA1" => Ok(Algorithm::SHA1),
            "SHA256" => Ok(Algorithm::SHA256),
            "SHA512" => Ok(Algorithm::SHA512),
            _ => Err(ParameterError::Algorithm(s.to_string())),
        }
    }
}

impl Algorithm {
    fn hash<D>(mut digest: D, data: &[u8]) -> Vec<u8>
    where
        D: Mac,
    {
        digest.update(data);
        digest.finalize().into_bytes().to_vec()
    }

    fn sign(&self, key: &[u8], data: &[u8]) -> Vec<u8> {
        const ANY_KEY: &str = "HMAC takes keys of any length";
        match self {
            Algorithm::SHA1 => {
                Algorithm::hash(HmacSha1::new_from_slice(key).expect(ANY_KEY), data)
            }
            Algorithm::SHA256 => {
                Algorithm::hash(HmacSha256::new_from_slice(key).expect(ANY_KEY), data)
            }
            Algorithm::SHA512 => {
                Algorithm::hash(HmacSha512::new_from_slice(key).expect(ANY_KEY), data)
            }
        }
    }
}

fn system_time() -> Result<i64, SystemTimeError> {
    let t = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    Ok(i64::try_from(t).unwrap_or(i64::MAX))
}

/// Compute the codes for `secret` at `time`, or at the current system time when `None`.
///
/// Returns [Codes::Single] when the window is 1, the whole window otherwise.
///
/// # Errors
///
/// Parameters are checked before the secret is decoded, see [Otp::new].
pub fn generate_otp(
    secret: &Secret,
    params: &OtpParameters,
    time: Option<i64>,
) -> Result<Codes, OtpError> {
    let otp = Otp::new(*params, secret)?;
    let time = match time {
        Some(t) => t,
        None => system_time()?,
    };
    Ok(otp.generate_codes(time))
}

/// Check `token` against the codes of the window around `time`, or the current system time when `None`.
///
/// A token of the wrong length is a wrong code, not an error.
///
/// # Errors
///
/// Same as [generate_otp].
pub fn verify_otp(
    secret: &Secret,
    token: &str,
    params: &OtpParameters,
    time: Option<i64>,
) -> Result<bool, OtpError> {
    let otp = Otp::new(*params, secret)?;
    let time = match time {
        Some(t) => t,
        None => system_time()?,
    };
    Ok(otp.check(token, time))
}
