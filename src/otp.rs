//! HOTP ([rfc-4226](https://tools.ietf.org/html/rfc4226)) and TOTP ([rfc-6238](https://tools.ietf.org/html/rfc6238)) code generation.

use core::fmt;
use std::time::SystemTimeError;

use constant_time_eq::constant_time_eq;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use crate::{system_time, OtpError, OtpParameters, Secret};

/// One code of a verification window.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct OtpResult {
    /// Zero-padded, exactly `digits` characters long
    pub code: String,
    /// Negative before the Unix epoch
    pub counter: i64,
    /// First second, since the Unix epoch, the code is valid for
    pub valid_from: i64,
    /// First second the code is no longer valid for
    pub valid_until: i64,
    /// Whether this is the step the reference time falls into
    pub is_current: bool,
}

/// Output of [Otp::generate_codes]: a bare code for a window of 1, every code of the window otherwise.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Codes {
    Single(String),
    /// Ordered by ascending counter
    Window(Vec<OtpResult>),
}

impl Codes {
    /// Code of the current step
    pub fn current(&self) -> Option<&str> {
        match self {
            Codes::Single(code) => Some(code.as_str()),
            Codes::Window(results) => results
                .iter()
                .find(|r| r.is_current)
                .map(|r| r.code.as_str()),
        }
    }

    /// Whether `token` is one of the codes, compared in constant time
    pub fn contains(&self, token: &str) -> bool {
        match self {
            Codes::Single(code) => constant_time_eq(code.as_bytes(), token.as_bytes()),
            Codes::Window(results) => results
                .iter()
                .any(|r| constant_time_eq(r.code.as_bytes(), token.as_bytes())),
        }
    }
}

/// Otp holds a decoded secret and the parameters to generate and check codes with.
/// The secret is sensitive data, treat it accordingly.
#[derive(Clone)]
pub struct Otp {
    params: OtpParameters,
    secret: Vec<u8>,
}

impl fmt::Debug for Otp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Otp")
            .field("params", &self.params)
            .field("secret_len", &self.secret.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Otp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.params.fmt(f)
    }
}

impl PartialEq for Otp {
    fn eq(&self, other: &Self) -> bool {
        if self.params != other.params {
            return false;
        }
        constant_time_eq(&self.secret, &other.secret)
    }
}

impl Otp {
    /// Will decode the secret and check the parameters before any code is computed
    ///
    /// # Errors
    ///
    /// - [OtpError::InvalidParameters] when a parameter is out of range
    /// - [OtpError::InvalidSecret] when the secret doesn't decode, or decodes to nothing
    pub fn new(params: OtpParameters, secret: &Secret) -> Result<Otp, OtpError> {
        params.validate()?;
        let bytes = secret
            .to_bytes()
            .map_err(|e| OtpError::InvalidSecret(Some(e)))?;
        Otp::from_bytes(params, bytes)
    }

    /// Same as [Otp::new], for an already decoded secret
    pub fn from_bytes(params: OtpParameters, secret: Vec<u8>) -> Result<Otp, OtpError> {
        params.validate()?;
        if secret.is_empty() {
            return Err(OtpError::InvalidSecret(None));
        }
        Ok(Otp { params, secret })
    }

    pub fn params(&self) -> &OtpParameters {
        &self.params
    }

    fn step(&self) -> i64 {
        // at most 300, see STEP_RANGE
        self.params.step() as i64
    }

    /// Counter of the step `time` falls into, rounded towards negative infinity
    pub fn counter(&self, time: i64) -> i64 {
        time.div_euclid(self.step())
    }

    /// Will sign the given counter, as 8 big-endian two's complement bytes
    pub fn sign(&self, counter: i64) -> Vec<u8> {
        self.params
            .algorithm()
            .sign(&self.secret, counter.to_be_bytes().as_ref())
    }

    /// Will generate the code for the given counter, as per [rfc-4226](https://tools.ietf.org/html/rfc4226#section-5.3)
    pub fn hotp(&self, counter: i64) -> String {
        let binary = truncate(&self.sign(counter));
        let digits = self.params.digits();
        format!(
            "{1:00$}",
            digits,
            u64::from(binary) % 10_u64.pow(digits as u32)
        )
    }

    /// Will generate a token given the provided timestamp in seconds
    pub fn generate(&self, time: i64) -> String {
        self.hotp(self.counter(time))
    }

    /// Generate a token from the current system time
    pub fn generate_current(&self) -> Result<String, SystemTimeError> {
        let t = system_time()?;
        Ok(self.generate(t))
    }

    /// Every code of the verification window around the step `time` falls into
    pub fn generate_window(&self, time: i64) -> Vec<OtpResult> {
        self.generate_window_at_counter(self.counter(time))
    }

    /// Every code of the verification window around `counter`.
    ///
    /// Offsets go from `-(window - 1)` to `window - 1`, always `2 * window - 1` codes.
    /// Counters wrap around the ends of `i64` like the 8-byte counter they are signed as.
    pub fn generate_window_at_counter(&self, counter: i64) -> Vec<OtpResult> {
        let span = i64::from(self.params.window()) - 1;
        let step = self.step();
        tracing::trace!(
            counter,
            window = self.params.window(),
            algorithm = %self.params.algorithm(),
            "computing otp window"
        );

        (-span..=span)
            .map(|offset| {
                let current = counter.wrapping_add(offset);
                let valid_from = current.saturating_mul(step);
                OtpResult {
                    code: self.hotp(current),
                    counter: current,
                    valid_from,
                    valid_until: valid_from.saturating_add(step),
                    is_current: offset == 0,
                }
            })
            .collect()
    }

    /// A bare code when the window is 1, the whole window otherwise
    pub fn generate_codes(&self, time: i64) -> Codes {
        if self.params.window() == 1 {
            Codes::Single(self.generate(time))
        } else {
            Codes::Window(self.generate_window(time))
        }
    }

    /// Will check if token is valid given the provided timestamp in seconds, accounting for the window
    pub fn check(&self, token: &str, time: i64) -> bool {
        self.check_counter(token, self.counter(time))
    }

    /// Will check if token is valid for `counter`, accounting for the window
    pub fn check_counter(&self, token: &str, counter: i64) -> bool {
        if token.len() != self.params.digits() {
            return false;
        }
        self.generate_window_at_counter(counter)
            .iter()
            .any(|r| constant_time_eq(r.code.as_bytes(), token.as_bytes()))
    }

    /// Will check if token is valid by current system time, accounting for the window
    pub fn check_current(&self, token: &str) -> Result<bool, SystemTimeError> {
        let t = system_time()?;
        Ok(self.check(token, t))
    }

    /// Returns the timestamp of the first second for the next step
    /// given the provided timestamp in seconds, saturating at `i64::MAX`
    pub fn next_step(&self, time: i64) -> i64 {
        self.counter(time)
            .saturating_add(1)
            .saturating_mul(self.step())
    }

    /// Returns the timestamp of the first second of the next step
    /// According to system time
    pub fn next_step_current(&self) -> Result<i64, SystemTimeError> {
        let t = system_time()?;
        Ok(self.next_step(t))
    }

    /// Give the ttl (in seconds) of the current token
    pub fn ttl(&self) -> Result<i64, SystemTimeError> {
        let t = system_time()?;
        Ok(self.step() - t.rem_euclid(self.step()))
    }
}

/// Dynamic truncation of [rfc-4226 §5.3](https://tools.ietf.org/html/rfc4226#section-5.3).
///
/// Digests are at least 20 bytes long, so `offset + 3` is always in bounds.
fn truncate(digest: &[u8]) -> u32 {
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let word = [
        digest[offset],
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ];
    u32::from_be_bytes(word) & 0x7fff_ffff
}
