use core::fmt;
use core::ops::RangeInclusive;

use crate::{Algorithm, ParameterError};

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_DIGITS: usize = 6;
pub const DEFAULT_STEP: u64 = 30;
pub const DEFAULT_WINDOW: u8 = 1;

/// Hardware tokens display between 6 and 10 digits
pub const DIGITS_RANGE: RangeInclusive<usize> = 6..=10;
/// Supported time step, in seconds
pub const STEP_RANGE: RangeInclusive<u64> = 10..=300;
/// Supported verification window, in steps
pub const WINDOW_RANGE: RangeInclusive<u8> = 1..=10;

pub fn assert_digits(digits: usize) -> Result<(), ParameterError> {
    if !DIGITS_RANGE.contains(&digits) {
        Err(ParameterError::Digits(digits))
    } else {
        Ok(())
    }
}

pub fn assert_step(step: u64) -> Result<(), ParameterError> {
    if !STEP_RANGE.contains(&step) {
        Err(ParameterError::Step(step))
    } else {
        Ok(())
    }
}

pub fn assert_window(window: u8) -> Result<(), ParameterError> {
    if !WINDOW_RANGE.contains(&window) {
        Err(ParameterError::Window(window))
    } else {
        Ok(())
    }
}

/// Set of options describing how codes are generated and verified.
///
/// # Example
/// ```
/// use otp_engine::{Algorithm, OtpParameters};
///
/// let params = OtpParameters::default()
///     .with_digits(8)
///     .and_then(|p| p.with_window(2))
///     .unwrap()
///     .with_algorithm(Algorithm::SHA256);
///
/// assert_eq!(params.digits(), 8);
/// assert_eq!(params.step(), 30);
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct OtpParameters {
    /// SHA1 unless the token was provisioned otherwise
    algorithm: Algorithm,
    /// Length of every code, leading zeros included
    digits: usize,
    /// Duration in seconds of a step
    step: u64,
    /// 1 accepts only the current step, n also accepts the n-1 steps before and after it
    window: u8,
}

impl Default for OtpParameters {
    fn default() -> Self {
        OtpParameters {
            algorithm: Algorithm::default(),
            digits: DEFAULT_DIGITS,
            step: DEFAULT_STEP,
            window: DEFAULT_WINDOW,
        }
    }
}

impl fmt::Display for OtpParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "digits: {}; step: {}; alg: {}; window: {}",
            self.digits, self.step, self.algorithm, self.window
        )
    }
}

impl OtpParameters {
    /// # Errors
    ///
    /// will return a [ParameterError] when
    /// - `digits` is lower than 6 or higher than 10
    /// - `step` is lower than 10 or higher than 300
    /// - `window` is 0 or higher than 10
    pub fn new(
        algorithm: Algorithm,
        digits: usize,
        step: u64,
        window: u8,
    ) -> Result<OtpParameters, ParameterError> {
        let params = OtpParameters {
            algorithm,
            digits,
            step,
            window,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every field against its supported range.
    ///
    /// Deserialized parameters have not been through this yet.
    pub fn validate(&self) -> Result<(), ParameterError> {
        assert_digits(self.digits)?;
        assert_step(self.step)?;
        assert_window(self.window)
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_digits(mut self, digits: usize) -> Result<Self, ParameterError> {
        assert_digits(digits)?;
        self.digits = digits;
        Ok(self)
    }

    pub fn with_step(mut self, step: u64) -> Result<Self, ParameterError> {
        assert_step(step)?;
        self.step = step;
        Ok(self)
    }

    pub fn with_window(mut self, window: u8) -> Result<Self, ParameterError> {
        assert_window(window)?;
        self.window = window;
        Ok(self)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn window(&self) -> u8 {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::{OtpParameters, ParameterError};
    use crate::Algorithm;

    #[test]
    fn default_values() {
        let params = OtpParameters::default();
        assert_eq!(params.algorithm(), Algorithm::SHA1);
        assert_eq!(params.digits(), 6);
        assert_eq!(params.step(), 30);
        assert_eq!(params.window(), 1);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn new_digits() {
        for x in 0..=20 {
            let params = OtpParameters::new(Algorithm::SHA1, x, 30, 1);
            if !(6..=10).contains(&x) {
                assert_eq!(params.unwrap_err(), ParameterError::Digits(x));
            } else {
                assert_eq!(params.unwrap().digits(), x);
            }
        }
    }

    #[test]
    fn new_step() {
        for step in [0, 1, 9, 301, 3600] {
            assert_eq!(
                OtpParameters::new(Algorithm::SHA1, 6, step, 1).unwrap_err(),
                ParameterError::Step(step)
            );
        }
        for step in [10, 30, 60, 300] {
            assert!(OtpParameters::new(Algorithm::SHA1, 6, step, 1).is_ok());
        }
    }

    #[test]
    fn new_window() {
        assert_eq!(
            OtpParameters::new(Algorithm::SHA1, 6, 30, 0).unwrap_err(),
            ParameterError::Window(0)
        );
        assert_eq!(
            OtpParameters::new(Algorithm::SHA1, 6, 30, 11).unwrap_err(),
            ParameterError::Window(11)
        );
        assert!(OtpParameters::new(Algorithm::SHA1, 6, 30, 10).is_ok());
    }

    #[test]
    fn digits_checked_first() {
        assert_eq!(
            OtpParameters::new(Algorithm::SHA1, 4, 0, 0).unwrap_err(),
            ParameterError::Digits(4)
        );
    }

    #[test]
    fn with_setters() {
        let params = OtpParameters::default();
        assert_eq!(
            params.with_digits(11).unwrap_err(),
            ParameterError::Digits(11)
        );
        let params = params
            .with_digits(10)
            .and_then(|p| p.with_step(60))
            .and_then(|p| p.with_window(3))
            .unwrap()
            .with_algorithm(Algorithm::SHA512);
        assert_eq!(
            params,
            OtpParameters::new(Algorithm::SHA512, 10, 60, 3).unwrap()
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            OtpParameters::default().to_string(),
            "digits: 6; step: 30; alg: SHA1; window: 1"
        );
    }
}
