use std::time::SystemTimeError;

/// Malformed secret material. Always recoverable by fixing the input.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormatError {
    /// A character outside `0-9a-fA-F` after separators were stripped.
    InvalidHexCharacter { c: char, index: usize },
    /// Hex input must describe whole bytes.
    OddHexLength(usize),
    /// A character outside the RFC 4648 alphabet `A-Z2-7`.
    InvalidBase32Character { c: char, index: usize },
    /// Decoded bytes were requested as text but are not UTF-8.
    InvalidUtf8,
    /// Validated base32 that the decoder still refused.
    ParseBase32,
}

impl std::error::Error for FormatError {}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::InvalidHexCharacter { c, index } => write!(
                f,
                "Invalid hex character {:?} at position {}",
                c, index
            ),
            FormatError::OddHexLength(len) => write!(
                f,
                "Hex secret must have an even number of digits, got {}",
                len
            ),
            FormatError::InvalidBase32Character { c, index } => write!(
                f,
                "Invalid base32 character {:?} at position {}, expected A-Z or 2-7",
                c, index
            ),
            FormatError::InvalidUtf8 => write!(f, "Decoded secret is not valid UTF-8 text"),
            FormatError::ParseBase32 => write!(f, "Could not decode base32 secret."),
        }
    }
}

/// Code generation parameters outside the supported ranges.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ParameterError {
    /// Digits must be between 6 and 10
    Digits(usize),
    /// Time step must be between 10 and 300 seconds
    Step(u64),
    /// Verification window must be between 1 and 10
    Window(u8),
    /// Unknown hash algorithm name
    Algorithm(String),
}

impl std::error::Error for ParameterError {}

impl std::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterError::Digits(digits) => write!(
                f,
                "Codes must have between 6 and 10 digits. {} digits is not allowed",
                digits
            ),
            ParameterError::Step(step) => write!(
                f,
                "Time step must be between 10 and 300 seconds. {} seconds is not allowed",
                step
            ),
            ParameterError::Window(window) => write!(
                f,
                "Verification window must be between 1 and 10 steps. {} is not allowed",
                window
            ),
            ParameterError::Algorithm(algo) => write!(
                f,
                "Algorithm can only be SHA1, SHA256 or SHA512, not \"{}\"",
                algo
            ),
        }
    }
}

/// Everything that can go wrong while generating or verifying a code.
#[derive(Debug)]
pub enum OtpError {
    /// The secret doesn't decode from its declared encoding (with the cause),
    /// or decodes to zero bytes (`None`).
    InvalidSecret(Option<FormatError>),
    /// See [ParameterError].
    InvalidParameters(ParameterError),
    /// The system clock is set before the Unix epoch.
    SystemTime(SystemTimeError),
}

impl std::error::Error for OtpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OtpError::InvalidSecret(Some(e)) => Some(e),
            OtpError::InvalidSecret(None) => None,
            OtpError::InvalidParameters(e) => Some(e),
            OtpError::SystemTime(e) => Some(e),
        }
    }
}

impl std::fmt::Display for OtpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OtpError::InvalidSecret(Some(e)) => write!(f, "Invalid secret: {}", e),
            OtpError::InvalidSecret(None) => write!(f, "Secret must decode to at least one byte"),
            OtpError::InvalidParameters(e) => write!(f, "Invalid parameters: {}", e),
            OtpError::SystemTime(e) => write!(
                f,
                "System time error: {}. The system time is set before the Unix epoch",
                e
            ),
        }
    }
}

impl From<ParameterError> for OtpError {
    fn from(e: ParameterError) -> Self {
        OtpError::InvalidParameters(e)
    }
}

impl From<SystemTimeError> for OtpError {
    fn from(e: SystemTimeError) -> Self {
        OtpError::SystemTime(e)
    }
}
