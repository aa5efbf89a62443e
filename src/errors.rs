use snafu::{Backtrace, Snafu};

pub type Result<T, E = Error> = ::std::result::Result<T, E>;

/// Error types
#[derive(Debug, Snafu)]
pub enum Error {
    /// Fewer bytes were supplied than the length encoding or the declared
    /// subpacket length requires.
    #[snafu(display("truncated input: needed {needed} bytes, {remaining} remaining"))]
    TruncatedInput {
        needed: usize,
        remaining: usize,
        backtrace: Option<Backtrace>,
    },
    /// The body bytes are present but inconsistent with the shape the
    /// subpacket type requires.
    #[snafu(display("malformed subpacket: {message}"))]
    MalformedSubpacket {
        message: String,
        backtrace: Option<Backtrace>,
    },
    /// An in-memory value cannot be serialized for its declared type.
    /// Only produced on export, never while parsing.
    #[snafu(display("unsupported value: {message}"))]
    UnsupportedValue {
        message: String,
        backtrace: Option<Backtrace>,
    },
    #[snafu(transparent)]
    IO {
        source: std::io::Error,
        backtrace: Option<Backtrace>,
    },
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedSubpacket {
            message: message.into(),
            backtrace: snafu::GenerateImplicitData::generate(),
        }
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Error::UnsupportedValue {
            message: message.into(),
            backtrace: snafu::GenerateImplicitData::generate(),
        }
    }

    /// Returns true if more input could have turned this error into a
    /// successful parse.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::TruncatedInput { .. })
    }
}

macro_rules! bail {
    ($e:expr) => {
        return Err($crate::errors::Error::malformed($e.to_string()))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::malformed(format!($fmt, $($arg)+)))
    };
}

macro_rules! ensure {
    ($cond:expr, $e:expr) => {
        if !($cond) {
            return Err($crate::errors::Error::malformed($e.to_string()));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)+) => {
        if !($cond) {
            return Err($crate::errors::Error::malformed(format!($fmt, $($arg)+)));
        }
    };
}

macro_rules! unsupported_err {
    ($e:expr) => {
        return Err($crate::errors::Error::unsupported($e.to_string()))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::unsupported(format!($fmt, $($arg)+)))
    };
}

pub(crate) use bail;
pub(crate) use ensure;
pub(crate) use unsupported_err;
