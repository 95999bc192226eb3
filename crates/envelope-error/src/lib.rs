//! Error types shared across the `envelope` workspace.
//!
//! Mirrors the shape of the error kinds in spec §7: each kind is
//! surfaced as its own variant rather than a single opaque string, so
//! callers can match on `.code()` without parsing messages.

use std::borrow::Cow;
use std::fmt;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, EnvelopeError>;

/// Coarse classification of an [`EnvelopeError`], stable across
/// message wording changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Invalid parameter combination in the configuration record.
    ConfigError,
    /// No `Genetics` capability installed, or it reports zero bits.
    GeneticsBindError,
    /// The initializer rejected too many consecutive candidates.
    InitStall,
    /// Every evaluation in a batch failed.
    AllEvalsFailed,
    /// A resume was requested but the log could not be parsed.
    LogReadError,
    /// An error wrapped with additional context.
    Context,
}

/// A cheaply-cloneable error message, avoiding an allocation for the
/// common case of a `&'static str` literal.
#[derive(Debug, Clone)]
pub struct ErrString(Cow<'static, str>);

impl ErrString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<Cow<'static, str>>> From<T> for ErrString {
    fn from(value: T) -> Self {
        ErrString(value.into())
    }
}

impl fmt::Display for ErrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::ops::Deref for ErrString {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

/// The error type returned by engine construction and `run`.
#[derive(Debug, Clone)]
pub enum EnvelopeError {
    /// mutationDecayRate <= 0, fitnessSpaceDimensionality <= 0,
    /// internalPopulationSize <= 0, numberOfThreads < 1, etc.
    ConfigError { message: ErrString },
    /// No `Genetics` capability installed, or `chromosome_size() == 0`.
    GeneticsBindError { message: ErrString },
    /// The initializer rejected more than 10^6 consecutive candidates.
    InitStall { message: ErrString },
    /// Every evaluation in one iteration's batch failed.
    AllEvalsFailed { message: ErrString },
    /// Resume was requested but the log is unparseable.
    LogReadError { message: ErrString },
    /// A lower-level error annotated with additional context.
    Context {
        context: ErrString,
        source: Box<EnvelopeError>,
    },
}

impl EnvelopeError {
    pub fn config<M: Into<ErrString>>(message: M) -> Self {
        EnvelopeError::ConfigError {
            message: message.into(),
        }
    }

    pub fn genetics_bind<M: Into<ErrString>>(message: M) -> Self {
        EnvelopeError::GeneticsBindError {
            message: message.into(),
        }
    }

    pub fn init_stall<M: Into<ErrString>>(message: M) -> Self {
        EnvelopeError::InitStall {
            message: message.into(),
        }
    }

    pub fn all_evals_failed<M: Into<ErrString>>(message: M) -> Self {
        EnvelopeError::AllEvalsFailed {
            message: message.into(),
        }
    }

    pub fn log_read<M: Into<ErrString>>(message: M) -> Self {
        EnvelopeError::LogReadError {
            message: message.into(),
        }
    }

    pub fn with_context<M: Into<ErrString>>(self, context: M) -> Self {
        EnvelopeError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            EnvelopeError::ConfigError { .. } => ErrorCode::ConfigError,
            EnvelopeError::GeneticsBindError { .. } => ErrorCode::GeneticsBindError,
            EnvelopeError::InitStall { .. } => ErrorCode::InitStall,
            EnvelopeError::AllEvalsFailed { .. } => ErrorCode::AllEvalsFailed,
            EnvelopeError::LogReadError { .. } => ErrorCode::LogReadError,
            EnvelopeError::Context { .. } => ErrorCode::Context,
        }
    }
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeError::ConfigError { message } => write!(f, "invalid configuration: {message}"),
            EnvelopeError::GeneticsBindError { message } => {
                write!(f, "genetics capability not usable: {message}")
            }
            EnvelopeError::InitStall { message } => write!(f, "initializer stalled: {message}"),
            EnvelopeError::AllEvalsFailed { message } => {
                write!(f, "all evaluations in one iteration failed: {message}")
            }
            EnvelopeError::LogReadError { message } => write!(f, "could not read log: {message}"),
            EnvelopeError::Context { context, source } => write!(f, "{context}: {source}"),
        }
    }
}

impl std::error::Error for EnvelopeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnvelopeError::Context { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Extension trait for attaching context to any `Result<T, EnvelopeError>`.
pub trait ResultExt<T> {
    fn context<M: Into<ErrString>>(self, message: M) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<M: Into<ErrString>>(self, message: M) -> Result<T> {
        self.map_err(|e| e.with_context(message))
    }
}
