use thiserror::Error;

/// Broad classes of decode failure. Callers that only care about the kind of
/// failure (not its context) match on this instead of [`DecodeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeErrorKind {
    MalformedRecord,
    UnknownMessageType,
    UnknownTransmissionType,
    TimestampFormat,
    NumericFormat,
}

/// Failure to turn one record into a [`crate::model::Message`].
///
/// Field-level variants carry the index of the offending field and its raw
/// text so the caller can report exactly what was wrong.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("malformed record: {reason}")]
    MalformedRecord { reason: String },
    #[error("malformed record: expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
    #[error("unknown message type {value:?} in field {index}")]
    UnknownMessageType { index: usize, value: String },
    #[error("unknown transmission type {value:?} in field {index}")]
    UnknownTransmissionType { index: usize, value: String },
    #[error("bad timestamp {value:?} in field {index}: {reason}")]
    TimestampFormat {
        index: usize,
        value: String,
        reason: String,
    },
    #[error("bad number {value:?} in field {index}: {reason}")]
    NumericFormat {
        index: usize,
        value: String,
        reason: String,
    },
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::MalformedRecord { .. } | DecodeError::TooFewFields { .. } => {
                DecodeErrorKind::MalformedRecord
            }
            DecodeError::UnknownMessageType { .. } => DecodeErrorKind::UnknownMessageType,
            DecodeError::UnknownTransmissionType { .. } => DecodeErrorKind::UnknownTransmissionType,
            DecodeError::TimestampFormat { .. } => DecodeErrorKind::TimestampFormat,
            DecodeError::NumericFormat { .. } => DecodeErrorKind::NumericFormat,
        }
    }

    /// Index of the field that caused the failure, if a single field did.
    pub fn field_index(&self) -> Option<usize> {
        match self {
            DecodeError::MalformedRecord { .. } | DecodeError::TooFewFields { .. } => None,
            DecodeError::UnknownMessageType { index, .. }
            | DecodeError::UnknownTransmissionType { index, .. }
            | DecodeError::TimestampFormat { index, .. }
            | DecodeError::NumericFormat { index, .. } => Some(*index),
        }
    }
}

impl From<csv::Error> for DecodeError {
    fn from(e: csv::Error) -> Self {
        DecodeError::MalformedRecord { reason: format!("{}", e) }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IO(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("line {line}: {source}")]
    Decode {
        line: u64,
        #[source]
        source: DecodeError,
    },
    #[error("other: {0}")]
    Other(String),
}

impl AppError {
    /// The decode failure behind this error, if there is one.
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            AppError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::IO(format!("{}", e))
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        if e.is_io_error() {
            AppError::IO(format!("{}", e))
        } else {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            AppError::Decode { line, source: DecodeError::from(e) }
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Other(format!("json: {}", e))
    }
}
