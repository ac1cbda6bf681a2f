use std::time::Duration;

use thiserror::Error;

/// Failure to score a single translation/reference pair. Never fatal for a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("translation is empty; precision is undefined")]
    EmptyTranslation,
    #[error("reference is empty; recall is undefined")]
    EmptyReference,
    #[error(
        "no words aligned between translation ({translation_len} words) and reference ({reference_len} words); Fmean is undefined"
    )]
    Undefined {
        translation_len: usize,
        reference_len: usize,
    },
    #[error("alpha must lie strictly between 0 and 1, got {alpha}")]
    InvalidAlpha { alpha: f64 },
    #[error("alignment search truncated after {explored} nodes (limit {limit})")]
    SearchTruncated { explored: usize, limit: usize },
    #[error("scoring exceeded the {limit:?} time budget")]
    TimedOut { limit: Duration },
    #[error("scoring worker failed: {message}")]
    Worker { message: String },
}

impl ScoreError {
    /// True when the pair simply has no score, as opposed to scoring having failed.
    pub fn is_undefined(&self) -> bool {
        matches!(
            self,
            Self::EmptyTranslation | Self::EmptyReference | Self::Undefined { .. }
        )
    }

    pub(crate) fn worker(err: impl std::fmt::Display) -> Self {
        Self::Worker {
            message: err.to_string(),
        }
    }
}

/// Errors that abort a corpus evaluation.
#[derive(Debug, Error)]
pub enum MeteorError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected 3 sentences separated by ' ||| ', found {fields}")]
    MalformedLine { line: usize, fields: usize },
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
    #[error("{context}: {message}")]
    Runtime {
        context: &'static str,
        message: String,
    },
}

impl MeteorError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn runtime(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Runtime {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_classification() {
        assert!(ScoreError::EmptyTranslation.is_undefined());
        assert!(ScoreError::EmptyReference.is_undefined());
        assert!(ScoreError::Undefined {
            translation_len: 1,
            reference_len: 1
        }
        .is_undefined());
        assert!(!ScoreError::SearchTruncated {
            explored: 11,
            limit: 10
        }
        .is_undefined());
        assert!(!ScoreError::worker("panicked").is_undefined());
    }

    #[test]
    fn test_messages_carry_context() {
        let err = MeteorError::MalformedLine { line: 7, fields: 2 };
        assert_eq!(
            err.to_string(),
            "line 7: expected 3 sentences separated by ' ||| ', found 2"
        );
        let err = MeteorError::io(
            "opening input",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().starts_with("I/O error while opening input"));
    }
}
