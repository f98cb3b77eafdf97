//! Shared error classification.
//!
//! Each component keeps its own error enum next to the code that raises it
//! (`FactoryError` beside the factory, `MotionError` beside the motion state
//! machine). This module holds only what they have in common: a severity that
//! tells the caller whether to retry, tell the player "nothing happened", or
//! give up on the map.

/// How a caller should react to an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum ErrorSeverity {
    /// Refused for now, fine to ask again: a blocked step, input suspended
    /// by a running motion.
    Recoverable,

    /// The request itself is wrong: an unknown event type, bad arguments.
    Validation,

    /// Bookkeeping disagrees with itself, e.g. a completion for an object
    /// that is not moving.
    Internal,

    /// The map being loaded cannot be used.
    Fatal,
}

impl ErrorSeverity {
    pub const fn is_recoverable(self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Whether the error points at a bug or a broken map rather than at the
    /// request.
    pub const fn is_defect(self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Implemented by every error enum in the workspace.
pub trait GameError: std::fmt::Display + std::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable machine-readable tag, e.g. `FACTORY_MISSING_PROPERTY`.
    fn error_code(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_names_are_lowercase() {
        assert_eq!(ErrorSeverity::Recoverable.to_string(), "recoverable");
        assert_eq!(ErrorSeverity::Fatal.as_ref(), "fatal");
    }

    #[test]
    fn defects_are_internal_or_fatal() {
        assert!(ErrorSeverity::Internal.is_defect());
        assert!(ErrorSeverity::Fatal.is_defect());
        assert!(!ErrorSeverity::Validation.is_defect());
        assert!(ErrorSeverity::Recoverable.is_recoverable());
    }
}
