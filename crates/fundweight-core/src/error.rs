//! Error types for weight resolution.
//!
//! Every structural problem with a holdings graph is fatal: the resolver never
//! produces partial output for an invalid graph.

use thiserror::Error;

use crate::types::FundId;

/// Result type for weight resolution operations.
pub type WeightResult<T> = Result<T, WeightError>;

/// Errors that can occur while building or resolving a holdings graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightError {
    /// The same parent/child pair was defined more than once.
    #[error("Duplicate holding of '{child}' in '{parent}'")]
    DuplicateEdge {
        /// The holding fund.
        parent: FundId,
        /// The held fund.
        child: FundId,
    },

    /// The holdings graph contains a directed cycle.
    #[error("Holdings are looped: {}", format_path(.path))]
    Cycle {
        /// Funds forming the cycle, first fund repeated at the end.
        path: Vec<FundId>,
    },

    /// The children of a fund carry book values that sum to zero.
    #[error("Weights of fund '{fund}' are undefined: children book values sum to zero")]
    UndefinedWeight {
        /// The fund whose children cannot be normalised.
        fund: FundId,
    },

    /// The book values of a fund's holdings sum past the range of `f64`.
    #[error("Book values of the holdings of fund '{fund}' overflow")]
    ValueOverflow {
        /// The fund whose children cannot be normalised.
        fund: FundId,
    },

    /// A book or market value is not a finite number.
    #[error("Invalid {field} for holding of '{child}' in '{parent}': {value}")]
    InvalidValue {
        /// The holding fund.
        parent: FundId,
        /// The held fund.
        child: FundId,
        /// Which value was rejected (`book_value` or `market_value`).
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A fund label was empty or whitespace only.
    #[error("Fund identifier must not be empty")]
    EmptyIdentifier,
}

impl WeightError {
    /// Create a duplicate edge error.
    #[must_use]
    pub fn duplicate_edge(parent: impl Into<FundId>, child: impl Into<FundId>) -> Self {
        Self::DuplicateEdge {
            parent: parent.into(),
            child: child.into(),
        }
    }

    /// Create a cycle error from the funds along the cycle.
    #[must_use]
    pub fn cycle(path: Vec<FundId>) -> Self {
        Self::Cycle { path }
    }

    /// Create an undefined weight error.
    #[must_use]
    pub fn undefined_weight(fund: impl Into<FundId>) -> Self {
        Self::UndefinedWeight { fund: fund.into() }
    }

    /// Create a value overflow error.
    #[must_use]
    pub fn value_overflow(fund: impl Into<FundId>) -> Self {
        Self::ValueOverflow { fund: fund.into() }
    }

    /// Create an invalid value error.
    #[must_use]
    pub fn invalid_value(
        parent: impl Into<FundId>,
        child: impl Into<FundId>,
        field: &'static str,
        value: f64,
    ) -> Self {
        Self::InvalidValue {
            parent: parent.into(),
            child: child.into(),
            field,
            value,
        }
    }

    /// Returns the cycle path if this is a cycle error.
    pub fn cycle_path(&self) -> Option<&[FundId]> {
        match self {
            Self::Cycle { path } => Some(path),
            _ => None,
        }
    }
}

fn format_path(path: &[FundId]) -> String {
    path.iter()
        .map(FundId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WeightError::duplicate_edge("B", "E");
        assert!(err.to_string().contains("'E'"));
        assert!(err.to_string().contains("'B'"));

        let err = WeightError::undefined_weight("C");
        assert!(err.to_string().contains("'C'"));

        let err = WeightError::value_overflow("A");
        assert_eq!(err.to_string(), "Book values of the holdings of fund 'A' overflow");

        let err = WeightError::invalid_value("A", "B", "book_value", f64::NAN);
        assert!(err.to_string().contains("book_value"));
    }

    #[test]
    fn test_cycle_display() {
        let err = WeightError::cycle(vec!["A".into(), "B".into(), "A".into()]);
        assert_eq!(err.to_string(), "Holdings are looped: A -> B -> A");
        assert_eq!(err.cycle_path().map(<[FundId]>::len), Some(3));
        assert!(WeightError::EmptyIdentifier.cycle_path().is_none());
    }
}
