//! A single holding edge between two funds.

use serde::{Deserialize, Serialize};

use super::FundId;

/// `parent` holds `book_value` worth of `child`.
///
/// The book value drives the local weight of `child` inside `parent`. The
/// optional market value is the current value of the same position and is
/// only used to derive returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// The holding fund.
    pub parent: FundId,
    /// The held fund.
    pub child: FundId,
    /// Value of `child` recorded by `parent`.
    pub book_value: f64,
    /// Current value of the position, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_value: Option<f64>,
}

impl Holding {
    /// Creates a holding with book value only.
    pub fn new(parent: impl Into<FundId>, child: impl Into<FundId>, book_value: f64) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
            book_value,
            market_value: None,
        }
    }

    /// Sets the market value.
    #[must_use]
    pub fn with_market_value(mut self, market_value: f64) -> Self {
        self.market_value = Some(market_value);
        self
    }

    /// Market value minus book value.
    pub fn gain(&self) -> Option<f64> {
        self.market_value.map(|mv| mv - self.book_value)
    }

    /// Simple return of the position, `(market - book) / book`.
    ///
    /// `None` without a market value or with a zero book value.
    pub fn simple_return(&self) -> Option<f64> {
        if self.book_value == 0.0 {
            return None;
        }
        self.gain().map(|g| g / self.book_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_book_only() {
        let h = Holding::new("A", "B", 1000.0);
        assert_eq!(h.parent.as_str(), "A");
        assert_eq!(h.child.as_str(), "B");
        assert!(h.gain().is_none());
        assert!(h.simple_return().is_none());
    }

    #[test]
    fn test_simple_return() {
        let h = Holding::new("A", "B", 1000.0).with_market_value(1100.0);
        assert_relative_eq!(h.gain().unwrap(), 100.0);
        assert_relative_eq!(h.simple_return().unwrap(), 0.1);

        let loss = Holding::new("A", "C", 2000.0).with_market_value(1500.0);
        assert_relative_eq!(loss.simple_return().unwrap(), -0.25);
    }

    #[test]
    fn test_zero_book_value_has_no_return() {
        let h = Holding::new("A", "B", 0.0).with_market_value(10.0);
        assert!(h.simple_return().is_none());
    }
}
