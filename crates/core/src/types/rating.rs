//! Vendor rating type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RatingError {
    /// The value is NaN or infinite.
    #[error("rating must be a finite number")]
    NotFinite,
    /// The value lies outside the allowed range.
    #[error("rating must be between {min} and {max} (got {value})")]
    OutOfRange {
        /// The rejected value.
        value: f64,
        /// Lowest allowed rating.
        min: f64,
        /// Highest allowed rating.
        max: f64,
    },
}

/// A vendor rating on a 1 to 5 scale, with one decimal place.
///
/// Ratings are never stored; they are synthesized when a vendor view is
/// built.
///
/// ## Examples
///
/// ```
/// use bazaar_core::Rating;
///
/// assert_eq!(Rating::new(4.26).unwrap().value(), 4.3);
/// assert!(Rating::new(0.5).is_err());
/// assert!(Rating::new(5.01).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(f64);

impl Rating {
    /// Lowest possible rating.
    pub const MIN: f64 = 1.0;

    /// Highest possible rating.
    pub const MAX: f64 = 5.0;

    /// Create a rating, rounding to one decimal place.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not finite or lies outside
    /// `[Rating::MIN, Rating::MAX]`.
    pub fn new(value: f64) -> Result<Self, RatingError> {
        if !value.is_finite() {
            return Err(RatingError::NotFinite);
        }

        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(RatingError::OutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }

        // Rounding a value inside [1, 5] to one decimal stays inside [1, 5].
        Ok(Self((value * 10.0).round() / 10.0))
    }

    /// Returns the rating value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(Rating::new(1.0).is_ok());
        assert!(Rating::new(5.0).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            Rating::new(0.99),
            Err(RatingError::OutOfRange { .. })
        ));
        assert!(matches!(
            Rating::new(5.000_1),
            Err(RatingError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_not_finite() {
        assert_eq!(Rating::new(f64::NAN), Err(RatingError::NotFinite));
        assert_eq!(Rating::new(f64::INFINITY), Err(RatingError::NotFinite));
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        assert!((Rating::new(3.449).unwrap().value() - 3.4).abs() < f64::EPSILON);
        assert!((Rating::new(4.95).unwrap().value() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_display() {
        assert_eq!(Rating::new(2.0).unwrap().to_string(), "2.0");
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Rating::new(3.5).unwrap()).unwrap();
        assert_eq!(json, "3.5");
    }
}
