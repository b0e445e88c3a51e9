//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! In floating point:
//!   0.1 + 0.2 = 0.30000000000000004   WRONG
//!
//! Our solution: integer cents
//!   10 + 20 = 30 cents                EXACT
//! ```
//!
//! Every monetary value in the system is an `i64` count of the smallest
//! currency unit. The database stores cents, the arithmetic is integer
//! arithmetic, and only the wire format renders two decimal places.
//!
//! ## Wire Format
//! `Money` serializes to a 2-decimal string (`"75.00"`) and deserializes
//! from either a decimal string or a JSON number. Values with more than
//! two fraction digits are rejected rather than silently rounded, so
//! amounts round-trip exactly.
//!
//! ## Usage
//! ```rust
//! use klinika_core::money::Money;
//!
//! let price = Money::from_cents(2500); // 25.00
//! let line = price * 3;
//! assert_eq!(line.cents(), 7500);
//! assert_eq!(line.to_string(), "75.00");
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: change calculations subtract before clamping
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Custom serde**: 2-decimal wire representation, exact round-trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

/// Error produced when a decimal string or number is not a valid amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseMoneyError {
    /// Not a decimal number at all.
    #[error("invalid monetary amount: {0:?}")]
    Invalid(String),

    /// More than two fraction digits; would not round-trip.
    #[error("amount {0:?} has sub-cent precision")]
    SubCentPrecision(String),
}

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is less than zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity (line totals).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Clamps negative amounts to zero.
    ///
    /// Used for change calculations: `change = (paid - total).clamp_zero()`.
    #[inline]
    pub const fn clamp_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Parses a decimal string with at most two fraction digits.
    ///
    /// ## Example
    /// ```rust
    /// use klinika_core::money::Money;
    ///
    /// assert_eq!("25.00".parse::<Money>().unwrap().cents(), 2500);
    /// assert_eq!("25.5".parse::<Money>().unwrap().cents(), 2550);
    /// assert_eq!("25".parse::<Money>().unwrap().cents(), 2500);
    /// assert!("25.999".parse::<Money>().is_err());
    /// ```
    pub fn from_decimal_str(s: &str) -> Result<Self, ParseMoneyError> {
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(ParseMoneyError::Invalid(s.to_string()));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseMoneyError::Invalid(s.to_string()));
        }
        if frac.len() > 2 {
            return Err(ParseMoneyError::SubCentPrecision(s.to_string()));
        }

        let whole_part: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| ParseMoneyError::Invalid(s.to_string()))?
        };

        // "5" -> 50, "50" -> 50, "" -> 0
        let frac_part: i64 = if frac.is_empty() {
            0
        } else {
            let parsed: i64 = frac
                .parse()
                .map_err(|_| ParseMoneyError::Invalid(s.to_string()))?;
            if frac.len() == 1 {
                parsed * 10
            } else {
                parsed
            }
        };

        let cents = whole_part * 100 + frac_part;
        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Converts a float amount (currency units) to Money.
    ///
    /// Rejects values that do not land exactly on a cent, so JSON numbers
    /// like `10.999` fail instead of being rounded.
    pub fn from_f64(value: f64) -> Result<Self, ParseMoneyError> {
        if !value.is_finite() {
            return Err(ParseMoneyError::Invalid(value.to_string()));
        }
        let scaled = value * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 {
            return Err(ParseMoneyError::SubCentPrecision(value.to_string()));
        }
        Ok(Money(rounded as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the amount with exactly two fraction digits (`"75.00"`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_decimal_str(s)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Serde
// =============================================================================

/// Serializes as a 2-decimal string so amounts survive any JSON client.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Accepts `"75.00"`, `75`, or `75.0` and rejects sub-cent precision.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl<'de> Visitor<'de> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal amount with at most two fraction digits")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
                Money::from_decimal_str(v).map_err(E::custom)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                Money::from_f64(v).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                Ok(Money::from_cents(v * 100))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                Ok(Money::from_cents(v as i64 * 100))
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_and_display() {
        assert_eq!(Money::from_cents(2500).to_string(), "25.00");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse_decimal_str() {
        assert_eq!(Money::from_decimal_str("25.00").unwrap().cents(), 2500);
        assert_eq!(Money::from_decimal_str("25.5").unwrap().cents(), 2550);
        assert_eq!(Money::from_decimal_str("25").unwrap().cents(), 2500);
        assert_eq!(Money::from_decimal_str("0.07").unwrap().cents(), 7);
        assert_eq!(Money::from_decimal_str("-5.50").unwrap().cents(), -550);
        assert_eq!(Money::from_decimal_str(" 12.30 ").unwrap().cents(), 1230);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::from_decimal_str("").is_err());
        assert!(Money::from_decimal_str("abc").is_err());
        assert!(Money::from_decimal_str("1.2.3").is_err());
        assert!(Money::from_decimal_str("12,50").is_err());
    }

    #[test]
    fn test_parse_rejects_sub_cent_precision() {
        assert_eq!(
            Money::from_decimal_str("10.999"),
            Err(ParseMoneyError::SubCentPrecision("10.999".to_string()))
        );
    }

    #[test]
    fn test_display_parse_round_trip() {
        for cents in [0, 1, 99, 100, 2500, 123_456_789] {
            let money = Money::from_cents(cents);
            let parsed = Money::from_decimal_str(&money.to_string()).unwrap();
            assert_eq!(parsed, money);
        }
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Money::from_f64(80.0).unwrap().cents(), 8000);
        assert_eq!(Money::from_f64(25.5).unwrap().cents(), 2550);
        assert!(Money::from_f64(10.999).is_err());
        assert!(Money::from_f64(f64::NAN).is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!(a.multiply_quantity(4).cents(), 4000);

        let mut acc = Money::zero();
        acc += a;
        acc -= b;
        assert_eq!(acc.cents(), 500);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_clamp_zero() {
        assert_eq!(Money::from_cents(-300).clamp_zero().cents(), 0);
        assert_eq!(Money::from_cents(300).clamp_zero().cents(), 300);
    }

    #[test]
    fn test_json_round_trip() {
        let money = Money::from_cents(7500);
        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, "\"75.00\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, money);
    }

    #[test]
    fn test_json_accepts_numbers() {
        let from_int: Money = serde_json::from_str("80").unwrap();
        assert_eq!(from_int.cents(), 8000);

        let from_float: Money = serde_json::from_str("80.0").unwrap();
        assert_eq!(from_float.cents(), 8000);

        let too_precise: Result<Money, _> = serde_json::from_str("10.999");
        assert!(too_precise.is_err());
    }
}
