//! Price type for catalog products and variants.
//!
//! The hosted store keeps prices in a numeric column. In memory they are held
//! as integer cents so comparisons and defaults stay exact.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A price in minor currency units (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Price {
    /// Amount in cents.
    pub cents: i64,
}

impl Price {
    /// Create a price from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Create a price from a decimal amount.
    ///
    /// ```
    /// use catalog_core::Price;
    /// let price = Price::from_decimal(49.99);
    /// assert_eq!(price.cents, 4999);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Self {
            cents: (amount * 100.0).round() as i64,
        }
    }

    /// Parse a price typed by a person or read from a spreadsheet cell.
    ///
    /// Accepts an optional leading currency symbol and thousands separators.
    /// Returns `None` for blank or non-numeric input.
    pub fn parse(input: &str) -> Option<Self> {
        let cleaned: String = input
            .trim()
            .trim_start_matches(['$', '€', '£'])
            .chars()
            .filter(|c| *c != ',')
            .collect();
        if cleaned.is_empty() {
            return None;
        }
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Self::from_decimal)
    }

    /// The amount as a decimal number.
    pub fn as_decimal(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Format with two decimal places.
    pub fn display(&self) -> String {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Numeric columns may come back as strings to preserve precision.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Price::from_decimal(n)),
            Raw::Text(s) => Price::parse(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid price: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal_rounds() {
        assert_eq!(Price::from_decimal(10.0).cents, 1000);
        assert_eq!(Price::from_decimal(0.1 + 0.2).cents, 30);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Price::parse("$1,299.50"), Some(Price::from_cents(129_950)));
        assert_eq!(Price::parse("  12 "), Some(Price::from_cents(1200)));
        assert_eq!(Price::parse(""), None);
        assert_eq!(Price::parse("free"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(1005).display(), "10.05");
        assert_eq!(Price::from_cents(-250).display(), "-2.50");
    }

    #[test]
    fn test_serde_numeric_and_text() {
        let p: Price = serde_json::from_str("19.99").unwrap();
        assert_eq!(p.cents, 1999);
        let p: Price = serde_json::from_str("\"7.5\"").unwrap();
        assert_eq!(p.cents, 750);
        assert_eq!(serde_json::to_string(&Price::from_cents(1000)).unwrap(), "10.0");
    }
}
