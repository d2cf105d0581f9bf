//! Common types used throughout cadiz.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CadizError;

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// An asset identifier, typically a ticker symbol like "AAPL".
pub type Symbol = String;

/// A factor family: an independent economic signal with its own metric set.
///
/// Ordering follows declaration order, which is also the order families are
/// visited when rank tables are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorFamily {
    /// Valuation metrics comparing fundamentals to price.
    Value,
    /// Price momentum and trend metrics.
    Momentum,
    /// Profitability and balance sheet strength.
    Quality,
    /// Revenue and earnings growth.
    Growth,
}

impl FactorFamily {
    /// All families, in canonical order.
    pub const ALL: [Self; 4] = [Self::Value, Self::Momentum, Self::Quality, Self::Growth];

    /// Human-readable description of the family.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Value => "Valuation metrics comparing fundamentals to price",
            Self::Momentum => "Trailing returns and moving-average trend ratios",
            Self::Quality => "Profitability, leverage and cash generation",
            Self::Growth => "Period-over-period revenue and earnings growth",
        }
    }

    /// Lowercase name, as used in configuration files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Momentum => "momentum",
            Self::Quality => "quality",
            Self::Growth => "growth",
        }
    }
}

impl fmt::Display for FactorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for FactorFamily {
    type Err = CadizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "value" => Ok(Self::Value),
            "momentum" => Ok(Self::Momentum),
            "quality" => Ok(Self::Quality),
            "growth" => Ok(Self::Growth),
            other => Err(CadizError::configuration(format!(
                "unknown factor family '{other}' (expected value, momentum, quality or growth)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_display_roundtrip() {
        for family in FactorFamily::ALL {
            let parsed: FactorFamily = family.to_string().parse().unwrap();
            assert_eq!(parsed, family);
        }
    }

    #[test]
    fn test_family_display_honors_width() {
        assert_eq!(format!("[{:<10}|]", FactorFamily::Value), "[value     |]");
        assert_eq!(format!("[{:>8}]", FactorFamily::Growth), "[  growth]");
    }

    #[test]
    fn test_family_parse_case_insensitive() {
        assert_eq!("Momentum".parse::<FactorFamily>().unwrap(), FactorFamily::Momentum);
        assert_eq!(" quality ".parse::<FactorFamily>().unwrap(), FactorFamily::Quality);
    }

    #[test]
    fn test_family_parse_unknown() {
        let err = "size".parse::<FactorFamily>().unwrap_err();
        assert!(matches!(err, CadizError::Configuration(_)));
    }

    #[test]
    fn test_family_serde_lowercase() {
        let json = serde_json::to_string(&FactorFamily::Value).unwrap();
        assert_eq!(json, "\"value\"");
        let family: FactorFamily = serde_json::from_str("\"growth\"").unwrap();
        assert_eq!(family, FactorFamily::Growth);
    }

    #[test]
    fn test_family_order() {
        assert!(FactorFamily::Value < FactorFamily::Momentum);
        assert!(FactorFamily::Quality < FactorFamily::Growth);
    }

    #[test]
    fn test_date_type() {
        use chrono::Datelike;
        let date: Date = Date::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(date.year(), 2024);
    }
}
