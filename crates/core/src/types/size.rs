//! Size labels.
//!
//! Sizes are free-text tokens chosen by the admin ("28".."46" for jeans,
//! "S".."XL" for tops). They are compared verbatim after trimming.

use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

/// Letter sizes in the order a size chart lists them.
const LETTER_SIZES: &[&str] = &["XXS", "XS", "S", "M", "L", "XL", "XXL", "XXXL"];

/// A trimmed, non-empty size token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SizeLabel(String);

/// Returned when a size token is blank.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("size cannot be empty")]
pub struct EmptySize;

impl SizeLabel {
    /// Parse a size token, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`EmptySize`] when nothing is left after trimming.
    pub fn parse(raw: &str) -> Result<Self, EmptySize> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmptySize);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The label as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Chart order: numeric sizes ascending, then letter sizes from XXS up,
    /// then anything else alphabetically.
    #[must_use]
    pub fn chart_cmp(&self, other: &Self) -> Ordering {
        self.chart_rank().cmp(&other.chart_rank())
    }

    fn chart_rank(&self) -> (u8, u32, &str) {
        if let Ok(n) = self.0.parse::<u32>() {
            return (0, n, "");
        }
        let upper = self.0.to_ascii_uppercase();
        if let Some(pos) = LETTER_SIZES.iter().position(|s| *s == upper) {
            return (1, u32::try_from(pos).unwrap_or(u32::MAX), "");
        }
        (2, 0, &self.0)
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SizeLabel {
    type Error = EmptySize;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SizeLabel> for String {
    fn from(size: SizeLabel) -> Self {
        size.0
    }
}

impl core::str::FromStr for SizeLabel {
    type Err = EmptySize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for SizeLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sorted(labels: &[&str]) -> Vec<String> {
        let mut sizes: Vec<SizeLabel> = labels.iter().map(|s| SizeLabel::parse(s).unwrap()).collect();
        sizes.sort_by(SizeLabel::chart_cmp);
        sizes.into_iter().map(String::from).collect()
    }

    #[test]
    fn numeric_sizes_sort_by_value() {
        assert_eq!(sorted(&["40", "28", "32", "100"]), ["28", "32", "40", "100"]);
    }

    #[test]
    fn letter_sizes_follow_chart() {
        assert_eq!(sorted(&["XL", "s", "M", "L"]), ["s", "M", "L", "XL"]);
    }

    #[test]
    fn numbers_before_letters_before_other() {
        assert_eq!(sorted(&["unico", "M", "30"]), ["30", "M", "unico"]);
    }

    #[test]
    fn blank_is_rejected() {
        assert_eq!(SizeLabel::parse("   "), Err(EmptySize));
        assert!(serde_json::from_str::<SizeLabel>("\"\"").is_err());
    }

    #[test]
    fn trims_input() {
        assert_eq!(SizeLabel::parse(" 32 ").unwrap().as_str(), "32");
    }
}
