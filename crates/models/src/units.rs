use crate::{codec::Decoded, error::FieldError};
use serde::Serialize;
use std::str::FromStr;

const UNIT_PATTERN: &str = "units such as 4, 4.0 or 4.5";
const RANGE_PATTERN: &str = "a unit range such as 4.0 or 4.0-8.0";
const COMPOUND_PATTERN: &str = "units such as 4.0, 4.0-8.0 or 4.0-8.0, 12.0";

/// Parses a single unit figure: one or two digits, optionally followed by `.0` or `.5`
pub fn parse_unit(raw: &str) -> Decoded<f32> {
    let malformed = || FieldError::new("units", UNIT_PATTERN, raw);

    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
    let whole_ok = (1..=2).contains(&whole.len()) && whole.bytes().all(|b| b.is_ascii_digit());
    if !whole_ok || !matches!(fraction, "" | "0" | "5") {
        return Err(malformed());
    }

    let whole = whole.parse::<f32>().map_err(|_| malformed())?;
    Ok(if fraction == "5" { whole + 0.5 } else { whole })
}

/// Represents the number of units a course or section is worth
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitRange {
    /// The lower bound
    pub min: f32,
    /// The upper bound, when the offering spans a range
    pub max: Option<f32>,
    /// A separate total that exceeds the upper bound
    pub total: Option<f32>,
}

impl UnitRange {
    /// Builds a range, restoring `min <= max <= total` and dropping a total
    /// that does not exceed the upper bound
    pub fn new(a: f32, b: Option<f32>, total: Option<f32>) -> Self {
        let (min, max) = match b {
            Some(b) => (a.min(b), Some(a.max(b))),
            None => (a, None),
        };
        let upper = max.unwrap_or(min);

        Self {
            min,
            max,
            total: total.filter(|&t| t > upper),
        }
    }

    /// Parses a plain `low` or `low-high` range, as used on sections
    pub fn parse_range(raw: &str) -> Decoded<Self> {
        let relabel = |e: FieldError| FieldError {
            expected: RANGE_PATTERN,
            found: raw.to_owned(),
            ..e
        };

        match raw.split('-').collect::<Vec<_>>().as_slice() {
            [low] => Ok(Self::new(parse_unit(low).map_err(relabel)?, None, None)),
            [low, high] => Ok(Self::new(
                parse_unit(low).map_err(relabel)?,
                Some(parse_unit(high).map_err(relabel)?),
                None,
            )),
            _ => Err(FieldError::new("units", RANGE_PATTERN, raw)),
        }
    }
}

impl FromStr for UnitRange {
    type Err = FieldError;

    /// Parses the compound course form `range[, total]`
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let relabel = |e: FieldError| FieldError {
            expected: COMPOUND_PATTERN,
            found: raw.to_owned(),
            ..e
        };

        match raw.split(", ").collect::<Vec<_>>().as_slice() {
            [range] => Self::parse_range(range).map_err(relabel),
            [range, total] => {
                let range = Self::parse_range(range).map_err(relabel)?;
                // A stated total of zero means the catalog has no total
                let total = Some(parse_unit(total).map_err(relabel)?).filter(|&t| t != 0.0);
                Ok(Self::new(range.min, range.max, total))
            }
            _ => Err(FieldError::new("units", COMPOUND_PATTERN, raw)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_parse_units(input: &str, expected: UnitRange) {
        let result = UnitRange::from_str(input);
        assert!(
            result.is_ok(),
            "Failed to parse '{}': {:?}",
            input,
            result.err()
        );
        assert_eq!(result.unwrap(), expected);
    }

    fn range(min: f32, max: Option<f32>, total: Option<f32>) -> UnitRange {
        UnitRange { min, max, total }
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!(parse_unit("4").unwrap(), 4.0);
        assert_eq!(parse_unit("4.").unwrap(), 4.0);
        assert_eq!(parse_unit("4.0").unwrap(), 4.0);
        assert_eq!(parse_unit("12.5").unwrap(), 12.5);
    }

    #[test]
    fn test_parse_unit_errors() {
        for raw in ["", ".5", "4.2", "4.50", "123.0", "four", "-1"] {
            assert!(parse_unit(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn test_parse_single_and_range() {
        test_parse_units("4.0", range(4.0, None, None));
        test_parse_units("4.0-8.0", range(4.0, Some(8.0), None));
        test_parse_units("1-12", range(1.0, Some(12.0), None));
    }

    #[test]
    fn test_total_equal_to_max_is_dropped() {
        test_parse_units("4.0-8.0, 8.0", range(4.0, Some(8.0), None));
    }

    #[test]
    fn test_total_exceeding_max_is_kept() {
        test_parse_units("4.0-8.0, 12.0", range(4.0, Some(8.0), Some(12.0)));
        test_parse_units("2.0, 8.0", range(2.0, None, Some(8.0)));
    }

    #[test]
    fn test_total_below_range_is_dropped() {
        test_parse_units("4.0-8.0, 6.0", range(4.0, Some(8.0), None));
    }

    #[test]
    fn test_zero_total_is_absent() {
        test_parse_units("4.0, 0.0", range(4.0, None, None));
    }

    #[test]
    fn test_reversed_range_is_reordered() {
        test_parse_units("8.0-4.0", range(4.0, Some(8.0), None));
    }

    #[test]
    fn test_invariant_holds() {
        for raw in ["4.0-8.0, 12.0", "8.0-2.0, 4.0", "3.5", "0-99, 99"] {
            if let Ok(u) = UnitRange::from_str(raw) {
                let max = u.max.unwrap_or(u.min);
                assert!(u.min <= max, "{raw}");
                assert!(u.total.is_none_or(|t| t > max), "{raw}");
            }
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(UnitRange::from_str("").is_err());
        assert!(UnitRange::from_str("4.0-8.0-12.0").is_err());
        assert!(UnitRange::from_str("4.0,8.0").is_err());
        assert!(UnitRange::from_str("4.0, 8.0, 12.0").is_err());

        let err = UnitRange::from_str("VAR").unwrap_err();
        assert_eq!(err.found, "VAR");
        assert_eq!(err.expected, COMPOUND_PATTERN);
    }

    #[test]
    fn test_section_ranges_reject_totals() {
        assert!(UnitRange::parse_range("4.0, 8.0").is_err());
        assert_eq!(
            UnitRange::parse_range("2.0-4.0").unwrap(),
            range(2.0, Some(4.0), None)
        );
    }
}
