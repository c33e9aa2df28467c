use crate::{codec::digits, error::FieldError};
use serde::Serialize;
use std::{
    fmt::{Display as FmtDisplay, Formatter, Result as FmtResult},
    ops::Deref,
    str::FromStr,
};
use strum::{AsRefStr, EnumIter, EnumProperty, EnumString, IntoEnumIterator};

const TERM_CODE: &str = "a five-digit term code ending in 1, 2 or 3";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, EnumIter, AsRefStr, EnumProperty,
)]
pub enum Season {
    #[strum(serialize = "SP", props(session = "1"))]
    Spring,
    #[strum(serialize = "SU", props(session = "2"))]
    Summer,
    #[strum(serialize = "FA", props(session = "3"))]
    Fall,
}

impl Season {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// The session digit that ends a term code
    pub fn session_digit(&self) -> &'static str {
        self.get_str("session").unwrap_or_default()
    }

    pub fn from_session_digit(digit: &str) -> Option<Season> {
        Season::iter().find(|s| s.session_digit() == digit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Year(pub u16);

impl Deref for Year {
    type Target = u16;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FmtDisplay for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:02}", self.0 % 100)
    }
}

/// An academic term, e.g. Spring 2024
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Term {
    pub season: Season,
    pub year: Year,
}

impl Term {
    /// The five-digit code the catalog API addresses this term by
    pub fn code(&self) -> String {
        format!("{:04}{}", *self.year, self.season.session_digit())
    }
}

impl FromStr for Term {
    type Err = FieldError;

    /// Decodes a `YYYYS` term code
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let malformed = || FieldError::new("term", TERM_CODE, code);
        let code = digits("term", 5..=5)(code).map_err(|_| malformed())?;

        let (year, session) = code.split_at(4);
        let season = Season::from_session_digit(session).ok_or_else(malformed)?;
        let year = year.parse::<u16>().map_err(|_| malformed())?;

        Ok(Term {
            season,
            year: Year(year),
        })
    }
}

impl FmtDisplay for Term {
    /// Short display form used as the partition key, e.g. `SP24`
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}", self.season.as_str(), self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_as_str() {
        assert_eq!(Season::Spring.as_str(), "SP");
        assert_eq!(Season::Fall.as_str(), "FA");
    }

    #[test]
    fn test_season_from_str() {
        assert_eq!(Season::from_str("SU").unwrap(), Season::Summer);
        assert!(Season::from_str("WI").is_err());
    }

    #[test]
    fn test_season_session_digits() {
        for season in Season::iter() {
            let digit = season.session_digit();
            assert_eq!(Season::from_session_digit(digit), Some(season));
        }
        assert_eq!(Season::from_session_digit("4"), None);
    }

    #[test]
    fn test_year_display() {
        assert_eq!(Year(2024).to_string(), "24");
        assert_eq!(Year(2005).to_string(), "05");
    }

    #[test]
    fn test_term_from_code() {
        let term = Term::from_str("20241").unwrap();
        assert_eq!(term.season, Season::Spring);
        assert_eq!(term.year, Year(2024));
        assert_eq!(term.to_string(), "SP24");

        assert_eq!(Term::from_str("20232").unwrap().to_string(), "SU23");
        assert_eq!(Term::from_str("20233").unwrap().to_string(), "FA23");
    }

    #[test]
    fn test_term_code_round_trip() {
        for code in ["20241", "20232", "19993"] {
            assert_eq!(Term::from_str(code).unwrap().code(), code);
        }
    }

    #[test]
    fn test_term_errors() {
        for code in ["2024", "202410", "20244", "20240", "2024a", ""] {
            let err = Term::from_str(code).unwrap_err();
            assert_eq!(err.field, "term");
            assert_eq!(err.found, code);
        }
    }
}
