use crate::error::FieldError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

lazy_static! {
    static ref COURSE_ID: Regex = Regex::new(r"^([A-Z]{2,4})-([0-9]{3})([A-Za-z]?)$").unwrap();
}

const EXPECTED: &str = "PREFIX-NNN with an optional trailing letter, e.g. CSCI-103L";

/// Identifies a course within a term, e.g. `CSCI-103L`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CourseId {
    /// Department prefix (2-4 uppercase letters)
    pub prefix: String,
    /// Three-digit course number
    pub number: String,
    /// Optional one-letter sequence
    pub sequence: Option<char>,
}

impl CourseId {
    /// Builds an id from its parts, validating each one
    pub fn new(prefix: &str, number: &str, sequence: Option<char>) -> Result<Self, FieldError> {
        let mut canonical = format!("{prefix}-{number}");
        canonical.extend(sequence);
        canonical.parse()
    }
}

impl FromStr for CourseId {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = COURSE_ID
            .captures(s)
            .ok_or_else(|| FieldError::new("course id", EXPECTED, s))?;

        Ok(Self {
            prefix: caps[1].to_owned(),
            number: caps[2].to_owned(),
            sequence: caps[3].chars().next(),
        })
    }
}

impl Display for CourseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}-{}", self.prefix, self.number)?;
        if let Some(sequence) = self.sequence {
            write!(f, "{sequence}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_course_id() {
        let id = CourseId::from_str("CSCI-103L").unwrap();
        assert_eq!(id.prefix, "CSCI");
        assert_eq!(id.number, "103");
        assert_eq!(id.sequence, Some('L'));

        let id = CourseId::from_str("EE-109").unwrap();
        assert_eq!(id.prefix, "EE");
        assert_eq!(id.sequence, None);
    }

    #[test]
    fn test_parse_errors() {
        for raw in [
            "CSCI103",
            "C-103",
            "CSCIX-103",
            "CSCI-10",
            "CSCI-1034",
            "CSCI-103LL",
            "csci-103",
            "CSCI-103-",
        ] {
            let err = CourseId::from_str(raw).unwrap_err();
            assert_eq!(err.field, "course id", "{raw}");
        }
    }

    #[test]
    fn test_lowercase_sequence() {
        let id = CourseId::from_str("CSCI-103l").unwrap();
        assert_eq!(id.sequence, Some('l'));
        assert_eq!(id.to_string(), "CSCI-103l");

        let sequence = crate::section_data::decode_sequence("l").unwrap();
        assert_eq!(CourseId::new("CSCI", "103", Some(sequence)).unwrap(), id);
    }

    #[test]
    fn test_round_trip() {
        let prefixes = ["EE", "ITP", "CSCI"];
        let numbers = ["000", "103", "999"];
        let sequences = [None, Some('A'), Some('L'), Some('Z')];

        for prefix in prefixes {
            for number in numbers {
                for sequence in sequences {
                    let id = CourseId::new(prefix, number, sequence).unwrap();
                    assert_eq!(id.prefix, prefix);
                    assert_eq!(id.number, number);
                    assert_eq!(id.sequence, sequence);
                    assert_eq!(CourseId::from_str(&id.to_string()).unwrap(), id);
                }
            }
        }
    }

    #[test]
    fn test_new_rejects_bad_parts() {
        assert!(CourseId::new("CSCI", "10", None).is_err());
        assert!(CourseId::new("CSCI", "103", Some('1')).is_err());
    }
}
