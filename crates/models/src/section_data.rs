use crate::{
    codec::{Decoded, digits, one_of, upper_letters},
    error::FieldError,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use strum::{EnumIter, EnumProperty, IntoEnumIterator};

lazy_static! {
    static ref SUFFIX: Regex = Regex::new(r"^[gmwxLp]{1,6}$").unwrap();
}

/// Type of section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumProperty, EnumIter)]
pub enum SectionKind {
    #[strum(props(wire = "Lec", stored = "lec"))]
    Lecture,
    #[strum(props(wire = "Dis", stored = "dis"))]
    Discussion,
    #[strum(props(wire = "Lab", stored = "lab"))]
    Lab,
    #[strum(props(wire = "Qz", stored = "quiz"))]
    Quiz,
    #[strum(props(wire = "Lec-Dis", stored = "lec_dis"))]
    LectureDiscussion,
    #[strum(props(wire = "Lec-Lab", stored = "lec_lab"))]
    LectureLab,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        self.get_str("stored").unwrap_or_default()
    }
}

impl FromStr for SectionKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|v| v.get_str("wire") == Some(s))
            .ok_or_else(|| FieldError::new("type", "Lec, Dis, Lab, Qz, Lec-Dis or Lec-Lab", s))
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a section is a regular offering or a discussion-only one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DClass {
    Regular,
    Discussion,
}

impl DClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "r",
            Self::Discussion => "d",
        }
    }
}

impl FromStr for DClass {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const CLASSES: &[(&str, DClass)] = &[("R", DClass::Regular), ("D", DClass::Discussion)];
        one_of("dclass_code", "R or D", CLASSES)(s)
    }
}

/// Decodes a `Y`/`N` flag
pub fn decode_flag(raw: &str) -> Decoded<bool> {
    const FLAGS: &[(&str, bool)] = &[("Y", true), ("N", false)];
    one_of("flag", "Y or N", FLAGS)(raw)
}

/// Five-digit section code, unique within a term
pub fn decode_section_id(raw: &str) -> Decoded<String> {
    digits("section id", 5..=5)(raw)
}

/// Three-digit session code
pub fn decode_session(raw: &str) -> Decoded<String> {
    digits("session", 3..=3)(raw)
}

/// Department code: two to four uppercase letters
pub fn decode_dept_code(raw: &str) -> Decoded<String> {
    upper_letters("department code", 2..=4)(raw)
}

/// Three-digit course number
pub fn decode_course_number(raw: &str) -> Decoded<String> {
    digits("number", 3..=3)(raw)
}

/// One-letter course sequence
pub fn decode_sequence(raw: &str) -> Decoded<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c),
        _ => Err(FieldError::new("sequence", "a single letter", raw)),
    }
}

/// Meeting location, at most fifty characters
pub fn decode_location(raw: &str) -> Decoded<String> {
    if raw.chars().count() <= 50 {
        Ok(raw.to_owned())
    } else {
        Err(FieldError::new("location", "at most 50 characters", raw))
    }
}

/// Course suffix made of the catalog's modifier letters
pub fn decode_suffix(raw: &str) -> Decoded<String> {
    if SUFFIX.is_match(raw) {
        Ok(raw.to_owned())
    } else {
        Err(FieldError::new("suffix", "up to six of the letters gmwxLp", raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_kind_from_str() {
        assert_eq!(SectionKind::from_str("Lec").unwrap(), SectionKind::Lecture);
        assert_eq!(SectionKind::from_str("Qz").unwrap(), SectionKind::Quiz);
        assert_eq!(
            SectionKind::from_str("Lec-Lab").unwrap(),
            SectionKind::LectureLab
        );
        assert!(SectionKind::from_str("Sem").is_err());
        assert!(SectionKind::from_str("lec").is_err());
    }

    #[test]
    fn test_section_kind_display() {
        assert_eq!(SectionKind::Quiz.to_string(), "quiz");
        assert_eq!(SectionKind::LectureDiscussion.to_string(), "lec_dis");
        assert_eq!(SectionKind::Lab.as_str(), "lab");
    }

    #[test]
    fn test_dclass() {
        assert_eq!(DClass::from_str("R").unwrap().as_str(), "r");
        assert_eq!(DClass::from_str("D").unwrap().as_str(), "d");
        assert!(DClass::from_str("r").is_err());
    }

    #[test]
    fn test_flags() {
        assert!(decode_flag("Y").unwrap());
        assert!(!decode_flag("N").unwrap());
        assert!(decode_flag("yes").is_err());
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(decode_section_id("29901").unwrap(), "29901");
        assert!(decode_section_id("2990").is_err());
        assert_eq!(decode_session("001").unwrap(), "001");
        assert!(decode_session("1").is_err());
        assert_eq!(decode_dept_code("CSCI").unwrap(), "CSCI");
        assert!(decode_dept_code("CSCIE").is_err());
        assert_eq!(decode_course_number("103").unwrap(), "103");
        assert!(decode_course_number("1030").is_err());
    }

    #[test]
    fn test_location_length() {
        assert_eq!(decode_location("SGM101").unwrap(), "SGM101");
        assert!(decode_location(&"A".repeat(50)).is_ok());

        let err = decode_location(&"A".repeat(51)).unwrap_err();
        assert_eq!(err.field, "location");
    }

    #[test]
    fn test_sequence_and_suffix() {
        assert_eq!(decode_sequence("L").unwrap(), 'L');
        assert!(decode_sequence("").is_err());
        assert!(decode_sequence("LL").is_err());
        assert_eq!(decode_sequence("l").unwrap(), 'l');
        assert!(decode_sequence("1").is_err());

        assert_eq!(decode_suffix("gp").unwrap(), "gp");
        assert!(decode_suffix("gpq").is_err());
        assert!(decode_suffix("gmwxLpg").is_err());
    }
}
