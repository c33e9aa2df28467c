use std::borrow::Cow;
use thiserror::Error;

/// A leaf value did not match the pattern its codec expects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed field `{field}`: expected {expected}, found {found:?}")]
pub struct FieldError {
    /// Name of the field being decoded
    pub field: Cow<'static, str>,
    /// Human-readable description of the accepted pattern
    pub expected: &'static str,
    /// The offending input
    pub found: String,
}

impl FieldError {
    pub fn new(field: &'static str, expected: &'static str, found: impl Into<String>) -> Self {
        Self {
            field: Cow::Borrowed(field),
            expected,
            found: found.into(),
        }
    }

    /// Re-labels the error with the wire field it was read from
    pub fn in_field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.field = field.into();
        self
    }
}

/// A record does not have the structure the pipeline relies on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("required field `{0}` is missing")]
    MissingField(String),

    #[error("field `{field}` should be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("section {section}: meeting arrays differ in length (day {days}, start {starts}, end {ends}, location {locations})")]
    MismatchedMeetings {
        section: String,
        days: usize,
        starts: usize,
        ends: usize,
        locations: usize,
    },

    #[error("section {section}: {taken} seats taken out of {total}")]
    SeatCount {
        section: String,
        taken: u32,
        total: u32,
    },
}
