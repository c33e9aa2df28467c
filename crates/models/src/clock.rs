use crate::{
    codec::{Decoded, or_sentinel},
    error::FieldError,
};
use chrono::NaiveTime;

/// Literal the catalog uses for a meeting time that has not been scheduled
pub const TO_BE_ANNOUNCED: &str = "TBA";

const EXPECTED: &str = "H:MM or HH:MM on a 24-hour clock";

/// Parses a 24-hour `H:MM` / `HH:MM` clock reading
pub fn parse_clock(raw: &str) -> Decoded<NaiveTime> {
    let malformed = || FieldError::new("time", EXPECTED, raw);

    let (hour, minute) = raw.split_once(':').ok_or_else(malformed)?;
    let well_formed = (1..=2).contains(&hour.len())
        && minute.len() == 2
        && hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(malformed());
    }

    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| malformed())
}

/// Decodes a meeting time, mapping [`TO_BE_ANNOUNCED`] to no value
pub fn decode_time(raw: &str) -> Decoded<Option<NaiveTime>> {
    or_sentinel(TO_BE_ANNOUNCED, parse_clock)(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_clock() {
        let t = parse_clock("9:05").unwrap();
        assert_eq!((t.hour(), t.minute()), (9, 5));

        let t = parse_clock("23:59").unwrap();
        assert_eq!((t.hour(), t.minute()), (23, 59));

        let t = parse_clock("00:00").unwrap();
        assert_eq!((t.hour(), t.minute()), (0, 0));
    }

    #[test]
    fn test_parse_clock_out_of_range() {
        assert!(parse_clock("24:00").is_err());
        assert!(parse_clock("12:60").is_err());
        assert!(parse_clock("99:00").is_err());
    }

    #[test]
    fn test_parse_clock_malformed() {
        for raw in ["", "9", "9:5", "123:00", "9:005", "ab:cd", "9-30", " 9:30"] {
            let err = parse_clock(raw).unwrap_err();
            assert_eq!(err.field, "time", "{raw}");
        }
    }

    #[test]
    fn test_tba_is_not_a_failure() {
        assert_eq!(decode_time("TBA").unwrap(), None);
        assert!(decode_time("tba").is_err());
        assert!(decode_time("10:00").unwrap().is_some());
    }
}
