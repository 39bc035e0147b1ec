//! Closed-or-open numeric ranges and their textual `"min..max"` form.
//!
//! Two concrete range kinds exist: [`IntRange`] over `i32` and [`FloatRange`]
//! over `f64`. Both parse the same surface grammar:
//!
//! ```text
//! "5"       exact value        min == max == 5
//! "3..10"   closed interval    3 <= v <= 10
//! "..10"    open below         v <= 10
//! "3.."     open above         v >= 3
//! ```
//!
//! `test` is inclusive on both bounds for both kinds. A range with neither
//! bound is the "any" range and matches everything.
//!
//! On any failure the cursor is rolled back to the entry offset and the error
//! is re-anchored there, so callers always report against the start of the
//! malformed range rather than a mid-token position.

use crate::error::{ParseError, ParseErrorKind};
use crate::reader::{Cursor, is_allowed_number};

const RANGE_SEPARATOR: &str = "..";

/// Read one bound's worth of number-shaped characters. Empty means the bound
/// is absent. A `.` that begins a `..` separator is never consumed.
fn read_bound_text<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    let input = cursor.input();
    let start = cursor.cursor();
    while let Some(c) = cursor.peek() {
        if !is_allowed_number(c) || (c == '.' && cursor.starts_with(RANGE_SEPARATOR)) {
            break;
        }
        cursor.skip();
    }
    let text = &input[start..cursor.cursor()];
    (!text.is_empty()).then_some(text)
}

/// Parse the `(lower, upper)` raw texts of a range, or `EmptyRange` if both
/// sides are absent.
fn read_bounds<'a>(cursor: &mut Cursor<'a>) -> Result<(Option<&'a str>, Option<&'a str>), ParseError> {
    let lower = read_bound_text(cursor);
    let upper = if cursor.starts_with(RANGE_SEPARATOR) {
        cursor.skip();
        cursor.skip();
        read_bound_text(cursor)
    } else {
        lower
    };
    if lower.is_none() && upper.is_none() {
        return Err(ParseError::at(ParseErrorKind::EmptyRange, cursor));
    }
    Ok((lower, upper))
}

/// A closed-or-open interval over `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FloatRange {
    min: Option<f64>,
    max: Option<f64>,
}

impl FloatRange {
    /// The unbounded range; matches every value.
    pub fn any() -> Self {
        FloatRange { min: None, max: None }
    }

    /// A range matching exactly `value`.
    pub fn exactly(value: f64) -> Self {
        FloatRange { min: Some(value), max: Some(value) }
    }

    /// A closed interval. Caller must uphold `min <= max`.
    pub fn between(min: f64, max: f64) -> Self {
        FloatRange { min: Some(min), max: Some(max) }
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// True when neither bound is present.
    pub fn is_any(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Inclusive containment test on both bounds.
    pub fn test(&self, value: f64) -> bool {
        if self.min.is_some_and(|min| value < min) {
            return false;
        }
        !self.max.is_some_and(|max| value > max)
    }

    fn create(cursor: &Cursor, min: Option<f64>, max: Option<f64>) -> Result<Self, ParseError> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ParseError::at(ParseErrorKind::SwappedRange, cursor));
            }
        }
        Ok(FloatRange { min, max })
    }

    /// Parse a float range from the cursor. See the module docs for the
    /// grammar and the rollback contract.
    pub fn parse(cursor: &mut Cursor) -> Result<Self, ParseError> {
        let entry = cursor.cursor();
        let result = (|| {
            let (lower, upper) = read_bounds(cursor)?;
            let min = lower.map(|t| parse_float(cursor, t)).transpose()?;
            let max = upper.map(|t| parse_float(cursor, t)).transpose()?;
            Self::create(cursor, min, max)
        })();
        result.map_err(|e| {
            cursor.set_cursor(entry);
            e.with_cursor(entry)
        })
    }
}

/// A closed-or-open interval over `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntRange {
    min: Option<i32>,
    max: Option<i32>,
}

impl IntRange {
    /// The unbounded range; matches every value.
    pub fn any() -> Self {
        IntRange { min: None, max: None }
    }

    /// A range matching exactly `value`.
    pub fn exactly(value: i32) -> Self {
        IntRange { min: Some(value), max: Some(value) }
    }

    /// A closed interval. Caller must uphold `min <= max`.
    pub fn between(min: i32, max: i32) -> Self {
        IntRange { min: Some(min), max: Some(max) }
    }

    pub fn min(&self) -> Option<i32> {
        self.min
    }

    pub fn max(&self) -> Option<i32> {
        self.max
    }

    /// True when neither bound is present.
    pub fn is_any(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Inclusive containment test on both bounds.
    pub fn test(&self, value: i32) -> bool {
        if self.min.is_some_and(|min| value < min) {
            return false;
        }
        !self.max.is_some_and(|max| value > max)
    }

    fn create(cursor: &Cursor, min: Option<i32>, max: Option<i32>) -> Result<Self, ParseError> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ParseError::at(ParseErrorKind::SwappedRange, cursor));
            }
        }
        Ok(IntRange { min, max })
    }

    /// Parse an int range from the cursor. See the module docs for the
    /// grammar and the rollback contract.
    pub fn parse(cursor: &mut Cursor) -> Result<Self, ParseError> {
        let entry = cursor.cursor();
        let result = (|| {
            let (lower, upper) = read_bounds(cursor)?;
            let min = lower.map(|t| parse_int(cursor, t)).transpose()?;
            let max = upper.map(|t| parse_int(cursor, t)).transpose()?;
            Self::create(cursor, min, max)
        })();
        result.map_err(|e| {
            cursor.set_cursor(entry);
            e.with_cursor(entry)
        })
    }
}

fn parse_float(cursor: &Cursor, text: &str) -> Result<f64, ParseError> {
    text.parse().map_err(|_| ParseError::at(ParseErrorKind::InvalidFloat(text.to_string()), cursor))
}

fn parse_int(cursor: &Cursor, text: &str) -> Result<i32, ParseError> {
    text.parse().map_err(|_| ParseError::at(ParseErrorKind::InvalidInt(text.to_string()), cursor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    fn int_range(text: &str) -> Result<IntRange, ParseError> {
        IntRange::parse(&mut Cursor::new(text))
    }

    fn float_range(text: &str) -> Result<FloatRange, ParseError> {
        FloatRange::parse(&mut Cursor::new(text))
    }

    #[test]
    fn single_value_is_exact_range() {
        let r = int_range("5").unwrap();
        assert_eq!(r.min(), Some(5));
        assert_eq!(r.max(), Some(5));
        assert!(r.test(5));
        assert!(!r.test(4));
        assert!(!r.test(6));
    }

    #[test]
    fn closed_range_is_inclusive_on_both_bounds() {
        let r = int_range("3..10").unwrap();
        assert!(r.test(3));
        assert!(r.test(10));
        assert!(!r.test(2));
        assert!(!r.test(11));

        let f = float_range("0.5..2.5").unwrap();
        assert!(f.test(0.5));
        assert!(f.test(2.5));
        assert!(!f.test(0.49));
        assert!(!f.test(2.51));
    }

    #[test]
    fn open_ranges_leave_one_side_unbounded() {
        let below = float_range("..10").unwrap();
        assert_eq!(below.min(), None);
        assert!(below.test(-1000.0));
        assert!(below.test(10.0));
        assert!(!below.test(10.1));

        let above = int_range("3..").unwrap();
        assert_eq!(above.max(), None);
        assert!(above.test(3));
        assert!(above.test(i32::MAX));
        assert!(!above.test(2));
    }

    #[test]
    fn empty_input_fails_with_empty_range() {
        let err = int_range("").unwrap_err();
        assert_eq!(*err.kind(), ParseErrorKind::EmptyRange);
    }

    #[test]
    fn lone_separator_fails_with_empty_range() {
        let mut cursor = Cursor::new("..");
        let err = IntRange::parse(&mut cursor).unwrap_err();
        assert_eq!(*err.kind(), ParseErrorKind::EmptyRange);
        assert_eq!(cursor.cursor(), 0);
    }

    #[test]
    fn swapped_bounds_fail_and_restore_cursor() {
        let mut cursor = Cursor::new("10..3");
        let entry = cursor.cursor();
        let err = IntRange::parse(&mut cursor).unwrap_err();
        assert_eq!(*err.kind(), ParseErrorKind::SwappedRange);
        assert_eq!(cursor.cursor(), entry);
        assert_eq!(err.cursor(), entry);

        let err = float_range("2.5..0.5").unwrap_err();
        assert_eq!(*err.kind(), ParseErrorKind::SwappedRange);
    }

    #[test]
    fn negative_bounds_parse() {
        let r = int_range("-10..-3").unwrap();
        assert!(r.test(-10));
        assert!(r.test(-3));
        assert!(!r.test(-2));
    }

    #[test]
    fn parse_stops_at_foreign_characters() {
        let mut cursor = Cursor::new("1..2]");
        let r = IntRange::parse(&mut cursor).unwrap();
        assert_eq!(r.min(), Some(1));
        assert_eq!(r.max(), Some(2));
        assert_eq!(cursor.peek(), Some(']'));
    }

    #[test]
    fn malformed_bound_restores_cursor() {
        let mut cursor = Cursor::new("1.5..2");
        let err = IntRange::parse(&mut cursor).unwrap_err();
        assert_eq!(*err.kind(), ParseErrorKind::InvalidInt("1.5".to_string()));
        assert_eq!(cursor.cursor(), 0);
        assert_eq!(err.cursor(), 0);
    }

    #[test]
    fn any_range_matches_everything() {
        assert!(IntRange::any().is_any());
        assert!(IntRange::any().test(i32::MIN));
        assert!(FloatRange::any().test(f64::NEG_INFINITY));
        assert!(!IntRange::exactly(7).is_any());
    }

    #[test]
    fn factories_round_trip_with_parse() {
        assert_eq!(int_range("5").unwrap(), IntRange::exactly(5));
        assert_eq!(int_range("3..10").unwrap(), IntRange::between(3, 10));
        assert_eq!(float_range("1.5..2").unwrap(), FloatRange::between(1.5, 2.0));
    }
}
