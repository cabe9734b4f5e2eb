//! Conversion of field text into column values

use std::borrow::Cow;
use std::num::IntErrorKind;

use tracing::trace;

use crate::config::CoercionPolicy;
use crate::error::{ParseError, Result};
use crate::model::{ColumnType, ColumnValues};

/// Why strict conversion refused a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Invalid,
    OutOfRange,
}

/// Appends converted values to column storage under one policy and keeps
/// count of lenient fallbacks.
#[derive(Debug)]
pub struct Coercer {
    policy: CoercionPolicy,
    fallbacks: usize,
}

impl Coercer {
    pub fn new(policy: CoercionPolicy) -> Self {
        Self {
            policy,
            fallbacks: 0,
        }
    }

    /// Numeric fields that were not clean numbers (lenient mode only)
    pub fn fallbacks(&self) -> usize {
        self.fallbacks
    }

    /// Convert `text` for a column of `column_type` and append it to `values`.
    /// `row` is the 0-based data row, used for error reporting.
    pub fn store(
        &mut self,
        values: &mut ColumnValues,
        column_type: ColumnType,
        text: Cow<'_, str>,
        row: usize,
        column: usize,
    ) -> Result<()> {
        match values {
            ColumnValues::Text(v) => v.push(text.into_owned()),
            ColumnValues::Float32(v) => v.push(self.float(&text, row, column)?),
            ColumnValues::Int32(v) => v.push(self.integer(&text, column_type, row, column)? as i32),
            ColumnValues::Int16(v) => v.push(self.integer(&text, column_type, row, column)? as i16),
            ColumnValues::Int8(v) => v.push(self.integer(&text, column_type, row, column)? as i8),
        }
        Ok(())
    }

    fn float(&mut self, text: &str, row: usize, column: usize) -> Result<f32> {
        match self.policy {
            CoercionPolicy::Lenient => {
                let (value, clean) = lenient_float(text);
                self.note(clean, text, ColumnType::Float32, row, column);
                Ok(value)
            }
            CoercionPolicy::Strict => strict_float(text)
                .map_err(|r| rejection_error(r, text, ColumnType::Float32, row, column)),
        }
    }

    /// The returned value is already wrapped (lenient) or range-checked
    /// (strict) for the column width; callers narrow it with `as`.
    fn integer(
        &mut self,
        text: &str,
        column_type: ColumnType,
        row: usize,
        column: usize,
    ) -> Result<i64> {
        let radix = if column_type == ColumnType::HexInt32 { 16 } else { 10 };
        match self.policy {
            CoercionPolicy::Lenient => {
                let (value, clean) = lenient_integer(text, radix);
                self.note(clean, text, column_type, row, column);
                Ok(value)
            }
            CoercionPolicy::Strict => {
                let checked = if radix == 16 {
                    strict_hex(text).map(i64::from)
                } else {
                    strict_integer(text, column_type)
                };
                checked.map_err(|r| rejection_error(r, text, column_type, row, column))
            }
        }
    }

    fn note(&mut self, clean: bool, text: &str, column_type: ColumnType, row: usize, column: usize) {
        if !clean {
            self.fallbacks += 1;
            trace!(row, column, %column_type, text, "lenient numeric fallback");
        }
    }
}

fn rejection_error(
    rejection: Rejection,
    text: &str,
    column_type: ColumnType,
    row: usize,
    column: usize,
) -> ParseError {
    let text = text.to_string();
    match rejection {
        Rejection::Invalid => ParseError::ValueParseFailure {
            row,
            column,
            text,
            column_type,
        },
        Rejection::OutOfRange => ParseError::ValueOutOfRange {
            row,
            column,
            text,
            column_type,
        },
    }
}

fn count_digits(bytes: &[u8], from: usize, radix: u32) -> usize {
    bytes.get(from..).map_or(0, |rest| {
        rest.iter()
            .take_while(|b| char::from(**b).is_digit(radix))
            .count()
    })
}

/// `atol`/`strtol` style: optional whitespace and sign, an optional `0x`
/// prefix for base 16, then the longest run of digits. Wraps on overflow.
/// The flag reports whether the whole text was consumed.
fn lenient_integer(text: &str, radix: u32) -> (i64, bool) {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let (negative, mut i) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };
    if radix == 16
        && bytes.get(i) == Some(&b'0')
        && matches!(bytes.get(i + 1), Some(b'x' | b'X'))
        && count_digits(bytes, i + 2, 16) > 0
    {
        i += 2;
    }
    let digits = count_digits(bytes, i, radix);
    let mut value: i64 = 0;
    for &b in &bytes[i..i + digits] {
        let digit = char::from(b).to_digit(radix).unwrap_or(0);
        value = value
            .wrapping_mul(i64::from(radix))
            .wrapping_add(i64::from(digit));
    }
    if negative {
        value = value.wrapping_neg();
    }
    let clean = digits > 0 && trimmed[i + digits..].trim().is_empty();
    (value, clean)
}

/// Longest prefix of `text` that reads as a decimal float literal
fn float_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut i = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    for word in ["infinity", "inf", "nan"] {
        let end = i + word.len();
        if bytes.len() >= end && bytes[i..end].eq_ignore_ascii_case(word.as_bytes()) {
            return &text[..end];
        }
    }

    let int_digits = count_digits(bytes, i, 10);
    i += int_digits;
    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        frac_digits = count_digits(bytes, i + 1, 10);
        if int_digits + frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return "";
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = count_digits(bytes, j, 10);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }
    &text[..i]
}

/// `atof` style: parse the longest float prefix, 0.0 when there is none
fn lenient_float(text: &str) -> (f32, bool) {
    let trimmed = text.trim_start();
    let prefix = float_prefix(trimmed);
    let value = prefix.parse::<f32>().unwrap_or(0.0);
    let clean = !prefix.is_empty() && trimmed[prefix.len()..].trim().is_empty();
    (value, clean)
}

fn strict_float(text: &str) -> Result<f32, Rejection> {
    let trimmed = text.trim();
    let value = trimmed.parse::<f32>().map_err(|_| Rejection::Invalid)?;
    if value.is_infinite() && !trimmed.to_ascii_lowercase().contains("inf") {
        return Err(Rejection::OutOfRange);
    }
    Ok(value)
}

fn integer_bounds(column_type: ColumnType) -> (i64, i64) {
    match column_type {
        ColumnType::Int16 => (i64::from(i16::MIN), i64::from(i16::MAX)),
        ColumnType::Int8 => (i64::from(i8::MIN), i64::from(i8::MAX)),
        _ => (i64::from(i32::MIN), i64::from(i32::MAX)),
    }
}

fn strict_integer(text: &str, column_type: ColumnType) -> Result<i64, Rejection> {
    let value = text.trim().parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Rejection::OutOfRange,
        _ => Rejection::Invalid,
    })?;
    let (min, max) = integer_bounds(column_type);
    if value < min || value > max {
        return Err(Rejection::OutOfRange);
    }
    Ok(value)
}

/// Accepts any value with a 32-bit representation: `-0x80000000` through
/// `0xFFFFFFFF`, the upper half reinterpreted as negative.
fn strict_hex(text: &str) -> Result<i32, Rejection> {
    let trimmed = text.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .unwrap_or(rest);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Rejection::Invalid);
    }
    let magnitude = u64::from_str_radix(digits, 16).map_err(|_| Rejection::OutOfRange)?;
    if negative {
        if magnitude > 0x8000_0000 {
            return Err(Rejection::OutOfRange);
        }
        Ok((magnitude as i64).wrapping_neg() as i32)
    } else {
        u32::try_from(magnitude)
            .map(|v| v as i32)
            .map_err(|_| Rejection::OutOfRange)
    }
}
