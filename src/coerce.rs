//! Conversion of a located node into a requested Rust representation.
//!
//! Every target has one function with a single exhaustive match over the
//! node kind. [`Located::Missing`] never matches a kind-specific arm: it is
//! `None` for the string and structural targets and a format error elsewhere.

use std::num::IntErrorKind;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};
use tracing::debug;

use crate::errors::{EndpointError, Result};
use crate::evaluator::{Located, NodeKind};

/// Largest epoch value read as seconds (9999-12-31T23:59:59Z). Anything with a
/// larger magnitude is read as milliseconds.
pub const EPOCH_SECONDS_BOUNDARY: i64 = 253_402_300_799;

fn format_error(target: &'static str, kind: NodeKind) -> EndpointError {
    debug!(target_type = target, %kind, "format conversion failed");
    EndpointError::FormatConversion { target, kind }
}

fn parse_error(target: &'static str, text: &str, reason: impl ToString) -> EndpointError {
    debug!(target_type = target, text, "parse failed");
    EndpointError::Parse {
        target,
        text: text.to_string(),
        reason: reason.to_string(),
    }
}

fn overflow_error(target: &'static str, value: impl ToString) -> EndpointError {
    let value = value.to_string();
    debug!(target_type = target, %value, "value out of range");
    EndpointError::Overflow { target, value }
}

/// Textual form of a scalar; `None` for null, arrays, objects and missing.
pub fn to_string(located: Located<'_>) -> Option<String> {
    match located {
        Located::Found(Value::String(s)) => Some(s.clone()),
        Located::Found(Value::Number(n)) => Some(decimal_text(n)),
        Located::Found(Value::Bool(b)) => Some(b.to_string()),
        Located::Found(Value::Null | Value::Array(_) | Value::Object(_)) | Located::Missing => None,
    }
}

/// Plain positional digits for a number: `1e21` is `1000000000000000000000`,
/// `1e-7` is `0.0000001`, `1e3` is `1000`.
pub fn decimal_text(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    expand_exponent(&n.to_string())
}

fn expand_exponent(text: &str) -> String {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (mantissa, exponent) = match body.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i64>().unwrap_or(0)),
        None => (body, 0),
    };
    let (whole, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{whole}{frac}");
    let point = whole.len() as i64 + exponent;

    let (int_digits, frac_digits) = if point <= 0 {
        (String::new(), "0".repeat(point.unsigned_abs() as usize) + &digits)
    } else if point as usize >= digits.len() {
        (digits.clone() + &"0".repeat(point as usize - digits.len()), String::new())
    } else {
        let (i, f) = digits.split_at(point as usize);
        (i.to_string(), f.to_string())
    };

    let int_digits = int_digits.trim_start_matches('0');
    let frac_digits = frac_digits.trim_end_matches('0');
    let int_digits = if int_digits.is_empty() { "0" } else { int_digits };

    let mut out = String::new();
    if negative && (int_digits != "0" || !frac_digits.is_empty()) {
        out.push('-');
    }
    out.push_str(int_digits);
    if !frac_digits.is_empty() {
        out.push('.');
        out.push_str(frac_digits);
    }
    out
}

pub fn to_bool(located: Located<'_>) -> Result<bool> {
    const TARGET: &str = "bool";
    match located {
        Located::Found(Value::String(s)) => {
            let t = s.trim();
            if t.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if t.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(parse_error(TARGET, s, "expected \"true\" or \"false\""))
            }
        }
        Located::Found(Value::Number(n)) => Ok(is_nonzero(n)),
        Located::Found(Value::Bool(b)) => Ok(*b),
        Located::Found(Value::Null | Value::Array(_) | Value::Object(_)) | Located::Missing => {
            Err(format_error(TARGET, located.kind()))
        }
    }
}

fn is_nonzero(n: &Number) -> bool {
    if let Some(i) = n.as_i64() {
        i != 0
    } else if let Some(u) = n.as_u64() {
        u != 0
    } else {
        n.as_f64().is_some_and(|f| f != 0.0)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Integer targets. Values are widened to `i128`, which holds every `u64`
/// and `i64`, and then narrowed with a range check.
pub trait Integer: sealed::Sealed + TryFrom<i128> + Copy {
    const TARGET: &'static str;
}

macro_rules! integer_targets {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}
            impl Integer for $t {
                const TARGET: &'static str = stringify!($t);
            }
        )*
    };
}

integer_targets!(u8, i8, i16, i32, i64, u16, u32, u64);

pub fn to_integer<T: Integer>(located: Located<'_>) -> Result<T> {
    let wide = match located {
        Located::Found(Value::String(s)) => parse_wide(s, T::TARGET)?,
        Located::Found(Value::Number(n)) => number_to_wide(n, T::TARGET)?,
        Located::Found(Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_))
        | Located::Missing => return Err(format_error(T::TARGET, located.kind())),
    };
    T::try_from(wide).map_err(|_| overflow_error(T::TARGET, wide))
}

fn parse_wide(text: &str, target: &'static str) -> Result<i128> {
    text.trim().parse::<i128>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => overflow_error(target, text.trim()),
        _ => parse_error(target, text, e),
    })
}

fn number_to_wide(n: &Number, target: &'static str) -> Result<i128> {
    if let Some(i) = n.as_i64() {
        return Ok(i128::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(i128::from(u));
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    if !f.is_finite() || f.fract() != 0.0 {
        // 1234.567 has no integer form at all
        return Err(format_error(target, NodeKind::Number));
    }
    if f < i128::MIN as f64 || f >= i128::MAX as f64 {
        return Err(overflow_error(target, n));
    }
    Ok(f as i128)
}

pub fn to_u8(located: Located<'_>) -> Result<u8> {
    to_integer(located)
}

pub fn to_i8(located: Located<'_>) -> Result<i8> {
    to_integer(located)
}

pub fn to_i16(located: Located<'_>) -> Result<i16> {
    to_integer(located)
}

pub fn to_i32(located: Located<'_>) -> Result<i32> {
    to_integer(located)
}

pub fn to_i64(located: Located<'_>) -> Result<i64> {
    to_integer(located)
}

pub fn to_u16(located: Located<'_>) -> Result<u16> {
    to_integer(located)
}

pub fn to_u32(located: Located<'_>) -> Result<u32> {
    to_integer(located)
}

pub fn to_u64(located: Located<'_>) -> Result<u64> {
    to_integer(located)
}

pub fn to_f64(located: Located<'_>) -> Result<f64> {
    const TARGET: &str = "f64";
    match located {
        Located::Found(Value::String(s)) => s.trim().parse::<f64>().map_err(|e| parse_error(TARGET, s, e)),
        Located::Found(Value::Number(n)) => n.as_f64().ok_or_else(|| overflow_error(TARGET, n)),
        Located::Found(Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_))
        | Located::Missing => Err(format_error(TARGET, located.kind())),
    }
}

pub fn to_f32(located: Located<'_>) -> Result<f32> {
    const TARGET: &str = "f32";
    match located {
        Located::Found(Value::String(s)) => s.trim().parse::<f32>().map_err(|e| parse_error(TARGET, s, e)),
        Located::Found(Value::Number(n)) => n
            .as_f64()
            .map(|f| f as f32)
            .ok_or_else(|| overflow_error(TARGET, n)),
        Located::Found(Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_))
        | Located::Missing => Err(format_error(TARGET, located.kind())),
    }
}

pub fn to_decimal(located: Located<'_>) -> Result<Decimal> {
    const TARGET: &str = "Decimal";
    match located {
        Located::Found(Value::String(s)) => {
            decimal_from_text(s.trim()).map_err(|e| parse_error(TARGET, s, e))
        }
        // serde_json already validated the text, so a failure here is range
        Located::Found(Value::Number(n)) => {
            decimal_at_max_scale(&decimal_text(n)).map_err(|_| overflow_error(TARGET, n))
        }
        Located::Found(Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_))
        | Located::Missing => Err(format_error(TARGET, located.kind())),
    }
}

const DECIMAL_MAX_SCALE: usize = 28;

/// Parse plain decimal text, rounding half away from zero at the 28th
/// fractional digit. Magnitudes below that scale become zero.
fn decimal_at_max_scale(plain: &str) -> std::result::Result<Decimal, rust_decimal::Error> {
    let (whole, frac) = plain.split_once('.').unwrap_or((plain, ""));
    if frac.len() <= DECIMAL_MAX_SCALE {
        return Decimal::from_str(plain);
    }
    let kept = Decimal::from_str(&format!("{whole}.{}", &frac[..DECIMAL_MAX_SCALE]))?;
    if frac.as_bytes()[DECIMAL_MAX_SCALE] < b'5' {
        return Ok(kept);
    }
    let ulp = Decimal::new(1, DECIMAL_MAX_SCALE as u32);
    let rounded = if plain.starts_with('-') {
        kept.checked_sub(ulp)
    } else {
        kept.checked_add(ulp)
    };
    rounded.ok_or(rust_decimal::Error::ExceedsMaximumPossibleValue)
}

fn decimal_from_text(text: &str) -> std::result::Result<Decimal, rust_decimal::Error> {
    Decimal::from_str(text).or_else(|e| {
        if text.contains(['e', 'E']) {
            Decimal::from_scientific(text)
        } else {
            Err(e)
        }
    })
}

pub fn to_array_length(located: Located<'_>) -> Result<usize> {
    match located {
        Located::Found(Value::Array(items)) => Ok(items.len()),
        Located::Found(
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null | Value::Object(_),
        )
        | Located::Missing => Err(format_error("array length", located.kind())),
    }
}

/// The nonzero `i64` reading of the node, if any. Conversion errors are
/// swallowed: they only mean the node has to be read as text instead.
fn epoch_value(located: Located<'_>) -> Option<i64> {
    match to_integer::<i64>(located) {
        Ok(0) => None,
        Ok(v) => Some(v),
        Err(e) => {
            debug!(error = %e, "no epoch integer, falling back to text");
            None
        }
    }
}

fn from_epoch(value: i64, target: &'static str) -> Result<DateTime<Utc>> {
    let seconds = if value.unsigned_abs() <= EPOCH_SECONDS_BOUNDARY.unsigned_abs() {
        value
    } else {
        value / 1000
    };
    DateTime::<Utc>::from_timestamp(seconds, 0).ok_or_else(|| overflow_error(target, value))
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_with_offset(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .ok()
}

fn parse_datetime_offset(text: &str, target: &'static str) -> Result<DateTime<FixedOffset>> {
    let t = text.trim();
    parse_with_offset(t)
        .or_else(|| parse_naive(t).map(|naive| naive.and_utc().fixed_offset()))
        .ok_or_else(|| parse_error(target, text, "unrecognized date/time format"))
}

/// Epoch seconds, epoch milliseconds, or calendar text. Offsets in the text
/// are normalized to UTC.
pub fn to_datetime(located: Located<'_>) -> Result<NaiveDateTime> {
    const TARGET: &str = "NaiveDateTime";
    if let Some(epoch) = epoch_value(located) {
        return from_epoch(epoch, TARGET).map(|dt| dt.naive_utc());
    }
    match located {
        Located::Found(Value::String(s)) => {
            let t = s.trim();
            parse_naive(t)
                .or_else(|| parse_with_offset(t).map(|dt| dt.naive_utc()))
                .ok_or_else(|| parse_error(TARGET, s, "unrecognized date/time format"))
        }
        Located::Found(
            Value::Number(_) | Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_),
        )
        | Located::Missing => Err(format_error(TARGET, located.kind())),
    }
}

/// Like [`to_datetime`] but keeps the offset; epoch values and naive text are UTC.
pub fn to_datetime_offset(located: Located<'_>) -> Result<DateTime<FixedOffset>> {
    const TARGET: &str = "DateTime<FixedOffset>";
    if let Some(epoch) = epoch_value(located) {
        return from_epoch(epoch, TARGET).map(|dt| dt.fixed_offset());
    }
    match located {
        Located::Found(Value::String(s)) => parse_datetime_offset(s, TARGET),
        Located::Found(
            Value::Number(_) | Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_),
        )
        | Located::Missing => Err(format_error(TARGET, located.kind())),
    }
}

/// Decode an object node into `T`. Any other kind yields `None`.
pub fn to_object<T: DeserializeOwned>(located: Located<'_>) -> Result<Option<T>> {
    let Located::Found(node) = located else {
        return Ok(None);
    };
    match node {
        Value::Object(_) => Ok(Some(T::deserialize(node)?)),
        Value::Array(_) | Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {
            Ok(None)
        }
    }
}

/// Decode every element of an array node into `T`. Any other kind yields `None`.
pub fn to_array<T: DeserializeOwned>(located: Located<'_>) -> Result<Option<Vec<T>>> {
    let Located::Found(node) = located else {
        return Ok(None);
    };
    match node {
        Value::Array(items) => {
            let decoded = items
                .iter()
                .map(|item| T::deserialize(item))
                .collect::<std::result::Result<Vec<T>, _>>()?;
            Ok(Some(decoded))
        }
        Value::Object(_) | Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {
            Ok(None)
        }
    }
}
