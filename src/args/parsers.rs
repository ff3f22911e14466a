use std::time::Duration;

use super::types::PositiveUsize;
use crate::error::{AppError, AppResult, ValidationError};

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MINUTE;
/// Fraction digits past this many cannot change a nanosecond count.
const MAX_FRACTION_DIGITS: usize = 18;

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}

pub(super) fn parse_destination(s: &str) -> AppResult<String> {
    let value = s.trim();
    if value.is_empty() {
        return Err(AppError::validation(ValidationError::DestinationEmpty));
    }
    Ok(value.to_owned())
}

/// Parses a run duration; zero is rejected.
pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    let duration = parse_duration_value(s)?;
    if duration.is_zero() {
        return Err(AppError::validation(ValidationError::DurationZero));
    }
    Ok(duration)
}

/// Parses a pacing delay; zero disables pacing.
pub(crate) fn parse_sleep_arg(s: &str) -> AppResult<Duration> {
    parse_duration_value(s)
}

/// Accepts one or more `<number><unit>` segments such as `1h30m`, `1.5s` or
/// `.25ms`, in the manner of Go's `time.ParseDuration`. Units are ns, us (or
/// µs), ms, s, m and h. A lone number without a unit means seconds.
pub(crate) fn parse_duration_value(s: &str) -> AppResult<Duration> {
    let value = s.trim();
    if value.is_empty() {
        return Err(AppError::validation(ValidationError::DurationEmpty));
    }
    let invalid = || {
        AppError::validation(ValidationError::InvalidDurationFormat {
            value: value.to_owned(),
        })
    };
    let overflow = || AppError::validation(ValidationError::DurationOverflow);

    let mut rest = value;
    let mut total_nanos: u128 = 0;
    while !rest.is_empty() {
        let (whole_part, after_whole) = split_digits(rest);
        let (fraction, after_number) = after_whole
            .strip_prefix('.')
            .map_or(("", after_whole), split_digits);
        if whole_part.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        let whole: u64 = if whole_part.is_empty() {
            0
        } else {
            whole_part.parse().map_err(|err| {
                AppError::validation(ValidationError::InvalidDurationNumber {
                    value: value.to_owned(),
                    source: err,
                })
            })?
        };

        let unit_len = after_number
            .find(|ch: char| ch.is_ascii_digit() || ch == '.')
            .unwrap_or(after_number.len());
        let (unit, next) = after_number.split_at(unit_len);
        if unit.is_empty() && (rest != value || !next.is_empty()) {
            return Err(invalid());
        }

        let segment =
            segment_nanos(whole, fraction, unit_nanos(unit)?).ok_or_else(overflow)?;
        total_nanos = total_nanos.checked_add(segment).ok_or_else(overflow)?;
        rest = next;
    }

    nanos_to_duration(total_nanos).ok_or_else(overflow)
}

fn split_digits(s: &str) -> (&str, &str) {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    s.split_at(len)
}

fn unit_nanos(unit: &str) -> AppResult<u64> {
    match unit {
        "ns" => Ok(1),
        "us" | "µs" => Ok(NANOS_PER_MICRO),
        "ms" => Ok(NANOS_PER_MILLI),
        "" | "s" => Ok(NANOS_PER_SECOND),
        "m" => Ok(NANOS_PER_MINUTE),
        "h" => Ok(NANOS_PER_HOUR),
        _ => Err(AppError::validation(ValidationError::InvalidDurationUnit {
            unit: unit.to_owned(),
        })),
    }
}

/// `whole.fraction` units in nanoseconds, truncating sub-nanosecond digits.
fn segment_nanos(whole: u64, fraction: &str, unit: u64) -> Option<u128> {
    let unit = u128::from(unit);
    let mut nanos = u128::from(whole).checked_mul(unit)?;

    let mut numerator: u128 = 0;
    let mut scale: u128 = 1;
    for digit in fraction.bytes().take(MAX_FRACTION_DIGITS) {
        numerator = numerator
            .checked_mul(10)?
            .checked_add(u128::from(digit.checked_sub(b'0')?))?;
        scale = scale.checked_mul(10)?;
    }
    if numerator > 0 {
        nanos = nanos.checked_add(numerator.checked_mul(unit)?.checked_div(scale)?)?;
    }
    Some(nanos)
}

fn nanos_to_duration(nanos: u128) -> Option<Duration> {
    let per_second = u128::from(NANOS_PER_SECOND);
    let secs = u64::try_from(nanos.checked_div(per_second)?).ok()?;
    let subsec = u32::try_from(nanos.checked_rem(per_second)?).ok()?;
    Some(Duration::new(secs, subsec))
}
