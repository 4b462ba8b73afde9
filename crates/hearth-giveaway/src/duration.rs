//! Giveaway duration parsing.

use crate::error::GiveawayError;
use std::time::Duration;

/// First code point of each run of ten decimal digits outside ASCII, for the
/// scripts the chat client renders digits in.
const DIGIT_ZEROS: &[u32] = &[
    0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66, 0x0CE6,
    0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946, 0x19D0,
    0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0, 0xA9F0,
    0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0, 0x112F0,
    0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50, 0x11DA0,
    0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

/// Mathematical digits: five styles of ten, back to back.
const MATH_DIGITS: std::ops::RangeInclusive<u32> = 0x1D7CE..=0x1D7FF;

/// Value of a decimal digit in any script, e.g. `'٥'` is 5.
fn decimal_value(ch: char) -> Option<u64> {
    if let Some(value) = ch.to_digit(10) {
        return Some(u64::from(value));
    }
    let code = u32::from(ch);
    if MATH_DIGITS.contains(&code) {
        return Some(u64::from((code - MATH_DIGITS.start()) % 10));
    }
    DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&code))
        .map(|zero| u64::from(code - zero))
}

fn unit_seconds(unit: char) -> Option<u64> {
    match unit.to_ascii_lowercase() {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(3_600),
        'd' => Some(86_400),
        'w' => Some(604_800),
        _ => None,
    }
}

/// Parses `<number><unit>` where unit is one of `s m h d w`
/// (case-insensitive). A bare number means minutes. Digits may come from
/// any script, so `٥m` is five minutes.
///
/// Zero, negative and fractional durations are rejected, as are amounts
/// that overflow.
pub fn parse_duration(input: &str) -> Result<Duration, GiveawayError> {
    let text = input.trim();
    let invalid = || GiveawayError::invalid_duration(input);

    let (digits, multiplier) = match text.chars().last() {
        Some(last) if decimal_value(last).is_some() => (text, 60),
        Some(last) => {
            let multiplier = unit_seconds(last).ok_or_else(invalid)?;
            (&text[..text.len() - last.len_utf8()], multiplier)
        }
        None => return Err(invalid()),
    };

    if digits.is_empty() {
        return Err(invalid());
    }

    let mut amount: u64 = 0;
    for ch in digits.chars() {
        let digit = decimal_value(ch).ok_or_else(invalid)?;
        amount = amount
            .checked_mul(10)
            .and_then(|amount| amount.checked_add(digit))
            .ok_or_else(invalid)?;
    }

    amount
        .checked_mul(multiplier)
        .map(Duration::from_secs)
        .filter(|duration| !duration.is_zero())
        .ok_or_else(invalid)
}
