//! Unit conversion from the encodings Illumos tools print to canonical numbers.
//!
//! Pure functions. Sizes become bytes, percentages integers, dedup ratios
//! floats and state names ordinals. [`Conversion`] names one of them so a
//! collector can declare, per field, which rule applies.

use crate::error::ConvertError;
use crate::model::{Number, TypedValue};

/// Ordinal returned by [`enum_to_ordinal`] for a state it does not know.
/// Never a valid position.
pub const UNKNOWN_ORDINAL: u32 = 99;

/// Pool health states in `zpool list` order of severity.
pub const ZPOOL_HEALTH: &[&str] = &["ONLINE", "DEGRADED", "SUSPENDED", "UNAVAIL", "FAULTED"];

/// Converts a page count to bytes. Saturates instead of wrapping.
pub fn pages_to_bytes(count: u64, page_size: u64) -> u64 {
    count.saturating_mul(page_size)
}

/// Parses `NNNk` kilobytes, as printed by `swap -s`, into bytes.
pub fn k_suffix_to_bytes(text: &str) -> Result<u64, ConvertError> {
    let text = text.trim();
    let digits = text
        .strip_suffix(['k', 'K'])
        .ok_or_else(|| ConvertError::MissingSuffix {
            text: text.to_string(),
            suffix: 'k',
        })?;
    let kb: u64 = digits.parse().map_err(|_| ConvertError::InvalidNumber {
        text: text.to_string(),
    })?;
    kb.checked_mul(1024).ok_or_else(|| ConvertError::InvalidNumber {
        text: text.to_string(),
    })
}

/// Parses `NN%` into an integer.
pub fn percent_suffix_to_int(text: &str) -> Result<i64, ConvertError> {
    let text = text.trim();
    let digits = text
        .strip_suffix('%')
        .ok_or_else(|| ConvertError::MissingSuffix {
            text: text.to_string(),
            suffix: '%',
        })?;
    digits.parse().map_err(|_| ConvertError::InvalidNumber {
        text: text.to_string(),
    })
}

/// Parses an `N.NNx` multiplier (dedup ratio) into a float.
pub fn multiplier_suffix_to_float(text: &str) -> Result<f64, ConvertError> {
    let text = text.trim();
    let digits = text
        .strip_suffix('x')
        .ok_or_else(|| ConvertError::MissingSuffix {
            text: text.to_string(),
            suffix: 'x',
        })?;
    parse_float(digits, text)
}

/// Parses a human-readable size (`959G`, `3.62T`, `2.3k`, `512`) into bytes.
///
/// Suffixes are 1024-based and case-insensitive; a bare number is bytes.
pub fn size_suffix_to_bytes(text: &str) -> Result<f64, ConvertError> {
    let text = text.trim();
    let Some(last) = text.chars().last() else {
        return Err(ConvertError::InvalidNumber {
            text: text.to_string(),
        });
    };

    if last.is_ascii_digit() || last == '.' {
        return parse_float(text, text);
    }

    let exponent = match last.to_ascii_uppercase() {
        'B' => 0,
        'K' => 1,
        'M' => 2,
        'G' => 3,
        'T' => 4,
        'P' => 5,
        'E' => 6,
        _ => {
            return Err(ConvertError::UnknownSuffix {
                text: text.to_string(),
            });
        }
    };

    let value = parse_float(&text[..text.len() - last.len_utf8()], text)?;
    Ok(value * 1024f64.powi(exponent))
}

/// Maps a state name to its position in `states`, or [`UNKNOWN_ORDINAL`].
pub fn enum_to_ordinal(text: &str, states: &[&str]) -> u32 {
    states
        .iter()
        .position(|s| *s == text)
        .and_then(|i| u32::try_from(i).ok())
        .unwrap_or(UNKNOWN_ORDINAL)
}

fn parse_float(digits: &str, original: &str) -> Result<f64, ConvertError> {
    digits
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConvertError::InvalidNumber {
            text: original.to_string(),
        })
}

/// A per-field conversion rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Conversion {
    /// Page count to bytes, with the page size resolved at startup.
    PagesToBytes { page_size: u64 },
    KSuffixToBytes,
    SizeSuffixToBytes,
    PercentSuffix,
    MultiplierSuffix,
    Ordinal(&'static [&'static str]),
    /// Plain text to float.
    Float,
}

impl Conversion {
    /// Applies the rule to a raw value.
    ///
    /// Text rules accept text only, except that an already-numeric value is
    /// passed through by [`Conversion::Float`]. [`Conversion::PagesToBytes`]
    /// needs an unsigned value.
    pub fn apply(&self, value: &TypedValue) -> Result<Number, ConvertError> {
        match (self, value) {
            (Conversion::PagesToBytes { page_size }, TypedValue::Unsigned(pages)) => {
                Ok(Number::Unsigned(pages_to_bytes(*pages, *page_size)))
            }
            (Conversion::PagesToBytes { .. }, other) => Err(ConvertError::NotNumeric {
                text: other.to_string(),
            }),
            (Conversion::Float, TypedValue::Unsigned(v)) => Ok(Number::Float(*v as f64)),
            (Conversion::Float, TypedValue::Signed(v)) => Ok(Number::Float(*v as f64)),
            (Conversion::Float, TypedValue::Float(v)) => Ok(Number::Float(*v)),
            (rule, TypedValue::Text(text)) => rule.apply_text(text),
            (_, other) => Err(ConvertError::NotNumeric {
                text: other.to_string(),
            }),
        }
    }

    fn apply_text(&self, text: &str) -> Result<Number, ConvertError> {
        match self {
            Conversion::KSuffixToBytes => k_suffix_to_bytes(text).map(Number::Unsigned),
            Conversion::SizeSuffixToBytes => size_suffix_to_bytes(text).map(Number::Float),
            Conversion::PercentSuffix => percent_suffix_to_int(text).map(Number::Signed),
            Conversion::MultiplierSuffix => multiplier_suffix_to_float(text).map(Number::Float),
            Conversion::Ordinal(states) => {
                Ok(Number::Unsigned(u64::from(enum_to_ordinal(text, states))))
            }
            Conversion::Float => parse_float(text.trim(), text).map(Number::Float),
            Conversion::PagesToBytes { .. } => Err(ConvertError::NotNumeric {
                text: text.to_string(),
            }),
        }
    }
}
