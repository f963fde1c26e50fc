//! Compiled leaf constraints: YANG range / length expressions and patterns
//!
//! Numeric bounds are held as scaled `i128` values so one representation
//! covers every integer type (including the full `uint64` space) and
//! decimal64 values (scaled by their fraction digits).

use std::fmt;

use regex::Regex;

/// One closed interval of a range expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub min: i128,
    pub max: i128,
}

/// A parsed range or length expression such as `1..10 | 20..max`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSet {
    text: String,
    intervals: Vec<Interval>,
}

impl RangeSet {
    /// Parses a YANG range expression.
    ///
    /// `scale` is the number of fraction digits bounds are scaled by (0 for
    /// integers and lengths). `bounds` is the value space of the builtin
    /// type; `min` and `max` resolve to it and explicit bounds must lie
    /// within it. Intervals must be ascending and disjoint.
    pub fn parse(text: &str, scale: u8, bounds: Interval) -> Result<Self, String> {
        let mut intervals: Vec<Interval> = Vec::new();

        for part in text.split('|') {
            let part = part.trim();
            if part.is_empty() {
                return Err(format!("empty part in range '{}'", text));
            }

            let (lo, hi) = match part.split_once("..") {
                Some((lo, hi)) => (lo.trim(), hi.trim()),
                None => (part, part),
            };

            let min = resolve_bound(lo, scale, bounds)
                .ok_or_else(|| format!("invalid bound '{}' in range '{}'", lo, text))?;
            let max = resolve_bound(hi, scale, bounds)
                .ok_or_else(|| format!("invalid bound '{}' in range '{}'", hi, text))?;

            if min > max {
                return Err(format!("descending interval '{}' in range '{}'", part, text));
            }
            if min < bounds.min || max > bounds.max {
                return Err(format!("interval '{}' exceeds the type's value space", part));
            }
            if let Some(prev) = intervals.last() {
                if min <= prev.max {
                    return Err(format!(
                        "intervals of range '{}' must be ascending and disjoint",
                        text
                    ));
                }
            }

            intervals.push(Interval { min, max });
        }

        Ok(Self {
            text: text.trim().to_string(),
            intervals,
        })
    }

    /// True if `value` (in the same scale the set was parsed with) is inside
    /// one of the intervals
    pub fn contains(&self, value: i128) -> bool {
        self.intervals
            .iter()
            .any(|iv| iv.min <= value && value <= iv.max)
    }

    /// The parsed intervals in ascending order
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// The expression as written in the descriptor
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn resolve_bound(text: &str, scale: u8, bounds: Interval) -> Option<i128> {
    match text {
        "min" => Some(bounds.min),
        "max" => Some(bounds.max),
        _ => parse_scaled(text, scale),
    }
}

/// Parses a decimal literal into an integer scaled by `10^scale`.
///
/// Returns `None` for malformed text, for more fraction digits than `scale`
/// allows, and on overflow.
pub(crate) fn parse_scaled(text: &str, scale: u8) -> Option<i128> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) if !frac_part.is_empty() => (int_part, frac_part),
        Some(_) => return None,
        None => (body, ""),
    };

    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) || frac_part.len() > scale as usize {
        return None;
    }

    let factor = 10i128.checked_pow(scale as u32)?;
    let mut value = int_part.parse::<i128>().ok()?.checked_mul(factor)?;

    if !frac_part.is_empty() {
        let frac = frac_part.parse::<i128>().ok()?;
        let pad = 10i128.checked_pow((scale as usize - frac_part.len()) as u32)?;
        value = value.checked_add(frac.checked_mul(pad)?)?;
    }

    Some(if negative { -value } else { value })
}

/// A compiled string pattern. YANG patterns are implicitly anchored, so the
/// whole value must match.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn compile(source: &str) -> Result<Self, String> {
        let regex = Regex::new(&format!("^(?:{})$", source))
            .map_err(|e| format!("invalid pattern '{}': {}", source, e))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}
