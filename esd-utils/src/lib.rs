//! Shared utility functions for ESD crates.

/// Numeric helpers shared by aggregation, projection and table editing.
pub mod numeric {
    use regex::Regex;
    use std::sync::LazyLock;

    /// Round `value` to `places` decimal digits, halves away from zero.
    ///
    /// The value is scaled by `10^places`, rounded with [`f64::round`] and scaled
    /// back, so `44.1000000000001` becomes `44.1` and `0.25` becomes `0.3` at one
    /// place. Negative zero is normalized to `0.0`.
    pub fn round_half_up(value: f64, places: u32) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let factor = 10f64.powi(places as i32);
        let rounded = (value * factor).round() / factor;
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }

    /// Parse the leading decimal number of a string, ignoring whatever follows.
    ///
    /// Accepts leading whitespace, an optional sign, digits with an optional
    /// fractional part, and an optional exponent. Returns `None` when no digit
    /// is found, e.g. for `""`, `"-"` or `"n/a"`.
    pub fn parse_lenient(s: &str) -> Option<f64> {
        let s = s.trim_start();
        let bytes = s.as_bytes();
        let len = bytes.len();

        let mut end = 0;
        if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
            end = 1;
        }

        let int_start = end;
        while end < len && bytes[end].is_ascii_digit() {
            end += 1;
        }
        let mut seen_digit = end > int_start;

        if end < len && bytes[end] == b'.' {
            let mut j = end + 1;
            while j < len && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > end + 1 {
                seen_digit = true;
                end = j;
            }
        }

        if !seen_digit {
            return None;
        }

        // Exponent only counts when at least one digit follows it.
        if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
            let mut j = end + 1;
            if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
                j += 1;
            }
            let exp_start = j;
            while j < len && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > exp_start {
                end = j;
            }
        }

        s[..end].parse::<f64>().ok()
    }

    /// Partial numeric input: optional minus sign, ASCII digits, at most one
    /// decimal point.
    static NUMERIC_INPUT: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^-?[0-9]*\.?[0-9]*$").expect("numeric input pattern"));

    /// Whether `s` is acceptable partial numeric input for an editable cell.
    ///
    /// Intermediate states such as `""`, `"-"` and `"3."` are accepted so a
    /// user can type a number one character at a time.
    pub fn is_numeric_input(s: &str) -> bool {
        NUMERIC_INPUT.is_match(s)
    }

}

/// JSON output helpers.
pub mod json {
    use serde::Serialize;
    use serde_json::ser::{PrettyFormatter, Serializer};

    /// Indentation used for every JSON document this workspace writes.
    pub const INDENT: &[u8] = b"    ";

    /// Serialize `value` as pretty-printed JSON with four-space indentation.
    pub fn to_pretty_vec<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(INDENT);
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;
        Ok(buf)
    }

    /// Same as [`to_pretty_vec`], returned as a `String`.
    pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
        let buf = to_pretty_vec(value)?;
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

}
