//! Numeric helpers shared by expression math and the typography transforms.
//!
//! Token values arrive as loosely formatted strings (`"24"`, `"150%"`,
//! `"-0.5px"`), so parsing follows `parseFloat`: the longest numeric prefix
//! wins and anything without one is `NaN`.

/// Byte length of the numeric prefix of `s` (sign, digits, fraction, exponent).
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        return 0;
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

/// Parses the leading number of `s`, returning `NaN` when there is none.
pub fn parse_float(s: &str) -> f64 {
    let s = s.trim_start();
    let len = numeric_prefix_len(s);
    if len == 0 {
        return f64::NAN;
    }
    s[..len].parse().unwrap_or(f64::NAN)
}

/// Splits `"12.5px"` into `(12.5, "px")`. The suffix must be a bare unit.
pub fn split_dimension(s: &str) -> Option<(f64, &str)> {
    let s = s.trim();
    let len = numeric_prefix_len(s);
    if len == 0 {
        return None;
    }
    let (number, unit) = s.split_at(len);
    if !unit.chars().all(|c| c.is_ascii_alphabetic() || c == '%') {
        return None;
    }
    number.parse().ok().map(|n| (n, unit))
}

/// True when the value does not end in a digit, i.e. it already carries a unit.
pub fn has_unit(s: &str) -> bool {
    !s.ends_with(|c: char| c.is_ascii_digit())
}

/// Formats a number the way it would print in a stylesheet: no trailing
/// zeros, no negative zero, `NaN` kept visible.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

// Enough fractional digits to print any finite f64 exactly.
const EXACT_DIGITS: usize = 1100;

/// Fixed precision formatting with `toFixed` rounding: a value exactly
/// halfway between two candidates rounds away from zero. `NaN` passed through.
pub fn format_fixed(n: f64, precision: usize) -> String {
    if !n.is_finite() {
        return format_number(n);
    }
    let exact = format!("{:.*}", EXACT_DIGITS, n.abs());
    let (int_part, frac_part) = exact.split_at(exact.find('.').unwrap_or(exact.len()));
    let frac_part = frac_part.trim_start_matches('.');

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(precision))
        .collect();
    if frac_part.as_bytes().get(precision).map_or(false, |d| *d >= b'5') {
        round_up(&mut digits);
    }

    let split = digits.len() - precision;
    let mut out = String::with_capacity(digits.len() + 2);
    if n < 0.0 {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|d| *d as char));
    if precision > 0 {
        out.push('.');
        out.extend(digits[split..].iter().map(|d| *d as char));
    }
    out
}

fn round_up(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}
