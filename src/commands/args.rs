// Argument parsing and reply formatting helpers

use super::CommandError;
use bytes::Bytes;

/// Parse a score. Accepts `inf`, `+inf`, `-inf` and `infinity` in any case;
/// rejects NaN and finite literals that overflow to infinity.
pub fn parse_float(arg: &[u8]) -> Result<f64, CommandError> {
    let text = std::str::from_utf8(arg).map_err(|_| CommandError::NotAFloat)?;
    let value = text.parse::<f64>().map_err(|_| CommandError::NotAFloat)?;
    if value.is_nan() || (value.is_infinite() && !is_infinity_literal(text)) {
        return Err(CommandError::NotAFloat);
    }
    Ok(value)
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

pub fn parse_int(arg: &[u8]) -> Result<i64, CommandError> {
    std::str::from_utf8(arg)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(CommandError::NotAnInteger)
}

/// One end of a score interval: `1.5`, `(1.5` (exclusive), `-inf`, `+inf`.
/// Returns the value and whether it is exclusive.
pub fn parse_score_bound(arg: &[u8]) -> Result<(f64, bool), CommandError> {
    let (exclusive, rest) = match arg.split_first() {
        Some((b'(', rest)) => (true, rest),
        _ => (false, arg),
    };
    let value = parse_float(rest)
        .map_err(|_| CommandError::InvalidArgument("min or max is not a float".to_string()))?;
    Ok((value, exclusive))
}

/// Case-insensitive keyword match
pub fn is_keyword(arg: &[u8], keyword: &str) -> bool {
    arg.eq_ignore_ascii_case(keyword.as_bytes())
}

/// Render a score the way Redis replies with it: integral values without a
/// fractional part, large or tiny magnitudes in exponent form.
pub fn format_score(score: f64) -> Bytes {
    if score.is_infinite() {
        return Bytes::from_static(if score > 0.0 { b"inf" } else { b"-inf" });
    }

    let abs = score.abs();
    if score == 0.0 || (1e-5..1e17).contains(&abs) {
        return Bytes::from(score.to_string());
    }

    // 1e300 -> 1e+300, 1e-7 stays 1e-7
    let formatted = format!("{:e}", score);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => Bytes::from(format!("{}e+{}", mantissa, exp)),
        _ => Bytes::from(formatted),
    }
}
