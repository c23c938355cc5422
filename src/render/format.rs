/// Formats `value` with `digits` significant digits
///
/// Matches JavaScript's `Number.prototype.toPrecision` for values whose
/// magnitude is below `10^digits`, which covers every rating the backend
/// produces. Larger values are printed without a fractional part instead of
/// switching to exponent notation.
pub fn to_precision(value: f64, digits: u32) -> String {
    let digits = digits.max(1) as i32;

    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", (digits - 1) as usize, 0.0);
    }

    let decimals = |exponent: i32| (digits - 1 - exponent).max(0) as usize;
    let exponent = value.abs().log10().floor() as i32;
    let text = round_half_away(value, decimals(exponent));

    // Rounding can carry into a new leading digit (9.96 -> "10.0")
    match text.parse::<f64>() {
        Ok(rounded) if rounded != 0.0 => {
            let rounded_exponent = rounded.abs().log10().floor() as i32;
            if rounded_exponent != exponent {
                round_half_away(rounded, decimals(rounded_exponent))
            } else {
                text
            }
        }
        _ => text,
    }
}

/// Digits past the rounding position inspected for an exact tie
const TIE_PROBE_DIGITS: usize = 40;

/// Rounds to `decimals` places, exact ties away from zero
///
/// `format!` rounds ties to even. The tie test runs on the exact decimal
/// expansion of the binary value, so `3.25` rounds up while `1.15` (stored as
/// `1.1499…`) still rounds down.
fn round_half_away(value: f64, decimals: usize) -> String {
    let expanded = format!("{:.*}", decimals + TIE_PROBE_DIGITS, value);
    let (head, tail) = expanded.split_at(expanded.len() - TIE_PROBE_DIGITS);
    let is_tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if !is_tie {
        return format!("{:.*}", decimals, value);
    }

    let truncated = head.trim_end_matches('.').parse::<f64>().unwrap_or(value);
    let step = 10f64.powi(-(decimals as i32));
    let bumped = if value < 0.0 {
        truncated - step
    } else {
        truncated + step
    };
    format!("{:.*}", decimals, bumped)
}

/// Average rating as shown on cards and panels
pub fn rating(value: f64) -> String {
    to_precision(value, 2)
}
