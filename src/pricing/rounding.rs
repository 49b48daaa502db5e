//! Numeric helpers shared by the billing policies.
//!
//! Totals and breakdown strings must match what the storefront has always
//! shown, so decimal rounding and number rendering follow ECMAScript
//! semantics (`Math.round`, `Number.prototype.toFixed`, `Number::toString`)
//! rather than Rust's defaults.

/// Quantize `value` up to the next multiple of `step`: `ceil(value / step) * step`.
///
/// The result carries the usual binary floating-point error, e.g.
/// `ceil_to_step(1.2, 0.1) == 1.2000000000000002`.
pub fn ceil_to_step(value: f64, step: f64) -> f64 {
    (value / step).ceil() * step
}

/// Round to the nearest integer, ties toward positive infinity.
fn round_ties_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round to `decimals` places as `Math.round(value * 10^d) / 10^d`.
pub fn round_half_up(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    round_ties_up(value * scale) / scale
}

/// Render a number the way ECMAScript `Number::toString` does.
///
/// Integral values have no decimal point (`600`, not `600.0`) and the
/// shortest round-trip digits are used otherwise. Magnitudes outside
/// `[1e-6, 1e21)` switch to exponent form (`1e+21`).
pub fn js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }
    let exp = format!("{value:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

/// Render a number with a fixed number of decimals, as ECMAScript `toFixed`.
///
/// The exact binary value is rounded half-up, so `1.125` (exactly
/// representable) gives `"1.13"` while `1.005` (stored just below) gives
/// `"1.00"`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() || value.abs() >= 1e21 {
        return js_number(value);
    }

    // Enough places to hold the exact expansion of any double we bill with.
    let exact = format!("{:.*}", digits + 100, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(digits))
        .collect();
    let round_up = frac_part
        .as_bytes()
        .get(digits)
        .is_some_and(|d| *d >= b'5');

    if round_up {
        let mut i = kept.len();
        loop {
            if i == 0 {
                kept.insert(0, b'1');
                break;
            }
            i -= 1;
            if kept[i] == b'9' {
                kept[i] = b'0';
            } else {
                kept[i] += 1;
                break;
            }
        }
    }

    let mut out = String::with_capacity(kept.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    let split = kept.len() - digits;
    out.extend(kept[..split].iter().map(|b| *b as char));
    if digits > 0 {
        out.push('.');
        out.extend(kept[split..].iter().map(|b| *b as char));
    }
    out
}
