//! Number and money formatting shared by the dashboard and the text report.

/// Default currency symbol shown in front of amounts.
pub const DEFAULT_CURRENCY: &str = "₹";

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use expense_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let factor = 10_f64.powi(decimals as i32);
    let abs_value = value.abs();
    // Nudge by a scaled epsilon so exact binary midpoints (1.005) round up.
    let scaled = (abs_value * factor + f64::EPSILON * abs_value * factor).round();

    let whole = (scaled / factor).trunc() as u64;
    let frac = (scaled - whole as f64 * factor).round() as u64;

    let mut out = group_thousands(&whole.to_string());
    if decimals > 0 {
        out.push('.');
        out.push_str(&format!("{:0width$}", frac, width = decimals as usize));
    }

    if value < 0.0 && scaled != 0.0 {
        format!("-{out}")
    } else {
        out
    }
}

/// Format an amount with `symbol`, two decimals and thousands separators.
///
/// # Examples
///
/// ```
/// use expense_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234.56, "₹"), "₹1,234.56");
/// assert_eq!(format_currency(-9.99, "$"), "-$9.99");
/// ```
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let body = format_number(amount.abs(), 2);
    if amount < 0.0 && body != "0.00" {
        format!("-{symbol}{body}")
    } else {
        format!("{symbol}{body}")
    }
}

/// Format a percentage with one decimal place, e.g. `"42.5%"`.
pub fn format_percentage(value: f64) -> String {
    format!("{}%", format_number(value, 1))
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
///
/// # Examples
///
/// ```
/// use expense_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let factor = 10_f64.powi(decimal_places as i32);
    ((part / whole) * 100.0 * factor).round() / factor
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
