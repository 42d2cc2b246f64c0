//! Display formatting for amounts and counts

const CRORE: f64 = 10_000_000.0;
const LAKH: f64 = 100_000.0;
const THOUSAND: f64 = 1_000.0;

/// Format a rupee amount using crore/lakh/thousand suffixes.
///
/// ```
/// use case_dash_core::format::format_currency;
///
/// assert_eq!(format_currency(25_000_000.0), "₹2.5 Cr");
/// assert_eq!(format_currency(350_000.0), "₹3.5 L");
/// assert_eq!(format_currency(1_500.0), "₹1.5 K");
/// assert_eq!(format_currency(999.0), "₹999");
/// ```
pub fn format_currency(amount: f64) -> String {
    if amount >= CRORE {
        format!("₹{:.1} Cr", amount / CRORE)
    } else if amount >= LAKH {
        format!("₹{:.1} L", amount / LAKH)
    } else if amount >= THOUSAND {
        format!("₹{:.1} K", amount / THOUSAND)
    } else {
        format!("₹{}", format_decimal(amount))
    }
}

/// Amount expressed in crore with one decimal, without a unit
pub fn format_crore(amount: f64) -> String {
    format!("{:.1}", amount / CRORE)
}

/// Integer with comma thousands separators
pub fn format_count(n: usize) -> String {
    group_thousands(&n.to_string())
}

/// Up to three fraction digits, trailing zeros dropped, integer part grouped
fn format_decimal(amount: f64) -> String {
    let fixed = format!("{:.3}", amount);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut out = format!("{}{}", sign, group_thousands(digits));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_thresholds() {
        assert_eq!(format_currency(10_000_000.0), "₹1.0 Cr");
        assert_eq!(format_currency(9_999_999.0), "₹100.0 L");
        assert_eq!(format_currency(100_000.0), "₹1.0 L");
        assert_eq!(format_currency(1_000.0), "₹1.0 K");
        assert_eq!(format_currency(0.0), "₹0");
        assert_eq!(format_currency(12.5), "₹12.5");
        assert_eq!(format_currency(0.1234), "₹0.123");
    }

    #[test]
    fn test_format_crore() {
        assert_eq!(format_crore(35_000_000.0), "3.5");
        assert_eq!(format_crore(0.0), "0.0");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
