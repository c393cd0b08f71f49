//! Display formatting for percentages, counts and salaries.

/// Precision used for ordinary percentages.
const DEFAULT_DECIMALS: usize = 2;

/// Furthest we extend precision looking for a significant digit.
const MAX_DECIMALS: usize = 10;

/// Format a percentage with two decimals, adding one decimal at a time for
/// tiny values until the rounded text has a non-zero digit.
///
/// `12.345` renders as `"12.35"`, `0.002` as `"0.002"`, `0.00004` as
/// `"0.00004"`. The digit shown is the rounded one, so `0.0000000007`
/// stops at nine decimals as `"0.000000001"`. Anything that is still zero
/// at ten decimals (including an exact zero) collapses to `"0"`.
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    for decimals in DEFAULT_DECIMALS..=MAX_DECIMALS {
        let rendered = format!("{value:.decimals$}");
        if has_nonzero_digit(&rendered) {
            return rendered;
        }
    }

    "0".to_string()
}

fn has_nonzero_digit(rendered: &str) -> bool {
    rendered.chars().any(|c| c.is_ascii_digit() && c != '0')
}

/// Group an integer with comma thousands separators: `1234567` → `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Dollar amount with separators: `81000` → `"$81,000"`.
pub fn format_salary(value: u64) -> String {
    format!("${}", group_thousands(value))
}
