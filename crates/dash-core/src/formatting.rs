/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use dash_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(950), "950");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a ratio as a percentage with two decimal places.
///
/// # Examples
///
/// ```
/// use dash_core::formatting::format_percent;
///
/// assert_eq!(format_percent(3.456), "3.46%");
/// assert_eq!(format_percent(0.0), "0.00%");
/// ```
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Format a signed change, keeping an explicit sign on increases.
///
/// # Examples
///
/// ```
/// use dash_core::formatting::format_delta;
///
/// assert_eq!(format_delta(1234), "+1,234");
/// assert_eq!(format_delta(-20), "-20");
/// assert_eq!(format_delta(0), "0");
/// ```
pub fn format_delta(value: i64) -> String {
    let grouped = group_thousands(&value.unsigned_abs().to_string());
    if value > 0 {
        format!("+{}", grouped)
    } else if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Insert a comma every three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}
