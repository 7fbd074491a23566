//! Display formatting for counts and statistics.

/// Format a row count with thousands separators.
///
/// ```
/// use explorer_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(52_398), "52,398");
/// ```
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// A descriptive statistic with two decimals and no grouping, so years
/// read as `2020.00`. `None` renders as `"n/a"`.
///
/// ```
/// use explorer_core::formatting::format_stat;
///
/// assert_eq!(format_stat(Some(2019.5)), "2019.50");
/// assert_eq!(format_stat(None), "n/a");
/// ```
pub fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => "n/a".to_string(),
    }
}

/// `part` as a percentage of `whole`; `None` when `whole` is zero.
pub fn share_of(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64 * 100.0)
}

/// Percentage of `whole` with one decimal, e.g. `"45.2%"`.
pub fn format_share(part: usize, whole: usize) -> String {
    match share_of(part, whole) {
        Some(p) => format!("{p:.1}%"),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_count ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_count_small() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(999), "999");
    }

    #[test]
    fn test_format_count_grouped() {
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(52_398), "52,398");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    // ── format_stat ──────────────────────────────────────────────────────────

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(Some(0.0)), "0.00");
        assert_eq!(format_stat(Some(1250.0)), "1250.00");
        assert_eq!(format_stat(Some(2.5)), "2.50");
        assert_eq!(format_stat(Some(f64::NAN)), "n/a");
    }

    // ── shares ───────────────────────────────────────────────────────────────

    #[test]
    fn test_share_of() {
        assert_eq!(share_of(1, 4), Some(25.0));
        assert_eq!(share_of(0, 0), None);
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(3, 4), "75.0%");
        assert_eq!(format_share(1, 3), "33.3%");
        assert_eq!(format_share(4, 4), "100.0%");
        assert_eq!(format_share(0, 0), "n/a");
    }
}
