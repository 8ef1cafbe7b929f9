//! Sanitising of scraped numeric text

/// Placeholder strings that mean "no value" in scraped tables and CSV exports
const PLACEHOLDERS: &[&str] = &["", "-", "—", "–", "None", "none", "nan", "NaN", "N/A", "n/a"];

/// Parse a currency amount such as `"$1,234.50"`, `" 0.0725 "` or `"—"`
///
/// Currency symbols, thousands separators and surrounding whitespace are
/// stripped. Placeholders and text with no usable number yield `None`, never
/// zero. When a direct parse fails, every character other than digits, `.`
/// and `-` is discarded and the remainder is tried once more.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect();
    let cleaned = cleaned.trim();

    if PLACEHOLDERS.contains(&cleaned) {
        return None;
    }

    if let Ok(value) = cleaned.parse::<f64>() {
        return value.is_finite().then_some(value);
    }

    let digits: String = cleaned
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a percentage such as `"5.25%"` or `"1,025.0 %"` into its numeric value
pub fn parse_percent(raw: &str) -> Option<f64> {
    let core: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let core = core.trim_end_matches('%');
    if core.is_empty() {
        return None;
    }
    core.parse::<f64>().ok().filter(|v| v.is_finite())
}
