// src/extractors/numeric.rs
//! Brazilian number formatting: `.` groups thousands, `,` marks decimals.
//! Every numeric capture in the extractor goes through this module.

/// Rewrites a pt-BR numeral into the form `str::parse::<f64>` accepts.
/// `"1.234,56"` becomes `"1234.56"`. Separators trailing the numeral
/// (`"250,00, dentro do orçamento"`) are punctuation, not digits.
pub fn normalize_locale_number(raw: &str) -> String {
    raw.trim()
        .trim_end_matches([',', '.'])
        .replace('.', "")
        .replacen(',', ".", 1)
}

/// Parses a pt-BR decimal. Anything unparsable yields `0.0`.
pub fn parse_decimal(raw: &str) -> f64 {
    let normalized = normalize_locale_number(raw);
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            tracing::trace!("Unparsable decimal '{}', using 0", raw);
            0.0
        }
    }
}

/// Parses a pt-BR integer count (thousands separators stripped). Anything unparsable yields `0`.
pub fn parse_count(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(|c| *c != '.').collect();
    digits.trim().parse::<u64>().unwrap_or_else(|_| {
        tracing::trace!("Unparsable count '{}', using 0", raw);
        0
    })
}
